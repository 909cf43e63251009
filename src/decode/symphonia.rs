//! Symphonia-backed decoder.
//!
//! Probes the container, decodes the first audio track to the end and
//! collects planar f32 samples. Decoding runs on the blocking pool.

use std::io::{Cursor, ErrorKind};

use async_trait::async_trait;
use bytes::Bytes;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::audio::AudioBuffer;
use crate::decode::Decoder;
use crate::error::DecodeError;

/// Decodes any format enabled in symphonia's default feature set.
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    /// File extension passed to the probe as a hint
    extension: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints the probe with a file extension such as `"mp3"`.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
        }
    }
}

#[async_trait]
impl Decoder for SymphoniaDecoder {
    async fn decode(&self, bytes: Bytes) -> Result<AudioBuffer, DecodeError> {
        let extension = self.extension.clone();
        tokio::task::spawn_blocking(move || decode_all(bytes, extension.as_deref()))
            .await
            .map_err(|e| DecodeError::Backend(e.to_string()))?
    }
}

fn decode_all(bytes: Bytes, extension: Option<&str>) -> Result<AudioBuffer, DecodeError> {
    let stream = MediaSourceStream::new(
        Box::new(Cursor::new(bytes)),
        MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::Unsupported("no audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut channels: Vec<Vec<f32>> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            // Track layout changed; keep what was decoded so far
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Backend(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                debug!(reason, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(DecodeError::Backend(e.to_string())),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        sample_rate = sample_rate.or(Some(spec.rate));
        if channels.is_empty() {
            channels = vec![Vec::new(); spec.channels.count()];
        }

        let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        samples.copy_planar_ref(decoded);
        for (channel, plane) in channels
            .iter_mut()
            .zip(samples.samples().chunks_exact(frames))
        {
            channel.extend_from_slice(plane);
        }
    }

    if channels.is_empty() {
        return Err(DecodeError::InvalidData("no audio frames".to_string()));
    }
    let sample_rate =
        sample_rate.ok_or_else(|| DecodeError::InvalidData("no sample rate".to_string()))?;
    AudioBuffer::new(sample_rate, channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a 16-bit PCM WAV file from interleaved samples.
    fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        out
    }

    #[tokio::test]
    async fn test_decode_stereo_wav() {
        // L = 0.5, R = -0.5 for 100 frames
        let interleaved: Vec<i16> = (0..100).flat_map(|_| [16384i16, -16384]).collect();
        let bytes = Bytes::from(wav_bytes(2, 22_050, &interleaved));

        let buffer = SymphoniaDecoder::new().decode(bytes).await.unwrap();

        assert_eq!(buffer.number_of_channels(), 2);
        assert_eq!(buffer.length(), 100);
        assert_eq!(buffer.sample_rate(), 22_050);
        assert!(buffer.channel_data(0).unwrap().iter().all(|s| *s == 0.5));
        assert!(buffer.channel_data(1).unwrap().iter().all(|s| *s == -0.5));
    }

    #[tokio::test]
    async fn test_decode_with_extension_hint() {
        let bytes = Bytes::from(wav_bytes(1, 8_000, &[0; 64]));
        let buffer = SymphoniaDecoder::with_extension("wav")
            .decode(bytes)
            .await
            .unwrap();
        assert_eq!(buffer.number_of_channels(), 1);
        assert_eq!(buffer.length(), 64);
    }

    #[tokio::test]
    async fn test_decode_garbage_fails() {
        let bytes = Bytes::from_static(b"definitely not audio data at all");
        let result = SymphoniaDecoder::new().decode(bytes).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_decode_empty_fails() {
        let result = SymphoniaDecoder::new().decode(Bytes::new()).await;
        assert!(result.is_err());
    }
}
