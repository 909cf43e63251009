//! Decoded Audio Buffer
//!
//! Planar f32 sample storage produced by a decoder.

use std::time::Duration;

use crate::error::DecodeError;

// == Audio Buffer ==
/// Decoded audio held in memory, one `Vec<f32>` per channel.
///
/// Invariant: every channel holds exactly `length()` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// Fails when the channels do not all have the same length or the
    /// sample rate is zero.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, DecodeError> {
        if sample_rate == 0 {
            return Err(DecodeError::InvalidData("sample rate is zero".to_string()));
        }
        if let Some(first) = channels.first() {
            let length = first.len();
            if channels.iter().any(|c| c.len() != length) {
                return Err(DecodeError::InvalidData(
                    "channels have different lengths".to_string(),
                ));
            }
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Creates a buffer of silence.
    pub fn silent(number_of_channels: usize, length: usize, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: vec![vec![0.0; length]; number_of_channels],
        }
    }

    /// Splits interleaved samples (`L R L R ...`) into planar channels.
    pub fn from_interleaved(
        samples: &[f32],
        number_of_channels: usize,
        sample_rate: u32,
    ) -> Result<Self, DecodeError> {
        if number_of_channels == 0 {
            return Err(DecodeError::InvalidData("zero channels".to_string()));
        }
        if samples.len() % number_of_channels != 0 {
            return Err(DecodeError::InvalidData(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                number_of_channels
            )));
        }
        let length = samples.len() / number_of_channels;
        let mut channels: Vec<Vec<f32>> = (0..number_of_channels)
            .map(|_| Vec::with_capacity(length))
            .collect();
        for frame in samples.chunks_exact(number_of_channels) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn length(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback duration at the buffer's sample rate.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.length() as f64 / f64::from(self.sample_rate))
    }

    pub fn channel_data(&self, channel: usize) -> Option<&[f32]> {
        self.channels.get(channel).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_buffer() {
        let buffer = AudioBuffer::silent(2, 96_000, 48_000);
        assert_eq!(buffer.number_of_channels(), 2);
        assert_eq!(buffer.length(), 96_000);
        assert_eq!(buffer.duration(), Duration::from_secs(2));
        assert!(buffer.channel_data(1).unwrap().iter().all(|s| *s == 0.0));
        assert!(buffer.channel_data(2).is_none());
    }

    #[test]
    fn test_new_rejects_ragged_channels() {
        let result = AudioBuffer::new(44_100, vec![vec![0.0; 4], vec![0.0; 3]]);
        assert!(matches!(result, Err(DecodeError::InvalidData(_))));
    }

    #[test]
    fn test_new_rejects_zero_rate() {
        assert!(AudioBuffer::new(0, vec![vec![0.0; 4]]).is_err());
    }

    #[test]
    fn test_from_interleaved() {
        let buffer = AudioBuffer::from_interleaved(&[1.0, -1.0, 0.5, -0.5], 2, 8_000).unwrap();
        assert_eq!(buffer.length(), 2);
        assert_eq!(buffer.channel_data(0).unwrap(), &[1.0f32, 0.5]);
        assert_eq!(buffer.channel_data(1).unwrap(), &[-1.0f32, -0.5]);
    }

    #[test]
    fn test_from_interleaved_rejects_partial_frame() {
        assert!(AudioBuffer::from_interleaved(&[1.0, 2.0, 3.0], 2, 8_000).is_err());
        assert!(AudioBuffer::from_interleaved(&[1.0], 0, 8_000).is_err());
    }

    #[test]
    fn test_empty_buffer_length() {
        let buffer = AudioBuffer::new(8_000, Vec::new()).unwrap();
        assert_eq!(buffer.length(), 0);
        assert_eq!(buffer.number_of_channels(), 0);
    }
}
