//! Buffer size estimation.
//!
//! Every sample is counted as a 32-bit float whatever the source encoding,
//! so the result is a cost unit for the cache, not exact memory usage.

use crate::audio::AudioBuffer;

/// Bytes charged per sample.
pub const BYTES_PER_SAMPLE: u64 = 4;

/// Estimated footprint of a decoded buffer in bytes.
pub fn estimate_bytes(buffer: &AudioBuffer) -> u64 {
    buffer.length() as u64 * buffer.number_of_channels() as u64 * BYTES_PER_SAMPLE
}

/// Estimated footprint of a decoded buffer in kilobytes (1 KB = 1000 bytes).
pub fn estimate_kb(buffer: &AudioBuffer) -> f64 {
    estimate_bytes(buffer) as f64 / 1000.0
}
