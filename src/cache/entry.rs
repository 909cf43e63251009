//! Cache Entry Module
//!
//! Defines the structure for individual cached decoded buffers.

use std::sync::Arc;
use std::time::Duration;

use crate::audio::{AudioBuffer, AudioSource};
use crate::cache::size::estimate_bytes;

// == Cache Entry ==
/// A decoded buffer remembered under its source identity.
///
/// Entries are never mutated after creation; the timestamp is the clock
/// reading at admission and is not refreshed on hits.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    source: AudioSource,
    buffer: Arc<AudioBuffer>,
    timestamp: Duration,
    size_bytes: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry, estimating its footprint once.
    ///
    /// # Arguments
    /// * `source` - Identity the buffer was loaded from
    /// * `buffer` - Decoded buffer shared with callers
    /// * `timestamp` - Clock reading at admission
    pub fn new(source: AudioSource, buffer: Arc<AudioBuffer>, timestamp: Duration) -> Self {
        let size_bytes = estimate_bytes(&buffer);
        Self {
            source,
            buffer,
            timestamp,
            size_bytes,
        }
    }

    pub fn source(&self) -> &AudioSource {
        &self.source
    }

    pub fn buffer(&self) -> &Arc<AudioBuffer> {
        &self.buffer
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    /// Estimated footprint in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Estimated footprint in kilobytes.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1000.0
    }
}
