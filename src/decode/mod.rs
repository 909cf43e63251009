//! Decode Module
//!
//! Turns fetched bytes into a decoded [`AudioBuffer`].

mod symphonia;

use async_trait::async_trait;
use bytes::Bytes;

use crate::audio::AudioBuffer;
use crate::error::DecodeError;

pub use self::symphonia::SymphoniaDecoder;

/// Decodes a complete payload.
///
/// Implementations resolve exactly once, with a buffer or an error.
#[async_trait]
pub trait Decoder: Send + Sync {
    async fn decode(&self, bytes: Bytes) -> Result<AudioBuffer, DecodeError>;
}
