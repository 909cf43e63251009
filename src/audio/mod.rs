//! Audio Module
//!
//! Source identities and decoded buffer types shared by the transport,
//! decoder and cache layers.

mod buffer;
mod source;

pub use buffer::AudioBuffer;
pub use source::{AudioSource, BlobHandle, FileHandle, UrlSource};
