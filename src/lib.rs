//! Audio Loader - async audio loading with a size-bounded decoded-buffer cache
//!
//! Fetches audio from URLs, local files or in-memory blobs, decodes it and
//! remembers decoded buffers in an in-process cache with ordered eviction.

pub mod audio;
pub mod cache;
pub mod config;
pub mod decode;
pub mod error;
pub mod loader;
pub mod transport;

pub use audio::{AudioBuffer, AudioSource};
pub use config::LoaderConfig;
pub use error::{LoadError, Result};
pub use loader::{AudioLoader, LoadOptions, LoadResult, LoadedAudio, SharedLoader};
