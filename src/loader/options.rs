//! Per-call load options and load results.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

use crate::audio::AudioBuffer;
use crate::error::LoadError;
use crate::transport::ProgressEvent;

// == Loaded Audio ==
/// Successful outcome of a load.
#[derive(Debug, Clone)]
pub enum LoadedAudio {
    /// Decoded buffer, shared with the cache when cached
    Decoded(Arc<AudioBuffer>),
    /// Raw payload, returned when decoding was disabled
    Raw(Bytes),
}

impl LoadedAudio {
    pub fn as_decoded(&self) -> Option<&Arc<AudioBuffer>> {
        match self {
            LoadedAudio::Decoded(buffer) => Some(buffer),
            LoadedAudio::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            LoadedAudio::Raw(bytes) => Some(bytes),
            LoadedAudio::Decoded(_) => None,
        }
    }
}

/// Terminal result of one `load` call.
pub type LoadResult = Result<LoadedAudio, LoadError>;

/// Loader-wide completion observer.
pub type LoadHook = Arc<dyn Fn(&LoadResult) + Send + Sync>;

/// Per-call completion callback, run once before the loader hook.
pub type LoadCallback = Box<dyn FnOnce(&LoadResult) + Send>;

// == Load Options ==
/// Options for a single `load` call.
///
/// Defaults: caching follows the loader, decoding on, no callbacks.
pub struct LoadOptions {
    pub(crate) cache: Option<bool>,
    pub(crate) decode: bool,
    pub(crate) on_load: Option<LoadCallback>,
    pub(crate) progress: Option<UnboundedSender<ProgressEvent>>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the cache for this call. Has no effect when the
    /// loader's cache is disabled.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    /// When false the raw payload is returned and nothing is cached.
    pub fn decode(mut self, decode: bool) -> Self {
        self.decode = decode;
        self
    }

    pub fn on_load(mut self, callback: impl FnOnce(&LoadResult) + Send + 'static) -> Self {
        self.on_load = Some(Box::new(callback));
        self
    }

    /// Receives this call's progress events, in order, before completion.
    pub fn progress(mut self, sender: UnboundedSender<ProgressEvent>) -> Self {
        self.progress = Some(sender);
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            cache: None,
            decode: true,
            on_load: None,
            progress: None,
        }
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("cache", &self.cache)
            .field("decode", &self.decode)
            .field("on_load", &self.on_load.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}
