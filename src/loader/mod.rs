//! Loader Module
//!
//! Orchestrates a load: cache check, fetch, optional decode, cache admission
//! and completion delivery.
//!
//! A loader is built once and shared as a [`SharedLoader`]; clones of the
//! handle see the same cache and configuration.

mod clock;
mod options;

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::audio::AudioSource;
use crate::cache::{CacheStats, CacheStore, EvictionOrder};
use crate::config::LoaderConfig;
use crate::decode::{Decoder, SymphoniaDecoder};
use crate::error::LoadError;
use crate::transport::{DefaultTransport, ProgressEvent, ProgressHook, ProgressSink, Transport};

pub use clock::{Clock, ContextClock, ManualClock};
pub use options::{LoadCallback, LoadHook, LoadOptions, LoadResult, LoadedAudio};

/// Shared handle to a loader.
pub type SharedLoader = Arc<AudioLoader>;

// == Audio Loader ==
/// Loads audio sources and caches decoded buffers.
pub struct AudioLoader {
    config: LoaderConfig,
    cache: RwLock<CacheStore>,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder>,
    clock: Arc<dyn Clock>,
    on_load: Option<LoadHook>,
    on_progress: Option<ProgressHook>,
}

impl AudioLoader {
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    // == Load ==
    /// Loads `source`, serving decoded buffers from the cache when possible.
    ///
    /// The cache is consulted, and a decoded result admitted, only when both
    /// the loader and the call have caching enabled. The result is passed to
    /// the call's `on_load`, then to the loader's `on_load`, then returned.
    /// Raw payloads (`decode(false)`) are never cached.
    pub async fn load(&self, source: AudioSource, mut options: LoadOptions) -> LoadResult {
        let use_cache = self.config.cache && options.cache.unwrap_or(true);
        let callback = options.on_load.take();
        let progress = ProgressSink::new(options.progress.take(), self.on_progress.clone());

        let result = self
            .resolve(&source, use_cache, options.decode, &progress)
            .await;

        if let Err(error) = &result {
            warn!(%source, %error, "load failed");
        }
        if let Some(callback) = callback {
            callback(&result);
        }
        if let Some(hook) = &self.on_load {
            hook(&result);
        }
        result
    }

    async fn resolve(
        &self,
        source: &AudioSource,
        use_cache: bool,
        decode: bool,
        progress: &ProgressSink,
    ) -> LoadResult {
        if use_cache {
            let mut cache = self.cache.write().await;
            if let Some(entry) = cache.lookup(source) {
                debug!(%source, "cache hit");
                return Ok(LoadedAudio::Decoded(Arc::clone(entry.buffer())));
            }
            debug!(%source, "cache miss");
        }

        let bytes = self
            .transport
            .fetch(source, progress)
            .await
            .map_err(LoadError::Loading)?;
        if !decode {
            return Ok(LoadedAudio::Raw(bytes));
        }

        let buffer = Arc::new(
            self.decoder
                .decode(bytes)
                .await
                .map_err(LoadError::Decoding)?,
        );

        if use_cache {
            let now = self.clock.now();
            let admission = self
                .cache
                .write()
                .await
                .admit(source.clone(), Arc::clone(&buffer), now);
            debug!(%source, ?admission, "cache admission");
        }
        Ok(LoadedAudio::Decoded(buffer))
    }

    // == Flush ==
    /// Empties the cache. Configuration is untouched.
    pub async fn flush_cache(&self) {
        self.cache.write().await.flush();
        info!("cache flushed");
    }

    // == Accessors ==
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn cached_size_kb(&self) -> f64 {
        self.cache.read().await.cached_size_kb()
    }

    /// True if a decoded buffer for `source` is cached. Does not count as a lookup.
    pub async fn is_cached(&self, source: &AudioSource) -> bool {
        self.cache.read().await.contains(source)
    }
}

impl fmt::Debug for AudioLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioLoader")
            .field("config", &self.config)
            .field("on_load", &self.on_load.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish_non_exhaustive()
    }
}

// == Loader Builder ==
/// Builds an [`AudioLoader`].
///
/// Unset collaborators fall back to [`DefaultTransport`],
/// [`SymphoniaDecoder`] and [`ContextClock`].
#[derive(Default)]
pub struct LoaderBuilder {
    config: LoaderConfig,
    transport: Option<Arc<dyn Transport>>,
    decoder: Option<Arc<dyn Decoder>>,
    clock: Option<Arc<dyn Clock>>,
    on_load: Option<LoadHook>,
    on_progress: Option<ProgressHook>,
    eviction_order: Option<EvictionOrder>,
}

impl LoaderBuilder {
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.config.cache = cache;
        self
    }

    /// Cache capacity in kilobytes.
    pub fn max_cache_size(mut self, max_cache_size: u64) -> Self {
        self.config.max_cache_size = max_cache_size;
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Called with every load's result, after the call's own `on_load`.
    pub fn on_load(mut self, hook: impl Fn(&LoadResult) + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(hook));
        self
    }

    /// Called with every progress event of every load.
    pub fn on_progress(mut self, hook: impl Fn(&ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(hook));
        self
    }

    /// Replaces the oldest-first eviction order.
    pub fn eviction_order(mut self, order: EvictionOrder) -> Self {
        self.eviction_order = Some(order);
        self
    }

    pub fn build(self) -> SharedLoader {
        let mut store = CacheStore::new(self.config.max_cache_size);
        if let Some(order) = self.eviction_order {
            store = store.with_eviction_order(order);
        }

        info!(
            cache = self.config.cache,
            max_cache_size = self.config.max_cache_size,
            "audio loader created"
        );

        Arc::new(AudioLoader {
            config: self.config,
            cache: RwLock::new(store),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(DefaultTransport::default())),
            decoder: self
                .decoder
                .unwrap_or_else(|| Arc::new(SymphoniaDecoder::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(ContextClock::new())),
            on_load: self.on_load,
            on_progress: self.on_progress,
        })
    }
}
