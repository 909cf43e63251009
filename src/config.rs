//! Configuration Module
//!
//! Handles loading and managing loader configuration from environment variables.

use std::env;

/// Default cache capacity in kilobytes.
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 1000;

/// Loader configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Whether decoded buffers are cached at all
    pub cache: bool,
    /// Cache capacity in kilobytes (see `cache::estimate_kb`)
    pub max_cache_size: u64,
}

impl LoaderConfig {
    /// Creates a new LoaderConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AUDIO_LOADER_CACHE` - Enable the buffer cache (default: true)
    /// - `AUDIO_LOADER_MAX_CACHE_SIZE` - Cache capacity in KB (default: 1000)
    pub fn from_env() -> Self {
        Self {
            cache: env::var("AUDIO_LOADER_CACHE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            max_cache_size: env::var("AUDIO_LOADER_MAX_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CACHE_SIZE),
        }
    }

    /// Cache capacity in bytes, the unit the store accounts in.
    pub fn max_cache_bytes(&self) -> u64 {
        self.max_cache_size.saturating_mul(1000)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache: true,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
