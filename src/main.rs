//! Audio Loader - command line front end
//!
//! Loads every path or URL given on the command line twice, the second pass
//! served from the cache, then prints cache statistics as JSON.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audio_loader::{AudioLoader, AudioSource, LoadOptions, LoadedAudio, LoaderConfig};

/// Main entry point for the audio loader CLI.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the loader with the default transport and decoder
/// 4. Load each argument twice and report the outcome
/// 5. Print cache statistics
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audio_loader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LoaderConfig::from_env();
    info!(
        "Configuration loaded: cache={}, max_cache_size={}KB",
        config.cache, config.max_cache_size
    );

    let sources = std::env::args()
        .skip(1)
        .map(|arg| parse_source(&arg))
        .collect::<Result<Vec<_>>>()?;
    if sources.is_empty() {
        warn!("Usage: audio_loader <path-or-url>...");
        return Ok(());
    }

    let loader = AudioLoader::builder()
        .config(config)
        .on_progress(|event| {
            if let Some(fraction) = event.fraction() {
                tracing::debug!("progress {:.0}%", fraction * 100.0);
            }
        })
        .build();

    for pass in 1..=2 {
        for source in &sources {
            match loader.load(source.clone(), LoadOptions::new()).await {
                Ok(LoadedAudio::Decoded(buffer)) => info!(
                    "pass {}: {} -> {} channel(s), {} samples @ {} Hz ({:.2}s)",
                    pass,
                    source,
                    buffer.number_of_channels(),
                    buffer.length(),
                    buffer.sample_rate(),
                    buffer.duration().as_secs_f64()
                ),
                Ok(LoadedAudio::Raw(bytes)) => {
                    info!("pass {}: {} -> {} raw bytes", pass, source, bytes.len())
                }
                Err(e) => warn!("pass {}: {} -> {}", pass, source, e),
            }
        }
    }

    let stats = loader.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// Anything with a scheme is a URL, everything else a local path.
fn parse_source(arg: &str) -> Result<AudioSource> {
    if arg.contains("://") {
        AudioSource::url(arg).with_context(|| format!("invalid source {}", arg))
    } else {
        Ok(AudioSource::file(arg))
    }
}
