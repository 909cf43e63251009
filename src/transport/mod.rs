//! Transport Module
//!
//! Fetches raw payload bytes for a source, reporting progress along the way.
//!
//! # Transports
//! - [`HttpTransport`] - `http` and `https` URLs via reqwest
//! - [`FileTransport`] - file handles, `file://` URLs and in-memory blobs
//! - [`DefaultTransport`] - dispatches to the two above by source kind

mod file;
mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

use crate::audio::AudioSource;
use crate::error::TransportError;

pub use file::FileTransport;
pub use http::HttpTransport;

// == Progress ==
/// Bytes received so far for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Bytes received so far
    pub loaded: u64,
    /// Expected total, when the transport knows it
    pub total: Option<u64>,
}

impl ProgressEvent {
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    /// Completed fraction in `0.0..=1.0`, if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.loaded as f64 / total as f64).min(1.0)),
            None => None,
        }
    }
}

/// Loader-wide progress observer.
pub type ProgressHook = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Fans progress events out to the per-call channel and the loader hook.
///
/// Events are delivered synchronously, so every event is observed before
/// the fetch that produced it returns.
#[derive(Clone, Default)]
pub struct ProgressSink {
    channel: Option<UnboundedSender<ProgressEvent>>,
    hook: Option<ProgressHook>,
}

impl ProgressSink {
    pub fn new(channel: Option<UnboundedSender<ProgressEvent>>, hook: Option<ProgressHook>) -> Self {
        Self { channel, hook }
    }

    /// Sink that drops every event.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(channel) = &self.channel {
            // Receiver may have been dropped by a caller that stopped listening
            let _ = channel.send(event);
        }
        if let Some(hook) = &self.hook {
            hook(&event);
        }
    }
}

impl fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSink")
            .field("channel", &self.channel.is_some())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

// == Transport Trait ==
/// Fetches the raw bytes behind a source.
///
/// Implementations complete exactly once, with the payload or an error,
/// and emit zero or more progress events before completing.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(
        &self,
        source: &AudioSource,
        progress: &ProgressSink,
    ) -> Result<Bytes, TransportError>;
}

// == Default Transport ==
/// Routes network URLs to [`HttpTransport`] and everything local to
/// [`FileTransport`].
#[derive(Debug, Clone, Default)]
pub struct DefaultTransport {
    http: HttpTransport,
    file: FileTransport,
}

impl DefaultTransport {
    pub fn new(http: HttpTransport, file: FileTransport) -> Self {
        Self { http, file }
    }
}

#[async_trait]
impl Transport for DefaultTransport {
    async fn fetch(
        &self,
        source: &AudioSource,
        progress: &ProgressSink,
    ) -> Result<Bytes, TransportError> {
        match source {
            AudioSource::Url(url) if HttpTransport::handles(url.url()) => {
                self.http.fetch(source, progress).await
            }
            _ => self.file.fetch(source, progress).await,
        }
    }
}
