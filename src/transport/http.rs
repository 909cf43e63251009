//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::audio::AudioSource;
use crate::error::TransportError;
use crate::transport::{ProgressEvent, ProgressSink, Transport};

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// GETs `http`/`https` URLs, streaming the body chunk by chunk.
///
/// Any status other than 200 is a failure.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (proxies, timeouts, headers).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// True for URL schemes this transport can fetch.
    pub fn handles(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    /// Downloads `url`, emitting a progress event after every chunk.
    pub async fn get(&self, url: &Url, progress: &ProgressSink) -> Result<Bytes, TransportError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total = response.content_length();
        let reserve = total.unwrap_or(0).min(MAX_PREALLOCATION) as usize;
        let mut body = BytesMut::with_capacity(reserve);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(TransportError::from_reqwest)?
        {
            body.extend_from_slice(&chunk);
            progress.emit(ProgressEvent::new(body.len() as u64, total));
        }

        debug!(%url, bytes = body.len(), "http fetch complete");
        Ok(body.freeze())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        source: &AudioSource,
        progress: &ProgressSink,
    ) -> Result<Bytes, TransportError> {
        match source {
            AudioSource::Url(url) if Self::handles(url.url()) => self.get(url.url(), progress).await,
            other => Err(TransportError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_schemes() {
        assert!(HttpTransport::handles(&Url::parse("http://host/a").unwrap()));
        assert!(HttpTransport::handles(&Url::parse("https://host/a").unwrap()));
        assert!(!HttpTransport::handles(&Url::parse("file:///tmp/a").unwrap()));
    }

    #[tokio::test]
    async fn test_rejects_local_sources() {
        let transport = HttpTransport::new();
        let result = transport
            .fetch(&AudioSource::file("/tmp/a.wav"), &ProgressSink::none())
            .await;
        assert!(matches!(result, Err(TransportError::Unsupported(_))));
    }
}
