//! Local transport: file handles, `file://` URLs and in-memory blobs.

use std::path::Path;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::audio::{AudioSource, BlobHandle};
use crate::error::TransportError;
use crate::transport::{ProgressEvent, ProgressSink, Transport};

/// Default read size per progress step.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Reads local payloads in chunks, reporting progress per chunk.
#[derive(Debug, Clone)]
pub struct FileTransport {
    chunk_size: usize,
}

impl FileTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `chunk_size` bytes per progress event (at least one).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn read_path(
        &self,
        path: &Path,
        progress: &ProgressSink,
    ) -> Result<Bytes, TransportError> {
        let mut file = File::open(path).await?;
        let total = file.metadata().await?.len();

        let mut body = BytesMut::with_capacity(total as usize);
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            let read = file.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
            progress.emit(ProgressEvent::new(body.len() as u64, Some(total)));
        }

        debug!(path = %path.display(), bytes = body.len(), "file read complete");
        Ok(body.freeze())
    }

    /// Blobs are already in memory: one progress event, then the bytes.
    pub fn read_blob(&self, blob: &BlobHandle, progress: &ProgressSink) -> Bytes {
        let len = blob.len() as u64;
        progress.emit(ProgressEvent::new(len, Some(len)));
        blob.bytes()
    }
}

impl Default for FileTransport {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(
        &self,
        source: &AudioSource,
        progress: &ProgressSink,
    ) -> Result<Bytes, TransportError> {
        match source {
            AudioSource::File(handle) => self.read_path(handle.path(), progress).await,
            AudioSource::Blob(blob) => Ok(self.read_blob(blob, progress)),
            AudioSource::Url(url) if url.url().scheme() == "file" => {
                let path = url
                    .url()
                    .to_file_path()
                    .map_err(|_| TransportError::Unsupported(url.as_str().to_string()))?;
                self.read_path(&path, progress).await
            }
            AudioSource::Url(url) => Err(TransportError::Unsupported(url.as_str().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::sync::mpsc;

    fn temp_file_with(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_read_file_handle_with_progress() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let file = temp_file_with(&payload);
        let transport = FileTransport::with_chunk_size(300);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let bytes = transport
            .fetch(
                &AudioSource::file(file.path()),
                &ProgressSink::new(Some(tx), None),
            )
            .await
            .unwrap();

        assert_eq!(bytes.as_ref(), payload.as_slice());

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(!events.is_empty());
        assert!(events.windows(2).all(|w| w[0].loaded < w[1].loaded));
        assert_eq!(events.last().unwrap(), &ProgressEvent::new(1000, Some(1000)));
    }

    #[tokio::test]
    async fn test_read_file_url() {
        let file = temp_file_with(b"RIFF");
        let url = url::Url::from_file_path(file.path()).unwrap();
        let source = AudioSource::url(url.as_str()).unwrap();

        let bytes = FileTransport::new()
            .fetch(&source, &ProgressSink::none())
            .await
            .unwrap();

        assert_eq!(bytes.as_ref(), b"RIFF");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = AudioSource::file(dir.path().join("missing.wav"));

        let result = FileTransport::new()
            .fetch(&source, &ProgressSink::none())
            .await;

        assert!(matches!(result, Err(TransportError::Io(_))));
    }

    #[tokio::test]
    async fn test_read_blob_single_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let source = AudioSource::blob(vec![1u8, 2, 3]);

        let bytes = FileTransport::new()
            .fetch(&source, &ProgressSink::new(Some(tx), None))
            .await
            .unwrap();

        assert_eq!(bytes.as_ref(), &[1, 2, 3]);
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::new(3, Some(3)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rejects_http_url() {
        let source = AudioSource::url("https://host/a.wav").unwrap();
        let result = FileTransport::new()
            .fetch(&source, &ProgressSink::none())
            .await;
        assert!(matches!(result, Err(TransportError::Unsupported(_))));
    }
}
