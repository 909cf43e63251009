//! Audio Source Module
//!
//! Identity of a payload to load: a URL, a local file handle or an in-memory blob.
//!
//! Equality is identity, not content. URLs compare by their string value;
//! file and blob handles compare by handle, so two handles pointing at the
//! same bytes are different sources.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use url::Url;

use crate::error::LoadError;

/// URL schemes a source may use.
const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

// == URL Source ==
/// A validated absolute URL.
#[derive(Debug, Clone)]
pub struct UrlSource {
    raw: String,
    parsed: Url,
}

impl UrlSource {
    /// The string the source was created from; this is its cache identity.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl PartialEq for UrlSource {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

// == File Handle ==
/// Handle to a local file. Clones share identity.
#[derive(Debug, Clone)]
pub struct FileHandle {
    path: Arc<PathBuf>,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.path, &other.path)
    }
}

// == Blob Handle ==
/// Handle to bytes already in memory. Clones share identity.
#[derive(Debug, Clone)]
pub struct BlobHandle {
    data: Arc<Bytes>,
}

impl BlobHandle {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: Arc::new(data.into()),
        }
    }

    pub fn bytes(&self) -> Bytes {
        Bytes::clone(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PartialEq for BlobHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

// == Audio Source ==
/// Caller-supplied identity of a payload to load.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    Url(UrlSource),
    File(FileHandle),
    Blob(BlobHandle),
}

impl AudioSource {
    /// Parses a URL source.
    ///
    /// Only absolute `http`, `https` and `file` URLs are accepted.
    pub fn url(raw: impl Into<String>) -> Result<Self, LoadError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(LoadError::InvalidSource("empty URL".to_string()));
        }
        let parsed = Url::parse(&raw)
            .map_err(|e| LoadError::InvalidSource(format!("{}: {}", raw, e)))?;
        if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
            return Err(LoadError::InvalidSource(format!(
                "unsupported scheme '{}' in {}",
                parsed.scheme(),
                raw
            )));
        }
        Ok(Self::Url(UrlSource { raw, parsed }))
    }

    /// Creates a source backed by a new file handle.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileHandle::new(path))
    }

    /// Creates a source backed by a new in-memory blob handle.
    pub fn blob(data: impl Into<Bytes>) -> Self {
        Self::Blob(BlobHandle::new(data))
    }
}

impl From<FileHandle> for AudioSource {
    fn from(handle: FileHandle) -> Self {
        Self::File(handle)
    }
}

impl From<BlobHandle> for AudioSource {
    fn from(handle: BlobHandle) -> Self {
        Self::Blob(handle)
    }
}

impl TryFrom<&str> for AudioSource {
    type Error = LoadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::url(value)
    }
}

impl TryFrom<String> for AudioSource {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::url(value)
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Url(url) => write!(f, "{}", url.as_str()),
            AudioSource::File(file) => write!(f, "file:{}", file.path().display()),
            AudioSource::Blob(blob) => write!(f, "blob:{} bytes", blob.len()),
        }
    }
}
