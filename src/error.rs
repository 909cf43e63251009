//! Error types for the audio loader
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Transport Error ==
/// Failure reported by a transport while fetching raw bytes.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Server answered with anything other than 200 OK
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    /// Request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Local file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source kind this transport does not handle
    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

impl TransportError {
    /// Creates a request error from a reqwest error.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        Self::Request(error.to_string())
    }

    /// Returns the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// == Decode Error ==
/// Failure reported by a decoder that rejected the fetched bytes.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Container or codec not recognized
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    /// Bytes were recognized but malformed
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Decoder backend failure
    #[error("Decoder error: {0}")]
    Backend(String),
}

// == Load Error ==
/// Terminal error of a single `load` call.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Transport failed or returned a non-success status
    #[error("Loading Error: {0}")]
    Loading(#[source] TransportError),

    /// Decoder rejected the bytes
    #[error("Decoding Error: {0}")]
    Decoding(#[source] DecodeError),

    /// Source value could not be turned into a loadable source
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl LoadError {
    /// True for failures raised by the transport.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadError::Loading(_))
    }

    /// True for failures raised by the decoder.
    pub fn is_decoding(&self) -> bool {
        matches!(self, LoadError::Decoding(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the audio loader.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_error_display() {
        let err = LoadError::Loading(TransportError::HttpStatus {
            status: 404,
            url: "http://host/a.wav".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Loading Error: HTTP 404 for URL: http://host/a.wav"
        );
        assert!(err.is_loading());
        assert!(!err.is_decoding());
    }

    #[test]
    fn test_decoding_error_display() {
        let err = LoadError::Decoding(DecodeError::InvalidData("bad header".into()));
        assert_eq!(err.to_string(), "Decoding Error: Invalid data: bad header");
        assert!(err.is_decoding());
    }

    #[test]
    fn test_transport_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TransportError = io_err.into();
        assert!(matches!(err, TransportError::Io(_)));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_status_code() {
        let err = TransportError::HttpStatus {
            status: 500,
            url: "http://host".to_string(),
        };
        assert_eq!(err.status_code(), Some(500));
    }
}
