//! Error type for HTTP transaction processing.
//!
//! Request-side parse failures each carry a stable numeric identifier so that
//! embedding applications can match on them across library versions (see
//! [`HttpError::code`]). Transport-origin errors (end-of-file, aborted
//! operations, system errors) pass through as [`HttpError::Io`] unchanged.

use std::io;
use thiserror::Error;

/// All error conditions surfaced by the transaction engine.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request line did not match `TOKEN SP TARGET SP HTTP/x.y`.
    #[error("invalid request line")]
    InvalidRequestLine,

    /// A header (or trailer) line was malformed or had an empty name.
    #[error("invalid request header")]
    InvalidRequestHeader,

    /// The request line named an HTTP version other than 1.1.
    #[error("unsupported HTTP version: {version}")]
    UnsupportedHttpVersion { version: String },

    /// The `Content-Length` header was not a non-negative integer.
    #[error("invalid Content-Length: {reason}")]
    InvalidContentLength { reason: String },

    /// A chunk-size line did not start with hexadecimal digits.
    #[error("invalid chunk length: {reason}")]
    InvalidChunkLength { reason: String },

    /// The CRLF expected after a chunk body was not an empty line.
    #[error("invalid chunk delimiter")]
    InvalidChunkDelimiter,

    /// The request head grew past the configured bound before terminating.
    #[error("request head exceeds the limit of {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// Transport error, passed through from the underlying stream.
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HttpError {
    /// Creates a new UnsupportedHttpVersion error
    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedHttpVersion { version: version.to_string() }
    }

    /// Creates a new InvalidContentLength error
    pub fn invalid_content_length<S: ToString>(reason: S) -> Self {
        Self::InvalidContentLength { reason: reason.to_string() }
    }

    /// Creates a new InvalidChunkLength error
    pub fn invalid_chunk_length<S: ToString>(reason: S) -> Self {
        Self::InvalidChunkLength { reason: reason.to_string() }
    }

    /// Creates a new I/O error
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Stable numeric identifier of a parse error, per the library's own
    /// error category. Transport and bound errors have no stable number.
    pub fn code(&self) -> Option<u8> {
        match self {
            HttpError::InvalidRequestLine => Some(1),
            HttpError::InvalidRequestHeader => Some(2),
            HttpError::UnsupportedHttpVersion { .. } => Some(3),
            HttpError::InvalidContentLength { .. } => Some(4),
            HttpError::InvalidChunkLength { .. } => Some(5),
            HttpError::InvalidChunkDelimiter => Some(6),
            HttpError::HeadTooLarge { .. } | HttpError::Io { .. } => None,
        }
    }

    /// True for errors originating in the request parser (as opposed to the
    /// transport).
    pub fn is_parse_error(&self) -> bool {
        self.code().is_some()
    }
}
