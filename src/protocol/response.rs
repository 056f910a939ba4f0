//! Response descriptor.

use crate::protocol::HeaderMap;

/// The mutable response state of a transaction.
///
/// The handler may adjust status, headers and trailers freely until the first
/// body byte is written; after that the head has been emitted and further
/// header changes no longer reach the wire. Trailers are emitted only when
/// the response ends up chunked.
#[derive(Debug, Default)]
pub struct ResponseHead {
    status: u16,
    headers: HeaderMap,
    trailers: HeaderMap,
}

impl ResponseHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status code; zero until the handler sets it. Must be at least 100
    /// by the time the transaction is finalized.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn trailers(&self) -> &HeaderMap {
        &self.trailers
    }

    pub fn trailers_mut(&mut self) -> &mut HeaderMap {
        &mut self.trailers
    }
}

/// Reason phrase for a status code (RFC 7231 subset); unknown codes get an
/// empty reason.
pub(crate) fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason()).unwrap_or("")
}
