//! Response body framing.
//!
//! Identity (`Content-Length`) payloads go to the wire unmodified, so only
//! the chunked strategy needs an encoder. The request-body decode side is
//! line-oriented and lives with the transaction, which walks chunk headers
//! and delimiters through the [`LineReader`](crate::codec::LineReader).

mod chunked_encoder;

pub use chunked_encoder::ChunkedEncoder;
