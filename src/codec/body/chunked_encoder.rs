//! Encoder for HTTP chunked transfer encoding
//! ([RFC 7230 §4.1](https://tools.ietf.org/html/rfc7230#section-4.1)).
//!
//! Each payload fragment is framed as its size in hexadecimal, CRLF, the
//! data, CRLF. The EOF item emits the zero-length terminating chunk; the
//! trailer block that may follow it is appended by the caller, since trailers
//! belong to the response state rather than to the payload stream.

use crate::protocol::{HttpError, PayloadItem};
use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Stateful chunk framer for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedEncoder {
    /// Set once the terminating zero-length chunk has been emitted
    eof: bool,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false }
    }

    /// True once the terminating chunk has been written; further items are
    /// ignored.
    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl Default for ChunkedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<PayloadItem> for ChunkedEncoder {
    type Error = HttpError;

    fn encode(&mut self, item: PayloadItem, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(bytes) => {
                if bytes.is_empty() {
                    return Ok(());
                }
                write!(helper::Writer(dst), "{:x}\r\n", bytes.len()).map_err(HttpError::io)?;
                dst.reserve(bytes.len() + 2);
                dst.extend_from_slice(&bytes);
                dst.extend_from_slice(b"\r\n");
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.extend_from_slice(b"0\r\n");
                Ok(())
            }
        }
    }
}

/// Adapts `BytesMut` to `io::Write` so the hex chunk size can be formatted
/// with `write!`.
mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
