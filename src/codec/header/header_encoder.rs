//! Emission of the response head and of header-shaped field blocks.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{reason_phrase, HeaderMap, HttpError, ResponseHead};

const INIT_HEAD_SIZE: usize = 4 * 1024;

/// Encodes the status line and the response header block, terminated by an
/// empty line. Header name spelling is emitted exactly as the caller set it;
/// unknown status codes get an empty reason phrase.
pub struct HeaderEncoder;

impl<'a> Encoder<&'a ResponseHead> for HeaderEncoder {
    type Error = HttpError;

    fn encode(&mut self, head: &'a ResponseHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEAD_SIZE);
        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(head.status().to_string().as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(reason_phrase(head.status()).as_bytes());
        dst.put_slice(b"\r\n");

        encode_field_block(head.headers(), dst);
        Ok(())
    }
}

/// Writes each field as `Name: Value\r\n` followed by the terminating empty
/// line. Shared by the response head and the chunked trailer block.
pub(crate) fn encode_field_block(fields: &HeaderMap, dst: &mut BytesMut) {
    for (name, value) in fields.iter() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

/// Writes a `HTTP/1.1 <code> <reason>` provisional block (status line plus
/// empty line, no headers), used for 1xx responses.
pub(crate) fn encode_provisional(status: u16, dst: &mut BytesMut) {
    dst.put_slice(b"HTTP/1.1 ");
    dst.put_slice(status.to_string().as_bytes());
    dst.put_slice(b" ");
    dst.put_slice(reason_phrase(status).as_bytes());
    dst.put_slice(b"\r\n\r\n");
}
