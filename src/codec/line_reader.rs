//! Buffered line extraction from a transport stream.
//!
//! The reader pulls bytes from a [`Stream`] into an internal buffer until a
//! requested delimiter (CRLF or CRLFCRLF) is present, then hands out single
//! CRLF-terminated lines without touching the wire again while the buffer
//! lasts. Overread bytes stay buffered; body reads consume them before going
//! back to the wire, and whatever is left at the end of a transaction is
//! returned to the transport's putback buffer for the next request.
//!
//! The buffer is bounded: a head that grows past `max_head_bytes` without
//! producing the requested delimiter fails the connection.

use std::cmp;
use std::io;

use bytes::{Buf, BytesMut};

use crate::connection::Stream;
use crate::protocol::HttpError;

pub(crate) const CRLF: &[u8] = b"\r\n";
pub(crate) const CRLF_CRLF: &[u8] = b"\r\n\r\n";

const FILL_CHUNK_BYTES: usize = 4 * 1024;

pub struct LineReader {
    stream: Stream,
    buffer: BytesMut,
    max_head_bytes: usize,
    total_loaded: u64,
}

impl LineReader {
    pub fn new(stream: Stream, max_head_bytes: usize) -> Self {
        Self { stream, buffer: BytesMut::new(), max_head_bytes, total_loaded: 0 }
    }

    /// Whether any byte has ever been loaded from the stream. Used to tell a
    /// connection idling shut from one dying mid-request.
    pub fn saw_bytes(&self) -> bool {
        self.total_loaded > 0
    }

    /// Reads until `delim` is present in the buffer.
    pub async fn load_until(&mut self, delim: &[u8]) -> Result<(), HttpError> {
        loop {
            if find(&self.buffer, delim).is_some() {
                return Ok(());
            }
            crate::ensure!(
                self.buffer.len() < self.max_head_bytes,
                HttpError::HeadTooLarge { limit: self.max_head_bytes }
            );
            self.fill().await?;
        }
    }

    /// Consumes one CRLF-terminated line and returns the bytes before the
    /// delimiter. Reads from the stream only if the buffer holds no complete
    /// line yet.
    pub async fn get_line(&mut self) -> Result<String, HttpError> {
        loop {
            if let Some(pos) = find(&self.buffer, CRLF) {
                let line = self.buffer.split_to(pos);
                self.buffer.advance(CRLF.len());
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            crate::ensure!(
                self.buffer.len() < self.max_head_bytes,
                HttpError::HeadTooLarge { limit: self.max_head_bytes }
            );
            self.fill().await?;
        }
    }

    /// Reads at most `buf.len()` bytes, serving buffered overread before the
    /// wire. Returns 0 only on a wire end-of-file with nothing buffered.
    pub async fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.buffer.is_empty() {
            let n = cmp::min(buf.len(), self.buffer.len());
            buf[..n].copy_from_slice(&self.buffer[..n]);
            self.buffer.advance(n);
            return Ok(n);
        }
        self.stream.read_some(buf).await
    }

    /// Bytes currently buffered past what the parser consumed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Pushes all buffered overread back into the transport so the next
    /// transaction on the same stream sees it.
    pub fn restore_overread(&mut self) {
        if !self.buffer.is_empty() {
            self.stream.put_back(&self.buffer);
            self.buffer.clear();
        }
    }

    pub fn stream_mut(&mut self) -> &mut Stream {
        &mut self.stream
    }

    pub fn into_stream(mut self) -> Stream {
        self.restore_overread();
        self.stream
    }

    async fn fill(&mut self) -> Result<(), HttpError> {
        let mut chunk = [0u8; FILL_CHUNK_BYTES];
        let n = self.stream.read_some(&mut chunk).await?;
        if n == 0 {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed while reading request head",
            )));
        }
        self.buffer.extend_from_slice(&chunk[..n]);
        self.total_loaded += n as u64;
        Ok(())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
