//! One request/response exchange on a transport.
//!
//! A [`Transaction`] owns the per-exchange state: the parsed request head,
//! the body-read bookkeeping (`request_remaining`, `chunks_pending`), and the
//! response framing state committed at the first body write. The application
//! treats it as an I/O object: read the request body, mutate the response
//! descriptor, write payload bytes, and finally call [`finish`].
//!
//! Reads are lazy: the first read on a fresh transaction (even a zero-byte
//! one) runs the head parser, so the connection loop can force the request
//! descriptor into existence before dispatching. Body reads hide the
//! delimitation protocol: for chunked bodies the chunk delimiters, chunk-size
//! lines and the final trailer block are traversed transparently, with
//! trailers merged into the request headers.
//!
//! [`finish`]: Transaction::finish

use std::cmp;
use std::io;
use std::time::SystemTime;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::codec::body::ChunkedEncoder;
use crate::codec::header::{
    encode_field_block, encode_provisional, parse_chunk_size, parse_header_line,
    parse_request_line, split_target, HeaderEncoder,
};
use crate::codec::{LineReader, CRLF_CRLF};
use crate::connection::Stream;
use crate::ensure;
use crate::protocol::{
    HeaderMap, HttpError, PayloadItem, PayloadSize, RequestHead, ResponseHead,
};

/// Bounce-buffer size for draining an unread request body at finalization.
const DRAIN_CHUNK_BYTES: usize = 64 * 1024;

pub struct Transaction {
    reader: LineReader,

    request: RequestHead,
    head_parsed: bool,
    head_failed: bool,
    /// Unread bytes of the current body segment (the whole body for
    /// Content-Length, the current chunk for chunked).
    request_remaining: u64,
    /// A chunked body is in progress; `request_remaining` then refers to the
    /// current chunk.
    chunks_pending: bool,

    response: ResponseHead,
    response_bytes_written: u64,
    response_chunked: bool,
    /// Status/method combination that must not carry a message body
    /// (1xx, 204, 304, or a HEAD request).
    body_forbidden: bool,
    head_flushed: bool,
    chunked_encoder: ChunkedEncoder,
    finished: bool,
}

impl Transaction {
    /// Binds a transaction to a stream. Most applications go through
    /// [`HttpConnection`](crate::connection::HttpConnection) instead, which
    /// also runs the keep-alive loop.
    pub fn new(stream: Stream, max_head_bytes: usize) -> Self {
        Self {
            reader: LineReader::new(stream, max_head_bytes),
            request: RequestHead::default(),
            head_parsed: false,
            head_failed: false,
            request_remaining: 0,
            chunks_pending: false,
            response: ResponseHead::new(),
            response_bytes_written: 0,
            response_chunked: false,
            body_forbidden: false,
            head_flushed: false,
            chunked_encoder: ChunkedEncoder::new(),
            finished: false,
        }
    }

    // ---- request accessors ----

    pub fn request(&self) -> &RequestHead {
        &self.request
    }

    pub fn request_method(&self) -> &str {
        self.request.method()
    }

    pub fn request_version(&self) -> &str {
        self.request.version()
    }

    pub fn request_resource(&self) -> &str {
        self.request.resource()
    }

    pub fn request_path(&self) -> &str {
        self.request.path()
    }

    pub fn request_fragment(&self) -> &str {
        self.request.fragment()
    }

    pub fn request_query(&self) -> &std::collections::HashMap<String, String> {
        self.request.query()
    }

    pub fn request_headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn request_header<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.request.header(name, default)
    }

    // ---- response accessors ----

    pub fn response(&self) -> &ResponseHead {
        &self.response
    }

    pub fn response_status(&self) -> u16 {
        self.response.status()
    }

    pub fn set_response_status(&mut self, status: u16) {
        self.response.set_status(status);
    }

    pub fn response_headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        self.response.headers_mut()
    }

    pub fn response_trailers_mut(&mut self) -> &mut HeaderMap {
        self.response.trailers_mut()
    }

    /// True once the status line and headers have reached the wire; the
    /// response descriptor is frozen from this point on.
    pub fn response_committed(&self) -> bool {
        self.head_flushed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether any byte of this request was ever received. False means the
    /// peer closed the connection while it was idle.
    pub(crate) fn saw_request_bytes(&self) -> bool {
        self.reader.saw_bytes()
    }

    /// Recovers the stream for the next transaction; buffered overread is
    /// pushed back first.
    pub fn into_stream(self) -> Stream {
        self.reader.into_stream()
    }

    // ---- request body ----

    /// Reads request body bytes into `buf`.
    ///
    /// The first call parses the request head if that has not happened yet;
    /// a zero-length `buf` performs only that. Returns `Ok(0)` at the end of
    /// the body. Parse failures surface here with their specific error kind;
    /// an end-of-file mid-body is an `UnexpectedEof` I/O error.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, HttpError> {
        if !self.head_parsed {
            self.parse_head().await?;
        }
        if buf.is_empty() {
            return Ok(0);
        }
        self.read_body(buf).await
    }

    async fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, HttpError> {
        if self.request_remaining == 0 {
            return Ok(0);
        }

        let want = cmp::min(self.request_remaining, buf.len() as u64) as usize;
        let n = self.reader.read_some(&mut buf[..want]).await?;
        if n == 0 {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed mid request body",
            )));
        }
        self.request_remaining -= n as u64;

        // Crossing a chunk boundary: consume the CRLF after the chunk body,
        // then the next chunk-size line (which, at zero, also takes the
        // trailers).
        if self.chunks_pending && self.request_remaining == 0 {
            self.read_chunk_delimiter().await?;
            self.read_chunk_header().await?;
        }

        Ok(n)
    }

    // ---- head parsing ----

    async fn parse_head(&mut self) -> Result<(), HttpError> {
        if self.head_failed {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::InvalidData,
                "request head already failed to parse",
            )));
        }
        match self.parse_head_inner().await {
            Ok(()) => {
                self.head_parsed = true;
                Ok(())
            }
            Err(e) => {
                self.head_failed = true;
                Err(e)
            }
        }
    }

    async fn parse_head_inner(&mut self) -> Result<(), HttpError> {
        // Pull the whole head into the buffer so the per-line phase below
        // runs without wire I/O. This is also where the head bound bites.
        self.reader.load_until(CRLF_CRLF).await?;

        let line = self.reader.get_line().await?;
        let (method, target, version) = parse_request_line(&line)?;
        let (path, query, fragment) = split_target(target);
        let (method, version, resource) =
            (method.to_string(), version.to_string(), target.to_string());

        let mut headers = HeaderMap::new();
        loop {
            let line = self.reader.get_line().await?;
            if line.is_empty() {
                break;
            }
            let (name, value) = parse_header_line(&line)?;
            headers.append(name, value);
        }

        self.request = RequestHead::new(method, version, resource, path, fragment, query, headers);

        match body_size(self.request.headers())? {
            PayloadSize::Chunked => {
                self.chunks_pending = true;
                self.request_remaining = 0;
                self.read_chunk_header().await?;
            }
            PayloadSize::Length(length) => self.request_remaining = length,
            PayloadSize::Empty => self.request_remaining = 0,
        }

        Ok(())
    }

    async fn read_chunk_header(&mut self) -> Result<(), HttpError> {
        debug_assert!(self.chunks_pending && self.request_remaining == 0);
        let line = self.reader.get_line().await?;
        let size = parse_chunk_size(&line)?;
        self.request_remaining = size;
        if size == 0 {
            self.chunks_pending = false;
            self.read_trailers().await?;
        }
        Ok(())
    }

    async fn read_chunk_delimiter(&mut self) -> Result<(), HttpError> {
        let line = self.reader.get_line().await?;
        ensure!(line.is_empty(), HttpError::InvalidChunkDelimiter);
        Ok(())
    }

    /// Trailers use header syntax and semantics; they coalesce into the
    /// request header map.
    async fn read_trailers(&mut self) -> Result<(), HttpError> {
        loop {
            let line = self.reader.get_line().await?;
            if line.is_empty() {
                return Ok(());
            }
            let (name, value) = parse_header_line(&line)?;
            self.request.headers_mut().append(name, value);
        }
    }

    // ---- response ----

    /// Writes `buf` as response payload, framing it according to the
    /// commitment made on the first write (status line and headers are
    /// emitted then). Returns the number of payload bytes accepted, which is
    /// always `buf.len()`. A zero-length write carries no body byte and
    /// commits nothing.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, HttpError> {
        if self.finished {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "transaction already finished",
            )));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.head_parsed {
            self.parse_head().await?;
        }

        let mut out = BytesMut::new();
        if !self.head_flushed {
            self.commit_framing(buf.len());
            HeaderEncoder.encode(&self.response, &mut out)?;
            self.head_flushed = true;
        }

        if self.body_forbidden {
            // Framing bookkeeping only; no payload bytes may follow the head.
        } else if self.response_chunked {
            self.chunked_encoder.encode(PayloadItem::Chunk(Bytes::copy_from_slice(buf)), &mut out)?;
        } else {
            out.extend_from_slice(buf);
        }
        self.response_bytes_written += buf.len() as u64;

        if !out.is_empty() {
            self.reader.stream_mut().write_all(&out).await?;
        }
        Ok(buf.len())
    }

    /// Emits a `1xx` provisional status block without committing body
    /// framing. The response descriptor may be rewritten afterwards and the
    /// real response sent as usual; [`finish`](Transaction::finish) stays the
    /// single terminal operation.
    pub async fn send_provisional(&mut self, status: u16) -> Result<(), HttpError> {
        if !(100..200).contains(&status) {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "provisional status must be 1xx",
            )));
        }
        if self.head_flushed {
            return Err(HttpError::io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "response framing already committed",
            )));
        }
        let mut out = BytesMut::new();
        encode_provisional(status, &mut out);
        self.reader.stream_mut().write_all(&out).await?;
        Ok(())
    }

    /// Concludes the exchange: drains whatever the handler left unread so the
    /// connection is positioned at the next request, returns overread to the
    /// transport, and emits the response terminator (zero chunk plus trailer
    /// block when chunked; the header block itself when nothing was written).
    ///
    /// On a drain failure the error is surfaced and the connection must not
    /// be reused.
    pub async fn finish(&mut self) -> Result<(), HttpError> {
        if self.finished {
            warn!("finish called on an already finished transaction");
            return Ok(());
        }
        if !self.head_parsed {
            self.parse_head().await?;
        }

        // 1. Drain unread request body.
        if self.request_remaining > 0 {
            let mut bounce = vec![0u8; DRAIN_CHUNK_BYTES];
            while self.request_remaining > 0 {
                let want = cmp::min(self.request_remaining, bounce.len() as u64) as usize;
                self.read_body(&mut bounce[..want]).await?;
            }
        }
        debug_assert!(!self.chunks_pending);

        // 2. Return overread (a pipelined successor's prefix) to the
        //    transport.
        self.reader.restore_overread();

        // 3. Terminate the response.
        let mut out = BytesMut::new();
        if !self.head_flushed {
            self.commit_framing(0);
            if !self.body_forbidden
                && !self.response_chunked
                && self.response_bytes_written == 0
                && !self.response.headers().contains("Content-Length")
            {
                self.response.headers_mut().insert("Content-Length", "0");
            }
            HeaderEncoder.encode(&self.response, &mut out)?;
            self.head_flushed = true;
        }
        if self.response_chunked {
            self.chunked_encoder.encode(PayloadItem::Eof, &mut out)?;
            encode_field_block(self.response.trailers(), &mut out);
        }
        if !out.is_empty() {
            self.reader.stream_mut().write_all(&out).await?;
        }

        self.finished = true;
        Ok(())
    }

    /// Decides the response framing. Runs exactly once, at the first write or
    /// at finalization, whichever comes first.
    fn commit_framing(&mut self, first_write_len: usize) {
        if self.response.status() < 100 {
            warn!(status = self.response.status(), "response status not set before commit");
        }

        if !self.response.headers().contains("Date") {
            self.response
                .headers_mut()
                .insert("Date", httpdate::fmt_http_date(SystemTime::now()));
        }

        let status = self.response.status();
        if (100..200).contains(&status)
            || status == 204
            || status == 304
            || self.request.method() == "HEAD"
        {
            self.body_forbidden = true;
            // A Transfer-Encoding header without chunk framing behind it
            // would mis-frame the connection; Content-Length, if present,
            // is emitted verbatim.
            self.response.headers_mut().remove("Transfer-Encoding");
            return;
        }

        let forced_chunked = self
            .response
            .headers()
            .get("Transfer-Encoding")
            .map(|te| !te.eq_ignore_ascii_case("identity"))
            .unwrap_or(false);

        if forced_chunked {
            self.response_chunked = true;
            self.response.headers_mut().remove("Content-Length");
        } else if !self.response.headers().contains("Content-Length") && first_write_len > 0 {
            self.response_chunked = true;
            self.response.headers_mut().insert("Transfer-Encoding", "chunked");
        }
    }
}

/// Body-length decision for a parsed head: a non-identity `Transfer-Encoding`
/// selects chunked and wins over `Content-Length`, whose value is then never
/// parsed.
fn body_size(headers: &HeaderMap) -> Result<PayloadSize, HttpError> {
    if let Some(te) = headers.get("Transfer-Encoding") {
        if !te.eq_ignore_ascii_case("identity") {
            return Ok(PayloadSize::Chunked);
        }
    }

    match headers.get("Content-Length") {
        Some(value) => {
            let length = value
                .trim()
                .parse::<u64>()
                .map_err(|_| HttpError::invalid_content_length(value))?;
            if length == 0 {
                Ok(PayloadSize::Empty)
            } else {
                Ok(PayloadSize::Length(length))
            }
        }
        None => Ok(PayloadSize::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_HEAD_BYTES;
    use indoc::indoc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn zero_byte_read_forces_head_parse() {
        let request = indoc! {"
            GET /search?q=rust+http&page=2#results HTTP/1.1\r
            Host: example.com\r
            Accept: text/html\r
            Accept: application/xml\r
            \r
        "};
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request.as_bytes()).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        assert_eq!(tx.read(&mut []).await.unwrap(), 0);

        assert_eq!(tx.request_method(), "GET");
        assert_eq!(tx.request_version(), "HTTP/1.1");
        assert_eq!(tx.request_path(), "/search");
        assert_eq!(tx.request_fragment(), "results");
        assert_eq!(tx.request_query().get("q").map(String::as_str), Some("rust http"));
        assert_eq!(tx.request_query().get("page").map(String::as_str), Some("2"));
        assert_eq!(tx.request_header("host", ""), "example.com");
        assert_eq!(tx.request_header("ACCEPT", ""), "text/html, application/xml");
    }

    #[tokio::test]
    async fn content_length_body_then_eof() {
        let request = b"PUT /f HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        let mut buf = [0u8; 16];
        let mut body = Vec::new();
        loop {
            let n = tx.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        assert_eq!(&body, b"abcd");
        // End of body is sticky.
        assert_eq!(tx.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn chunked_body_merges_trailers() {
        let request = b"POST /echo HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
                        5\r\nhello\r\n6\r\n world\r\n0\r\nX-Digest: xyz\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        let mut buf = [0u8; 4];
        let mut body = Vec::new();
        loop {
            let n = tx.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        assert_eq!(&body, b"hello world");
        assert_eq!(tx.request_header("x-digest", ""), "xyz");
    }

    #[tokio::test]
    async fn transfer_encoding_wins_over_content_length() {
        let request = b"POST /u HTTP/1.1\r\nContent-Length: 9999\r\nTransfer-Encoding: chunked\r\n\r\n\
                        3\r\nabc\r\n0\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        let mut buf = [0u8; 16];
        let n = tx.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"abc");
        assert_eq!(tx.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_chunk_length_surfaces_on_read() {
        let request = b"POST /u HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        let mut buf = [0u8; 16];
        match tx.read(&mut buf).await {
            Err(HttpError::InvalidChunkLength { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_chunk_delimiter_is_rejected() {
        let request = b"POST /u HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
                        5\r\nhelloXX\r\n0\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        let mut buf = [0u8; 16];
        match tx.read(&mut buf).await {
            Err(HttpError::InvalidChunkDelimiter) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn finish_drains_unread_body_and_restores_pipelined_bytes() {
        let request = b"POST /u HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcdNEXT";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.set_response_status(204);
        tx.finish().await.unwrap();

        let mut stream = tx.into_stream();
        let mut buf = [0u8; 16];
        let mut seen = Vec::new();
        while seen.len() < 4 {
            let n = stream.read_some(&mut buf).await.unwrap();
            assert!(n > 0);
            seen.extend_from_slice(&buf[..n]);
        }
        assert_eq!(&seen, b"NEXT");
    }

    #[tokio::test]
    async fn first_write_commits_chunked_and_flushes_head() {
        let request = b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.set_response_status(200);
        tx.response_headers_mut().insert("Content-Type", "text/plain");
        tx.write(b"Hello").await.unwrap();
        assert!(tx.response_committed());
        tx.finish().await.unwrap();
        drop(tx);

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8(response).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Date: "));
        assert!(text.contains("Transfer-Encoding: chunked\r\n"));
        assert!(text.ends_with("\r\n\r\n5\r\nHello\r\n0\r\n\r\n"));
    }

    #[tokio::test]
    async fn finish_without_writes_emits_content_length_zero() {
        let request = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.set_response_status(200);
        tx.finish().await.unwrap();
        drop(tx);

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8(response).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(!text.contains("Transfer-Encoding"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn head_request_emits_bookkeeping_only() {
        let request = b"HEAD /big HTTP/1.1\r\nHost: x\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.set_response_status(200);
        tx.response_headers_mut().insert("Content-Length", "1000");
        tx.write(b"this body must not appear").await.unwrap();
        tx.finish().await.unwrap();
        drop(tx);

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8(response).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 1000\r\n"));
        assert!(!text.contains("Transfer-Encoding"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn trailers_follow_the_terminating_chunk() {
        let request = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.set_response_status(200);
        tx.response_trailers_mut().insert("X-Checksum", "abc123");
        tx.write(b"data").await.unwrap();
        tx.finish().await.unwrap();
        drop(tx);

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8(response).unwrap();

        assert!(text.ends_with("4\r\ndata\r\n0\r\nX-Checksum: abc123\r\n\r\n"));
    }

    #[tokio::test]
    async fn provisional_does_not_commit_framing() {
        let request = b"POST /u HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 2\r\n\r\nok";
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(request).await.unwrap();
        client.shutdown().await.unwrap();

        let mut tx = Transaction::new(Stream::new(server), DEFAULT_MAX_HEAD_BYTES);
        tx.read(&mut []).await.unwrap();
        tx.send_provisional(100).await.unwrap();
        assert!(!tx.response_committed());

        tx.set_response_status(200);
        tx.write(b"done").await.unwrap();
        tx.finish().await.unwrap();
        drop(tx);

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8(response).unwrap();

        assert!(text.starts_with("HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("4\r\ndone\r\n0\r\n\r\n"));
    }
}
