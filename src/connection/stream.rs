//! Transport abstraction.
//!
//! The HTTP engine is parameterized over a capability set, not a concrete
//! socket type: any full-duplex byte stream that is readable, writable and
//! sendable across task boundaries qualifies. Plain `TcpStream` and
//! TLS-wrapped streams (e.g. `tokio-rustls`) both satisfy [`Transport`]
//! without further glue; a TLS implementation performs its handshake before
//! handing the stream over, and its `shutdown` sends the ordered close.
//!
//! Concurrent operations on one stream are ordered by ownership: all I/O for
//! a connection is driven by that connection's task and every wire operation
//! takes `&mut Stream`, so framing bytes and payload bytes can never
//! interleave.

use std::io;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Capability set required of a byte stream carrying HTTP/1.1 traffic.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// A transport plus a putback buffer for overread bytes.
///
/// Bytes handed back via [`put_back`](Stream::put_back) are served by
/// subsequent reads before the wire is touched, which is how a pipelined next
/// request survives the end of the transaction that overread it.
pub struct Stream {
    io: Box<dyn Transport>,
    putback: BytesMut,
}

impl Stream {
    pub fn new<T: Transport + 'static>(io: T) -> Self {
        Self { io: Box::new(io), putback: BytesMut::new() }
    }

    /// Reads at least one byte unless the stream is at end-of-file, serving
    /// the putback buffer first. Returns 0 on a non-empty `buf` only at EOF.
    pub async fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.putback.is_empty() {
            let n = buf.len().min(self.putback.len());
            buf[..n].copy_from_slice(&self.putback[..n]);
            self.putback.advance(n);
            return Ok(n);
        }
        self.io.read(buf).await
    }

    /// Writes the whole buffer.
    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.io.write_all(buf).await?;
        self.io.flush().await
    }

    /// Prepends bytes to the putback buffer.
    pub fn put_back(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.putback.is_empty() {
            self.putback.extend_from_slice(bytes);
        } else {
            let mut joined = BytesMut::with_capacity(bytes.len() + self.putback.len());
            joined.extend_from_slice(bytes);
            joined.extend_from_slice(&self.putback);
            self.putback = joined;
        }
    }

    /// Orderly shutdown of the write direction (TLS close-notify for TLS
    /// transports).
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.io.shutdown().await
    }
}
