//! Per-connection keep-alive loop.
//!
//! An `HttpConnection` owns an accepted transport and sequences transactions
//! on it: parse the head, dispatch to the handler, await finalization, then
//! decide between starting the next transaction and closing. At most one
//! transaction exists per transport at any time.

use std::sync::Arc;

use tracing::{error, info};

use crate::connection::{Stream, Transaction, Transport};
use crate::handler::Handler;
use crate::protocol::HttpError;
use crate::DEFAULT_MAX_HEAD_BYTES;

pub struct HttpConnection {
    stream: Option<Stream>,
    max_head_bytes: usize,
}

impl HttpConnection {
    pub fn new<T: Transport + 'static>(io: T) -> Self {
        Self { stream: Some(Stream::new(io)), max_head_bytes: DEFAULT_MAX_HEAD_BYTES }
    }

    /// Overrides the request-head size bound for this connection.
    pub fn with_max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }

    /// Serves transactions until the connection is no longer reusable.
    ///
    /// Returns `Ok(())` on a clean end (keep-alive refused, or the peer
    /// closed an idle connection); parse and transport failures are logged
    /// and returned after the stream is abandoned.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => return Ok(()),
        };

        loop {
            let mut tx = Transaction::new(stream, self.max_head_bytes);

            // A zero-byte read forces the head parse so the handler sees a
            // populated request descriptor.
            if let Err(e) = tx.read(&mut []).await {
                if !tx.saw_request_bytes() {
                    info!("peer closed idle connection");
                    return Ok(());
                }
                error!(cause = %e, "failed to read request head, closing connection");
                return Err(e);
            }

            if tx.request_header("Expect", "").starts_with("100-") {
                tx.send_provisional(100).await?;
                info!("received expect request header, sent continue response");
            }

            if let Err(e) = handler.handle(&mut tx).await {
                error!(cause = %e, "handler failed, closing connection after response");
                if !tx.response_committed() {
                    tx.set_response_status(500);
                }
                tx.finish().await?;
                return Ok(());
            }

            // The handler normally finalizes; this keeps the framing sound
            // when it forgot.
            if !tx.is_finished() {
                tx.finish().await?;
            }

            if !reuse_allowed(&tx) {
                let mut stream = tx.into_stream();
                let _ = stream.shutdown().await;
                return Ok(());
            }

            // The putback buffer may already hold the head of the next
            // request.
            stream = tx.into_stream();
        }
    }
}

/// Keep-alive rule: reuse unless the response switched protocols or either
/// side asked for `Connection: close`.
fn reuse_allowed(tx: &Transaction) -> bool {
    tx.response_status() != 101
        && !wants_close(tx.request_headers().get("Connection"))
        && !wants_close(tx.response_headers().get("Connection"))
}

fn wants_close(value: Option<&str>) -> bool {
    value
        .map(|v| v.split(',').any(|token| token.trim().eq_ignore_ascii_case("close")))
        .unwrap_or(false)
}
