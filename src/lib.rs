//! Embeddable asynchronous HTTP/1.1 server library.
//!
//! The crate accepts an already-established byte stream (plain TCP, TLS, or
//! anything else implementing [`Transport`](connection::Transport)), parses
//! one HTTP/1.1 request at a time and exposes the exchange to the application
//! as a byte-oriented [`Transaction`](connection::Transaction). The library
//! frames the response (fixed-length or chunked, with trailers), drains any
//! unread request body on finalization and keeps the connection alive for the
//! next request when the protocol allows it.
//!
//! # Example
//!
//! ```rust, no_run
//! use h1serve::{make_handler, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = tracing_subscriber::FmtSubscriber::new();
//!     tracing::subscriber::set_global_default(subscriber).expect("set subscriber");
//!
//!     let server = Server::builder()
//!         .address("127.0.0.1:3000")
//!         .route(
//!             "/hello",
//!             make_handler(|tx: &mut h1serve::Transaction| {
//!                 Box::pin(async move {
//!                     tx.set_response_status(200);
//!                     tx.response_headers_mut().insert("Content-Type", "text/plain");
//!                     tx.write(b"Hello").await?;
//!                     tx.finish().await
//!                 })
//!             }),
//!         )
//!         .build()
//!         .expect("server config");
//!
//!     server.start().await.expect("server run");
//! }
//! ```

extern crate core;

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod server;

pub use connection::{HttpConnection, Stream, Transaction, Transport};
pub use handler::{make_handler, Dispatcher, Handler, HandlerFn, HandlerFuture};
pub use protocol::{HeaderMap, HttpError, RequestHead, ResponseHead};
pub use server::{Server, ServerBuildError, ServerBuilder, ShutdownHandle};

/// Upper bound on the buffered request head (request line, headers, chunk
/// metadata) before the parser gives up on a connection.
pub const DEFAULT_MAX_HEAD_BYTES: usize = 10 * 1024 * 1024;

pub(crate) use help::ensure;

mod help {

    macro_rules! ensure {
        ($predicate:expr, $error:expr) => {
            if !$predicate {
                return Err($error);
            }
        };
    }
    pub(crate) use ensure;
}
