//! TCP server wiring: listener, accept loop, graceful stop.
//!
//! This is the convenience front end; hosts with their own acceptor (or a TLS
//! acceptor) can skip it and feed accepted streams straight into
//! [`HttpConnection`](crate::connection::HttpConnection).

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::{Dispatcher, Handler};
use crate::DEFAULT_MAX_HEAD_BYTES;

pub struct ServerBuilder {
    dispatcher: Dispatcher,
    address: Option<io::Result<Vec<SocketAddr>>>,
    max_head_bytes: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { dispatcher: Dispatcher::new(), address: None, max_head_bytes: DEFAULT_MAX_HEAD_BYTES }
    }

    /// Listener endpoint candidates; the first address that binds is used.
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(|addrs| addrs.collect()));
        self
    }

    /// Maps an exact request path to a handler.
    pub fn route(mut self, path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.dispatcher.add_route(path, handler);
        self
    }

    /// Replaces the built-in 404 default handler.
    pub fn default_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.dispatcher.set_default(handler);
        self
    }

    /// Replaces the whole dispatcher (routes and default).
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let addresses = match self.address {
            None => return Err(ServerBuildError::MissingAddress),
            Some(Err(source)) => return Err(ServerBuildError::InvalidAddress { source }),
            Some(Ok(addresses)) if addresses.is_empty() => {
                return Err(ServerBuildError::MissingAddress)
            }
            Some(Ok(addresses)) => addresses,
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Server {
            dispatcher: Arc::new(self.dispatcher),
            addresses,
            max_head_bytes: self.max_head_bytes,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("address did not resolve: {source}")]
    InvalidAddress {
        #[source]
        source: io::Error,
    },
}

/// Stops the accept loop of the [`Server`] it came from. In-flight
/// connections are allowed to drain; only new accepts are cancelled.
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

pub struct Server {
    dispatcher: Arc<Dispatcher>,
    addresses: Vec<SocketAddr>,
    max_head_bytes: usize,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// A handle that ends the accept loop when stopped; grab it before
    /// calling [`start`](Server::start).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle { shutdown_tx: self.shutdown_tx.clone() }
    }

    /// Binds the listener and serves connections until stopped. Each accepted
    /// connection runs on its own task, which owns all I/O for that stream.
    pub async fn start(self) -> io::Result<()> {
        info!(addresses = ?self.addresses, "start listening");
        let listener = TcpListener::bind(self.addresses.as_slice()).await?;

        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("stop requested, no longer accepting connections");
                        return Ok(());
                    }
                }

                accepted = listener.accept() => {
                    let (tcp_stream, remote_addr) = match accepted {
                        Ok(stream_and_addr) => stream_and_addr,
                        Err(e) => {
                            warn!(cause = %e, "failed to accept");
                            continue;
                        }
                    };

                    let dispatcher = self.dispatcher.clone();
                    let max_head_bytes = self.max_head_bytes;
                    tokio::spawn(async move {
                        let connection =
                            HttpConnection::new(tcp_stream).with_max_head_bytes(max_head_bytes);
                        match connection.process(dispatcher).await {
                            Ok(()) => {
                                info!(%remote_addr, "finished processing, connection shutdown")
                            }
                            Err(e) => {
                                error!(%remote_addr, cause = %e, "connection failed, shutdown")
                            }
                        }
                    });
                }
            }
        }
    }
}
