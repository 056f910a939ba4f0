//! Request handlers and path dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::connection::Transaction;
use crate::protocol::HttpError;

/// Boxed future returned by closure-based handlers; borrows the transaction
/// for the duration of the response.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>>;

/// An application request handler.
///
/// The handler owns the transaction for the duration of the response: it may
/// read the request body, set status/headers/trailers, write payload bytes
/// and must eventually call [`Transaction::finish`] (the connection loop
/// finalizes on its behalf if it forgets).
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, tx: &mut Transaction) -> Result<(), HttpError>;
}

/// Adapter turning a closure into a [`Handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Transaction) -> HandlerFuture<'a> + Send + Sync,
{
    async fn handle(&self, tx: &mut Transaction) -> Result<(), HttpError> {
        (self.f)(tx).await
    }
}

/// Wraps a closure as a handler:
///
/// ```rust, no_run
/// # use h1serve::{make_handler, Transaction};
/// let handler = make_handler(|tx: &mut Transaction| {
///     Box::pin(async move {
///         tx.set_response_status(200);
///         tx.write(b"ok").await?;
///         tx.finish().await
///     })
/// });
/// ```
pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Transaction) -> HandlerFuture<'a> + Send + Sync,
{
    HandlerFn { f }
}

/// Maps request paths to handlers, with a default for everything else.
///
/// Lookup is by exact match on the decoded request path, performed once per
/// transaction after the head is parsed. The built-in default emits a small
/// `404 Not Found` page.
pub struct Dispatcher {
    routes: HashMap<String, Box<dyn Handler>>,
    default_handler: Box<dyn Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), default_handler: Box::new(NotFoundHandler) }
    }

    pub fn with_default(handler: impl Handler + 'static) -> Self {
        Self { routes: HashMap::new(), default_handler: Box::new(handler) }
    }

    pub fn add_route(&mut self, path: impl Into<String>, handler: impl Handler + 'static) {
        self.routes.insert(path.into(), Box::new(handler));
    }

    pub fn set_default(&mut self, handler: impl Handler + 'static) {
        self.default_handler = Box::new(handler);
    }

    pub async fn dispatch(&self, tx: &mut Transaction) -> Result<(), HttpError> {
        match self.routes.get(tx.request_path()) {
            Some(handler) => handler.handle(tx).await,
            None => self.default_handler.handle(tx).await,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Handler for Dispatcher {
    async fn handle(&self, tx: &mut Transaction) -> Result<(), HttpError> {
        self.dispatch(tx).await
    }
}

struct NotFoundHandler;

const NOT_FOUND_BODY: &str = "<html><body><h1>404 Not Found</h1></body></html>\n";

#[async_trait]
impl Handler for NotFoundHandler {
    async fn handle(&self, tx: &mut Transaction) -> Result<(), HttpError> {
        tx.set_response_status(404);
        tx.response_headers_mut().insert("Content-Type", "text/html");
        tx.response_headers_mut().insert("Content-Length", NOT_FOUND_BODY.len().to_string());
        tx.write(NOT_FOUND_BODY.as_bytes()).await?;
        tx.finish().await
    }
}
