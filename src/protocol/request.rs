//! Request descriptor.
//!
//! Populated once by the head parser and immutable afterwards. The raw
//! request target is kept verbatim in `resource`; `path` and `fragment` are
//! the percent-decoded components and `query` the decoded parameter map.

use std::collections::HashMap;

use crate::protocol::HeaderMap;

/// The parsed head of one HTTP/1.1 request.
#[derive(Debug, Default)]
pub struct RequestHead {
    method: String,
    version: String,
    resource: String,
    path: String,
    fragment: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
}

impl RequestHead {
    pub(crate) fn new(
        method: String,
        version: String,
        resource: String,
        path: String,
        fragment: String,
        query: HashMap<String, String>,
        headers: HeaderMap,
    ) -> Self {
        Self { method, version, resource, path, fragment, query, headers }
    }

    /// The method token from the request line.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Always `HTTP/1.1`; other versions fail parsing.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The original request target, undecoded.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Decoded path component of the request target.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded fragment component, empty when absent.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Decoded query parameters. Parameters without an `=` sign are absent.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Request headers as received, including any trailers merged in after a
    /// chunked body completed.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.headers.get_or(name, default)
    }
}
