//! The outbound request record that authenticators mutate.

use std::collections::HashMap;

use bytes::Bytes;

/// MIME type of the GraphBinary v4 serializer, sent by default by the driver.
pub const GRAPH_BINARY_V4_MIME: &str = "application/vnd.graphbinary-v4.0";

/// An in-flight request to a Gremlin server.
///
/// Header names are kept exactly as the caller (or signer) wrote them, so
/// `authorization` and `Authorization` are distinct keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GremlinRequest {
    /// Request headers, keyed by case-sensitive name.
    pub headers: HashMap<String, String>,
    /// Serialized request body.
    pub payload: Bytes,
    /// Absolute URL of the Gremlin endpoint.
    pub url: String,
}

impl GremlinRequest {
    /// Create a request with no headers.
    pub fn new(url: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            headers: HashMap::new(),
            payload: payload.into(),
            url: url.into(),
        }
    }

    /// Create a request that declares GraphBinary v4 as both its content type
    /// and its accepted response type.
    ///
    /// # Examples
    ///
    /// ```
    /// use gremlin_auth::request::{GRAPH_BINARY_V4_MIME, GremlinRequest};
    ///
    /// let request = GremlinRequest::graph_binary("https://localhost:8182/gremlin", Vec::new());
    /// assert_eq!(request.header("content-type"), Some(GRAPH_BINARY_V4_MIME));
    /// assert_eq!(request.header("accept"), Some(GRAPH_BINARY_V4_MIME));
    /// ```
    pub fn graph_binary(url: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self::new(url, payload)
            .with_header("content-type", GRAPH_BINARY_V4_MIME)
            .with_header("accept", GRAPH_BINARY_V4_MIME)
    }

    /// Set a header and return the request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header by its exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
