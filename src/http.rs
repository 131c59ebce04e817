//! Request and response projections at the framework boundary.
//!
//! Sigward does not own the HTTP types of the embedding framework. The
//! caller builds an [`IncomingRequest`] view per inbound request and hands
//! the verifier a [`ResponseSink`] it can write a denial into. On success
//! the sink is never touched.

use std::collections::HashMap;

/// Read-only projection of an inbound request.
///
/// Header names are matched case-insensitively; the map may carry them in
/// whatever case the framework preserves.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// HTTP method as received (e.g., `GET`).
    pub method: String,

    /// Request URL or path, exactly as the gateway's signer saw it.
    pub url: String,

    /// Header name to value mapping.
    pub headers: HashMap<String, String>,
}

impl IncomingRequest {
    /// Build a request view.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header (chainable, test- and demo-friendly).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header value, ignoring ASCII case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Writable response surface the verifier uses for denials.
///
/// `write_body` is terminal: after the verifier calls it the caller must
/// not write the response again.
pub trait ResponseSink {
    /// Set the HTTP status code.
    fn set_status(&mut self, status: u16);

    /// Set a response header.
    fn set_header(&mut self, name: &str, value: &str);

    /// Write the body and finish the response.
    fn write_body(&mut self, body: &str);
}

/// In-memory [`ResponseSink`] for tests and simple embeddings.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    /// Status code, if one was set.
    pub status: Option<u16>,

    /// Headers set on the response.
    pub headers: HashMap<String, String>,

    /// Body, if one was written.
    pub body: Option<String>,
}

impl BufferedResponse {
    /// Create an empty response buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything was written to this response.
    pub fn touched(&self) -> bool {
        self.status.is_some() || !self.headers.is_empty() || self.body.is_some()
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    fn write_body(&mut self, body: &str) {
        self.body = Some(body.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = IncomingRequest::new("GET", "/orders")
            .with_header("X-Custom-Header", "value");
        assert_eq!(req.header("x-custom-header"), Some("value"));
        assert_eq!(req.header("X-CUSTOM-HEADER"), Some("value"));
        assert_eq!(req.header("x-other"), None);
    }

    #[test]
    fn buffered_response_starts_untouched() {
        let res = BufferedResponse::new();
        assert!(!res.touched());
    }

    #[test]
    fn buffered_response_records_writes() {
        let mut res = BufferedResponse::new();
        res.set_status(400);
        res.set_header("content-type", "application/json");
        res.write_body("{}");

        assert!(res.touched());
        assert_eq!(res.status, Some(400));
        assert_eq!(
            res.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(res.body.as_deref(), Some("{}"));
    }
}
