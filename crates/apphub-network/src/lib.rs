//! Network types for AppHub
//!
//! This crate provides the HTTP request/response types exchanged with the
//! identity backend, and the [`Transport`] seam that performs them.
//!
//! # Architecture
//!
//! ```text
//! IdentityProvider
//!        │
//!        │ HttpRequest (JSON body, credentials)
//!        ▼
//! ┌─────────────────┐
//! │    Transport    │  ◄── FetchTransport in the browser,
//! │     (trait)     │      ScriptedTransport in tests
//! └────────┬────────┘
//!          │
//!          │ window.fetch()
//!          ▼
//! ┌─────────────────┐
//! │ Identity server │
//! └─────────────────┘
//! ```
//!
//! The transport never interprets response bodies. A non-2xx status is still
//! an `Ok(HttpSuccess)`; only failures to complete the exchange are
//! `Err(NetworkError)`.

#![no_std]

extern crate alloc;

pub mod testing;
mod transport;

pub use transport::Transport;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

// =============================================================================
// HTTP Method
// =============================================================================

/// HTTP request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP POST
    Post,
}

impl HttpMethod {
    /// Method name as expected by the fetch API.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

// =============================================================================
// HTTP Request
// =============================================================================

/// HTTP request handed to a [`Transport`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL, absolute or relative to the page origin
    pub url: String,
    /// Request headers as key-value pairs
    pub headers: Vec<(String, String)>,
    /// Request body (optional)
    pub body: Option<Vec<u8>>,
    /// Request timeout in milliseconds (0 disables the timeout)
    pub timeout_ms: u32,
    /// Send cookies with the request (fetch `credentials: "include"`)
    #[serde(default)]
    pub include_credentials: bool,
}

impl HttpRequest {
    /// Create a new POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            include_credentials: false,
        }
    }

    /// Set JSON body and Content-Type header.
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Type".into(), "application/json".into()));
        self.body = Some(body);
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set timeout in milliseconds.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Include cookies/credentials for session continuity.
    pub fn with_credentials(mut self, include: bool) -> Self {
        self.include_credentials = include;
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// HTTP Response
// =============================================================================

/// Outcome of a request performed by a [`Transport`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Result of the HTTP request
    pub result: Result<HttpSuccess, NetworkError>,
}

impl HttpResponse {
    /// Create a completed response.
    pub fn ok(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            result: Ok(HttpSuccess {
                status,
                headers,
                body,
            }),
        }
    }

    /// Create a completed JSON response.
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::ok(
            status,
            alloc::vec![("Content-Type".into(), "application/json".into())],
            body.into(),
        )
    }

    /// Create an error response.
    pub fn err(error: NetworkError) -> Self {
        Self { result: Err(error) }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        match &self.result {
            Ok(success) => success.is_success(),
            Err(_) => false,
        }
    }
}

/// Data of a completed HTTP exchange.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSuccess {
    /// HTTP status code (200, 404, etc.)
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpSuccess {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Network Error
// =============================================================================

/// Errors that prevent an HTTP exchange from completing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkError {
    /// Failed to establish connection
    ConnectionFailed,
    /// Request timed out
    Timeout,
    /// Invalid URL format
    InvalidUrl,
    /// Request aborted before completion
    Aborted,
    /// No transport available in this environment (e.g. no `window`)
    ServiceUnavailable,
    /// Other error with description
    Other(String),
}

impl NetworkError {
    /// Convert to a user-friendly error message.
    pub fn message(&self) -> &str {
        match self {
            NetworkError::ConnectionFailed => "Failed to connect",
            NetworkError::Timeout => "Request timed out",
            NetworkError::InvalidUrl => "Invalid URL",
            NetworkError::Aborted => "Request aborted",
            NetworkError::ServiceUnavailable => "Network unavailable",
            NetworkError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
