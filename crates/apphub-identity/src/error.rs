//! Error types for the identity layer.

use alloc::string::String;
use apphub_network::NetworkError;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Errors from the local key/value store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, sandboxed frame)
    Unavailable,
    /// Storage quota exceeded
    QuotaExceeded,
    /// Other error with description
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => f.write_str("local storage unavailable"),
            StorageError::QuotaExceeded => f.write_str("local storage quota exceeded"),
            StorageError::Other(msg) => write!(f, "local storage error: {}", msg),
        }
    }
}

/// Errors from device registration.
///
/// Every variant means "identity unavailable"; callers degrade to guest
/// mode and may retry later. Nothing is persisted when one is returned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegistrationError {
    /// The request could not be completed
    Network(NetworkError),
    /// The server answered with a non-2xx status
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, if any
        message: Option<String>,
    },
    /// The server answered `success: false`
    Rejected(String),
    /// The response body was not the expected JSON
    MalformedResponse(String),
    /// Signals could not be encoded
    Encode(String),
    /// The identity could not be persisted
    Storage(StorageError),
}

impl RegistrationError {
    /// Create a rejection error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Message supplied by the server, when the server supplied one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RegistrationError::Rejected(msg) => Some(msg),
            RegistrationError::HttpStatus {
                message: Some(msg), ..
            } => Some(msg),
            _ => None,
        }
    }

    /// Whether the server was never reached (or never answered).
    pub fn is_network(&self) -> bool {
        matches!(self, RegistrationError::Network(_))
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Network(e) => write!(f, "registration request failed: {}", e),
            RegistrationError::HttpStatus {
                status,
                message: Some(msg),
            } => write!(f, "registration failed with status {}: {}", status, msg),
            RegistrationError::HttpStatus {
                status,
                message: None,
            } => write!(f, "registration failed with status {}", status),
            RegistrationError::Rejected(msg) => write!(f, "registration rejected: {}", msg),
            RegistrationError::MalformedResponse(msg) => {
                write!(f, "malformed registration response: {}", msg)
            }
            RegistrationError::Encode(msg) => write!(f, "could not encode signals: {}", msg),
            RegistrationError::Storage(e) => write!(f, "could not persist identity: {}", e),
        }
    }
}

impl From<NetworkError> for RegistrationError {
    fn from(e: NetworkError) -> Self {
        RegistrationError::Network(e)
    }
}

impl From<StorageError> for RegistrationError {
    fn from(e: StorageError) -> Self {
        RegistrationError::Storage(e)
    }
}
