//! Identity provider configuration.

use alloc::string::String;
use apphub_network::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};

use crate::store::{FINGERPRINT_KEY, USER_ID_KEY};

/// Default registration endpoint, relative to the page origin.
pub const DEFAULT_ENDPOINT: &str = "/api/fingerprint";

/// Configuration for [`IdentityProvider`](crate::IdentityProvider).
///
/// Every field is optional when deserialized; missing fields take their
/// default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Registration endpoint URL
    pub endpoint: String,
    /// Storage key for the user id
    pub user_id_key: String,
    /// Storage key for the fingerprint
    pub fingerprint_key: String,
    /// Registration request timeout in milliseconds (0 disables it)
    pub timeout_ms: u32,
    /// Send cookies with the registration request
    pub include_credentials: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            user_id_key: String::from(USER_ID_KEY),
            fingerprint_key: String::from(FINGERPRINT_KEY),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            include_credentials: true,
        }
    }
}

impl IdentityConfig {
    /// Use a different registration endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different request timeout.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
