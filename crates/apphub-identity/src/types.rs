//! Identity types.

use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Length of the short id shown in the UI.
pub const SHORT_ID_LEN: usize = 8;

/// Result of a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque user id issued by the server
    pub user_id: String,
    /// Fingerprint the server associated with the user
    pub fingerprint: String,
    /// Whether the server created a new user for this fingerprint
    pub is_new_user: bool,
}

/// How the current identity was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityOrigin {
    /// Read back from local storage (returning device)
    Cached,
    /// Obtained from the server on this visit
    Registered {
        /// Server created a new user
        is_new_user: bool,
    },
}

/// The identity of the current device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id
    pub user_id: String,
    /// Stored fingerprint; may be absent for a cached identity
    pub fingerprint: Option<String>,
    /// Where the identity came from
    pub origin: IdentityOrigin,
}

impl Identity {
    /// Identity read back from storage.
    pub fn cached(user_id: impl Into<String>, fingerprint: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            fingerprint,
            origin: IdentityOrigin::Cached,
        }
    }

    /// First [`SHORT_ID_LEN`] characters of the user id.
    pub fn short_id(&self) -> &str {
        match self.user_id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.user_id[..idx],
            None => &self.user_id,
        }
    }

    /// Whether a resource created by `creator_id` belongs to this identity.
    pub fn owns(&self, creator_id: &str) -> bool {
        !creator_id.is_empty() && self.user_id == creator_id
    }

    /// Whether the server created a brand new user on this visit.
    pub fn is_new_user(&self) -> bool {
        matches!(self.origin, IdentityOrigin::Registered { is_new_user: true })
    }
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        Self {
            user_id: record.user_id,
            fingerprint: Some(record.fingerprint),
            origin: IdentityOrigin::Registered {
                is_new_user: record.is_new_user,
            },
        }
    }
}

/// What the presentation layer should show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentityState {
    /// An identity is available
    Identified(Identity),
    /// No identity; features that need ownership are disabled
    Guest {
        /// Why no identity is available
        reason: String,
    },
}

impl IdentityState {
    /// The identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityState::Identified(identity) => Some(identity),
            IdentityState::Guest { .. } => None,
        }
    }

    /// Whether the presentation layer is in guest mode.
    pub fn is_guest(&self) -> bool {
        matches!(self, IdentityState::Guest { .. })
    }

    /// Label for the user badge: `"User 1a2b3c4d"` or `"Guest"`.
    pub fn display_label(&self) -> String {
        match self {
            IdentityState::Identified(identity) => format!("User {}", identity.short_id()),
            IdentityState::Guest { .. } => String::from("Guest"),
        }
    }
}
