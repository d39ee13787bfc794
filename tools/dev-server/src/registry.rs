//! In-memory device registry.
//!
//! Maps the server fingerprint (SHA-256 over the submitted signals) to the
//! user id issued the first time that fingerprint was seen. Contents are
//! lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use apphub_fingerprint::SignalSet;
use apphub_identity::IdentityRecord;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Server-side fingerprint: lowercase hex SHA-256 of the signals concatenated
/// without separators.
///
/// The concatenation order differs from the wire order; it is kept so ids
/// issued by earlier deployments still match.
pub fn server_fingerprint(signals: &SignalSet) -> String {
    let mut hasher = Sha256::new();
    for part in [
        &signals.user_agent,
        &signals.screen_resolution,
        &signals.timezone,
        &signals.language,
        &signals.platform,
        &signals.plugins,
        &signals.canvas_fingerprint,
        &signals.webgl_fingerprint,
    ] {
        hasher.update(part.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Fingerprint to user id table.
#[derive(Default)]
pub struct Registry {
    users: Mutex<HashMap<String, String>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or create the user for `signals`.
    pub fn register(&self, signals: &SignalSet) -> IdentityRecord {
        let fingerprint = server_fingerprint(signals);
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(user_id) = users.get(&fingerprint) {
            return IdentityRecord {
                user_id: user_id.clone(),
                fingerprint,
                is_new_user: false,
            };
        }

        let user_id = Uuid::new_v4().to_string();
        users.insert(fingerprint.clone(), user_id.clone());
        IdentityRecord {
            user_id,
            fingerprint,
            is_new_user: true,
        }
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
