//! The identity provider.
//!
//! One provider is constructed per page session. It owns the signal source,
//! the store and the transport, and remembers the identity it resolved so
//! the UI can ask for it synchronously afterwards.
//!
//! # Returning vs. new device
//!
//! [`IdentityProvider::identify`] reads the stored user id first. When one
//! is present it is returned without collecting signals or touching the
//! network. Otherwise the device is registered and the result persisted, so
//! the next call short-circuits.
//!
//! There is no deduplication of concurrent calls: two `identify()` futures
//! polled before the first one persists will both register. Callers drive a
//! single initialization per page.

use alloc::format;
use alloc::string::String;
use core::cell::RefCell;

use apphub_fingerprint::SignalSource;
use apphub_network::Transport;

use crate::config::IdentityConfig;
use crate::error::{RegistrationError, StorageError};
use crate::registration::{build_request, parse_response};
use crate::store::KeyValueStore;
use crate::types::{Identity, IdentityRecord, IdentityState};

/// Sink for diagnostic messages (`console.log` in the browser).
pub type DebugSink = fn(&str);

fn discard(_: &str) {}

/// Resolves and caches the anonymous identity of this device.
pub struct IdentityProvider<C, S, T> {
    config: IdentityConfig,
    signals: C,
    store: S,
    transport: T,
    current: RefCell<Option<Identity>>,
    debug: DebugSink,
}

impl<C, S, T> IdentityProvider<C, S, T>
where
    C: SignalSource,
    S: KeyValueStore,
    T: Transport,
{
    /// Create a provider. Nothing is read or sent until the first call.
    pub fn new(config: IdentityConfig, signals: C, store: S, transport: T) -> Self {
        Self {
            config,
            signals,
            store,
            transport,
            current: RefCell::new(None),
            debug: discard,
        }
    }

    /// Report progress through `sink`.
    pub fn with_debug(mut self, sink: DebugSink) -> Self {
        self.debug = sink;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// The signal source.
    pub fn signals(&self) -> &C {
        &self.signals
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The backing transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// User id persisted by an earlier registration.
    pub fn stored_user_id(&self) -> Option<String> {
        self.store
            .get(&self.config.user_id_key)
            .filter(|id| !id.is_empty())
    }

    /// Fingerprint persisted by an earlier registration.
    pub fn stored_fingerprint(&self) -> Option<String> {
        self.store
            .get(&self.config.fingerprint_key)
            .filter(|fp| !fp.is_empty())
    }

    /// Identity resolved by the last successful [`identify`](Self::identify).
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Return the stored identity, or register this device.
    ///
    /// On error nothing is persisted and the current identity is unchanged.
    pub async fn identify(&self) -> Result<Identity, RegistrationError> {
        if let Some(user_id) = self.stored_user_id() {
            (self.debug)(&format!(
                "[apphub-identity] returning device, user_id={}",
                user_id
            ));
            let identity = Identity::cached(user_id, self.stored_fingerprint());
            *self.current.borrow_mut() = Some(identity.clone());
            return Ok(identity);
        }

        let record = self.register_device().await?;
        let identity = Identity::from(record);
        *self.current.borrow_mut() = Some(identity.clone());
        Ok(identity)
    }

    /// Resolve the identity, degrading to guest mode on failure.
    ///
    /// Safe to call again after a failure; each call is one attempt.
    pub async fn initialize(&self) -> IdentityState {
        match self.identify().await {
            Ok(identity) => IdentityState::Identified(identity),
            Err(e) => {
                (self.debug)(&format!(
                    "[apphub-identity] identity unavailable, continuing as guest: {}",
                    e
                ));
                IdentityState::Guest {
                    reason: format!("{}", e),
                }
            }
        }
    }

    /// Register this device unconditionally and persist the result.
    ///
    /// Collects a fresh signal set, posts it, and writes the user id and
    /// fingerprint to the store. Prefer [`identify`](Self::identify), which
    /// skips registration for a returning device.
    pub async fn register_device(&self) -> Result<IdentityRecord, RegistrationError> {
        let signals = self.signals.collect();
        (self.debug)(&format!(
            "[apphub-identity] registering device, local fingerprint={}",
            signals.fingerprint()
        ));

        let request = build_request(&self.config, &signals)?;
        let response = self.transport.send(request).await;
        let record = match parse_response(response) {
            Ok(record) => record,
            Err(e) => {
                (self.debug)(&format!("[apphub-identity] registration failed: {}", e));
                return Err(e);
            }
        };

        self.persist(&record)?;
        (self.debug)(&format!(
            "[apphub-identity] registered user_id={}, new_user={}",
            record.user_id, record.is_new_user
        ));
        Ok(record)
    }

    /// Forget the stored identity; the next call registers again.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.config.user_id_key)?;
        self.store.remove(&self.config.fingerprint_key)?;
        *self.current.borrow_mut() = None;
        Ok(())
    }

    /// Write both keys, or neither.
    ///
    /// The user id is written last: its presence is what marks a returning
    /// device, so a fingerprint left behind by a failed rollback is inert.
    fn persist(&self, record: &IdentityRecord) -> Result<(), StorageError> {
        self.store.set(&self.config.fingerprint_key, &record.fingerprint)?;
        if let Err(e) = self.store.set(&self.config.user_id_key, &record.user_id) {
            (self.debug)(&format!(
                "[apphub-identity] could not persist user id: {}",
                e
            ));
            if let Err(cleanup) = self.store.remove(&self.config.fingerprint_key) {
                (self.debug)(&format!(
                    "[apphub-identity] could not roll back fingerprint: {}",
                    cleanup
                ));
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use apphub_fingerprint::SignalSet;
    use apphub_network::testing::ScriptedTransport;

    fn provider(store: MemoryStore) -> IdentityProvider<SignalSet, MemoryStore, ScriptedTransport> {
        IdentityProvider::new(
            IdentityConfig::default(),
            SignalSet::default(),
            store,
            ScriptedTransport::new(),
        )
    }

    fn record() -> IdentityRecord {
        IdentityRecord {
            user_id: "u1".into(),
            fingerprint: "f1".into(),
            is_new_user: true,
        }
    }

    #[test]
    fn test_stored_accessors() {
        let store = MemoryStore::new();
        store.set("apphub_user_id", "u9").unwrap();
        store.set("apphub_fingerprint", "").unwrap();
        let provider = provider(store);

        assert_eq!(provider.stored_user_id().as_deref(), Some("u9"));
        assert!(provider.stored_fingerprint().is_none());
        assert!(provider.current_identity().is_none());
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let store = MemoryStore::new();
        store.set("apphub_user_id", "u9").unwrap();
        store.set("apphub_fingerprint", "f9").unwrap();
        let provider = provider(store);

        provider.clear().unwrap();
        assert!(provider.store().is_empty());
    }

    #[test]
    fn test_persist_fingerprint_failure_writes_nothing() {
        let store = MemoryStore::new().failing_on("apphub_fingerprint");
        let provider = provider(store);

        assert_eq!(provider.persist(&record()), Err(StorageError::QuotaExceeded));
        assert!(provider.store().is_empty());
    }

    #[test]
    fn test_persist_user_id_failure_rolls_back_fingerprint() {
        let store = MemoryStore::new().failing_on("apphub_user_id");
        let provider = provider(store);

        assert_eq!(provider.persist(&record()), Err(StorageError::QuotaExceeded));
        assert!(provider.store().is_empty());
    }

    #[test]
    fn test_failed_rollback_never_leaves_user_id() {
        let store = MemoryStore::new()
            .failing_on("apphub_user_id")
            .failing_removes();
        let provider = provider(store);

        assert!(provider.persist(&record()).is_err());
        assert!(provider.stored_user_id().is_none());
        assert_eq!(provider.stored_fingerprint().as_deref(), Some("f1"));
    }
}
