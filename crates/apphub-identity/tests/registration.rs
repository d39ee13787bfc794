//! Identity Registration Integration Tests
//!
//! Drives `IdentityProvider` against an in-memory store and a scripted
//! transport, covering the returning-device short-circuit, failure handling
//! and guest-mode degradation.

use std::cell::{Cell, RefCell};

use apphub_fingerprint::testing::{FakeSurfaces, StaticEnvironment};
use apphub_fingerprint::{RendererInfo, SignalCollector, SignalSet, CANVAS_NOT_SUPPORTED};
use apphub_identity::testing::MemoryStore;
use apphub_identity::{
    IdentityConfig, IdentityOrigin, IdentityProvider, IdentityState, KeyValueStore,
    RegistrationError, SignalSource, StorageError,
};
use apphub_network::testing::ScriptedTransport;
use apphub_network::{HttpMethod, HttpResponse, NetworkError};

const REGISTERED: &str =
    r#"{"success":true,"user_id":"u123","fingerprint":"ab12","is_new_user":true}"#;

fn signals() -> SignalSet {
    SignalSet {
        user_agent: "Mozilla/5.0".into(),
        language: "en-US".into(),
        platform: "Linux x86_64".into(),
        screen_resolution: "1920x1080".into(),
        timezone: "UTC".into(),
        plugins: "PDF Viewer".into(),
        canvas_fingerprint: "5e918d2".into(),
        webgl_fingerprint: "b66d64e".into(),
    }
}

/// Signal source that reports a different screen on every collection.
#[derive(Default)]
struct CountingSource {
    calls: Cell<u32>,
}

impl CountingSource {
    fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl SignalSource for CountingSource {
    fn collect(&self) -> SignalSet {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        SignalSet {
            screen_resolution: format!("{}x1080", 1900 + n),
            ..signals()
        }
    }
}

fn provider_with(
    transport: ScriptedTransport,
) -> IdentityProvider<SignalSet, MemoryStore, ScriptedTransport> {
    IdentityProvider::new(
        IdentityConfig::default(),
        signals(),
        MemoryStore::new(),
        transport,
    )
}

// =========================================================================
// New device
// =========================================================================

#[tokio::test]
async fn test_new_device_registers_and_persists() {
    let provider = provider_with(
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );

    let identity = provider.identify().await.unwrap();
    assert_eq!(identity.user_id, "u123");
    assert_eq!(identity.fingerprint.as_deref(), Some("ab12"));
    assert_eq!(identity.origin, IdentityOrigin::Registered { is_new_user: true });

    assert_eq!(provider.store().get("apphub_user_id").as_deref(), Some("u123"));
    assert_eq!(provider.store().get("apphub_fingerprint").as_deref(), Some("ab12"));
    assert_eq!(provider.current_identity(), Some(identity));
}

#[tokio::test]
async fn test_request_carries_signal_set_and_credentials() {
    let provider = provider_with(
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );
    provider.identify().await.unwrap();

    let requests = provider.transport().requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "/api/fingerprint");
    assert!(request.include_credentials);
    assert_eq!(request.header("Content-Type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    let mut expected = SignalSet::FIELD_NAMES.to_vec();
    expected.sort();
    let mut keys_sorted = keys.clone();
    keys_sorted.sort();
    assert_eq!(keys_sorted, expected);
    assert_eq!(body["timezone"], "UTC");
}

#[tokio::test]
async fn test_collector_sentinels_reach_the_server() {
    let collector = SignalCollector::new(StaticEnvironment::default(), FakeSurfaces::unsupported());
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        collector,
        MemoryStore::new(),
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );
    provider.identify().await.unwrap();

    let request = &provider.transport().requests()[0];
    let body: SignalSet = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body.canvas_fingerprint, CANVAS_NOT_SUPPORTED);
    assert_eq!(body.webgl_fingerprint, "webgl_not_supported");
}

#[tokio::test]
async fn test_fresh_signals_collected_per_registration() {
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        CountingSource::default(),
        MemoryStore::new(),
        ScriptedTransport::new()
            .with_response(HttpResponse::json(200, REGISTERED))
            .with_response(HttpResponse::json(200, REGISTERED)),
    );

    provider.register_device().await.unwrap();
    provider.register_device().await.unwrap();

    assert_eq!(provider.signals().calls(), 2);
    let requests = provider.transport().requests();
    assert_eq!(requests.len(), 2);
    let first: SignalSet = serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
    let second: SignalSet = serde_json::from_slice(requests[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(first.screen_resolution, "1901x1080");
    assert_eq!(second.screen_resolution, "1902x1080");
}

#[tokio::test]
async fn test_collector_canonicalizes_plugins_and_gpu() {
    let collector = SignalCollector::new(
        StaticEnvironment {
            plugins: vec!["b".into(), "a".into()],
            ..StaticEnvironment::default()
        },
        FakeSurfaces::new(RendererInfo::new("Google Inc.", "ANGLE (Intel)")),
    );
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        collector,
        MemoryStore::new(),
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );
    provider.register_device().await.unwrap();

    let request = &provider.transport().requests()[0];
    let body: SignalSet = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body.plugins, "a,b");
    assert_eq!(body.webgl_fingerprint, "6d0f3fb7");
}

// =========================================================================
// Returning device
// =========================================================================

#[tokio::test]
async fn test_returning_device_skips_network() {
    let store = MemoryStore::new();
    store.set("apphub_user_id", "u777").unwrap();
    store.set("apphub_fingerprint", "ff00").unwrap();
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        signals(),
        store,
        ScriptedTransport::new(),
    );

    let identity = provider.identify().await.unwrap();
    assert_eq!(identity.user_id, "u777");
    assert_eq!(identity.fingerprint.as_deref(), Some("ff00"));
    assert_eq!(identity.origin, IdentityOrigin::Cached);
    assert_eq!(provider.transport().request_count(), 0);
}

#[tokio::test]
async fn test_returning_device_skips_signal_collection() {
    let store = MemoryStore::new();
    store.set("apphub_user_id", "u777").unwrap();
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        CountingSource::default(),
        store,
        ScriptedTransport::new(),
    );

    let identity = provider.identify().await.unwrap();
    assert_eq!(identity.origin, IdentityOrigin::Cached);
    assert_eq!(provider.signals().calls(), 0);
    assert_eq!(provider.transport().request_count(), 0);
}

#[tokio::test]
async fn test_registered_identity_is_served_from_storage_afterwards() {
    let provider = provider_with(
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );
    provider.identify().await.unwrap();

    for _ in 0..3 {
        let identity = provider.identify().await.unwrap();
        assert_eq!(identity.user_id, "u123");
        assert_eq!(identity.origin, IdentityOrigin::Cached);
    }
    assert_eq!(provider.transport().request_count(), 1);
}

#[tokio::test]
async fn test_sequential_calls_on_empty_store_send_one_request() {
    let provider = provider_with(
        ScriptedTransport::new()
            .with_response(HttpResponse::json(200, REGISTERED))
            .with_response(HttpResponse::json(
                200,
                r#"{"success":true,"user_id":"u999","fingerprint":"cd34","is_new_user":true}"#,
            )),
    );

    let first = provider.identify().await.unwrap();
    let second = provider.identify().await.unwrap();

    assert_eq!(provider.transport().request_count(), 1);
    assert_eq!(first.user_id, second.user_id);
    assert_eq!(provider.store().write_count(), 2);
}

#[tokio::test]
async fn test_clear_forces_reregistration() {
    let provider = provider_with(
        ScriptedTransport::new()
            .with_response(HttpResponse::json(200, REGISTERED))
            .with_response(HttpResponse::json(
                200,
                r#"{"success":true,"user_id":"u123","fingerprint":"ab12","is_new_user":false}"#,
            )),
    );
    provider.identify().await.unwrap();
    provider.clear().unwrap();
    assert!(provider.current_identity().is_none());

    let identity = provider.identify().await.unwrap();
    assert_eq!(identity.origin, IdentityOrigin::Registered { is_new_user: false });
    assert_eq!(provider.transport().request_count(), 2);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn test_rejection_surfaces_message_and_persists_nothing() {
    let provider = provider_with(ScriptedTransport::new().with_response(HttpResponse::json(
        200,
        r#"{"success":false,"error":"rejected"}"#,
    )));

    let err = provider.identify().await.unwrap_err();
    assert!(err.to_string().contains("rejected"));
    assert_eq!(err.server_message(), Some("rejected"));
    assert!(provider.store().is_empty());
    assert!(provider.current_identity().is_none());
}

#[tokio::test]
async fn test_server_error_status_persists_nothing() {
    let provider = provider_with(ScriptedTransport::new().with_response(HttpResponse::json(
        500,
        r#"{"success":false,"error":"database is locked"}"#,
    )));

    let err = provider.identify().await.unwrap_err();
    assert_eq!(
        err,
        RegistrationError::HttpStatus {
            status: 500,
            message: Some("database is locked".into()),
        }
    );
    assert!(provider.store().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let provider = provider_with(
        ScriptedTransport::new().with_response(HttpResponse::err(NetworkError::Timeout)),
    );

    let err = provider.identify().await.unwrap_err();
    assert_eq!(err, RegistrationError::Network(NetworkError::Timeout));
    assert_eq!(provider.transport().request_count(), 1);
    assert!(provider.store().is_empty());
}

#[tokio::test]
async fn test_malformed_success_persists_nothing() {
    let provider = provider_with(
        ScriptedTransport::new().with_response(HttpResponse::json(200, r#"{"success":true}"#)),
    );

    let err = provider.identify().await.unwrap_err();
    assert!(matches!(err, RegistrationError::MalformedResponse(_)));
    assert!(provider.store().is_empty());
}

#[tokio::test]
async fn test_storage_failure_leaves_no_partial_identity() {
    let provider = IdentityProvider::new(
        IdentityConfig::default(),
        signals(),
        MemoryStore::new().failing_on("apphub_fingerprint"),
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );

    let err = provider.identify().await.unwrap_err();
    assert_eq!(err, RegistrationError::Storage(StorageError::QuotaExceeded));
    assert!(provider.stored_user_id().is_none());
    assert!(provider.current_identity().is_none());
}

#[tokio::test]
async fn test_failed_rollback_never_yields_a_returning_device() {
    for failing_key in ["apphub_fingerprint", "apphub_user_id"] {
        let provider = IdentityProvider::new(
            IdentityConfig::default(),
            signals(),
            MemoryStore::new().failing_on(failing_key).failing_removes(),
            ScriptedTransport::new()
                .with_response(HttpResponse::json(200, REGISTERED))
                .with_response(HttpResponse::json(200, REGISTERED)),
        );

        let err = provider.identify().await.unwrap_err();
        assert_eq!(err, RegistrationError::Storage(StorageError::QuotaExceeded));
        assert!(provider.stored_user_id().is_none(), "{}", failing_key);

        // Not served from storage: the next call goes back to the server.
        assert!(provider.identify().await.is_err());
        assert_eq!(provider.transport().request_count(), 2);
        assert!(provider.current_identity().is_none());
    }
}

// =========================================================================
// Guest mode
// =========================================================================

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(msg: &str) {
    LOG.with(|log| log.borrow_mut().push(msg.to_string()));
}

#[tokio::test]
async fn test_initialize_degrades_to_guest_then_recovers() {
    let provider = provider_with(
        ScriptedTransport::new()
            .with_response(HttpResponse::err(NetworkError::ConnectionFailed))
            .with_response(HttpResponse::json(200, REGISTERED)),
    )
    .with_debug(record);

    let state = provider.initialize().await;
    assert!(state.is_guest());
    assert_eq!(state.display_label(), "Guest");
    assert!(LOG.with(|log| log
        .borrow()
        .iter()
        .any(|m| m.contains("continuing as guest"))));

    let state = provider.initialize().await;
    match &state {
        IdentityState::Identified(identity) => assert!(identity.is_new_user()),
        IdentityState::Guest { reason } => panic!("expected identity, got guest: {}", reason),
    }
    assert_eq!(state.display_label(), "User u123");
}

#[tokio::test]
async fn test_custom_keys_and_endpoint() {
    let config = IdentityConfig {
        endpoint: "https://hub.example/api/fingerprint".into(),
        user_id_key: "hub_uid".into(),
        fingerprint_key: "hub_fp".into(),
        timeout_ms: 5_000,
        include_credentials: false,
    };
    let provider = IdentityProvider::new(
        config,
        signals(),
        MemoryStore::new(),
        ScriptedTransport::new().with_response(HttpResponse::json(200, REGISTERED)),
    );
    provider.identify().await.unwrap();

    let request = &provider.transport().requests()[0];
    assert_eq!(request.url, "https://hub.example/api/fingerprint");
    assert_eq!(request.timeout_ms, 5_000);
    assert!(!request.include_credentials);
    assert_eq!(provider.store().get("hub_uid").as_deref(), Some("u123"));
    assert!(provider.store().get("apphub_user_id").is_none());
}
