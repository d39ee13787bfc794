//! Browser bindings for AppHub device identity.
//!
//! Wires the platform-neutral provider from `apphub-identity` to the real
//! browser: `navigator`/`screen`/`Intl` for static signals, detached
//! canvases for the graphics probes, `localStorage` for persistence and
//! `fetch` for the registration call.
//!
//! ## Module Structure
//!
//! - `environment` - navigator, screen and timezone readers
//! - `surfaces` - 2D canvas and WebGL probes
//! - `storage` - localStorage key/value store
//! - `fetch` - fetch transport with abort-based timeouts
//!
//! ## Usage (JavaScript)
//!
//! ```text
//! const identity = new AppHubIdentity();          // or new AppHubIdentity({ endpoint: "..." })
//! const state = await identity.initialize();      // { status: "identified", ... } | { status: "guest", reason }
//! header.textContent = identity.displayLabel();   // "User 1a2b3c4d" | "Guest"
//! ```

mod environment;
mod fetch;
mod storage;
mod surfaces;
mod util;

pub use environment::BrowserEnvironment;
pub use fetch::FetchTransport;
pub use storage::LocalStorage;
pub use surfaces::{BrowserCanvas, BrowserGpu, BrowserSurfaces};

use apphub_fingerprint::{simple_hash, SignalCollector, SignalSource};
use apphub_identity::{IdentityConfig, IdentityProvider, IdentityState};
use wasm_bindgen::prelude::*;

use crate::util::{from_js, log, to_js};

/// Signal collector over the live browser.
pub type BrowserCollector = SignalCollector<BrowserEnvironment, BrowserSurfaces>;

/// Identity provider over the live browser.
pub type BrowserIdentityProvider = IdentityProvider<BrowserCollector, LocalStorage, FetchTransport>;

fn console_sink(message: &str) {
    log(message);
}

/// Build a provider bound to the current window.
pub fn browser_provider(config: IdentityConfig) -> BrowserIdentityProvider {
    IdentityProvider::new(
        config,
        SignalCollector::new(BrowserEnvironment::new(), BrowserSurfaces::new()),
        LocalStorage::new(),
        FetchTransport::new(),
    )
    .with_debug(console_sink)
}

/// Device identity for the current page.
#[wasm_bindgen]
pub struct AppHubIdentity {
    provider: BrowserIdentityProvider,
}

#[wasm_bindgen]
impl AppHubIdentity {
    /// Create the identity handle.
    ///
    /// `config` is an optional object with any of `endpoint`, `user_id_key`,
    /// `fingerprint_key`, `timeout_ms` and `include_credentials`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AppHubIdentity, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config: IdentityConfig = from_js(&config)?;
        log(&format!(
            "[apphub-identity] endpoint={}, storage={}",
            config.endpoint,
            if LocalStorage::new().is_available() {
                "localStorage"
            } else {
                "unavailable"
            }
        ));

        Ok(AppHubIdentity {
            provider: browser_provider(config),
        })
    }

    /// Resolve the identity, falling back to guest mode.
    ///
    /// Never rejects. Resolves to `{ status: "identified", user_id, fingerprint, origin }`
    /// or `{ status: "guest", reason }`.
    pub async fn initialize(&self) -> Result<JsValue, JsValue> {
        let state = self.provider.initialize().await;
        to_js(&state)
    }

    /// Resolve the identity, rejecting with the error message on failure.
    pub async fn identify(&self) -> Result<JsValue, JsValue> {
        match self.provider.identify().await {
            Ok(identity) => to_js(&identity),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Stored user id, if this device has registered.
    #[wasm_bindgen(getter, js_name = userId)]
    pub fn user_id(&self) -> Option<String> {
        self.provider.stored_user_id()
    }

    /// Stored fingerprint, if this device has registered.
    #[wasm_bindgen(getter)]
    pub fn fingerprint(&self) -> Option<String> {
        self.provider.stored_fingerprint()
    }

    /// Identity resolved by the last successful call, or `null`.
    #[wasm_bindgen(js_name = currentIdentity)]
    pub fn current_identity(&self) -> Result<JsValue, JsValue> {
        match self.provider.current_identity() {
            Some(identity) => to_js(&identity),
            None => Ok(JsValue::NULL),
        }
    }

    /// Header label: `"User <first 8 chars>"` or `"Guest"`.
    #[wasm_bindgen(js_name = displayLabel)]
    pub fn display_label(&self) -> String {
        self.provider
            .current_identity()
            .map(|identity| IdentityState::Identified(identity).display_label())
            .unwrap_or_else(|| String::from("Guest"))
    }

    /// Whether the resolved identity created the item owned by `creator_id`.
    pub fn owns(&self, creator_id: &str) -> bool {
        self.provider
            .current_identity()
            .is_some_and(|identity| identity.owns(creator_id))
    }

    /// Forget the stored identity; the next call registers again.
    pub fn clear(&self) -> Result<(), JsValue> {
        self.provider
            .clear()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Collect a fresh signal set without registering.
    #[wasm_bindgen(js_name = collectSignals)]
    pub fn collect_signals(&self) -> Result<JsValue, JsValue> {
        to_js(&self.provider.signals().collect())
    }
}

/// Fingerprint hash of `text` (lowercase hex, `"0"` for empty input).
#[wasm_bindgen(js_name = simpleHash)]
pub fn simple_hash_js(text: &str) -> String {
    simple_hash(text)
}

/// Collect the current browser's signal set.
#[wasm_bindgen(js_name = collectSignals)]
pub fn collect_signals() -> Result<JsValue, JsValue> {
    let collector = SignalCollector::new(BrowserEnvironment::new(), BrowserSurfaces::new());
    to_js(&collector.collect())
}
