//! Browser tests, run with `wasm-pack test --headless --chrome crates/apphub-web`.

#![cfg(target_arch = "wasm32")]

use apphub_fingerprint::{Environment, SignalSource, SurfaceFactory, CANVAS_NOT_SUPPORTED};
use apphub_identity::KeyValueStore;
use apphub_web::{
    simple_hash_js, BrowserCollector, BrowserEnvironment, BrowserSurfaces, LocalStorage,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_simple_hash_export() {
    assert_eq!(simple_hash_js(""), "0");
    assert_eq!(simple_hash_js("hello"), "5e918d2");
    assert_eq!(simple_hash_js("AppHub Fingerprint 🌟"), "2ee139ab");
}

#[wasm_bindgen_test]
fn test_environment_reads_navigator() {
    let env = BrowserEnvironment::new();
    assert!(env.user_agent().is_some_and(|ua| !ua.is_empty()));
    assert!(env.timezone().is_some_and(|tz| !tz.is_empty()));
    assert!(env.screen_size().is_some());
}

#[wasm_bindgen_test]
fn test_canvas_probe_is_stable() {
    let collector = BrowserCollector::new(BrowserEnvironment::new(), BrowserSurfaces::new());
    let first = collector.canvas_fingerprint();
    let second = collector.canvas_fingerprint();
    assert_ne!(first, CANVAS_NOT_SUPPORTED);
    assert_eq!(first, second);
}

#[wasm_bindgen_test]
fn test_canvas_surface_renders_png() {
    use apphub_fingerprint::Canvas2d;

    let mut canvas = BrowserSurfaces::new().create_canvas().unwrap();
    for op in apphub_fingerprint::CANVAS_SCRIPT {
        canvas.apply(op).unwrap();
    }
    assert!(canvas.to_data_url().unwrap().starts_with("data:image/png"));
}

#[wasm_bindgen_test]
fn test_collected_signals_are_deterministic() {
    let collector = BrowserCollector::new(BrowserEnvironment::new(), BrowserSurfaces::new());
    assert_eq!(collector.collect(), collector.collect());
}

#[wasm_bindgen_test]
fn test_local_storage_roundtrip() {
    let storage = LocalStorage::new();
    assert!(storage.is_available());

    storage.set("apphub_test_key", "value").unwrap();
    assert_eq!(storage.get("apphub_test_key").as_deref(), Some("value"));
    storage.remove("apphub_test_key").unwrap();
    assert!(storage.get("apphub_test_key").is_none());
}
