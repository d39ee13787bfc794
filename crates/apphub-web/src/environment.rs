//! `navigator`, `screen` and `Intl` readers.

use apphub_fingerprint::Environment;
use wasm_bindgen::JsValue;
use web_sys::{Navigator, Window};

/// Reads static properties of the current browsing context.
///
/// Outside a window (e.g. in a worker without `screen`) the affected
/// accessors return `None`.
pub struct BrowserEnvironment {
    window: Option<Window>,
}

impl BrowserEnvironment {
    /// Bind to the global `window`.
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }

    fn navigator(&self) -> Option<Navigator> {
        self.window.as_ref().map(Window::navigator)
    }
}

impl Default for BrowserEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for BrowserEnvironment {
    fn user_agent(&self) -> Option<String> {
        self.navigator()?.user_agent().ok()
    }

    fn language(&self) -> Option<String> {
        self.navigator()?.language()
    }

    fn platform(&self) -> Option<String> {
        self.navigator()?.platform().ok()
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        let screen = self.window.as_ref()?.screen().ok()?;
        let width = u32::try_from(screen.width().ok()?).ok()?;
        let height = u32::try_from(screen.height().ok()?).ok()?;
        Some((width, height))
    }

    fn timezone(&self) -> Option<String> {
        let format =
            js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new());
        let options = format.resolved_options();
        js_sys::Reflect::get(&options, &JsValue::from_str("timeZone"))
            .ok()?
            .as_string()
    }

    fn plugin_names(&self) -> Vec<String> {
        let Some(plugins) = self.navigator().and_then(|n| n.plugins().ok()) else {
            return Vec::new();
        };
        (0..plugins.length())
            .filter_map(|i| plugins.item(i))
            .map(|plugin| plugin.name())
            .collect()
    }
}
