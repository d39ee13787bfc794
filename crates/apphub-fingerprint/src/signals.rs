//! The signal set sent to the identity server.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::hash::simple_hash;

/// Substituted for `canvas_fingerprint` when 2D drawing is unavailable.
pub const CANVAS_NOT_SUPPORTED: &str = "canvas_not_supported";

/// Substituted for `webgl_fingerprint` when the GPU probe is unavailable.
pub const WEBGL_NOT_SUPPORTED: &str = "webgl_not_supported";

/// Raw environment observations, in wire order.
///
/// Field declaration order is the JSON serialization order and the order of
/// [`SignalSet::canonical_string`]. Do not reorder fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSet {
    /// `navigator.userAgent`
    pub user_agent: String,
    /// `navigator.language`
    pub language: String,
    /// `navigator.platform`
    pub platform: String,
    /// `"{width}x{height}"` of the screen
    pub screen_resolution: String,
    /// Resolved IANA timezone name
    pub timezone: String,
    /// Sorted, comma-joined plugin names
    pub plugins: String,
    /// Hash of the rendered 2D canvas, or [`CANVAS_NOT_SUPPORTED`]
    pub canvas_fingerprint: String,
    /// Hash of the unmasked GPU vendor/renderer, or [`WEBGL_NOT_SUPPORTED`]
    pub webgl_fingerprint: String,
}

impl SignalSet {
    /// Field names in wire order.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "user_agent",
        "language",
        "platform",
        "screen_resolution",
        "timezone",
        "plugins",
        "canvas_fingerprint",
        "webgl_fingerprint",
    ];

    /// `(name, value)` pairs in wire order.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        let values = [
            self.user_agent.as_str(),
            self.language.as_str(),
            self.platform.as_str(),
            self.screen_resolution.as_str(),
            self.timezone.as_str(),
            self.plugins.as_str(),
            self.canvas_fingerprint.as_str(),
            self.webgl_fingerprint.as_str(),
        ];
        let mut out = [("", ""); 8];
        for (i, value) in values.into_iter().enumerate() {
            out[i] = (Self::FIELD_NAMES[i], value);
        }
        out
    }

    /// All values concatenated in wire order.
    pub fn canonical_string(&self) -> String {
        let fields = self.fields();
        let len = fields.iter().map(|(_, v)| v.len()).sum();
        let mut out = String::with_capacity(len);
        for (_, value) in fields {
            out.push_str(value);
        }
        out
    }

    /// Local fingerprint: [`simple_hash`] of the canonical string.
    pub fn fingerprint(&self) -> String {
        simple_hash(&self.canonical_string())
    }

    /// Whether the 2D canvas probe succeeded.
    pub fn has_canvas(&self) -> bool {
        self.canvas_fingerprint != CANVAS_NOT_SUPPORTED
    }

    /// Whether the GPU probe succeeded.
    pub fn has_webgl(&self) -> bool {
        self.webgl_fingerprint != WEBGL_NOT_SUPPORTED
    }
}

/// Sort plugin names and join them with `,`.
pub fn join_plugins<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    // UTF-16 code unit order, as Array.prototype.sort compares strings
    names.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    names.join(",")
}
