//! Capability traits for the signal collector.
//!
//! The collector never touches a browser API directly. It reads static
//! properties through [`Environment`] and obtains drawing surfaces through
//! [`SurfaceFactory`], so tests can substitute fakes for both the success and
//! the unsupported paths.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Static properties of the client runtime.
///
/// Every accessor returns `None` (or an empty list) when the underlying
/// property is missing; none of them can fail.
pub trait Environment {
    /// `navigator.userAgent`
    fn user_agent(&self) -> Option<String>;

    /// `navigator.language`
    fn language(&self) -> Option<String>;

    /// `navigator.platform`
    fn platform(&self) -> Option<String>;

    /// Screen `(width, height)` in CSS pixels.
    fn screen_size(&self) -> Option<(u32, u32)>;

    /// Resolved IANA timezone name, e.g. `Europe/Berlin`.
    fn timezone(&self) -> Option<String>;

    /// Installed plugin names in enumeration order.
    fn plugin_names(&self) -> Vec<String>;
}

/// Creates ephemeral offscreen surfaces for the graphics probes.
///
/// Each call returns a fresh surface; the collector drops it as soon as the
/// probe finishes.
pub trait SurfaceFactory {
    /// 2D drawing surface
    type Canvas: Canvas2d;
    /// Hardware-accelerated 3D context
    type Gpu: GpuContext;

    /// Create a surface with a 2D rendering context.
    fn create_canvas(&self) -> Result<Self::Canvas, SurfaceError>;

    /// Create a surface with a 3D rendering context.
    fn create_gpu(&self) -> Result<Self::Gpu, SurfaceError>;
}

/// A 2D drawing context that can be rasterized to a data URI.
pub trait Canvas2d {
    /// Apply one drawing operation.
    fn apply(&mut self, op: &DrawOp) -> Result<(), SurfaceError>;

    /// Serialize the current raster (`canvas.toDataURL()`).
    fn to_data_url(&self) -> Result<String, SurfaceError>;
}

/// A 3D context exposing the debug renderer info extension.
pub trait GpuContext {
    /// Unmasked vendor and renderer strings.
    ///
    /// Fails with [`SurfaceError::ExtensionUnavailable`] when the debug
    /// extension is not exposed.
    fn renderer_info(&self) -> Result<RendererInfo, SurfaceError>;
}

/// Unmasked GPU identification strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererInfo {
    /// `UNMASKED_VENDOR_WEBGL`
    pub vendor: String,
    /// `UNMASKED_RENDERER_WEBGL`
    pub renderer: String,
}

impl RendererInfo {
    /// Create renderer info.
    pub fn new(vendor: impl Into<String>, renderer: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            renderer: renderer.into(),
        }
    }

    /// `"{vendor}|{renderer}"`, the string the GPU fingerprint hashes.
    pub fn joined(&self) -> String {
        alloc::format!("{}|{}", self.vendor, self.renderer)
    }
}

/// One step of the canvas drawing script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// `ctx.textBaseline = ...`
    TextBaseline(&'static str),
    /// `ctx.font = ...`
    Font(&'static str),
    /// `ctx.fillStyle = ...`
    FillStyle(&'static str),
    /// `ctx.fillText(text, x, y)`
    FillText {
        /// Text to draw
        text: &'static str,
        /// Left
        x: f64,
        /// Top
        y: f64,
    },
    /// `ctx.fillRect(x, y, w, h)`
    FillRect {
        /// Left
        x: f64,
        /// Top
        y: f64,
        /// Width
        w: f64,
        /// Height
        h: f64,
    },
}

/// The fixed drawing script rendered for the canvas fingerprint.
///
/// Coordinates, colors, font and text are part of the fingerprint; changing
/// any of them re-identifies every device.
pub const CANVAS_SCRIPT: &[DrawOp] = &[
    DrawOp::TextBaseline("top"),
    DrawOp::Font("14px Arial"),
    DrawOp::FillText {
        text: "AppHub Fingerprint 🌟",
        x: 2.0,
        y: 2.0,
    },
    DrawOp::FillStyle("rgba(102, 204, 0, 0.7)"),
    DrawOp::FillRect {
        x: 100.0,
        y: 5.0,
        w: 80.0,
        h: 20.0,
    },
    DrawOp::FillStyle("#f60"),
    DrawOp::FillRect {
        x: 10.0,
        y: 25.0,
        w: 100.0,
        h: 20.0,
    },
];

/// Reasons a graphics probe could not run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceError {
    /// No document or element to draw on
    NoDocument,
    /// The requested rendering context is not supported
    ContextUnavailable,
    /// `WEBGL_debug_renderer_info` is not exposed
    ExtensionUnavailable,
    /// A drawing call failed
    Draw(String),
    /// Rasterizing or querying the context failed
    Query(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::NoDocument => f.write_str("no document available"),
            SurfaceError::ContextUnavailable => f.write_str("rendering context unavailable"),
            SurfaceError::ExtensionUnavailable => {
                f.write_str("debug renderer info extension unavailable")
            }
            SurfaceError::Draw(msg) => write!(f, "draw failed: {}", msg),
            SurfaceError::Query(msg) => write!(f, "query failed: {}", msg),
        }
    }
}
