//! AppHub device fingerprinting
//!
//! Derives a soft, per-device identifier from signals a browser exposes
//! without any permission prompt:
//!
//! - **Hasher**: 32-bit rolling string hash, rendered as lowercase hex
//! - **Signals**: the fixed, ordered [`SignalSet`] sent to the identity server
//! - **Surfaces**: capability traits for the 2D canvas and GPU probes
//! - **Collector**: builds a [`SignalSet`] from an [`Environment`] and a
//!   [`SurfaceFactory`]
//!
//! # Soft identifier
//!
//! The fingerprint is not collision resistant and is not a credential. Two
//! devices with identical browser builds and hardware are expected to
//! collide; it only exists to keep an anonymous user attached to the
//! resources they created.
//!
//! # Invariants
//!
//! - Same signal values ⇒ same [`SignalSet`] serialization ⇒ same fingerprint
//! - Plugin names are sorted before joining, so enumeration order never
//!   leaks into the hash
//! - Graphics probes never fail: an unavailable capability yields
//!   [`CANVAS_NOT_SUPPORTED`] or [`WEBGL_NOT_SUPPORTED`]

#![no_std]
extern crate alloc;

pub mod collector;
pub mod hash;
pub mod signals;
pub mod surface;
pub mod testing;

pub use collector::{SignalCollector, SignalSource};
pub use hash::simple_hash;
pub use signals::{join_plugins, SignalSet, CANVAS_NOT_SUPPORTED, WEBGL_NOT_SUPPORTED};
pub use surface::{
    Canvas2d, DrawOp, Environment, GpuContext, RendererInfo, SurfaceError, SurfaceFactory,
    CANVAS_SCRIPT,
};
