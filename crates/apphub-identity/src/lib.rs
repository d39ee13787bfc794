//! AppHub Identity Layer
//!
//! Anonymous, login-free identity for the app hub. A device is identified by
//! a browser fingerprint; the identity server maps that fingerprint to an
//! opaque user id, which is cached in local storage and used to attribute
//! ownership of the apps a user creates.
//!
//! - **Types**: [`IdentityRecord`], [`Identity`], [`IdentityState`]
//! - **Registration**: request/response wire format of the identity endpoint
//! - **Store**: the [`KeyValueStore`] seam over local persistent storage
//! - **Provider**: [`IdentityProvider`], the single entry point used by the UI
//!
//! # Safety Invariants
//!
//! ## Success Conditions
//! - An identity is returned only when:
//!   1. A user id was already stored, or
//!   2. The server answered `success: true` with a user id and fingerprint,
//!      and both were written to the store
//!
//! ## Acceptable Partial Failure
//! - Graphics probes may be unsupported (sentinel values are sent instead)
//! - A cached identity may have no stored fingerprint
//!
//! ## Forbidden States
//! - A stored user id without a successful registration behind it
//! - A second registration request once a user id is stored
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       IdentityProvider                       │
//! │                                                              │
//! │   stored user id? ──yes──► Identity (Cached)                 │
//! │         │                                                    │
//! │         no                                                   │
//! │         ▼                                                    │
//! │   SignalSource ──► SignalSet ──► Transport (POST, cookies)   │
//! │                                       │                      │
//! │                                       ▼                      │
//! │                         KeyValueStore ◄── IdentityRecord     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
extern crate alloc;

pub mod config;
pub mod error;
pub mod provider;
pub mod registration;
pub mod store;
pub mod testing;
pub mod types;

pub use config::IdentityConfig;
pub use error::{RegistrationError, StorageError};
pub use provider::{DebugSink, IdentityProvider};
pub use registration::RegistrationResponse;
pub use store::{KeyValueStore, FINGERPRINT_KEY, USER_ID_KEY};
pub use types::{Identity, IdentityOrigin, IdentityRecord, IdentityState};

pub use apphub_fingerprint::{SignalSet, SignalSource};
pub use apphub_network::Transport;
