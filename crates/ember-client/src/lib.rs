//! ember-client — the resilient infrastructure-client contract.
//!
//! Scout implementations talk to infrastructure APIs through a
//! `ClientWrapper`: it lazily constructs an authenticated session,
//! retries transient conflict-class failures at a fixed interval up to a
//! configured bound, and on an authentication-class failure discards the
//! cached session and reconstructs a fresh one before the next retry.
//!
//! # Session state machine
//!
//! ```text
//! Disconnected ──connect──► Active ──auth failure──► Invalidated
//!      ▲                      │                          │
//!      └──────(never)─────────┘◄────────connect──────────┘
//! ```
//!
//! Conflict-class failures retry against the same session; only
//! auth-class failures take the invalidate transition.

pub mod config;
pub mod wrapper;

pub use config::ClientConfig;
pub use wrapper::{CallError, ClientError, ClientWrapper, SessionFactory};
