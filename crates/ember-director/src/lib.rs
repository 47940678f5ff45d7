//! ember-director — the directive-issuing control loop.
//!
//! The director runs two periodic tasks against a pluggable `Scout`:
//!
//! - a coarse task refreshing flavor/image reference data, and
//! - a fine task (`DirectorScheduler::issue_directives`) that pulls a
//!   fresh node inventory, asks a `CacheStrategy` for directives, applies
//!   independent cache/eject rate limits, and dispatches to the scout.
//!
//! # Architecture
//!
//! ```text
//! DirectorScheduler
//!   ├── Scout (node inventory, action dispatch)
//!   ├── CacheStrategy (directive decisions, statistics hook)
//!   ├── ReferenceData (flavors/images, swapped by the refresh task)
//!   └── RateLimiter × 2 (cache cap, eject cap — rebuilt every cycle)
//! ```
//!
//! A cycle never invokes the strategy when any input snapshot is empty:
//! an empty set could be mistaken for "evict everything" after a
//! transient retrieval failure, so the whole cycle suspends instead.

pub mod error;
pub mod rate_limiter;
pub mod scheduler;
pub mod scout;

pub use error::{DirectorError, DirectorResult};
pub use rate_limiter::RateLimiter;
pub use scheduler::{
    CycleOutcome, DirectorConfig, DirectorScheduler, ReferenceData, refresh_reference_data,
    run_refresh,
};
pub use scout::Scout;
