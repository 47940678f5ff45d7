//! Director error types.

use thiserror::Error;

/// Errors that abort a director cycle.
///
/// Per-directive dispatch failures are not errors at this level — the
/// dispatch step logs them and continues, so one node's failure cannot
/// invalidate the rest of a fleet-wide batch.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("node inventory retrieval failed: {0}")]
    Inventory(#[source] anyhow::Error),

    #[error("reference data refresh failed: {0}")]
    Refresh(#[source] anyhow::Error),
}

pub type DirectorResult<T> = Result<T, DirectorError>;
