//! DirectorScheduler — the directive-issuing control loop.
//!
//! Each invocation of `issue_directives` is a fresh cycle:
//!
//! ```text
//! START → (emptiness guard) → SUSPENDED
//!       → DECIDED → THROTTLED → { DRY-RUN-STOP | DISPATCHED }
//! ```
//!
//! The scheduler owns the node snapshot and shares the flavor/image
//! reference data with the coarse refresh task through an
//! `Arc<RwLock<ReferenceData>>`. The refresh task replaces the whole
//! value under the write guard, so a cycle reads either the old or the
//! new snapshot, never a torn one.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use ember_strategy::{CacheStrategy, Directive, DirectiveKind, FlavorInput, ImageInput, NodeInput};

use crate::error::{DirectorError, DirectorResult};
use crate::rate_limiter::RateLimiter;
use crate::scout::Scout;

/// Flavor/image reference snapshot shared between the refresh task and
/// the decision loop. Refreshed on a coarse interval; stale for at most
/// one refresh interval by design.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub flavors: Vec<FlavorInput>,
    pub images: Vec<ImageInput>,
}

/// Director configuration. Read at the start of each relevant step, so
/// a change takes effect on the next cycle, never mid-cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Max cache directives dispatched per cycle. 0 = unlimited.
    pub cache_directive_rate_limit: usize,
    /// Max eject directives dispatched per cycle. 0 = unlimited.
    pub eject_directive_rate_limit: usize,
    /// Compute everything but dispatch nothing.
    pub dry_run: bool,
    /// Invoke the strategy's statistics hook each cycle.
    pub log_statistics: bool,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            cache_directive_rate_limit: 0,
            eject_directive_rate_limit: 0,
            dry_run: false,
            log_statistics: false,
        }
    }
}

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleOutcome {
    /// An input snapshot was empty; the strategy was never invoked.
    Suspended,
    /// Directives were computed and throttled but withheld from the scout.
    DryRun { pending: usize },
    /// Directives were dispatched, continuing past individual failures.
    Dispatched { issued: usize, failed: usize },
}

/// The control loop connecting a `CacheStrategy` to a `Scout`.
pub struct DirectorScheduler {
    scout: Arc<dyn Scout>,
    strategy: Box<dyn CacheStrategy>,
    /// Shared with the refresh task; swapped whole, never mutated in place.
    reference: Arc<RwLock<ReferenceData>>,
    /// Node snapshot, replaced fresh at the start of every cycle.
    node_data: Vec<NodeInput>,
    config: DirectorConfig,
}

impl DirectorScheduler {
    pub fn new(
        scout: Arc<dyn Scout>,
        strategy: Box<dyn CacheStrategy>,
        config: DirectorConfig,
    ) -> Self {
        Self {
            scout,
            strategy,
            reference: Arc::new(RwLock::new(ReferenceData::default())),
            node_data: Vec::new(),
            config,
        }
    }

    /// Handle to the shared reference snapshot, for wiring up the
    /// refresh task.
    pub fn reference(&self) -> Arc<RwLock<ReferenceData>> {
        self.reference.clone()
    }

    /// Run one decision cycle.
    pub async fn issue_directives(&mut self) -> DirectorResult<CycleOutcome> {
        self.node_data = self
            .scout
            .retrieve_node_data()
            .await
            .map_err(DirectorError::Inventory)?;

        let (flavors, images) = {
            let reference = self.reference.read().await;
            (reference.flavors.clone(), reference.images.clone())
        };

        // An empty snapshot means incomplete fleet state, not an empty
        // fleet: a strategy fed an empty image list would read it as
        // "evict everything". Suspend the whole cycle.
        if self.node_data.is_empty() || flavors.is_empty() || images.is_empty() {
            info!(
                nodes = self.node_data.len(),
                flavors = flavors.len(),
                images = images.len(),
                "incomplete fleet state, suspending directive cycle"
            );
            return Ok(CycleOutcome::Suspended);
        }

        let mut directives = self
            .strategy
            .directives(&self.node_data, &flavors, &images);
        debug!(count = directives.len(), "strategy produced directives");

        if self.config.log_statistics {
            self.strategy
                .log_overall_node_statistics(&self.node_data, &flavors, &images);
        }

        if let Some(limiter) = RateLimiter::from_cap(self.config.cache_directive_rate_limit) {
            directives = limiter.apply(directives, DirectiveKind::Cache);
        }
        if let Some(limiter) = RateLimiter::from_cap(self.config.eject_directive_rate_limit) {
            directives = limiter.apply(directives, DirectiveKind::Eject);
        }

        if self.config.dry_run {
            for directive in &directives {
                info!(?directive, "dry-run: directive withheld");
            }
            return Ok(CycleOutcome::DryRun {
                pending: directives.len(),
            });
        }

        self.dispatch(&directives).await
    }

    /// Dispatch directives one call at a time, in order, continuing
    /// past individual failures so one node cannot invalidate the batch.
    async fn dispatch(&self, directives: &[Directive]) -> DirectorResult<CycleOutcome> {
        let mut issued = 0;
        let mut failed = 0;

        for directive in directives {
            match self.scout.issue_action(directive).await {
                Ok(()) => {
                    debug!(node = %directive.node_id(), ?directive, "directive issued");
                    issued += 1;
                }
                Err(e) => {
                    warn!(
                        node = %directive.node_id(),
                        ?directive,
                        error = %e,
                        "directive dispatch failed"
                    );
                    failed += 1;
                }
            }
        }

        info!(issued, failed, "directive cycle complete");
        Ok(CycleOutcome::Dispatched { issued, failed })
    }

    /// Run the directive loop until shutdown.
    ///
    /// Cycles never overlap: a cycle completes (or fails) before the
    /// next sleep begins. A failed cycle is logged and the next
    /// scheduled cycle starts fresh.
    pub async fn run(&mut self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = interval.as_secs(), "director loop started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.issue_directives().await {
                        tracing::error!(error = %e, "directive cycle failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("director loop shutting down");
                    break;
                }
            }
        }
    }
}

/// Pull fresh flavor/image data and swap it into the shared snapshot.
pub async fn refresh_reference_data(
    scout: &Arc<dyn Scout>,
    reference: &Arc<RwLock<ReferenceData>>,
) -> DirectorResult<()> {
    let flavors = scout
        .retrieve_flavor_data()
        .await
        .map_err(DirectorError::Refresh)?;
    let images = scout
        .retrieve_image_data()
        .await
        .map_err(DirectorError::Refresh)?;

    info!(
        flavors = flavors.len(),
        images = images.len(),
        "reference data refreshed"
    );

    // Whole-value replacement under the guard: readers see either the
    // old snapshot or this one, never a mix.
    let mut guard = reference.write().await;
    *guard = ReferenceData { flavors, images };
    Ok(())
}

/// Run the coarse reference-refresh loop until shutdown.
pub async fn run_refresh(
    scout: Arc<dyn Scout>,
    reference: Arc<RwLock<ReferenceData>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_secs = interval.as_secs(), "reference refresh loop started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                if let Err(e) = refresh_reference_data(&scout, &reference).await {
                    tracing::error!(error = %e, "reference refresh failed");
                }
            }
            _ = shutdown.changed() => {
                info!("reference refresh loop shutting down");
                break;
            }
        }
    }
}
