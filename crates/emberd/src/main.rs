//! emberd — the image pre-cache director daemon.
//!
//! Single binary that assembles the director:
//! - a scout (inventory + action dispatch; `dev` ships an in-memory fleet)
//! - a decision strategy (deterministic proportional caching)
//! - the two periodic loops: coarse flavor/image refresh, fine directive
//!   cycles
//!
//! # Usage
//!
//! ```text
//! emberd direct --scout dev --directive-interval 60 --dry-run
//! ```

mod dev_scout;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use ember_director::{
    DirectorConfig, DirectorScheduler, Scout, refresh_reference_data, run_refresh,
};
use ember_strategy::ProportionalStrategy;

use crate::dev_scout::DevScout;

#[derive(Parser)]
#[command(name = "emberd", about = "Ember image pre-cache director")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the director loops.
    Direct {
        /// Scout implementation to drive ("dev" = in-memory fleet).
        #[arg(long, default_value = "dev")]
        scout: String,

        /// Directive cycle interval in seconds.
        #[arg(long, default_value = "60")]
        directive_interval: u64,

        /// Flavor/image refresh interval in seconds.
        #[arg(long, default_value = "3600")]
        refresh_interval: u64,

        /// Max cache directives per cycle (0 = unlimited).
        #[arg(long, default_value = "0")]
        cache_rate_limit: usize,

        /// Max eject directives per cycle (0 = unlimited).
        #[arg(long, default_value = "0")]
        eject_rate_limit: usize,

        /// Compute directives but dispatch none.
        #[arg(long)]
        dry_run: bool,

        /// Log per-cycle fleet statistics.
        #[arg(long)]
        log_statistics: bool,

        /// Share of each flavor's free nodes to keep cached (0.0–1.0).
        #[arg(long, default_value = "0.5")]
        percentage_to_cache: f64,
    },
}

/// Build the configured scout implementation.
fn select_scout(name: &str) -> anyhow::Result<Arc<dyn Scout>> {
    match name {
        "dev" => Ok(Arc::new(DevScout::new())),
        other => anyhow::bail!("unknown scout implementation: {other}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,emberd=debug,ember=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Direct {
            scout,
            directive_interval,
            refresh_interval,
            cache_rate_limit,
            eject_rate_limit,
            dry_run,
            log_statistics,
            percentage_to_cache,
        } => {
            let config = DirectorConfig {
                cache_directive_rate_limit: cache_rate_limit,
                eject_directive_rate_limit: eject_rate_limit,
                dry_run,
                log_statistics,
            };
            run_direct(
                &scout,
                directive_interval,
                refresh_interval,
                percentage_to_cache,
                config,
            )
            .await
        }
    }
}

async fn run_direct(
    scout_name: &str,
    directive_interval: u64,
    refresh_interval: u64,
    percentage_to_cache: f64,
    config: DirectorConfig,
) -> anyhow::Result<()> {
    info!(scout = scout_name, dry_run = config.dry_run, "ember director starting");

    let scout = select_scout(scout_name)?;
    let strategy = Box::new(ProportionalStrategy::new(percentage_to_cache));
    let mut scheduler = DirectorScheduler::new(scout.clone(), strategy, config);
    let reference = scheduler.reference();

    // Populate reference data before the first directive cycle; without
    // it every cycle would suspend until the first coarse refresh.
    refresh_reference_data(&scout, &reference).await?;

    // ── Shutdown signal ────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_shutdown = shutdown_rx.clone();
    let director_shutdown = shutdown_rx;

    // ── Start background loops ─────────────────────────────────
    let refresh_handle = tokio::spawn(run_refresh(
        scout.clone(),
        reference,
        Duration::from_secs(refresh_interval),
        refresh_shutdown,
    ));

    let director_handle = tokio::spawn(async move {
        scheduler
            .run(Duration::from_secs(directive_interval), director_shutdown)
            .await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    let _ = refresh_handle.await;
    let _ = director_handle.await;

    info!("ember director stopped");
    Ok(())
}
