//! tidescaled — the tidescale daemon.
//!
//! Polls one application's status endpoint and adjusts its replica count
//! until interrupted.
//!
//! # Usage
//!
//! ```text
//! tidescaled --metrics-host http://localhost:8123 --threshold-cpu 0.8 \
//!     --min-replicas 3 --max-replicas 50 --scan-interval 5
//! ```

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use tidescale_autoscale::{Controller, ScalerConfig};

#[derive(Parser, Debug)]
#[command(name = "tidescaled", about = "tidescale autoscaler daemon", version)]
struct Cli {
    /// Interval in seconds between resource metric scans.
    #[arg(long, visible_alias = "scanInterval", default_value = "5")]
    scan_interval: u64,

    /// Average CPU to maintain; used as the threshold in both directions.
    #[arg(long, visible_alias = "thresholdCpu", default_value = "0.80")]
    threshold_cpu: f64,

    /// Minimum number of replicas.
    #[arg(long, visible_alias = "minReplicas", default_value = "3")]
    min_replicas: u32,

    /// Maximum number of replicas.
    #[arg(long, visible_alias = "maxReplicas", default_value = "50")]
    max_replicas: u32,

    /// Base URL of the application to fetch metrics from and scale.
    #[arg(long, visible_alias = "metricsHost", default_value = "http://localhost:8123")]
    metrics_host: String,

    /// Endpoint returning the application status.
    #[arg(long, visible_alias = "metricsEndpoint", default_value = "/app/status")]
    metrics_endpoint: String,

    /// Endpoint accepting replica count updates.
    #[arg(long, visible_alias = "replicasEndpoint", default_value = "/app/replicas")]
    replicas_endpoint: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value = "3000")]
    timeout_ms: u64,
}

impl From<Cli> for ScalerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            scan_interval: Duration::from_secs(cli.scan_interval),
            threshold: cli.threshold_cpu,
            min_replicas: cli.min_replicas,
            max_replicas: cli.max_replicas,
            metrics_host: cli.metrics_host,
            metrics_endpoint: cli.metrics_endpoint,
            replicas_endpoint: cli.replicas_endpoint,
            request_timeout: Duration::from_millis(cli.timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ScalerConfig::from(Cli::parse());
    config.validate().context("invalid configuration")?;

    info!(
        scan_interval_secs = config.scan_interval.as_secs(),
        threshold = config.threshold,
        min_replicas = config.min_replicas,
        max_replicas = config.max_replicas,
        host = %config.metrics_host,
        "starting tidescale autoscaler"
    );

    let controller = Controller::from_config(&config);

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let control_handle = tokio::spawn(async move {
        controller.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to install CTRL+C handler")?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    control_handle.await?;

    info!("tidescale autoscaler stopped");
    Ok(())
}
