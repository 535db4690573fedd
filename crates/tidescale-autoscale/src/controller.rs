//! Control loop — fetch, decide, apply, sleep, forever.
//!
//! Each cycle reads a fresh [`ApplicationStatus`], evaluates the
//! [`ScalingPolicy`] once and, if it says so, sets the new replica count.
//! Errors from either call are logged and absorbed: the loop keeps its
//! interval and tries again next cycle. Nothing is carried over between
//! cycles.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use tidescale_client::{AppClient, ApplicationStatus, ClientError, ClientResult};

use crate::config::ScalerConfig;
use crate::policy::{ScaleDecision, ScalingPolicy};

/// The application being scaled, as seen by the control loop.
pub trait ReplicaTarget: Send + Sync {
    /// Read the current metric value and replica count.
    fn fetch_status(&self) -> impl Future<Output = ClientResult<ApplicationStatus>> + Send;

    /// Set the replica count to `replicas`.
    fn apply_replica_count(&self, replicas: u32) -> impl Future<Output = ClientResult<()>> + Send;
}

impl ReplicaTarget for AppClient {
    async fn fetch_status(&self) -> ClientResult<ApplicationStatus> {
        AppClient::fetch_status(self).await
    }

    async fn apply_replica_count(&self, replicas: u32) -> ClientResult<()> {
        AppClient::apply_replica_count(self, replicas).await
    }
}

/// What happened during a single cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The status could not be read; no decision was made.
    MetricsUnavailable(ClientError),
    /// The policy decided to leave the replica count alone.
    Held(ApplicationStatus),
    /// A new replica count was applied.
    Scaled {
        status: ApplicationStatus,
        decision: ScaleDecision,
    },
    /// A new replica count was decided but applying it failed.
    ScaleFailed {
        status: ApplicationStatus,
        decision: ScaleDecision,
        error: ClientError,
    },
}

/// Drives a [`ReplicaTarget`] with a [`ScalingPolicy`] on a fixed interval.
pub struct Controller<T> {
    target: T,
    policy: ScalingPolicy,
    interval: Duration,
}

impl Controller<AppClient> {
    /// Build a controller for the application described by `config`.
    pub fn from_config(config: &ScalerConfig) -> Self {
        Self::new(config.client(), config.policy(), config.scan_interval)
    }
}

impl<T: ReplicaTarget> Controller<T> {
    /// Create a new controller.
    pub fn new(target: T, policy: ScalingPolicy, interval: Duration) -> Self {
        Self {
            target,
            policy,
            interval,
        }
    }

    pub fn policy(&self) -> &ScalingPolicy {
        &self.policy
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one fetch → decide → apply cycle and report its outcome.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let status = match self.target.fetch_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "failed to fetch application status, skipping cycle");
                return CycleOutcome::MetricsUnavailable(e);
            }
        };

        let decision = self.policy.evaluate(&status);
        let target = match decision {
            ScaleDecision::Hold => {
                info!(
                    metric = status.metric_value,
                    replicas = status.replicas,
                    threshold = self.policy.threshold,
                    "holding"
                );
                return CycleOutcome::Held(status);
            }
            ScaleDecision::ScaleUp(to) => {
                info!(
                    metric = status.metric_value,
                    threshold = self.policy.threshold,
                    from = status.replicas,
                    to,
                    "metric above threshold, scaling up"
                );
                to
            }
            ScaleDecision::ScaleDown(to) => {
                info!(
                    metric = status.metric_value,
                    threshold = self.policy.threshold,
                    from = status.replicas,
                    to,
                    "metric below threshold, scaling down"
                );
                to
            }
        };

        match self.target.apply_replica_count(target).await {
            Ok(()) => CycleOutcome::Scaled { status, decision },
            Err(e) => {
                warn!(error = %e, replicas = target, "failed to apply replica count");
                CycleOutcome::ScaleFailed {
                    status,
                    decision,
                    error: e,
                }
            }
        }
    }

    /// Run cycles until `shutdown` flips or its sender is dropped.
    ///
    /// The signal is checked before every cycle and raced against the
    /// sleep between cycles. A cycle already in flight runs to completion.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            threshold = self.policy.threshold,
            min_replicas = self.policy.min_replicas,
            max_replicas = self.policy.max_replicas,
            "autoscaler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("autoscaler shutting down");
    }
}
