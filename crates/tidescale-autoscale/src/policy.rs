//! Scaling policy — single-threshold, one-replica-at-a-time decisions.
//!
//! Pure functions of the current [`ApplicationStatus`] and the configured
//! threshold and replica bounds. No state is carried between calls.

use tidescale_client::ApplicationStatus;

/// The outcome of evaluating the policy against one status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// Add one replica; carries the new absolute count.
    ScaleUp(u32),
    /// Remove one replica; carries the new absolute count.
    ScaleDown(u32),
    /// Leave the replica count alone.
    Hold,
}

impl ScaleDecision {
    /// The replica count to apply, if any.
    pub fn target(&self) -> Option<u32> {
        match self {
            Self::ScaleUp(n) | Self::ScaleDown(n) => Some(*n),
            Self::Hold => None,
        }
    }
}

/// True iff the metric is strictly above `threshold` and the application
/// is below `max_replicas`.
pub fn should_scale_up(status: &ApplicationStatus, threshold: f64, max_replicas: u32) -> bool {
    status.metric_value > threshold && status.replicas < max_replicas
}

/// True iff the metric is strictly below `threshold` and the application
/// is above `min_replicas`.
pub fn should_scale_down(status: &ApplicationStatus, threshold: f64, min_replicas: u32) -> bool {
    status.metric_value < threshold && status.replicas > min_replicas
}

/// Threshold and replica bounds the control loop scales against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPolicy {
    /// Single threshold used for both directions. A metric exactly equal
    /// to it holds.
    pub threshold: f64,
    pub min_replicas: u32,
    pub max_replicas: u32,
}

impl ScalingPolicy {
    /// Select exactly one decision for `status`. Scale-up is checked first.
    pub fn evaluate(&self, status: &ApplicationStatus) -> ScaleDecision {
        if should_scale_up(status, self.threshold, self.max_replicas) {
            ScaleDecision::ScaleUp(status.replicas + 1)
        } else if should_scale_down(status, self.threshold, self.min_replicas) {
            ScaleDecision::ScaleDown(status.replicas - 1)
        } else {
            ScaleDecision::Hold
        }
    }
}
