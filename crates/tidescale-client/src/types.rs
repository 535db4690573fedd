//! Wire types exchanged with the monitored application.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current load and size of the monitored application.
///
/// On the wire this is `{"cpu": {"highPriority": <f64>}, "replicas": <u32>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireStatus", into = "WireStatus")]
pub struct ApplicationStatus {
    /// Load indicator driving scaling decisions (CPU fraction).
    pub metric_value: f64,
    /// Current replica count.
    pub replicas: u32,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "metric={} replicas={}", self.metric_value, self.replicas)
    }
}

#[derive(Serialize, Deserialize)]
struct WireStatus {
    cpu: WireCpu,
    replicas: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCpu {
    high_priority: f64,
}

impl From<WireStatus> for ApplicationStatus {
    fn from(w: WireStatus) -> Self {
        Self {
            metric_value: w.cpu.high_priority,
            replicas: w.replicas,
        }
    }
}

impl From<ApplicationStatus> for WireStatus {
    fn from(s: ApplicationStatus) -> Self {
        Self {
            cpu: WireCpu {
                high_priority: s.metric_value,
            },
            replicas: s.replicas,
        }
    }
}

/// Body of a replica update: the absolute replica count to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingRequest {
    pub replicas: u32,
}
