//! tidescale-autoscale — reactive single-threshold autoscaling.
//!
//! Polls the monitored application's status, compares its metric against
//! one threshold and moves the replica count by one within the configured
//! bounds.
//!
//! # Scaling Algorithm
//!
//! ```text
//! status = GET metrics endpoint        // on error: log, skip to sleep
//!
//! if metric > threshold and replicas < max:
//!     PUT replicas + 1
//! else if metric < threshold and replicas > min:
//!     PUT replicas - 1
//! else:
//!     hold                              // metric == threshold is a dead zone
//!
//! sleep(scan_interval)                  // no cooldown, no backoff
//! ```
//!
//! The loop stops only when its shutdown signal fires.

pub mod config;
pub mod controller;
pub mod policy;

pub use config::{ConfigError, ScalerConfig};
pub use controller::{Controller, CycleOutcome, ReplicaTarget};
pub use policy::{ScaleDecision, ScalingPolicy, should_scale_down, should_scale_up};
