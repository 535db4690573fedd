//! tidescale-client — HTTP clients for the application being autoscaled.
//!
//! Two calls, both bounded by a single round-trip timeout (3s by default):
//!
//! ```text
//! GET {host}{status_endpoint}    → {"cpu": {"highPriority": f64}, "replicas": u32}
//! PUT {host}{replicas_endpoint}  ← {"replicas": u32}   (200 or 204 expected)
//! ```
//!
//! Each call opens its own HTTP/1.1 connection and releases it before
//! returning. Failures are reported as [`ClientError`]; nothing is retried.

pub mod client;
pub mod error;
pub mod replicas;
pub mod status;
pub mod transport;
pub mod types;

pub use client::AppClient;
pub use error::{ClientError, ClientResult};
pub use replicas::apply_replica_count;
pub use status::fetch_status;
pub use transport::DEFAULT_TIMEOUT;
pub use types::{ApplicationStatus, ScalingRequest};
