//! `AppClient` — both clients bound to one monitored application.

use std::time::Duration;

use crate::error::ClientResult;
use crate::transport::DEFAULT_TIMEOUT;
use crate::types::ApplicationStatus;

/// Talks to a single application: one base host, a status endpoint and a
/// replica endpoint. Holds no connections between calls.
#[derive(Debug, Clone)]
pub struct AppClient {
    host: String,
    status_endpoint: String,
    replicas_endpoint: String,
    timeout: Duration,
}

impl AppClient {
    /// Create a client using the default 3 second timeout.
    pub fn new(
        host: impl Into<String>,
        status_endpoint: impl Into<String>,
        replicas_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            status_endpoint: status_endpoint.into(),
            replicas_endpoint: replicas_endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the application's current status.
    pub async fn fetch_status(&self) -> ClientResult<ApplicationStatus> {
        crate::status::fetch_status(&self.host, &self.status_endpoint, self.timeout).await
    }

    /// Set the application's replica count.
    pub async fn apply_replica_count(&self, replicas: u32) -> ClientResult<()> {
        crate::replicas::apply_replica_count(
            &self.host,
            &self.replicas_endpoint,
            replicas,
            self.timeout,
        )
        .await
    }
}
