//! Autoscaler configuration, loaded once at startup.

use std::time::Duration;

use thiserror::Error;
use tidescale_client::{AppClient, DEFAULT_TIMEOUT};

use crate::policy::ScalingPolicy;

/// Errors found while validating a [`ScalerConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scan interval must be at least one second")]
    ZeroScanInterval,

    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),

    #[error("min replicas ({min}) is greater than max replicas ({max})")]
    InvertedReplicaBounds { min: u32, max: u32 },

    #[error("metrics host must not be empty")]
    EmptyHost,

    #[error("{name} endpoint must start with '/', got {value:?}")]
    InvalidEndpoint { name: &'static str, value: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Everything the control loop needs. Immutable once the loop starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub scan_interval: Duration,
    pub threshold: f64,
    pub min_replicas: u32,
    pub max_replicas: u32,
    /// Base URL of the monitored application, e.g. `http://localhost:8123`.
    pub metrics_host: String,
    pub metrics_endpoint: String,
    pub replicas_endpoint: String,
    /// Bound on each HTTP round trip.
    pub request_timeout: Duration,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(5),
            threshold: 0.80,
            min_replicas: 3,
            max_replicas: 50,
            metrics_host: "http://localhost:8123".to_string(),
            metrics_endpoint: "/app/status".to_string(),
            replicas_endpoint: "/app/replicas".to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ScalerConfig {
    /// Reject configurations the control loop cannot act on sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval < Duration::from_secs(1) {
            return Err(ConfigError::ZeroScanInterval);
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.min_replicas > self.max_replicas {
            return Err(ConfigError::InvertedReplicaBounds {
                min: self.min_replicas,
                max: self.max_replicas,
            });
        }
        if self.metrics_host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        for (name, value) in [
            ("metrics", &self.metrics_endpoint),
            ("replicas", &self.replicas_endpoint),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::InvalidEndpoint {
                    name,
                    value: value.clone(),
                });
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// The threshold and bounds as a [`ScalingPolicy`].
    pub fn policy(&self) -> ScalingPolicy {
        ScalingPolicy {
            threshold: self.threshold,
            min_replicas: self.min_replicas,
            max_replicas: self.max_replicas,
        }
    }

    /// A client for the configured application and endpoints.
    pub fn client(&self) -> AppClient {
        AppClient::new(
            self.metrics_host.clone(),
            self.metrics_endpoint.clone(),
            self.replicas_endpoint.clone(),
        )
        .with_timeout(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScalerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.scan_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_zero_interval() {
        let config = ScalerConfig {
            scan_interval: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroScanInterval));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let config = ScalerConfig {
            min_replicas: 10,
            max_replicas: 5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedReplicaBounds { min: 10, max: 5 })
        );
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let config = ScalerConfig {
            min_replicas: 4,
            max_replicas: 4,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_nan_threshold() {
        let config = ScalerConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn rejects_relative_endpoint() {
        let config = ScalerConfig {
            replicas_endpoint: "app/replicas".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint {
                name: "replicas",
                value: "app/replicas".to_string()
            })
        );
    }

    #[test]
    fn rejects_empty_host() {
        let config = ScalerConfig {
            metrics_host: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ScalerConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn projects_policy_and_client() {
        let config = ScalerConfig::default();
        assert_eq!(
            config.policy(),
            ScalingPolicy {
                threshold: 0.80,
                min_replicas: 3,
                max_replicas: 50
            }
        );

        let client = config.client();
        assert_eq!(client.host(), "http://localhost:8123");
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }
}
