//! Provider configuration
//!
//! Read once from environment variables:
//!
//! | Variable | Default |
//! |---|---|
//! | `PALETTE_HOST` | `https://api.spectrocloud.com` |
//! | `PALETTE_API_KEY` | required |
//! | `PALETTE_PROJECT_UID` | unset (tenant scope) |
//! | `PALETTE_CLUSTER_CREATE_TIMEOUT_MINUTES` | 60 |
//! | `PALETTE_CLUSTER_DELETE_TIMEOUT_MINUTES` | 60 |
//! | `PALETTE_POLL_INTERVAL_SECONDS` | 10 |
//! | `PALETTE_POLL_DELAY_SECONDS` | 30 |

use crate::error::ProviderError;
use crate::poller::PollerConfig;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://api.spectrocloud.com";
pub const DEFAULT_CLUSTER_TIMEOUT_MINUTES: u64 = 60;
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_POLL_DELAY_SECONDS: u64 = 30;

/// States a cluster passes through before it is running
pub const CLUSTER_CREATE_PENDING_STATES: &[&str] = &["Pending", "Provisioning", "Importing", "Unknown"];
pub const CLUSTER_CREATE_TARGET_STATE: &str = "Running";

/// States a cluster reports while it is being torn down
pub const CLUSTER_DELETE_PENDING_STATES: &[&str] = &["Deleting", "Running", "Pending", "Provisioning"];
/// Reported by the delete probe once the cluster can no longer be read
pub const CLUSTER_DELETED_STATE: &str = "Deleted";

/// Headroom kept between the poller deadline and the operation timeout
const TIMEOUT_HEADROOM: Duration = Duration::from_secs(60);

/// Provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub host: String,
    pub api_key: String,
    pub project_uid: Option<String>,
    pub cluster_create_timeout: Duration,
    pub cluster_delete_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_delay: Duration,
}

impl ProviderConfig {
    /// Settings with defaults for everything but the API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: api_key.into(),
            project_uid: None,
            cluster_create_timeout: Duration::from_secs(DEFAULT_CLUSTER_TIMEOUT_MINUTES * 60),
            cluster_delete_timeout: Duration::from_secs(DEFAULT_CLUSTER_TIMEOUT_MINUTES * 60),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS),
            poll_delay: Duration::from_secs(DEFAULT_POLL_DELAY_SECONDS),
        }
    }

    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which returns the value of a variable if set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let api_key = lookup("PALETTE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::Configuration("PALETTE_API_KEY environment variable is required".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(host) = lookup("PALETTE_HOST") {
            config.host = host;
        }
        config.project_uid = lookup("PALETTE_PROJECT_UID").filter(|uid| !uid.trim().is_empty());

        let number = |key: &str, default: u64| -> Result<u64, ProviderError> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ProviderError::Configuration(format!("{} must be a whole number, got '{}'", key, raw))),
                None => Ok(default),
            }
        };

        let minutes = |key: &str| -> Result<Duration, ProviderError> {
            number(key, DEFAULT_CLUSTER_TIMEOUT_MINUTES)?
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| ProviderError::Configuration(format!("{} is too large", key)))
        };

        config.cluster_create_timeout = minutes("PALETTE_CLUSTER_CREATE_TIMEOUT_MINUTES")?;
        config.cluster_delete_timeout = minutes("PALETTE_CLUSTER_DELETE_TIMEOUT_MINUTES")?;
        config.poll_interval = Duration::from_secs(number("PALETTE_POLL_INTERVAL_SECONDS", DEFAULT_POLL_INTERVAL_SECONDS)?);
        config.poll_delay = Duration::from_secs(number("PALETTE_POLL_DELAY_SECONDS", DEFAULT_POLL_DELAY_SECONDS)?);

        if config.poll_interval.is_zero() {
            return Err(ProviderError::Configuration(
                "PALETTE_POLL_INTERVAL_SECONDS must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Wait after a cluster create: until Running, one minute short of the create timeout
    pub fn cluster_create_poller(&self) -> PollerConfig {
        PollerConfig::new(
            CLUSTER_CREATE_PENDING_STATES,
            CLUSTER_CREATE_TARGET_STATE,
            self.poll_interval,
            self.poll_delay,
            self.cluster_create_timeout.saturating_sub(TIMEOUT_HEADROOM),
        )
    }

    /// Wait after a cluster delete: until the cluster is gone
    pub fn cluster_delete_poller(&self) -> PollerConfig {
        PollerConfig::new(
            CLUSTER_DELETE_PENDING_STATES,
            CLUSTER_DELETED_STATE,
            self.poll_interval,
            self.poll_delay,
            self.cluster_delete_timeout.saturating_sub(TIMEOUT_HEADROOM),
        )
    }
}
