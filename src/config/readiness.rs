use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Basic retry policy template
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct BackoffPolicy {
    /// Maximum number of attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Single attempt timeout (unit: milliseconds)
    #[serde(default = "default_op_timeout_ms")]
    pub timeout_ms: u64,

    /// Backoff base (unit: milliseconds)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum backoff time (unit: milliseconds)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_ms: default_op_timeout_ms(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Barriers applied between bring-up phases:
/// coordinators ready -> daemons ready -> space provisioned -> user command.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReadinessConfig {
    /// Poll every member's listen port until it accepts connections
    #[serde(default = "default_probe")]
    pub probe: bool,

    /// Fixed pause after each phase (unit: milliseconds); 0 disables it
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Retry policy of the port probe
    #[serde(default)]
    pub backoff: BackoffPolicy,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            probe: default_probe(),
            settle_ms: default_settle_ms(),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl ReadinessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.probe {
            let policy = &self.backoff;
            if policy.max_retries == 0 {
                return Err(Error::InvalidConfig("backoff.max_retries must be at least 1".into()));
            }
            if policy.timeout_ms == 0 {
                return Err(Error::InvalidConfig("backoff.timeout_ms must be non-zero".into()));
            }
            if policy.base_delay_ms > policy.max_delay_ms {
                return Err(Error::InvalidConfig(format!(
                    "backoff.base_delay_ms ({}) exceeds backoff.max_delay_ms ({})",
                    policy.base_delay_ms, policy.max_delay_ms
                )));
            }
        }
        Ok(())
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

fn default_probe() -> bool {
    true
}
fn default_settle_ms() -> u64 {
    1000
}
fn default_max_retries() -> usize {
    20
}
fn default_op_timeout_ms() -> u64 {
    500
}
fn default_base_delay_ms() -> u64 {
    50
}
fn default_max_delay_ms() -> u64 {
    1000
}
