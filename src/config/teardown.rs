// ABOUTME: Distribution teardown wait configuration.
// ABOUTME: Backoff bounds for polling a disabled distribution before deletion.

use serde::Deserialize;
use std::time::Duration;

use crate::provision::TeardownPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeardownConfig {
    #[serde(default = "default_initial_interval", with = "humantime_serde")]
    pub initial_interval: Duration,

    #[serde(default = "default_max_interval", with = "humantime_serde")]
    pub max_interval: Duration,

    #[serde(default = "default_max_wait", with = "humantime_serde")]
    pub max_wait: Duration,
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            initial_interval: default_initial_interval(),
            max_interval: default_max_interval(),
            max_wait: default_max_wait(),
        }
    }
}

impl TeardownConfig {
    pub fn policy(&self) -> TeardownPolicy {
        TeardownPolicy {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_wait: self.max_wait,
        }
    }
}

fn default_initial_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_max_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_max_wait() -> Duration {
    Duration::from_secs(20 * 60)
}
