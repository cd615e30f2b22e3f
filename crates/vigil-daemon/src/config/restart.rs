use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    pub max_attempts: u32,
    pub cooldown_secs: u64,
    pub timeout_secs: u64,
    pub startup_poll_attempts: u32,
    pub startup_poll_interval_secs: u64,
    pub startup_progress_every: u32,
    pub kill_grace_secs: u64,
    pub port_release_secs: u64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RESTART_ATTEMPTS,
            cooldown_secs: DEFAULT_RESTART_COOLDOWN_SECS,
            timeout_secs: DEFAULT_RESTART_TIMEOUT_SECS,
            startup_poll_attempts: DEFAULT_STARTUP_POLL_ATTEMPTS,
            startup_poll_interval_secs: DEFAULT_STARTUP_POLL_INTERVAL_SECS,
            startup_progress_every: DEFAULT_STARTUP_PROGRESS_EVERY,
            kill_grace_secs: DEFAULT_KILL_GRACE_SECS,
            port_release_secs: DEFAULT_PORT_RELEASE_SECS,
        }
    }
}

impl RestartConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn startup_poll_interval(&self) -> Duration {
        Duration::from_secs(self.startup_poll_interval_secs)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }

    pub fn port_release(&self) -> Duration {
        Duration::from_secs(self.port_release_secs)
    }
}
