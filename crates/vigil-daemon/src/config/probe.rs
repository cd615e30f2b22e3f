use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub primary_url: String,
    pub secondary_url: String,
    pub http_timeout_secs: u64,
    pub secondary_timeout_secs: u64,
    pub fast_check_timeout_secs: u64,
    pub verify_tls: bool,
    pub browser_user_agent: String,
    pub monitor_user_agent: String,
    pub accept_language: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            secondary_url: DEFAULT_SECONDARY_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            secondary_timeout_secs: DEFAULT_SECONDARY_TIMEOUT_SECS,
            fast_check_timeout_secs: DEFAULT_FAST_CHECK_TIMEOUT_SECS,
            verify_tls: true,
            browser_user_agent: DEFAULT_BROWSER_USER_AGENT.to_string(),
            monitor_user_agent: DEFAULT_MONITOR_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn secondary_timeout(&self) -> Duration {
        Duration::from_secs(self.secondary_timeout_secs)
    }

    pub fn fast_check_timeout(&self) -> Duration {
        Duration::from_secs(self.fast_check_timeout_secs)
    }
}
