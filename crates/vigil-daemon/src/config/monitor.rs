use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub check_interval_secs: u64,
    pub fast_check_interval_secs: u64,
    pub fast_check_attempts: u32,
    pub failure_threshold: u32,
    pub report_every_cycles: u64,
    pub high_memory_pct: f32,
    pub high_cpu_pct: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            fast_check_interval_secs: DEFAULT_FAST_CHECK_INTERVAL_SECS,
            fast_check_attempts: DEFAULT_FAST_CHECK_ATTEMPTS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            report_every_cycles: DEFAULT_REPORT_EVERY_CYCLES,
            high_memory_pct: DEFAULT_HIGH_MEMORY_PCT,
            high_cpu_pct: DEFAULT_HIGH_CPU_PCT,
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn fast_check_interval(&self) -> Duration {
        Duration::from_secs(self.fast_check_interval_secs)
    }
}
