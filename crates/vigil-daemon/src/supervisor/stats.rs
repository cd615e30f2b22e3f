use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_types::RestartPhase;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupervisorStats {
    pub uptime_secs: u64,
    pub started_at: DateTime<Utc>,
    pub total_checks: u64,
    pub primary_failures: u64,
    pub consecutive_failures: u32,
    pub restart_attempts: u32,
    pub restart_in_progress: bool,
    pub restart_phase: RestartPhase,
    pub successful_restarts: u64,
    pub failed_restarts: u64,
    pub abandoned_restarts: u64,
    pub skipped_restarts: u64,
    pub false_alarms: u64,
    pub fast_recoveries: u64,
    pub cooldowns: u64,
    pub connection_errors: u64,
    pub timeout_errors: u64,
    pub ssl_errors: u64,
    pub http_errors: u64,
    pub unknown_errors: u64,
    pub server_pid: Option<u32>,
    pub last_success: DateTime<Utc>,
    pub last_restart: Option<DateTime<Utc>>,
}

impl SupervisorStats {
    pub fn total_restarts(&self) -> u64 {
        self.successful_restarts + self.failed_restarts
    }

    pub fn error_breakdown(&self) -> [(&'static str, u64); 5] {
        [
            ("connection", self.connection_errors),
            ("timeout", self.timeout_errors),
            ("ssl", self.ssl_errors),
            ("http", self.http_errors),
            ("unknown", self.unknown_errors),
        ]
    }
}
