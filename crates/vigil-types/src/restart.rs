use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::RelaunchFailure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPhase {
    #[default]
    Idle,
    Verifying,
    Reaping,
    Relaunching,
    Polling,
    Succeeded,
    Failed,
}

impl RestartPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RestartPhase::Succeeded | RestartPhase::Failed)
    }
}

impl fmt::Display for RestartPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPhase::Idle => write!(f, "IDLE"),
            RestartPhase::Verifying => write!(f, "VERIFYING"),
            RestartPhase::Reaping => write!(f, "REAPING"),
            RestartPhase::Relaunching => write!(f, "RELAUNCHING"),
            RestartPhase::Polling => write!(f, "POLLING"),
            RestartPhase::Succeeded => write!(f, "SUCCEEDED"),
            RestartPhase::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RestartOutcome {
    Succeeded { relaunched: bool },
    Failed { reason: RelaunchFailure },
    Skipped,
}

impl RestartOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestartOutcome::Succeeded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RestartOutcome::Failed { .. })
    }
}

impl fmt::Display for RestartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartOutcome::Succeeded { relaunched: true } => write!(f, "succeeded (server relaunched)"),
            RestartOutcome::Succeeded { relaunched: false } => write!(f, "succeeded (already healthy)"),
            RestartOutcome::Failed { reason } => write!(f, "failed: {}", reason),
            RestartOutcome::Skipped => write!(f, "skipped (restart already in progress)"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestartAttemptRecord {
    pub attempt: u32,
    pub started_at: DateTime<Utc>,
    pub phase: RestartPhase,
    pub outcome: RestartOutcome,
    pub duration: Duration,
    pub server_pid: Option<u32>,
}

impl RestartAttemptRecord {
    pub fn begin(attempt: u32) -> Self {
        Self {
            attempt,
            started_at: Utc::now(),
            phase: RestartPhase::Idle,
            outcome: RestartOutcome::Skipped,
            duration: Duration::ZERO,
            server_pid: None,
        }
    }

    pub fn skipped() -> Self {
        Self::begin(0)
    }

    pub fn conclude(mut self, outcome: RestartOutcome, elapsed: Duration) -> Self {
        self.phase = if outcome.is_success() {
            RestartPhase::Succeeded
        } else {
            RestartPhase::Failed
        };
        self.outcome = outcome;
        self.duration = elapsed;
        self
    }
}
