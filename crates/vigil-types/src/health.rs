use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Healthy,
    HttpError(u16),
    SslError,
    Timeout,
    ConnectionError,
    UnknownError,
}

impl ProbeStatus {
    pub fn from_status_code(code: u16) -> Self {
        if code == 200 {
            ProbeStatus::Healthy
        } else {
            ProbeStatus::HttpError(code)
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Healthy => "HEALTHY",
            ProbeStatus::HttpError(_) => "HTTP ERROR",
            ProbeStatus::SslError => "SSL ERROR",
            ProbeStatus::Timeout => "TIMEOUT",
            ProbeStatus::ConnectionError => "CONNECTION ERROR",
            ProbeStatus::UnknownError => "UNKNOWN ERROR",
        }
    }

    pub fn issue(&self) -> Option<Issue> {
        match self {
            ProbeStatus::SslError => Some(Issue::SslCertificateError),
            ProbeStatus::ConnectionError => Some(Issue::ConnectionRefused),
            ProbeStatus::Timeout => Some(Issue::RequestTimeout),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::HttpError(code) => write!(f, "HTTP ERROR {}", code),
            other => write!(f, "{}", other.label()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    pub response_time: Option<Duration>,
    pub status_code: Option<u16>,
    pub detail: Option<String>,
}

impl ProbeOutcome {
    pub fn responded(code: u16, elapsed: Duration) -> Self {
        Self {
            status: ProbeStatus::from_status_code(code),
            response_time: Some(elapsed),
            status_code: Some(code),
            detail: None,
        }
    }

    pub fn failed(status: ProbeStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            response_time: None,
            status_code: None,
            detail: Some(detail.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Issue {
    SslCertificateError,
    ConnectionRefused,
    RequestTimeout,
    ConsecutiveFailures(u32),
    HighMemory(f32),
    HighCpu(f32),
    SystemCheckFailed,
}

impl Issue {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Issue::SslCertificateError | Issue::ConnectionRefused | Issue::RequestTimeout
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::SslCertificateError => write!(f, "SSL_CERTIFICATE_ERROR"),
            Issue::ConnectionRefused => write!(f, "CONNECTION_REFUSED"),
            Issue::RequestTimeout => write!(f, "REQUEST_TIMEOUT"),
            Issue::ConsecutiveFailures(n) => write!(f, "CONSECUTIVE_FAILURES({})", n),
            Issue::HighMemory(pct) => write!(f, "HIGH_MEMORY({:.1}%)", pct),
            Issue::HighCpu(pct) => write!(f, "HIGH_CPU({:.1}%)", pct),
            Issue::SystemCheckFailed => write!(f, "SYSTEM_CHECK_FAILED"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub memory_pct: f32,
    pub cpu_pct: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Healthy => write!(f, "HEALTHY"),
            OverallStatus::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub primary_status: ProbeStatus,
    pub primary_response_time: Option<Duration>,
    pub primary_code: Option<u16>,
    pub secondary_healthy: bool,
    pub secondary_code: Option<u16>,
    pub consecutive_failures: u32,
    pub issues: Vec<Issue>,
    pub resource_sample: Option<ResourceSample>,
    pub timestamp: DateTime<Utc>,
}

impl HealthRecord {
    pub fn overall(&self) -> OverallStatus {
        if self.primary_status.is_healthy() {
            OverallStatus::Healthy
        } else {
            OverallStatus::Unhealthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.overall() == OverallStatus::Healthy
    }

    pub fn push_issue(&mut self, issue: Issue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn has_issue(&self, predicate: impl Fn(&Issue) -> bool) -> bool {
        self.issues.iter().any(predicate)
    }
}
