use std::fmt;
use std::time::Duration;
use vigil_types::{HealthRecord, ProbeStatus};

use super::stats::SupervisorStats;

const RULE_WIDTH: usize = 70;

pub fn summary_line(record: &HealthRecord) -> String {
    if record.is_healthy() {
        return match record.primary_response_time {
            Some(elapsed) => format!("primary healthy ({:.2}s)", elapsed.as_secs_f64()),
            None => "primary healthy".to_string(),
        };
    }

    let mut line = format!("external access FAILED - {}", record.primary_status);
    if let Some(hint) = category_hint(&record.primary_status) {
        line.push_str(": ");
        line.push_str(hint);
    }
    line
}

fn category_hint(status: &ProbeStatus) -> Option<&'static str> {
    match status {
        ProbeStatus::SslError => Some("SSL certificate issue detected"),
        ProbeStatus::ConnectionError => Some("cannot connect to server"),
        ProbeStatus::Timeout => Some("server response timeout"),
        _ => None,
    }
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

pub struct StatusReport<'a> {
    pub stats: &'a SupervisorStats,
    pub health: Option<&'a HealthRecord>,
    pub failure_threshold: u32,
}

impl<'a> StatusReport<'a> {
    pub fn new(
        stats: &'a SupervisorStats,
        health: Option<&'a HealthRecord>,
        failure_threshold: u32,
    ) -> Self {
        Self {
            stats,
            health,
            failure_threshold,
        }
    }
}

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "VIGIL MONITORING STATUS")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Monitor uptime: {}", format_uptime(Duration::from_secs(s.uptime_secs)))?;
        writeln!(f, "Total checks: {}", s.total_checks)?;
        if let Some(pid) = s.server_pid {
            writeln!(f, "Server PID: {}", pid)?;
        }
        writeln!(f, "External access failures: {}", s.primary_failures)?;
        writeln!(
            f,
            "Restarts: {} succeeded, {} failed, {} abandoned",
            s.successful_restarts, s.failed_restarts, s.abandoned_restarts
        )?;
        writeln!(
            f,
            "Errors: {}",
            s.error_breakdown()
                .iter()
                .map(|(name, count)| format!("{} {}", name, count))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(f, "Last success: {}", s.last_success.format("%H:%M:%S"))?;
        if let Some(last_restart) = s.last_restart {
            writeln!(f, "Last restart: {}", last_restart.format("%H:%M:%S"))?;
        }
        writeln!(
            f,
            "Consecutive failures: {}/{}",
            s.consecutive_failures, self.failure_threshold
        )?;

        if let Some(health) = self.health {
            writeln!(f)?;
            writeln!(f, "Current external access status:")?;

            let response = health
                .primary_response_time
                .map(|t| format!(" ({:.2}s)", t.as_secs_f64()))
                .unwrap_or_default();
            let failures = if health.consecutive_failures > 0 {
                format!(" [consecutive failures: {}]", health.consecutive_failures)
            } else {
                String::new()
            };
            writeln!(f, "  Primary: {}{}{}", health.primary_status, response, failures)?;

            let secondary_code = health
                .secondary_code
                .map(|c| format!(" (HTTP {})", c))
                .unwrap_or_default();
            writeln!(
                f,
                "  Secondary: {}{}",
                if health.secondary_healthy { "ok" } else { "degraded" },
                secondary_code
            )?;
            writeln!(f, "  Overall: {}", health.overall())?;

            if let Some(sample) = health.resource_sample {
                writeln!(f, "  Memory: {:.1}%", sample.memory_pct)?;
                writeln!(f, "  CPU: {:.1}%", sample.cpu_pct)?;
            }

            if health.issues.is_empty() {
                writeln!(f, "  No critical issues")?;
            } else {
                let issues: Vec<String> = health.issues.iter().map(|i| i.to_string()).collect();
                writeln!(f, "  Issues: {}", issues.join(", "))?;
            }
        }

        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vigil_types::Issue;

    fn record(status: ProbeStatus) -> HealthRecord {
        HealthRecord {
            primary_status: status,
            primary_response_time: status.is_healthy().then(|| Duration::from_millis(420)),
            primary_code: status.is_healthy().then_some(200),
            secondary_healthy: true,
            secondary_code: Some(200),
            consecutive_failures: if status.is_healthy() { 0 } else { 2 },
            issues: Vec::new(),
            resource_sample: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&record(ProbeStatus::Healthy)), "primary healthy (0.42s)");
        assert_eq!(
            summary_line(&record(ProbeStatus::ConnectionError)),
            "external access FAILED - CONNECTION ERROR: cannot connect to server"
        );
        assert_eq!(
            summary_line(&record(ProbeStatus::HttpError(502))),
            "external access FAILED - HTTP ERROR 502"
        );
    }

    #[test]
    fn test_uptime_format() {
        assert_eq!(format_uptime(Duration::from_secs(3_725)), "01:02:05");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }

    #[test]
    fn test_status_report_renders_issues() {
        let state = crate::supervisor::SupervisorState::new();
        let stats = state.stats();
        let mut health = record(ProbeStatus::Timeout);
        health.push_issue(Issue::RequestTimeout);
        health.push_issue(Issue::ConsecutiveFailures(2));

        let rendered = StatusReport::new(&stats, Some(&health), 2).to_string();
        assert!(rendered.contains("Consecutive failures: 0/2"));
        assert!(rendered.contains("Primary: TIMEOUT [consecutive failures: 2]"));
        assert!(rendered.contains("Overall: UNHEALTHY"));
        assert!(rendered.contains("Issues: REQUEST_TIMEOUT, CONSECUTIVE_FAILURES(2)"));
        assert!(!rendered.contains("Server PID"));
    }
}
