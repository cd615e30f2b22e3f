use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};
use vigil_types::{HealthRecord, Issue, ProbeStatus};

use super::resources::ResourceSampler;
use crate::config::{MonitorConfig, ProbeConfig};
use crate::probe::{ProbeProfile, Prober};
use crate::supervisor::SupervisorState;

pub struct HealthAggregator {
    probe_config: ProbeConfig,
    monitor_config: MonitorConfig,
    prober: Arc<dyn Prober>,
    sampler: Arc<dyn ResourceSampler>,
    state: Arc<SupervisorState>,
}

impl HealthAggregator {
    pub fn new(
        probe_config: ProbeConfig,
        monitor_config: MonitorConfig,
        prober: Arc<dyn Prober>,
        sampler: Arc<dyn ResourceSampler>,
        state: Arc<SupervisorState>,
    ) -> Self {
        Self {
            probe_config,
            monitor_config,
            prober,
            sampler,
            state,
        }
    }

    pub fn prober(&self) -> &Arc<dyn Prober> {
        &self.prober
    }

    pub fn probe_config(&self) -> &ProbeConfig {
        &self.probe_config
    }

    pub async fn check(&self) -> HealthRecord {
        let primary = self
            .prober
            .probe(
                &self.probe_config.primary_url,
                &ProbeProfile::standard(&self.probe_config),
            )
            .await;

        let consecutive_failures = self.state.record_primary(&primary.status);

        let mut record = HealthRecord {
            primary_status: primary.status,
            primary_response_time: primary.response_time,
            primary_code: primary.status_code,
            secondary_healthy: false,
            secondary_code: None,
            consecutive_failures,
            issues: Vec::new(),
            resource_sample: None,
            timestamp: Utc::now(),
        };

        if let Some(issue) = primary.status.issue() {
            record.push_issue(issue);
        }

        if !primary.status.is_healthy() {
            let detail = primary.detail.as_deref().unwrap_or("no detail");
            match primary.status {
                ProbeStatus::SslError | ProbeStatus::ConnectionError => error!(
                    category = primary.status.label(),
                    failures = consecutive_failures,
                    "Primary endpoint unreachable: {}",
                    detail
                ),
                _ => warn!(
                    category = primary.status.label(),
                    failures = consecutive_failures,
                    "Primary endpoint check failed: {} ({})",
                    primary.status,
                    detail
                ),
            }
        }

        let secondary = self
            .prober
            .probe(
                &self.probe_config.secondary_url,
                &ProbeProfile::lightweight(&self.probe_config),
            )
            .await;
        record.secondary_healthy = secondary.is_healthy();
        record.secondary_code = secondary.status_code;
        if !secondary.is_healthy() {
            debug!("Secondary endpoint reported {}", secondary.status);
        }

        if consecutive_failures >= self.monitor_config.failure_threshold {
            record.push_issue(Issue::ConsecutiveFailures(consecutive_failures));
        }

        match self.sampler.sample().await {
            Ok(sample) => {
                if sample.memory_pct > self.monitor_config.high_memory_pct {
                    record.push_issue(Issue::HighMemory(sample.memory_pct));
                }
                if sample.cpu_pct > self.monitor_config.high_cpu_pct {
                    record.push_issue(Issue::HighCpu(sample.cpu_pct));
                }
                record.resource_sample = Some(sample);
            }
            Err(e) => {
                warn!("Resource sampling failed: {}", e);
                record.push_issue(Issue::SystemCheckFailed);
            }
        }

        self.state.set_last_health(record.clone());
        record
    }
}
