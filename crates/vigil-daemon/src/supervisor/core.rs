use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use vigil_types::{RestartAttemptRecord, VigilError, VigilResult};

use super::cancellation::CancellationToken;
use super::report::{summary_line, StatusReport};
use super::restart::RestartOrchestrator;
use super::state::SupervisorState;
use crate::config::VigilConfig;
use crate::health::{HealthAggregator, ResourceSampler};
use crate::probe::{ProbeProfile, Prober};
use crate::process::{ProcessDirectory, ProcessReaper, ServerLauncher};

#[derive(Debug)]
pub enum CycleOutcome {
    Healthy,
    Waiting { failures: u32 },
    Recovered,
    Restarted(RestartAttemptRecord),
    RestartAbandoned,
    RestartSkipped,
    Interrupted,
}

enum FastCheck {
    Recovered,
    ConfirmedDown,
    Interrupted,
}

pub struct Supervisor {
    config: VigilConfig,
    state: Arc<SupervisorState>,
    aggregator: Arc<HealthAggregator>,
    orchestrator: Arc<RestartOrchestrator>,
    cancel: CancellationToken,
    pending: Option<JoinHandle<RestartAttemptRecord>>,
}

impl Supervisor {
    pub fn new(
        config: VigilConfig,
        state: Arc<SupervisorState>,
        prober: Arc<dyn Prober>,
        sampler: Arc<dyn ResourceSampler>,
        directory: Arc<dyn ProcessDirectory>,
        launcher: Arc<dyn ServerLauncher>,
        cancel: CancellationToken,
    ) -> Self {
        let aggregator = Arc::new(HealthAggregator::new(
            config.probe.clone(),
            config.monitor.clone(),
            prober,
            sampler,
            Arc::clone(&state),
        ));
        let reaper = ProcessReaper::new(
            directory,
            config.restart.kill_grace(),
            config.restart.port_release(),
        );
        let orchestrator = Arc::new(RestartOrchestrator::new(
            config.restart.clone(),
            config.target.clone(),
            Arc::clone(&aggregator),
            reaper,
            launcher,
            Arc::clone(&state),
        ));

        Self {
            config,
            state,
            aggregator,
            orchestrator,
            cancel,
            pending: None,
        }
    }

    pub fn state(&self) -> &Arc<SupervisorState> {
        &self.state
    }

    pub async fn run(&mut self) -> VigilResult<()> {
        info!("Vigil watchdog starting");
        for line in self.config.redacted().to_string().lines() {
            info!("{}", line);
        }

        let mut result = Ok(());
        while !self.cancel.is_cancelled() {
            match self.run_cycle().await {
                Ok(CycleOutcome::Interrupted) => break,
                Ok(outcome) => debug!("Cycle finished: {:?}", outcome),
                Err(e) => {
                    error!(critical = true, "Monitoring loop crashed: {}", e);
                    result = Err(e);
                    break;
                }
            }

            if self.cancel.sleep(self.config.monitor.check_interval()).await {
                break;
            }
        }

        if let Some(handle) = self.pending.take() {
            if handle.is_finished() {
                self.log_late_restart(handle).await;
            } else {
                warn!("Leaving unfinished restart sequence behind on shutdown");
            }
        }

        let stats = self.state.stats();
        info!(
            "Vigil watchdog terminated after {} checks ({} restarts)",
            stats.total_checks,
            stats.total_restarts()
        );
        result
    }

    pub async fn run_cycle(&mut self) -> VigilResult<CycleOutcome> {
        let cycle = self.state.record_check();
        self.collect_finished_restart().await;

        let health = self.aggregator.check().await;
        if health.is_healthy() {
            info!("{}", summary_line(&health));
        } else {
            error!("{}", summary_line(&health));
        }

        let outcome = if health.is_healthy() {
            self.state.mark_success();
            CycleOutcome::Healthy
        } else {
            warn!("External access down");
            self.state.record_primary_failure();
            self.escalate(health.consecutive_failures).await?
        };

        if cycle % self.config.monitor.report_every_cycles.max(1) == 0 {
            let stats = self.state.stats();
            let report = StatusReport::new(
                &stats,
                Some(&health),
                self.config.monitor.failure_threshold,
            );
            for line in report.to_string().lines() {
                info!("{}", line);
            }
        }

        if matches!(outcome, CycleOutcome::Interrupted) {
            return Ok(outcome);
        }

        match self.state.check_restart_ceiling(self.config.restart.max_attempts) {
            Ok(()) => Ok(outcome),
            Err(VigilError::RestartCeilingExceeded { attempts, ceiling }) => {
                if self.cool_down(attempts, ceiling).await {
                    Ok(CycleOutcome::Interrupted)
                } else {
                    Ok(outcome)
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn escalate(&mut self, failures: u32) -> VigilResult<CycleOutcome> {
        let threshold = self.config.monitor.failure_threshold;
        if failures < threshold {
            warn!(
                "Consecutive failures {}/{}, waiting before restart",
                failures, threshold
            );
            return Ok(CycleOutcome::Waiting { failures });
        }

        error!("Restart condition met ({} consecutive failures)", failures);

        match self.fast_recheck().await {
            FastCheck::Recovered => {
                self.state.record_fast_recovery();
                info!("External access recovered during fast check");
                Ok(CycleOutcome::Recovered)
            }
            FastCheck::Interrupted => Ok(CycleOutcome::Interrupted),
            FastCheck::ConfirmedDown => {
                error!("External access confirmed down, starting restart");
                self.dispatch_restart().await
            }
        }
    }

    async fn fast_recheck(&mut self) -> FastCheck {
        let attempts = self.config.monitor.fast_check_attempts;
        let interval = self.config.monitor.fast_check_interval();
        let profile = ProbeProfile::fast_check(&self.config.probe);
        warn!(
            "External access issue detected, fast checking ({}s x {} attempts)",
            interval.as_secs(),
            attempts
        );

        for attempt in 1..=attempts {
            let outcome = self
                .aggregator
                .prober()
                .probe(&self.config.probe.primary_url, &profile)
                .await;

            if outcome.is_healthy() {
                info!(
                    "External access recovered (attempt {}/{}, {:.2}s)",
                    attempt,
                    attempts,
                    outcome.response_time.unwrap_or_default().as_secs_f64()
                );
                return FastCheck::Recovered;
            }

            warn!("Fast check {}/{} failed: {}", attempt, attempts, outcome.status);

            if attempt < attempts && self.cancel.sleep(interval).await {
                return FastCheck::Interrupted;
            }
        }

        error!("External access confirmed down ({} fast checks completed)", attempts);
        FastCheck::ConfirmedDown
    }

    async fn dispatch_restart(&mut self) -> VigilResult<CycleOutcome> {
        if self.state.restart_in_progress() {
            warn!("Restart already in progress, skipping");
            self.state.record_restart_skipped();
            return Ok(CycleOutcome::RestartSkipped);
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let cancel = self.cancel.clone();
        let mut handle = tokio::spawn(async move { orchestrator.run(cancel).await });
        let budget = self.config.restart.timeout();

        match tokio::time::timeout(budget, &mut handle).await {
            Ok(Ok(record)) => {
                info!(
                    "Restart sequence #{} {} in {:.1}s",
                    record.attempt,
                    record.outcome,
                    record.duration.as_secs_f64()
                );
                Ok(CycleOutcome::Restarted(record))
            }
            Ok(Err(e)) => Err(VigilError::Internal(format!("restart task failed: {}", e))),
            Err(_) => {
                error!(
                    "Restart sequence exceeded its {}s budget, resuming monitoring",
                    budget.as_secs()
                );
                self.state.record_restart_abandoned();
                self.pending = Some(handle);
                Ok(CycleOutcome::RestartAbandoned)
            }
        }
    }

    async fn collect_finished_restart(&mut self) {
        if self.pending.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.pending.take() {
                self.log_late_restart(handle).await;
            }
        }
    }

    async fn log_late_restart(&self, handle: JoinHandle<RestartAttemptRecord>) {
        match handle.await {
            Ok(record) => info!(
                "Abandoned restart sequence #{} finished late: {}",
                record.attempt, record.outcome
            ),
            Err(e) => warn!("Abandoned restart sequence did not complete: {}", e),
        }
    }

    /// Returns `true` when the cooldown was cut short by shutdown.
    async fn cool_down(&mut self, attempts: u32, ceiling: u32) -> bool {
        let cooldown = self.config.restart.cooldown();
        error!("Maximum restart attempts exceeded ({}/{})", attempts, ceiling);
        warn!("Waiting {}s before resetting restart counter", cooldown.as_secs());
        self.state.record_cooldown();

        if self.cancel.sleep(cooldown).await {
            return true;
        }

        self.state.reset_restart_attempts();
        info!("Restart counter reset, resuming monitoring");
        false
    }
}
