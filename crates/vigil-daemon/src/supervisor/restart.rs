use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};
use vigil_types::{
    RelaunchFailure, RestartAttemptRecord, RestartOutcome, RestartPhase, VigilError,
};

use super::cancellation::CancellationToken;
use super::state::SupervisorState;
use crate::config::{RestartConfig, TargetConfig};
use crate::health::HealthAggregator;
use crate::probe::ProbeProfile;
use crate::process::{LaunchSpec, LaunchedProcess, ProcessReaper, ServerLauncher};

pub struct RestartOrchestrator {
    config: RestartConfig,
    target: TargetConfig,
    aggregator: Arc<HealthAggregator>,
    reaper: ProcessReaper,
    launcher: Arc<dyn ServerLauncher>,
    state: Arc<SupervisorState>,
    server: Mutex<Option<Box<dyn LaunchedProcess>>>,
}

impl RestartOrchestrator {
    pub fn new(
        config: RestartConfig,
        target: TargetConfig,
        aggregator: Arc<HealthAggregator>,
        reaper: ProcessReaper,
        launcher: Arc<dyn ServerLauncher>,
        state: Arc<SupervisorState>,
    ) -> Self {
        Self {
            config,
            target,
            aggregator,
            reaper,
            launcher,
            state,
            server: Mutex::new(None),
        }
    }

    pub async fn run(&self, mut cancel: CancellationToken) -> RestartAttemptRecord {
        let Some(_guard) = self.state.try_begin_restart() else {
            warn!("Restart already in progress, skipping");
            self.state.record_restart_skipped();
            return RestartAttemptRecord::skipped();
        };

        let attempt = self.state.increment_restart_attempts();
        let mut record = RestartAttemptRecord::begin(attempt);
        let started = Instant::now();
        info!(
            "Starting server restart (attempt {}/{})",
            attempt, self.config.max_attempts
        );

        let (outcome, pid) = self.execute(&mut cancel).await;
        let elapsed = started.elapsed();

        match &outcome {
            RestartOutcome::Succeeded { relaunched: true } => {
                self.state.record_restart_success();
                info!(
                    "Server restart completed successfully (total time: {:.1}s)",
                    elapsed.as_secs_f64()
                );
            }
            RestartOutcome::Succeeded { relaunched: false } => {
                self.state.record_false_alarm();
                info!("External access is actually working, no restart needed");
            }
            RestartOutcome::Failed { reason } => {
                self.state.record_restart_failure();
                error!(
                    "Server restart failed after {:.1}s: {}",
                    elapsed.as_secs_f64(),
                    reason
                );
            }
            RestartOutcome::Skipped => {}
        }

        record.server_pid = pid;
        let record = record.conclude(outcome, elapsed);
        self.transition(record.phase);
        record
    }

    async fn execute(&self, cancel: &mut CancellationToken) -> (RestartOutcome, Option<u32>) {
        self.transition(RestartPhase::Verifying);
        let health = self.aggregator.check().await;
        if health.is_healthy() {
            return (RestartOutcome::Succeeded { relaunched: false }, None);
        }

        if cancel.is_cancelled() {
            return (
                RestartOutcome::Failed {
                    reason: RelaunchFailure::Cancelled,
                },
                None,
            );
        }

        self.transition(RestartPhase::Reaping);
        self.reaper.reap(self.target.port, &self.target.signature).await;

        self.transition(RestartPhase::Relaunching);
        let spec = LaunchSpec::from_target(&self.target);
        let process = match self.launcher.launch(&spec) {
            Ok(process) => process,
            Err(e) => {
                let reason = match e {
                    VigilError::Relaunch(failure) => failure,
                    other => RelaunchFailure::SpawnError(other.to_string()),
                };
                return (RestartOutcome::Failed { reason }, None);
            }
        };

        let pid = process.pid();
        self.state.set_server_pid(pid);
        *self.server.lock() = Some(process);
        info!(
            "Server process started, pid {}",
            pid.map(|p| p.to_string()).unwrap_or_else(|| "unknown".into())
        );

        self.transition(RestartPhase::Polling);
        let outcome = match self.poll_until_healthy(cancel).await {
            Ok(()) => RestartOutcome::Succeeded { relaunched: true },
            Err(reason) => RestartOutcome::Failed { reason },
        };
        (outcome, pid)
    }

    async fn poll_until_healthy(
        &self,
        cancel: &mut CancellationToken,
    ) -> Result<(), RelaunchFailure> {
        let probe_config = self.aggregator.probe_config();
        let profile = ProbeProfile::standard(probe_config);
        let attempts = self.config.startup_poll_attempts;
        let progress_every = self.config.startup_progress_every.max(1);

        for poll in 1..=attempts {
            let outcome = self
                .aggregator
                .prober()
                .probe(&probe_config.primary_url, &profile)
                .await;
            if outcome.is_healthy() {
                info!("Server restarted successfully, external access restored ({} polls)", poll);
                return Ok(());
            }

            let exited = self.server.lock().as_mut().and_then(|p| p.try_exited());
            if let Some(status) = exited {
                error!("Server process terminated during startup: {}", status);
                return Err(RelaunchFailure::DiedDuringStartup(status));
            }

            if cancel.sleep(self.config.startup_poll_interval()).await {
                warn!("Shutdown requested while waiting for server startup");
                return Err(RelaunchFailure::Cancelled);
            }

            if poll % progress_every == 0 {
                info!("Waiting for external access... ({}/{})", poll, attempts);
            }
        }

        Err(RelaunchFailure::StartupTimeout { polls: attempts })
    }

    fn transition(&self, phase: RestartPhase) {
        let previous = self.state.phase();
        if previous != phase {
            info!("Restart phase {} -> {}", previous, phase);
        }
        self.state.set_phase(phase);
    }
}
