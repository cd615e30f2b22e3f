use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;
use vigil_types::{HealthRecord, ProbeStatus, RestartPhase, VigilError, VigilResult};

use super::stats::SupervisorStats;

#[derive(Default)]
struct Counters {
    total_checks: AtomicU64,
    primary_failures: AtomicU64,
    connection_errors: AtomicU64,
    timeout_errors: AtomicU64,
    ssl_errors: AtomicU64,
    http_errors: AtomicU64,
    unknown_errors: AtomicU64,
    successful_restarts: AtomicU64,
    failed_restarts: AtomicU64,
    abandoned_restarts: AtomicU64,
    skipped_restarts: AtomicU64,
    false_alarms: AtomicU64,
    fast_recoveries: AtomicU64,
    cooldowns: AtomicU64,
}

pub struct SupervisorState {
    consecutive_failures: AtomicU32,
    restart_attempts: AtomicU32,
    restart_in_progress: AtomicBool,
    restart_phase: RwLock<RestartPhase>,
    last_success: RwLock<DateTime<Utc>>,
    last_restart: RwLock<Option<DateTime<Utc>>>,
    last_health: RwLock<Option<HealthRecord>>,
    server_pid: RwLock<Option<u32>>,
    counters: Counters,
    started_at: Instant,
    started_wall: DateTime<Utc>,
}

/// Held for the lifetime of one restart sequence; dropping it releases the
/// in-progress flag.
pub struct RestartGuard<'a> {
    state: &'a SupervisorState,
}

impl Drop for RestartGuard<'_> {
    fn drop(&mut self) {
        self.state.restart_in_progress.store(false, Ordering::SeqCst);
        debug!("Restart guard released");
    }
}

impl SupervisorState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            consecutive_failures: AtomicU32::new(0),
            restart_attempts: AtomicU32::new(0),
            restart_in_progress: AtomicBool::new(false),
            restart_phase: RwLock::new(RestartPhase::Idle),
            last_success: RwLock::new(now),
            last_restart: RwLock::new(None),
            last_health: RwLock::new(None),
            server_pid: RwLock::new(None),
            counters: Counters::default(),
            started_at: Instant::now(),
            started_wall: now,
        }
    }

    pub fn record_check(&self) -> u64 {
        self.counters.total_checks.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_checks(&self) -> u64 {
        self.counters.total_checks.load(Ordering::Relaxed)
    }

    pub fn record_primary(&self, status: &ProbeStatus) -> u32 {
        let counter = match status {
            ProbeStatus::Healthy => {
                self.consecutive_failures.store(0, Ordering::SeqCst);
                return 0;
            }
            ProbeStatus::ConnectionError => &self.counters.connection_errors,
            ProbeStatus::Timeout => &self.counters.timeout_errors,
            ProbeStatus::SslError => &self.counters.ssl_errors,
            ProbeStatus::HttpError(_) => &self.counters.http_errors,
            ProbeStatus::UnknownError => &self.counters.unknown_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record_primary_failure(&self) {
        self.counters.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }

    pub fn reset_failures(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
    }

    pub fn try_begin_restart(&self) -> Option<RestartGuard<'_>> {
        self.restart_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RestartGuard { state: self })
    }

    pub fn restart_in_progress(&self) -> bool {
        self.restart_in_progress.load(Ordering::SeqCst)
    }

    pub fn increment_restart_attempts(&self) -> u32 {
        self.restart_attempts.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn restart_attempts(&self) -> u32 {
        self.restart_attempts.load(Ordering::SeqCst)
    }

    pub fn reset_restart_attempts(&self) {
        self.restart_attempts.store(0, Ordering::SeqCst);
    }

    pub fn check_restart_ceiling(&self, ceiling: u32) -> VigilResult<()> {
        let attempts = self.restart_attempts();
        if attempts >= ceiling {
            return Err(VigilError::RestartCeilingExceeded { attempts, ceiling });
        }
        Ok(())
    }

    pub fn set_phase(&self, phase: RestartPhase) {
        *self.restart_phase.write() = phase;
    }

    pub fn phase(&self) -> RestartPhase {
        *self.restart_phase.read()
    }

    pub fn mark_success(&self) {
        *self.last_success.write() = Utc::now();
    }

    pub fn last_success(&self) -> DateTime<Utc> {
        *self.last_success.read()
    }

    pub fn last_restart(&self) -> Option<DateTime<Utc>> {
        *self.last_restart.read()
    }

    pub fn set_last_health(&self, record: HealthRecord) {
        *self.last_health.write() = Some(record);
    }

    pub fn last_health(&self) -> Option<HealthRecord> {
        self.last_health.read().clone()
    }

    pub fn set_server_pid(&self, pid: Option<u32>) {
        *self.server_pid.write() = pid;
    }

    pub fn server_pid(&self) -> Option<u32> {
        *self.server_pid.read()
    }

    pub fn record_restart_success(&self) {
        let now = Utc::now();
        self.consecutive_failures.store(0, Ordering::SeqCst);
        self.restart_attempts.store(0, Ordering::SeqCst);
        *self.last_restart.write() = Some(now);
        *self.last_success.write() = now;
        self.counters.successful_restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_false_alarm(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        self.restart_attempts.store(0, Ordering::SeqCst);
        self.mark_success();
        self.counters.false_alarms.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_restart_failure(&self) {
        self.counters.failed_restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_restart_abandoned(&self) {
        self.counters.abandoned_restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_restart_skipped(&self) {
        self.counters.skipped_restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fast_recovery(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        self.mark_success();
        self.counters.fast_recoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cooldown(&self) {
        self.counters.cooldowns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_wall
    }

    pub fn stats(&self) -> SupervisorStats {
        let c = &self.counters;
        SupervisorStats {
            uptime_secs: self.uptime().as_secs(),
            started_at: self.started_wall,
            total_checks: c.total_checks.load(Ordering::Relaxed),
            primary_failures: c.primary_failures.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures(),
            restart_attempts: self.restart_attempts(),
            restart_in_progress: self.restart_in_progress(),
            restart_phase: self.phase(),
            successful_restarts: c.successful_restarts.load(Ordering::Relaxed),
            failed_restarts: c.failed_restarts.load(Ordering::Relaxed),
            abandoned_restarts: c.abandoned_restarts.load(Ordering::Relaxed),
            skipped_restarts: c.skipped_restarts.load(Ordering::Relaxed),
            false_alarms: c.false_alarms.load(Ordering::Relaxed),
            fast_recoveries: c.fast_recoveries.load(Ordering::Relaxed),
            cooldowns: c.cooldowns.load(Ordering::Relaxed),
            connection_errors: c.connection_errors.load(Ordering::Relaxed),
            timeout_errors: c.timeout_errors.load(Ordering::Relaxed),
            ssl_errors: c.ssl_errors.load(Ordering::Relaxed),
            http_errors: c.http_errors.load(Ordering::Relaxed),
            unknown_errors: c.unknown_errors.load(Ordering::Relaxed),
            server_pid: self.server_pid(),
            last_success: self.last_success(),
            last_restart: self.last_restart(),
        }
    }
}

impl Default for SupervisorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_counter_resets_on_healthy() {
        let state = SupervisorState::new();
        assert_eq!(state.record_primary(&ProbeStatus::Timeout), 1);
        assert_eq!(state.record_primary(&ProbeStatus::HttpError(502)), 2);
        assert_eq!(state.record_primary(&ProbeStatus::Healthy), 0);
        assert_eq!(state.consecutive_failures(), 0);

        let stats = state.stats();
        assert_eq!(stats.timeout_errors, 1);
        assert_eq!(stats.http_errors, 1);
    }

    #[test]
    fn test_restart_guard_is_exclusive() {
        let state = SupervisorState::new();
        let guard = state.try_begin_restart();
        assert!(guard.is_some());
        assert!(state.restart_in_progress());
        assert!(state.try_begin_restart().is_none());

        drop(guard);
        assert!(!state.restart_in_progress());
        assert!(state.try_begin_restart().is_some());
    }

    #[test]
    fn test_restart_ceiling() {
        let state = SupervisorState::new();
        state.increment_restart_attempts();
        state.increment_restart_attempts();
        assert!(state.check_restart_ceiling(3).is_ok());

        assert_eq!(state.increment_restart_attempts(), 3);
        match state.check_restart_ceiling(3) {
            Err(VigilError::RestartCeilingExceeded { attempts, ceiling }) => {
                assert_eq!(attempts, 3);
                assert_eq!(ceiling, 3);
            }
            other => panic!("expected ceiling error, got {:?}", other),
        }

        state.reset_restart_attempts();
        assert!(state.check_restart_ceiling(3).is_ok());
    }

    #[test]
    fn test_false_alarm_leaves_restart_history() {
        let state = SupervisorState::new();
        state.record_primary(&ProbeStatus::ConnectionError);
        state.increment_restart_attempts();

        state.record_false_alarm();
        assert_eq!(state.consecutive_failures(), 0);
        assert_eq!(state.restart_attempts(), 0);
        assert!(state.last_restart().is_none());

        let stats = state.stats();
        assert_eq!(stats.false_alarms, 1);
        assert_eq!(stats.successful_restarts, 0);
    }

    #[test]
    fn test_restart_success_resets_counters() {
        let state = SupervisorState::new();
        state.record_primary(&ProbeStatus::SslError);
        state.increment_restart_attempts();

        state.record_restart_success();
        assert_eq!(state.consecutive_failures(), 0);
        assert_eq!(state.restart_attempts(), 0);
        assert!(state.last_restart().is_some());
        assert_eq!(state.stats().successful_restarts, 1);
    }
}
