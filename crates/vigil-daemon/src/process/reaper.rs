use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use vigil_types::VigilError;

use super::directory::{ProcessDirectory, ProcessEntry};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReapReport {
    pub terminated: Vec<u32>,
    pub killed: Vec<u32>,
    pub failures: Vec<(u32, String)>,
}

impl ReapReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn touched(&self) -> usize {
        let mut pids: BTreeSet<u32> = self.terminated.iter().copied().collect();
        pids.extend(self.killed.iter().copied());
        pids.len()
    }

    fn note_failure(&mut self, error: VigilError) {
        let (pid, reason) = match error {
            VigilError::ProcessKill { pid, reason } => (pid, reason),
            other => (0, other.to_string()),
        };
        warn!("Could not signal process {}: {}", pid, reason);
        self.failures.push((pid, reason));
    }
}

pub struct ProcessReaper {
    directory: Arc<dyn ProcessDirectory>,
    grace: Duration,
    settle: Duration,
}

impl ProcessReaper {
    pub fn new(directory: Arc<dyn ProcessDirectory>, grace: Duration, settle: Duration) -> Self {
        Self {
            directory,
            grace,
            settle,
        }
    }

    pub async fn reap(&self, port: u16, signature: &str) -> ReapReport {
        let mut report = ReapReport::default();

        info!("Reaping listeners on port {}", port);
        match self.directory.list_by_port(port).await {
            Ok(entries) => self.terminate_all(&entries, &mut report).await,
            Err(e) => warn!("Could not enumerate listeners on port {}: {}", port, e),
        }

        info!("Reaping processes matching '{}'", signature);
        match self.directory.list_by_command_signature(signature).await {
            Ok(entries) => self.terminate_all(&entries, &mut report).await,
            Err(e) => warn!("Could not enumerate processes matching '{}': {}", signature, e),
        }

        tokio::time::sleep(self.grace).await;

        match self.directory.list_by_command_signature(signature).await {
            Ok(survivors) => {
                for entry in survivors {
                    warn!("Force killing {} which ignored SIGTERM", entry);
                    match self.directory.kill(entry.pid).await {
                        Ok(()) => report.killed.push(entry.pid),
                        Err(e) => report.note_failure(e),
                    }
                }
            }
            Err(e) => warn!("Could not re-enumerate processes matching '{}': {}", signature, e),
        }

        tokio::time::sleep(self.settle).await;

        info!(
            "Reap finished: {} terminated, {} killed, {} failures",
            report.terminated.len(),
            report.killed.len(),
            report.failures.len()
        );
        report
    }

    async fn terminate_all(&self, entries: &[ProcessEntry], report: &mut ReapReport) {
        for entry in entries {
            if report.terminated.contains(&entry.pid) {
                continue;
            }
            info!("Terminating {}", entry);
            match self.directory.terminate(entry.pid).await {
                Ok(()) => report.terminated.push(entry.pid),
                Err(e) => report.note_failure(e),
            }
        }
    }
}
