#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod health;
pub mod probe;
pub mod process;
pub mod supervisor;

#[cfg(test)]
mod test_support;

pub use config::{
    LogLevel, LoggingConfig, MonitorConfig, ProbeConfig, RestartConfig, TargetConfig, VigilConfig,
};
pub use health::{HealthAggregator, ResourceSampler, SystemResourceSampler};
pub use probe::{ProbeClient, ProbeProfile, Prober};
pub use process::{
    CommandLauncher, LaunchSpec, LaunchedProcess, ProcessDirectory, ProcessEntry, ProcessReaper,
    ReapReport, ServerLauncher, SystemProcessDirectory,
};
pub use supervisor::{
    summary_line, CancellationToken, CycleOutcome, RestartOrchestrator, StatusReport, Supervisor,
    SupervisorState, SupervisorStats,
};
