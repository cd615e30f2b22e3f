mod cancellation;
mod core;
mod report;
mod restart;
mod state;
mod stats;

pub use cancellation::CancellationToken;
pub use core::{CycleOutcome, Supervisor};
pub use report::{summary_line, StatusReport};
pub use restart::RestartOrchestrator;
pub use state::{RestartGuard, SupervisorState};
pub use stats::SupervisorStats;
