#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod health;
mod restart;

pub use error::{RelaunchFailure, VigilError, VigilResult};
pub use health::{HealthRecord, Issue, OverallStatus, ProbeOutcome, ProbeStatus, ResourceSample};
pub use restart::{RestartAttemptRecord, RestartOutcome, RestartPhase};

pub const HTTP_OK: u16 = 200;
