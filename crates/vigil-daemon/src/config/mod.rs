pub mod constants;
mod logging;
mod monitor;
mod probe;
mod restart;
mod target;
mod types;
mod watchdog;

pub use constants::*;
pub use logging::LoggingConfig;
pub use monitor::MonitorConfig;
pub use probe::ProbeConfig;
pub use restart::RestartConfig;
pub use target::TargetConfig;
pub use types::*;
pub use watchdog::{RedactedConfig, VigilConfig};
