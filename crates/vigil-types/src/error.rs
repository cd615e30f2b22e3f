use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource sampling failed: {0}")]
    ResourceSample(String),

    #[error("Failed to signal process {pid}: {reason}")]
    ProcessKill { pid: u32, reason: String },

    #[error("Process discovery failed: {0}")]
    ProcessDiscovery(String),

    #[error("Relaunch failed: {0}")]
    Relaunch(#[from] RelaunchFailure),

    #[error("Restart ceiling exceeded ({attempts}/{ceiling} attempts)")]
    RestartCeilingExceeded { attempts: u32, ceiling: u32 },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VigilResult<T> = Result<T, VigilError>;

#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RelaunchFailure {
    #[error("could not spawn server process: {0}")]
    SpawnError(String),

    #[error("server process exited during startup ({0})")]
    DiedDuringStartup(String),

    #[error("server did not become healthy within {polls} polls")]
    StartupTimeout { polls: u32 },

    #[error("restart cancelled by shutdown")]
    Cancelled,
}
