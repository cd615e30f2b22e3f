use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use super::constants::DEFAULT_LOG_FILE;
use super::types::LogLevel;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            json: false,
            ansi: true,
        }
    }
}
