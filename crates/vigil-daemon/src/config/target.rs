use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::constants::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub port: u16,
    pub signature: String,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub strip_env: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TARGET_PORT,
            signature: DEFAULT_TARGET_SIGNATURE.to_string(),
            program: DEFAULT_SERVER_PROGRAM.to_string(),
            args: vec![DEFAULT_TARGET_SIGNATURE.to_string()],
            working_dir: PathBuf::from("."),
            strip_env: DEFAULT_STRIPPED_ENV.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TargetConfig {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
