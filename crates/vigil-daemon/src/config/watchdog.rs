use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vigil_types::{VigilError, VigilResult};

use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;
use super::probe::ProbeConfig;
use super::restart::RestartConfig;
use super::target::TargetConfig;
use super::types::LogLevel;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    pub probe: ProbeConfig,
    pub monitor: MonitorConfig,
    pub restart: RestartConfig,
    pub target: TargetConfig,
    pub logging: LoggingConfig,
}

impl VigilConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("vigil").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("vigil.toml"))
    }

    pub fn load(path: impl AsRef<Path>) -> VigilResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| VigilError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| VigilError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> VigilResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| VigilError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| VigilError::Config(format!("Failed to create config dir: {}", e)))?;
            }
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| VigilError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VIGIL_PRIMARY_URL") {
            self.probe.primary_url = url;
        }

        if let Ok(url) = std::env::var("VIGIL_SECONDARY_URL") {
            self.probe.secondary_url = url;
        }

        if let Ok(secs) = std::env::var("VIGIL_CHECK_INTERVAL") {
            if let Ok(s) = secs.parse() {
                self.monitor.check_interval_secs = s;
            }
        }

        if let Ok(port) = std::env::var("VIGIL_TARGET_PORT") {
            if let Ok(p) = port.parse() {
                self.target.port = p;
            }
        }

        if let Ok(verify) = std::env::var("VIGIL_VERIFY_TLS") {
            self.probe.verify_tls = !matches!(verify.to_lowercase().as_str(), "0" | "false" | "no" | "off");
            if !self.probe.verify_tls {
                warn!("TLS certificate verification disabled via VIGIL_VERIFY_TLS");
            }
        }

        if let Ok(level) = std::env::var("VIGIL_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if std::env::var("VIGIL_LOG_JSON").is_ok() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> VigilResult<()> {
        for (name, url) in [
            ("primary_url", &self.probe.primary_url),
            ("secondary_url", &self.probe.secondary_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VigilError::Config(format!(
                    "probe.{} must be an http(s) URL: {}",
                    name, url
                )));
            }
        }

        if self.probe.http_timeout_secs == 0
            || self.probe.secondary_timeout_secs == 0
            || self.probe.fast_check_timeout_secs == 0
        {
            return Err(VigilError::Config("Probe timeouts must be at least 1 second".into()));
        }

        if self.monitor.check_interval_secs == 0 {
            return Err(VigilError::Config("Check interval must be at least 1 second".into()));
        }

        if self.monitor.failure_threshold == 0 {
            return Err(VigilError::Config("Failure threshold must be at least 1".into()));
        }

        if self.monitor.report_every_cycles == 0 {
            return Err(VigilError::Config("report_every_cycles must be at least 1".into()));
        }

        if self.restart.max_attempts == 0 {
            return Err(VigilError::Config("Max restart attempts must be at least 1".into()));
        }

        if self.restart.startup_poll_attempts == 0 {
            return Err(VigilError::Config("Startup poll attempts must be at least 1".into()));
        }

        if self.target.port == 0 {
            return Err(VigilError::Config("Target port cannot be 0".into()));
        }

        if self.target.program.trim().is_empty() {
            return Err(VigilError::Config("Server launch program cannot be empty".into()));
        }

        if self.target.signature.trim().is_empty() {
            return Err(VigilError::Config(
                "Target signature cannot be empty (it would match every process)".into(),
            ));
        }

        let poll_budget = self.restart.startup_poll_attempts as u64
            * self.restart.startup_poll_interval_secs.max(1);
        if self.restart.timeout_secs < poll_budget {
            warn!(
                "Restart timeout ({}s) is shorter than the startup poll window ({}s); restarts may be abandoned",
                self.restart.timeout_secs, poll_budget
            );
        }

        if !self.probe.verify_tls {
            warn!("TLS verification disabled. Certificate failures will not be detected.");
        }

        Ok(())
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            primary_url: redact_url(&self.probe.primary_url),
            secondary_url: redact_url(&self.probe.secondary_url),
            check_interval_secs: self.monitor.check_interval_secs,
            fast_check_interval_secs: self.monitor.fast_check_interval_secs,
            fast_check_attempts: self.monitor.fast_check_attempts,
            http_timeout_secs: self.probe.http_timeout_secs,
            verify_tls: self.probe.verify_tls,
            failure_threshold: self.monitor.failure_threshold,
            max_restart_attempts: self.restart.max_attempts,
            cooldown_secs: self.restart.cooldown_secs,
            target_port: self.target.port,
            target_signature: self.target.signature.clone(),
            launch_command: self.target.command_line(),
            working_dir: self.target.working_dir.clone(),
        }
    }
}

fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", &url[..scheme_end], &rest[at + 1..]),
        None => url.to_string(),
    }
}

#[derive(Debug)]
pub struct RedactedConfig {
    pub primary_url: String,
    pub secondary_url: String,
    pub check_interval_secs: u64,
    pub fast_check_interval_secs: u64,
    pub fast_check_attempts: u32,
    pub http_timeout_secs: u64,
    pub verify_tls: bool,
    pub failure_threshold: u32,
    pub max_restart_attempts: u32,
    pub cooldown_secs: u64,
    pub target_port: u16,
    pub target_signature: String,
    pub launch_command: String,
    pub working_dir: PathBuf,
}

impl std::fmt::Display for RedactedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vigil Watchdog Configuration")?;
        writeln!(f, "============================")?;
        writeln!(f, "Primary: {}", self.primary_url)?;
        writeln!(f, "Secondary: {}", self.secondary_url)?;
        writeln!(f, "Check interval: {}s", self.check_interval_secs)?;
        writeln!(
            f,
            "Fast check: {}s x {} attempts",
            self.fast_check_interval_secs, self.fast_check_attempts
        )?;
        writeln!(f, "HTTP timeout: {}s", self.http_timeout_secs)?;
        writeln!(f, "TLS verification: {}", if self.verify_tls { "ON" } else { "OFF" })?;
        writeln!(f, "Restart trigger: {} consecutive failures", self.failure_threshold)?;
        writeln!(
            f,
            "Restart ceiling: {} attempts, {}s cooldown",
            self.max_restart_attempts, self.cooldown_secs
        )?;
        writeln!(f, "Target: port {} / signature '{}'", self.target_port, self.target_signature)?;
        writeln!(f, "Launch: {} (in {:?})", self.launch_command, self.working_dir)?;
        Ok(())
    }
}
