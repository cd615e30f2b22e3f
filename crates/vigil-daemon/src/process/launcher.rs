use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::info;
use vigil_types::{RelaunchFailure, VigilResult};

use crate::config::TargetConfig;

#[cfg(windows)]
const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub strip_env: Vec<String>,
}

impl LaunchSpec {
    pub fn from_target(target: &TargetConfig) -> Self {
        Self {
            program: target.program.clone(),
            args: target.args.clone(),
            working_dir: target.working_dir.clone(),
            strip_env: target.strip_env.clone(),
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        for var in &self.strip_env {
            cmd.env_remove(var);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NEW_CONSOLE);
        }

        cmd
    }
}

pub trait LaunchedProcess: Send {
    fn pid(&self) -> Option<u32>;

    /// `Some(description)` once the process has exited.
    fn try_exited(&mut self) -> Option<String>;
}

pub trait ServerLauncher: Send + Sync {
    fn launch(&self, spec: &LaunchSpec) -> VigilResult<Box<dyn LaunchedProcess>>;
}

#[derive(Default)]
pub struct CommandLauncher;

impl CommandLauncher {
    pub fn new() -> Self {
        Self
    }
}

struct SpawnedServer {
    pid: Option<u32>,
    child: tokio::process::Child,
}

impl LaunchedProcess for SpawnedServer {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn try_exited(&mut self) -> Option<String> {
        match self.child.try_wait() {
            Ok(Some(status)) => Some(status.to_string()),
            Ok(None) => None,
            Err(e) => Some(format!("wait failed: {}", e)),
        }
    }
}

impl ServerLauncher for CommandLauncher {
    fn launch(&self, spec: &LaunchSpec) -> VigilResult<Box<dyn LaunchedProcess>> {
        let mut cmd = tokio::process::Command::from(spec.build_command());
        cmd.kill_on_drop(false);

        let child = cmd
            .spawn()
            .map_err(|e| RelaunchFailure::SpawnError(format!("{}: {}", spec.command_line(), e)))?;
        let pid = child.id();

        info!(
            "Launched '{}' in {:?} (pid {})",
            spec.command_line(),
            spec.working_dir,
            pid.map(|p| p.to_string()).unwrap_or_else(|| "?".into())
        );

        Ok(Box::new(SpawnedServer { pid, child }))
    }
}
