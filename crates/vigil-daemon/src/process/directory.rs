use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use sysinfo::{Pid, System};
use tracing::debug;
use vigil_types::{VigilError, VigilResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub command: String,
}

impl std::fmt::Display for ProcessEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (pid {})", self.name, self.pid)
    }
}

#[async_trait]
pub trait ProcessDirectory: Send + Sync {
    async fn list_by_port(&self, port: u16) -> VigilResult<Vec<ProcessEntry>>;

    async fn list_by_command_signature(&self, signature: &str) -> VigilResult<Vec<ProcessEntry>>;

    async fn terminate(&self, pid: u32) -> VigilResult<()>;

    async fn kill(&self, pid: u32) -> VigilResult<()>;
}

pub struct SystemProcessDirectory {
    system: Arc<Mutex<System>>,
    own_pid: u32,
}

impl SystemProcessDirectory {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            own_pid: std::process::id(),
        }
    }

    async fn blocking<T, F>(&self, f: F) -> VigilResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut System, u32) -> VigilResult<T> + Send + 'static,
    {
        let system = Arc::clone(&self.system);
        let own_pid = self.own_pid;
        tokio::task::spawn_blocking(move || f(&mut system.lock(), own_pid))
            .await
            .map_err(|e| VigilError::Internal(format!("process task failed: {}", e)))?
    }
}

impl Default for SystemProcessDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_for(sys: &System, pid: u32, fallback_name: &str) -> ProcessEntry {
    match sys.process(Pid::from_u32(pid)) {
        Some(process) => ProcessEntry {
            pid,
            name: process.name().to_string(),
            command: process.cmd().join(" "),
        },
        None => ProcessEntry {
            pid,
            name: fallback_name.to_string(),
            command: String::new(),
        },
    }
}

#[async_trait]
impl ProcessDirectory for SystemProcessDirectory {
    async fn list_by_port(&self, port: u16) -> VigilResult<Vec<ProcessEntry>> {
        self.blocking(move |sys, own_pid| {
            let listeners = listeners::get_all()
                .map_err(|e| VigilError::ProcessDiscovery(format!("socket table: {}", e)))?;

            // One entry per pid even when a process holds several sockets.
            let owners: BTreeMap<u32, String> = listeners
                .into_iter()
                .filter(|l| l.socket.port() == port && l.process.pid != own_pid)
                .map(|l| (l.process.pid, l.process.name))
                .collect();

            sys.refresh_processes();
            Ok(owners
                .iter()
                .map(|(pid, name)| entry_for(sys, *pid, name))
                .collect())
        })
        .await
    }

    async fn list_by_command_signature(&self, signature: &str) -> VigilResult<Vec<ProcessEntry>> {
        let signature = signature.to_string();
        self.blocking(move |sys, own_pid| {
            sys.refresh_processes();
            let mut found: Vec<ProcessEntry> = sys
                .processes()
                .iter()
                .filter(|(pid, _)| pid.as_u32() != own_pid)
                .filter(|(_, process)| process.cmd().iter().any(|arg| arg.contains(&signature)))
                .map(|(pid, process)| ProcessEntry {
                    pid: pid.as_u32(),
                    name: process.name().to_string(),
                    command: process.cmd().join(" "),
                })
                .collect();
            found.sort_by_key(|e| e.pid);
            debug!("{} process(es) match signature '{}'", found.len(), signature);
            Ok(found)
        })
        .await
    }

    async fn terminate(&self, pid: u32) -> VigilResult<()> {
        self.blocking(move |sys, _| send_signal(sys, pid, false)).await
    }

    async fn kill(&self, pid: u32) -> VigilResult<()> {
        self.blocking(move |sys, _| send_signal(sys, pid, true)).await
    }
}

#[cfg(unix)]
fn send_signal(_sys: &mut System, pid: u32, force: bool) -> VigilResult<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid as UnixPid;

    let raw = i32::try_from(pid).map_err(|_| VigilError::ProcessKill {
        pid,
        reason: "pid out of range".into(),
    })?;
    let signal = if force { Signal::SIGKILL } else { Signal::SIGTERM };
    kill(UnixPid::from_raw(raw), signal).map_err(|e| VigilError::ProcessKill {
        pid,
        reason: e.to_string(),
    })
}

#[cfg(not(unix))]
fn send_signal(sys: &mut System, pid: u32, force: bool) -> VigilResult<()> {
    let sys_pid = Pid::from_u32(pid);
    sys.refresh_process(sys_pid);
    let process = sys.process(sys_pid).ok_or_else(|| VigilError::ProcessKill {
        pid,
        reason: "no such process".into(),
    })?;

    let delivered = if force {
        process.kill()
    } else {
        process
            .kill_with(sysinfo::Signal::Term)
            .unwrap_or_else(|| process.kill())
    };

    if delivered {
        Ok(())
    } else {
        Err(VigilError::ProcessKill {
            pid,
            reason: "signal not delivered".into(),
        })
    }
}
