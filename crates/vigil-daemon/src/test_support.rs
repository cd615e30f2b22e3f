use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vigil_types::{
    ProbeOutcome, ProbeStatus, RelaunchFailure, ResourceSample, VigilError, VigilResult,
};

use crate::health::ResourceSampler;
use crate::probe::{ProbeProfile, Prober};
use crate::process::{LaunchSpec, LaunchedProcess, ProcessDirectory, ProcessEntry, ServerLauncher};

pub fn healthy() -> ProbeOutcome {
    ProbeOutcome::responded(200, Duration::from_millis(120))
}

pub fn refused() -> ProbeOutcome {
    ProbeOutcome::failed(ProbeStatus::ConnectionError, "Connection refused")
}

pub fn http(code: u16) -> ProbeOutcome {
    ProbeOutcome::responded(code, Duration::from_millis(80))
}

/// Scripted outcomes per URL; once a script runs dry the URL's fallback is used.
#[derive(Default)]
pub struct FakeProber {
    scripts: Mutex<HashMap<String, VecDeque<ProbeOutcome>>>,
    fallback: Mutex<HashMap<String, ProbeOutcome>>,
    calls: Mutex<Vec<(String, &'static str)>>,
}

impl FakeProber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, url: &str, outcomes: impl IntoIterator<Item = ProbeOutcome>) {
        self.scripts
            .lock()
            .entry(url.to_string())
            .or_default()
            .extend(outcomes);
    }

    pub fn fallback(&self, url: &str, outcome: ProbeOutcome) {
        self.fallback.lock().insert(url.to_string(), outcome);
    }

    pub fn calls(&self) -> Vec<(String, &'static str)> {
        self.calls.lock().clone()
    }

    pub fn calls_with_profile(&self, profile: &str) -> usize {
        self.calls.lock().iter().filter(|(_, p)| *p == profile).count()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str, profile: &ProbeProfile) -> ProbeOutcome {
        self.calls.lock().push((url.to_string(), profile.name));
        if let Some(next) = self.scripts.lock().get_mut(url).and_then(|q| q.pop_front()) {
            return next;
        }
        self.fallback
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(healthy)
    }
}

pub struct FakeSampler {
    sample: Mutex<Option<ResourceSample>>,
}

impl FakeSampler {
    pub fn new(memory_pct: f32, cpu_pct: f32) -> Arc<Self> {
        Arc::new(Self {
            sample: Mutex::new(Some(ResourceSample { memory_pct, cpu_pct })),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sample: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ResourceSampler for FakeSampler {
    async fn sample(&self) -> VigilResult<ResourceSample> {
        self.sample
            .lock()
            .ok_or_else(|| VigilError::ResourceSample("sampler offline".into()))
    }
}

#[derive(Clone, Debug)]
pub struct FakeProcess {
    pub entry: ProcessEntry,
    pub port: Option<u16>,
    pub ignores_term: bool,
    pub refuses_signals: bool,
}

impl FakeProcess {
    pub fn new(pid: u32, command: &str) -> Self {
        Self {
            entry: ProcessEntry {
                pid,
                name: command.split_whitespace().next().unwrap_or("proc").to_string(),
                command: command.to_string(),
            },
            port: None,
            ignores_term: false,
            refuses_signals: false,
        }
    }

    pub fn listening(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn stubborn(mut self) -> Self {
        self.ignores_term = true;
        self
    }

    pub fn protected(mut self) -> Self {
        self.refuses_signals = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignalSent {
    Term(u32),
    Kill(u32),
}

#[derive(Default)]
pub struct FakeDirectory {
    processes: Mutex<Vec<FakeProcess>>,
    signals: Mutex<Vec<SignalSent>>,
}

impl FakeDirectory {
    pub fn new(processes: Vec<FakeProcess>) -> Arc<Self> {
        Arc::new(Self {
            processes: Mutex::new(processes),
            signals: Mutex::new(Vec::new()),
        })
    }

    pub fn signals(&self) -> Vec<SignalSent> {
        self.signals.lock().clone()
    }

    pub fn alive(&self) -> Vec<u32> {
        self.processes.lock().iter().map(|p| p.entry.pid).collect()
    }

    fn signal(&self, pid: u32, force: bool) -> VigilResult<()> {
        self.signals.lock().push(if force {
            SignalSent::Kill(pid)
        } else {
            SignalSent::Term(pid)
        });

        let mut processes = self.processes.lock();
        let Some(index) = processes.iter().position(|p| p.entry.pid == pid) else {
            return Err(VigilError::ProcessKill {
                pid,
                reason: "no such process".into(),
            });
        };
        if processes[index].refuses_signals {
            return Err(VigilError::ProcessKill {
                pid,
                reason: "operation not permitted".into(),
            });
        }
        if force || !processes[index].ignores_term {
            processes.remove(index);
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessDirectory for FakeDirectory {
    async fn list_by_port(&self, port: u16) -> VigilResult<Vec<ProcessEntry>> {
        Ok(self
            .processes
            .lock()
            .iter()
            .filter(|p| p.port == Some(port))
            .map(|p| p.entry.clone())
            .collect())
    }

    async fn list_by_command_signature(&self, signature: &str) -> VigilResult<Vec<ProcessEntry>> {
        Ok(self
            .processes
            .lock()
            .iter()
            .filter(|p| p.entry.command.contains(signature))
            .map(|p| p.entry.clone())
            .collect())
    }

    async fn terminate(&self, pid: u32) -> VigilResult<()> {
        self.signal(pid, false)
    }

    async fn kill(&self, pid: u32) -> VigilResult<()> {
        self.signal(pid, true)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchBehaviour {
    Runs,
    ExitsImmediately,
    FailsToSpawn,
}

pub struct FakeLauncher {
    behaviour: Mutex<LaunchBehaviour>,
    launches: AtomicU32,
    next_pid: AtomicU32,
}

impl FakeLauncher {
    pub fn new(behaviour: LaunchBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Mutex::new(behaviour),
            launches: AtomicU32::new(0),
            next_pid: AtomicU32::new(4200),
        })
    }

    pub fn launches(&self) -> u32 {
        self.launches.load(Ordering::SeqCst)
    }
}

struct FakeServer {
    pid: u32,
    exited: bool,
}

impl LaunchedProcess for FakeServer {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn try_exited(&mut self) -> Option<String> {
        self.exited.then(|| "exit status: 1".to_string())
    }
}

impl ServerLauncher for FakeLauncher {
    fn launch(&self, spec: &LaunchSpec) -> VigilResult<Box<dyn LaunchedProcess>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let behaviour = *self.behaviour.lock();
        if behaviour == LaunchBehaviour::FailsToSpawn {
            return Err(RelaunchFailure::SpawnError(format!("{}: not found", spec.program)).into());
        }
        Ok(Box::new(FakeServer {
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst),
            exited: behaviour == LaunchBehaviour::ExitsImmediately,
        }))
    }
}
