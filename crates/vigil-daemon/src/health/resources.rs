use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, System};
use vigil_types::{ResourceSample, VigilError, VigilResult};

#[async_trait]
pub trait ResourceSampler: Send + Sync {
    async fn sample(&self) -> VigilResult<ResourceSample>;
}

pub struct SystemResourceSampler {
    system: Arc<Mutex<System>>,
}

impl SystemResourceSampler {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for SystemResourceSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceSampler for SystemResourceSampler {
    async fn sample(&self) -> VigilResult<ResourceSample> {
        let system = Arc::clone(&self.system);

        tokio::task::spawn_blocking(move || {
            let mut sys = system.lock();

            // CPU usage is a delta between two refreshes.
            sys.refresh_cpu_specifics(CpuRefreshKind::new().with_cpu_usage());
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu_specifics(CpuRefreshKind::new().with_cpu_usage());
            sys.refresh_memory_specifics(MemoryRefreshKind::new().with_ram());

            let cpus = sys.cpus();
            if cpus.is_empty() {
                return Err(VigilError::ResourceSample("no CPUs reported".into()));
            }
            let cpu_pct = cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32;

            let total = sys.total_memory();
            if total == 0 {
                return Err(VigilError::ResourceSample("total memory reported as zero".into()));
            }
            let memory_pct = (sys.used_memory() as f64 / total as f64 * 100.0) as f32;

            Ok(ResourceSample {
                memory_pct,
                cpu_pct: cpu_pct.min(100.0),
            })
        })
        .await
        .map_err(|e| VigilError::ResourceSample(format!("sampling task failed: {}", e)))?
    }
}
