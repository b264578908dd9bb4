// [libs/core/resource/src/lib.rs]
//! Resource Probe (C2): assembles an on-demand `ResourceSnapshot` from
//! `/proc/stat` (rolling CPU), `/proc/meminfo` (RAM), `df` (disk), and an
//! optional GPU source. Every sub-reading degrades to a safe default rather
//! than failing the whole snapshot — a host missing `nvidia-smi` or lacking
//! a mounted `/proc` still gets a usable (if partial) picture.

pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod mem;

use aegis_domain_models::snapshot::ResourceSnapshot;
use cpu::CpuMonitor;
use gpu::{GpuSource, NoGpuSource, NvidiaSmiSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct ResourceProbe {
    cpu: CpuMonitor,
    gpu_source: Arc<dyn GpuSource>,
    disk_path: PathBuf,
}

impl ResourceProbe {
    pub fn new(disk_path: impl Into<PathBuf>) -> Self {
        Self {
            cpu: CpuMonitor::new(),
            gpu_source: Arc::new(NvidiaSmiSource),
            disk_path: disk_path.into(),
        }
    }

    /// Used on platforms without an NVIDIA stack, or in tests, to avoid
    /// shelling out at all.
    pub fn without_gpu(disk_path: impl Into<PathBuf>) -> Self {
        Self { cpu: CpuMonitor::new(), gpu_source: Arc::new(NoGpuSource), disk_path: disk_path.into() }
    }

    pub fn with_gpu_source(disk_path: impl Into<PathBuf>, gpu_source: Arc<dyn GpuSource>) -> Self {
        Self { cpu: CpuMonitor::new(), gpu_source, disk_path: disk_path.into() }
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        let mem = mem::read_mem();
        let disk_free_bytes = disk::read_disk_free_bytes(&self.disk_path).unwrap_or(0);
        let gpus = self.gpu_source.read();

        if mem.is_none() {
            tracing::warn!(target: "resource_probe", "failed to read /proc/meminfo, reporting zeroed memory");
        }

        ResourceSnapshot {
            mem_total_bytes: mem.as_ref().map(|m| m.total_bytes).unwrap_or(0),
            mem_used_bytes: mem.as_ref().map(|m| m.used_bytes).unwrap_or(0),
            cpu_utilization_pct: self.cpu.utilization_pct(),
            disk_free_bytes,
            gpus,
        }
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }
}
