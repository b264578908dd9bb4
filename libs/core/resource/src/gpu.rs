// [libs/core/resource/src/gpu.rs]
//! GPU discovery via the vendor CLI tool, per §4.2: "discovered through
//! loopback-free mechanisms (querying the platform's GPU vendor tool is
//! acceptable)". Absence of the tool, or a failing call, yields an empty
//! reading list — GPU absence is a normal state, never an error.

use aegis_domain_models::snapshot::GpuReading;
use std::process::Command;

/// Abstraction over "ask the platform for GPU state" so tests can substitute
/// a fixture without shelling out.
pub trait GpuSource: Send + Sync {
    fn read(&self) -> Vec<GpuReading>;
}

/// Shells out to `nvidia-smi --query-gpu=... --format=csv,noheader,nounits`.
pub struct NvidiaSmiSource;

impl GpuSource for NvidiaSmiSource {
    fn read(&self) -> Vec<GpuReading> {
        let output = Command::new("nvidia-smi")
            .args([
                "--query-gpu=index,name,memory.total,memory.free,memory.used,utilization.gpu,temperature.gpu",
                "--format=csv,noheader,nounits",
            ])
            .output();

        let Ok(output) = output else {
            return Vec::new();
        };
        if !output.status.success() {
            return Vec::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.lines().filter_map(parse_csv_line).collect()
    }
}

fn parse_csv_line(line: &str) -> Option<GpuReading> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 7 {
        return None;
    }
    Some(GpuReading {
        index: fields[0].parse().ok()?,
        name: fields[1].to_string(),
        vram_total_mb: fields[2].parse().ok()?,
        vram_free_mb: fields[3].parse().ok()?,
        vram_used_mb: fields[4].parse().ok()?,
        utilization_pct: fields[5].parse().unwrap_or(0.0),
        temperature_celsius: fields[6].parse().ok(),
    })
}

/// Always reports no GPUs present — used on platforms without a vendor tool
/// and in tests.
pub struct NoGpuSource;

impl GpuSource for NoGpuSource {
    fn read(&self) -> Vec<GpuReading> {
        Vec::new()
    }
}
