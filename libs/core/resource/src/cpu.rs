// [libs/core/resource/src/cpu.rs]
//! Rolling CPU utilization from `/proc/stat` deltas. A single snapshot of
//! `/proc/stat` only gives cumulative counters since boot; utilization needs
//! the delta between two readings, so the probe keeps the previous reading
//! around rather than sleeping inside the "on demand" call.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Default)]
struct CpuTimes {
    idle: u64,
    total: u64,
}

fn read_cpu_times() -> Option<CpuTimes> {
    let contents = std::fs::read_to_string("/proc/stat").ok()?;
    let first_line = contents.lines().next()?;
    let fields: Vec<u64> = first_line
        .split_whitespace()
        .skip(1)
        .filter_map(|f| f.parse().ok())
        .collect();
    if fields.len() < 4 {
        return None;
    }
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0); // idle + iowait
    let total: u64 = fields.iter().sum();
    Some(CpuTimes { idle, total })
}

pub struct CpuMonitor {
    last: Mutex<Option<CpuTimes>>,
}

impl CpuMonitor {
    pub fn new() -> Self {
        Self { last: Mutex::new(read_cpu_times()) }
    }

    /// Percentage of CPU time spent non-idle since the previous call. The
    /// very first call has no prior reading to diff against and returns 0.0.
    pub fn utilization_pct(&self) -> f32 {
        let Some(current) = read_cpu_times() else {
            return 0.0;
        };
        let mut guard = self.last.lock().unwrap();
        let pct = match *guard {
            Some(prev) if current.total > prev.total => {
                let total_delta = (current.total - prev.total) as f64;
                let idle_delta = current.idle.saturating_sub(prev.idle) as f64;
                (((total_delta - idle_delta) / total_delta) * 100.0).clamp(0.0, 100.0) as f32
            }
            _ => 0.0,
        };
        *guard = Some(current);
        pct
    }
}

impl Default for CpuMonitor {
    fn default() -> Self {
        Self::new()
    }
}
