// [libs/core/resource/src/mem.rs]
//! Memory accounting from `/proc/meminfo`, treating `MemAvailable` as the
//! authoritative "free" figure (it already accounts for reclaimable caches,
//! unlike the naive `MemFree` line).

pub struct MemReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

pub fn read_mem() -> Option<MemReading> {
    let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
    let mut total_kb = None;
    let mut available_kb = None;

    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kb = parse_kb(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kb = parse_kb(rest);
        }
    }

    let total_kb = total_kb?;
    let available_kb = available_kb.unwrap_or(0);
    let used_kb = total_kb.saturating_sub(available_kb);

    Some(MemReading { total_bytes: total_kb * 1024, used_bytes: used_kb * 1024 })
}

fn parse_kb(field: &str) -> Option<u64> {
    field.split_whitespace().next()?.parse().ok()
}
