// [libs/core/resource/src/disk.rs]
//! Free disk space via `df`, avoiding a vendored filesystem-stats crate the
//! teacher's stack has no equivalent for.

use std::process::Command;

pub fn read_disk_free_bytes(path: &std::path::Path) -> Option<u64> {
    let output = Command::new("df")
        .args(["-k", "--output=avail"])
        .arg(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let avail_kb: u64 = stdout.lines().nth(1)?.trim().parse().ok()?;
    Some(avail_kb * 1024)
}
