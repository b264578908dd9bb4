// [libs/core/power/src/probe.rs]
//! Host battery/AC posture from `/sys/class/power_supply`, the standard
//! Linux sysfs interface — no vendor SDK dependency, same spirit as the
//! Resource Probe's `/proc` reads.

use aegis_domain_models::power::{BatteryLevel, PowerSnapshot, PowerState};
use std::path::Path;

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

pub trait PowerSource: Send + Sync {
    fn read(&self) -> PowerSnapshot;
}

pub struct SysfsPowerSource;

impl PowerSource for SysfsPowerSource {
    fn read(&self) -> PowerSnapshot {
        read_sysfs_snapshot(Path::new(POWER_SUPPLY_ROOT)).unwrap_or_else(PowerSnapshot::unknown)
    }
}

fn read_sysfs_snapshot(root: &Path) -> Option<PowerSnapshot> {
    let entries = std::fs::read_dir(root).ok()?;

    let mut ac_online = None;
    let mut battery_percent = None;
    let mut charging = false;
    let mut temperature_celsius = None;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if name.starts_with("AC") || name.starts_with("ADP") || name.starts_with("ucsi") {
            if let Some(online) = read_u8(&path.join("online")) {
                ac_online = Some(online == 1);
            }
        } else if name.starts_with("BAT") {
            if let Some(capacity) = read_u8(&path.join("capacity")) {
                battery_percent = Some(capacity);
            }
            if let Some(status) = read_string(&path.join("status")) {
                charging = status.trim().eq_ignore_ascii_case("charging")
                    || status.trim().eq_ignore_ascii_case("full");
            }
            if let Some(temp_tenths) = read_i32(&path.join("temp")) {
                temperature_celsius = Some(temp_tenths as f32 / 10.0);
            }
        }
    }

    let battery_percent = battery_percent?;
    let state = match (ac_online, charging) {
        (Some(true), _) => PowerState::Ac,
        (Some(false), _) => PowerState::Battery,
        (None, true) => PowerState::Ac,
        (None, false) => PowerState::Battery,
    };

    Some(PowerSnapshot {
        state,
        battery_percent,
        charging,
        estimated_minutes_remaining: None,
        temperature_celsius,
        level: BatteryLevel::from_percent(battery_percent),
    })
}

fn read_string(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

fn read_u8(path: &Path) -> Option<u8> {
    read_string(path)?.trim().parse().ok()
}

fn read_i32(path: &Path) -> Option<i32> {
    read_string(path)?.trim().parse().ok()
}
