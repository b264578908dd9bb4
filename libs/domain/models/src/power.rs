// [libs/domain/models/src/power.rs]
use serde::{Deserialize, Serialize};

/// Host power posture (§3 Power snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Ac,
    Battery,
    Ups,
    Unknown,
}

/// Coarse battery bucket used for posture decisions (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryLevel {
    Critical,
    Low,
    Good,
    Full,
}

impl BatteryLevel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=10 => BatteryLevel::Critical,
            11..=30 => BatteryLevel::Low,
            31..=80 => BatteryLevel::Good,
            _ => BatteryLevel::Full,
        }
    }
}

/// A point-in-time power reading (§3 Power snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSnapshot {
    pub state: PowerState,
    pub battery_percent: u8,
    pub charging: bool,
    pub estimated_minutes_remaining: Option<u32>,
    pub temperature_celsius: Option<f32>,
    pub level: BatteryLevel,
}

impl PowerSnapshot {
    pub fn unknown() -> Self {
        Self {
            state: PowerState::Unknown,
            battery_percent: 100,
            charging: true,
            estimated_minutes_remaining: None,
            temperature_celsius: None,
            level: BatteryLevel::Full,
        }
    }
}
