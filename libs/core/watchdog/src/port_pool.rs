// [libs/core/watchdog/src/port_pool.rs]
//! Deterministic loopback port allocation for supervised backends (§6:
//! backends are "assigned one per model" from a configured range).

use std::collections::BTreeSet;
use std::sync::Mutex;

pub const DEFAULT_PORT_RANGE: std::ops::RangeInclusive<u16> = 42382..=42391;

#[derive(Debug)]
pub struct PortPool {
    range: std::ops::RangeInclusive<u16>,
    taken: Mutex<BTreeSet<u16>>,
}

#[derive(Debug, thiserror::Error)]
#[error("no free ports remain in the configured range")]
pub struct PoolExhausted;

impl PortPool {
    pub fn new(range: std::ops::RangeInclusive<u16>) -> Self {
        Self { range, taken: Mutex::new(BTreeSet::new()) }
    }

    pub fn acquire(&self) -> Result<u16, PoolExhausted> {
        let mut taken = self.taken.lock().expect("port pool mutex poisoned");
        for port in self.range.clone() {
            if !taken.contains(&port) {
                taken.insert(port);
                return Ok(port);
            }
        }
        Err(PoolExhausted)
    }

    pub fn release(&self, port: u16) {
        self.taken.lock().expect("port pool mutex poisoned").remove(&port);
    }
}

impl Default for PortPool {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_RANGE)
    }
}
