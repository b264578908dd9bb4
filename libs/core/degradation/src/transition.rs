// [libs/core/degradation/src/transition.rs]
//! Pure hysteresis logic, isolated from the ticker so it can be unit tested
//! without sleeping real time (§4.2: "Recovery is hysteretic").

use aegis_domain_models::level::DegradationLevel;
use std::time::{Duration, Instant};

pub struct TransitionState {
    current: DegradationLevel,
    last_transition: Instant,
}

impl TransitionState {
    pub fn new(now: Instant) -> Self {
        Self { current: DegradationLevel::Normal, last_transition: now }
    }

    pub fn current(&self) -> DegradationLevel {
        self.current
    }

    /// Feed one tick's target level. Returns `Some(new_level)` only when the
    /// effective level actually changes.
    ///
    /// Upgrades (rank increases, i.e. toward Emergency) apply immediately.
    /// Downgrades (toward Normal) only apply once `recovery_delay` has
    /// elapsed since the last transition — a host oscillating across the 70%
    /// boundary faster than `recovery_delay` must not flap back to Normal.
    pub fn observe(
        &mut self,
        target: DegradationLevel,
        recovery_delay: Duration,
        now: Instant,
    ) -> Option<DegradationLevel> {
        if target == self.current {
            return None;
        }

        let is_upgrade = target.rank() > self.current.rank();
        let eligible = is_upgrade || now.duration_since(self.last_transition) >= recovery_delay;

        if !eligible {
            return None;
        }

        self.current = target;
        self.last_transition = now;
        Some(target)
    }
}
