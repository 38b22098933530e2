//! Timed player buffs
//!
//! One slot per power-up kind holding an active flag and an absolute expiry
//! timestamp. Expiry is resolved by `sweep` once per tick, so re-activation only
//! has to move the timestamp; there is no pending callback to cancel.
//!
//! Timestamps are whole microseconds. Callers pass milliseconds, which are
//! rounded once on the way in, so stacking arithmetic is exact.

use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;
use crate::consts::{BASE_SHOT_INTERVAL_MS, FAST_SHOT_INTERVAL_MS, SLOW_SHOT_INTERVAL_MS};
use crate::{ms_to_us, us_to_ms};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffSlot {
    pub active: bool,
    pub expires_at_us: u64,
}

/// Buff flags and expiries, indexed by `PowerUpKind::index`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffTable {
    slots: [BuffSlot; 4],
}

impl BuffTable {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.slots[kind.index()].active
    }

    pub fn slot(&self, kind: PowerUpKind) -> BuffSlot {
        self.slots[kind.index()]
    }

    /// Time left on a buff, 0 when inactive
    pub fn remaining_ms(&self, kind: PowerUpKind, now_ms: f64) -> f64 {
        us_to_ms(self.remaining_us(kind, ms_to_us(now_ms)))
    }

    fn remaining_us(&self, kind: PowerUpKind, now_us: u64) -> u64 {
        let slot = self.slots[kind.index()];
        if slot.active {
            slot.expires_at_us.saturating_sub(now_us)
        } else {
            0
        }
    }

    /// Grant a buff. An already-held buff keeps its remaining time and gains
    /// the full base duration on top. FastShot cancels SlowShot; SlowShot does
    /// not cancel FastShot.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) {
        let now_us = ms_to_us(now_ms);
        let remaining = self.remaining_us(kind, now_us);
        let slot = &mut self.slots[kind.index()];
        slot.active = true;
        slot.expires_at_us = now_us + remaining + ms_to_us(kind.base_duration_ms());

        if kind == PowerUpKind::FastShot {
            self.clear(PowerUpKind::SlowShot);
        }

        log::debug!(
            "Buff {} active until {:.0}ms (carried {:.0}ms)",
            kind.as_str(),
            us_to_ms(self.slots[kind.index()].expires_at_us),
            us_to_ms(remaining)
        );
    }

    pub fn clear(&mut self, kind: PowerUpKind) {
        self.slots[kind.index()] = BuffSlot::default();
    }

    pub fn clear_all(&mut self) {
        self.slots = [BuffSlot::default(); 4];
    }

    /// Deactivate every buff whose expiry has passed; returns the expired kinds
    pub fn sweep(&mut self, now_ms: f64) -> Vec<PowerUpKind> {
        let now_us = ms_to_us(now_ms);
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slots[kind.index()];
            if slot.active && now_us >= slot.expires_at_us {
                self.clear(kind);
                expired.push(kind);
            }
        }
        expired
    }

    /// Active buffs with their remaining time, for HUD timers
    pub fn active_with_remaining(&self, now_ms: f64) -> Vec<(PowerUpKind, f64)> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .map(|kind| (kind, self.remaining_ms(kind, now_ms)))
            .collect()
    }

    /// Minimum time between shots. SlowShot wins if both cadence buffs are held.
    pub fn shot_interval_ms(&self) -> f64 {
        if self.is_active(PowerUpKind::SlowShot) {
            SLOW_SHOT_INTERVAL_MS
        } else if self.is_active(PowerUpKind::FastShot) {
            FAST_SHOT_INTERVAL_MS
        } else {
            BASE_SHOT_INTERVAL_MS
        }
    }
}
