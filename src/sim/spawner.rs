//! Enemy/power-up spawner
//!
//! Makes one decision every `SPAWN_INTERVAL_MS` of simulated time. Power-ups are
//! gated behind a minimum number of enemies since the last one, so two can never
//! spawn back to back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;

pub const SPAWN_INTERVAL_MS: f64 = 200.0;
/// Enemies that must spawn between two power-ups
pub const MIN_ENEMIES_BETWEEN_POWERUPS: u32 = 5;
/// Chance that an eligible decision yields a power-up
pub const POWERUP_CHANCE: f64 = 1.0 / 15.0;

/// What a spawn decision produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    Enemy,
    PowerUp(PowerUpKind),
}

/// Weighted power-up type table. Weights should sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTable {
    pub weights: [(PowerUpKind, f32); 4],
}

impl PowerUpTable {
    /// All four types available
    pub fn standard() -> Self {
        Self {
            weights: [
                (PowerUpKind::Shield, 0.35),
                (PowerUpKind::TripleShot, 0.35),
                (PowerUpKind::SlowShot, 0.15),
                (PowerUpKind::FastShot, 0.15),
            ],
        }
    }

    /// SlowShot disabled; its weight moves to FastShot
    pub fn without_slow_shot() -> Self {
        Self {
            weights: [
                (PowerUpKind::Shield, 0.35),
                (PowerUpKind::TripleShot, 0.35),
                (PowerUpKind::SlowShot, 0.0),
                (PowerUpKind::FastShot, 0.30),
            ],
        }
    }

    pub fn for_slow_shot(enabled: bool) -> Self {
        if enabled {
            Self::standard()
        } else {
            Self::without_slow_shot()
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.weights.iter().map(|(_, w)| *w).sum()
    }

    /// Non-negative finite weights that sum to 1.0
    pub fn is_valid(&self) -> bool {
        self.weights.iter().all(|(_, w)| w.is_finite() && *w >= 0.0)
            && (self.total_weight() - 1.0).abs() < 1e-4
    }

    /// Pick a type for a roll in [0, 1). Rolls the table does not cover fall
    /// back to `PowerUpKind::DEFAULT`.
    pub fn pick(&self, roll: f32) -> PowerUpKind {
        let mut cumulative = 0.0;
        for (kind, weight) in self.weights {
            if weight.is_nan() || weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if roll < cumulative {
                return kind;
            }
        }
        log::warn!(
            "Power-up table does not cover roll {:.3} (total weight {:.3}), using {}",
            roll,
            self.total_weight(),
            PowerUpKind::DEFAULT.as_str()
        );
        PowerUpKind::DEFAULT
    }
}

/// Spawn cadence state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Time banked toward the next decision (ms)
    accumulator_ms: f64,
    /// Enemies spawned since the last power-up
    pub enemies_since_powerup: u32,
    table: PowerUpTable,
}

impl Spawner {
    pub fn new(slow_shot_enabled: bool) -> Self {
        Self::with_table(PowerUpTable::for_slow_shot(slow_shot_enabled))
    }

    pub fn with_table(table: PowerUpTable) -> Self {
        if !table.is_valid() {
            log::warn!(
                "Power-up table weights sum to {:.3}; uncovered rolls use the default type",
                table.total_weight()
            );
        }
        Self {
            accumulator_ms: 0.0,
            enemies_since_powerup: 0,
            table,
        }
    }

    pub fn table(&self) -> &PowerUpTable {
        &self.table
    }

    pub fn set_slow_shot_enabled(&mut self, enabled: bool) {
        self.table = PowerUpTable::for_slow_shot(enabled);
    }

    /// Bank elapsed time and make one decision per full interval
    pub fn advance<R: Rng + ?Sized>(&mut self, dt_ms: f64, rng: &mut R) -> Vec<Spawn> {
        self.accumulator_ms += dt_ms;
        let mut spawns = Vec::new();
        while self.accumulator_ms >= SPAWN_INTERVAL_MS {
            self.accumulator_ms -= SPAWN_INTERVAL_MS;
            spawns.push(self.decide(rng));
        }
        spawns
    }

    /// A single spawn decision
    pub fn decide<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Spawn {
        let eligible = self.enemies_since_powerup >= MIN_ENEMIES_BETWEEN_POWERUPS;
        if eligible && rng.random_bool(POWERUP_CHANCE) {
            self.enemies_since_powerup = 0;
            Spawn::PowerUp(self.table.pick(rng.random::<f32>()))
        } else {
            self.enemies_since_powerup += 1;
            Spawn::Enemy
        }
    }
}
