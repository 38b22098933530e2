//! Enemy speed difficulty driver
//!
//! The multiplier is kept in hundredths so ramp steps never drift: it climbs
//! from 0.10 to 1.00 one step per second, then cycles through target speeds,
//! picking a new target every 60 seconds and easing toward it at the same rate.

use serde::{Deserialize, Serialize};

/// Time between multiplier steps (ms)
pub const STEP_INTERVAL_MS: f64 = 1_000.0;
/// Seconds between target changes once cycling
pub const CYCLE_PERIOD_SECS: u32 = 60;
/// Starting multiplier (hundredths)
pub const INITIAL_LEVEL: u32 = 10;
/// Multiplier at which the ramp hands over to the cycle (hundredths)
pub const CRUISE_LEVEL: u32 = 100;
/// Change per step (hundredths)
pub const LEVEL_STEP: u32 = 1;
/// Target levels visited in the cyclic phase (hundredths)
pub const CYCLE_LEVELS: [u32; 4] = [100, 150, 100, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyPhase {
    /// Climbing toward cruise speed
    Ramping,
    /// Alternating easy/hard waves
    Cyclic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyDriver {
    level: u32,
    phase: DifficultyPhase,
    cycle_index: usize,
    target_level: u32,
    /// Whole seconds since the current target was chosen
    seconds_in_wave: u32,
    /// Time banked toward the next step (ms)
    accumulator_ms: f64,
}

impl Default for DifficultyDriver {
    fn default() -> Self {
        Self {
            level: INITIAL_LEVEL,
            phase: DifficultyPhase::Ramping,
            cycle_index: 0,
            target_level: CRUISE_LEVEL,
            seconds_in_wave: 0,
            accumulator_ms: 0.0,
        }
    }
}

impl DifficultyDriver {
    /// Current enemy speed multiplier
    pub fn multiplier(&self) -> f32 {
        self.level as f32 / 100.0
    }

    pub fn target_multiplier(&self) -> f32 {
        self.target_level as f32 / 100.0
    }

    pub fn phase(&self) -> DifficultyPhase {
        self.phase
    }

    pub fn cycle_index(&self) -> usize {
        self.cycle_index
    }

    /// Bank elapsed time and run one step per full second
    pub fn advance(&mut self, dt_ms: f64) {
        self.accumulator_ms += dt_ms;
        while self.accumulator_ms >= STEP_INTERVAL_MS {
            self.accumulator_ms -= STEP_INTERVAL_MS;
            self.step();
        }
    }

    fn step(&mut self) {
        match self.phase {
            DifficultyPhase::Ramping => {
                self.level = (self.level + LEVEL_STEP).min(CRUISE_LEVEL);
                if self.level >= CRUISE_LEVEL {
                    self.phase = DifficultyPhase::Cyclic;
                    self.cycle_index = 0;
                    self.target_level = CYCLE_LEVELS[0];
                    self.seconds_in_wave = 0;
                    log::info!("Difficulty ramp complete, entering cyclic waves");
                }
            }
            DifficultyPhase::Cyclic => {
                self.seconds_in_wave += 1;
                if self.seconds_in_wave >= CYCLE_PERIOD_SECS {
                    self.seconds_in_wave = 0;
                    self.cycle_index = (self.cycle_index + 1) % CYCLE_LEVELS.len();
                    self.target_level = CYCLE_LEVELS[self.cycle_index];
                    log::info!(
                        "Difficulty wave {}: easing {:.2} -> {:.2}",
                        self.cycle_index,
                        self.multiplier(),
                        self.target_multiplier()
                    );
                }
                if self.level < self.target_level {
                    self.level = (self.level + LEVEL_STEP).min(self.target_level);
                } else if self.level > self.target_level {
                    self.level = self.level.saturating_sub(LEVEL_STEP).max(self.target_level);
                }
            }
        }
    }
}
