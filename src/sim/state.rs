//! Game state and core simulation types
//!
//! Everything one play session needs lives in `SimulationState`; nothing is
//! global, so independent sessions can run side by side.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyDriver;
use super::entity::{Bullet, Enemy, Player, PowerUp, PowerUpKind};
use super::spawner::{Spawn, Spawner};
use crate::consts::*;
use crate::{random_spawn_x, us_to_ms};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Run ended; terminal until restart
    GameOver,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// An enemy reached the unshielded ship
    Collision,
    /// Misses pushed the score below zero
    NegativeScore,
}

/// Things that happened during a tick, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired { count: u32 },
    EnemyDestroyed,
    EnemyMissed,
    PowerUpCollected(PowerUpKind),
    BuffExpired(PowerUpKind),
    NewHighScore(i64),
    GameOver { cause: GameOverCause, score: i64 },
}

/// Per-run counters for the game-over summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub kills: u32,
    pub misses: u32,
    pub shots_fired: u32,
    pub powerups_collected: u32,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulated time since the session started, in whole microseconds
    pub time_us: u64,
    pub tick_count: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub score: i64,
    /// Best score seen, carried across restarts
    pub high_score: i64,
    pub stats: SessionStats,
    pub spawner: Spawner,
    pub difficulty: DifficultyDriver,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl SimulationState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, high_score: i64, slow_shot_enabled: bool) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            time_us: 0,
            tick_count: 0,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            score: 0,
            high_score,
            stats: SessionStats::default(),
            spawner: Spawner::new(slow_shot_enabled),
            difficulty: DifficultyDriver::default(),
            events: Vec::new(),
        }
    }

    /// Throw away the current run and start a fresh one. Only the high score
    /// and the spawn table survive.
    pub fn restart(&mut self, seed: u64) {
        let high_score = self.high_score;
        let table = self.spawner.table().clone();
        *self = Self::new(seed, high_score, true);
        self.spawner = Spawner::with_table(table);
        log::info!("Session restarted with seed {}", seed);
    }

    /// Simulated time in milliseconds
    pub fn time_ms(&self) -> f64 {
        us_to_ms(self.time_us)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn set_slow_shot_enabled(&mut self, enabled: bool) {
        self.spawner.set_slow_shot_enabled(enabled);
    }

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place a spawner decision into the world
    pub fn apply_spawn(&mut self, spawn: Spawn) {
        match spawn {
            Spawn::Enemy => {
                let x = random_spawn_x(&mut self.rng, ENEMY_SIZE);
                self.enemies.push(Enemy::new(x));
            }
            Spawn::PowerUp(kind) => {
                let x = random_spawn_x(&mut self.rng, POWERUP_SIZE);
                log::debug!("Spawned {} power-up at x={:.0}", kind.as_str(), x);
                self.powerups.push(PowerUp::new(x, kind));
            }
        }
    }

    /// Enter the terminal phase. All buffs and their expiries are dropped.
    pub fn enter_game_over(&mut self, cause: GameOverCause) {
        if self.is_game_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.player.buffs.clear_all();
        self.events.push(GameEvent::GameOver {
            cause,
            score: self.score,
        });
        log::info!(
            "Game over ({:?}) score={} kills={} misses={}",
            cause,
            self.score,
            self.stats.kills,
            self.stats.misses
        );
    }

    /// Raise the high score if the current score beats it
    pub fn update_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::DifficultyPhase;

    #[test]
    fn test_new_state_is_clean() {
        let state = SimulationState::new(1, 250, true);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 250);
        assert!(state.bullets.is_empty() && state.enemies.is_empty() && state.powerups.is_empty());
        assert_eq!(state.difficulty.multiplier(), 0.1);
    }

    #[test]
    fn test_spawned_entities_stay_in_field() {
        let mut state = SimulationState::new(3, 0, true);
        for _ in 0..200 {
            state.apply_spawn(Spawn::Enemy);
            state.apply_spawn(Spawn::PowerUp(PowerUpKind::Shield));
        }
        assert!(state.enemies.iter().all(|e| e.pos.x >= 0.0 && e.pos.x < FIELD_WIDTH - ENEMY_SIZE));
        assert!(state.powerups.iter().all(|p| p.pos.x >= 0.0 && p.pos.x < FIELD_WIDTH - POWERUP_SIZE));
        assert!(state.enemies.iter().all(|e| e.pos.y == 0.0));
    }

    #[test]
    fn test_game_over_clears_buffs_once() {
        let mut state = SimulationState::new(1, 0, true);
        state.player.buffs.activate(PowerUpKind::Shield, 0.0);
        state.player.buffs.activate(PowerUpKind::TripleShot, 0.0);
        state.enter_game_over(GameOverCause::Collision);
        state.enter_game_over(GameOverCause::NegativeScore);
        assert!(state.player.buffs.active_with_remaining(0.0).is_empty());
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_restart_resets_world_but_keeps_high_score() {
        let mut state = SimulationState::new(1, 0, false);
        state.score = 120;
        state.update_high_score();
        state.apply_spawn(Spawn::Enemy);
        state.bullets.push(Bullet::new(glam::Vec2::new(10.0, 10.0), 0.0));
        state.difficulty.advance(95_000.0);
        assert_eq!(state.difficulty.phase(), DifficultyPhase::Cyclic);
        state.enter_game_over(GameOverCause::Collision);

        state.restart(2);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 120);
        assert!(state.enemies.is_empty() && state.bullets.is_empty());
        assert_eq!(state.difficulty.multiplier(), 0.1);
        assert_eq!(state.difficulty.phase(), DifficultyPhase::Ramping);
        assert!(state.events.is_empty());
        // Spawn table toggle survives
        assert_eq!(state.spawner.table(), &crate::sim::PowerUpTable::without_slow_shot());
    }
}
