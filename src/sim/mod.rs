//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod buffs;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use buffs::BuffTable;
pub use collision::Aabb;
pub use difficulty::{DifficultyDriver, DifficultyPhase};
pub use entity::{Bullet, Enemy, Player, PowerUp, PowerUpKind};
pub use spawner::{PowerUpTable, Spawn, Spawner};
pub use state::{GameEvent, GameOverCause, GamePhase, SessionStats, SimulationState};
pub use tick::{TickInput, tick};
