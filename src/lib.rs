//! Dodge Blast - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, difficulty, buffs, tick)
//! - `renderer`: Shape generation and WebGPU pipeline
//! - `session`: Fixed-step driver wiring the simulation to its collaborators
//! - `persistence`: Key/value stores for the high score and settings
//! - `audio`: Sound effect sinks

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one tick per display frame)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the session will try to catch up on (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Play field dimensions (pixels, origin top-left, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Keyboard steering speed (pixels per tick)
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Gap between the ship and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    /// Pixels per tick along the launch angle
    pub const BULLET_SPEED: f32 = 10.0;
    /// Side bullets of a triple shot fan out by this many degrees
    pub const TRIPLE_SHOT_SPREAD_DEG: f32 = 25.0;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 30.0;
    /// Pixels per tick at a multiplier of 1.0
    pub const ENEMY_BASE_SPEED: f32 = 3.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_SPEED: f32 = 2.0;

    /// Scoring
    pub const KILL_SCORE: i64 = 10;
    pub const MISS_PENALTY: i64 = 5;

    /// Shot cadence (ms between shots)
    pub const BASE_SHOT_INTERVAL_MS: f64 = 200.0;
    pub const SLOW_SHOT_INTERVAL_MS: f64 = 1000.0;
    pub const FAST_SHOT_INTERVAL_MS: f64 = BASE_SHOT_INTERVAL_MS / 5.0;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

/// Milliseconds to whole microseconds, rounded. Negative or non-finite spans
/// count as zero.
#[inline]
pub fn ms_to_us(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        (ms * 1000.0).round() as u64
    } else {
        0
    }
}

#[inline]
pub fn us_to_ms(us: u64) -> f64 {
    us as f64 / 1000.0
}

/// Random horizontal spawn offset for an entity of the given width
#[inline]
pub fn random_spawn_x<R: rand::Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    rng.random_range(0.0..consts::FIELD_WIDTH - width)
}
