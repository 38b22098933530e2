//! Entity types and their per-tick update rules
//!
//! Positions are top-left corners in field pixels; y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::buffs::BuffTable;
use super::collision::Aabb;
use crate::consts::*;
use crate::{deg_to_rad, ms_to_us};

/// Power-up types. Each one maps to exactly one player buff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    TripleShot,
    SlowShot,
    FastShot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::TripleShot,
        PowerUpKind::SlowShot,
        PowerUpKind::FastShot,
    ];

    /// Fallback type when a weighted draw cannot pick one
    pub const DEFAULT: PowerUpKind = PowerUpKind::Shield;

    /// Base buff duration granted per pickup (ms)
    pub fn base_duration_ms(self) -> f64 {
        match self {
            PowerUpKind::Shield => 5_000.0,
            PowerUpKind::TripleShot => 7_000.0,
            PowerUpKind::SlowShot => 10_000.0,
            PowerUpKind::FastShot => 5_000.0,
        }
    }

    /// Slot index in the buff table
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PowerUpKind::Shield => 0,
            PowerUpKind::TripleShot => 1,
            PowerUpKind::SlowShot => 2,
            PowerUpKind::FastShot => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::TripleShot => "triple_shot",
            PowerUpKind::SlowShot => "slow_shot",
            PowerUpKind::FastShot => "fast_shot",
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Active buffs and their expiry timestamps
    pub buffs: BuffTable,
    /// Simulation time of the last shot (whole microseconds)
    pub last_shot_us: Option<u64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                FIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                FIELD_HEIGHT - PLAYER_SIZE - PLAYER_BOTTOM_MARGIN,
            ),
            buffs: BuffTable::default(),
            last_shot_us: None,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    /// Center the ship under an absolute pointer x, kept inside the field.
    /// Non-finite input is ignored.
    pub fn move_to_pointer(&mut self, pointer_x: f32) {
        if !pointer_x.is_finite() {
            return;
        }
        self.pos.x = (pointer_x - PLAYER_SIZE / 2.0).clamp(0.0, FIELD_WIDTH - PLAYER_SIZE);
    }

    /// Nudge the ship by `PLAYER_SPEED` in the given direction (-1.0 left,
    /// 1.0 right), kept inside the field. Non-finite input is ignored.
    pub fn steer(&mut self, direction: f32) {
        if !direction.is_finite() {
            return;
        }
        let dx = direction.clamp(-1.0, 1.0) * PLAYER_SPEED;
        self.pos.x = (self.pos.x + dx).clamp(0.0, FIELD_WIDTH - PLAYER_SIZE);
    }

    pub fn is_shielded(&self) -> bool {
        self.buffs.is_active(PowerUpKind::Shield)
    }

    /// Where bullets leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + PLAYER_SIZE / 2.0 - BULLET_WIDTH / 2.0, self.pos.y)
    }

    /// Fire if the shot interval has elapsed; returns the new bullets
    pub fn try_fire(&mut self, now_ms: f64) -> Vec<Bullet> {
        let now_us = ms_to_us(now_ms);
        let interval_us = ms_to_us(self.buffs.shot_interval_ms());
        if let Some(last) = self.last_shot_us {
            if now_us.saturating_sub(last) <= interval_us {
                return Vec::new();
            }
        }
        self.last_shot_us = Some(now_us);

        let muzzle = self.muzzle();
        if self.buffs.is_active(PowerUpKind::TripleShot) {
            let spread = deg_to_rad(TRIPLE_SHOT_SPREAD_DEG);
            vec![
                Bullet::new(muzzle, -spread),
                Bullet::new(muzzle, 0.0),
                Bullet::new(muzzle, spread),
            ]
        } else {
            vec![Bullet::new(muzzle, 0.0)]
        }
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Launch angle in radians; 0 is straight up, positive fans right
    pub angle: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self { pos, angle }
    }

    pub fn update(&mut self) {
        self.pos.x += BULLET_SPEED * self.angle.sin();
        self.pos.y -= BULLET_SPEED * self.angle.cos();
    }

    pub fn is_off_top(&self) -> bool {
        self.pos.y < 0.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub base_speed: f32,
}

impl Enemy {
    /// Spawn at the top edge
    pub fn new(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, 0.0),
            base_speed: ENEMY_BASE_SPEED,
        }
    }

    pub fn update(&mut self, speed_multiplier: f32) {
        self.pos.y += self.base_speed * speed_multiplier;
    }

    pub fn is_past_bottom(&self) -> bool {
        self.pos.y > FIELD_HEIGHT
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(ENEMY_SIZE))
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, 0.0),
            kind,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += POWERUP_SPEED;
    }

    pub fn is_past_bottom(&self) -> bool {
        self.pos.y > FIELD_HEIGHT
    }

    /// Send back to the top at a new x; the type is kept
    pub fn recycle(&mut self, x: f32) {
        self.pos = Vec2::new(x, 0.0);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}
