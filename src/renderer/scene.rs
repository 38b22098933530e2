//! Scene assembly
//!
//! Flattens a simulation snapshot into one triangle list. Draw order is back
//! to front: field, power-ups, enemies, bullets, ship, game-over band.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{PowerUp, PowerUpKind, SimulationState};

const CIRCLE_SEGMENTS: u32 = 24;
const GAME_OVER_BAND_HEIGHT: f32 = 80.0;

/// Build every vertex for one frame
pub fn build_scene(state: &SimulationState) -> Vec<Vertex> {
    let mut vertices = shapes::rect(
        Vec2::ZERO,
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
        colors::FIELD,
    );

    for powerup in &state.powerups {
        vertices.extend(powerup_glyph(powerup));
    }

    let enemy_radius = ENEMY_SIZE / 2.0;
    for enemy in &state.enemies {
        vertices.extend(shapes::circle(
            enemy.pos + Vec2::splat(enemy_radius),
            enemy_radius,
            colors::ENEMY,
            CIRCLE_SEGMENTS,
        ));
    }

    let bullet_size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
    for bullet in &state.bullets {
        vertices.extend(shapes::rotated_rect(
            bullet.pos + bullet_size / 2.0,
            bullet_size,
            bullet.angle,
            colors::BULLET,
        ));
    }

    let ship = state.player.pos;
    vertices.extend(shapes::triangle(
        Vec2::new(ship.x + PLAYER_SIZE / 2.0, ship.y),
        Vec2::new(ship.x + PLAYER_SIZE, ship.y + PLAYER_SIZE),
        Vec2::new(ship.x, ship.y + PLAYER_SIZE),
        colors::PLAYER,
    ));
    if state.player.is_shielded() {
        let center = ship + Vec2::splat(PLAYER_SIZE / 2.0);
        vertices.extend(shapes::ring(
            center,
            PLAYER_SIZE * 0.7,
            PLAYER_SIZE * 0.7 + 3.0,
            colors::SHIELD_RING,
            CIRCLE_SEGMENTS,
        ));
    }

    if state.is_game_over() {
        vertices.extend(shapes::rect(
            Vec2::new(0.0, (FIELD_HEIGHT - GAME_OVER_BAND_HEIGHT) / 2.0),
            Vec2::new(FIELD_WIDTH, GAME_OVER_BAND_HEIGHT),
            colors::GAME_OVER_BAND,
        ));
    }

    vertices
}

/// Each power-up kind gets its own silhouette
fn powerup_glyph(powerup: &PowerUp) -> Vec<Vertex> {
    let r = POWERUP_SIZE / 2.0;
    let c = powerup.pos + Vec2::splat(r);
    let color = colors::powerup(powerup.kind);

    match powerup.kind {
        PowerUpKind::Shield => {
            let mut v = shapes::ring(c, r * 0.7, r, color, CIRCLE_SEGMENTS);
            v.extend(shapes::circle(c, r * 0.4, color, CIRCLE_SEGMENTS));
            v
        }
        PowerUpKind::TripleShot => [Vec2::new(-6.0, 3.0), Vec2::new(0.0, -5.0), Vec2::new(6.0, 3.0)]
            .into_iter()
            .flat_map(|offset| shapes::circle(c + offset, 3.0, color, 12))
            .collect(),
        PowerUpKind::SlowShot => {
            // Clock face
            let mut v = shapes::ring(c, r * 0.8, r, color, CIRCLE_SEGMENTS);
            v.extend(shapes::line(c, c + Vec2::new(0.0, -r * 0.6), 2.0, color));
            v.extend(shapes::line(c, c + Vec2::new(r * 0.45, 0.0), 2.0, color));
            v
        }
        PowerUpKind::FastShot => {
            // Double chevron pointing up
            let mut v = Vec::with_capacity(12);
            for dy in [-3.0, 4.0] {
                let tip = c + Vec2::new(0.0, dy - 4.0);
                v.extend(shapes::triangle(
                    tip,
                    c + Vec2::new(r * 0.8, dy + 3.0),
                    c + Vec2::new(-r * 0.8, dy + 3.0),
                    color,
                ));
            }
            v
        }
    }
}
