//! Per-frame simulation tick
//!
//! Order within a tick: input, buff expiry, timers (difficulty, spawner),
//! firing, bullets, enemies, power-ups, high score. Bullets always move before
//! enemies are tested against them.

use super::entity::PowerUpKind;
use super::state::{GameEvent, GameOverCause, SimulationState};
use crate::consts::*;
use crate::{ms_to_us, random_spawn_x};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute pointer x in field pixels
    pub pointer_x: Option<f32>,
    /// Keyboard steering: -1.0 left, 0.0 none, 1.0 right
    pub steer: f32,
    /// Fire button held
    pub fire: bool,
    /// Fire continuously without holding the button
    pub auto_fire: bool,
}

/// Advance the game state by `dt_ms` of simulated time
pub fn tick(state: &mut SimulationState, input: &TickInput, dt_ms: f64) {
    if state.is_game_over() {
        return;
    }

    state.tick_count += 1;
    state.time_us += ms_to_us(dt_ms);
    let now = state.time_ms();

    if let Some(x) = input.pointer_x {
        state.player.move_to_pointer(x);
    }
    if input.steer != 0.0 {
        state.player.steer(input.steer);
    }

    for kind in state.player.buffs.sweep(now) {
        log::debug!("Buff {} expired", kind.as_str());
        state.events.push(GameEvent::BuffExpired(kind));
    }

    state.difficulty.advance(dt_ms);
    let spawns = state.spawner.advance(dt_ms, &mut state.rng);
    for spawn in spawns {
        state.apply_spawn(spawn);
    }

    if input.fire || input.auto_fire {
        let fired = state.player.try_fire(now);
        if !fired.is_empty() {
            let count = fired.len() as u32;
            state.stats.shots_fired += count;
            state.bullets.extend(fired);
            state.events.push(GameEvent::BulletFired { count });
        }
    }

    advance_bullets(state);
    advance_enemies(state);
    if !state.is_game_over() {
        advance_powerups(state, now);
    }

    state.update_high_score();
}

fn advance_bullets(state: &mut SimulationState) {
    for bullet in &mut state.bullets {
        bullet.update();
    }
    state.bullets.retain(|b| !b.is_off_top());
}

fn award_kill(state: &mut SimulationState) {
    state.score += KILL_SCORE;
    state.stats.kills += 1;
    state.events.push(GameEvent::EnemyDestroyed);
}

fn advance_enemies(state: &mut SimulationState) {
    let multiplier = state.difficulty.multiplier();
    let player_box = state.player.bounds();
    let shielded = state.player.is_shielded();

    // Walk a taken copy so removals never shift unvisited enemies
    let mut pending = std::mem::take(&mut state.enemies).into_iter();
    let mut survivors = Vec::with_capacity(pending.len());

    while let Some(mut enemy) = pending.next() {
        enemy.update(multiplier);
        let bounds = enemy.bounds();

        if bounds.overlaps(&player_box) {
            if shielded {
                award_kill(state);
                continue;
            }
            survivors.push(enemy);
            survivors.extend(pending);
            state.enemies = survivors;
            state.enter_game_over(GameOverCause::Collision);
            return;
        }

        if let Some(hit) = state.bullets.iter().position(|b| b.bounds().overlaps(&bounds)) {
            state.bullets.swap_remove(hit);
            award_kill(state);
            continue;
        }

        if enemy.is_past_bottom() {
            state.score -= MISS_PENALTY;
            state.stats.misses += 1;
            state.events.push(GameEvent::EnemyMissed);
            if state.score < 0 {
                survivors.extend(pending);
                state.enemies = survivors;
                state.enter_game_over(GameOverCause::NegativeScore);
                return;
            }
            continue;
        }

        survivors.push(enemy);
    }

    state.enemies = survivors;
}

fn advance_powerups(state: &mut SimulationState, now: f64) {
    let player_box = state.player.bounds();
    let rng = &mut state.rng;
    let mut collected: Vec<PowerUpKind> = Vec::new();

    state.powerups.retain_mut(|powerup| {
        powerup.update();
        if powerup.bounds().overlaps(&player_box) {
            collected.push(powerup.kind);
            return false;
        }
        if powerup.is_past_bottom() {
            powerup.recycle(random_spawn_x(rng, POWERUP_SIZE));
        }
        true
    });

    for kind in collected {
        state.player.buffs.activate(kind, now);
        state.stats.powerups_collected += 1;
        state.events.push(GameEvent::PowerUpCollected(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::DifficultyPhase;
    use crate::sim::entity::{Bullet, Enemy, PowerUp};
    use crate::sim::state::GamePhase;
    use glam::Vec2;
    use proptest::prelude::*;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn fresh() -> SimulationState {
        SimulationState::new(12345, 0, true)
    }

    #[test]
    fn test_fire_spawns_bullet_and_event() {
        let mut state = fresh();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::BulletFired { count: 1 }));

        // Next frame is inside the 200ms interval
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.stats.shots_fired, 1);
    }

    #[test]
    fn test_auto_fire_without_button() {
        let mut state = fresh();
        let input = TickInput {
            auto_fire: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        // One second of frames at a 200ms cadence
        assert!(state.stats.shots_fired >= 4 && state.stats.shots_fired <= 5);
    }

    #[test]
    fn test_bullet_pruned_off_top() {
        let mut state = fresh();
        state.bullets.push(Bullet::new(Vec2::new(100.0, 5.0), 0.0));
        state.bullets.push(Bullet::new(Vec2::new(200.0, 300.0), 0.0));
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.x, 200.0);
    }

    #[test]
    fn test_bullet_hits_enemy() {
        let mut state = fresh();
        state.enemies.push(Enemy::new(100.0));
        state.enemies[0].pos.y = 300.0;
        state.bullets.push(Bullet::new(Vec2::new(110.0, 325.0), 0.0));
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.stats.kills, 1);
        assert!(state.drain_events().contains(&GameEvent::EnemyDestroyed));
    }

    #[test]
    fn test_one_bullet_kills_one_enemy() {
        let mut state = fresh();
        for _ in 0..2 {
            let mut enemy = Enemy::new(100.0);
            enemy.pos.y = 300.0;
            state.enemies.push(enemy);
        }
        state.bullets.push(Bullet::new(Vec2::new(110.0, 325.0), 0.0));
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_shield_absorbs_collision() {
        let mut state = fresh();
        state.player.buffs.activate(PowerUpKind::Shield, 0.0);
        let mut enemy = Enemy::new(state.player.pos.x);
        enemy.pos.y = state.player.pos.y;
        state.enemies.push(enemy);
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_unshielded_collision_is_terminal() {
        let mut state = fresh();
        state.player.buffs.activate(PowerUpKind::TripleShot, 0.0);
        let mut enemy = Enemy::new(state.player.pos.x);
        enemy.pos.y = state.player.pos.y;
        state.enemies.push(enemy);
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.buffs.is_active(PowerUpKind::TripleShot));
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                cause: GameOverCause::Collision,
                ..
            }
        )));

        // Nothing moves or scores after game over
        let time = state.time_us;
        state.bullets.push(Bullet::new(Vec2::new(0.0, 300.0), 0.0));
        for _ in 0..100 {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.time_us, time);
        assert_eq!(state.bullets[0].pos.y, 300.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_first_negative_score_ends_game() {
        let mut state = fresh();
        for x in [0.0, 100.0, 200.0] {
            let mut enemy = Enemy::new(x);
            enemy.pos.y = FIELD_HEIGHT;
            state.enemies.push(enemy);
        }
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.score, -5);
        assert_eq!(state.stats.misses, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver {
            cause: GameOverCause::NegativeScore,
            score: -5
        }));
    }

    #[test]
    fn test_miss_with_positive_score_continues() {
        let mut state = fresh();
        state.score = 10;
        let mut enemy = Enemy::new(0.0);
        enemy.pos.y = FIELD_HEIGHT;
        state.enemies.push(enemy);
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.score, 5);
        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_powerup_pickup_activates_buff() {
        let mut state = fresh();
        let player = state.player.pos;
        state.powerups.push(PowerUp::new(player.x + 5.0, PowerUpKind::TripleShot));
        state.powerups[0].pos.y = player.y;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.powerups.is_empty());
        assert!(state.player.buffs.is_active(PowerUpKind::TripleShot));
        assert_eq!(state.stats.powerups_collected, 1);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PowerUpCollected(PowerUpKind::TripleShot)));
    }

    #[test]
    fn test_fast_shot_pickup_clears_slow_shot() {
        let mut state = fresh();
        state.player.buffs.activate(PowerUpKind::SlowShot, 0.0);
        let player = state.player.pos;
        state.powerups.push(PowerUp::new(player.x, PowerUpKind::FastShot));
        state.powerups[0].pos.y = player.y;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.player.buffs.is_active(PowerUpKind::FastShot));
        assert!(!state.player.buffs.is_active(PowerUpKind::SlowShot));
    }

    #[test]
    fn test_powerup_recycled_at_bottom() {
        let mut state = fresh();
        state.powerups.push(PowerUp::new(0.0, PowerUpKind::Shield));
        state.powerups[0].pos.y = FIELD_HEIGHT - 1.0;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.powerups[0].pos.y, 0.0);
        assert_eq!(state.powerups[0].kind, PowerUpKind::Shield);
    }

    #[test]
    fn test_shield_expires_through_ticks() {
        let mut state = fresh();
        state.player.buffs.activate(PowerUpKind::Shield, 0.0);
        // 20ms frames land exactly on the 5000ms deadline
        for _ in 0..249 {
            tick(&mut state, &idle(), 20.0);
            state.enemies.clear();
        }
        assert!(state.player.is_shielded());
        tick(&mut state, &idle(), 20.0);
        assert!(!state.player.is_shielded());
        assert!(state
            .drain_events()
            .contains(&GameEvent::BuffExpired(PowerUpKind::Shield)));
    }

    #[test]
    fn test_high_score_follows_score() {
        let mut state = SimulationState::new(1, 15, true);
        state.enemies.push(Enemy::new(100.0));
        state.enemies[0].pos.y = 300.0;
        state.bullets.push(Bullet::new(Vec2::new(110.0, 325.0), 0.0));
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.high_score, 15);

        state.score = 20;
        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.high_score, 20);
        assert!(state.drain_events().contains(&GameEvent::NewHighScore(20)));
    }

    #[test]
    fn test_steering_moves_ship() {
        let mut state = fresh();
        let start = state.player.pos.x;
        let input = TickInput {
            steer: -1.0,
            ..Default::default()
        };
        for _ in 0..3 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.player.pos.x, start - 3.0 * PLAYER_SPEED);
    }

    #[test]
    fn test_shield_restack_at_frame_times_keeps_full_duration() {
        let mut state = fresh();
        for _ in 0..7 {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        state.player.buffs.activate(PowerUpKind::Shield, state.time_ms());
        // Long enough for the first shield to run out
        for _ in 0..400 {
            tick(&mut state, &idle(), SIM_DT_MS);
            state.enemies.clear();
            state.powerups.clear();
        }
        assert!(!state.player.is_shielded());
        state.player.buffs.activate(PowerUpKind::Shield, state.time_ms());
        assert_eq!(
            state.player.buffs.remaining_ms(PowerUpKind::Shield, state.time_ms()),
            5_000.0
        );
    }

    #[test]
    fn test_spawner_feeds_world() {
        let mut state = fresh();
        // Thirteen frames pass the first 200ms decision but not the second
        for _ in 0..13 {
            tick(&mut state, &idle(), SIM_DT_MS);
        }
        assert_eq!(state.enemies.len() + state.powerups.len(), 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = fresh();
        state.score = 40;
        state.difficulty.advance(100_000.0);
        let mut enemy = Enemy::new(state.player.pos.x);
        enemy.pos.y = state.player.pos.y;
        state.enemies.push(enemy);
        tick(&mut state, &idle(), SIM_DT_MS);
        assert!(state.is_game_over());

        state.restart(777);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 40);
        assert!(state.enemies.is_empty() && state.bullets.is_empty() && state.powerups.is_empty());
        assert_eq!(state.difficulty.multiplier(), 0.1);
        assert_eq!(state.difficulty.phase(), DifficultyPhase::Ramping);

        tick(&mut state, &idle(), SIM_DT_MS);
        assert_eq!(state.tick_count, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = SimulationState::new(99999, 0, true);
        let mut state2 = SimulationState::new(99999, 0, true);

        for i in 0..3_000u32 {
            let input = TickInput {
                pointer_x: Some(((i as f32) * 3.7) % FIELD_WIDTH),
                fire: i % 3 != 0,
                ..Default::default()
            };
            tick(&mut state1, &input, SIM_DT_MS);
            tick(&mut state2, &input, SIM_DT_MS);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.stats, state2.stats);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.events, state2.events);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(xs in proptest::collection::vec(-2_000.0f32..3_000.0, 1..50)) {
            let mut state = fresh();
            for x in xs {
                let input = TickInput { pointer_x: Some(x), ..Default::default() };
                tick(&mut state, &input, SIM_DT_MS);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= FIELD_WIDTH - PLAYER_SIZE);
            }
        }

        #[test]
        fn prop_no_bullet_survives_above_field(
            y in 0.0f32..40.0,
            angle in -0.5f32..0.5,
        ) {
            let mut state = fresh();
            state.bullets.push(Bullet::new(Vec2::new(400.0, y), angle));
            for _ in 0..5 {
                tick(&mut state, &idle(), SIM_DT_MS);
                prop_assert!(state.bullets.iter().all(|b| b.pos.y >= 0.0));
            }
            prop_assert!(state.bullets.is_empty());
        }
    }
}
