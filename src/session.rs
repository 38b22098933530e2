//! Play session driver
//!
//! Turns variable frame times into fixed simulation ticks and routes the
//! simulation's events to audio and persistence. Hosts (browser loop, headless
//! runner) only feed input and call `frame`.

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::highscores::HighScore;
use crate::persistence::Store;
use crate::settings::Settings;
use crate::sim::{GameEvent, PowerUpKind, SimulationState, TickInput, tick};

/// What the HUD shows each frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: i64,
    pub high_score: i64,
    pub game_over: bool,
    /// Active buffs and their remaining time (ms)
    pub buffs: Vec<(PowerUpKind, f64)>,
    pub speed_multiplier: f32,
}

pub struct Session<S: Store, A: AudioSink> {
    state: SimulationState,
    settings: Settings,
    high_score: HighScore,
    store: S,
    audio: A,
    accumulator_ms: f64,
    input: TickInput,
}

impl<S: Store, A: AudioSink> Session<S, A> {
    /// Load persisted values and start a run
    pub fn new(store: S, mut audio: A, seed: u64) -> Self {
        let high_score = HighScore::load(&store);
        let settings = Settings::load(&store);
        audio.set_volume(settings.volume);
        audio.set_muted(settings.muted);
        let state = SimulationState::new(seed, high_score.score, settings.slow_shot_enabled);
        log::info!(
            "Session started (seed {}, high score {}, auto-fire {}, slow shot {})",
            seed,
            high_score.score,
            settings.auto_fire,
            settings.slow_shot_enabled
        );
        Self {
            state,
            settings,
            high_score,
            store,
            audio,
            accumulator_ms: 0.0,
            input: TickInput::default(),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Absolute pointer x in field pixels
    pub fn set_pointer_x(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    pub fn set_firing(&mut self, firing: bool) {
        self.input.fire = firing;
    }

    /// Keyboard steering direction, -1.0 to 1.0
    pub fn set_steer(&mut self, direction: f32) {
        self.input.steer = direction;
    }

    pub fn toggle_auto_fire(&mut self) -> bool {
        let enabled = self.settings.toggle_auto_fire();
        self.settings.save(&mut self.store);
        enabled
    }

    pub fn toggle_slow_shot(&mut self) -> bool {
        let enabled = self.settings.toggle_slow_shot();
        self.state.set_slow_shot_enabled(enabled);
        self.settings.save(&mut self.store);
        enabled
    }

    pub fn toggle_muted(&mut self) -> bool {
        let muted = self.settings.toggle_muted();
        self.audio.set_muted(muted);
        self.settings.save(&mut self.store);
        muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.audio.set_volume(self.settings.volume);
        self.settings.save(&mut self.store);
    }

    /// Start a fresh run; pending ticks and held inputs are dropped
    pub fn restart(&mut self, seed: u64) {
        self.state.restart(seed);
        self.accumulator_ms = 0.0;
        self.input.fire = false;
        self.input.steer = 0.0;
    }

    /// Key press hook; returns true if the key was used. Space restarts once
    /// the run is over, arrows steer and `m` toggles sound.
    pub fn handle_key(&mut self, key: &str, seed: u64) -> bool {
        match key {
            " " if self.state.is_game_over() => self.restart(seed),
            "ArrowLeft" => self.input.steer = -1.0,
            "ArrowRight" => self.input.steer = 1.0,
            "m" | "M" => {
                self.toggle_muted();
            }
            _ => return false,
        }
        true
    }

    /// Key release hook; only releasing the held direction stops steering
    pub fn handle_key_up(&mut self, key: &str) -> bool {
        let released = match key {
            "ArrowLeft" => -1.0,
            "ArrowRight" => 1.0,
            _ => return false,
        };
        if self.input.steer == released {
            self.input.steer = 0.0;
        }
        true
    }

    /// Run as many fixed ticks as `frame_ms` covers; returns the tick count
    pub fn frame(&mut self, frame_ms: f64) -> u32 {
        if self.state.is_game_over() {
            self.accumulator_ms = 0.0;
            return 0;
        }

        if !frame_ms.is_finite() {
            return 0;
        }
        self.accumulator_ms += frame_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator_ms >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                auto_fire: self.settings.auto_fire,
                ..self.input.clone()
            };
            tick(&mut self.state, &input, SIM_DT_MS);
            // The ship stays put until the pointer moves again
            self.input.pointer_x = None;
            self.accumulator_ms -= SIM_DT_MS;
            substeps += 1;
            self.dispatch_events();

            if self.state.is_game_over() {
                self.accumulator_ms = 0.0;
                break;
            }
        }
        substeps
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::BulletFired { .. } => self.audio.play(SoundEffect::Shot),
                GameEvent::EnemyDestroyed => self.audio.play(SoundEffect::EnemyDestroyed),
                GameEvent::NewHighScore(score) => {
                    if self.high_score.submit(score) {
                        self.high_score.save(&mut self.store);
                    }
                }
                GameEvent::PowerUpCollected(kind) => {
                    log::debug!("Collected {}", kind.as_str());
                }
                GameEvent::GameOver { .. }
                | GameEvent::EnemyMissed
                | GameEvent::BuffExpired(_) => {}
            }
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.state.score,
            high_score: self.state.high_score,
            game_over: self.state.is_game_over(),
            buffs: self.state.player.buffs.active_with_remaining(self.state.time_ms()),
            speed_multiplier: self.state.difficulty.multiplier(),
        }
    }
}
