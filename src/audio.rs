//! Sound effects
//!
//! The session reports effects to an `AudioSink`. On the web, `WebAudio`
//! synthesizes each one with oscillators, so no asset files are needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A shot left the ship
    Shot,
    /// An enemy was destroyed
    EnemyDestroyed,
}

/// Receives one-shot sound effects
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Volume from 0.0 to 1.0
    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// Discards all sound
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Records what was played and the last volume settings applied
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
    pub volume: Option<f32>,
    pub muted: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            self.played.push(effect);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio sink. Each effect keeps its last voice; playing it again
    /// stops that voice and starts over.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
        shot_voice: Option<OscillatorNode>,
        explosion_voice: Option<OscillatorNode>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
                shot_voice: None,
                explosion_voice: None,
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Laser zap - quick falling square wave
        fn play_shot(ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
            let (osc, gain) = Self::create_osc(ctx, 880.0, OscillatorType::Square)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
            Some(osc)
        }

        /// Explosion - low sawtooth boom
        fn play_explosion(ctx: &AudioContext, vol: f32) -> Option<OscillatorNode> {
            let (osc, gain) = Self::create_osc(ctx, 120.0, OscillatorType::Sawtooth)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
            Some(osc)
        }
    }

    impl AudioSink for WebAudio {
        fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn play(&mut self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            let voice = match effect {
                SoundEffect::Shot => &mut self.shot_voice,
                SoundEffect::EnemyDestroyed => &mut self.explosion_voice,
            };
            if let Some(previous) = voice.take() {
                let _ = previous.stop();
            }
            *voice = match effect {
                SoundEffect::Shot => Self::play_shot(ctx, vol),
                SoundEffect::EnemyDestroyed => Self::play_explosion(ctx, vol),
            };
        }
    }
}
