//! Sound effects
//!
//! The simulation never plays sounds itself. The session maps game events to
//! [`SoundEffect`]s and hands them to whatever [`SoundSink`] it was given.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Flap; `pitch` scales the chirp (higher on screen is higher pitched)
    Flap { pitch: f32 },
    /// Perfect pass through a gate centre
    Perfect,
    /// Orb collected
    Sync,
    /// Dash activated
    Dash,
    /// Gate destroyed by a dash
    Shatter,
    /// Run ended
    Death,
}

impl SoundEffect {
    /// The sound an event should make, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped { pitch } => Some(SoundEffect::Flap { pitch: *pitch }),
            GameEvent::PerfectPass => Some(SoundEffect::Perfect),
            GameEvent::OrbCollected => Some(SoundEffect::Sync),
            GameEvent::DashActivated => Some(SoundEffect::Dash),
            GameEvent::GateShattered => Some(SoundEffect::Shatter),
            GameEvent::RunEnded { .. } => Some(SoundEffect::Death),
            GameEvent::ScoreChanged(_) | GameEvent::SyncChanged(_) | GameEvent::DashEnded => None,
        }
    }
}

/// Anything that can play a sound effect
pub trait SoundSink {
    /// Play `effect` at `volume` (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards every sound (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundSink};

    /// Procedural sounds through the Web Audio API
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator with gain envelope
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

        /// Frequency sweep with an exponential fade out
        fn sweep(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: Option<f32>,
            peak: f32,
            length: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + length)
                .ok();
            if let Some(to) = to {
                osc.frequency().set_value_at_time(from, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + length.min(0.2))
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
    }

    impl SoundSink for WebAudioSink {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            if volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flap { pitch } => Self::sweep(
                    ctx,
                    OscillatorType::Triangle,
                    180.0 * pitch,
                    Some(45.0 * pitch),
                    volume * 0.05,
                    0.1,
                ),
                SoundEffect::Perfect => Self::sweep(
                    ctx,
                    OscillatorType::Sine,
                    1000.0,
                    Some(2000.0),
                    volume * 0.07,
                    0.15,
                ),
                SoundEffect::Sync => Self::sweep(
                    ctx,
                    OscillatorType::Sine,
                    600.0,
                    Some(1200.0),
                    volume * 0.03,
                    0.25,
                ),
                SoundEffect::Dash => Self::sweep(
                    ctx,
                    OscillatorType::Square,
                    40.0,
                    Some(600.0),
                    volume * 0.1,
                    0.3,
                ),
                SoundEffect::Shatter => Self::sweep(
                    ctx,
                    OscillatorType::Sawtooth,
                    1500.0,
                    Some(80.0),
                    volume * 0.12,
                    0.2,
                ),
                SoundEffect::Death => Self::sweep(
                    ctx,
                    OscillatorType::Sawtooth,
                    60.0,
                    None,
                    volume * 0.08,
                    0.5,
                ),
            }
        }
    }
}
