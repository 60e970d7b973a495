//! Audio cues
//!
//! Procedurally generated tones, no sample files. The tone table and the
//! event mapping are plain data; playback through the Web Audio API only
//! exists on wasm32.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fires a soundwave
    Shoot,
    /// Soundwave hits the bank, or a bank shot hits the player
    Hit,
    /// Bank destroyed
    Explosion,
    /// Player destroyed
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// One tone: a frequency sweep under a decaying gain envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds
    pub duration: f64,
}

/// Envelopes never ramp to exactly zero
pub const ENVELOPE_FLOOR: f32 = 0.01;

/// Gain an envelope decays to; never above the starting gain
pub fn envelope_end(start_gain: f32) -> f32 {
    ENVELOPE_FLOOR.min(start_gain)
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Shoot,
        SoundEffect::Hit,
        SoundEffect::Explosion,
        SoundEffect::GameOver,
    ];

    pub fn tone(self) -> ToneSpec {
        match self {
            SoundEffect::Shoot => ToneSpec {
                waveform: Waveform::Sine,
                start_hz: 440.0,
                end_hz: 880.0,
                gain: 0.1,
                duration: 0.1,
            },
            SoundEffect::Hit => ToneSpec {
                waveform: Waveform::Sine,
                start_hz: 220.0,
                end_hz: 110.0,
                gain: 0.2,
                duration: 0.2,
            },
            SoundEffect::Explosion => ToneSpec {
                waveform: Waveform::Sawtooth,
                start_hz: 100.0,
                end_hz: 50.0,
                gain: 0.3,
                duration: 0.5,
            },
            SoundEffect::GameOver => ToneSpec {
                waveform: Waveform::Sine,
                start_hz: 330.0,
                end_hz: 165.0,
                gain: 0.2,
                duration: 0.8,
            },
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::SoundwaveFired => Some(SoundEffect::Shoot),
            GameEvent::BankHit { .. } | GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::BankDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerDestroyed { .. } => Some(SoundEffect::GameOver),
            GameEvent::RoundStarted
            | GameEvent::BankVolley { .. }
            | GameEvent::BankRespawned { .. } => None,
        }
    }
}

/// Volume state, shared by every backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioMixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Peak gain for an effect, `None` when it would be silent
    pub fn gain_for(&self, effect: SoundEffect) -> Option<f32> {
        let gain = effect.tone().gain * self.effective_volume();
        (gain > 0.0).then_some(gain)
    }

    /// Cues for a batch of drained events, in order
    pub fn cues(&self, events: &[GameEvent]) -> Vec<(SoundEffect, f32)> {
        events
            .iter()
            .filter_map(SoundEffect::for_event)
            .filter_map(|effect| self.gain_for(effect).map(|gain| (effect, gain)))
            .collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioMixer, SoundEffect, ToneSpec, Waveform, envelope_end};
    use crate::sim::GameEvent;

    /// Web Audio playback
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        pub mixer: AudioMixer,
    }

    impl AudioManager {
        pub fn new(mixer: AudioMixer) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, mixer }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play_events(&self, events: &[GameEvent]) {
            for (effect, gain) in self.mixer.cues(events) {
                self.play_tone(effect.tone(), gain);
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if let Some(gain) = self.mixer.gain_for(effect) {
                self.play_tone(effect.tone(), gain);
            }
        }

        fn play_tone(&self, tone: ToneSpec, gain_value: f32) {
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = create_osc(ctx, tone.start_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, t + tone.duration)
                .ok();
            gain.gain().set_value_at_time(gain_value, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(envelope_end(gain_value), t + tone.duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }

    /// Oscillator routed through a gain node to the destination
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
}
