//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. When the
//! AudioContext can't be created the whole manager degrades to a no-op.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A bomb went off
    Explosion,
    /// Level cleared / run won
    Victory,
    /// Plane pickup collected
    PickupCollect,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Background hum oscillator while it is running
    background: Option<(OscillatorNode, GainNode)>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game keeps running silent
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            background: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_background();
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let _ = match effect {
            SoundEffect::Explosion => play_explosion(ctx, vol),
            // the pickup jingle is the victory arpeggio, just like the win
            SoundEffect::Victory | SoundEffect::PickupCollect => play_arpeggio(ctx, vol),
        };
    }

    /// Start the low background hum (idempotent while already humming).
    pub fn start_background(&mut self) {
        if self.background.is_some() || self.effective_volume() <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if let Some(nodes) = start_hum(ctx, self.effective_volume()) {
            self.background = Some(nodes);
        }
    }

    /// Stop the background hum if it is running.
    pub fn stop_background(&mut self) {
        if let Some((osc, _gain)) = self.background.take() {
            let _ = osc.stop();
        }
    }
}

/// Falling sawtooth sweep: 100 Hz down to 20 Hz over half a second.
fn play_explosion(ctx: &AudioContext, vol: f32) -> Option<()> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    let now = ctx.current_time();
    osc.set_type(OscillatorType::Sawtooth);
    osc.frequency().set_value_at_time(100.0, now).ok()?;
    osc.frequency()
        .exponential_ramp_to_value_at_time(20.0, now + 0.5)
        .ok()?;
    gain.gain().set_value_at_time(0.3 * vol, now).ok()?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, now + 0.5)
        .ok()?;

    osc.start().ok()?;
    osc.stop_with_when(now + 0.5).ok()?;
    Some(())
}

/// Rising C-major arpeggio (C4 E4 G4 C5), one note every 150 ms.
fn play_arpeggio(ctx: &AudioContext, vol: f32) -> Option<()> {
    let now = ctx.current_time();
    for (i, freq) in [262.0, 330.0, 392.0, 523.0].into_iter().enumerate() {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let at = now + i as f64 * 0.15;
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(freq);
        gain.gain().set_value_at_time(0.2 * vol, at).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, at + 0.3)
            .ok()?;

        osc.start_with_when(at).ok()?;
        osc.stop_with_when(at + 0.3).ok()?;
    }
    Some(())
}

/// Quiet 220 Hz sine hum that runs until stopped.
fn start_hum(ctx: &AudioContext, vol: f32) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value(220.0);
    gain.gain().set_value(0.05 * vol);
    osc.start().ok()?;
    Some((osc, gain))
}
