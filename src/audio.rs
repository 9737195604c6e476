//! Procedural sound effects over the Web Audio API
//!
//! Every clip is synthesized from oscillators with gain envelopes, so the
//! game ships without audio assets.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::consts::DEATH_FEEDBACK_MS;
use crate::settings::Settings;
use crate::sim::SoundClip;

/// Owns the audio context and the player's volume preferences
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Resume the context after a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a clip at `volume` relative to the effects mix
    pub fn play(&self, clip: SoundClip, volume: f32) {
        let vol = self.effective_volume() * volume.clamp(0.0, 1.0);
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match clip {
            SoundClip::Impact => self.play_impact(ctx, vol),
            SoundClip::PointsPickup => self.play_points(ctx, vol),
            SoundClip::HealthPickup => self.play_health(ctx, vol),
            SoundClip::Invincible => self.play_shield(ctx, vol),
            SoundClip::Death => self.play_death(ctx, vol),
            SoundClip::Finish => self.play_finish(ctx, vol),
        }
    }

    fn create_osc(
        &self,
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

    /// Hull scraping a wall - low crunch
    fn play_impact(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.25).ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(45.0, t + 0.25).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.06).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    /// Points - bright two-note blip
    fn play_points(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [880.0, 1320.0].into_iter().enumerate() {
            let start = t + i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.2, start).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, start + 0.1).ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.12).ok();
            }
        }
    }

    /// Health - soft rising sweep
    fn play_health(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 330.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.3).ok();
        osc.frequency().set_value_at_time(330.0, t).ok();
        osc.frequency().exponential_ramp_to_value_at_time(660.0, t + 0.25).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Shield up - shimmering chord
    fn play_shield(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for freq in [523.25, 659.25, 783.99] {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.6).ok();
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency().set_value_at_time(freq * 1.01, t + 0.1).ok();
                osc.frequency().set_value_at_time(freq, t + 0.2).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.65).ok();
            }
        }
    }

    /// Ship destroyed - long falling explosion. Lasts the death feedback window.
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let length = DEATH_FEEDBACK_MS / 1000.0;

        if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + length).ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(25.0, t + length).ok();
            osc.start().ok();
            osc.stop_with_when(t + length).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.2).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }

    /// Finish gate - rising arpeggio
    fn play_finish(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0, 523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
            let start = t + i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, start + 0.25).ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }
}
