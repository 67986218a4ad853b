//! Audio player card: a play/pause button with a waveform ring.
//!
//! The sketch never touches WebAudio directly. Interactions and completions
//! push [`AudioCommand`]s into an outbox that the host drains and executes;
//! results come back through [`AudioSketch::on_unlock_result`],
//! [`AudioSketch::on_load_result`] and [`AudioSketch::on_ended`]. The
//! `Loading` state is the guard that keeps at most one load in flight and the
//! `Unlock::Pending` tag does the same for the playback permission request.

use super::color::Rgba;
use super::error::SketchError;
use super::input::{HitRegion, TapPoint};
use super::paint::{Painter, SurfaceSize};
use super::sketch::{Frame, Sketch};
use crate::constants::*;
use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Playback state of the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing decoded yet (initially, or after a failed load).
    Idle,
    Loading,
    Playing,
    /// Decoded and stopped: paused by the user, finished, or preloaded.
    Paused,
}

/// Platform playback permission, which browsers grant only from a user gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unlock {
    Locked,
    Pending,
    Unlocked,
}

/// Side effects requested from the host audio backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    /// Must be executed synchronously inside the interaction callback.
    Unlock,
    Load { url: String },
    Play,
    Pause,
}

/// Latest analyser snapshot used for drawing.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    pub waveform: Vec<f32>,
    pub level: f32,
}

/// Root-mean-square amplitude of a time-domain buffer.
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

pub struct AudioSketch {
    size: SurfaceSize,
    src: String,
    state: PlayerState,
    unlock: Unlock,
    play_on_load: bool,
    hovering: bool,
    analysis: Analysis,
    outbox: SmallVec<[AudioCommand; 4]>,
}

impl AudioSketch {
    pub fn new(src: &str) -> Self {
        Self {
            size: SurfaceSize::new(1.0, 1.0),
            src: src.to_string(),
            state: PlayerState::Idle,
            unlock: Unlock::Locked,
            play_on_load: false,
            hovering: false,
            analysis: Analysis::default(),
            outbox: SmallVec::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn unlock_state(&self) -> Unlock {
        self.unlock
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, PlayerState::Playing | PlayerState::Paused)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Hand the pending commands to the host, oldest first.
    pub fn take_commands(&mut self) -> SmallVec<[AudioCommand; 4]> {
        std::mem::take(&mut self.outbox)
    }

    /// Start decoding in the background without autoplay. Returns false when a
    /// load already happened or is in flight.
    pub fn preload(&mut self) -> bool {
        if self.state != PlayerState::Idle {
            return false;
        }
        self.play_on_load = false;
        self.begin_load();
        true
    }

    pub fn on_unlock_result(&mut self, result: Result<(), SketchError>) {
        match result {
            Ok(()) => {
                self.unlock = Unlock::Unlocked;
                log::debug!("[audio] playback unlocked");
            }
            Err(e) => {
                // Retried on the next tap.
                self.unlock = Unlock::Locked;
                log::warn!("[audio] {}", e);
            }
        }
    }

    pub fn on_load_result(&mut self, result: Result<(), SketchError>) {
        if self.state != PlayerState::Loading {
            log::warn!("[audio] load completion in state {:?} ignored", self.state);
            return;
        }
        match result {
            Ok(()) if self.play_on_load => {
                self.state = PlayerState::Playing;
                self.outbox.push(AudioCommand::Play);
            }
            Ok(()) => {
                self.state = PlayerState::Paused;
            }
            Err(e) => {
                log::error!("[audio] {}", e);
                self.state = PlayerState::Idle;
            }
        }
        self.play_on_load = false;
    }

    /// Fail every queued command as if the backend had reported the error.
    /// Used when no audio backend exists, so the card falls back to `Idle`
    /// instead of waiting on a load nobody runs.
    pub fn reject_commands(&mut self, reason: &str) {
        loop {
            let commands = self.take_commands();
            if commands.is_empty() {
                return;
            }
            for cmd in commands {
                match cmd {
                    AudioCommand::Unlock => {
                        let err = SketchError::AudioUnlock(reason.to_string());
                        self.on_unlock_result(Err(err));
                    }
                    AudioCommand::Load { url } => {
                        let reason = reason.to_string();
                        self.on_load_result(Err(SketchError::AudioLoad { url, reason }));
                    }
                    AudioCommand::Play | AudioCommand::Pause => {}
                }
            }
        }
    }

    /// The sound reached its end on its own.
    pub fn on_ended(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
        }
    }

    /// Replace the analyser snapshot; the level is derived from the samples.
    pub fn update_analysis(&mut self, waveform: &[f32]) {
        self.analysis.waveform.clear();
        self.analysis.waveform.extend_from_slice(waveform);
        self.analysis.level = rms_level(waveform);
    }

    fn begin_load(&mut self) {
        self.state = PlayerState::Loading;
        self.outbox.push(AudioCommand::Load {
            url: self.src.clone(),
        });
    }

    fn button_center(&self) -> Vec2 {
        self.size.center()
    }

    fn render_ring(&self, painter: &mut dyn Painter, c: Vec2) {
        let wave = &self.analysis.waveform;
        let level = self.analysis.level;
        let n = wave.len();
        let points: Vec<Vec2> = (0..n)
            .step_by(AUDIO_WAVEFORM_STRIDE)
            .map(|i| {
                let angle = i as f32 / n as f32 * TAU;
                let r = AUDIO_RING_BASE_RADIUS + level * AUDIO_RING_LEVEL_GAIN
                    + wave[i] * AUDIO_RING_WAVE_GAIN;
                c + Vec2::new(angle.cos(), angle.sin()) * r
            })
            .collect();

        painter.set_fill(None);
        painter.set_stroke_weight(1.5);
        painter.set_stroke(Some(Rgba::rgb(255, 0, 255).with_alpha(150)));
        painter.polygon(&points);

        painter.set_stroke(Some(Rgba::rgb(255, 0, 255).with_alpha(60)));
        painter.circle(c, AUDIO_PULSE_BASE_DIAMETER + level * AUDIO_PULSE_LEVEL_GAIN);
    }
}

impl Sketch for AudioSketch {
    fn initialize(&mut self, size: SurfaceSize, _now_ms: f64) {
        self.size = size;
    }

    fn step(&mut self, _frame: Frame) {}

    fn render(&self, painter: &mut dyn Painter, frame: Frame) {
        painter.background(Rgba::from_rgb(BACKGROUND_RGB));
        let c = self.button_center();

        if self.state == PlayerState::Playing && !self.analysis.waveform.is_empty() {
            self.render_ring(painter, c);
        }

        let alpha = if self.hovering {
            AUDIO_BUTTON_ALPHA_HOVER
        } else {
            AUDIO_BUTTON_ALPHA_IDLE
        };
        painter.set_stroke(None);
        painter.set_fill(Some(Rgba::from_rgb(BRAND_RGB).with_alpha(alpha)));
        painter.circle(c, AUDIO_BUTTON_SIZE);

        let white = Rgba::gray(255);
        painter.set_fill(Some(white));
        match self.state {
            PlayerState::Loading => {
                painter.push();
                painter.translate(c);
                painter.rotate(frame.count as f32 * AUDIO_SPINNER_RAD_PER_FRAME);
                painter.set_stroke(Some(white));
                painter.set_stroke_weight(3.0);
                painter.set_fill(None);
                painter.arc(Vec2::ZERO, 20.0, 20.0, 0.0, FRAC_PI_2);
                painter.pop();
            }
            PlayerState::Playing => {
                painter.rect(c + Vec2::new(-7.0, -10.0), 4.0, 20.0, 2.0);
                painter.rect(c + Vec2::new(3.0, -10.0), 4.0, 20.0, 2.0);
            }
            PlayerState::Idle | PlayerState::Paused => {
                painter.triangle(
                    c + Vec2::new(-5.0, -10.0),
                    c + Vec2::new(-5.0, 10.0),
                    c + Vec2::new(10.0, 0.0),
                );
            }
        }
    }

    fn on_interact(&mut self, _tap: TapPoint, _now_ms: f64) {
        if self.unlock == Unlock::Locked {
            self.unlock = Unlock::Pending;
            self.outbox.push(AudioCommand::Unlock);
        }
        match self.state {
            PlayerState::Idle => {
                self.play_on_load = true;
                self.begin_load();
            }
            PlayerState::Loading => {
                self.play_on_load = true;
                log::debug!("[audio] tap while loading; will play when ready");
            }
            PlayerState::Playing => {
                self.state = PlayerState::Paused;
                self.outbox.push(AudioCommand::Pause);
            }
            PlayerState::Paused => {
                self.state = PlayerState::Playing;
                self.outbox.push(AudioCommand::Play);
            }
        }
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn hit_region(&self) -> HitRegion {
        HitRegion::new(self.button_center(), AUDIO_BUTTON_SIZE * 0.5 * AUDIO_TAP_SCALE)
    }

    fn on_pointer_move(&mut self, point: TapPoint) {
        self.hovering = point.distance(self.button_center()) < AUDIO_BUTTON_SIZE * 0.5;
    }
}
