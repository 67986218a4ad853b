use super::color::Rgba;
use super::input::{HitRegion, TapPoint};
use super::paint::{Painter, SurfaceSize};
use super::sketch::{Frame, Sketch};
use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Whether the LED is lit `elapsed_ms` after its blink started.
///
/// The LED flickers on the positive half of a fast sine for
/// `LED_BLINK_DURATION_MS`, then stays dark. At exactly zero the sine is zero,
/// which counts as off.
#[inline]
pub fn led_is_on(elapsed_ms: f64) -> bool {
    elapsed_ms < LED_BLINK_DURATION_MS && (elapsed_ms * LED_BLINK_RATE).sin() > 0.0
}

/// Single LED on a breadboard-style stand. Taps restart the blink with a new
/// palette colour; scrolling back into view restarts it with the same colour.
pub struct LedSketch {
    size: SurfaceSize,
    color: Rgba,
    blink_start_ms: f64,
    now_ms: f64,
    rng: StdRng,
}

impl LedSketch {
    pub fn new(seed: u64) -> Self {
        Self {
            size: SurfaceSize::new(1.0, 1.0),
            color: Rgba::from_rgb(LED_INITIAL_RGB),
            blink_start_ms: 0.0,
            now_ms: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn blink_start_ms(&self) -> f64 {
        self.blink_start_ms
    }

    pub fn is_on_at(&self, now_ms: f64) -> bool {
        led_is_on(now_ms - self.blink_start_ms)
    }

    /// Origin of the LED drawing (where the legs meet the base).
    fn body_origin(&self) -> Vec2 {
        self.size.center() + Vec2::new(0.0, LED_BODY_OFFSET_Y)
    }

    pub fn bulb_center(&self) -> Vec2 {
        self.body_origin() + Vec2::new(0.0, LED_BULB_OFFSET_Y)
    }

    fn pick_color(&mut self) -> Rgba {
        let rgb = LED_PALETTE
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(LED_INITIAL_RGB);
        Rgba::from_rgb(rgb)
    }
}

impl Sketch for LedSketch {
    fn initialize(&mut self, size: SurfaceSize, now_ms: f64) {
        self.size = size;
        self.blink_start_ms = now_ms;
        self.now_ms = now_ms;
    }

    fn step(&mut self, frame: Frame) {
        self.now_ms = frame.now_ms;
    }

    fn render(&self, painter: &mut dyn Painter, _frame: Frame) {
        painter.background(Rgba::from_rgb(BACKGROUND_RGB));
        let on = self.is_on_at(self.now_ms);

        painter.push();
        painter.translate(self.body_origin());

        // legs, the anode a little longer
        painter.set_stroke(Some(Rgba::gray(200)));
        painter.set_stroke_weight(2.0);
        painter.line(Vec2::new(-4.0, 0.0), Vec2::new(-4.0, 30.0));
        painter.line(Vec2::new(4.0, 0.0), Vec2::new(4.0, 35.0));

        let bulb = Vec2::new(0.0, LED_BULB_OFFSET_Y);
        if on {
            painter.set_stroke(None);
            for r in 0..LED_GLOW_RINGS {
                let t = r as f32 / LED_GLOW_RINGS as f32;
                let alpha = (LED_GLOW_ALPHA_MAX * (1.0 - t)).round() as u8;
                painter.set_fill(Some(self.color.with_alpha(alpha)));
                painter.ellipse(bulb, 25.0 + r as f32 * 6.0, 30.0 + r as f32 * 6.0);
            }
        }

        painter.set_stroke(None);
        let body_alpha = if on { 255 } else { LED_DIM_ALPHA };
        painter.set_fill(Some(self.color.with_alpha(body_alpha)));
        painter.rect(Vec2::new(-10.0, -5.0), 20.0, 5.0, 1.0);
        painter.arc(Vec2::new(0.0, -5.0), 20.0, 32.0, PI, TAU);

        painter.set_fill(Some(Rgba::gray(255).with_alpha(150)));
        painter.ellipse(Vec2::new(-4.0, -13.0), 3.0, 6.0);

        painter.pop();
    }

    fn on_interact(&mut self, _tap: TapPoint, now_ms: f64) {
        self.blink_start_ms = now_ms;
        self.now_ms = now_ms;
        self.color = self.pick_color();
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn hit_region(&self) -> HitRegion {
        HitRegion::new(self.bulb_center(), LED_HIT_RADIUS)
    }

    fn on_reveal(&mut self, now_ms: f64) {
        self.blink_start_ms = now_ms;
        self.now_ms = now_ms;
    }
}
