use super::audio::AudioSketch;
use super::ball::BallSketch;
use super::error::SketchError;
use super::input::{HitRegion, TapPoint};
use super::led::LedSketch;
use super::paint::{Painter, SurfaceSize};
use std::fmt;
use std::str::FromStr;

/// Timing information handed to every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    /// Monotonic clock in milliseconds.
    pub now_ms: f64,
    /// Ticks rendered by this instance so far.
    pub count: u64,
}

/// Which state machine a card runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SketchKind {
    Ball,
    Audio,
    Led,
}

impl SketchKind {
    /// Map the element ids used by older page markup.
    pub fn from_legacy_id(id: &str) -> Option<Self> {
        match id {
            "sketch-1" => Some(Self::Ball),
            "sketch-2" => Some(Self::Audio),
            "sketch-3" => Some(Self::Led),
            _ => None,
        }
    }

    /// Resolve from an explicit `data-sketch` value, falling back to the id.
    pub fn resolve(data_sketch: Option<&str>, id: &str) -> Result<Self, SketchError> {
        match data_sketch {
            Some(tag) => tag.parse(),
            None => {
                Self::from_legacy_id(id).ok_or_else(|| SketchError::UnknownKind(id.to_string()))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Audio => "audio",
            Self::Led => "led",
        }
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ball" => Ok(Self::Ball),
            "audio" => Ok(Self::Audio),
            "led" => Ok(Self::Led),
            other => Err(SketchError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface of the per-card state machines.
///
/// A frame tick is `step` followed by `render`; the instance only calls it
/// while its loop is running. `render` alone is used to repaint a stopped
/// sketch (first paint, after a resize).
pub trait Sketch {
    fn initialize(&mut self, size: SurfaceSize, now_ms: f64);

    fn step(&mut self, frame: Frame);
    fn render(&self, painter: &mut dyn Painter, frame: Frame);

    fn on_frame_tick(&mut self, painter: &mut dyn Painter, frame: Frame) {
        self.step(frame);
        self.render(painter, frame);
    }

    /// Called only for taps inside [`Sketch::hit_region`].
    fn on_interact(&mut self, tap: TapPoint, now_ms: f64);
    fn on_resize(&mut self, size: SurfaceSize);
    fn hit_region(&self) -> HitRegion;

    /// `Some(false)` while the sketch waits for its first interaction;
    /// `None` for sketches that are never gated.
    fn started(&self) -> Option<bool> {
        None
    }

    /// Flip `started`. Returns true only on the false→true transition.
    fn activate(&mut self) -> bool {
        false
    }

    /// Replay hook invoked every time the card scrolls back into view.
    fn on_reveal(&mut self, _now_ms: f64) {}

    fn on_pointer_move(&mut self, _point: TapPoint) {}
}

/// Concrete sketch selected by [`SketchKind`] at construction time.
pub enum SketchVariant {
    Ball(BallSketch),
    Audio(AudioSketch),
    Led(LedSketch),
}

impl SketchVariant {
    pub fn new(kind: SketchKind, audio_src: &str, seed: u64) -> Self {
        match kind {
            SketchKind::Ball => Self::Ball(BallSketch::new(seed)),
            SketchKind::Audio => Self::Audio(AudioSketch::new(audio_src)),
            SketchKind::Led => Self::Led(LedSketch::new(seed)),
        }
    }

    pub fn kind(&self) -> SketchKind {
        match self {
            Self::Ball(_) => SketchKind::Ball,
            Self::Audio(_) => SketchKind::Audio,
            Self::Led(_) => SketchKind::Led,
        }
    }

    pub fn as_audio_mut(&mut self) -> Option<&mut AudioSketch> {
        match self {
            Self::Audio(a) => Some(a),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Sketch {
        match self {
            Self::Ball(s) => s,
            Self::Audio(s) => s,
            Self::Led(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Sketch {
        match self {
            Self::Ball(s) => s,
            Self::Audio(s) => s,
            Self::Led(s) => s,
        }
    }
}

impl Sketch for SketchVariant {
    fn initialize(&mut self, size: SurfaceSize, now_ms: f64) {
        self.inner_mut().initialize(size, now_ms);
    }

    fn step(&mut self, frame: Frame) {
        self.inner_mut().step(frame);
    }

    fn render(&self, painter: &mut dyn Painter, frame: Frame) {
        self.inner().render(painter, frame);
    }

    fn on_interact(&mut self, tap: TapPoint, now_ms: f64) {
        self.inner_mut().on_interact(tap, now_ms);
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.inner_mut().on_resize(size);
    }

    fn hit_region(&self) -> HitRegion {
        self.inner().hit_region()
    }

    fn started(&self) -> Option<bool> {
        self.inner().started()
    }

    fn activate(&mut self) -> bool {
        self.inner_mut().activate()
    }

    fn on_reveal(&mut self, now_ms: f64) {
        self.inner_mut().on_reveal(now_ms);
    }

    fn on_pointer_move(&mut self, point: TapPoint) {
        self.inner_mut().on_pointer_move(point);
    }
}
