pub mod audio;
pub mod ball;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod led;
pub mod lifecycle;
pub mod paint;
pub mod sketch;

pub use audio::{rms_level, AudioCommand, AudioSketch, PlayerState, Unlock};
pub use ball::BallSketch;
pub use color::Rgba;
pub use config::PageConfig;
pub use error::SketchError;
pub use input::{dispatch, resolve_tap, Dispatch, HitRegion, RawInput, TapPoint};
pub use led::{led_is_on, LedSketch};
pub use lifecycle::{
    FrameLoop, SharedInstance, SketchId, SketchInstance, Transition, TransitionKind,
    VisibilityController, VisibilityEntry,
};
pub use paint::{Painter, Surface, SurfaceSize};
pub use sketch::{Frame, Sketch, SketchKind, SketchVariant};
