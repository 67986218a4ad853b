use super::sketch::Sketch;
use glam::Vec2;
use smallvec::SmallVec;

/// Canvas-space coordinate of a single interaction.
pub type TapPoint = Vec2;

/// Raw interaction as delivered by the host, already mapped into canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    Pointer(Vec2),
    Touch(SmallVec<[Vec2; 4]>),
}

/// Circular interactive region of a sketch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub center: Vec2,
    pub radius: f32,
}

impl HitRegion {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, point: TapPoint) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// Result of routing one interaction to a sketch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The tap landed on the interactive region; the host must cancel scrolling.
    pub suppress_default: bool,
    /// The tap flipped the sketch's `started` flag.
    pub activated: bool,
}

// ---------------- Normalization ----------------
#[inline]
pub fn resolve_tap(input: &RawInput) -> Option<TapPoint> {
    match input {
        RawInput::Pointer(p) => Some(*p),
        RawInput::Touch(points) => points.first().copied(),
    }
}

/// Normalize `input`, start the sketch if it is gated on a first interaction,
/// and forward the tap to the sketch when it hits its interactive region.
pub fn dispatch(sketch: &mut dyn Sketch, input: &RawInput, now_ms: f64) -> Dispatch {
    let Some(tap) = resolve_tap(input) else {
        return Dispatch::default();
    };

    // Region is sampled before activation so a first tap is tested against
    // the same ball position the user saw.
    let hit = sketch.hit_region().contains(tap);
    let activated = sketch.started() == Some(false) && sketch.activate();

    if hit {
        sketch.on_interact(tap, now_ms);
    }
    log::debug!(
        "[input] tap=({:.1},{:.1}) hit={} activated={}",
        tap.x,
        tap.y,
        hit,
        activated
    );
    Dispatch {
        suppress_default: hit,
        activated,
    }
}
