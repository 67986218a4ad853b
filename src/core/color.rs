use rand::Rng;

/// 8-bit RGBA colour as used by the canvas painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string understood by `CanvasRenderingContext2d` styles.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }

    /// Random bluish-violet tone used when the ball gets kicked.
    pub fn random_ball<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(
            rng.gen_range(100..200),
            rng.gen_range(50..150),
            rng.gen_range(200..255),
        )
    }
}
