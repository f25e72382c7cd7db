use std::fmt::{Display, Formatter};

pub type Color = [f32; 3];

pub trait ColorExt {
    const BLACK: Color = [0., 0., 0.];

    fn from_u8(color: [u8; 3]) -> Self;
}

impl ColorExt for Color {
    fn from_u8(color: [u8; 3]) -> Color {
        [
            color[0] as f32 / 255.,
            color[1] as f32 / 255.,
            color[2] as f32 / 255.,
        ]
    }
}

/// A position on the canvas, in the same units the rendering surface records strokes in.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StrokePos {
    pub x: f32,
    pub y: f32,
}

impl Display for StrokePos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.02},{:.02}", self.x, self.y)
    }
}

impl StrokePos {
    pub fn new(x: f32, y: f32) -> Self {
        StrokePos { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Measured in f64 so points far apart on an f32 canvas don't overflow.
    pub fn distance(self, other: StrokePos) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    /// `t` of 0 is `self`, 1 is `other`
    pub fn lerp(self, other: StrokePos, t: f64) -> StrokePos {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        StrokePos {
            x: (x + (f64::from(other.x) - x) * t) as f32,
            y: (y + (f64::from(other.y) - y) * t) as f32,
        }
    }
}
