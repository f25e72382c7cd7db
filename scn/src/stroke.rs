use crate::graphics::{Color, ColorExt, StrokePos};

/// One sample of a pen gesture. Only `x` and `y` are interpreted, the rest is carried through
/// save/load untouched.
#[derive(Default, Debug, Clone, Copy, PartialEq, bincode::Encode, bincode::Decode)]
pub struct StrokeElement {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    /// seconds since the first sample of the stroke
    pub time: f32,
}

impl StrokeElement {
    pub fn at(x: f32, y: f32) -> Self {
        StrokeElement {
            x,
            y,
            pressure: 1.,
            time: 0.,
        }
    }
}

impl From<StrokeElement> for StrokePos {
    fn from(elt: StrokeElement) -> StrokePos {
        StrokePos { x: elt.x, y: elt.y }
    }
}

impl From<&StrokeElement> for StrokePos {
    fn from(elt: &StrokeElement) -> StrokePos {
        StrokePos { x: elt.x, y: elt.y }
    }
}

impl std::fmt::Display for StrokeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.02},{:.02},{:.02}@{:.03}",
            self.x, self.y, self.pressure, self.time
        )
    }
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct Stroke {
    pub points: Vec<StrokeElement>,
    pub color: Color,
    pub brush_size: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            points: Default::default(),
            color: Color::BLACK,
            brush_size: crate::DEFAULT_BRUSH_SIZE,
        }
    }
}

impl Stroke {
    pub fn with_points(points: Vec<StrokeElement>, color: Color) -> Self {
        Self {
            points,
            color,
            ..Default::default()
        }
    }

    pub fn new(color: Color, brush_size: f32) -> Self {
        Self {
            color,
            brush_size,
            ..Default::default()
        }
    }

    pub fn points(&self) -> &[StrokeElement] {
        &self.points
    }

    pub fn positions(&self) -> impl Iterator<Item = StrokePos> + '_ {
        self.points.iter().map(StrokePos::from)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add_point(&mut self, point: StrokeElement) {
        self.points.push(point);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn built_up_sample_by_sample() {
        let mut stroke = Stroke::new(Color::from_u8([255, 0, 0]), 2.);
        assert!(stroke.is_empty());

        stroke.add_point(StrokeElement::at(1., 2.));
        stroke.add_point(StrokeElement {
            time: 0.25,
            ..StrokeElement::at(3., 4.)
        });

        assert_eq!(stroke.color, [1., 0., 0.]);
        assert_eq!(stroke.brush_size, 2.);
        assert_eq!(stroke.points()[1].time, 0.25);
        assert_eq!(
            stroke.positions().collect::<Vec<_>>(),
            [StrokePos::new(1., 2.), StrokePos::new(3., 4.)]
        );
    }
}
