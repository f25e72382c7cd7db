use crate::stroke::Stroke;

/// The strokes of one note, in the order they were drawn.
#[derive(Default, Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct Drawing {
    strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Drawing { strokes }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn num_samples(&self) -> usize {
        self.strokes.iter().map(|stroke| stroke.points.len()).sum()
    }

    pub(crate) fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }
}
