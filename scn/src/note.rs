use crate::{drawing::Drawing, stroke::Stroke};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use uuid::Uuid;

/// Identifies a note for its whole life, including across save/load and in telemetry reports.
///
/// Written as an upper-case hyphenated UUID, read in either case.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        NoteId(Uuid::new_v4())
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.hyphenated().encode_upper(&mut buf))
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(NoteId)
    }
}

impl From<Uuid> for NoteId {
    fn from(uuid: Uuid) -> Self {
        NoteId(uuid)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> String {
        id.to_string()
    }
}

impl TryFrom<String> for NoteId {
    type Error = uuid::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    id: NoteId,
    pub(crate) title: String,
    drawing: Drawing,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Note {
            id: NoteId::new(),
            title: title.into(),
            drawing: Drawing::empty(),
        }
    }

    pub(crate) fn from_parts(id: NoteId, title: String, drawing: Drawing) -> Self {
        Note { id, title, drawing }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub(crate) fn push_stroke(&mut self, stroke: Stroke) {
        self.drawing.push(stroke);
    }
}
