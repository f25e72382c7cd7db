use crate::{
    codec,
    error::{ErrorKind, ScnError, ScnErrorExt},
    note::{Note, NoteId},
    stroke::Stroke,
};
use std::{collections::HashSet, path::Path};

/// Every note in a file, in display order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    notes: Vec<Note>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_title(crate::DEFAULT_NOTE_TITLE)
    }

    pub fn with_title(title: &str) -> Self {
        Document {
            notes: vec![Note::new(title)],
        }
    }

    pub fn with_notes(notes: Vec<Note>) -> Result<Self, ScnError> {
        if notes.is_empty() {
            return Err(ScnError::new(ErrorKind::NoNotes));
        }

        let mut seen = HashSet::with_capacity(notes.len());
        if let Some(note) = notes.iter().find(|note| !seen.insert(note.id())) {
            return Err(ScnError::new(ErrorKind::DuplicateNote(note.id())));
        }

        Ok(Document { notes })
    }

    /// Reads a document out of file contents. Anything unreadable about the file as a whole gets
    /// logged and replaced with a new document.
    pub fn load(bytes: &[u8]) -> Document {
        match codec::decode(bytes).and_then(Document::with_notes) {
            Ok(document) => document,
            Err(err) => {
                err.display_with("could not read document, starting a new one");
                Document::new()
            }
        }
    }

    pub fn save(&self) -> Result<Vec<u8>, ScnError> {
        codec::encode(&self.notes)
    }

    pub fn read(path: impl AsRef<Path>) -> Document {
        let path = path.as_ref();
        tracing::info!("read document from {}", path.display());

        match std::fs::read(path) {
            Ok(bytes) => Document::load(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("using a new file");
                Document::new()
            }
            Err(err) => {
                ScnError::from(err).display_with(&format!("{}", path.display()));
                Document::new()
            }
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ScnError> {
        let path = path.as_ref();
        tracing::debug!("truncating {} and writing", path.display());

        let bytes = self.save()?;
        std::fs::write(path, bytes)
            .map_err(ScnError::from)
            .problem(format!("{}", path.display()))
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    pub fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }

    fn note_mut(&mut self, id: NoteId) -> Result<&mut Note, ScnError> {
        self.notes
            .iter_mut()
            .find(|note| note.id() == id)
            .ok_or_else(|| ScnError::new(ErrorKind::NoSuchNote(id)))
    }

    /// Appends a note titled "Note N", N being the note count after adding it.
    pub fn add_note(&mut self) -> NoteId {
        let title = format!("Note {}", self.notes.len() + 1);
        self.add_note_titled(title)
    }

    pub fn add_note_titled(&mut self, title: impl Into<String>) -> NoteId {
        let note = Note::new(title);
        let id = note.id();
        tracing::debug!("add note {}", id);
        self.notes.push(note);
        id
    }

    pub fn delete_note(&mut self, id: NoteId) -> Result<Note, ScnError> {
        let index = self
            .position(id)
            .ok_or_else(|| ScnError::new(ErrorKind::NoSuchNote(id)))?;

        if self.notes.len() == 1 {
            return Err(ScnError::new(ErrorKind::LastNote));
        }

        tracing::debug!("delete note {}", id);
        Ok(self.notes.remove(index))
    }

    pub fn rename_note(&mut self, id: NoteId, title: impl Into<String>) -> Result<(), ScnError> {
        self.note_mut(id)?.title = title.into();
        Ok(())
    }

    pub fn append_stroke(&mut self, id: NoteId, stroke: Stroke) -> Result<(), ScnError> {
        if stroke.is_empty() {
            return Err(ScnError::new(ErrorKind::EmptyStroke));
        }

        self.note_mut(id)?.push_stroke(stroke);
        Ok(())
    }
}
