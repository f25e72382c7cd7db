use crate::{
    config::Config,
    document::Document,
    error::{ErrorKind, ScnError, ScnErrorExt},
    extract,
    graphics::StrokePos,
    note::NoteId,
    stroke::Stroke,
    telemetry::{Reporter, TelemetryPoint},
};
use std::path::{Path, PathBuf};

/// The editing side of an open document.
///
/// Whatever renders the canvas hands finished strokes to [Session::commit_stroke] and reads
/// drawings back through [Session::document]. All of this happens on one thread, only the
/// telemetry request leaves it.
#[derive(Debug)]
pub struct Session {
    document: Document,
    reporter: Option<Reporter>,
    resample_interval: f32,
    path: Option<PathBuf>,
    modified: bool,
}

impl Session {
    pub fn new(document: Document, config: &Config, reporter: Option<Reporter>) -> Self {
        let reporter = if config.telemetry_enabled {
            reporter
        } else {
            tracing::info!("telemetry disabled");
            None
        };

        Session {
            document,
            reporter,
            resample_interval: config.resample_interval,
            path: None,
            modified: false,
        }
    }

    pub fn open(path: impl AsRef<Path>, config: &Config, reporter: Option<Reporter>) -> Self {
        let path = path.as_ref();
        let mut this = Session::new(Document::read(path), config, reporter);
        this.path = Some(path.to_path_buf());
        this
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Stores a finished stroke and reports its extracted point. The report is sent in the
    /// background and can't fail this call.
    pub fn commit_stroke(&mut self, note: NoteId, stroke: Stroke) -> Result<StrokePos, ScnError> {
        let point = extract::extract(&stroke, self.resample_interval)?;
        self.document
            .append_stroke(note, stroke)
            .problem(String::from("committing stroke"))?;
        self.modified = true;

        if let Some(reporter) = self.reporter.as_ref() {
            // nobody waits on this
            let _ = reporter.report(TelemetryPoint::new(point, note));
        }

        Ok(point)
    }

    pub fn add_note(&mut self) -> NoteId {
        self.modified = true;
        self.document.add_note()
    }

    pub fn delete_note(&mut self, note: NoteId) -> Result<(), ScnError> {
        self.document.delete_note(note)?;
        self.modified = true;
        Ok(())
    }

    pub fn rename_note(&mut self, note: NoteId, title: impl Into<String>) -> Result<(), ScnError> {
        self.document.rename_note(note, title)?;
        self.modified = true;
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), ScnError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| ScnError::new(ErrorKind::NoPath))?;

        self.document.write(path)?;
        self.modified = false;

        tracing::info!("saved file as {}", path.display());
        Ok(())
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), ScnError> {
        self.path = Some(path.as_ref().to_path_buf());
        self.save()
    }
}
