use crate::{migrate::Version, note::NoteId};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

pub trait ScnErrorExt {
    fn log(self);
    fn display_with(self, why: &str);
    fn problem(self, why: String) -> Self;
}

impl<T> ScnErrorExt for Result<T, ScnError> {
    fn log(self) {
        if let Err(err) = self {
            err.log();
        }
    }

    fn display_with(self, why: &str) {
        if let Err(err) = self {
            err.display_with(why);
        }
    }

    fn problem(mut self, why: String) -> Self {
        if let Err(err) = self.as_mut() {
            err.why.push(why);
        }

        self
    }
}

impl ScnErrorExt for ScnError {
    fn log(self) {
        tracing::error!("{}", self.chain());
    }

    fn display_with(self, why: &str) {
        self.problem(why.to_string()).log();
    }

    fn problem(mut self, why: String) -> Self {
        self.why.push(why);
        self
    }
}

#[derive(Debug)]
pub struct ScnError {
    kind: ErrorKind,
    why: Vec<String>,
}

impl ScnError {
    pub fn because(kind: ErrorKind, reason: String) -> Self {
        ScnError {
            kind,
            why: vec![reason],
        }
    }

    pub fn new(kind: ErrorKind) -> Self {
        ScnError {
            kind,
            why: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// outermost context first, the error itself last
    pub fn chain(&self) -> String {
        self.why
            .iter()
            .fold(format!("{}", self.kind), |acc, why| format!("{why}: {acc}"))
    }
}

impl Display for ScnError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.kind)
    }
}

impl Error for ScnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::IoError(err) => Some(err),
            ErrorKind::BincodeError(err) => Some(err.as_ref()),
            ErrorKind::MalformedContainer(err) => Some(err),
            ErrorKind::Base64Error(err) => Some(err),
            ErrorKind::HttpError(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    MissingHeader,
    UnknownVersion(Version),
    EmptyStroke,
    LastNote,
    NoSuchNote(NoteId),
    NoNotes,
    DuplicateNote(NoteId),
    MalformedContainer(serde_json::Error),
    BadEndpoint(String),
    BadConfig(String),
    NoPath,
    IoError(std::io::Error),
    BincodeError(Box<dyn std::error::Error + Send + Sync>),
    Base64Error(base64::DecodeError),
    HttpError(reqwest::Error),
}

impl From<std::io::Error> for ScnError {
    fn from(err: std::io::Error) -> Self {
        ScnError::new(ErrorKind::IoError(err))
    }
}

impl From<bincode::error::DecodeError> for ScnError {
    fn from(err: bincode::error::DecodeError) -> Self {
        ScnError::new(ErrorKind::BincodeError(Box::new(err)))
    }
}

impl From<bincode::error::EncodeError> for ScnError {
    fn from(err: bincode::error::EncodeError) -> Self {
        ScnError::new(ErrorKind::BincodeError(Box::new(err)))
    }
}

impl From<serde_json::Error> for ScnError {
    fn from(err: serde_json::Error) -> Self {
        ScnError::new(ErrorKind::MalformedContainer(err))
    }
}

impl From<base64::DecodeError> for ScnError {
    fn from(err: base64::DecodeError) -> Self {
        ScnError::new(ErrorKind::Base64Error(err))
    }
}

impl From<reqwest::Error> for ScnError {
    fn from(err: reqwest::Error) -> Self {
        ScnError::new(ErrorKind::HttpError(err))
    }
}

impl From<ron::error::SpannedError> for ScnError {
    fn from(err: ron::error::SpannedError) -> Self {
        ScnError::new(ErrorKind::BadConfig(format!("{err}")))
    }
}

impl From<ron::Error> for ScnError {
    fn from(err: ron::Error) -> Self {
        ScnError::new(ErrorKind::BadConfig(format!("{err}")))
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::MissingHeader => write!(f, "Missing drawing header"),
            ErrorKind::UnknownVersion(version) => {
                write!(f, "Unknown drawing format version {version}")
            }
            ErrorKind::EmptyStroke => write!(f, "Stroke has no points"),
            ErrorKind::LastNote => write!(f, "Cannot delete the last note"),
            ErrorKind::NoSuchNote(id) => write!(f, "No note with id {id}"),
            ErrorKind::NoNotes => write!(f, "Document contains no notes"),
            ErrorKind::DuplicateNote(id) => write!(f, "Note {id} appears more than once"),
            ErrorKind::MalformedContainer(err) => write!(f, "Malformed document: {err}"),
            ErrorKind::BadEndpoint(endpoint) => write!(f, "Invalid endpoint {endpoint:?}"),
            ErrorKind::BadConfig(err) => write!(f, "Invalid config: {err}"),
            ErrorKind::NoPath => write!(f, "Document has no file path"),
            ErrorKind::IoError(err) => write!(f, "{err}"),
            ErrorKind::BincodeError(err) => write!(f, "{err}"),
            ErrorKind::Base64Error(err) => write!(f, "{err}"),
            ErrorKind::HttpError(err) => write!(f, "{err}"),
        }
    }
}
