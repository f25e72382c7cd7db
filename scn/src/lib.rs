#![allow(clippy::new_without_default, clippy::derive_partial_eq_without_eq)]

pub mod codec;
pub mod config;
pub mod document;
pub mod drawing;
pub mod error;
pub mod extract;
pub mod graphics;
pub mod migrate;
pub mod note;
pub mod session;
pub mod stroke;
pub mod telemetry;

pub use crate::{
    config::Config,
    document::Document,
    note::{Note, NoteId},
    session::Session,
    telemetry::{Reporter, TelemetryPoint},
};

pub const SCN_MAGIC: [u8; 3] = [b'S', b'C', b'N'];

/// Type identifier registered for document files.
pub const DOCUMENT_TYPE: &str = "com.scinotes.document";
pub const DOCUMENT_EXTENSION: &str = "scinotes";

pub const DEFAULT_NOTE_TITLE: &str = "Note 1";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Arc length between resampled points when picking a stroke's reported point.
pub const RESAMPLE_INTERVAL: f32 = 5.;

pub const DEFAULT_BRUSH_SIZE: f32 = 5.;
