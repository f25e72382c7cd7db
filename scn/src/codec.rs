//! Notes to bytes and back.
//!
//! The outer layer is a JSON array of `{ "id", "title", "drawing" }` objects, where `drawing` is
//! the base64 of a [migrate] blob. Decoding happens in two passes: the whole array is parsed
//! first and any problem there fails the decode (a repeated id only drops the later note), then
//! every drawing is decoded on its own and replaced with an empty one if it can't be read.

use crate::{
    drawing::Drawing,
    error::{ErrorKind, ScnError, ScnErrorExt},
    migrate::{self, Version},
    note::{Note, NoteId},
};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashSet;

#[derive(serde::Serialize)]
struct NoteRecordOut<'note> {
    id: NoteId,
    title: &'note str,
    drawing: String,
}

#[derive(serde::Deserialize)]
struct NoteRecordIn {
    id: NoteId,
    title: String,
    // anything goes here, a bad drawing only costs its own note
    #[serde(default)]
    drawing: Option<serde_json::Value>,
}

pub fn encode(notes: &[Note]) -> Result<Vec<u8>, ScnError> {
    let records = notes
        .iter()
        .map(|note| {
            let blob = migrate::write(note.drawing()).problem(format!("note {}", note.id()))?;
            Ok(NoteRecordOut {
                id: note.id(),
                title: note.title(),
                drawing: general_purpose::STANDARD.encode(blob),
            })
        })
        .collect::<Result<Vec<_>, ScnError>>()?;

    tracing::debug!("encoding {} notes", records.len());
    Ok(serde_json::to_vec_pretty(&records)?)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Note>, ScnError> {
    let records = records(bytes)?;

    tracing::debug!("decoding drawings of {} notes", records.len());
    Ok(records
        .into_iter()
        .map(|record| {
            let drawing = match decode_drawing(record.drawing) {
                Ok(drawing) => drawing,
                Err(err) => {
                    tracing::warn!(
                        "using an empty drawing for note {}: {}",
                        record.id,
                        err.chain()
                    );
                    Drawing::empty()
                }
            };

            Note::from_parts(record.id, record.title, drawing)
        })
        .collect())
}

/// The stored version of every note's drawing, read from its header only.
#[derive(Debug)]
pub struct StoredDrawing {
    pub id: NoteId,
    pub title: String,
    /// `Ok(None)` when the note has no drawing at all
    pub version: Result<Option<Version>, ScnError>,
}

/// Lists the notes in a file along with the version their drawing was written in, without
/// decoding any drawing. Fails the same way [decode] does for the outer layer.
pub fn stored_versions(bytes: &[u8]) -> Result<Vec<StoredDrawing>, ScnError> {
    Ok(records(bytes)?
        .into_iter()
        .map(|record| StoredDrawing {
            id: record.id,
            title: record.title,
            version: drawing_blob(record.drawing)
                .and_then(|blob| blob.as_deref().map(migrate::peek_version).transpose()),
        })
        .collect())
}

fn records(bytes: &[u8]) -> Result<Vec<NoteRecordIn>, ScnError> {
    let records: Vec<NoteRecordIn> = serde_json::from_slice(bytes)?;

    if records.is_empty() {
        return Err(ScnError::new(ErrorKind::NoNotes));
    }

    // later copies of an id are dropped, the rest of the file is still worth keeping
    let mut seen = HashSet::with_capacity(records.len());
    Ok(records
        .into_iter()
        .filter(|record| {
            let first = seen.insert(record.id);
            if !first {
                tracing::warn!("dropping note {:?} with repeated id {}", record.title, record.id);
            }
            first
        })
        .collect())
}

fn drawing_blob(value: Option<serde_json::Value>) -> Result<Option<Vec<u8>>, ScnError> {
    match value {
        Some(serde_json::Value::String(encoded)) => {
            Ok(Some(general_purpose::STANDARD.decode(encoded)?))
        }
        Some(_) => Err(ScnError::because(
            ErrorKind::MissingHeader,
            String::from("drawing is not a string"),
        )),
        None => Ok(None),
    }
}

fn decode_drawing(value: Option<serde_json::Value>) -> Result<Drawing, ScnError> {
    match drawing_blob(value)? {
        Some(blob) => migrate::read(&blob),
        None => {
            tracing::debug!("no drawing stored");
            Ok(Drawing::empty())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        graphics::{Color, ColorExt},
        stroke::{Stroke, StrokeElement},
    };

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        Stroke::with_points(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| StrokeElement {
                    x,
                    y,
                    pressure: 0.25 + i as f32 / 10.,
                    time: i as f32 / 60.,
                })
                .collect(),
            Color::BLACK,
        )
    }

    fn notes() -> Vec<Note> {
        let mut first = Note::new("Note 1");
        first.push_stroke(stroke(&[(0., 0.), (10., 4.), (12.5, -3.)]));
        first.push_stroke(stroke(&[(100., 100.)]));

        let second = Note::new("empty one");

        let mut third = Note::new("Note 1");
        third.push_stroke(stroke(&[(-1., -1.), (-2., -8.)]));

        vec![first, second, third]
    }

    #[test]
    fn round_trip() {
        let notes = notes();
        let bytes = encode(&notes).unwrap();
        assert_eq!(decode(&bytes).unwrap(), notes);
    }

    #[test]
    fn outer_layer_is_readable() {
        let notes = notes();
        let bytes = encode(&notes).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let array = value.as_array().unwrap();

        assert_eq!(array.len(), 3);
        assert_eq!(array[1]["title"], "empty one");
        assert_eq!(array[0]["id"], notes[0].id().to_string());
        assert!(array[2]["drawing"].is_string());
    }

    #[test]
    fn one_bad_drawing_costs_one_note() {
        let notes = notes()
            .into_iter()
            .filter(|note| !note.drawing().is_empty())
            .collect::<Vec<_>>();
        let bytes = encode(&notes).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value[0]["drawing"] = serde_json::Value::from("bm90IGEgZHJhd2luZw==");

        let decoded = decode(&serde_json::to_vec(&value).unwrap()).unwrap();
        assert_eq!(decoded.len(), notes.len());
        for (decoded, original) in decoded.iter().zip(notes.iter()) {
            assert_eq!(decoded.id(), original.id());
            assert_eq!(decoded.title(), original.title());
        }

        assert!(decoded[0].drawing().is_empty());
        assert_eq!(decoded[1], notes[1]);
        assert_eq!(
            decoded.iter().filter(|note| note.drawing().is_empty()).count(),
            1
        );
    }

    #[test]
    fn drawing_shapes_that_degrade() {
        let id = NoteId::new();
        let json = format!(
            r#"[
                {{ "id": "{id}", "title": "missing" }},
                {{ "id": "{}", "title": "number", "drawing": 12 }},
                {{ "id": "{}", "title": "not base64", "drawing": "!!!" }},
                {{ "id": "{}", "title": "null", "drawing": null }}
            ]"#,
            NoteId::new(),
            NoteId::new(),
            NoteId::new(),
        );

        let decoded = decode(json.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0].id(), id);
        assert!(decoded.iter().all(|note| note.drawing().is_empty()));
    }

    #[test]
    fn bad_outer_layer_fails() {
        assert!(matches!(
            decode(b"{ not json").unwrap_err().kind(),
            ErrorKind::MalformedContainer(_)
        ));
        assert!(matches!(
            decode(br#"[{ "title": "no id" }]"#).unwrap_err().kind(),
            ErrorKind::MalformedContainer(_)
        ));
        assert!(matches!(
            decode(b"[]").unwrap_err().kind(),
            ErrorKind::NoNotes
        ));
    }

    #[test]
    fn repeated_id_keeps_the_first_note() {
        let id = NoteId::new();
        let other = NoteId::new();
        let json = format!(
            r#"[{{ "id": "{id}", "title": "a" }}, {{ "id": "{other}", "title": "b" }},
                {{ "id": "{id}", "title": "c" }}]"#
        );

        let decoded = decode(json.as_bytes()).unwrap();
        let titles = decoded.iter().map(Note::title).collect::<Vec<_>>();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(decoded[0].id(), id);
        assert_eq!(decoded[1].id(), other);
    }

    #[test]
    fn versions_without_decoding() {
        let mut v1 = crate::SCN_MAGIC.to_vec();
        v1.extend_from_slice(&1u64.to_le_bytes());
        let mut future = crate::SCN_MAGIC.to_vec();
        future.extend_from_slice(&7u64.to_le_bytes());
        let current = migrate::write(&Drawing::empty()).unwrap();

        let drawings = [
            Some(general_purpose::STANDARD.encode(current)),
            Some(general_purpose::STANDARD.encode(v1)),
            Some(general_purpose::STANDARD.encode(future)),
            Some(String::from("!!")),
            None,
        ];
        let json = serde_json::to_vec(
            &drawings
                .iter()
                .map(|drawing| {
                    serde_json::json!({
                        "id": NoteId::new(),
                        "title": "n",
                        "drawing": drawing,
                    })
                })
                .collect::<Vec<_>>(),
        )
        .unwrap();

        let stored = stored_versions(&json).unwrap();
        let versions = stored
            .iter()
            .map(|stored| stored.version.as_ref().ok().copied())
            .collect::<Vec<_>>();
        assert_eq!(
            versions,
            [
                Some(Some(Version::CURRENT)),
                Some(Some(Version(1))),
                Some(Some(Version(7))),
                None,
                Some(None),
            ]
        );
        assert_eq!(
            Version::upgrade_type(Version(1)),
            migrate::UpgradeType::Rocky
        );
        assert_eq!(
            Version::upgrade_type(Version(7)),
            migrate::UpgradeType::Incompatible
        );
    }
}
