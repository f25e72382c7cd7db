//! Drawing blob versions
//!
//! Every drawing is stored as `SCN`, a little-endian u64 version, then a raw deflate stream of the
//! bincode-encoded strokes. Only [Version::CURRENT] is ever written. Older versions are read by
//! decoding into the types from their module and upgrading to the current [Drawing]. If you
//! change a field of [Stroke], [StrokeElement] or [Drawing], you need to do these things:
//!
//! - Increment [Version::CURRENT]
//! - Add a new module named v\[old\] where \[old\] is the previous version
//! - Copy the old types into it, suffixed with V\[old\], deriving only bincode::Decode
//! - Add the old version to [Version::upgrade_type] and to the match in [from]

use crate::{
    drawing::Drawing,
    error::{ErrorKind, ScnError},
    graphics::{Color, ColorExt},
    stroke::{Stroke, StrokeElement},
};
use bincode::config::{standard, Config};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::Read,
};

const BLOB_LIMIT: usize = 64 * 1024 * 1024;

fn config() -> impl Config {
    standard().with_limit::<BLOB_LIMIT>()
}

pub fn read(bytes: &[u8]) -> Result<Drawing, ScnError> {
    let mut reader = bytes;
    let version = read_header(&mut reader)?;

    tracing::debug!("got version {}", version);
    if Version::upgrade_type(version) == UpgradeType::Incompatible {
        return Err(ScnError::new(ErrorKind::UnknownVersion(version)));
    }

    from(version, reader)
}

pub fn write(drawing: &Drawing) -> Result<Vec<u8>, ScnError> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&crate::SCN_MAGIC);
    bytes.extend_from_slice(&u64::to_le_bytes(Version::CURRENT.0));

    tracing::debug!("deflating {} strokes", drawing.len());
    let mut deflate_writer = flate2::write::DeflateEncoder::new(bytes, flate2::Compression::fast());
    bincode::encode_into_std_write(drawing, &mut deflate_writer, config())?;

    Ok(deflate_writer.finish()?)
}

/// Reads the version out of a blob without inflating it.
pub fn peek_version(bytes: &[u8]) -> Result<Version, ScnError> {
    let mut reader = bytes;
    read_header(&mut reader)
}

fn read_header(reader: &mut impl Read) -> Result<Version, ScnError> {
    let mut magic = [0; 3];
    reader
        .read_exact(&mut magic)
        .map_err(|_| ScnError::new(ErrorKind::MissingHeader))?;

    if magic != crate::SCN_MAGIC {
        return Err(ScnError::new(ErrorKind::MissingHeader));
    }

    let mut version_bytes = [0; std::mem::size_of::<u64>()];
    reader.read_exact(&mut version_bytes)?;
    Ok(Version(u64::from_le_bytes(version_bytes)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeType {
    Smooth,
    Rocky,
    Incompatible,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Version(pub u64);

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Version {
    pub const CURRENT: Self = Version(2);

    pub fn upgrade_type(from: Self) -> UpgradeType {
        use UpgradeType::*;

        if from == Self::CURRENT {
            return Smooth;
        }

        match from {
            Version(1) => Rocky,
            _ => Incompatible,
        }
    }
}

fn from(version: Version, reader: impl Read) -> Result<Drawing, ScnError> {
    tracing::debug!("inflating");
    let mut deflate_reader = flate2::read::DeflateDecoder::new(reader);

    match version {
        version if version == Version::CURRENT => {
            Ok(bincode::decode_from_std_read(&mut deflate_reader, config())?)
        }

        Version(1) => {
            tracing::info!(
                "upgrading drawing from {} to {}",
                version,
                Version::CURRENT
            );

            let v1: v1::DrawingV1 = bincode::decode_from_std_read(&mut deflate_reader, config())?;

            Ok(Drawing::new(
                v1.strokes
                    .into_iter()
                    .map(|v1| Stroke {
                        points: v1
                            .points
                            .iter()
                            .map(|point| StrokeElement {
                                x: point.x,
                                y: point.y,
                                pressure: point.pressure,
                                time: 0.,
                            })
                            .collect(),
                        color: Color::from_u8(v1.color),
                        brush_size: crate::DEFAULT_BRUSH_SIZE,
                    })
                    .collect(),
            ))
        }

        _ => Err(ScnError::new(ErrorKind::UnknownVersion(version))),
    }
}

pub mod v1 {
    #[derive(bincode::Decode)]
    #[cfg_attr(test, derive(bincode::Encode))]
    pub struct StrokeElementV1 {
        pub x: f32,
        pub y: f32,
        pub pressure: f32,
    }

    #[derive(bincode::Decode)]
    #[cfg_attr(test, derive(bincode::Encode))]
    pub struct StrokeV1 {
        pub points: Vec<StrokeElementV1>,
        pub color: [u8; 3],
    }

    #[derive(bincode::Decode)]
    #[cfg_attr(test, derive(bincode::Encode))]
    pub struct DrawingV1 {
        pub strokes: Vec<StrokeV1>,
    }
}
