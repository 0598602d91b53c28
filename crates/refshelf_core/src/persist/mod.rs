//! Whole-dataset persistence, batch import and text export.
//!
//! # Responsibility
//! - Encode/decode the dataset JSON document.
//! - Decode bare-array import files and write citation exports.
//!
//! # Invariants
//! - Decoding finishes before any store is touched; callers swap state only
//!   on success.
//! - Every file failure carries the offending path.

pub mod codec;
pub mod dataset;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use codec::{export_references, import_references, load_from_file, render_export, save_to_file};
pub use dataset::Dataset;

pub type CodecResult<T> = Result<T, CodecError>;

/// Persistence-layer error.
#[derive(Debug)]
pub enum CodecError {
    /// File could not be opened, read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is not valid JSON or has the wrong top-level shape.
    Parse { path: PathBuf, message: String },
    /// In-memory state could not be encoded.
    Encode(String),
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Parse { .. } => "parse_error",
            Self::Encode(_) => "encode_error",
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot parse `{}`: {message}", path.display())
            }
            Self::Encode(message) => write!(f, "cannot encode dataset: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
            Self::Encode(_) => None,
        }
    }
}
