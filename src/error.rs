//! Error types

use std::io;

use derive_more::derive::{Display, Error, From};

use crate::extract::ExtractError;
use crate::loader::LoadError;
use crate::validation::ValidationError;

/// Error taxonomy buckets shared by every subsystem.
///
/// Groups fine-grained failures for reporting and for the CLI's exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete input.
    InvalidInput,

    /// A reference that does not resolve.
    Reference,

    /// Two definitions landed on one slot.
    Conflict,

    /// Style/serialization fields combined impermissibly.
    Style,

    /// A cross-cutting semantic rule failed.
    Semantic,

    /// Read or write failure.
    Io,
}

/// Top-level errors.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// I/O error.
    #[display("I/O error: {_0}")]
    Io(io::Error),

    /// JSON error.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    /// YAML error.
    #[display("YAML error: {_0}")]
    #[cfg(feature = "yaml-spec")]
    Yaml(serde_yml::Error),

    /// Document load error.
    #[display("{_0}")]
    Load(LoadError),

    /// Semantic validation error.
    #[display("{_0}")]
    Validation(ValidationError),

    /// Extraction error.
    #[display("{_0}")]
    Extract(ExtractError),
}

impl Error {
    /// Error taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::InvalidInput,
            #[cfg(feature = "yaml-spec")]
            Self::Yaml(_) => ErrorKind::InvalidInput,
            Self::Load(err) => err.kind(),
            Self::Validation(err) => err.kind(),
            Self::Extract(err) => err.kind(),
        }
    }
}
