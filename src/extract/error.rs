use derive_more::derive::{Display, Error};

use crate::error::ErrorKind;

/// Failures raised by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ExtractError {
    /// A declarator could not be split into name, return type, and arguments.
    #[display("invalid signature: `{_0}`")]
    InvalidSignature(#[error(not(source))] String),

    /// A well-formed directive carries arguments the builder must reject.
    ///
    /// The affected operation is dropped with a warning; extraction continues.
    #[display("invalid annotation: {_0}")]
    InvalidAnnotation(#[error(not(source))] String),

    /// Two operations landed on the same `(route, method)` slot.
    #[display("duplicate operation `{method} {route}`")]
    DuplicateOperation {
        /// Route both operations mount at.
        route: String,
        /// Raw method string.
        method: String,
    },
}

impl ExtractError {
    /// Error taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignature(_) | Self::InvalidAnnotation(_) => ErrorKind::InvalidInput,
            Self::DuplicateOperation { .. } => ErrorKind::Conflict,
        }
    }
}
