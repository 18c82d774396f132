use derive_more::derive::{Display, Error, From};
use semver::{Error as SemVerError, Version};

use crate::spec::{r#ref::RefError, schema::SchemaError};

/// Spec errors.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Reference error.
    #[display("Reference error: {_0}")]
    Ref(RefError),

    /// Schema error.
    #[display("Schema error: {_0}")]
    Schema(SchemaError),

    /// Semver error.
    #[display("Semver error: {_0}")]
    SemVer(SemVerError),

    /// Unsupported spec file version.
    #[display("Unsupported spec file version ({_0})")]
    UnsupportedSpecFileVersion(#[error(not(source))] Version),
}
