use derive_more::derive::{Display, Error};
use url::Url;

use crate::error::ErrorKind;
use crate::location::Location;
use crate::spec::RefError;

/// Failures raised while loading a document into the data model.
///
/// Each failure is reported once, with the offending JSON-pointer-style location where
/// applicable. Any failure discards the partially built spec.
#[derive(Debug, Display, Error)]
pub enum LoadError {
    /// Document tree does not deserialize into the data model.
    #[display("Malformed document: {_0}")]
    Json(serde_json::Error),

    /// `openapi` field is outside the supported 3.x series.
    #[display("Unsupported openapi version `{_0}`")]
    UnsupportedVersion(#[error(not(source))] String),

    /// A required field is missing or empty.
    #[display("{_0}: missing required field `{_1}`")]
    MissingField(#[error(not(source))] Location, &'static str),

    /// Neither `paths`, `webhooks`, nor `components` is present.
    #[display("document has none of `paths`, `webhooks`, or `components`")]
    NoContent,

    /// A responses map is present but empty.
    #[display("{_0}: responses map must not be empty")]
    EmptyResponses(#[error(not(source))] Location),

    /// Component map key contains characters outside `[a-zA-Z0-9._-]`.
    #[display("{_0}: invalid component key `{_1}`")]
    InvalidComponentKey(#[error(not(source))] Location, String),

    /// Responses map key is not a status code, a `1XX`..`5XX` range, or `default`.
    #[display("{_0}: invalid status code key `{_1}`")]
    InvalidStatusCode(#[error(not(source))] Location, String),

    /// Paths map key does not begin with `/`.
    #[display("{_0}: path must begin with `/`: `{_1}`")]
    PathMissingSlash(#[error(not(source))] Location, String),

    /// Server URL template names a variable with no definition.
    #[display("{_0}: server URL variable `{{{_1}}}` has no definition")]
    UndefinedServerVariable(#[error(not(source))] Location, String),

    /// Server URL template repeats a variable.
    #[display("{_0}: server URL variable `{{{_1}}}` appears more than once")]
    DuplicatedServerVariable(#[error(not(source))] Location, String),

    /// Server variable default is not one of its enum values.
    #[display("{_0}: server variable `{_1}` default is not an enum member")]
    InvalidServerVariableDefault(#[error(not(source))] Location, String),

    /// Two servers in one list share a name.
    #[display("{_0}: duplicate server name `{_1}`")]
    DuplicateServerName(#[error(not(source))] Location, String),

    /// License declares both `identifier` and `url`.
    #[display("{_0}: license `identifier` and `url` are mutually exclusive")]
    LicenseConflict(#[error(not(source))] Location),

    /// Reference failed to resolve or is structurally unacceptable.
    #[display("{_0}: {_1}")]
    Ref(#[error(not(source))] Location, RefError),

    /// A second document was registered under an already-used base URI.
    #[display("duplicate registry base URI `{_0}`")]
    DuplicateBaseUri(#[error(not(source))] Url),

    /// A spec without a document URI was pushed at the registry, or a reference names a
    /// document the registry does not hold.
    #[display("{_0}: unregistered document: {_1}")]
    UnregisteredDocument(#[error(not(source))] Location, String),

    /// Both `example` and `examples` are present.
    #[display("{_0}: `example` and `examples` are mutually exclusive")]
    ExampleConflict(#[error(not(source))] Location),

    /// An example populates zero or several of its value carriers.
    #[display(
        "{_0}: example must carry exactly one of `value`, `dataValue`, `serializedValue`, `externalValue`"
    )]
    ExampleCarrierConflict(#[error(not(source))] Location),

    /// A parameter or header carries both `schema` and `content`, or neither.
    #[display("{_0}: exactly one of `schema` or `content` must be present")]
    SchemaContentConflict(#[error(not(source))] Location),

    /// A `content` map does not hold exactly one media type entry.
    #[display("{_0}: `content` must contain exactly one media type entry")]
    ContentNotSingular(#[error(not(source))] Location),

    /// A `querystring` parameter declares a `schema`.
    #[display("{_0}: querystring parameters require `content`")]
    QuerystringNeedsContent(#[error(not(source))] Location),

    /// More than one of `encoding`, `prefixEncoding`, and `itemEncoding` is present.
    #[display("{_0}: at most one of `encoding`, `prefixEncoding`, `itemEncoding` may be present")]
    EncodingConflict(#[error(not(source))] Location),

    /// Style incompatible with the parameter location.
    #[display("{_0}: style `{_1}` is not valid for `in: {_2}` parameters")]
    StyleLocationMismatch(#[error(not(source))] Location, String, String),

    /// `allowReserved` on a non-query parameter.
    #[display("{_0}: `allowReserved` is only valid for query parameters")]
    AllowReservedLocation(#[error(not(source))] Location),

    /// `allowEmptyValue` on a non-query parameter.
    #[display("{_0}: `allowEmptyValue` is only valid for query parameters")]
    AllowEmptyValueLocation(#[error(not(source))] Location),

    /// Header style other than `simple`.
    #[display("{_0}: header style must be `simple`")]
    HeaderStyle(#[error(not(source))] Location),

    /// A link declares zero or both of `operationId` and `operationRef`.
    #[display("{_0}: exactly one of `operationId` or `operationRef` must be present")]
    LinkTargetConflict(#[error(not(source))] Location),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl LoadError {
    /// Error taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Json(_)
            | Self::UnsupportedVersion(_)
            | Self::MissingField(..)
            | Self::NoContent
            | Self::EmptyResponses(_)
            | Self::InvalidComponentKey(..)
            | Self::InvalidStatusCode(..)
            | Self::PathMissingSlash(..)
            | Self::UndefinedServerVariable(..)
            | Self::DuplicatedServerVariable(..)
            | Self::InvalidServerVariableDefault(..)
            | Self::SchemaContentConflict(_)
            | Self::ContentNotSingular(_)
            | Self::QuerystringNeedsContent(_)
            | Self::LinkTargetConflict(_)
            | Self::LicenseConflict(_) => ErrorKind::InvalidInput,

            Self::Ref(..) | Self::UnregisteredDocument(..) => ErrorKind::Reference,

            Self::DuplicateBaseUri(_) | Self::DuplicateServerName(..) => ErrorKind::Conflict,

            Self::ExampleConflict(_)
            | Self::ExampleCarrierConflict(_)
            | Self::EncodingConflict(_)
            | Self::StyleLocationMismatch(..)
            | Self::AllowReservedLocation(_)
            | Self::AllowEmptyValueLocation(_)
            | Self::HeaderStyle(_) => ErrorKind::Style,
        }
    }
}
