use derive_more::derive::{Display, Error};

use crate::error::ErrorKind;
use crate::spec::ParameterIn;

/// Semantic validation failures.
///
/// Validators are independent and the first failure is reported; the order of detection
/// between unrelated failures is unspecified.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ValidationError {
    /// Two parameters in one scope share `(name, in)` after reserved-header filtering.
    #[display("{scope}: duplicate parameter `{name}` in `{location}`")]
    DuplicateParameter {
        /// Route or webhook name owning the scope.
        scope: String,
        /// Parameter name.
        name: String,
        /// Parameter location.
        location: ParameterIn,
    },

    /// A `{placeholder}` in the route has no `in: path` parameter.
    #[display("{route}: no path parameter declared for placeholder `{{{name}}}`")]
    OrphanPlaceholder {
        /// Offending route.
        route: String,
        /// Placeholder name.
        name: String,
    },

    /// A placeholder name appears more than once in one route.
    #[display("{route}: placeholder `{{{name}}}` appears more than once")]
    DuplicatePlaceholder {
        /// Offending route.
        route: String,
        /// Placeholder name.
        name: String,
    },

    /// An `in: path` parameter has no matching placeholder in the route.
    #[display("{route}: path parameter `{name}` does not appear in the route")]
    UnusedPathParameter {
        /// Offending route.
        route: String,
        /// Parameter name.
        name: String,
    },

    /// An `in: path` parameter is not marked required.
    #[display("{route}: path parameter `{name}` must be required")]
    PathParameterNotRequired {
        /// Offending route.
        route: String,
        /// Parameter name.
        name: String,
    },

    /// Two routes are identical after placeholder normalization but not textually.
    #[display("path collision between `{first}` and `{second}`")]
    PathCollision {
        /// First route.
        first: String,
        /// Colliding route.
        second: String,
    },

    /// An operation id appears more than once.
    #[display("duplicate operation id `{_0}`")]
    DuplicateOperationId(#[error(not(source))] String),

    /// More than one `in: querystring` parameter is visible to one operation.
    #[display("{_0}: multiple querystring parameters")]
    MultipleQuerystring(#[error(not(source))] String),

    /// `querystring` and `query` parameters coexist in one operation.
    #[display("{_0}: querystring and query parameters are mutually exclusive")]
    QuerystringConflict(#[error(not(source))] String),

    /// Two tags share a name.
    #[display("duplicate tag `{_0}`")]
    DuplicateTag(#[error(not(source))] String),

    /// A tag names a parent that is not defined.
    #[display("tag `{tag}` references undefined parent `{parent}`")]
    UnknownTagParent {
        /// Child tag name.
        tag: String,
        /// Missing parent name.
        parent: String,
    },

    /// The tag parent graph contains a cycle.
    #[display("tag parent cycle through `{_0}`")]
    TagParentCycle(#[error(not(source))] String),

    /// An `oauth2` scheme declares no flows.
    #[display("security scheme `{_0}`: oauth2 flows must not be empty")]
    EmptyOAuth2Flows(#[error(not(source))] String),

    /// `bearerFormat` given on a non-bearer HTTP scheme.
    #[display("security scheme `{_0}`: bearerFormat is only meaningful for the bearer scheme")]
    BearerFormatWithoutBearer(#[error(not(source))] String),

    /// An `apiKey` scheme with an empty `name` or `in`.
    #[display("security scheme `{scheme}`: `{field}` must not be empty")]
    EmptyApiKeyField {
        /// Scheme component name.
        scheme: String,
        /// Offending field.
        field: &'static str,
    },
}

impl ValidationError {
    /// Error taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateParameter { .. }
            | Self::PathCollision { .. }
            | Self::DuplicateTag(_)
            | Self::DuplicateOperationId(_) => ErrorKind::Conflict,

            Self::BearerFormatWithoutBearer(_) => ErrorKind::Style,

            Self::OrphanPlaceholder { .. }
            | Self::DuplicatePlaceholder { .. }
            | Self::UnusedPathParameter { .. }
            | Self::PathParameterNotRequired { .. }
            | Self::MultipleQuerystring(_)
            | Self::QuerystringConflict(_)
            | Self::UnknownTagParent { .. }
            | Self::TagParentCycle(_)
            | Self::EmptyOAuth2Flows(_)
            | Self::EmptyApiKeyField { .. } => ErrorKind::Semantic,
        }
    }
}
