use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{spec_extensions, Example, FromRef, MediaType, ObjectOrReference, Ref, RefError, RefType, Schema, Spec};

/// Header names that are described elsewhere in an OpenAPI document and are therefore dropped
/// from parameter lists before any uniqueness checking.
pub const RESERVED_HEADER_NAMES: [&str; 3] = ["Accept", "Content-Type", "Authorization"];

/// True for header names that parameter lists must not describe.
pub fn is_reserved_header(name: &str) -> bool {
    RESERVED_HEADER_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// The location of a parameter.
///
/// `querystring` is the whole-query-payload pseudo-location: the entire query string is
/// serialized through a single parameter, mutually exclusive with any `query` parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterIn {
    /// Part of the path template; always required.
    Path,

    /// Appended to the URL query.
    Query,

    /// The entire query string as one payload.
    Querystring,

    /// A request header.
    Header,

    /// A cookie value.
    Cookie,
}

impl ParameterIn {
    /// Serialized name of the location.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Querystring => "querystring",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl std::fmt::Display for ParameterIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParameterIn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "path" => Self::Path,
            "query" => Self::Query,
            "querystring" => Self::Querystring,
            "header" => Self::Header,
            "cookie" => Self::Cookie,
            _ => return Err(()),
        })
    }
}

/// Serialization style of a parameter.
///
/// See <https://spec.openapis.org/oas/v3.1.1#style-values>.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    /// Path-style parameters defined by RFC 6570.
    Matrix,

    /// Label-style parameters defined by RFC 6570.
    Label,

    /// Simple-style parameters defined by RFC 6570.
    Simple,

    /// Form-style parameters defined by RFC 6570.
    Form,

    /// Space-separated array values.
    SpaceDelimited,

    /// Pipe-separated array values.
    PipeDelimited,

    /// Nested objects rendered as `param[key]=value` pairs.
    DeepObject,
}

impl ParameterStyle {
    /// The style assumed when a parameter in the given location declares none.
    pub fn default_for(location: ParameterIn) -> Self {
        match location {
            ParameterIn::Query | ParameterIn::Cookie | ParameterIn::Querystring => Self::Form,
            ParameterIn::Path | ParameterIn::Header => Self::Simple,
        }
    }
}

/// Describes a single operation parameter.
///
/// A unique parameter is defined by a combination of a [name] and [location].
///
/// See <https://spec.openapis.org/oas/v3.2.0#parameter-object>.
///
/// [name]: https://spec.openapis.org/oas/v3.2.0#parameterName
/// [location]: https://spec.openapis.org/oas/v3.2.0#parameterIn
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Parameter {
    /// The name of the parameter. Parameter names are case sensitive.
    pub name: String,

    /// The location of the parameter.
    #[serde(rename = "in")]
    pub location: ParameterIn,

    /// A brief description of the parameter.
    ///
    /// This could contain examples of use. [CommonMark syntax](https://spec.commonmark.org)
    /// MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Determines whether this parameter is mandatory.
    ///
    /// If the parameter location is `path`, this field is REQUIRED and its value MUST be true.
    /// Otherwise, the field MAY be included and its default value is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Specifies that a parameter is deprecated and SHOULD be transitioned out of usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Sets the ability to pass empty-valued parameters.
    ///
    /// This is valid only for `query` parameters.
    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,

    /// Describes how the parameter value will be serialized depending on the type of the
    /// parameter value.
    ///
    /// Default values (based on value of `in`): for `query` - `form`; for `path` - `simple`;
    /// for `header` - `simple`; for `cookie` - `form`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    /// True if array/object parameter values generate separate parameters for each value of
    /// the array or key-value pair of the map.
    ///
    /// When `style` is `form`, the default value is true; for all other styles it is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    /// Determines whether the parameter value SHOULD allow reserved characters, as defined by
    /// RFC 3986, to be included without percent-encoding.
    ///
    /// This is valid only for `query` parameters.
    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,

    /// The schema defining the type used for the parameter.
    ///
    /// A parameter MUST contain either a `schema` field, or a `content` field, but not both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    /// Example of the parameter's potential value.
    ///
    /// Mutually exclusive of the `examples` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Examples of the parameter's potential value.
    ///
    /// Mutually exclusive of the `example` field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, ObjectOrReference<Example>>,

    /// A map containing the representations for the parameter.
    ///
    /// The key is the media type and the value describes it. The map MUST only contain one
    /// entry. A parameter MUST contain either a `schema` field, or a `content` field, but not
    /// both; `querystring` parameters MUST use `content`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Parameter {
    /// Builds a parameter with only the required fields populated.
    pub fn new(name: impl Into<String>, location: ParameterIn) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: None,
            deprecated: None,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: None,
            example: None,
            examples: BTreeMap::new(),
            content: None,
            extensions: IndexMap::new(),
        }
    }

    /// The serialization style in effect, falling back to the location default.
    pub fn effective_style(&self) -> ParameterStyle {
        self.style
            .unwrap_or_else(|| ParameterStyle::default_for(self.location))
    }

    /// The explode behavior in effect: true iff the effective style is `form`, unless
    /// declared.
    pub fn effective_explode(&self) -> bool {
        self.explode
            .unwrap_or(self.effective_style() == ParameterStyle::Form)
    }
}

impl FromRef for Parameter {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::Parameter => spec
                .components
                .as_ref()
                .and_then(|cs| cs.parameters.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::Parameter)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn style_defaults_follow_location() {
        assert_eq!(
            ParameterStyle::default_for(ParameterIn::Path),
            ParameterStyle::Simple
        );
        assert_eq!(
            ParameterStyle::default_for(ParameterIn::Query),
            ParameterStyle::Form
        );
        assert_eq!(
            ParameterStyle::default_for(ParameterIn::Header),
            ParameterStyle::Simple
        );
        assert_eq!(
            ParameterStyle::default_for(ParameterIn::Cookie),
            ParameterStyle::Form
        );
    }

    #[test]
    fn explode_defaults_to_true_only_for_form() {
        let query = Parameter::new("q", ParameterIn::Query);
        assert!(query.effective_explode());

        let path = Parameter::new("id", ParameterIn::Path);
        assert!(!path.effective_explode());
    }

    #[test]
    fn reserved_headers_matched_case_insensitively() {
        assert!(is_reserved_header("Authorization"));
        assert!(is_reserved_header("content-type"));
        assert!(is_reserved_header("ACCEPT"));
        assert!(!is_reserved_header("X-Request-Id"));
    }

    #[test]
    fn querystring_location_parses() {
        let param: Parameter = serde_json::from_str(
            r#"{
                "name": "filter",
                "in": "querystring",
                "content": {
                    "application/json": { "schema": { "type": "object" } }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(param.location, ParameterIn::Querystring);
        assert!(param.content.is_some());
    }
}
