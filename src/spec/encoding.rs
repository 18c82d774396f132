use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{spec_extensions, Header, ObjectOrReference, ParameterStyle};

/// A single encoding definition applied to a single schema property.
///
/// See <https://spec.openapis.org/oas/v3.1.1#encoding-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Encoding {
    /// The Content-Type for encoding a specific property.
    ///
    /// Default value depends on the property type, per the OpenAPI specification.
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// A map allowing additional information to be provided as headers, for example
    /// `Content-Disposition`.
    ///
    /// `Content-Type` is described separately and SHALL be ignored in this section.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ObjectOrReference<Header>>,

    /// Describes how a specific property value will be serialized depending on its type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    /// True if property values of type `array` or `object` generate separate parameters for
    /// each value of the array, or key-value-pair of the map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    /// Determines whether the parameter value SHOULD allow reserved characters, as defined by
    /// RFC 3986, to be included without percent-encoding.
    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}
