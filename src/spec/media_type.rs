use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{spec_extensions, Encoding, Example, ObjectOrReference, Schema};

/// Each Media Type Object provides schema and examples for the media type identified by its
/// key.
///
/// At most one of `example` and `examples` may be present, and at most one of `encoding`,
/// `prefixEncoding`, and `itemEncoding`; the loader rejects violations.
///
/// See <https://spec.openapis.org/oas/v3.2.0#media-type-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct MediaType {
    /// Reference to a media type registered under `#/components/mediaTypes`.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// The schema defining the content of the request, response, parameter, or header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    /// Schema describing each item within a streaming or sequential media type.
    #[serde(rename = "itemSchema", skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<Schema>,

    /// Example of the media type's potential value.
    ///
    /// Mutually exclusive of the `examples` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Examples of the media type's potential value.
    ///
    /// Mutually exclusive of the `example` field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, ObjectOrReference<Example>>,

    /// A map between a property name and its encoding information.
    ///
    /// The key, being the property name, MUST exist in the schema as a property. The encoding
    /// field SHALL only apply when the media type is `multipart` or
    /// `application/x-www-form-urlencoded`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub encoding: BTreeMap<String, Encoding>,

    /// An array of encoding information corresponding positionally to the schema's
    /// `prefixItems`.
    #[serde(
        rename = "prefixEncoding",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prefix_encoding: Vec<Encoding>,

    /// Encoding information applied uniformly to items in an array media type.
    #[serde(rename = "itemEncoding", skip_serializing_if = "Option::is_none")]
    pub item_encoding: Option<Box<Encoding>>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl MediaType {
    /// Counts the populated encoding carriers.
    pub fn encoding_carrier_count(&self) -> usize {
        usize::from(!self.encoding.is_empty())
            + usize::from(!self.prefix_encoding.is_empty())
            + usize::from(self.item_encoding.is_some())
    }
}

/// True when a media type name describes a JSON document: `application/json` or any
/// `+json`-suffixed type, with optional parameters.
pub fn is_json_media_type(name: &str) -> bool {
    let essence = name.split(';').next().unwrap_or(name).trim();
    essence == "application/json" || essence.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_media_type_detection() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(is_json_media_type("application/problem+json"));
        assert!(!is_json_media_type("text/plain"));
        assert!(!is_json_media_type("application/xml"));
    }

    #[test]
    fn encoding_carriers_counted() {
        let media: MediaType = serde_json::from_str(
            r#"{
                "schema": { "type": "object" },
                "encoding": { "avatar": { "contentType": "image/png" } }
            }"#,
        )
        .unwrap();

        assert_eq!(media.encoding_carrier_count(), 1);
    }
}
