use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{spec_extensions, ExternalDoc};

/// Adds metadata to a single tag that is used by the
/// [Operation Object](https://spec.openapis.org/oas/v3.2.0#operation-object).
///
/// It is not mandatory to have a Tag Object per tag defined in the Operation Object instances.
///
/// See <https://spec.openapis.org/oas/v3.2.0#tag-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Tag {
    /// The name of the tag.
    ///
    /// Each tag name in the list MUST be unique.
    pub name: String,

    /// A short summary of the tag, suitable for display in a table of contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A description for the tag.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The `name` of a tag that this tag is nested under.
    ///
    /// The named tag MUST exist in the API description, and the circular references between
    /// parent and child tags MUST NOT be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// A machine-readable string to categorize what sort of tag it is.
    ///
    /// Common uses are `nav` for Navigation, `badge` for visible badges, and `audience` for
    /// APIs used by different groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Additional external documentation for this tag.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDoc>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}
