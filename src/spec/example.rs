use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{spec_extensions, FromRef, Ref, RefError, RefType, Spec};

/// An example grouping a summary and description with a single value carrier.
///
/// Exactly one of `value`, `dataValue`, `serializedValue`, or `externalValue` carries the
/// example; the loader rejects documents that populate more than one.
///
/// See <https://spec.openapis.org/oas/v3.2.0#example-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Example {
    /// Short description for the example.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Long description for the example.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Embedded literal example.
    ///
    /// Mutually exclusive with the `dataValue`, `serializedValue`, and `externalValue` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// Example of the data structure prior to serialization.
    ///
    /// Mutually exclusive with the `value` field.
    #[serde(rename = "dataValue", skip_serializing_if = "Option::is_none")]
    pub data_value: Option<serde_json::Value>,

    /// Example of the serialized form of the value, as a string.
    ///
    /// Mutually exclusive with the `value` field.
    #[serde(rename = "serializedValue", skip_serializing_if = "Option::is_none")]
    pub serialized_value: Option<String>,

    /// A URI that identifies the literal example.
    ///
    /// Provides the capability to reference examples that cannot easily be included in JSON
    /// documents. Mutually exclusive with the `value` field.
    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub external_value: Option<Url>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Example {
    /// Counts the populated value carriers.
    pub fn carrier_count(&self) -> usize {
        usize::from(self.value.is_some())
            + usize::from(self.data_value.is_some())
            + usize::from(self.serialized_value.is_some())
            + usize::from(self.external_value.is_some())
    }
}

impl FromRef for Example {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::Example => spec
                .components
                .as_ref()
                .and_then(|cs| cs.examples.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::Example)),
        }
    }
}
