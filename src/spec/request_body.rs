use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    media_type::is_json_media_type, spec_extensions, FromRef, MediaType, Ref, RefError, RefType,
    Spec,
};

/// Describes a single request body.
///
/// See <https://spec.openapis.org/oas/v3.1.1#request-body-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct RequestBody {
    /// A brief description of the request body.
    ///
    /// This could contain examples of use. [CommonMark syntax](https://spec.commonmark.org)
    /// MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The content of the request body.
    ///
    /// The key is a media type or media type range and the value describes it. For requests
    /// that match multiple keys, only the most specific key is applicable, e.g. `text/plain`
    /// overrides `text/*`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    /// Determines if the request body is required in the request.
    ///
    /// Defaults to false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl RequestBody {
    /// Selects the primary media type of this body.
    ///
    /// `application/json` wins outright; otherwise the first JSON-like entry; otherwise the
    /// first entry.
    pub fn primary_media_type(&self) -> Option<(&String, &MediaType)> {
        if let Some(entry) = self.content.get_key_value("application/json") {
            return Some(entry);
        }

        self.content
            .iter()
            .find(|(name, _)| is_json_media_type(name))
            .or_else(|| self.content.iter().next())
    }
}

impl FromRef for RequestBody {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::RequestBody => spec
                .components
                .as_ref()
                .and_then(|cs| cs.request_bodies.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::RequestBody)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_media_type_prefers_json() {
        let body: RequestBody = serde_json::from_str(
            r#"{
                "content": {
                    "application/xml": {},
                    "application/json": {},
                    "text/plain": {}
                }
            }"#,
        )
        .unwrap();

        let (name, _) = body.primary_media_type().unwrap();
        assert_eq!(name, "application/json");
    }

    #[test]
    fn primary_media_type_falls_back_to_json_suffix() {
        let body: RequestBody = serde_json::from_str(
            r#"{
                "content": {
                    "application/xml": {},
                    "application/problem+json": {}
                }
            }"#,
        )
        .unwrap();

        let (name, _) = body.primary_media_type().unwrap();
        assert_eq!(name, "application/problem+json");
    }
}
