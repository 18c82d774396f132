use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    spec_extensions, FromRef, Header, Link, MediaType, ObjectOrReference, Ref, RefError, RefType,
    Spec,
};

static STATUS_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new("^([1-5]XX|[1-5][0-9][0-9])$").unwrap());

/// True for valid keys of a responses map: three digits, a `1XX`..`5XX` range, or `default`.
pub fn is_valid_status_key(key: &str) -> bool {
    key == "default" || STATUS_RANGE.is_match(key)
}

/// Describes a single response from an API operation.
///
/// See <https://spec.openapis.org/oas/v3.2.0#response-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Response {
    /// A short summary of the meaning of the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A description of the response.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text
    /// representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Maps a header name to its definition.
    ///
    /// RFC 7230 states header names are case insensitive. If a response header is defined with
    /// the name `Content-Type`, it SHALL be ignored.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ObjectOrReference<Header>>,

    /// A map containing descriptions of potential response payloads.
    ///
    /// The key is a media type or media type range and the value describes it. For responses
    /// that match multiple keys, only the most specific key is applicable, e.g. `text/plain`
    /// overrides `text/*`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    /// A map of operations links that can be followed from the response.
    ///
    /// The key of the map is a short name for the link, following the naming constraints of
    /// the names for Component Objects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, ObjectOrReference<Link>>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl FromRef for Response {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::Response => spec
                .components
                .as_ref()
                .and_then(|cs| cs.responses.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::Response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys() {
        assert!(is_valid_status_key("200"));
        assert!(is_valid_status_key("404"));
        assert!(is_valid_status_key("default"));
        assert!(is_valid_status_key("2XX"));
        assert!(is_valid_status_key("5XX"));

        assert!(!is_valid_status_key("2xx"));
        assert!(!is_valid_status_key("99"));
        assert!(!is_valid_status_key("600"));
        assert!(!is_valid_status_key("20"));
        assert!(!is_valid_status_key("0200"));
        assert!(!is_valid_status_key("ok"));
    }
}
