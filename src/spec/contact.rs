use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use super::spec_extensions;

/// Contact information for the exposed API.
///
/// See <https://spec.openapis.org/oas/v3.1.1#contact-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Contact {
    /// The identifying name of the contact person/organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The URL pointing to the contact information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// The email address of the contact person/organization.
    ///
    /// MUST be in the form of an email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}
