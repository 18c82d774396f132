use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use super::spec_extensions;

/// Allows configuration of the supported OAuth Flows.
///
/// A loaded `oauth2` security scheme must declare at least one flow; each flow carries its
/// flow-specific required URLs and a mandatory (possibly empty) scopes map.
///
/// See <https://spec.openapis.org/oas/v3.1.1#oauth-flows-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Flows {
    /// Configuration for the OAuth Implicit flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<ImplicitFlow>,

    /// Configuration for the OAuth Resource Owner Password flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordFlow>,

    /// Configuration for the OAuth Client Credentials flow.
    #[serde(rename = "clientCredentials", skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<ClientCredentialsFlow>,

    /// Configuration for the OAuth Authorization Code flow.
    #[serde(rename = "authorizationCode", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<AuthorizationCodeFlow>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Flows {
    /// True when no flow is configured.
    pub fn is_empty(&self) -> bool {
        self.implicit.is_none()
            && self.password.is_none()
            && self.client_credentials.is_none()
            && self.authorization_code.is_none()
    }
}

/// Configuration details for the OAuth Implicit flow.
///
/// See <https://spec.openapis.org/oas/v3.1.1#oauth-flow-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ImplicitFlow {
    /// The authorization URL to be used for this flow.
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: Url,

    /// The URL to be used for obtaining refresh tokens.
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,

    /// The available scopes for the OAuth2 security scheme.
    ///
    /// A map between the scope name and a short description for it. The map MAY be empty.
    pub scopes: BTreeMap<String, String>,
}

/// Configuration details for the OAuth Resource Owner Password flow.
///
/// See <https://spec.openapis.org/oas/v3.1.1#oauth-flow-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PasswordFlow {
    /// The token URL to be used for this flow.
    #[serde(rename = "tokenUrl")]
    pub token_url: Url,

    /// The URL to be used for obtaining refresh tokens.
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,

    /// The available scopes for the OAuth2 security scheme.
    ///
    /// A map between the scope name and a short description for it. The map MAY be empty.
    pub scopes: BTreeMap<String, String>,
}

/// Configuration details for the OAuth Client Credentials flow.
///
/// See <https://spec.openapis.org/oas/v3.1.1#oauth-flow-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClientCredentialsFlow {
    /// The token URL to be used for this flow.
    #[serde(rename = "tokenUrl")]
    pub token_url: Url,

    /// The URL to be used for obtaining refresh tokens.
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,

    /// The available scopes for the OAuth2 security scheme.
    ///
    /// A map between the scope name and a short description for it. The map MAY be empty.
    pub scopes: BTreeMap<String, String>,
}

/// Configuration details for the OAuth Authorization Code flow.
///
/// See <https://spec.openapis.org/oas/v3.1.1#oauth-flow-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AuthorizationCodeFlow {
    /// The authorization URL to be used for this flow.
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: Url,

    /// The token URL to be used for this flow.
    #[serde(rename = "tokenUrl")]
    pub token_url: Url,

    /// The URL to be used for obtaining refresh tokens.
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,

    /// The available scopes for the OAuth2 security scheme.
    ///
    /// A map between the scope name and a short description for it. The map MAY be empty.
    pub scopes: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn authorization_code_requires_token_url() {
        let flow = serde_json::from_str::<AuthorizationCodeFlow>(
            r#"{
                "authorizationUrl": "https://example.com/authorize",
                "scopes": {}
            }"#,
        );

        assert_matches!(flow, Err(_));
    }

    #[test]
    fn scopes_map_is_mandatory() {
        let flow = serde_json::from_str::<ImplicitFlow>(
            r#"{ "authorizationUrl": "https://example.com/authorize" }"#,
        );

        assert_matches!(flow, Err(_));
    }
}
