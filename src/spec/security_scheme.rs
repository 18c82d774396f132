use serde::{Deserialize, Serialize};
use url::Url;

use super::{Flows, FromRef, Ref, RefError, RefType, Spec};

/// Defines a security scheme that can be used by the operations.
///
/// Supported schemes are HTTP authentication, an API key (either as a header, a cookie
/// parameter, or as a query parameter), mutual TLS (use of a client certificate), OAuth2's
/// common flows as defined in [RFC 6749], and [OpenID Connect Discovery].
///
/// See <https://spec.openapis.org/oas/v3.1.1#security-scheme-object>.
///
/// [RFC 6749]: https://tools.ietf.org/html/rfc6749
/// [OpenID Connect Discovery]: https://tools.ietf.org/html/draft-ietf-oauth-discovery-06
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// API key, passed in a named header, query parameter, or cookie.
    #[serde(rename = "apiKey")]
    ApiKey {
        /// The name of the header, query or cookie parameter to be used.
        name: String,

        /// The location of the API key: `query`, `header`, or `cookie`.
        #[serde(rename = "in")]
        location: String,

        /// A description for the security scheme.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// HTTP authentication scheme.
    #[serde(rename = "http")]
    Http {
        /// The name of the HTTP Authentication scheme to be used in the Authorization header,
        /// as defined in RFC 7235.
        scheme: String,

        /// A hint to the client to identify how the bearer token is formatted.
        ///
        /// Only meaningful when `scheme` is `bearer`.
        #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,

        /// A description for the security scheme.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Mutual TLS: client certificate authentication.
    #[serde(rename = "mutualTLS")]
    MutualTls {
        /// A description for the security scheme.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// OAuth 2.0 flows.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// An object containing configuration information for the flow types supported.
        ///
        /// MUST contain at least one flow.
        flows: Flows,

        /// A description for the security scheme.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// OpenID Connect.
    #[serde(rename = "openIdConnect")]
    OpenIdConnect {
        /// Well-known URL to discover the OpenID Connect provider metadata.
        #[serde(rename = "openIdConnectUrl")]
        open_id_connect_url: Url,

        /// A description for the security scheme.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl FromRef for SecurityScheme {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::SecurityScheme => spec
                .components
                .as_ref()
                .and_then(|cs| cs.security_schemes.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::SecurityScheme)),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn api_key_requires_name_and_location() {
        let scheme = serde_json::from_str::<SecurityScheme>(
            r#"{ "type": "apiKey", "name": "X-Api-Key", "in": "header" }"#,
        )
        .unwrap();
        assert_matches!(scheme, SecurityScheme::ApiKey { .. });

        let missing = serde_json::from_str::<SecurityScheme>(r#"{ "type": "apiKey" }"#);
        assert_matches!(missing, Err(_));
    }

    #[test]
    fn http_requires_scheme() {
        let missing = serde_json::from_str::<SecurityScheme>(r#"{ "type": "http" }"#);
        assert_matches!(missing, Err(_));
    }

    #[test]
    fn open_id_connect_requires_url() {
        let missing = serde_json::from_str::<SecurityScheme>(r#"{ "type": "openIdConnect" }"#);
        assert_matches!(missing, Err(_));
    }
}
