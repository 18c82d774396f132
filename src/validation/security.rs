//! Security scheme integrity checks.
//!
//! The type-specific required fields (`apiKey` name/in, `http` scheme, `openIdConnect` URL,
//! per-flow URLs and scopes) are enforced by the data model's shape at load time; what
//! remains here are the rules deserialization cannot see.

use super::ValidationError;
use crate::spec::{ObjectOrReference, SecurityScheme, Spec};

pub fn check_security_schemes(spec: &Spec) -> Result<(), ValidationError> {
    let Some(components) = &spec.components else {
        return Ok(());
    };

    for (name, oor) in &components.security_schemes {
        let ObjectOrReference::Object(scheme) = oor else {
            continue;
        };

        match scheme {
            SecurityScheme::ApiKey {
                name: key_name,
                location,
                ..
            } => {
                if key_name.is_empty() {
                    return Err(ValidationError::EmptyApiKeyField {
                        scheme: name.clone(),
                        field: "name",
                    });
                }
                if location.is_empty() {
                    return Err(ValidationError::EmptyApiKeyField {
                        scheme: name.clone(),
                        field: "in",
                    });
                }
            }

            SecurityScheme::Http {
                scheme: http_scheme,
                bearer_format,
                ..
            } => {
                if bearer_format.is_some() && !http_scheme.eq_ignore_ascii_case("bearer") {
                    return Err(ValidationError::BearerFormatWithoutBearer(name.clone()));
                }
            }

            SecurityScheme::OAuth2 { flows, .. } => {
                if flows.is_empty() {
                    return Err(ValidationError::EmptyOAuth2Flows(name.clone()));
                }
            }

            SecurityScheme::MutualTls { .. } | SecurityScheme::OpenIdConnect { .. } => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::spec::Components;

    fn spec_with_scheme(name: &str, scheme: serde_json::Value) -> Spec {
        let mut components = Components::default();
        components.security_schemes.insert(
            name.to_owned(),
            ObjectOrReference::Object(serde_json::from_value(scheme).unwrap()),
        );

        Spec {
            components: Some(components),
            ..Spec::default()
        }
    }

    #[test]
    fn oauth2_without_flows_is_rejected() {
        let spec = spec_with_scheme("oauth", serde_json::json!({ "type": "oauth2", "flows": {} }));

        assert_matches!(
            check_security_schemes(&spec),
            Err(ValidationError::EmptyOAuth2Flows(_))
        );
    }

    #[test]
    fn oauth2_with_authorization_code_flow_is_accepted() {
        let spec = spec_with_scheme(
            "oauth",
            serde_json::json!({
                "type": "oauth2",
                "flows": {
                    "authorizationCode": {
                        "authorizationUrl": "https://example.com/authorize",
                        "tokenUrl": "https://example.com/token",
                        "scopes": {}
                    }
                }
            }),
        );

        assert_matches!(check_security_schemes(&spec), Ok(()));
    }

    #[test]
    fn bearer_format_requires_bearer_scheme() {
        let spec = spec_with_scheme(
            "http",
            serde_json::json!({ "type": "http", "scheme": "basic", "bearerFormat": "JWT" }),
        );

        assert_matches!(
            check_security_schemes(&spec),
            Err(ValidationError::BearerFormatWithoutBearer(_))
        );
    }
}
