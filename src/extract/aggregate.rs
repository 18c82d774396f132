//! Aggregation of built operations and document-level directives into one spec.

use indexmap::IndexMap;
use log::{debug, warn};

use super::builder::BuiltOperation;
use super::doc::{Attr, DocMetadata};
use super::types::SchemaRegistry;
use super::ExtractError;
use crate::spec::{
    Components, Contact, Flows, Info, License, ObjectOrReference, SecurityScheme, Server,
    ServerVariable, Spec, Tag,
};

/// Default OpenAPI version stamped on extracted specs.
const OUTPUT_OPENAPI_VERSION: &str = "3.2.0";

/// Accumulates operations under `(route, verb)` keys into the target spec.
#[derive(Debug)]
pub struct Aggregator {
    spec: Spec,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Creates an aggregator around an empty spec shell.
    pub fn new() -> Self {
        Self {
            spec: Spec {
                openapi: Some(OUTPUT_OPENAPI_VERSION.to_owned()),
                info: Info {
                    title: "Generated API".to_owned(),
                    version: "1.0.0".to_owned(),
                    ..Info::default()
                },
                paths: Some(IndexMap::new()),
                ..Spec::default()
            },
        }
    }

    /// Inserts a built operation under its `(route, verb)` slot.
    ///
    /// Duplicate slots are an error; the cores do not merge silently.
    pub fn insert(&mut self, built: BuiltOperation) -> Result<(), ExtractError> {
        let duplicate = || ExtractError::DuplicateOperation {
            route: built.route.clone(),
            method: built.raw_method.clone(),
        };

        let map = if built.is_webhook {
            self.spec.webhooks.get_or_insert_with(IndexMap::new)
        } else {
            self.spec.paths.get_or_insert_with(IndexMap::new)
        };

        let item = map.entry(built.route.clone()).or_default();

        match built.method {
            Some(method) => {
                let slot = item.operation_mut(method);
                if slot.is_some() {
                    return Err(duplicate());
                }
                *slot = Some(built.operation);
            }
            None => {
                if item.additional_operations.contains_key(&built.raw_method) {
                    return Err(duplicate());
                }
                item.additional_operations
                    .insert(built.raw_method, built.operation);
            }
        }

        Ok(())
    }

    /// Applies document-level directives: info, contact, license, servers, security schemes,
    /// and tag metadata.
    ///
    /// Safe to call once per doc block; repeated values overwrite or merge by key.
    pub fn apply_document_directives(&mut self, doc: &DocMetadata) {
        let info = &mut self.spec.info;
        if let Some(title) = &doc.info.title {
            info.title = title.clone();
        }
        if let Some(version) = &doc.info.version {
            info.version = version.clone();
        }
        if let Some(summary) = &doc.info.summary {
            info.summary = Some(summary.clone());
        }
        if let Some(description) = &doc.info.description {
            info.description = Some(description.clone());
        }
        if let Some(terms) = &doc.info.terms_of_service {
            match terms.parse() {
                Ok(url) => info.terms_of_service = Some(url),
                Err(_) => warn!("ignoring unparseable termsOfService `{terms}`"),
            }
        }

        if !doc.contact.is_empty() {
            let contact = info.contact.get_or_insert_with(Contact::default);
            for (key, value) in &doc.contact {
                match (key.as_str(), value) {
                    ("name", Some(value)) => contact.name = Some(value.clone()),
                    ("url", Some(value)) => match value.parse() {
                        Ok(url) => contact.url = Some(url),
                        Err(_) => warn!("ignoring unparseable contact url `{value}`"),
                    },
                    ("email", Some(value)) => contact.email = Some(value.clone()),
                    _ => debug!("ignoring contact attribute `{key}`"),
                }
            }
        }

        if !doc.license.is_empty() {
            let license = info.license.get_or_insert_with(License::default);
            for (key, value) in &doc.license {
                match (key.as_str(), value) {
                    ("name", Some(value)) => license.name = value.clone(),
                    ("identifier", Some(value)) => license.identifier = Some(value.clone()),
                    ("url", Some(value)) => match value.parse() {
                        Ok(url) => license.url = Some(url),
                        Err(_) => warn!("ignoring unparseable license url `{value}`"),
                    },
                    _ => debug!("ignoring license attribute `{key}`"),
                }
            }
        }

        for doc_server in &doc.servers {
            if self
                .spec
                .servers
                .iter()
                .any(|server| server.url == doc_server.url)
            {
                continue;
            }

            let mut variables = IndexMap::new();
            for var in &doc_server.variables {
                variables.insert(
                    var.name.clone(),
                    ServerVariable {
                        default: var.default.clone(),
                        substitutions_enum: var.enum_values.clone(),
                        description: var.description.clone(),
                        extensions: IndexMap::new(),
                    },
                );
            }

            self.spec.servers.push(Server {
                url: doc_server.url.clone(),
                name: doc_server.name.clone(),
                description: doc_server.description.clone(),
                variables,
                extensions: IndexMap::new(),
            });
        }

        for scheme in &doc.security_schemes {
            match build_security_scheme(&scheme.attrs, &scheme.description) {
                Some(built) => {
                    self.spec
                        .components
                        .get_or_insert_with(Components::default)
                        .security_schemes
                        .insert(scheme.name.clone(), ObjectOrReference::Object(built));
                }
                None => warn!("dropping malformed securityScheme `{}`", scheme.name),
            }
        }

        for tag_meta in &doc.tag_meta {
            let idx = match self
                .spec
                .tags
                .iter()
                .position(|tag| tag.name == tag_meta.name)
            {
                Some(idx) => idx,
                None => {
                    self.spec.tags.push(Tag {
                        name: tag_meta.name.clone(),
                        ..Tag::default()
                    });
                    self.spec.tags.len() - 1
                }
            };
            let tag = &mut self.spec.tags[idx];

            for (key, value) in &tag_meta.attrs {
                match (key.as_str(), value) {
                    ("description", Some(value)) => tag.description = Some(value.clone()),
                    ("summary", Some(value)) => tag.summary = Some(value.clone()),
                    ("parent", Some(value)) => tag.parent = Some(value.clone()),
                    ("kind", Some(value)) => tag.kind = Some(value.clone()),
                    _ => debug!("ignoring tagMeta attribute `{key}`"),
                }
            }
        }
    }

    /// Copies the registry's named schemas into the spec's components.
    pub fn register_schemas(&mut self, registry: &SchemaRegistry) {
        let schemas = registry.components();
        if schemas.is_empty() {
            return;
        }

        self.spec
            .components
            .get_or_insert_with(Components::default)
            .schemas
            .extend(schemas);
    }

    /// Finishes aggregation, yielding the assembled spec.
    pub fn into_spec(self) -> Spec {
        self.spec
    }
}

/// Builds a security scheme from `@securityScheme` attributes; `None` for shapes the scheme
/// type does not accept.
fn build_security_scheme(attrs: &[Attr], description: &str) -> Option<SecurityScheme> {
    let get = |name: &str| {
        attrs
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.clone())
    };

    let description = (!description.is_empty()).then(|| description.to_owned());

    match get("type")?.as_str() {
        "apiKey" => Some(SecurityScheme::ApiKey {
            name: get("name")?,
            location: get("in")?,
            description,
        }),

        "http" => Some(SecurityScheme::Http {
            scheme: get("scheme")?,
            bearer_format: get("bearerFormat"),
            description,
        }),

        "mutualTLS" => Some(SecurityScheme::MutualTls { description }),

        "oauth2" => {
            let scopes = get("scopes")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|scope| !scope.is_empty())
                        .map(|scope| (scope.to_owned(), String::new()))
                        .collect()
                })
                .unwrap_or_default();

            let mut flows = Flows::default();
            match get("flow").as_deref() {
                Some("implicit") => {
                    flows.implicit = Some(crate::spec::ImplicitFlow {
                        authorization_url: get("authorizationUrl")?.parse().ok()?,
                        refresh_url: None,
                        scopes,
                    });
                }
                Some("password") => {
                    flows.password = Some(crate::spec::PasswordFlow {
                        token_url: get("tokenUrl")?.parse().ok()?,
                        refresh_url: None,
                        scopes,
                    });
                }
                Some("clientCredentials") => {
                    flows.client_credentials = Some(crate::spec::ClientCredentialsFlow {
                        token_url: get("tokenUrl")?.parse().ok()?,
                        refresh_url: None,
                        scopes,
                    });
                }
                _ => {
                    flows.authorization_code = Some(crate::spec::AuthorizationCodeFlow {
                        authorization_url: get("authorizationUrl")?.parse().ok()?,
                        token_url: get("tokenUrl")?.parse().ok()?,
                        refresh_url: None,
                        scopes,
                    });
                }
            }

            Some(SecurityScheme::OAuth2 { flows, description })
        }

        "openIdConnect" => Some(SecurityScheme::OpenIdConnect {
            open_id_connect_url: get("openIdConnectUrl")?.parse().ok()?,
            description,
        }),

        other => {
            warn!("unknown securityScheme type `{other}`");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extract::builder::BuiltOperation;
    use crate::spec::{Method, Operation};

    fn built(route: &str, method: Option<Method>, raw: &str) -> BuiltOperation {
        BuiltOperation {
            route: route.to_owned(),
            raw_method: raw.to_owned(),
            method,
            is_webhook: false,
            operation: Operation::default(),
        }
    }

    #[test]
    fn inserts_under_verb_slots() {
        let mut agg = Aggregator::new();
        agg.insert(built("/pets", Some(Method::Get), "GET")).unwrap();
        agg.insert(built("/pets", Some(Method::Post), "POST"))
            .unwrap();

        let spec = agg.into_spec();
        let item = &spec.paths.as_ref().unwrap()["/pets"];
        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[test]
    fn duplicate_slot_is_a_conflict() {
        let mut agg = Aggregator::new();
        agg.insert(built("/pets", Some(Method::Get), "GET")).unwrap();

        let err = agg
            .insert(built("/pets", Some(Method::Get), "GET"))
            .unwrap_err();
        assert_matches!(err, ExtractError::DuplicateOperation { .. });
    }

    #[test]
    fn custom_methods_land_in_additional_operations() {
        let mut agg = Aggregator::new();
        agg.insert(built("/cache", None, "PURGE")).unwrap();

        let err = agg.insert(built("/cache", None, "PURGE")).unwrap_err();
        assert_matches!(err, ExtractError::DuplicateOperation { .. });

        let spec = agg.into_spec();
        let item = &spec.paths.as_ref().unwrap()["/cache"];
        assert!(item.additional_operations.contains_key("PURGE"));
    }

    #[test]
    fn webhooks_aggregate_separately() {
        let mut agg = Aggregator::new();

        let mut hook = built("/new-pet", Some(Method::Post), "POST");
        hook.is_webhook = true;
        agg.insert(hook).unwrap();

        let spec = agg.into_spec();
        assert!(spec.webhooks.as_ref().unwrap().contains_key("/new-pet"));
        assert!(spec.paths.as_ref().unwrap().is_empty());
    }

    #[test]
    fn document_directives_shape_the_spec_shell() {
        let mut agg = Aggregator::new();

        let doc = crate::extract::doc::DocMetadata::parse(
            "/**\n * @infoTitle Pet API\n * @infoVersion 2.0.0\n * @license [name:MIT]\n * @server https://api.example.com [name=prod]\n * @tagMeta pets [description:Pet operations]\n */",
        );
        agg.apply_document_directives(&doc);
        // Applying the same block twice must not duplicate servers or tags.
        agg.apply_document_directives(&doc);

        let spec = agg.into_spec();
        assert_eq!(spec.info.title, "Pet API");
        assert_eq!(spec.info.version, "2.0.0");
        assert_eq!(spec.info.license.as_ref().unwrap().name, "MIT");
        assert_eq!(spec.servers.len(), 1);
        assert_eq!(spec.tags.len(), 1);
        assert_eq!(
            spec.tags[0].description.as_deref(),
            Some("Pet operations")
        );
    }
}
