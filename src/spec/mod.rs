//! Structures used in parsing and navigating OpenAPI specifications.
//!
//! High-level structures include [`Spec`], [`Components`] & [`Schema`].

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

mod callback;
mod components;
mod contact;
mod discriminator;
mod encoding;
mod error;
mod example;
mod external_doc;
mod flows;
mod header;
mod info;
mod license;
mod link;
mod media_type;
mod operation;
mod parameter;
mod path_item;
mod r#ref;
mod request_body;
mod response;
mod schema;
mod security_requirement;
mod security_scheme;
mod server;
mod spec_extensions;
mod tag;
mod xml;

pub use self::{
    callback::*,
    components::*,
    contact::*,
    discriminator::*,
    encoding::*,
    error::Error,
    example::*,
    external_doc::*,
    flows::*,
    header::*,
    info::*,
    license::*,
    link::*,
    media_type::*,
    operation::*,
    parameter::*,
    path_item::*,
    r#ref::*,
    request_body::*,
    response::*,
    schema::{ObjectSchema, Schema, SchemaError, SchemaType},
    security_requirement::*,
    security_scheme::*,
    server::*,
    tag::*,
    xml::*,
};

/// OpenAPI specification version prefixes this crate understands.
pub const SUPPORTED_VERSION_PREFIXES: [&str; 2] = ["3.1.", "3.2."];

/// A complete OpenAPI description, or the shell around a bare JSON Schema document.
///
/// Top-level serialization order follows the field order here: `openapi`, `$self`,
/// `jsonSchemaDialect`, `info`, `externalDocs`, `servers`, `security`, `tags`, `paths`,
/// `webhooks`, `components`, and `x-` extensions last.
///
/// See <https://spec.openapis.org/oas/v3.2.0#openapi-object>.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Spec {
    /// The [OpenAPI Specification version](https://spec.openapis.org/oas/v3.2.0#versions) this
    /// document uses, e.g. `3.1.0`.
    ///
    /// Absent for documents that hold a bare JSON Schema (see
    /// [`is_schema_document`](Self::is_schema_document)). This is not related to the API
    /// [`info.version`](Info::version) string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    /// The URI of this document, from the `$self` field.
    ///
    /// Relative references within the document, including `$ref` sources, resolve against it.
    #[serde(rename = "$self", skip_serializing_if = "Option::is_none")]
    pub self_uri: Option<String>,

    /// The default value for the `$schema` keyword within Schema Objects contained in this
    /// document.
    #[serde(rename = "jsonSchemaDialect", skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<Url>,

    /// Provides metadata about the API. The metadata MAY be used by tooling as required.
    #[serde(default, skip_serializing_if = "is_default_info")]
    pub info: Info,

    /// Additional external documentation.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDoc>,

    /// An array of Server Objects, which provide connectivity information to a target server.
    ///
    /// If the `servers` field is not provided, or is an empty array, the default value would be
    /// a Server Object with a url value of `/`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// A declaration of which security mechanisms can be used across the API.
    ///
    /// Only one of the Security Requirement Objects need to be satisfied to authorize a
    /// request. An absent list and an explicitly empty list are distinct.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    /// A list of tags used by the specification with additional metadata.
    ///
    /// The order of the tags can be used to reflect on their order by the parsing tools. Each
    /// tag name in the list MUST be unique.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Holds the relative paths to the individual endpoints and their operations.
    ///
    /// The path is appended to the URL from the Server Object in order to construct the full
    /// URL. Declaration order is preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, PathItem>>,

    /// The incoming webhooks that MAY be received as part of this API.
    ///
    /// The key name is a unique string to refer to each webhook; unlike `paths` keys it need
    /// not begin with `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<IndexMap<String, PathItem>>,

    /// An element to hold various reusable objects for the specification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,

    /// Raw root of a bare JSON Schema document.
    ///
    /// Populated instead of the fields above when the loader classifies the document as a
    /// schema document.
    #[serde(skip)]
    pub schema_root: Option<serde_json::Value>,

    /// The URI this document was retrieved from, supplied by the caller at load time.
    #[serde(skip)]
    pub retrieval_uri: Option<Url>,

    /// Base URI of this document: `base_of(resolve($self, retrieval_uri))`.
    ///
    /// Registry key for cross-document reference resolution.
    #[serde(skip)]
    pub document_uri: Option<Url>,
}

fn is_default_info(info: &Info) -> bool {
    *info == Info::default()
}

impl Spec {
    /// True when this document holds a bare JSON Schema rather than an OpenAPI description.
    pub fn is_schema_document(&self) -> bool {
        self.openapi.is_none() && self.schema_root.is_some()
    }

    /// Validates the `openapi` version field against the supported 3.x series.
    pub fn validate_version(&self) -> Result<semver::Version, Error> {
        let spec_version = self.openapi.as_deref().unwrap_or_default();
        let sem_ver = semver::Version::parse(spec_version)?;

        if SUPPORTED_VERSION_PREFIXES
            .iter()
            .any(|prefix| spec_version.starts_with(prefix))
        {
            Ok(sem_ver)
        } else {
            Err(Error::UnsupportedSpecFileVersion(sem_ver))
        }
    }

    /// Returns a reference to the operation with given `operation_id`, or `None` if not found.
    pub fn operation_by_id(&self, operation_id: &str) -> Option<&Operation> {
        self.operations()
            .find(|(_, _, op)| {
                op.operation_id
                    .as_deref()
                    .is_some_and(|id| id == operation_id)
            })
            .map(|(_, _, op)| op)
    }

    /// Returns a reference to the operation with given `method` and `path`, or `None` if not
    /// found.
    ///
    /// Custom methods are looked up in the path item's `additionalOperations`.
    pub fn operation(&self, method: &http::Method, path: &str) -> Option<&Operation> {
        let resource = self.paths.as_ref()?.get(path)?;

        match method.as_str().parse::<Method>() {
            Ok(method) => resource.operation(method),
            Err(_) => resource.additional_operations.get(method.as_str()),
        }
    }

    /// Returns an iterator over all `(route, method, operation)` triples under `paths`.
    pub fn operations(&self) -> impl Iterator<Item = (String, Method, &Operation)> {
        let paths = &self.paths;

        debug!(
            "num paths: {}",
            paths.as_ref().map_or(0, |paths| paths.len())
        );

        let ops = paths
            .iter()
            .flatten()
            .flat_map(|(route, item)| {
                item.methods()
                    .map(move |(method, op)| (route.clone(), method, op))
            })
            .collect::<Vec<_>>();

        debug!("num ops: {}", ops.len());

        ops.into_iter()
    }

    /// Returns an iterator over all `(name, method, operation)` triples under `webhooks`.
    pub fn webhook_operations(&self) -> impl Iterator<Item = (String, Method, &Operation)> {
        self.webhooks
            .iter()
            .flatten()
            .flat_map(|(name, item)| {
                item.methods()
                    .map(move |(method, op)| (name.clone(), method, op))
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Returns a reference to the primary (first) server definition.
    pub fn primary_server(&self) -> Option<&Server> {
        self.servers.first()
    }

    /// Looks up a component schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.components
            .as_ref()
            .and_then(|components| components.schemas.get(name))
    }
}
