//! Document loading: a top-down pass from the JSON root to a validated, resolved [`Spec`].
//!
//! The pass order is fixed: document-kind detection, `openapi` version gate, structural
//! deserialization, base URI computation and registry duplicate check, structural rules,
//! eager reference inlining, and inline schema promotion. Components load before paths as a
//! consequence of deserialization, so references under `paths` always resolve eagerly.

use log::debug;
use url::Url;

mod error;
mod inline;
mod promote;
mod registry;
mod structure;
pub mod uri;

pub use self::error::LoadError;
pub use self::registry::DocRegistry;

use crate::location::Location;
use crate::spec::{Spec, SUPPORTED_VERSION_PREFIXES};

/// Keys whose presence at the root marks a document as an OpenAPI description rather than a
/// bare JSON Schema.
const ROOT_MARKER_KEYS: [&str; 9] = [
    "openapi",
    "swagger",
    "info",
    "paths",
    "components",
    "webhooks",
    "servers",
    "security",
    "tags",
];

/// Caller-provided context for a document load.
#[derive(Debug, Default)]
pub struct LoadOptions<'reg> {
    /// Registry consulted for cross-document references.
    ///
    /// The loaded spec is not inserted; publish it afterwards (or use
    /// [`DocRegistry::load_and_publish`]).
    pub registry: Option<&'reg DocRegistry>,

    /// URI the document was retrieved from; seeds the document base URI.
    pub retrieval_uri: Option<Url>,
}

/// Loads a parsed JSON document tree into a fully resolved [`Spec`].
///
/// Boolean roots and objects bearing none of the OpenAPI root keys are classified as schema
/// documents: the raw root is stored and no other processing happens. Everything else must
/// carry a supported `openapi` version and pass every structural rule; any failure discards
/// the partially built spec.
pub fn load_document(
    root: serde_json::Value,
    options: LoadOptions<'_>,
) -> Result<Spec, LoadError> {
    if is_schema_document(&root) {
        debug!("root has no OpenAPI marker keys; loading as schema document");

        return Ok(Spec {
            schema_root: Some(root),
            document_uri: options
                .retrieval_uri
                .as_ref()
                .map(uri::base_of),
            retrieval_uri: options.retrieval_uri,
            ..Spec::default()
        });
    }

    let version = root
        .get("openapi")
        .and_then(|version| version.as_str())
        .ok_or(LoadError::MissingField(Location::root(), "openapi"))?;

    if !SUPPORTED_VERSION_PREFIXES
        .iter()
        .any(|prefix| version.starts_with(prefix))
    {
        return Err(LoadError::UnsupportedVersion(version.to_owned()));
    }

    let mut spec: Spec = serde_json::from_value(root)?;

    spec.document_uri = uri::document_base(options.retrieval_uri.as_ref(), spec.self_uri.as_deref());
    spec.retrieval_uri = options.retrieval_uri;

    if let (Some(base), Some(registry)) = (&spec.document_uri, options.registry) {
        if registry.contains(base) {
            return Err(LoadError::DuplicateBaseUri(base.clone()));
        }
    }

    structure::check(&spec)?;
    inline::inline_references(&mut spec, options.registry)?;
    promote::promote_inline_schemas(&mut spec);

    Ok(spec)
}

fn is_schema_document(root: &serde_json::Value) -> bool {
    match root {
        serde_json::Value::Bool(_) => true,
        serde_json::Value::Object(map) => {
            !ROOT_MARKER_KEYS.iter().any(|key| map.contains_key(*key))
        }
        _ => false,
    }
}
