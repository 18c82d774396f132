use std::collections::BTreeMap;

use url::Url;

use super::{LoadError, LoadOptions};
use crate::Spec;

/// Mapping from document base URI to the spec that owns it.
///
/// Used across multi-document loads to resolve cross-document `$ref`s. The registry is
/// append-only: an entry becomes visible only once its spec has successfully completed its
/// load, and insertion happens exactly once per spec. There is no interior synchronization;
/// loads sharing a registry must not run concurrently.
#[derive(Debug, Default)]
pub struct DocRegistry {
    specs: BTreeMap<String, Spec>,
}

impl DocRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the spec registered under the given base URI.
    pub fn get(&self, base: &Url) -> Option<&Spec> {
        self.specs.get(base.as_str())
    }

    /// True when a spec is registered under the given base URI.
    pub fn contains(&self, base: &Url) -> bool {
        self.specs.contains_key(base.as_str())
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when no documents are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Publishes a successfully loaded spec under its document URI.
    ///
    /// Specs without a document URI (no `$self` and no retrieval URI) cannot take part in
    /// cross-document resolution and are rejected.
    pub fn publish(&mut self, spec: Spec) -> Result<&Spec, LoadError> {
        let Some(base) = spec.document_uri.clone() else {
            return Err(LoadError::UnregisteredDocument(
                Default::default(),
                "spec has no document URI".to_owned(),
            ));
        };

        if self.specs.contains_key(base.as_str()) {
            return Err(LoadError::DuplicateBaseUri(base));
        }

        Ok(self
            .specs
            .entry(base.as_str().to_owned())
            .or_insert(spec))
    }

    /// Loads a document and publishes it in one step.
    ///
    /// References into documents already present in the registry resolve during the load; the
    /// new document becomes visible to later loads only after it completes successfully.
    pub fn load_and_publish(
        &mut self,
        root: serde_json::Value,
        retrieval_uri: Option<Url>,
    ) -> Result<&Spec, LoadError> {
        let spec = super::load_document(
            root,
            LoadOptions {
                registry: Some(self),
                retrieval_uri,
            },
        )?;

        self.publish(spec)
    }
}
