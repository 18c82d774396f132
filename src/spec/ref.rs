use std::str::FromStr;

use derive_more::derive::{Display, Error};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Spec;

static COMPONENT_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^(?P<source>[^#]*)#/components/(?P<kind>[^/]+)/(?P<name>[^/]+)$").unwrap()
});

/// Reference resolution errors.
#[derive(Clone, Debug, PartialEq, Display, Error)]
pub enum RefError {
    /// Component kind segment is not one of the reserved component map names.
    #[display("Invalid component kind: {_0}")]
    InvalidKind(#[error(not(source))] String),

    /// A reference of one component kind was used where another kind was expected.
    #[display("Mismatched reference kind: cannot use a {_0} reference as a {_1}")]
    MismatchedKind(RefType, RefType),

    /// The reference does not use the `#/components/<kind>/<name>` shape.
    #[display("Not a component reference: {_0}")]
    NotAComponentRef(#[error(not(source))] String),

    /// The reference points at a component that is not defined.
    #[display("Unresolvable reference: {_0}")]
    Unresolvable(#[error(not(source))] String),

    /// The reference names a document that is not present in the registry.
    #[display("Reference targets an unregistered document: {_0}")]
    UnregisteredDocument(#[error(not(source))] String),
}

/// Component kinds a reference may target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum RefType {
    /// Of form: `#/components/schemas/*`.
    Schema,

    /// Of form: `#/components/parameters/*`.
    Parameter,

    /// Of form: `#/components/responses/*`.
    Response,

    /// Of form: `#/components/headers/*`.
    Header,

    /// Of form: `#/components/requestBodies/*`.
    RequestBody,

    /// Of form: `#/components/mediaTypes/*`.
    MediaType,

    /// Of form: `#/components/examples/*`.
    Example,

    /// Of form: `#/components/links/*`.
    Link,

    /// Of form: `#/components/callbacks/*`.
    Callback,

    /// Of form: `#/components/pathItems/*`.
    PathItem,

    /// Of form: `#/components/securitySchemes/*`.
    SecurityScheme,
}

impl FromStr for RefType {
    type Err = RefError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        Ok(match kind {
            "schemas" => Self::Schema,
            "parameters" => Self::Parameter,
            "responses" => Self::Response,
            "headers" => Self::Header,
            "requestBodies" => Self::RequestBody,
            "mediaTypes" => Self::MediaType,
            "examples" => Self::Example,
            "links" => Self::Link,
            "callbacks" => Self::Callback,
            "pathItems" => Self::PathItem,
            "securitySchemes" => Self::SecurityScheme,
            kind => return Err(RefError::InvalidKind(kind.to_owned())),
        })
    }
}

/// Parsed component reference.
///
/// The component name is always the final path segment; nested JSON Pointer paths are not
/// followed for component lookups. The `source` part (before `#`) is a URI reference, empty
/// for fragment-only references.
#[derive(Clone, Debug, PartialEq)]
pub struct Ref {
    /// Document part of the reference, before the `#`.
    pub source: String,

    /// Component kind the fragment points into.
    pub kind: RefType,

    /// Component name, JSON Pointer unescaped.
    pub name: String,

    /// True when the reference was written as `$dynamicRef`.
    pub is_dynamic: bool,
}

impl Ref {
    /// Parses a `$dynamicRef` target, recording the dynamic flag.
    pub fn parse_dynamic(path: &str) -> Result<Self, RefError> {
        let mut parsed = path.parse::<Self>()?;
        parsed.is_dynamic = true;
        Ok(parsed)
    }
}

impl FromStr for Ref {
    type Err = RefError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let parts = COMPONENT_REF
            .captures(path)
            .ok_or_else(|| RefError::NotAComponentRef(path.to_owned()))?;

        log::trace!("creating Ref: {}/{}", &parts["kind"], &parts["name"]);

        Ok(Self {
            source: parts["source"].to_owned(),
            kind: parts["kind"].parse()?,
            name: unescape_json_pointer(&parts["name"]),
            is_dynamic: false,
        })
    }
}

/// Reverses JSON Pointer escaping in a single reference token (`~1` → `/`, then `~0` → `~`).
pub fn unescape_json_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Container for a referenceable object position: either the object itself or a `$ref`.
///
/// After a successful load, references encountered under paths/webhooks carry a deep copy of
/// their target in `resolved`; the `$ref` text is retained so documents round-trip.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub enum ObjectOrReference<T> {
    /// A `$ref` to a component, with the optional sibling fields references allow.
    Ref {
        /// Reference target.
        #[serde(rename = "$ref")]
        ref_path: String,

        /// Short summary, overriding the target's.
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<String>,

        /// Description, overriding the target's.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,

        /// Eagerly inlined copy of the target, populated by the loader.
        #[serde(skip)]
        resolved: Option<Box<T>>,
    },

    /// An inline object.
    Object(T),
}

impl<T> ObjectOrReference<T> {
    /// Returns the `$ref` path, if this position holds a reference.
    pub fn ref_path(&self) -> Option<&str> {
        match self {
            Self::Ref { ref_path, .. } => Some(ref_path),
            Self::Object(_) => None,
        }
    }

    /// Returns the inline object or the inlined copy of the reference target, if present.
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Ref { resolved, .. } => resolved.as_deref(),
        }
    }

    /// Stores the eagerly resolved copy of a reference target.
    ///
    /// No-op for inline objects.
    pub fn set_resolved(&mut self, obj: T) {
        if let Self::Ref { resolved, .. } = self {
            *resolved = Some(Box::new(obj));
        }
    }
}

impl<T> ObjectOrReference<T>
where
    T: FromRef,
{
    /// Resolves this position to an owned object.
    ///
    /// Inline objects and already-inlined references are cloned; bare references are looked up
    /// in the spec's components.
    pub fn resolve(&self, spec: &Spec) -> Result<T, RefError> {
        match self {
            Self::Object(component) => Ok(component.clone()),
            Self::Ref {
                resolved: Some(component),
                ..
            } => Ok((**component).clone()),
            Self::Ref { ref_path, .. } => T::from_ref(spec, ref_path),
        }
    }
}

/// Lookup of a component object from a reference path, implemented per component kind.
pub trait FromRef: Clone {
    /// Resolves `path` within `spec`'s components.
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError>;
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_component_ref() {
        let parsed = "#/components/schemas/Pet".parse::<Ref>().unwrap();
        assert_eq!(parsed.kind, RefType::Schema);
        assert_eq!(parsed.name, "Pet");
        assert_eq!(parsed.source, "");
        assert!(!parsed.is_dynamic);
    }

    #[test]
    fn parses_cross_document_ref() {
        let parsed = "https://example.com/api.json#/components/responses/NotFound"
            .parse::<Ref>()
            .unwrap();
        assert_eq!(parsed.source, "https://example.com/api.json");
        assert_eq!(parsed.kind, RefType::Response);
        assert_eq!(parsed.name, "NotFound");
    }

    #[test]
    fn unescapes_pointer_tokens() {
        let parsed = "#/components/schemas/a~1b~0c".parse::<Ref>().unwrap();
        assert_eq!(parsed.name, "a/b~c");
    }

    #[test]
    fn rejects_nested_pointer_paths() {
        assert_matches!(
            "#/components/schemas/Pet/properties/name".parse::<Ref>(),
            Err(RefError::NotAComponentRef(_))
        );
    }

    #[test]
    fn rejects_non_component_refs() {
        assert_matches!(
            "#/paths/~1pets".parse::<Ref>(),
            Err(RefError::NotAComponentRef(_))
        );
        assert_matches!(
            "#/components/widgets/Pet".parse::<Ref>(),
            Err(RefError::InvalidKind(_))
        );
    }
}
