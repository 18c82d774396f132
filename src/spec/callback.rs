use std::error::Error as StdError;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FromRef, PathItem, Ref, RefError, RefType, Spec};

/// Map of possible out-of-band callbacks related to the parent operation.
///
/// Each value in the map is a [Path Item Object] that describes a set of requests that may be
/// initiated by the API provider and the expected responses.
///
/// NB: this structure is flattened when serializing and unflattened when deserializing in order
/// to support spec extensions. I.e., `paths` is a synthetic property within the data tree that
/// comprises an OpenAPI document.
///
/// See <https://spec.openapis.org/oas/v3.1.1#callback-object>.
///
/// [Path Item Object]: https://spec.openapis.org/oas/v3.1.1#path-item-object
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "CallbackSerde", into = "CallbackSerde")]
pub struct Callback {
    /// Map of [Path Item Object]s that describe a set of requests that may be initiated by the
    /// API provider and the expected responses.
    ///
    /// The key value used to identify the [Path Item Object] is an expression, evaluated at
    /// runtime, that identifies a URL to use for the callback operation.
    ///
    /// [Path Item Object]: https://spec.openapis.org/oas/v3.1.1#path-item-object
    pub paths: IndexMap<String, PathItem>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    pub extensions: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
struct CallbackSerde(IndexMap<String, serde_json::Value>);

impl TryFrom<CallbackSerde> for Callback {
    type Error = Box<dyn StdError>;

    fn try_from(CallbackSerde(map): CallbackSerde) -> Result<Self, Self::Error> {
        let mut paths = IndexMap::new();
        let mut extensions = IndexMap::new();

        for (key, value) in map {
            if let Some(ext_key) = key.strip_prefix("x-") {
                extensions.insert(ext_key.to_owned(), value);
            } else {
                paths.insert(key, serde_json::from_value(value)?);
            }
        }

        Ok(Self { paths, extensions })
    }
}

impl From<Callback> for CallbackSerde {
    fn from(val: Callback) -> Self {
        let Callback { paths, extensions } = val;

        CallbackSerde(
            paths
                .into_iter()
                .map(|(key, val)| {
                    (
                        key,
                        serde_json::to_value(val).expect("path item serialization should not fail"),
                    )
                })
                .chain(
                    extensions
                        .into_iter()
                        .map(|(key, val)| (format!("x-{key}"), val)),
                )
                .collect(),
        )
    }
}

impl FromRef for Callback {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::Callback => spec
                .components
                .as_ref()
                .and_then(|cs| cs.callbacks.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            _ => Err(RefError::MismatchedKind(refpath.kind, RefType::Callback)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_splits_extensions_from_expressions() {
        let callback: Callback = serde_json::from_str(
            r#"{
                "{$request.body#/callbackUrl}": {
                    "post": { "responses": { "200": { "description": "ok" } } }
                },
                "x-note": "demo"
            }"#,
        )
        .unwrap();

        assert_eq!(callback.paths.len(), 1);
        assert!(callback.paths.contains_key("{$request.body#/callbackUrl}"));
        assert_eq!(callback.extensions.get("note").unwrap(), "demo");

        let value = serde_json::to_value(&callback).unwrap();
        assert!(value.get("{$request.body#/callbackUrl}").is_some());
        assert_eq!(value.get("x-note").unwrap(), "demo");
    }
}
