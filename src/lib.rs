//! Extraction of OpenAPI v3.1/v3.2 descriptions from annotated C sources, and the
//! symmetric loading, resolution, and validation of OpenAPI documents.
//!
//! Two cores share one data model ([`spec`]):
//!
//! - [`extract`] walks C source buffers, parses doc-comment annotations and function
//!   signatures, and aggregates normalized operations into a [`Spec`].
//! - [`loader`] takes a parsed JSON document tree and produces a validated, fully resolved
//!   [`Spec`], with cross-document `$ref` resolution through a [`loader::DocRegistry`],
//!   eager component inlining, and inline schema promotion. [`validation`] runs the
//!   cross-cutting semantic checks afterwards.
//!
//! # Example
//!
//! ```no_run
//! let json = std::fs::read_to_string("path/to/openapi.json").unwrap();
//!
//! match c2openapi::from_json(&json) {
//!     Ok(spec) => println!("loaded {} paths", spec.paths.as_ref().map_or(0, |p| p.len())),
//!     Err(err) => println!("error: {err}"),
//! }
//! ```

#![warn(missing_docs)]

pub mod extract;
pub mod loader;
pub mod location;
pub mod spec;
pub mod validation;

mod error;

pub use self::error::{Error, ErrorKind};
pub use self::spec::Spec;

use loader::LoadOptions;

/// Loads an OpenAPI spec (JSON-format) from a string.
pub fn from_json(json: impl AsRef<str>) -> Result<Spec, Error> {
    let root: serde_json::Value = serde_json::from_str(json.as_ref())?;
    loader::load_document(root, LoadOptions::default()).map_err(Error::Load)
}

/// Loads an OpenAPI spec (JSON-format) from a [`Read`](std::io::Read) type.
pub fn from_reader(read: impl std::io::Read) -> Result<Spec, Error> {
    let root: serde_json::Value = serde_json::from_reader(read)?;
    loader::load_document(root, LoadOptions::default()).map_err(Error::Load)
}

/// Loads an OpenAPI spec from a file, giving the path.
pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Spec, Error> {
    let file = std::fs::File::open(path.as_ref())?;
    from_reader(std::io::BufReader::new(file))
}

/// Loads an OpenAPI spec (YAML-format) from a string.
#[cfg(feature = "yaml-spec")]
pub fn from_yaml(yaml: impl AsRef<str>) -> Result<Spec, Error> {
    let root: serde_json::Value = serde_yml::from_str(yaml.as_ref())?;
    loader::load_document(root, LoadOptions::default()).map_err(Error::Load)
}

/// Serializes a spec to its JSON document tree.
///
/// Schema documents serialize back to their raw schema root.
pub fn to_json_value(spec: &Spec) -> Result<serde_json::Value, Error> {
    if let Some(root) = &spec.schema_root {
        return Ok(root.clone());
    }

    Ok(serde_json::to_value(spec)?)
}

/// Serializes a spec to a pretty-printed JSON string.
pub fn to_json(spec: &Spec) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(&to_json_value(spec)?)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn json_round_trip_is_stable() {
        let json = r#"{
            "openapi": "3.1.0",
            "info": { "title": "Test API", "version": "0.1" },
            "paths": {},
            "components": {
                "schemas": {
                    "assets": {
                        "title": "Assets",
                        "type": "array",
                        "items": { "type": "integer" }
                    }
                }
            }
        }"#;

        let spec = from_json(json).unwrap();
        let reloaded = from_json(&to_json(&spec).unwrap()).unwrap();

        assert_eq!(spec, reloaded);
    }
}
