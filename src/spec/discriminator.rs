use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Signals which alternative of a polymorphic schema (`oneOf`/`anyOf`) a payload instance
/// uses, keyed off the value of a named property.
///
/// A property value with no `mapping` entry falls back to `defaultMapping` when present, and
/// otherwise names a component schema directly.
///
/// See <https://spec.openapis.org/oas/v3.2.0#discriminator-object>.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The name of the property in the payload that holds the discriminating value.
    pub property_name: String,

    /// Mappings from payload values to schema names or references.
    ///
    /// When using the discriminator, inline schemas will not be considered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,

    /// Schema name or reference used for payload values that match no `mapping` entry, in
    /// place of the implicit name lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mapping: Option<String>,
}

impl Discriminator {
    /// Resolves a discriminating property value to its schema name or reference.
    ///
    /// Falls back to `defaultMapping`, then to the value itself as an implicit component
    /// schema name.
    pub fn target_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .or(self.default_mapping.as_deref())
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn discriminated_schemas_load_with_annotated_alternatives() {
        let spec = crate::from_json(
            r##"{
                "openapi": "3.1.0",
                "info": { "title": "t", "version": "1" },
                "components": {
                    "schemas": {
                        "Cat": { "type": "object" },
                        "Dog": { "type": "object" },
                        "Pet": {
                            "oneOf": [
                                { "$ref": "#/components/schemas/Cat" },
                                { "$ref": "#/components/schemas/Dog" }
                            ],
                            "discriminator": {
                                "propertyName": "petType",
                                "mapping": { "kitten": "#/components/schemas/Cat" }
                            }
                        }
                    }
                }
            }"##,
        )
        .unwrap();

        let pet = spec.schema("Pet").unwrap().object().unwrap();

        let discriminator = pet.discriminator.as_ref().unwrap();
        assert_eq!(discriminator.property_name, "petType");
        assert_eq!(
            discriminator.target_for("kitten"),
            "#/components/schemas/Cat"
        );
        assert_eq!(discriminator.target_for("Dog"), "Dog");

        // The alternatives the mapping points at resolve by name like any other reference.
        let names = pet
            .one_of
            .iter()
            .filter_map(|schema| schema.ref_name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Cat", "Dog"]);
    }

    #[test]
    fn default_mapping_round_trips() {
        let discriminator = Discriminator {
            property_name: "kind".to_owned(),
            mapping: BTreeMap::new(),
            default_mapping: Some("#/components/schemas/Fallback".to_owned()),
        };

        assert_eq!(
            discriminator.target_for("anything"),
            "#/components/schemas/Fallback"
        );

        let value = serde_json::to_value(&discriminator).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "propertyName": "kind",
                "defaultMapping": "#/components/schemas/Fallback"
            })
        );

        let parsed: Discriminator = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, discriminator);
    }
}
