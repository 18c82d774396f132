//! Schema tree nodes: boolean schemas, named references, and inline descriptions.

use std::collections::BTreeMap;

use derive_more::derive::{Display, Error};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{spec_extensions, Discriminator, ExternalDoc, Ref, RefError, RefType, Spec, Xml};

/// Schema errors.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum SchemaError {
    /// Reference error.
    #[display("Reference error: {_0}")]
    Ref(RefError),

    /// Schema names another schema that is not registered under components.
    #[display("Unresolvable schema name: {_0}")]
    UnresolvableName(#[error(not(source))] String),
}

/// Data type of an inline schema.
///
/// Either a primitive type or `array`; `object` marks aggregate request/response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Boolean value.
    Boolean,

    /// Integer value.
    Integer,

    /// Floating point number value.
    Number,

    /// String value.
    String,

    /// Array of values.
    Array,

    /// Object with property values.
    Object,

    /// The JSON null value.
    Null,
}

/// A node in the schema tree.
///
/// Either a boolean schema (`true` admits everything, `false` nothing), or an object schema
/// which may itself be a reference (`$ref`/`$dynamicRef`) or an inline description.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Schema {
    /// Boolean schema.
    Boolean(bool),

    /// Object schema: a reference or an inline description.
    Object(Box<ObjectSchema>),
}

impl Schema {
    /// Builds a schema referencing a named component schema.
    pub fn reference(name: &str, dynamic: bool) -> Self {
        let ref_path = format!("#/components/schemas/{name}");

        let mut schema = ObjectSchema::default();
        if dynamic {
            schema.dynamic_ref = Some(ref_path);
        } else {
            schema.ref_path = Some(ref_path);
        }
        schema.ref_name = Some(name.to_owned());

        Self::Object(Box::new(schema))
    }

    /// Builds an inline schema of the given type.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self::Object(Box::new(ObjectSchema {
            schema_type: Some(schema_type),
            ..ObjectSchema::default()
        }))
    }

    /// Returns the object schema, unless this is a boolean schema.
    pub fn object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Boolean(_) => None,
            Self::Object(schema) => Some(schema),
        }
    }

    /// Mutable variant of [`object`](Self::object).
    pub fn object_mut(&mut self) -> Option<&mut ObjectSchema> {
        match self {
            Self::Boolean(_) => None,
            Self::Object(schema) => Some(schema),
        }
    }

    /// Returns the component name this schema references, if any.
    pub fn ref_name(&self) -> Option<&str> {
        self.object().and_then(|schema| schema.ref_name.as_deref())
    }

    /// Resolves this schema against the spec's component schemas.
    ///
    /// Boolean and inline schemas resolve to themselves.
    pub fn resolve(&self, spec: &Spec) -> Result<Schema, SchemaError> {
        let Some(object) = self.object() else {
            return Ok(self.clone());
        };

        let Some(target) = object.reference() else {
            return Ok(self.clone());
        };

        let parsed = if object.dynamic_ref.is_some() {
            Ref::parse_dynamic(target).map_err(SchemaError::Ref)?
        } else {
            target.parse::<Ref>().map_err(SchemaError::Ref)?
        };

        if parsed.kind != RefType::Schema {
            return Err(SchemaError::Ref(RefError::MismatchedKind(
                parsed.kind,
                RefType::Schema,
            )));
        }

        spec.components
            .as_ref()
            .and_then(|components| components.schemas.get(&parsed.name))
            .cloned()
            .ok_or(SchemaError::UnresolvableName(parsed.name))
    }
}

/// An object schema: an extended subset of JSON Schema draft 2020-12 as profiled by OpenAPI.
///
/// See <https://spec.openapis.org/oas/v3.1.1#schema-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct ObjectSchema {
    /// Reference to another schema, usually `#/components/schemas/<name>`.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Dynamic reference to another schema.
    #[serde(rename = "$dynamicRef", skip_serializing_if = "Option::is_none")]
    pub dynamic_ref: Option<String>,

    /// Component name the reference resolves to, derived at load time.
    ///
    /// Weak name, looked up against the owning spec's components at traversal time; cyclic and
    /// self-referential schemas stay representable because nothing here owns the target.
    #[serde(skip)]
    pub ref_name: Option<String>,

    //
    // display metadata
    //
    /// Short title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    //
    // type
    //
    /// Data type: a primitive type or `array`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Additional semantic refinement of the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Media type of string contents, e.g. `application/json`.
    #[serde(rename = "contentMediaType", skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,

    /// Content encoding of string contents, e.g. `base64`.
    #[serde(rename = "contentEncoding", skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    //
    // constraints
    //
    /// Constrains numbers to multiples of this value.
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<serde_json::Number>,

    /// Inclusive upper numeric limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<serde_json::Number>,

    /// Exclusive upper numeric limit.
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<serde_json::Number>,

    /// Inclusive lower numeric limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<serde_json::Number>,

    /// Exclusive lower numeric limit.
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<serde_json::Number>,

    /// Maximum string length.
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum string length.
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Regular expression strings must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Maximum array length.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Minimum array length.
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Requires array items to be unique.
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    /// Maximum property count.
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    /// Minimum property count.
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,

    //
    // structure
    //
    /// Property names that must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Schema for uniform array items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Schemas for positional array items.
    #[serde(rename = "prefixItems", default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_items: Vec<Schema>,

    /// Property schemas.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,

    /// Schema admitted for properties not named in `properties`.
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<Schema>>,

    //
    // composition
    //
    /// Instances must validate against all of these schemas.
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    /// Instances must validate against at least one of these schemas.
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,

    /// Instances must validate against exactly one of these schemas.
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,

    /// Instances must not validate against this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,

    /// Condition schema for `then`/`else`.
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_schema: Option<Box<Schema>>,

    /// Applied when `if` validates.
    #[serde(rename = "then", skip_serializing_if = "Option::is_none")]
    pub then_schema: Option<Box<Schema>>,

    /// Applied when `if` does not validate.
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_schema: Option<Box<Schema>>,

    //
    // values
    //
    /// Constant value the instance must equal.
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enumeration of admitted values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    /// Example values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<serde_json::Value>,

    //
    // metadata
    //
    /// Declares the schema deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Value is only relevant in responses.
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Value is only relevant in requests.
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    /// Polymorphism discriminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// XML model metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,

    /// Additional external documentation for this schema.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDoc>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl ObjectSchema {
    /// Returns the `$ref` or `$dynamicRef` target, if this schema is a reference.
    pub fn reference(&self) -> Option<&str> {
        self.ref_path.as_deref().or(self.dynamic_ref.as_deref())
    }

    /// True when this schema describes an anonymous object shape rather than a reference,
    /// primitive, or array.
    pub fn is_object_shaped(&self) -> bool {
        self.reference().is_none()
            && (self.schema_type == Some(SchemaType::Object) || !self.properties.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn boolean_and_object_schemas_deserialize() {
        let schema: Schema = serde_json::from_str("true").unwrap();
        assert_eq!(schema, Schema::Boolean(true));

        let schema: Schema = serde_json::from_str(r#"{ "type": "integer" }"#).unwrap();
        assert_eq!(
            schema.object().unwrap().schema_type,
            Some(SchemaType::Integer)
        );
    }

    #[test]
    fn reference_constructor_round_trips() {
        let schema = Schema::reference("Pet", false);
        assert_eq!(schema.ref_name(), Some("Pet"));

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "$ref": "#/components/schemas/Pet" })
        );
    }

    #[test]
    fn object_shape_detection() {
        let inline: Schema = serde_json::from_str(
            r#"{ "type": "object", "properties": { "id": { "type": "integer" } } }"#,
        )
        .unwrap();
        assert!(inline.object().unwrap().is_object_shaped());

        let referenced = Schema::reference("Pet", false);
        assert!(!referenced.object().unwrap().is_object_shaped());

        let primitive = Schema::of_type(SchemaType::String);
        assert!(!primitive.object().unwrap().is_object_shaped());
    }
}
