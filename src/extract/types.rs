//! C type mapping and the named-schema registry.
//!
//! Maps C types onto schema nodes (primitives, arrays, references) and registers discovered
//! struct/enum/typedef declarations as named component schemas.

use std::collections::BTreeMap;

use log::debug;

use super::inspect::{EnumDecl, StructDecl, TypedefDecl};
use crate::spec::{ObjectSchema, Schema, SchemaType};

/// A C type broken into its base name and derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CType {
    /// Base type name with qualifiers stripped: `int`, `Pet`, `unsigned long`.
    pub base: String,

    /// Number of `*` derivations.
    pub pointer_depth: usize,

    /// Number of `[]` derivations.
    pub array_depth: usize,

    /// True when the base was introduced with the `struct` keyword.
    pub is_struct_keyword: bool,

    /// True when the base was introduced with the `enum` keyword.
    pub is_enum_keyword: bool,
}

impl CType {
    /// Breaks a C type string into base, pointer depth, and array depth.
    pub fn parse(raw: &str) -> Self {
        let mut pointer_depth = 0;
        let mut array_depth = 0;
        let mut is_struct_keyword = false;
        let mut is_enum_keyword = false;
        let mut base_words: Vec<&str> = Vec::new();

        let cleaned = raw.replace('*', " * ").replace("[]", " [] ");

        for word in cleaned.split_whitespace() {
            match word {
                "*" => pointer_depth += 1,
                "[]" => array_depth += 1,
                "const" | "volatile" | "restrict" => {}
                "struct" => is_struct_keyword = true,
                "enum" => is_enum_keyword = true,
                word => base_words.push(word),
            }
        }

        Self {
            base: base_words.join(" "),
            pointer_depth,
            array_depth,
            is_struct_keyword,
            is_enum_keyword,
        }
    }

    /// True for `T**`-style output arguments.
    pub fn is_output(&self) -> bool {
        self.pointer_depth >= 2
    }
}

/// Registry of named schemas discovered from C type declarations.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    structs: BTreeMap<String, Vec<(String, String)>>,
    enums: BTreeMap<String, Vec<String>>,
    typedefs: BTreeMap<String, String>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a struct declaration as a named schema.
    pub fn register_struct(&mut self, decl: &StructDecl) {
        debug!("registering struct schema `{}`", decl.name);
        self.structs.insert(
            decl.name.clone(),
            decl.members
                .iter()
                .map(|member| (member.name.clone(), member.type_name.clone()))
                .collect(),
        );
    }

    /// Registers an enum declaration as a named string-enum schema.
    pub fn register_enum(&mut self, decl: &EnumDecl) {
        debug!("registering enum schema `{}`", decl.name);
        self.enums.insert(decl.name.clone(), decl.values.clone());
    }

    /// Registers a typedef alias.
    pub fn register_typedef(&mut self, decl: &TypedefDecl) {
        self.typedefs.insert(decl.name.clone(), decl.target.clone());
    }

    /// True when the type names a registered or keyword-introduced struct.
    pub fn is_struct(&self, ty: &CType) -> bool {
        let resolved = self.resolve_alias(&ty.base);
        ty.is_struct_keyword || self.structs.contains_key(resolved.as_str())
    }

    /// True when the type names a registered or keyword-introduced enum.
    pub fn is_enum(&self, ty: &CType) -> bool {
        let resolved = self.resolve_alias(&ty.base);
        ty.is_enum_keyword || self.enums.contains_key(resolved.as_str())
    }

    /// The struct name a body or output argument of this type references.
    pub fn struct_name(&self, ty: &CType) -> String {
        self.resolve_alias(&ty.base)
    }

    /// Follows typedef aliases to the underlying base name.
    fn resolve_alias(&self, base: &str) -> String {
        let mut seen = 0;
        let mut current = base.to_owned();

        // Alias chains are short; the bound only guards against cyclic typedefs.
        while seen < 8 {
            match self.typedefs.get(&current) {
                Some(target) => {
                    let target = CType::parse(target);
                    if target.pointer_depth > 0 || target.array_depth > 0 {
                        break;
                    }
                    current = target.base;
                    seen += 1;
                }
                None => break,
            }
        }

        current
    }

    /// Maps a C type to a schema node.
    ///
    /// Primitives map directly; single pointers and array suffixes of non-struct types map to
    /// arrays of the mapped element; struct types map to a reference to the registered name;
    /// enums map to string schemas carrying their values.
    pub fn schema_for(&self, raw: &str) -> Schema {
        self.schema_for_type(&CType::parse(raw))
    }

    /// [`schema_for`](Self::schema_for), for an already-parsed type.
    pub fn schema_for_type(&self, ty: &CType) -> Schema {
        let resolved = self.resolve_alias(&ty.base);

        // `char *` is a string, with further derivation making arrays of strings.
        if resolved == "char" && ty.pointer_depth >= 1 {
            let element = Schema::of_type(SchemaType::String);
            return wrap_arrays(element, ty.pointer_depth - 1 + ty.array_depth);
        }

        if self.structs.contains_key(resolved.as_str()) || ty.is_struct_keyword {
            // Struct pointers reference the named schema; the pointer is ownership plumbing,
            // not cardinality.
            return Schema::reference(&resolved, false);
        }

        if let Some(values) = self.enums.get(resolved.as_str()) {
            let element = enum_schema(values);
            return wrap_arrays(element, ty.pointer_depth + ty.array_depth);
        }
        if ty.is_enum_keyword {
            let element = Schema::of_type(SchemaType::String);
            return wrap_arrays(element, ty.pointer_depth + ty.array_depth);
        }

        let element = primitive_schema(&resolved);
        wrap_arrays(element, ty.pointer_depth + ty.array_depth)
    }

    /// Emits every registered struct and enum as a named component schema.
    pub fn components(&self) -> BTreeMap<String, Schema> {
        let mut schemas = BTreeMap::new();

        for (name, members) in &self.structs {
            let mut object = ObjectSchema {
                schema_type: Some(SchemaType::Object),
                ..ObjectSchema::default()
            };

            for (member_name, member_type) in members {
                object
                    .properties
                    .insert(member_name.clone(), self.schema_for(member_type));
            }

            schemas.insert(name.clone(), Schema::Object(Box::new(object)));
        }

        for (name, values) in &self.enums {
            schemas.insert(name.clone(), enum_schema(values));
        }

        schemas
    }
}

fn enum_schema(values: &[String]) -> Schema {
    Schema::Object(Box::new(ObjectSchema {
        schema_type: Some(SchemaType::String),
        enum_values: values
            .iter()
            .map(|value| serde_json::Value::String(value.clone()))
            .collect(),
        ..ObjectSchema::default()
    }))
}

/// Maps a qualifier-free base type name to a primitive schema.
fn primitive_schema(base: &str) -> Schema {
    let (schema_type, format) = match base {
        "bool" | "_Bool" => (SchemaType::Boolean, None),

        "float" => (SchemaType::Number, Some("float")),
        "double" | "long double" => (SchemaType::Number, Some("double")),

        "char" | "short" | "int" | "int8_t" | "int16_t" | "int32_t" | "uint8_t" | "uint16_t"
        | "uint32_t" | "unsigned" | "unsigned char" | "unsigned short" | "unsigned int"
        | "signed char" | "signed short" | "signed int" => (SchemaType::Integer, Some("int32")),

        "long" | "long long" | "long int" | "unsigned long" | "unsigned long long" | "size_t"
        | "ssize_t" | "int64_t" | "uint64_t" | "intptr_t" | "uintptr_t" | "ptrdiff_t"
        | "signed long" => (SchemaType::Integer, Some("int64")),

        // `char*` handled by the caller; a bare unknown name serializes as text.
        _ => (SchemaType::String, None),
    };

    let mut object = ObjectSchema {
        schema_type: Some(schema_type),
        ..ObjectSchema::default()
    };
    object.format = format.map(str::to_owned);

    Schema::Object(Box::new(object))
}

fn wrap_arrays(element: Schema, depth: usize) -> Schema {
    let mut schema = element;

    for _ in 0..depth {
        schema = Schema::Object(Box::new(ObjectSchema {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(schema)),
            ..ObjectSchema::default()
        }));
    }

    schema
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::spec::SchemaType;

    fn registry_with_pet() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register_struct(&StructDecl {
            name: "Pet".to_owned(),
            members: vec![
                crate::extract::inspect::StructMember {
                    name: "id".to_owned(),
                    type_name: "long".to_owned(),
                },
                crate::extract::inspect::StructMember {
                    name: "name".to_owned(),
                    type_name: "char*".to_owned(),
                },
            ],
        });
        registry
    }

    #[test]
    fn ctype_parsing() {
        let ty = CType::parse("const struct Pet*");
        assert_eq!(ty.base, "Pet");
        assert_eq!(ty.pointer_depth, 1);
        assert!(ty.is_struct_keyword);
        assert!(!ty.is_output());

        let out = CType::parse("struct Obj**");
        assert!(out.is_output());

        let arr = CType::parse("int[]");
        assert_eq!(arr.array_depth, 1);
        assert_eq!(arr.base, "int");
    }

    #[test]
    fn primitives_map_with_formats() {
        let registry = SchemaRegistry::new();

        let int = registry.schema_for("int");
        assert_eq!(int.object().unwrap().schema_type, Some(SchemaType::Integer));
        assert_eq!(int.object().unwrap().format.as_deref(), Some("int32"));

        let size = registry.schema_for("size_t");
        assert_eq!(size.object().unwrap().format.as_deref(), Some("int64"));

        let num = registry.schema_for("double");
        assert_eq!(num.object().unwrap().schema_type, Some(SchemaType::Number));

        let flag = registry.schema_for("_Bool");
        assert_eq!(flag.object().unwrap().schema_type, Some(SchemaType::Boolean));
    }

    #[test]
    fn char_pointer_is_string() {
        let registry = SchemaRegistry::new();

        let s = registry.schema_for("const char*");
        assert_eq!(s.object().unwrap().schema_type, Some(SchemaType::String));
    }

    #[test]
    fn non_struct_pointer_is_array_of_element() {
        let registry = SchemaRegistry::new();

        let xs = registry.schema_for("int*");
        let object = xs.object().unwrap();
        assert_eq!(object.schema_type, Some(SchemaType::Array));

        let items = object.items.as_ref().unwrap().object().unwrap();
        assert_eq!(items.schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn struct_types_reference_the_registered_name() {
        let registry = registry_with_pet();

        let by_value = registry.schema_for("struct Pet");
        assert_eq!(by_value.ref_name(), Some("Pet"));

        let by_pointer = registry.schema_for("const struct Pet*");
        assert_eq!(by_pointer.ref_name(), Some("Pet"));

        let bare_name = registry.schema_for("Pet");
        assert_eq!(bare_name.ref_name(), Some("Pet"));
    }

    #[test]
    fn enums_map_to_string_enums() {
        let mut registry = SchemaRegistry::new();
        registry.register_enum(&EnumDecl {
            name: "Color".to_owned(),
            values: vec!["RED".to_owned(), "BLUE".to_owned()],
        });

        let color = registry.schema_for("enum Color");
        let object = color.object().unwrap();
        assert_eq!(object.schema_type, Some(SchemaType::String));
        assert_eq!(
            object.enum_values,
            vec![serde_json::json!("RED"), serde_json::json!("BLUE")]
        );
    }

    #[test]
    fn typedef_aliases_resolve() {
        let mut registry = registry_with_pet();
        registry.register_typedef(&TypedefDecl {
            name: "pet_t".to_owned(),
            target: "struct Pet".to_owned(),
        });

        let aliased = registry.schema_for("pet_t*");
        assert_eq!(aliased.ref_name(), Some("Pet"));
    }

    #[test]
    fn components_include_struct_properties() {
        let registry = registry_with_pet();
        let components = registry.components();

        let pet = components["Pet"].object().unwrap();
        assert_eq!(pet.schema_type, Some(SchemaType::Object));
        assert_eq!(
            pet.properties["id"].object().unwrap().format.as_deref(),
            Some("int64")
        );
        assert_eq!(
            pet.properties["name"].object().unwrap().schema_type,
            Some(SchemaType::String)
        );
    }
}
