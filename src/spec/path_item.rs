use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    spec_extensions, FromRef, Method, ObjectOrReference, Operation, Parameter, Ref, RefError,
    RefType, Server, Spec,
};

/// Describes the operations available on a single path.
///
/// A Path Item MAY be empty, due to [ACL constraints]. The path itself is still exposed to the
/// documentation viewer but they will not know which operations and parameters are available.
///
/// See <https://spec.openapis.org/oas/v3.2.0#path-item-object>.
///
/// [ACL constraints]: https://spec.openapis.org/oas/v3.1.1#security-filtering
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct PathItem {
    /// Allows for a referenced definition of this path item.
    ///
    /// The referenced structure MUST be in the form of a Path Item Object. When present and the
    /// document is a full OpenAPI description, sibling fields are ignored during path
    /// processing in favor of the referenced definition.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// An optional string summary, intended to apply to all operations in this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// An optional string description, intended to apply to all operations in this path.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// A definition of a GET operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    /// A definition of a PUT operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    /// A definition of a POST operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    /// A definition of a DELETE operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    /// A definition of an OPTIONS operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    /// A definition of a HEAD operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    /// A definition of a PATCH operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    /// A definition of a TRACE operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,

    /// A definition of a QUERY operation on this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Operation>,

    /// Operations using custom HTTP methods, keyed by the method's raw (case-preserved) name.
    ///
    /// Declaration order is preserved.
    #[serde(
        rename = "additionalOperations",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub additional_operations: IndexMap<String, Operation>,

    /// An alternative `servers` array to service all operations in this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// A list of parameters that are applicable for all the operations described under this
    /// path.
    ///
    /// These parameters can be overridden at the operation level, but cannot be removed there.
    /// The list MUST NOT include duplicated parameters. A unique parameter is defined by a
    /// combination of a name and location.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ObjectOrReference<Parameter>>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    /// Returns the operation defined for the given fixed method, if any.
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
            Method::Query => self.query.as_ref(),
        }
    }

    /// Mutable slot for the given fixed method.
    pub fn operation_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Options => &mut self.options,
            Method::Head => &mut self.head,
            Method::Patch => &mut self.patch,
            Method::Trace => &mut self.trace,
            Method::Query => &mut self.query,
        }
    }

    /// Iterates over the fixed-method operations defined on this path item.
    pub fn methods(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method, op)))
    }

    /// Iterates over every operation on this path item, including custom-method operations.
    ///
    /// The yielded key is the raw method name.
    pub fn all_operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method.as_str(), op)))
            .chain(
                self.additional_operations
                    .iter()
                    .map(|(method, op)| (method.as_str(), op)),
            )
    }
}

impl FromRef for PathItem {
    fn from_ref(spec: &Spec, path: &str) -> Result<Self, RefError> {
        let refpath = path.parse::<Ref>()?;

        match refpath.kind {
            RefType::PathItem => spec
                .components
                .as_ref()
                .and_then(|cs| cs.path_items.get(&refpath.name))
                .ok_or_else(|| RefError::Unresolvable(path.to_owned()))
                .and_then(|oor| oor.resolve(spec)),

            kind => Err(RefError::MismatchedKind(kind, RefType::PathItem)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn methods_iterates_defined_slots_in_order() {
        let item: PathItem = serde_json::from_str(
            r#"{
                "post": { "responses": { "200": { "description": "ok" } } },
                "get": { "responses": { "200": { "description": "ok" } } }
            }"#,
        )
        .unwrap();

        let methods = item.methods().map(|(m, _)| m).collect::<Vec<_>>();
        assert_eq!(methods, vec![Method::Get, Method::Post]);
    }

    #[test]
    fn additional_operations_round_trip() {
        let item: PathItem = serde_json::from_str(
            r#"{
                "additionalOperations": {
                    "PURGE": { "responses": { "204": { "description": "purged" } } }
                }
            }"#,
        )
        .unwrap();

        assert!(item.additional_operations.contains_key("PURGE"));

        let value = serde_json::to_value(&item).unwrap();
        assert!(value["additionalOperations"]["PURGE"].is_object());
    }
}
