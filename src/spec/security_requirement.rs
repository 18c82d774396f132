use std::collections::BTreeMap;

/// Lists the security schemes applicable to an API or operation, by component name, each with
/// the scope names required for execution.
///
/// An empty requirement set (`{}`) makes security optional. A spec-level or operation-level
/// `security` list distinguishes **absent** (inherit/none declared) from **empty** (explicitly
/// no requirements); use `Option<Vec<SecurityRequirement>>` at those positions.
///
/// See <https://spec.openapis.org/oas/v3.1.1#security-requirement-object>.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;
