//! Operation-level checks: parameter uniqueness, operation id uniqueness, and querystring
//! exclusivity.

use std::collections::BTreeSet;

use super::params::{effective_parameters, find_scope_duplicate};
use super::paths::all_path_items;
use super::ValidationError;
use crate::spec::{ObjectOrReference, Operation, ParameterIn, PathItem, Spec};

/// Every parameter scope must be free of duplicate `(name, in)` pairs after reserved-header
/// filtering.
pub fn check_parameter_uniqueness(spec: &Spec) -> Result<(), ValidationError> {
    for (scope_name, item) in all_path_items(spec) {
        check_item_parameters(scope_name, item)?;
    }

    Ok(())
}

fn check_item_parameters(scope_name: &str, item: &PathItem) -> Result<(), ValidationError> {
    if let Some((name, location)) = find_scope_duplicate(&item.parameters) {
        return Err(ValidationError::DuplicateParameter {
            scope: scope_name.to_owned(),
            name,
            location,
        });
    }

    for (_, op) in item.all_operations() {
        if let Some((name, location)) = find_scope_duplicate(&op.parameters) {
            return Err(ValidationError::DuplicateParameter {
                scope: scope_name.to_owned(),
                name,
                location,
            });
        }

        for (expr, item) in callback_items(op) {
            check_item_parameters(expr, item)?;
        }
    }

    Ok(())
}

/// Operation ids must be unique across paths, webhooks, referenced component path items
/// (present at their consuming sites after inlining), and callbacks.
pub fn check_operation_id_uniqueness(spec: &Spec) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();

    for (_, item) in all_path_items(spec) {
        collect_operation_ids(item, &mut seen)?;
    }

    Ok(())
}

fn collect_operation_ids<'s>(
    item: &'s PathItem,
    seen: &mut BTreeSet<&'s str>,
) -> Result<(), ValidationError> {
    for (_, op) in item.all_operations() {
        if let Some(id) = op.operation_id.as_deref() {
            if !seen.insert(id) {
                return Err(ValidationError::DuplicateOperationId(id.to_owned()));
            }
        }

        for (_, item) in callback_items(op) {
            collect_operation_ids(item, seen)?;
        }
    }

    Ok(())
}

/// At most one `in: querystring` parameter is visible to an operation, and it must not
/// coexist with any `in: query` parameter. Callback operations are held to the same rule.
pub fn check_querystring_exclusivity(spec: &Spec) -> Result<(), ValidationError> {
    for (scope_name, item) in all_path_items(spec) {
        check_item_querystrings(scope_name, item)?;
    }

    Ok(())
}

fn check_item_querystrings(scope_name: &str, item: &PathItem) -> Result<(), ValidationError> {
    for (_, op) in item.all_operations() {
        let params = effective_parameters(item, Some(op));

        let querystrings = params
            .iter()
            .filter(|param| param.location == ParameterIn::Querystring)
            .count();

        if querystrings > 1 {
            return Err(ValidationError::MultipleQuerystring(scope_name.to_owned()));
        }

        if querystrings == 1
            && params
                .iter()
                .any(|param| param.location == ParameterIn::Query)
        {
            return Err(ValidationError::QuerystringConflict(scope_name.to_owned()));
        }

        for (expr, item) in callback_items(op) {
            check_item_querystrings(expr, item)?;
        }
    }

    Ok(())
}

/// Collects an operation's callback path items, covering both inline callbacks and the
/// inlined copies of referenced component callbacks.
fn callback_items(op: &Operation) -> Vec<(&str, &PathItem)> {
    let mut items = Vec::new();

    for oor in op.callbacks.values() {
        let callback = match oor {
            ObjectOrReference::Object(callback) => Some(callback),
            ObjectOrReference::Ref { resolved, .. } => resolved.as_deref(),
        };

        if let Some(callback) = callback {
            items.extend(
                callback
                    .paths
                    .iter()
                    .map(|(expr, item)| (expr.as_str(), item)),
            );
        }
    }

    items
}
