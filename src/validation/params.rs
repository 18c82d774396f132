//! Parameter scope assembly shared by the path-template and operation validators.

use crate::spec::{is_reserved_header, Operation, Parameter, ParameterIn, PathItem};

/// Collects the parameters visible to one operation: path-scope parameters plus
/// operation-scope parameters, with operation definitions overriding path definitions of the
/// same `(name, in)`.
///
/// Reserved header names are silently dropped before anything else, and within each scope the
/// first occurrence of a `(name, in)` pair wins, preserving declaration order. Unresolved
/// references are skipped; after a successful load every reference carries its inlined copy.
pub fn effective_parameters(item: &PathItem, op: Option<&Operation>) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::new();

    let path_scope = scope_parameters(&item.parameters);
    let op_scope = op.map(|op| scope_parameters(&op.parameters)).unwrap_or_default();

    for param in path_scope {
        if !op_scope
            .iter()
            .any(|candidate| is_same_slot(candidate, &param))
        {
            merged.push(param);
        }
    }

    merged.extend(op_scope);
    merged
}

/// Resolves one scope's parameter list, dropping reserved headers and later duplicates.
pub fn scope_parameters(
    params: &[crate::spec::ObjectOrReference<Parameter>],
) -> Vec<Parameter> {
    let mut out: Vec<Parameter> = Vec::new();

    for oor in params {
        let Some(param) = oor.as_object() else {
            continue;
        };

        if param.location == ParameterIn::Header && is_reserved_header(&param.name) {
            continue;
        }

        if !out.iter().any(|existing| is_same_slot(existing, param)) {
            out.push(param.clone());
        }
    }

    out
}

/// Detects duplicate `(name, in)` pairs within a single scope, after reserved-header
/// filtering.
pub fn find_scope_duplicate(
    params: &[crate::spec::ObjectOrReference<Parameter>],
) -> Option<(String, ParameterIn)> {
    let mut seen: Vec<(&str, ParameterIn)> = Vec::new();

    for oor in params {
        let Some(param) = oor.as_object() else {
            continue;
        };

        if param.location == ParameterIn::Header && is_reserved_header(&param.name) {
            continue;
        }

        let slot = (param.name.as_str(), param.location);
        if seen.contains(&slot) {
            return Some((param.name.clone(), param.location));
        }
        seen.push(slot);
    }

    None
}

fn is_same_slot(a: &Parameter, b: &Parameter) -> bool {
    a.name == b.name && a.location == b.location
}
