//! Path template conformance and collision checks.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::params::effective_parameters;
use super::ValidationError;
use crate::spec::{Parameter, ParameterIn, PathItem, Spec};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^/{}]+)\}").unwrap());

/// Extracts `{placeholder}` names from a route, in order of appearance.
pub fn placeholders(route: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(route)
        .map(|capture| capture.get(1).expect("group 1 always captures").as_str())
        .collect()
}

/// Rewrites every placeholder to `{}`, the form under which colliding templates compare
/// equal.
pub fn normalize(route: &str) -> String {
    PLACEHOLDER.replace_all(route, "{}").into_owned()
}

/// For every real path: the placeholder set must equal the declared `in: path` parameter set
/// (path scope ∪ operation scope), every such parameter must be required, and no placeholder
/// may repeat.
pub fn check_templates(spec: &Spec) -> Result<(), ValidationError> {
    let Some(paths) = &spec.paths else {
        return Ok(());
    };

    for (route, item) in paths {
        let names = placeholders(route);

        for (idx, name) in names.iter().enumerate() {
            if names[..idx].contains(name) {
                return Err(ValidationError::DuplicatePlaceholder {
                    route: route.clone(),
                    name: (*name).to_owned(),
                });
            }
        }

        let mut scopes = item
            .all_operations()
            .map(|(_, op)| effective_parameters(item, Some(op)))
            .collect::<Vec<_>>();

        // A path item without operations still declares parameters against its template.
        if scopes.is_empty() {
            scopes.push(effective_parameters(item, None));
        }

        for scope in scopes {
            check_scope(route, &names, &scope)?;
        }
    }

    Ok(())
}

fn check_scope(
    route: &str,
    names: &[&str],
    params: &[Parameter],
) -> Result<(), ValidationError> {
    let path_params = params
        .iter()
        .filter(|param| param.location == ParameterIn::Path)
        .collect::<Vec<_>>();

    for param in &path_params {
        if param.required != Some(true) {
            return Err(ValidationError::PathParameterNotRequired {
                route: route.to_owned(),
                name: param.name.clone(),
            });
        }

        if !names.contains(&param.name.as_str()) {
            return Err(ValidationError::UnusedPathParameter {
                route: route.to_owned(),
                name: param.name.clone(),
            });
        }
    }

    for name in names {
        if !path_params.iter().any(|param| param.name == *name) {
            return Err(ValidationError::OrphanPlaceholder {
                route: route.to_owned(),
                name: (*name).to_owned(),
            });
        }
    }

    Ok(())
}

/// Routes that are identical after placeholder normalization must be textually identical.
pub fn check_collisions(spec: &Spec) -> Result<(), ValidationError> {
    let Some(paths) = &spec.paths else {
        return Ok(());
    };

    let mut normalized: BTreeMap<String, &str> = BTreeMap::new();

    for route in paths.keys() {
        match normalized.insert(normalize(route), route) {
            Some(existing) if existing != route => {
                return Err(ValidationError::PathCollision {
                    first: existing.to_owned(),
                    second: route.clone(),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

/// Iterates path items of both `paths` and `webhooks` with their scope label.
pub fn all_path_items(spec: &Spec) -> impl Iterator<Item = (&String, &PathItem)> {
    spec.paths
        .iter()
        .flatten()
        .chain(spec.webhooks.iter().flatten())
}
