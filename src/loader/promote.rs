//! Promotion of anonymous object schemas into named components.
//!
//! Request and response bodies whose primary media type is JSON-like and whose schema is an
//! inline object shape are hoisted to `#/components/schemas/<name>` under a unique sanitized
//! name, and the site is rewritten to a reference.

use log::debug;

use crate::spec::{
    is_json_media_type, Components, Method, ObjectOrReference, Operation, PathItem, Schema, Spec,
};

pub fn promote_inline_schemas(spec: &mut Spec) {
    let mut components = spec.components.take().unwrap_or_default();

    if let Some(paths) = &mut spec.paths {
        for (route, item) in paths.iter_mut() {
            promote_path_item(item, route, &mut components);
        }
    }

    if let Some(webhooks) = &mut spec.webhooks {
        for (name, item) in webhooks.iter_mut() {
            promote_path_item(item, name, &mut components);
        }
    }

    spec.components = Some(components);
}

fn promote_path_item(item: &mut PathItem, route: &str, components: &mut Components) {
    for method in Method::ALL {
        let method_name = method.as_str().to_ascii_lowercase();
        if let Some(op) = item.operation_mut(method) {
            promote_operation(op, route, &method_name, components);
        }
    }

    let additional = item
        .additional_operations
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    for method in additional {
        if let Some(op) = item.additional_operations.get_mut(&method) {
            let method_name = method.to_ascii_lowercase();
            promote_operation(op, route, &method_name, components);
        }
    }
}

fn promote_operation(op: &mut Operation, route: &str, method: &str, components: &mut Components) {
    let stem = op
        .operation_id
        .clone()
        .unwrap_or_else(|| format!("{method}_{route}"));

    if let Some(ObjectOrReference::Object(body)) = &mut op.request_body {
        for (media_name, media) in body.content.iter_mut() {
            if !is_json_media_type(media_name) {
                continue;
            }

            if let Some(schema) = &mut media.schema {
                promote_site(schema, &format!("{stem}_request"), components);
            }
        }
    }

    if let Some(responses) = &mut op.responses {
        for (code, oor) in responses.iter_mut() {
            let ObjectOrReference::Object(response) = oor else {
                continue;
            };

            for (media_name, media) in response.content.iter_mut() {
                if !is_json_media_type(media_name) {
                    continue;
                }

                if let Some(schema) = &mut media.schema {
                    promote_site(schema, &format!("{stem}_response_{code}"), components);
                }
            }
        }
    }
}

/// Rewrites an inline object-shaped schema site to a reference at a fresh component name.
fn promote_site(schema: &mut Schema, stem: &str, components: &mut Components) {
    let promotable = schema
        .object()
        .is_some_and(|object| object.is_object_shaped());

    if !promotable {
        return;
    }

    let name = unique_name(sanitize(stem), components);
    debug!("promoting inline schema to components/schemas/{name}");

    let inline = std::mem::replace(schema, Schema::reference(&name, false));
    components.schemas.insert(name, inline);
}

/// Replaces every character outside the component key charset with `_`.
fn sanitize(raw: &str) -> String {
    let sanitized = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "schema".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn unique_name(base: String, components: &Components) -> String {
    if !components.schemas.contains_key(&base) {
        return base;
    }

    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if !components.schemas.contains_key(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sanitize_flattens_route_characters() {
        assert_eq!(sanitize("post_/users/{id}"), "post__users__id");
        assert_eq!(sanitize("listPets_response_200"), "listPets_response_200");
        assert_eq!(sanitize("///"), "schema");
    }

    #[test]
    fn unique_name_appends_counter() {
        let mut components = Components::default();
        components
            .schemas
            .insert("pet_request".to_owned(), Schema::Boolean(true));

        assert_eq!(
            unique_name("pet_request".to_owned(), &components),
            "pet_request_2"
        );
        assert_eq!(unique_name("other".to_owned(), &components), "other");
    }
}
