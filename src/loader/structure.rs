//! Structural rules the data model cannot express through types alone.
//!
//! Runs immediately after deserialization, before reference inlining. Reports the first
//! failure with its JSON-pointer-style location.

use once_cell::sync::Lazy;
use regex::Regex;

use super::LoadError;
use crate::location::Location;
use crate::spec::{
    is_valid_status_key, Example, Header, MediaType, ObjectOrReference, Operation, Parameter,
    ParameterIn, ParameterStyle, PathItem, Response, Server, Spec,
};

static COMPONENT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-zA-Z0-9._-]+$").unwrap());
static URL_TEMPLATE_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Applies every structural rule to a freshly deserialized spec.
pub fn check(spec: &Spec) -> Result<(), LoadError> {
    let root = Location::root();

    check_info(spec, &root)?;

    check_servers(&spec.servers, &root.extend("servers"))?;

    if spec.paths.is_none() && spec.webhooks.is_none() && spec.components.is_none() {
        return Err(LoadError::NoContent);
    }

    if let Some(components) = &spec.components {
        let loc = root.extend("components");

        for (kind, key) in components.keys_by_kind() {
            if !COMPONENT_KEY.is_match(key) {
                return Err(LoadError::InvalidComponentKey(
                    loc.extend(kind),
                    key.clone(),
                ));
            }
        }

        for (name, oor) in &components.parameters {
            check_parameter_oor(oor, &loc.extend("parameters").extend(name))?;
        }
        for (name, oor) in &components.responses {
            check_response_oor(oor, &loc.extend("responses").extend(name))?;
        }
        for (name, oor) in &components.headers {
            if let ObjectOrReference::Object(header) = oor {
                check_header(header, &loc.extend("headers").extend(name))?;
            }
        }
        for (name, oor) in &components.request_bodies {
            if let ObjectOrReference::Object(body) = oor {
                for (media_name, media) in &body.content {
                    check_media_type(
                        media,
                        &loc.extend("requestBodies")
                            .extend(name)
                            .extend("content")
                            .extend(media_name),
                    )?;
                }
            }
        }
        for (name, media) in &components.media_types {
            check_media_type(media, &loc.extend("mediaTypes").extend(name))?;
        }
        for (name, oor) in &components.examples {
            if let ObjectOrReference::Object(example) = oor {
                check_example(example, &loc.extend("examples").extend(name))?;
            }
        }
        for (name, oor) in &components.links {
            if let ObjectOrReference::Object(link) = oor {
                if link.operation_id.is_some() == link.operation_ref.is_some() {
                    return Err(LoadError::LinkTargetConflict(loc.extend("links").extend(name)));
                }
            }
        }
        for (name, oor) in &components.path_items {
            if let ObjectOrReference::Object(item) = oor {
                check_path_item(item, &loc.extend("pathItems").extend(name))?;
            }
        }
        for (name, oor) in &components.callbacks {
            if let ObjectOrReference::Object(callback) = oor {
                let loc = loc.extend("callbacks").extend(name);
                for (expr, item) in &callback.paths {
                    check_path_item(item, &loc.extend(expr))?;
                }
            }
        }
    }

    if let Some(paths) = &spec.paths {
        let loc = root.extend("paths");

        for (route, item) in paths {
            if !route.starts_with('/') {
                return Err(LoadError::PathMissingSlash(loc.clone(), route.clone()));
            }

            check_path_item(item, &loc.extend(route))?;
        }
    }

    if let Some(webhooks) = &spec.webhooks {
        let loc = root.extend("webhooks");

        for (name, item) in webhooks {
            check_path_item(item, &loc.extend(name))?;
        }
    }

    Ok(())
}

fn check_info(spec: &Spec, root: &Location) -> Result<(), LoadError> {
    let loc = root.extend("info");

    if spec.info.title.is_empty() {
        return Err(LoadError::MissingField(loc, "title"));
    }
    if spec.info.version.is_empty() {
        return Err(LoadError::MissingField(loc, "version"));
    }

    if let Some(license) = &spec.info.license {
        if license.identifier.is_some() && license.url.is_some() {
            return Err(LoadError::LicenseConflict(loc.extend("license")));
        }
    }

    Ok(())
}

fn check_servers(servers: &[Server], loc: &Location) -> Result<(), LoadError> {
    let mut names = Vec::new();

    for (idx, server) in servers.iter().enumerate() {
        let loc = loc.extend(idx.to_string());

        if let Some(name) = &server.name {
            if names.contains(&name) {
                return Err(LoadError::DuplicateServerName(loc, name.clone()));
            }
            names.push(name);
        }

        let mut seen = Vec::new();
        for capture in URL_TEMPLATE_VAR.captures_iter(&server.url) {
            let var = &capture[1];

            if seen.contains(&var.to_owned()) {
                return Err(LoadError::DuplicatedServerVariable(loc, var.to_owned()));
            }
            seen.push(var.to_owned());

            if !server.variables.contains_key(var) {
                return Err(LoadError::UndefinedServerVariable(loc, var.to_owned()));
            }
        }

        for (name, variable) in &server.variables {
            if let Some(default) = &variable.default {
                if !variable.substitutions_enum.is_empty()
                    && !variable.substitutions_enum.contains(default)
                {
                    return Err(LoadError::InvalidServerVariableDefault(
                        loc.extend("variables"),
                        name.clone(),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn check_path_item(item: &PathItem, loc: &Location) -> Result<(), LoadError> {
    check_servers(&item.servers, &loc.extend("servers"))?;

    for (idx, oor) in item.parameters.iter().enumerate() {
        check_parameter_oor(oor, &loc.extend("parameters").extend(idx.to_string()))?;
    }

    for (method, op) in item.all_operations() {
        check_operation(op, &loc.extend(method))?;
    }

    Ok(())
}

fn check_operation(op: &Operation, loc: &Location) -> Result<(), LoadError> {
    check_servers(&op.servers, &loc.extend("servers"))?;

    for (idx, oor) in op.parameters.iter().enumerate() {
        check_parameter_oor(oor, &loc.extend("parameters").extend(idx.to_string()))?;
    }

    if let Some(ObjectOrReference::Object(body)) = &op.request_body {
        for (media_name, media) in &body.content {
            check_media_type(
                media,
                &loc.extend("requestBody").extend("content").extend(media_name),
            )?;
        }
    }

    let responses_loc = loc.extend("responses");
    match &op.responses {
        None => return Err(LoadError::MissingField(loc.clone(), "responses")),
        Some(responses) if responses.is_empty() => {
            return Err(LoadError::EmptyResponses(responses_loc));
        }
        Some(responses) => {
            for (code, oor) in responses {
                if !is_valid_status_key(code) {
                    return Err(LoadError::InvalidStatusCode(responses_loc, code.clone()));
                }

                check_response_oor(oor, &responses_loc.extend(code))?;
            }
        }
    }

    for (name, oor) in &op.callbacks {
        if let ObjectOrReference::Object(callback) = oor {
            let loc = loc.extend("callbacks").extend(name);
            for (expr, item) in &callback.paths {
                check_path_item(item, &loc.extend(expr))?;
            }
        }
    }

    Ok(())
}

fn check_response_oor(
    oor: &ObjectOrReference<Response>,
    loc: &Location,
) -> Result<(), LoadError> {
    let ObjectOrReference::Object(response) = oor else {
        return Ok(());
    };

    if response.description.is_none() {
        return Err(LoadError::MissingField(loc.clone(), "description"));
    }

    for (name, header) in &response.headers {
        if let ObjectOrReference::Object(header) = header {
            check_header(header, &loc.extend("headers").extend(name))?;
        }
    }

    for (media_name, media) in &response.content {
        check_media_type(media, &loc.extend("content").extend(media_name))?;
    }

    for (name, link) in &response.links {
        if let ObjectOrReference::Object(link) = link {
            if link.operation_id.is_some() == link.operation_ref.is_some() {
                return Err(LoadError::LinkTargetConflict(loc.extend("links").extend(name)));
            }
        }
    }

    Ok(())
}

fn check_parameter_oor(
    oor: &ObjectOrReference<Parameter>,
    loc: &Location,
) -> Result<(), LoadError> {
    let ObjectOrReference::Object(param) = oor else {
        return Ok(());
    };

    check_parameter(param, loc)
}

fn check_parameter(param: &Parameter, loc: &Location) -> Result<(), LoadError> {
    if param.example.is_some() && !param.examples.is_empty() {
        return Err(LoadError::ExampleConflict(loc.clone()));
    }

    if param.location == ParameterIn::Querystring && param.schema.is_some() {
        return Err(LoadError::QuerystringNeedsContent(loc.clone()));
    }

    match (&param.schema, &param.content) {
        (Some(_), Some(_)) | (None, None) => {
            return Err(LoadError::SchemaContentConflict(loc.clone()));
        }
        (None, Some(content)) => {
            if content.len() != 1 {
                return Err(LoadError::ContentNotSingular(loc.extend("content")));
            }
            for (media_name, media) in content {
                check_media_type(media, &loc.extend("content").extend(media_name))?;
            }
        }
        (Some(_), None) => {}
    }

    if param.allow_reserved.is_some()
        && !matches!(param.location, ParameterIn::Query | ParameterIn::Querystring)
    {
        return Err(LoadError::AllowReservedLocation(loc.clone()));
    }

    if param.allow_empty_value.is_some() && param.location != ParameterIn::Query {
        return Err(LoadError::AllowEmptyValueLocation(loc.clone()));
    }

    if let Some(style) = param.style {
        let valid = match style {
            ParameterStyle::Matrix | ParameterStyle::Label => {
                param.location == ParameterIn::Path
            }
            ParameterStyle::Simple => {
                matches!(param.location, ParameterIn::Path | ParameterIn::Header)
            }
            ParameterStyle::Form => matches!(
                param.location,
                ParameterIn::Query | ParameterIn::Cookie | ParameterIn::Querystring
            ),
            ParameterStyle::SpaceDelimited
            | ParameterStyle::PipeDelimited
            | ParameterStyle::DeepObject => param.location == ParameterIn::Query,
        };

        if !valid {
            let style = serde_json::to_value(style)
                .ok()
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_default();

            return Err(LoadError::StyleLocationMismatch(
                loc.clone(),
                style,
                param.location.to_string(),
            ));
        }
    }

    Ok(())
}

fn check_header(header: &Header, loc: &Location) -> Result<(), LoadError> {
    if header.example.is_some() && !header.examples.is_empty() {
        return Err(LoadError::ExampleConflict(loc.clone()));
    }

    if let Some(style) = header.style {
        if style != ParameterStyle::Simple {
            return Err(LoadError::HeaderStyle(loc.clone()));
        }
    }

    match (&header.schema, &header.content) {
        (Some(_), Some(_)) => return Err(LoadError::SchemaContentConflict(loc.clone())),
        (None, Some(content)) if content.len() != 1 => {
            return Err(LoadError::ContentNotSingular(loc.extend("content")));
        }
        _ => {}
    }

    Ok(())
}

fn check_media_type(media: &MediaType, loc: &Location) -> Result<(), LoadError> {
    if media.example.is_some() && !media.examples.is_empty() {
        return Err(LoadError::ExampleConflict(loc.clone()));
    }

    if media.encoding_carrier_count() > 1 {
        return Err(LoadError::EncodingConflict(loc.clone()));
    }

    for (name, oor) in &media.examples {
        if let ObjectOrReference::Object(example) = oor {
            check_example(example, &loc.extend("examples").extend(name))?;
        }
    }

    Ok(())
}

fn check_example(example: &Example, loc: &Location) -> Result<(), LoadError> {
    if example.carrier_count() != 1 {
        return Err(LoadError::ExampleCarrierConflict(loc.clone()));
    }

    Ok(())
}
