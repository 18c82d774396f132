//! Operation building: fusing a parsed signature and its doc metadata into an operation.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::doc::{DocMetadata, DocParam};
use super::signature::{ParsedArg, ParsedSignature};
use super::types::{CType, SchemaRegistry};
use super::ExtractError;
use crate::spec::{
    is_reserved_header, is_valid_status_key, Header, Link, MediaType, Method, ObjectOrReference,
    ObjectSchema, Operation, Parameter, ParameterIn, ParameterStyle, RequestBody, Response,
    Schema, SchemaType, SecurityRequirement,
};

const DEFAULT_MEDIA_TYPE: &str = "application/json";
const DEFAULT_RESPONSE_DESCRIPTION: &str = "Success";

/// One operation ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltOperation {
    /// Route template the operation mounts at.
    pub route: String,

    /// Raw method string, always retained.
    pub raw_method: String,

    /// Fixed method, or `None` for an additional (custom-method) operation.
    pub method: Option<Method>,

    /// True when the operation aggregates under `webhooks`.
    pub is_webhook: bool,

    /// The built operation.
    pub operation: Operation,
}

impl BuiltOperation {
    /// True when this operation goes into a path item's `additionalOperations` map.
    pub fn is_additional(&self) -> bool {
        self.method.is_none()
    }
}

/// Builds an operation from a parsed signature and optional doc metadata.
pub fn build_operation(
    sig: &ParsedSignature,
    doc: Option<&DocMetadata>,
    registry: &SchemaRegistry,
) -> Result<BuiltOperation, ExtractError> {
    let (raw_method, method) = select_verb(sig, doc);

    let route = doc
        .and_then(|doc| doc.route.clone())
        .unwrap_or_else(|| format!("/{}", sig.name));

    let is_webhook = doc.is_some_and(|doc| doc.is_webhook);
    if !is_webhook && !route.starts_with('/') {
        return Err(ExtractError::InvalidAnnotation(format!(
            "route `{route}` must begin with `/`"
        )));
    }

    let mut op = Operation {
        operation_id: Some(
            doc.and_then(|doc| doc.operation_id.clone())
                .unwrap_or_else(|| sig.name.clone()),
        ),
        ..Operation::default()
    };

    if let Some(doc) = doc {
        op.summary = doc.summary.clone();
        op.description = doc.description.clone();
        op.deprecated = doc.deprecated;
        op.tags = doc.tags.clone();

        if let Some((url, description)) = &doc.external_docs {
            match url.parse() {
                Ok(url) => {
                    op.external_docs = Some(crate::spec::ExternalDoc {
                        url,
                        description: description.clone(),
                        extensions: Default::default(),
                    });
                }
                Err(_) => {
                    return Err(ExtractError::InvalidAnnotation(format!(
                        "externalDocs URL `{url}` does not parse"
                    )));
                }
            }
        }

        if !doc.security.is_empty() {
            op.security = Some(
                doc.security
                    .iter()
                    .map(|entry| {
                        let mut requirement = SecurityRequirement::new();
                        requirement.insert(entry.scheme.clone(), entry.scopes.clone());
                        requirement
                    })
                    .collect(),
            );
        }
    }

    let classified = classify_arguments(sig, doc, &route, method, registry)?;

    op.request_body = build_request_body(&classified, doc)?.map(ObjectOrReference::Object);

    let responses = build_responses(&classified, doc, registry)?;
    op.responses = Some(responses);

    op.parameters = classified
        .parameters
        .into_iter()
        .map(ObjectOrReference::Object)
        .collect();

    Ok(BuiltOperation {
        route,
        raw_method,
        method,
        is_webhook,
        operation: op,
    })
}

/// Verb selection: an explicit known verb wins; an explicit unknown verb makes an additional
/// operation; otherwise the verb derives from the function name.
fn select_verb(sig: &ParsedSignature, doc: Option<&DocMetadata>) -> (String, Option<Method>) {
    if let Some(verb) = doc.and_then(|doc| doc.verb.as_deref()) {
        return match verb.parse::<Method>() {
            Ok(method) => (verb.to_owned(), Some(method)),
            Err(_) => {
                debug!("method `{verb}` is not a fixed method; using additionalOperations");
                (verb.to_owned(), None)
            }
        };
    }

    let method = derive_verb(&sig.name);
    (method.as_str().to_owned(), Some(method))
}

/// Fixed name-pattern table for verb derivation.
fn derive_verb(name: &str) -> Method {
    if name.starts_with("get_")
        || name.contains("_get")
        || name.ends_with("_read")
        || name.ends_with("_list")
    {
        Method::Get
    } else if name.ends_with("_create") || name.ends_with("_post") || name.ends_with("_add") {
        Method::Post
    } else if name.ends_with("_update") || name.ends_with("_put") || name.ends_with("_replace") {
        Method::Put
    } else if name.ends_with("_delete") || name.ends_with("_remove") {
        Method::Delete
    } else if name.ends_with("_patch") || name.ends_with("_modify") {
        Method::Patch
    } else {
        Method::Post
    }
}

struct ClassifiedArgs {
    parameters: Vec<Parameter>,
    /// `(arg name, referenced struct)` for the struct-pointer body argument.
    struct_body: Option<(String, String)>,
    /// `(name, schema)` pairs aggregated into an inline request body schema.
    body_fields: Vec<(String, Schema)>,
    /// Pointee schema of the first `T**` output argument.
    output: Option<Schema>,
}

/// Classifies arguments in declaration order.
///
/// Per argument: an explicit `@param` wins; `T**` is an output; a struct pointer is the
/// request body; a route placeholder is a path parameter; on bodyless verbs the rest are
/// query parameters, otherwise body fields.
fn classify_arguments(
    sig: &ParsedSignature,
    doc: Option<&DocMetadata>,
    route: &str,
    method: Option<Method>,
    registry: &SchemaRegistry,
) -> Result<ClassifiedArgs, ExtractError> {
    let mut classified = ClassifiedArgs {
        parameters: Vec::new(),
        struct_body: None,
        body_fields: Vec::new(),
        output: None,
    };

    let bodyless = method.is_some_and(|m| m.is_bodyless());

    for arg in &sig.args {
        if let Some(doc_param) = doc.and_then(|doc| doc.params.iter().find(|p| p.name == arg.name))
        {
            if let Some(param) = build_documented_parameter(arg, doc_param, route, registry)? {
                classified.parameters.push(param);
            }
            continue;
        }

        let ty = CType::parse(&arg.type_name);

        if ty.is_output() {
            if classified.output.is_none() {
                classified.output = Some(if registry.is_struct(&ty) {
                    Schema::reference(&registry.struct_name(&ty), false)
                } else {
                    registry.schema_for_type(&pointee_type(&ty))
                });
            }
            continue;
        }

        if ty.pointer_depth >= 1 && registry.is_struct(&ty) {
            let name = registry.struct_name(&ty);
            if classified.struct_body.is_none() {
                classified.struct_body = Some((arg.name.clone(), name));
            } else {
                classified
                    .body_fields
                    .push((arg.name.clone(), Schema::reference(&name, false)));
            }
            continue;
        }

        if route_has_placeholder(route, &arg.name) {
            let mut param = Parameter::new(&arg.name, ParameterIn::Path);
            param.required = Some(true);
            param.schema = Some(registry.schema_for(&arg.type_name));
            classified.parameters.push(param);
            continue;
        }

        if bodyless {
            let mut param = Parameter::new(&arg.name, ParameterIn::Query);
            param.schema = Some(registry.schema_for(&arg.type_name));
            classified.parameters.push(param);
            continue;
        }

        classified
            .body_fields
            .push((arg.name.clone(), registry.schema_for(&arg.type_name)));
    }

    Ok(classified)
}

/// The outermost pointer level of a `T**` argument belongs to the output convention; the
/// response schema describes the pointee.
fn pointee_type(ty: &CType) -> CType {
    let mut pointee = ty.clone();
    pointee.pointer_depth = pointee.pointer_depth.saturating_sub(1);
    pointee
}

fn route_has_placeholder(route: &str, name: &str) -> bool {
    crate::validation::placeholders(route).contains(&name)
}

/// Builds a parameter from an explicit `@param` directive.
///
/// Returns `None` when the parameter is a reserved header, which is dropped silently.
fn build_documented_parameter(
    arg: &ParsedArg,
    doc_param: &DocParam,
    route: &str,
    registry: &SchemaRegistry,
) -> Result<Option<Parameter>, ExtractError> {
    let location = doc_param.location.unwrap_or_else(|| {
        if route_has_placeholder(route, &arg.name) {
            ParameterIn::Path
        } else {
            ParameterIn::Query
        }
    });

    if location == ParameterIn::Header && is_reserved_header(&arg.name) {
        debug!("dropping reserved header parameter `{}`", arg.name);
        return Ok(None);
    }

    let mut param = Parameter::new(&arg.name, location);

    if !doc_param.description.is_empty() {
        param.description = Some(doc_param.description.clone());
    }

    param.required = match location {
        ParameterIn::Path => Some(true),
        _ => doc_param.required,
    };
    param.deprecated = doc_param.deprecated;
    param.explode = doc_param.explode;
    param.allow_reserved = doc_param.allow_reserved;
    param.allow_empty_value = doc_param.allow_empty_value;
    param.example = doc_param.example.clone();

    if let Some(style) = doc_param.style.as_deref() {
        param.style = Some(parse_style(style)?);
    }

    let mut schema = registry.schema_for(&arg.type_name);
    if let Some(format) = &doc_param.format {
        if let Some(object) = schema.object_mut() {
            object.format = Some(format.clone());
        }
    }

    // Querystring parameters always carry their payload through a content map; without an
    // explicit override the default media type stands in.
    let content_type = match (&doc_param.content_type, location) {
        (Some(content_type), _) => Some(content_type.clone()),
        (None, ParameterIn::Querystring) => Some(DEFAULT_MEDIA_TYPE.to_owned()),
        (None, _) => None,
    };

    match content_type {
        Some(content_type) => {
            let mut content = BTreeMap::new();
            content.insert(
                content_type,
                MediaType {
                    schema: Some(schema),
                    ..MediaType::default()
                },
            );
            param.content = Some(content);
        }
        None => param.schema = Some(schema),
    }

    Ok(Some(param))
}

fn parse_style(raw: &str) -> Result<ParameterStyle, ExtractError> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|_| ExtractError::InvalidAnnotation(format!("unknown style `{raw}`")))
}

/// Builds the request body from the struct-pointer argument, aggregated body fields, and the
/// `@requestBody` directive.
fn build_request_body(
    classified: &ClassifiedArgs,
    doc: Option<&DocMetadata>,
) -> Result<Option<RequestBody>, ExtractError> {
    let doc_body = doc.and_then(|doc| doc.request_body.as_ref());

    let schema = if !classified.body_fields.is_empty() {
        // Aggregate loose arguments into one inline object body; a struct-pointer body joins
        // as a property when both forms appear.
        let mut object = ObjectSchema {
            schema_type: Some(SchemaType::Object),
            ..ObjectSchema::default()
        };

        if let Some((arg_name, struct_name)) = &classified.struct_body {
            object
                .properties
                .insert(arg_name.clone(), Schema::reference(struct_name, false));
            object.required.push(arg_name.clone());
        }

        for (name, schema) in &classified.body_fields {
            object.properties.insert(name.clone(), schema.clone());
            object.required.push(name.clone());
        }
        object.required.sort();

        Some(Schema::Object(Box::new(object)))
    } else if let Some((_, struct_name)) = &classified.struct_body {
        Some(Schema::reference(struct_name, false))
    } else {
        None
    };

    if schema.is_none() && doc_body.is_none() {
        return Ok(None);
    }

    let content_type = doc_body
        .and_then(|body| body.content_type.clone())
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned());

    let mut media = MediaType {
        schema,
        ..MediaType::default()
    };
    if let Some(example) = doc_body.and_then(|body| body.example.clone()) {
        media.example = Some(example);
    }

    let mut content = BTreeMap::new();
    content.insert(content_type, media);

    Ok(Some(RequestBody {
        description: doc_body
            .map(|body| body.description.clone())
            .filter(|text| !text.is_empty()),
        content,
        required: Some(
            doc_body
                .and_then(|body| body.required)
                .unwrap_or(true),
        ),
        extensions: Default::default(),
    }))
}

/// Builds the responses map from `@return` directives, the output argument, and the
/// synthesized default.
///
/// Explicit returns take precedence: the output-argument `200` is synthesized only when no
/// explicit 2xx return is present.
fn build_responses(
    classified: &ClassifiedArgs,
    doc: Option<&DocMetadata>,
    _registry: &SchemaRegistry,
) -> Result<BTreeMap<String, ObjectOrReference<Response>>, ExtractError> {
    let mut responses: BTreeMap<String, Response> = BTreeMap::new();

    if let Some(doc) = doc {
        for ret in &doc.returns {
            if !is_valid_status_key(&ret.code) {
                return Err(ExtractError::InvalidAnnotation(format!(
                    "invalid status code `{}`",
                    ret.code
                )));
            }

            let response = responses.entry(ret.code.clone()).or_default();

            if response.description.is_none() && !ret.description.is_empty() {
                response.description = Some(ret.description.clone());
            }
            if response.summary.is_none() {
                response.summary = ret.summary.clone();
            }

            // Repeating a code with different content types expands a multi-content response.
            if let Some(content_type) = &ret.content_type {
                let media = response.content.entry(content_type.clone()).or_default();
                if let Some(example) = &ret.example {
                    media.example = Some(example.clone());
                }
            } else if let Some(example) = &ret.example {
                let media = response
                    .content
                    .entry(DEFAULT_MEDIA_TYPE.to_owned())
                    .or_default();
                media.example = Some(example.clone());
            }
        }

        for header in &doc.response_headers {
            if !is_valid_status_key(&header.status) {
                return Err(ExtractError::InvalidAnnotation(format!(
                    "invalid responseHeader status `{}`",
                    header.status
                )));
            }

            // Content-Type headers are described by the content map itself.
            if header.name.eq_ignore_ascii_case("content-type") {
                warn!("ignoring responseHeader Content-Type");
                continue;
            }

            let response = responses.entry(header.status.clone()).or_default();

            let mut built = Header {
                schema: Some(Schema::of_type(SchemaType::String)),
                ..Header::default()
            };
            if !header.description.is_empty() {
                built.description = Some(header.description.clone());
            }
            for (key, value) in &header.attrs {
                if key == "format" {
                    if let Some(object) = built.schema.as_mut().and_then(Schema::object_mut) {
                        object.format = value.clone();
                    }
                }
            }

            response
                .headers
                .insert(header.name.clone(), ObjectOrReference::Object(built));
        }

        for link in &doc.links {
            if !is_valid_status_key(&link.status) {
                return Err(ExtractError::InvalidAnnotation(format!(
                    "invalid link status `{}`",
                    link.status
                )));
            }

            let response = responses.entry(link.status.clone()).or_default();

            let mut built = Link::default();
            if !link.description.is_empty() {
                built.description = Some(link.description.clone());
            }
            for (key, value) in &link.attrs {
                match key.as_str() {
                    "operationId" => built.operation_id = value.clone(),
                    "operationRef" => built.operation_ref = value.clone(),
                    _ => debug!("ignoring link attribute `{key}`"),
                }
            }

            response
                .links
                .insert(link.name.clone(), ObjectOrReference::Object(built));
        }
    }

    let has_explicit_success = responses
        .keys()
        .any(|code| code.starts_with('2') || code == "default");

    if let Some(output) = &classified.output {
        if !has_explicit_success {
            let mut content = BTreeMap::new();
            content.insert(
                DEFAULT_MEDIA_TYPE.to_owned(),
                MediaType {
                    schema: Some(output.clone()),
                    ..MediaType::default()
                },
            );

            responses.insert(
                "200".to_owned(),
                Response {
                    description: Some(DEFAULT_RESPONSE_DESCRIPTION.to_owned()),
                    content,
                    ..Response::default()
                },
            );
        }
    }

    if responses.is_empty() {
        responses.insert(
            "200".to_owned(),
            Response {
                description: Some(DEFAULT_RESPONSE_DESCRIPTION.to_owned()),
                ..Response::default()
            },
        );
    }

    // Responses synthesized without a description still need one.
    for response in responses.values_mut() {
        if response.description.is_none() {
            response.description = Some(DEFAULT_RESPONSE_DESCRIPTION.to_owned());
        }
    }

    Ok(responses
        .into_iter()
        .map(|(code, response)| (code, ObjectOrReference::Object(response)))
        .collect())
}
