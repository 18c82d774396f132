//! End-to-end extraction scenarios: annotated C sources in, aggregated spec out.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use c2openapi::extract::{
    extract_source, register_types, Aggregator, ExtractError, SchemaRegistry,
};
use c2openapi::spec::{ObjectOrReference, ParameterIn, SchemaType, Spec};
use c2openapi::validation;

fn extract(src: &str) -> Spec {
    let mut registry = SchemaRegistry::new();
    let mut aggregator = Aggregator::new();

    register_types(src, &mut registry);
    extract_source(src, &mut registry, &mut aggregator).unwrap();
    aggregator.register_schemas(&registry);

    aggregator.into_spec()
}

#[test]
fn annotated_getter_yields_path_parameter_operation() {
    let spec = extract(
        r"
/** @route GET /user/{id} */
int api_user_get(int id);
",
    );

    let op = spec.paths.as_ref().unwrap()["/user/{id}"].get.as_ref().unwrap();
    assert_eq!(op.operation_id.as_deref(), Some("api_user_get"));

    let params = &op.parameters;
    assert_eq!(params.len(), 1);
    let ObjectOrReference::Object(param) = &params[0] else {
        panic!("expected inline parameter");
    };

    assert_eq!(param.name, "id");
    assert_eq!(param.location, ParameterIn::Path);
    assert_eq!(param.required, Some(true));

    let schema = param.schema.as_ref().unwrap().object().unwrap();
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
    assert_eq!(schema.format.as_deref(), Some("int32"));

    let responses = op.responses.as_ref().unwrap();
    assert_eq!(responses.len(), 1);
    let ObjectOrReference::Object(response) = &responses["200"] else {
        panic!("expected inline response");
    };
    assert_eq!(response.description.as_deref(), Some("Success"));
}

#[test]
fn undocumented_create_function_builds_struct_request_body() {
    let spec = extract(
        r"
struct Pet {
    long id;
    char *name;
};

int api_pet_create(const struct Pet *p);
",
    );

    let op = spec.paths.as_ref().unwrap()["/api_pet_create"]
        .post
        .as_ref()
        .unwrap();
    assert!(op.parameters.is_empty());

    let ObjectOrReference::Object(body) = op.request_body.as_ref().unwrap() else {
        panic!("expected inline request body");
    };
    assert_eq!(body.required, Some(true));

    let media = &body.content["application/json"];
    assert_eq!(media.schema.as_ref().unwrap().ref_name(), Some("Pet"));

    // The struct registers as a named component schema.
    assert!(spec
        .components
        .as_ref()
        .unwrap()
        .schemas
        .contains_key("Pet"));
}

#[test]
fn undocumented_output_argument_synthesizes_success_response() {
    let spec = extract(
        r"
struct Obj {
    int value;
};

int get_obj(struct Obj **out);
",
    );

    let op = spec.paths.as_ref().unwrap()["/get_obj"].get.as_ref().unwrap();
    assert!(op.parameters.is_empty());
    assert!(op.request_body.is_none());

    let responses = op.responses.as_ref().unwrap();
    let ObjectOrReference::Object(response) = &responses["200"] else {
        panic!("expected inline response");
    };

    let media = &response.content["application/json"];
    assert_eq!(media.schema.as_ref().unwrap().ref_name(), Some("Obj"));
}

#[test]
fn duplicate_route_verb_pairs_do_not_merge() {
    let src = r"
/** @route GET /pets */
int list_pets(void);

/** @route GET /pets */
int list_pets_again(void);
";

    let mut registry = SchemaRegistry::new();
    let mut aggregator = Aggregator::new();

    let err = extract_source(src, &mut registry, &mut aggregator).unwrap_err();
    assert_matches!(err, ExtractError::DuplicateOperation { .. });
}

#[test]
fn webhook_operations_aggregate_under_webhooks() {
    let spec = extract(
        r"
/** @webhook POST /new-pet */
int on_new_pet(void);
",
    );

    assert!(spec.paths.as_ref().unwrap().is_empty());
    let hook = &spec.webhooks.as_ref().unwrap()["/new-pet"];
    assert!(hook.post.is_some());
}

#[test]
fn document_directives_populate_info_servers_and_security() {
    let spec = extract(
        r"
/**
 * @infoTitle Pet Store
 * @infoVersion 2.0.0
 * @license [name:MIT] [identifier:MIT]
 * @server https://{region}.example.com/v2 [name=prod]
 * @serverVar region [default:eu] [enum:eu,us]
 * @securityScheme api_key [type:apiKey] [in:header] [name:X-Api-Key] api key auth
 */

/** @route GET /pets
 *  @security api_key
 */
int pets_list(void);
",
    );

    assert_eq!(spec.info.title, "Pet Store");
    assert_eq!(spec.info.version, "2.0.0");
    assert_eq!(spec.info.license.as_ref().unwrap().identifier.as_deref(), Some("MIT"));

    assert_eq!(spec.servers.len(), 1);
    let server = &spec.servers[0];
    assert_eq!(server.url, "https://{region}.example.com/v2");
    assert_eq!(server.variables["region"].default.as_deref(), Some("eu"));

    assert!(spec
        .components
        .as_ref()
        .unwrap()
        .security_schemes
        .contains_key("api_key"));

    let op = spec.paths.as_ref().unwrap()["/pets"].get.as_ref().unwrap();
    let security = op.security.as_ref().unwrap();
    assert_eq!(security.len(), 1);
    assert!(security[0].contains_key("api_key"));
}

#[test]
fn explicit_returns_expand_multi_content_responses() {
    let spec = extract(
        r"
/**
 * @route GET /pets/{id}
 * @param id [in:path] pet id
 * @return 200 [contentType:application/json] the pet
 * @return 200 [contentType:application/xml] the pet
 * @return 404 no such pet
 */
int pet_get(long id);
",
    );

    let op = spec.paths.as_ref().unwrap()["/pets/{id}"].get.as_ref().unwrap();
    let responses = op.responses.as_ref().unwrap();

    let ObjectOrReference::Object(ok) = &responses["200"] else {
        panic!("expected inline response");
    };
    assert_eq!(ok.content.len(), 2);
    assert!(ok.content.contains_key("application/json"));
    assert!(ok.content.contains_key("application/xml"));

    let ObjectOrReference::Object(missing) = &responses["404"] else {
        panic!("expected inline response");
    };
    assert_eq!(missing.description.as_deref(), Some("no such pet"));
}

#[test]
fn querystring_parameters_extract_with_a_content_map() {
    let spec = extract(
        r"
/**
 * @route POST /search
 * @param q [in:querystring] whole query payload
 */
int search(char *q);
",
    );

    validation::validate(&spec).unwrap();

    let op = spec.paths.as_ref().unwrap()["/search"].post.as_ref().unwrap();
    let ObjectOrReference::Object(param) = &op.parameters[0] else {
        panic!("expected inline parameter");
    };

    assert_eq!(param.location, ParameterIn::Querystring);
    assert!(param.schema.is_none());
    assert!(param
        .content
        .as_ref()
        .unwrap()
        .contains_key("application/json"));

    // The emitted document passes the loader's querystring shape rules too.
    let loaded = c2openapi::from_json(&c2openapi::to_json(&spec).unwrap()).unwrap();
    validation::validate(&loaded).unwrap();
}

#[test]
fn enum_arguments_map_to_string_enums() {
    let spec = extract(
        r"
enum Color { RED, GREEN, BLUE };

/** @route GET /items */
int items_list(enum Color color);
",
    );

    let op = spec.paths.as_ref().unwrap()["/items"].get.as_ref().unwrap();
    let ObjectOrReference::Object(param) = &op.parameters[0] else {
        panic!("expected inline parameter");
    };

    let schema = param.schema.as_ref().unwrap().object().unwrap();
    assert_eq!(schema.schema_type, Some(SchemaType::String));
    assert_eq!(schema.enum_values.len(), 3);
}

#[test]
fn extracted_specs_validate_and_reload() {
    let spec = extract(
        r"
struct Pet {
    long id;
    char *name;
};

/** @route GET /pets/{id} */
int api_pet_get(long id);

/** @route POST /pets */
int api_pet_create(const struct Pet *p);

/** @route PURGE /cache */
int cache_flush(void);
",
    );

    validation::validate(&spec).unwrap();

    // The emitted document is itself loadable, and survives a load round trip.
    let json = c2openapi::to_json(&spec).unwrap();
    let loaded = c2openapi::from_json(&json).unwrap();
    validation::validate(&loaded).unwrap();

    let item = &loaded.paths.as_ref().unwrap()["/cache"];
    assert!(item.additional_operations.contains_key("PURGE"));

    let reloaded = c2openapi::from_json(&c2openapi::to_json(&loaded).unwrap()).unwrap();
    assert_eq!(loaded, reloaded);
}
