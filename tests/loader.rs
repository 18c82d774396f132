//! Document loading and semantic validation scenarios.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;

use c2openapi::loader::{load_document, DocRegistry, LoadError, LoadOptions};
use c2openapi::spec::{ObjectOrReference, Spec};
use c2openapi::validation::{validate, ValidationError};
use c2openapi::ErrorKind;

fn load(root: serde_json::Value) -> Spec {
    load_document(root, LoadOptions::default()).unwrap()
}

fn shell(paths: serde_json::Value) -> serde_json::Value {
    json!({
        "openapi": "3.1.0",
        "info": { "title": "t", "version": "1" },
        "paths": paths
    })
}

#[test]
fn duplicate_operation_ids_conflict() {
    let spec = load(shell(json!({
        "/a": {
            "get": { "operationId": "foo", "responses": { "200": { "description": "ok" } } }
        },
        "/b": {
            "get": { "operationId": "foo", "responses": { "200": { "description": "ok" } } }
        }
    })));

    let err = validate(&spec).unwrap_err();
    assert_eq!(err, ValidationError::DuplicateOperationId("foo".to_owned()));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn path_template_conformance() {
    let good = load(shell(json!({
        "/a/{id}/b": {
            "parameters": [
                { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
            ],
            "get": { "responses": { "200": { "description": "ok" } } }
        }
    })));
    assert_matches!(validate(&good), Ok(()));

    // Renaming the placeholder without updating the parameter is a semantic failure.
    let bad = load(shell(json!({
        "/a/{uid}/b": {
            "parameters": [
                { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
            ],
            "get": { "responses": { "200": { "description": "ok" } } }
        }
    })));

    let err = validate(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Semantic);
}

#[test]
fn path_parameters_must_be_required() {
    let spec = load(shell(json!({
        "/a/{id}": {
            "get": {
                "parameters": [
                    { "name": "id", "in": "path", "schema": { "type": "string" } }
                ],
                "responses": { "200": { "description": "ok" } }
            }
        }
    })));

    assert_matches!(
        validate(&spec),
        Err(ValidationError::PathParameterNotRequired { .. })
    );
}

#[test]
fn normalized_route_collisions_conflict() {
    let spec = load(shell(json!({
        "/a/{x}": { "get": { "responses": { "200": { "description": "ok" } } } },
        "/a/{y}": { "get": { "responses": { "200": { "description": "ok" } } } }
    })));

    let err = validate(&spec).unwrap_err();
    assert_matches!(err, ValidationError::PathCollision { .. });
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn oauth2_flow_urls_are_required() {
    let complete = json!({
        "openapi": "3.1.0",
        "info": { "title": "t", "version": "1" },
        "components": {
            "securitySchemes": {
                "auth": {
                    "type": "oauth2",
                    "flows": {
                        "authorizationCode": {
                            "authorizationUrl": "https://example.com/authorize",
                            "tokenUrl": "https://example.com/token",
                            "scopes": {}
                        }
                    }
                }
            }
        }
    });

    let spec = load(complete.clone());
    assert_matches!(validate(&spec), Ok(()));

    let mut incomplete = complete;
    incomplete["components"]["securitySchemes"]["auth"]["flows"]["authorizationCode"]
        .as_object_mut()
        .unwrap()
        .remove("tokenUrl");

    let err = load_document(incomplete, LoadOptions::default()).unwrap_err();
    assert_matches!(err, LoadError::Json(_));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn querystring_excludes_query_parameters() {
    let spec = load(shell(json!({
        "/search": {
            "get": {
                "parameters": [
                    {
                        "name": "q",
                        "in": "querystring",
                        "content": {
                            "application/x-www-form-urlencoded": {
                                "schema": { "type": "object" }
                            }
                        }
                    },
                    { "name": "page", "in": "query", "schema": { "type": "integer" } }
                ],
                "responses": { "200": { "description": "ok" } }
            }
        }
    })));

    let err = validate(&spec).unwrap_err();
    assert_matches!(err, ValidationError::QuerystringConflict(_));
}

#[test]
fn querystring_requires_content() {
    let err = load_document(
        shell(json!({
            "/search": {
                "get": {
                    "parameters": [
                        { "name": "q", "in": "querystring", "schema": { "type": "object" } }
                    ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        })),
        LoadOptions::default(),
    )
    .unwrap_err();

    assert_matches!(err, LoadError::QuerystringNeedsContent(_));
}

#[test]
fn component_references_inline_and_round_trip() {
    let doc = json!({
        "openapi": "3.1.0",
        "info": { "title": "t", "version": "1" },
        "components": {
            "parameters": {
                "PageSize": {
                    "name": "limit",
                    "in": "query",
                    "schema": { "type": "integer" }
                }
            }
        },
        "paths": {
            "/pets": {
                "get": {
                    "parameters": [ { "$ref": "#/components/parameters/PageSize" } ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    });

    let spec = load(doc);

    let op = spec.paths.as_ref().unwrap()["/pets"].get.as_ref().unwrap();
    let oor = &op.parameters[0];

    // The `$ref` is retained while the resolved copy sits alongside.
    assert_eq!(oor.ref_path(), Some("#/components/parameters/PageSize"));
    assert_eq!(oor.as_object().unwrap().name, "limit");

    let value = c2openapi::to_json_value(&spec).unwrap();
    assert_eq!(
        value["paths"]["/pets"]["get"]["parameters"][0]["$ref"],
        json!("#/components/parameters/PageSize")
    );
}

#[test]
fn unresolvable_references_are_fatal() {
    let err = load_document(
        shell(json!({
            "/pets": {
                "get": {
                    "parameters": [ { "$ref": "#/components/parameters/Missing" } ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        })),
        LoadOptions::default(),
    )
    .unwrap_err();

    assert_matches!(err, LoadError::Ref(..));
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn inline_object_bodies_promote_to_named_schemas() {
    let spec = load(shell(json!({
        "/pets": {
            "post": {
                "operationId": "createPet",
                "requestBody": {
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "properties": { "name": { "type": "string" } }
                            }
                        }
                    }
                },
                "responses": { "200": { "description": "ok" } }
            }
        }
    })));

    let components = spec.components.as_ref().unwrap();
    assert!(components.schemas.contains_key("createPet_request"));

    let op = spec.paths.as_ref().unwrap()["/pets"].post.as_ref().unwrap();
    let ObjectOrReference::Object(body) = op.request_body.as_ref().unwrap() else {
        panic!("expected inline request body");
    };
    let schema = body.content["application/json"].schema.as_ref().unwrap();
    assert_eq!(schema.ref_name(), Some("createPet_request"));
}

#[test]
fn example_and_examples_conflict() {
    let err = load_document(
        shell(json!({
            "/pets": {
                "get": {
                    "parameters": [
                        {
                            "name": "q",
                            "in": "query",
                            "schema": { "type": "string" },
                            "example": "x",
                            "examples": { "one": { "value": "x" } }
                        }
                    ],
                    "responses": { "200": { "description": "ok" } }
                }
            }
        })),
        LoadOptions::default(),
    )
    .unwrap_err();

    assert_matches!(err, LoadError::ExampleConflict(_));
    assert_eq!(err.kind(), ErrorKind::Style);
}

#[test]
fn registry_resolves_cross_document_references() {
    let mut registry = DocRegistry::new();

    let common = json!({
        "openapi": "3.1.0",
        "$self": "https://example.com/common.json",
        "info": { "title": "common", "version": "1" },
        "components": {
            "responses": {
                "NotFound": { "description": "missing" }
            }
        }
    });
    registry.load_and_publish(common, None).unwrap();

    let api = json!({
        "openapi": "3.1.0",
        "$self": "https://example.com/api.json",
        "info": { "title": "api", "version": "1" },
        "paths": {
            "/pets/{id}": {
                "get": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true,
                          "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "404": { "$ref": "common.json#/components/responses/NotFound" },
                        "200": { "description": "ok" }
                    }
                }
            }
        }
    });

    let spec = registry.load_and_publish(api, None).unwrap();

    let op = spec.paths.as_ref().unwrap()["/pets/{id}"].get.as_ref().unwrap();
    let not_found = &op.responses.as_ref().unwrap()["404"];
    assert_eq!(
        not_found.as_object().unwrap().description.as_deref(),
        Some("missing")
    );
}

#[test]
fn duplicate_base_uris_conflict() {
    let mut registry = DocRegistry::new();

    let doc = json!({
        "openapi": "3.1.0",
        "$self": "https://example.com/api.json",
        "info": { "title": "t", "version": "1" },
        "paths": {}
    });

    registry.load_and_publish(doc.clone(), None).unwrap();
    let err = registry.load_and_publish(doc, None).unwrap_err();

    assert_matches!(err, LoadError::DuplicateBaseUri(_));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn references_into_unregistered_documents_fail() {
    let err = load_document(
        json!({
            "openapi": "3.1.0",
            "$self": "https://example.com/api.json",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [
                            { "$ref": "https://elsewhere.example/x.json#/components/parameters/P" }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        }),
        LoadOptions::default(),
    )
    .unwrap_err();

    assert_matches!(err, LoadError::UnregisteredDocument(..));
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn serialize_load_is_idempotent() {
    let doc = json!({
        "openapi": "3.1.0",
        "info": { "title": "Round Trip", "version": "1.2.3" },
        "tags": [
            { "name": "root" },
            { "name": "child", "parent": "root" }
        ],
        "servers": [
            {
                "url": "https://{region}.example.com",
                "variables": { "region": { "default": "eu", "enum": ["eu", "us"] } }
            }
        ],
        "paths": {
            "/pets/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true,
                      "schema": { "type": "integer", "format": "int64" } }
                ],
                "get": {
                    "operationId": "getPet",
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Pet" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "friends": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Pet" }
                        }
                    }
                }
            }
        },
        "x-vendor": { "note": "kept" }
    });

    let first = load(doc);
    validate(&first).unwrap();

    let second = load(
        serde_json::from_str(&c2openapi::to_json(&first).unwrap()).unwrap(),
    );

    assert_eq!(first, second);
}

#[test]
fn self_referential_schemas_resolve_by_name() {
    let spec = load(json!({
        "openapi": "3.1.0",
        "info": { "title": "t", "version": "1" },
        "components": {
            "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "next": { "$ref": "#/components/schemas/Node" }
                    }
                }
            }
        }
    }));

    let node = spec.schema("Node").unwrap().object().unwrap();
    let next = node.properties["next"].object().unwrap();
    assert_eq!(next.ref_name.as_deref(), Some("Node"));

    // Name-based resolution terminates despite the cycle.
    let resolved = node.properties["next"].resolve(&spec).unwrap();
    assert_eq!(resolved.object().unwrap().properties.len(), 1);
}
