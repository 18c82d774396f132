use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    spec_extensions, Callback, Example, Header, Link, MediaType, ObjectOrReference, Parameter,
    PathItem, RequestBody, Response, Schema, SecurityScheme,
};

/// Holds a set of reusable objects for different aspects of the OAS.
///
/// All objects defined within the components object will have no effect on the API unless they
/// are explicitly referenced from properties outside the components object.
///
/// Sub-maps appear in serialized documents in field order below.
///
/// See <https://spec.openapis.org/oas/v3.2.0#components-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Components {
    /// An object to hold reusable [Schema Objects](Schema).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,

    /// An object to hold reusable [Parameter Objects](Parameter).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ObjectOrReference<Parameter>>,

    /// An object to hold reusable [Response Objects](Response).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ObjectOrReference<Response>>,

    /// An object to hold reusable [Header Objects](Header).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ObjectOrReference<Header>>,

    /// An object to hold reusable [Request Body Objects](RequestBody).
    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub request_bodies: BTreeMap<String, ObjectOrReference<RequestBody>>,

    /// An object to hold reusable [Media Type Objects](MediaType).
    #[serde(
        rename = "mediaTypes",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub media_types: BTreeMap<String, MediaType>,

    /// An object to hold reusable [Example Objects](Example).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, ObjectOrReference<Example>>,

    /// An object to hold reusable [Link Objects](Link).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, ObjectOrReference<Link>>,

    /// An object to hold reusable [Callback Objects](Callback).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callbacks: BTreeMap<String, ObjectOrReference<Callback>>,

    /// An object to hold reusable [Path Item Objects](PathItem).
    #[serde(
        rename = "pathItems",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub path_items: BTreeMap<String, ObjectOrReference<PathItem>>,

    /// An object to hold reusable [Security Scheme Objects](SecurityScheme).
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub security_schemes: BTreeMap<String, ObjectOrReference<SecurityScheme>>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Components {
    /// Iterates over every component map key for structural key validation, paired with the
    /// component kind's serialized map name.
    pub fn keys_by_kind(&self) -> impl Iterator<Item = (&'static str, &String)> {
        let schemas = self.schemas.keys().map(|k| ("schemas", k));
        let parameters = self.parameters.keys().map(|k| ("parameters", k));
        let responses = self.responses.keys().map(|k| ("responses", k));
        let headers = self.headers.keys().map(|k| ("headers", k));
        let request_bodies = self.request_bodies.keys().map(|k| ("requestBodies", k));
        let media_types = self.media_types.keys().map(|k| ("mediaTypes", k));
        let examples = self.examples.keys().map(|k| ("examples", k));
        let links = self.links.keys().map(|k| ("links", k));
        let callbacks = self.callbacks.keys().map(|k| ("callbacks", k));
        let path_items = self.path_items.keys().map(|k| ("pathItems", k));
        let security_schemes = self.security_schemes.keys().map(|k| ("securitySchemes", k));

        schemas
            .chain(parameters)
            .chain(responses)
            .chain(headers)
            .chain(request_bodies)
            .chain(media_types)
            .chain(examples)
            .chain(links)
            .chain(callbacks)
            .chain(path_items)
            .chain(security_schemes)
    }
}
