use std::collections::BTreeMap;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    spec_extensions, Callback, ExternalDoc, ObjectOrReference, Parameter, RequestBody, Response,
    SecurityRequirement, Server, Spec,
};

/// A fixed HTTP request method with its own slot in a Path Item Object.
///
/// Custom methods live in a path item's `additionalOperations` map instead and keep their raw
/// spelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// HTTP GET.
    Get,

    /// HTTP PUT.
    Put,

    /// HTTP POST.
    Post,

    /// HTTP DELETE.
    Delete,

    /// HTTP OPTIONS.
    Options,

    /// HTTP HEAD.
    Head,

    /// HTTP PATCH.
    Patch,

    /// HTTP TRACE.
    Trace,

    /// HTTP QUERY (safe, idempotent method with a request body).
    Query,
}

impl Method {
    /// All fixed methods, in path-item field order.
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Patch,
        Method::Trace,
        Method::Query,
    ];

    /// Uppercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
            Self::Query => "QUERY",
        }
    }

    /// True for methods whose requests conventionally carry no body; undocumented function
    /// arguments on these methods classify as query parameters.
    pub fn is_bodyless(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Delete)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "PUT" => Self::Put,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            "HEAD" => Self::Head,
            "PATCH" => Self::Patch,
            "TRACE" => Self::Trace,
            "QUERY" => Self::Query,
            _ => return Err(UnknownMethod(s.to_owned())),
        })
    }
}

/// Method name outside the fixed set.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unknown method: {_0}")]
pub struct UnknownMethod(#[error(not(source))] pub String);

/// Describes a single API operation on a path.
///
/// See <https://spec.openapis.org/oas/v3.2.0#operation-object>.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Operation {
    /// A list of tags for API documentation control.
    ///
    /// Tags can be used for logical grouping of operations by resources or any other qualifier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// A short summary of what the operation does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A verbose explanation of the operation behavior.
    ///
    /// [CommonMark syntax](https://spec.commonmark.org) MAY be used for rich text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Additional external documentation for this operation.
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDoc>,

    /// String used to uniquely identify the operation within this spec.
    ///
    /// The ID MUST be unique among all operations described in the API. Tools and libraries MAY
    /// use the operation ID to uniquely identify an operation, therefore, it is RECOMMENDED to
    /// follow common programming naming conventions.
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// A list of parameters that are applicable for this operation.
    ///
    /// If a parameter is already defined at the Path Item, the new definition will override it
    /// but can never remove it. The list MUST NOT include duplicated parameters. A unique
    /// parameter is defined by a combination of a name and location.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ObjectOrReference<Parameter>>,

    /// The request body applicable for this operation.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ObjectOrReference<RequestBody>>,

    /// The list of possible responses as they are returned from executing this operation.
    ///
    /// The container maps an HTTP response code to the expected response. It MUST contain at
    /// least one response code, and it SHOULD be the response for a successful operation call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<BTreeMap<String, ObjectOrReference<Response>>>,

    /// A map of possible out-of-band callbacks related to the parent operation.
    ///
    /// The key is a unique identifier for the Callback Object. Each value in the map is a
    /// Callback Object that describes a request that may be initiated by the API provider and
    /// the expected responses.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callbacks: BTreeMap<String, ObjectOrReference<Callback>>,

    /// Declares this operation to be deprecated.
    ///
    /// Consumers SHOULD refrain from usage of the declared operation. Default value is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// A declaration of which security mechanisms can be used for this operation.
    ///
    /// Only one of the Security Requirement Objects need to be satisfied to authorize a
    /// request. This definition overrides any declared top-level security. To remove a
    /// top-level security declaration, an empty array can be used; absent means inherit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    /// An alternative `servers` array to service this operation.
    ///
    /// If a `servers` array is specified at the Path Item Object or Root level, it will be
    /// overridden by this value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// Specification extensions.
    ///
    /// Only "x-" prefixed keys are collected, and the prefix is stripped.
    ///
    /// See <https://spec.openapis.org/oas/v3.1.1#specification-extensions>.
    #[serde(flatten, with = "spec_extensions")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Operation {
    /// Resolves and returns this operation's request body.
    pub fn request_body(&self, spec: &Spec) -> Result<Option<RequestBody>, super::Error> {
        let Some(req_body) = self.request_body.as_ref() else {
            return Ok(None);
        };

        let req_body = req_body.resolve(spec).map_err(super::Error::Ref)?;

        Ok(Some(req_body))
    }

    /// Resolves and returns map of this operation's responses, keyed by status code.
    pub fn responses(&self, spec: &Spec) -> BTreeMap<String, Response> {
        self.responses
            .iter()
            .flatten()
            .filter_map(|(name, oor)| {
                oor.resolve(spec)
                    .map(|obj| (name.clone(), obj))
                    .map_err(|err| log::error!("{err}"))
                    .ok()
            })
            .collect()
    }

    /// Resolves and returns list of this operation's parameters.
    pub fn parameters(&self, spec: &Spec) -> Result<Vec<Parameter>, super::Error> {
        let params = self
            .parameters
            .iter()
            .filter_map(|oor| oor.resolve(spec).map_err(|err| log::error!("{err}")).ok())
            .collect();

        Ok(params)
    }

    /// Finds, resolves, and returns one of this operation's parameters by name.
    pub fn parameter(&self, search: &str, spec: &Spec) -> Result<Option<Parameter>, super::Error> {
        let param = self
            .parameters(spec)?
            .iter()
            .find(|param| param.name == search)
            .cloned();

        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn custom_method_is_rejected() {
        assert_eq!(
            "PURGE".parse::<Method>(),
            Err(UnknownMethod("PURGE".to_owned()))
        );
    }

    #[test]
    fn bodyless_methods() {
        assert!(Method::Get.is_bodyless());
        assert!(Method::Head.is_bodyless());
        assert!(Method::Delete.is_bodyless());
        assert!(!Method::Post.is_bodyless());
        assert!(!Method::Query.is_bodyless());
    }
}
