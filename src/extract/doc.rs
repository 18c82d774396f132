//! Doc-comment annotation parsing into [`DocMetadata`].
//!
//! A comment's lines are scanned one by one: lines whose first non-whitespace character is
//! `@` or `\` carry a directive; other lines continue the field the previous directive
//! started, or are discarded. Unknown directives are silently ignored.

use log::debug;
use serde_json::Value;

use crate::spec::ParameterIn;

/// A single `[key]`, `[key:value]`, or `[key=value]` attribute.
pub type Attr = (String, Option<String>);

/// Parameter-shaped directive payload (`@param`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocParam {
    /// Argument name the directive binds to.
    pub name: String,

    /// Explicit location from `[in:<loc>]`.
    pub location: Option<ParameterIn>,

    /// `[required]` flag.
    pub required: Option<bool>,

    /// `[contentType:<mt>]`, switching the parameter to a content map.
    pub content_type: Option<String>,

    /// `[style:<s>]`.
    pub style: Option<String>,

    /// `[explode]` flag.
    pub explode: Option<bool>,

    /// `[allowReserved]` flag.
    pub allow_reserved: Option<bool>,

    /// `[allowEmptyValue]` flag.
    pub allow_empty_value: Option<bool>,

    /// `[format:<fmt>]` schema format override.
    pub format: Option<String>,

    /// `[deprecated]` flag.
    pub deprecated: Option<bool>,

    /// `[example:<json>]`.
    pub example: Option<Value>,

    /// Trailing description text.
    pub description: String,
}

/// Response-shaped directive payload (`@return` / `@returns`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocReturn {
    /// Status code key.
    pub code: String,

    /// `[contentType:<mt>]`.
    pub content_type: Option<String>,

    /// `[summary:<text>]`.
    pub summary: Option<String>,

    /// `[example:<json>]`.
    pub example: Option<Value>,

    /// Trailing description text.
    pub description: String,
}

/// `@responseHeader <status> <name> ...` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocResponseHeader {
    /// Status code key the header attaches to.
    pub status: String,

    /// Header name.
    pub name: String,

    /// Remaining attributes (e.g. `format`).
    pub attrs: Vec<Attr>,

    /// Trailing description text.
    pub description: String,
}

/// `@link <status> <name> ...` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocLink {
    /// Status code key the link attaches to.
    pub status: String,

    /// Link name.
    pub name: String,

    /// Remaining attributes (`operationId`, `operationRef`, ...).
    pub attrs: Vec<Attr>,

    /// Trailing description text.
    pub description: String,
}

/// `@security <scheme> [scope1, scope2]` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocSecurity {
    /// Security scheme name.
    pub scheme: String,

    /// Required scopes.
    pub scopes: Vec<String>,
}

/// `@securityScheme <name> [attrs...]` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocSecurityScheme {
    /// Component name for the scheme.
    pub name: String,

    /// Scheme construction attributes (`type`, `in`, `scheme`, `bearerFormat`, ...).
    pub attrs: Vec<Attr>,

    /// Trailing description text.
    pub description: String,
}

/// `@serverVar <name> [default:...] [enum:...] [description:...]` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocServerVar {
    /// Variable name.
    pub name: String,

    /// Default substitution value.
    pub default: Option<String>,

    /// Allowed values.
    pub enum_values: Vec<String>,

    /// Description.
    pub description: Option<String>,
}

/// `@server <url> [name=...] [description=...]` payload.
///
/// Subsequent `@serverVar` directives attach to the most recent server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocServer {
    /// Server URL template.
    pub url: String,

    /// Unique server name.
    pub name: Option<String>,

    /// Description.
    pub description: Option<String>,

    /// Variables attached by later `@serverVar` directives.
    pub variables: Vec<DocServerVar>,
}

/// `@requestBody [attrs...] <desc>` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocRequestBody {
    /// `[required]` flag.
    pub required: Option<bool>,

    /// `[contentType:<mt>]`.
    pub content_type: Option<String>,

    /// `[example:<json>]`.
    pub example: Option<Value>,

    /// Trailing description text.
    pub description: String,
}

/// `@tagMeta <name> [attrs...]` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocTagMeta {
    /// Tag name.
    pub name: String,

    /// Tag construction attributes (`description`, `parent`, `kind`, `summary`).
    pub attrs: Vec<Attr>,
}

/// Document info fields gathered from `@infoTitle`-family directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocInfo {
    /// `@infoTitle` text.
    pub title: Option<String>,

    /// `@infoVersion` text.
    pub version: Option<String>,

    /// `@infoSummary` text.
    pub summary: Option<String>,

    /// `@infoDescription` text.
    pub description: Option<String>,

    /// `@termsOfService` text.
    pub terms_of_service: Option<String>,
}

/// The structured form of a parsed doc-comment block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocMetadata {
    /// Verb from `@route`/`@webhook`, uppercased as written.
    pub verb: Option<String>,

    /// Path template from `@route`/`@webhook`.
    pub route: Option<String>,

    /// True when the route was declared with `@webhook`.
    pub is_webhook: bool,

    /// `@operationId` override.
    pub operation_id: Option<String>,

    /// `@summary` / `@brief` text.
    pub summary: Option<String>,

    /// `@description` / `@details` text.
    pub description: Option<String>,

    /// `@deprecated` flag.
    pub deprecated: Option<bool>,

    /// Accumulated `@tag` / `@tags` names.
    pub tags: Vec<String>,

    /// `@externalDocs <url> [desc]`.
    pub external_docs: Option<(String, Option<String>)>,

    /// `@param` directives in source order.
    pub params: Vec<DocParam>,

    /// `@return` / `@returns` directives in source order.
    pub returns: Vec<DocReturn>,

    /// `@responseHeader` directives.
    pub response_headers: Vec<DocResponseHeader>,

    /// `@link` directives.
    pub links: Vec<DocLink>,

    /// `@security` directives.
    pub security: Vec<DocSecurity>,

    /// `@securityScheme` directives.
    pub security_schemes: Vec<DocSecurityScheme>,

    /// `@server` directives, each owning its `@serverVar`s.
    pub servers: Vec<DocServer>,

    /// `@requestBody` directive.
    pub request_body: Option<DocRequestBody>,

    /// Info-level directives.
    pub info: DocInfo,

    /// `@contact` attributes.
    pub contact: Vec<Attr>,

    /// `@license` attributes.
    pub license: Vec<Attr>,

    /// `@tagMeta` directives.
    pub tag_meta: Vec<DocTagMeta>,
}

/// Field the next continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Continuation {
    None,
    Summary,
    Description,
    Param,
    Return,
    RequestBody,
}

impl DocMetadata {
    /// Parses the raw text of a comment into its structured form.
    pub fn parse(comment: &str) -> Self {
        let mut meta = Self::default();
        let mut continuation = Continuation::None;

        for raw_line in comment.lines() {
            let line = strip_decoration(raw_line);

            let Some(directive) = line.strip_prefix(['@', '\\']) else {
                if !line.is_empty() {
                    meta.append_continuation(continuation, line);
                }
                continue;
            };

            let name_len = directive
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(directive.len());
            let (name, rest) = directive.split_at(name_len);
            let rest = rest.trim();

            continuation = meta.dispatch(name, rest);
        }

        meta
    }

    fn dispatch(&mut self, name: &str, rest: &str) -> Continuation {
        match name {
            "route" => {
                self.parse_route(rest);
                Continuation::None
            }
            "webhook" => {
                self.parse_route(rest);
                self.is_webhook = true;
                Continuation::None
            }
            "param" => {
                let (param_name, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                let mut param = DocParam {
                    name: param_name.to_owned(),
                    description,
                    ..DocParam::default()
                };

                for (key, value) in attrs {
                    match key.as_str() {
                        "in" => param.location = value.as_deref().and_then(|v| v.parse().ok()),
                        "required" => param.required = Some(parse_bool(value.as_deref())),
                        "contentType" => param.content_type = value,
                        "style" => param.style = value,
                        "explode" => param.explode = Some(parse_bool(value.as_deref())),
                        "allowReserved" => {
                            param.allow_reserved = Some(parse_bool(value.as_deref()))
                        }
                        "allowEmptyValue" => {
                            param.allow_empty_value = Some(parse_bool(value.as_deref()))
                        }
                        "format" => param.format = value,
                        "deprecated" => param.deprecated = Some(parse_bool(value.as_deref())),
                        "example" => param.example = value.as_deref().map(parse_example),
                        _ => debug!("ignoring param attribute `{key}`"),
                    }
                }

                self.params.push(param);
                Continuation::Param
            }
            "return" | "returns" => {
                let (code, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                let mut ret = DocReturn {
                    code: code.to_owned(),
                    description,
                    ..DocReturn::default()
                };

                for (key, value) in attrs {
                    match key.as_str() {
                        "contentType" => ret.content_type = value,
                        "summary" => ret.summary = value,
                        "example" => ret.example = value.as_deref().map(parse_example),
                        _ => debug!("ignoring return attribute `{key}`"),
                    }
                }

                self.returns.push(ret);
                Continuation::Return
            }
            "responseHeader" => {
                let (status, rest) = split_word(rest);
                let (header_name, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                self.response_headers.push(DocResponseHeader {
                    status: status.to_owned(),
                    name: header_name.to_owned(),
                    attrs,
                    description,
                });
                Continuation::None
            }
            "link" => {
                let (status, rest) = split_word(rest);
                let (link_name, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                self.links.push(DocLink {
                    status: status.to_owned(),
                    name: link_name.to_owned(),
                    attrs,
                    description,
                });
                Continuation::None
            }
            "summary" | "brief" => {
                self.summary = Some(rest.to_owned());
                Continuation::Summary
            }
            "description" | "details" => {
                self.description = Some(rest.to_owned());
                Continuation::Description
            }
            "operationId" => {
                let (id, _) = split_word(rest);
                self.operation_id = Some(id.to_owned());
                Continuation::None
            }
            "tag" | "tags" => {
                self.tags.extend(split_csv(rest));
                Continuation::None
            }
            "deprecated" => {
                let (word, _) = split_word(rest);
                self.deprecated = Some(if word.is_empty() {
                    true
                } else {
                    parse_bool(Some(word))
                });
                Continuation::None
            }
            "externalDocs" => {
                let (url, desc) = split_word(rest);
                let desc = (!desc.is_empty()).then(|| desc.to_owned());
                self.external_docs = Some((url.to_owned(), desc));
                Continuation::None
            }
            "security" => {
                let (scheme, rest) = split_word(rest);
                let (attrs, _) = parse_attrs(rest);

                // Scopes ride in one bracket group as a CSV list.
                let scopes = attrs
                    .into_iter()
                    .flat_map(|(key, value)| match value {
                        Some(value) => split_csv(&format!("{key}:{value}")),
                        None => split_csv(&key),
                    })
                    .collect();

                self.security.push(DocSecurity {
                    scheme: scheme.to_owned(),
                    scopes,
                });
                Continuation::None
            }
            "securityScheme" => {
                let (scheme_name, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                self.security_schemes.push(DocSecurityScheme {
                    name: scheme_name.to_owned(),
                    attrs,
                    description,
                });
                Continuation::None
            }
            "server" => {
                let (url, rest) = split_word(rest);
                let (attrs, description) = parse_attrs(rest);

                let mut server = DocServer {
                    url: url.to_owned(),
                    ..DocServer::default()
                };

                for (key, value) in attrs {
                    match key.as_str() {
                        "name" => server.name = value,
                        "description" => server.description = value,
                        _ => debug!("ignoring server attribute `{key}`"),
                    }
                }
                if server.description.is_none() && !description.is_empty() {
                    server.description = Some(description);
                }

                self.servers.push(server);
                Continuation::None
            }
            "serverVar" => {
                let (var_name, rest) = split_word(rest);
                let (attrs, _) = parse_attrs(rest);

                let mut variable = DocServerVar {
                    name: var_name.to_owned(),
                    ..DocServerVar::default()
                };

                for (key, value) in attrs {
                    match key.as_str() {
                        "default" => variable.default = value,
                        "enum" => {
                            variable.enum_values = value.as_deref().map(split_csv).unwrap_or_default()
                        }
                        "description" => variable.description = value,
                        _ => debug!("ignoring serverVar attribute `{key}`"),
                    }
                }

                // Attaches to the most recent @server; dangling serverVar is ignored.
                match self.servers.last_mut() {
                    Some(server) => server.variables.push(variable),
                    None => debug!("serverVar `{}` with no preceding server", variable.name),
                }
                Continuation::None
            }
            "requestBody" => {
                let (attrs, description) = parse_attrs(rest);

                let mut body = DocRequestBody {
                    description,
                    ..DocRequestBody::default()
                };

                for (key, value) in attrs {
                    match key.as_str() {
                        "required" => body.required = Some(parse_bool(value.as_deref())),
                        "contentType" => body.content_type = value,
                        "example" => body.example = value.as_deref().map(parse_example),
                        _ => debug!("ignoring requestBody attribute `{key}`"),
                    }
                }

                self.request_body = Some(body);
                Continuation::RequestBody
            }
            "infoTitle" => {
                self.info.title = Some(rest.to_owned());
                Continuation::None
            }
            "infoVersion" => {
                self.info.version = Some(rest.to_owned());
                Continuation::None
            }
            "infoSummary" => {
                self.info.summary = Some(rest.to_owned());
                Continuation::None
            }
            "infoDescription" => {
                self.info.description = Some(rest.to_owned());
                Continuation::None
            }
            "termsOfService" => {
                self.info.terms_of_service = Some(rest.to_owned());
                Continuation::None
            }
            "contact" => {
                let (attrs, _) = parse_attrs(rest);
                self.contact.extend(attrs);
                Continuation::None
            }
            "license" => {
                let (attrs, _) = parse_attrs(rest);
                self.license.extend(attrs);
                Continuation::None
            }
            "tagMeta" => {
                let (tag_name, rest) = split_word(rest);
                let (attrs, _) = parse_attrs(rest);

                self.tag_meta.push(DocTagMeta {
                    name: tag_name.to_owned(),
                    attrs,
                });
                Continuation::None
            }
            unknown => {
                debug!("ignoring unknown directive `{unknown}`");
                Continuation::None
            }
        }
    }

    /// `route <verb>? <path>`: a first word starting with `/` is the path with the verb left
    /// unset; otherwise the first word is the verb (uppercased as-is) and the second the path.
    fn parse_route(&mut self, rest: &str) {
        let (first, rest) = split_word(rest);

        if first.starts_with('/') {
            self.route = Some(first.to_owned());
        } else if !first.is_empty() {
            self.verb = Some(first.to_ascii_uppercase());
            let (path, _) = split_word(rest);
            if !path.is_empty() {
                self.route = Some(path.to_owned());
            }
        }
    }

    fn append_continuation(&mut self, continuation: Continuation, line: &str) {
        let target = match continuation {
            Continuation::None => return,
            Continuation::Summary => self.summary.as_mut(),
            Continuation::Description => self.description.as_mut(),
            Continuation::Param => self.params.last_mut().map(|p| &mut p.description),
            Continuation::Return => self.returns.last_mut().map(|r| &mut r.description),
            Continuation::RequestBody => self.request_body.as_mut().map(|b| &mut b.description),
        };

        if let Some(target) = target {
            if !target.is_empty() {
                target.push(' ');
            }
            target.push_str(line);
        }
    }
}

/// Strips comment openers, closers, and per-line `*` decorators.
fn strip_decoration(line: &str) -> &str {
    let mut line = line.trim();

    for opener in ["/**", "/*!", "/*", "///", "//!", "//"] {
        if let Some(stripped) = line.strip_prefix(opener) {
            line = stripped;
            break;
        }
    }

    if let Some(stripped) = line.strip_suffix("*/") {
        line = stripped;
    }

    let line = line.trim_start();
    let line = line.strip_prefix('*').map(str::trim_start).unwrap_or(line);

    line.trim_end()
}

/// Splits the first whitespace-delimited word off a string.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

/// Lexes bracket attributes out of a line, returning them with the remaining description.
///
/// The first unbalanced `[` starts an attribute, ending at the next `]`; a `[` with no
/// closing `]` ends the attribute scan, with the remainder treated as description. `\[` in
/// description text escapes a literal bracket.
fn parse_attrs(s: &str) -> (Vec<Attr>, String) {
    let mut attrs = Vec::new();
    let mut description = String::new();
    let mut rest = s;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("\\[") {
            description.push('[');
            rest = after;
            continue;
        }

        if let Some(after) = rest.strip_prefix('[') {
            match after.find(']') {
                Some(close) => {
                    attrs.push(parse_attr(&after[..close]));
                    rest = &after[close + 1..];
                }
                None => {
                    // Unbalanced `[` ends the attribute scan; the remainder is description.
                    description.push_str(after);
                    rest = "";
                }
            }
            continue;
        }

        let ch = rest.chars().next().expect("rest is non-empty");
        description.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    let description = description.split_whitespace().collect::<Vec<_>>().join(" ");

    (attrs, description)
}

/// Parses `key`, `key:value`, or `key=value`.
fn parse_attr(raw: &str) -> Attr {
    let raw = raw.trim();

    match raw.find([':', '=']) {
        Some(idx) => (
            raw[..idx].trim().to_owned(),
            Some(raw[idx + 1..].trim().to_owned()),
        ),
        None => (raw.to_owned(), None),
    }
}

/// Boolean token forms: `true|false|yes|no|1|0`, case-insensitive; a bare key means true.
fn parse_bool(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(value) => matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "yes" | "1" | ""
        ),
    }
}

/// Splits a comma-separated list, trimming whitespace and dropping empties.
fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Example attribute values parse as JSON, falling back to a string literal.
fn parse_example(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn route_with_verb_and_path() {
        let meta = DocMetadata::parse("/** @route GET /user/{id} */");

        assert_eq!(meta.verb.as_deref(), Some("GET"));
        assert_eq!(meta.route.as_deref(), Some("/user/{id}"));
        assert!(!meta.is_webhook);
    }

    #[test]
    fn route_with_path_only_leaves_verb_unset() {
        let meta = DocMetadata::parse("/** @route /orders */");

        assert_eq!(meta.verb, None);
        assert_eq!(meta.route.as_deref(), Some("/orders"));
    }

    #[test]
    fn route_verb_is_uppercased_as_written() {
        let meta = DocMetadata::parse("/** @route purge /cache */");
        assert_eq!(meta.verb.as_deref(), Some("PURGE"));
    }

    #[test]
    fn webhook_sets_the_flag() {
        let meta = DocMetadata::parse("/** @webhook POST /new-pet */");

        assert!(meta.is_webhook);
        assert_eq!(meta.verb.as_deref(), Some("POST"));
        assert_eq!(meta.route.as_deref(), Some("/new-pet"));
    }

    #[test]
    fn backslash_directives_are_equivalent() {
        let meta = DocMetadata::parse("/** \\brief quick summary */");
        assert_eq!(meta.summary.as_deref(), Some("quick summary"));
    }

    #[test]
    fn param_attributes_parse() {
        let meta = DocMetadata::parse(
            "/** @param limit [in:query] [required] [format:int64] [example:25] page size */",
        );

        let param = &meta.params[0];
        assert_eq!(param.name, "limit");
        assert_eq!(param.location, Some(ParameterIn::Query));
        assert_eq!(param.required, Some(true));
        assert_eq!(param.format.as_deref(), Some("int64"));
        assert_eq!(param.example, Some(serde_json::json!(25)));
        assert_eq!(param.description, "page size");
    }

    #[test]
    fn boolean_attribute_forms() {
        let meta = DocMetadata::parse(
            "/** @param a [explode:no] [allowReserved:YES] [deprecated:0] [required:1] x */",
        );

        let param = &meta.params[0];
        assert_eq!(param.explode, Some(false));
        assert_eq!(param.allow_reserved, Some(true));
        assert_eq!(param.deprecated, Some(false));
        assert_eq!(param.required, Some(true));
    }

    #[test]
    fn repeated_returns_accumulate() {
        let meta = DocMetadata::parse(
            "/**\n * @return 200 [contentType:application/json] the pet\n * @return 200 [contentType:application/xml] the pet\n * @return 404 not found\n */",
        );

        assert_eq!(meta.returns.len(), 3);
        assert_eq!(meta.returns[0].code, "200");
        assert_eq!(
            meta.returns[0].content_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(meta.returns[2].code, "404");
        assert_eq!(meta.returns[2].description, "not found");
    }

    #[test]
    fn continuation_lines_extend_descriptions() {
        let meta = DocMetadata::parse(
            "/**\n * @description First line\n * second line\n * @param x first\n * and more\n */",
        );

        assert_eq!(
            meta.description.as_deref(),
            Some("First line second line")
        );
        assert_eq!(meta.params[0].description, "first and more");
    }

    #[test]
    fn server_vars_attach_to_most_recent_server() {
        let meta = DocMetadata::parse(
            "/**\n * @server https://{region}.example.com [name=prod]\n * @serverVar region [default:eu] [enum:eu,us]\n * @server https://localhost\n */",
        );

        assert_eq!(meta.servers.len(), 2);
        assert_eq!(meta.servers[0].name.as_deref(), Some("prod"));
        assert_eq!(meta.servers[0].variables.len(), 1);
        assert_eq!(meta.servers[0].variables[0].default.as_deref(), Some("eu"));
        assert_eq!(meta.servers[0].variables[0].enum_values, vec!["eu", "us"]);
        assert!(meta.servers[1].variables.is_empty());
    }

    #[test]
    fn security_scopes_are_csv_in_brackets() {
        let meta = DocMetadata::parse("/** @security petstore_auth [read:pets, write:pets] */");

        assert_eq!(meta.security.len(), 1);
        assert_eq!(meta.security[0].scheme, "petstore_auth");
        assert_eq!(meta.security[0].scopes, vec!["read:pets", "write:pets"]);
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let meta = DocMetadata::parse("/** @notadirective whatever\n@summary still works */");
        assert_eq!(meta.summary.as_deref(), Some("still works"));
    }

    #[test]
    fn unbalanced_bracket_ends_attribute_scan() {
        let meta = DocMetadata::parse("/** @param x [in:query] broken [rest of line */");

        let param = &meta.params[0];
        assert_eq!(param.location, Some(ParameterIn::Query));
        assert_eq!(param.description, "broken rest of line");
    }

    #[test]
    fn escaped_brackets_stay_in_description() {
        let meta = DocMetadata::parse(r"/** @param x \[not an attr] text */");

        let param = &meta.params[0];
        assert!(param.location.is_none());
        assert_eq!(param.description, "[not an attr] text");
    }

    #[test]
    fn tags_split_on_commas() {
        let meta = DocMetadata::parse("/** @tags pets, store ,  users */");
        assert_eq!(meta.tags, vec!["pets", "store", "users"]);
    }

    #[test]
    fn request_body_directive() {
        let meta = DocMetadata::parse(
            "/** @requestBody [required] [contentType:application/xml] raw pet payload */",
        );

        let body = meta.request_body.unwrap();
        assert_eq!(body.required, Some(true));
        assert_eq!(body.content_type.as_deref(), Some("application/xml"));
        assert_eq!(body.description, "raw pet payload");
    }

    #[test]
    fn info_and_license_directives() {
        let meta = DocMetadata::parse(
            "/**\n * @infoTitle Pet API\n * @infoVersion 2.1.0\n * @license [name:MIT] [identifier:MIT]\n */",
        );

        assert_eq!(meta.info.title.as_deref(), Some("Pet API"));
        assert_eq!(meta.info.version.as_deref(), Some("2.1.0"));
        assert_eq!(
            meta.license,
            vec![
                ("name".to_owned(), Some("MIT".to_owned())),
                ("identifier".to_owned(), Some("MIT".to_owned())),
            ]
        );
    }
}
