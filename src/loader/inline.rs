//! Eager inlining of component references under `paths` and `webhooks`.
//!
//! When a component reference resolves, the referenced object is deep-copied into the
//! consumer site and the `$ref` text is retained alongside for round-tripping. Cross-document
//! references resolve through the registry; a reference into a document the registry does not
//! hold is fatal.

use std::collections::BTreeMap;

use url::Url;

use super::{uri, DocRegistry, LoadError};
use crate::location::Location;
use crate::spec::{
    Callback, Components, MediaType, ObjectOrReference, Operation, PathItem, Ref, RefError,
    RefType, RequestBody, Response, Schema, Spec,
};

/// Resolution recursion bound; guards against reference chains that never reach an object.
const MAX_RESOLVE_DEPTH: usize = 32;

/// Resolution context: a document's components and the base URI its references resolve
/// against.
type Ctx<'a> = (&'a Components, Option<&'a Url>);

pub fn inline_references(spec: &mut Spec, registry: Option<&DocRegistry>) -> Result<(), LoadError> {
    annotate_spec_schemas(spec);

    let own = spec.components.clone().unwrap_or_default();
    let own_uri = spec.document_uri.clone();

    let resolver = Resolver {
        own: &own,
        own_uri: own_uri.as_ref(),
        registry,
    };

    if let Some(paths) = &mut spec.paths {
        let loc = Location::root().extend("paths");
        for (route, item) in paths.iter_mut() {
            resolver.path_item(item, &loc.extend(route), 0)?;
        }
    }

    if let Some(webhooks) = &mut spec.webhooks {
        let loc = Location::root().extend("webhooks");
        for (name, item) in webhooks.iter_mut() {
            resolver.path_item(item, &loc.extend(name), 0)?;
        }
    }

    Ok(())
}

struct Resolver<'a> {
    own: &'a Components,
    own_uri: Option<&'a Url>,
    registry: Option<&'a DocRegistry>,
}

impl<'a> Resolver<'a> {
    fn own_ctx(&self) -> Ctx<'a> {
        (self.own, self.own_uri)
    }

    /// Shifts the resolution context to the document a reference's source part names.
    fn shift_ctx(&self, ctx: Ctx<'a>, source: &str, loc: &Location) -> Result<Ctx<'a>, LoadError> {
        let Some(target) = uri::reference_target(ctx.1, source) else {
            return Ok(ctx);
        };

        if self.own_uri == Some(&target) {
            return Ok(self.own_ctx());
        }

        let doc = self
            .registry
            .and_then(|registry| registry.get(&target))
            .ok_or_else(|| LoadError::UnregisteredDocument(loc.clone(), target.to_string()))?;

        let components = doc.components.as_ref().ok_or_else(|| {
            LoadError::Ref(loc.clone(), RefError::Unresolvable(source.to_owned()))
        })?;

        Ok((components, doc.document_uri.as_ref()))
    }

    /// Resolves a component reference to an owned deep copy, following reference chains.
    fn resolve_in<T, F>(
        &self,
        ctx: Ctx<'a>,
        reference: &Ref,
        project: F,
        depth: usize,
        loc: &Location,
    ) -> Result<T, LoadError>
    where
        T: Clone,
        F: Copy + Fn(&Components) -> &BTreeMap<String, ObjectOrReference<T>>,
    {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(LoadError::Ref(
                loc.clone(),
                RefError::Unresolvable(reference.name.clone()),
            ));
        }

        let ctx = self.shift_ctx(ctx, &reference.source, loc)?;

        let oor = project(ctx.0).get(&reference.name).ok_or_else(|| {
            LoadError::Ref(loc.clone(), RefError::Unresolvable(reference.name.clone()))
        })?;

        match oor {
            ObjectOrReference::Object(obj) => Ok(obj.clone()),
            ObjectOrReference::Ref { ref_path, .. } => {
                let nested = ref_path
                    .parse::<Ref>()
                    .map_err(|err| LoadError::Ref(loc.clone(), err))?;

                if nested.kind != reference.kind {
                    return Err(LoadError::Ref(
                        loc.clone(),
                        RefError::MismatchedKind(nested.kind, reference.kind),
                    ));
                }

                self.resolve_in(ctx, &nested, project, depth + 1, loc)
            }
        }
    }

    /// Resolves the target of a referenced position, leaving inline objects untouched.
    fn resolve_oor<T, F>(
        &self,
        oor: &ObjectOrReference<T>,
        expected: RefType,
        project: F,
        loc: &Location,
    ) -> Result<Option<T>, LoadError>
    where
        T: Clone,
        F: Copy + Fn(&Components) -> &BTreeMap<String, ObjectOrReference<T>>,
    {
        let Some(ref_path) = oor.ref_path() else {
            return Ok(None);
        };

        let reference = ref_path
            .parse::<Ref>()
            .map_err(|err| LoadError::Ref(loc.clone(), err))?;

        if reference.kind != expected {
            return Err(LoadError::Ref(
                loc.clone(),
                RefError::MismatchedKind(reference.kind, expected),
            ));
        }

        self.resolve_in(self.own_ctx(), &reference, project, 0, loc)
            .map(Some)
    }

    fn path_item(&self, item: &mut PathItem, loc: &Location, depth: usize) -> Result<(), LoadError> {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(LoadError::Ref(
                loc.clone(),
                RefError::Unresolvable(loc.to_string()),
            ));
        }

        if let Some(ref_path) = item.reference.clone() {
            let reference = ref_path
                .parse::<Ref>()
                .map_err(|err| LoadError::Ref(loc.clone(), err))?;

            if reference.kind != RefType::PathItem {
                return Err(LoadError::Ref(
                    loc.clone(),
                    RefError::MismatchedKind(reference.kind, RefType::PathItem),
                ));
            }

            let target = self.resolve_in(
                self.own_ctx(),
                &reference,
                |components| &components.path_items,
                0,
                loc,
            )?;

            // Sibling fields are ignored in favor of the referenced definition; the `$ref`
            // itself is retained for round-tripping.
            *item = PathItem {
                reference: Some(ref_path),
                ..target
            };
        }

        for (idx, oor) in item.parameters.iter_mut().enumerate() {
            let loc = loc.extend("parameters").extend(idx.to_string());
            if let Some(param) =
                self.resolve_oor(oor, RefType::Parameter, |c| &c.parameters, &loc)?
            {
                oor.set_resolved(param);
            }
        }

        for method in crate::spec::Method::ALL {
            if let Some(op) = item.operation_mut(method) {
                self.operation(op, &loc.extend(method.as_str()), depth)?;
            }
        }

        for (method, op) in item.additional_operations.iter_mut() {
            self.operation(op, &loc.extend(method.as_str()), depth)?;
        }

        Ok(())
    }

    fn operation(&self, op: &mut Operation, loc: &Location, depth: usize) -> Result<(), LoadError> {
        for (idx, oor) in op.parameters.iter_mut().enumerate() {
            let loc = loc.extend("parameters").extend(idx.to_string());
            if let Some(param) =
                self.resolve_oor(oor, RefType::Parameter, |c| &c.parameters, &loc)?
            {
                oor.set_resolved(param);
            }
        }

        if let Some(oor) = &mut op.request_body {
            let loc = loc.extend("requestBody");

            match oor {
                ObjectOrReference::Object(body) => self.request_body(body, &loc)?,
                ObjectOrReference::Ref { .. } => {
                    if let Some(mut body) =
                        self.resolve_oor(oor, RefType::RequestBody, |c| &c.request_bodies, &loc)?
                    {
                        self.request_body(&mut body, &loc)?;
                        oor.set_resolved(body);
                    }
                }
            }
        }

        if let Some(responses) = &mut op.responses {
            let responses_loc = loc.extend("responses");

            for (code, oor) in responses.iter_mut() {
                let loc = responses_loc.extend(code);

                match oor {
                    ObjectOrReference::Object(response) => self.response(response, &loc)?,
                    ObjectOrReference::Ref { .. } => {
                        if let Some(mut response) =
                            self.resolve_oor(oor, RefType::Response, |c| &c.responses, &loc)?
                        {
                            self.response(&mut response, &loc)?;
                            oor.set_resolved(response);
                        }
                    }
                }
            }
        }

        for (name, oor) in op.callbacks.iter_mut() {
            let loc = loc.extend("callbacks").extend(name.as_str());

            match oor {
                ObjectOrReference::Object(callback) => {
                    self.callback(callback, &loc, depth)?;
                }
                ObjectOrReference::Ref { .. } => {
                    if let Some(mut callback) =
                        self.resolve_oor(oor, RefType::Callback, |c| &c.callbacks, &loc)?
                    {
                        self.callback(&mut callback, &loc, depth)?;
                        oor.set_resolved(callback);
                    }
                }
            }
        }

        Ok(())
    }

    fn callback(
        &self,
        callback: &mut Callback,
        loc: &Location,
        depth: usize,
    ) -> Result<(), LoadError> {
        for (expr, item) in callback.paths.iter_mut() {
            self.path_item(item, &loc.extend(expr.as_str()), depth + 1)?;
        }

        Ok(())
    }

    fn request_body(&self, body: &mut RequestBody, loc: &Location) -> Result<(), LoadError> {
        let content_loc = loc.extend("content");

        for (name, media) in body.content.iter_mut() {
            self.media_type(media, &content_loc.extend(name.as_str()))?;
        }

        Ok(())
    }

    fn response(&self, response: &mut Response, loc: &Location) -> Result<(), LoadError> {
        for (name, oor) in response.headers.iter_mut() {
            let loc = loc.extend("headers").extend(name.as_str());
            if let Some(header) = self.resolve_oor(oor, RefType::Header, |c| &c.headers, &loc)? {
                oor.set_resolved(header);
            }
        }

        let content_loc = loc.extend("content");
        for (name, media) in response.content.iter_mut() {
            self.media_type(media, &content_loc.extend(name.as_str()))?;
        }

        for (name, oor) in response.links.iter_mut() {
            let loc = loc.extend("links").extend(name.as_str());
            if let Some(link) = self.resolve_oor(oor, RefType::Link, |c| &c.links, &loc)? {
                oor.set_resolved(link);
            }
        }

        Ok(())
    }

    fn media_type(&self, media: &mut MediaType, loc: &Location) -> Result<(), LoadError> {
        if let Some(ref_path) = &media.reference {
            let reference = ref_path
                .parse::<Ref>()
                .map_err(|err| LoadError::Ref(loc.clone(), err))?;

            if reference.kind != RefType::MediaType {
                return Err(LoadError::Ref(
                    loc.clone(),
                    RefError::MismatchedKind(reference.kind, RefType::MediaType),
                ));
            }

            let ctx = self.shift_ctx(self.own_ctx(), &reference.source, loc)?;
            let target = ctx.0.media_types.get(&reference.name).ok_or_else(|| {
                LoadError::Ref(loc.clone(), RefError::Unresolvable(reference.name.clone()))
            })?;

            // Deep-copy the registered media type into the site, keeping the `$ref` and any
            // locally declared fields.
            if media.schema.is_none() {
                media.schema = target.schema.clone();
            }
            if media.item_schema.is_none() {
                media.item_schema = target.item_schema.clone();
            }
            if media.example.is_none() && media.examples.is_empty() {
                media.example = target.example.clone();
                media.examples = target.examples.clone();
            }
            if media.encoding_carrier_count() == 0 {
                media.encoding = target.encoding.clone();
                media.prefix_encoding = target.prefix_encoding.clone();
                media.item_encoding = target.item_encoding.clone();
            }
        }

        for (name, oor) in media.examples.iter_mut() {
            let loc = loc.extend("examples").extend(name.as_str());
            if let Some(example) = self.resolve_oor(oor, RefType::Example, |c| &c.examples, &loc)? {
                oor.set_resolved(example);
            }
        }

        Ok(())
    }
}

/// Derives `ref_name` for every schema reference into `#/components/schemas` across the spec.
fn annotate_spec_schemas(spec: &mut Spec) {
    if let Some(components) = &mut spec.components {
        for schema in components.schemas.values_mut() {
            annotate_schema(schema);
        }

        for oor in components.parameters.values_mut() {
            if let ObjectOrReference::Object(param) = oor {
                annotate_opt(&mut param.schema);
                annotate_content(&mut param.content);
            }
        }

        for oor in components.headers.values_mut() {
            if let ObjectOrReference::Object(header) = oor {
                annotate_opt(&mut header.schema);
                annotate_content(&mut header.content);
            }
        }

        for oor in components.request_bodies.values_mut() {
            if let ObjectOrReference::Object(body) = oor {
                for media in body.content.values_mut() {
                    annotate_media(media);
                }
            }
        }

        for media in components.media_types.values_mut() {
            annotate_media(media);
        }

        for oor in components.responses.values_mut() {
            if let ObjectOrReference::Object(response) = oor {
                for media in response.content.values_mut() {
                    annotate_media(media);
                }
            }
        }

        for oor in components.path_items.values_mut() {
            if let ObjectOrReference::Object(item) = oor {
                annotate_path_item(item);
            }
        }

        for oor in components.callbacks.values_mut() {
            if let ObjectOrReference::Object(callback) = oor {
                for item in callback.paths.values_mut() {
                    annotate_path_item(item);
                }
            }
        }
    }

    if let Some(paths) = &mut spec.paths {
        for item in paths.values_mut() {
            annotate_path_item(item);
        }
    }

    if let Some(webhooks) = &mut spec.webhooks {
        for item in webhooks.values_mut() {
            annotate_path_item(item);
        }
    }
}

fn annotate_path_item(item: &mut PathItem) {
    for oor in item.parameters.iter_mut() {
        if let ObjectOrReference::Object(param) = oor {
            annotate_opt(&mut param.schema);
            annotate_content(&mut param.content);
        }
    }

    for method in crate::spec::Method::ALL {
        if let Some(op) = item.operation_mut(method) {
            annotate_operation(op);
        }
    }

    for op in item.additional_operations.values_mut() {
        annotate_operation(op);
    }
}

fn annotate_operation(op: &mut Operation) {
    for oor in op.parameters.iter_mut() {
        if let ObjectOrReference::Object(param) = oor {
            annotate_opt(&mut param.schema);
            annotate_content(&mut param.content);
        }
    }

    if let Some(ObjectOrReference::Object(body)) = &mut op.request_body {
        for media in body.content.values_mut() {
            annotate_media(media);
        }
    }

    if let Some(responses) = &mut op.responses {
        for oor in responses.values_mut() {
            if let ObjectOrReference::Object(response) = oor {
                for media in response.content.values_mut() {
                    annotate_media(media);
                }
                for header in response.headers.values_mut() {
                    if let ObjectOrReference::Object(header) = header {
                        annotate_opt(&mut header.schema);
                        annotate_content(&mut header.content);
                    }
                }
            }
        }
    }

    for oor in op.callbacks.values_mut() {
        if let ObjectOrReference::Object(callback) = oor {
            for item in callback.paths.values_mut() {
                annotate_path_item(item);
            }
        }
    }
}

fn annotate_content(content: &mut Option<BTreeMap<String, MediaType>>) {
    if let Some(content) = content {
        for media in content.values_mut() {
            annotate_media(media);
        }
    }
}

fn annotate_media(media: &mut MediaType) {
    annotate_opt(&mut media.schema);
    annotate_opt(&mut media.item_schema);
}

fn annotate_opt(schema: &mut Option<Schema>) {
    if let Some(schema) = schema {
        annotate_schema(schema);
    }
}

fn annotate_schema(schema: &mut Schema) {
    let Some(object) = schema.object_mut() else {
        return;
    };

    if let Some(target) = object.reference() {
        if let Ok(parsed) = target.parse::<Ref>() {
            if parsed.kind == RefType::Schema && parsed.source.is_empty() {
                object.ref_name = Some(parsed.name);
            }
        }
    }

    if let Some(items) = &mut object.items {
        annotate_schema(items);
    }
    for schema in &mut object.prefix_items {
        annotate_schema(schema);
    }
    for schema in object.properties.values_mut() {
        annotate_schema(schema);
    }
    if let Some(additional) = &mut object.additional_properties {
        annotate_schema(additional);
    }
    for schema in &mut object.all_of {
        annotate_schema(schema);
    }
    for schema in &mut object.any_of {
        annotate_schema(schema);
    }
    for schema in &mut object.one_of {
        annotate_schema(schema);
    }
    for schema in [
        &mut object.not,
        &mut object.if_schema,
        &mut object.then_schema,
        &mut object.else_schema,
    ]
    .into_iter()
    .flatten()
    {
        annotate_schema(schema);
    }
}
