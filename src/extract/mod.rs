//! Annotation-driven API extraction: C sources in, aggregated OpenAPI description out.
//!
//! The pipeline walks a source buffer's token stream, collects type and function
//! declarations, parses each function's signature and preceding doc-comment annotations,
//! fuses them into operations, and aggregates everything into one [`Spec`](crate::Spec).
//!
//! Invalid individual annotations drop the affected operation with a warning; everything
//! else (duplicate operations included) is fatal to the extraction.

use log::warn;

mod aggregate;
mod builder;
mod doc;
mod error;
mod inspect;
mod signature;
mod token;
mod types;

pub use self::aggregate::Aggregator;
pub use self::builder::{build_operation, BuiltOperation};
pub use self::doc::{
    Attr, DocInfo, DocLink, DocMetadata, DocParam, DocRequestBody, DocResponseHeader, DocReturn,
    DocSecurity, DocSecurityScheme, DocServer, DocServerVar, DocTagMeta,
};
pub use self::error::ExtractError;
pub use self::inspect::{inspect, EnumDecl, FunctionDecl, Inspection, StructDecl, TypedefDecl};
pub use self::signature::{parse_signature, ParsedArg, ParsedSignature};
pub use self::token::{tokenize, Token, TokenKind};
pub use self::types::{CType, SchemaRegistry};

/// Per-buffer extraction tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Function declarations inspected.
    pub functions: usize,

    /// Operations added to the aggregate.
    pub operations: usize,

    /// Operations dropped over invalid signatures or annotations.
    pub dropped: usize,
}

/// Registers a source buffer's type declarations without extracting operations.
///
/// Running this over every file before extraction lets operations reference structs declared
/// in files the walk has not reached yet.
pub fn register_types(src: &str, registry: &mut SchemaRegistry) {
    let inspection = inspect(src);

    for decl in &inspection.structs {
        registry.register_struct(decl);
    }
    for decl in &inspection.enums {
        registry.register_enum(decl);
    }
    for decl in &inspection.typedefs {
        registry.register_typedef(decl);
    }
}

/// Extracts one source buffer into the aggregate.
///
/// Type declarations register schemas for the whole run, so buffers may reference structs
/// declared in earlier files (headers before sources, in walk order).
pub fn extract_source(
    src: &str,
    registry: &mut SchemaRegistry,
    aggregator: &mut Aggregator,
) -> Result<ExtractionReport, ExtractError> {
    let inspection = inspect(src);

    for decl in &inspection.structs {
        registry.register_struct(decl);
    }
    for decl in &inspection.enums {
        registry.register_enum(decl);
    }
    for decl in &inspection.typedefs {
        registry.register_typedef(decl);
    }

    // Document-level directives may sit in any comment block, attached or not.
    for block in &inspection.doc_blocks {
        aggregator.apply_document_directives(&DocMetadata::parse(block));
    }

    let mut report = ExtractionReport {
        functions: inspection.functions.len(),
        ..ExtractionReport::default()
    };

    for function in &inspection.functions {
        let doc = function.doc.as_deref().map(DocMetadata::parse);

        let sig = match parse_signature(&src[function.signature.clone()]) {
            Ok(sig) => sig,
            Err(err) => {
                warn!("skipping `{}`: {err}", function.name);
                report.dropped += 1;
                continue;
            }
        };

        match build_operation(&sig, doc.as_ref(), registry) {
            Ok(built) => {
                aggregator.insert(built)?;
                report.operations += 1;
            }
            Err(err @ ExtractError::InvalidAnnotation(_)) => {
                warn!("dropping operation `{}`: {err}", function.name);
                report.dropped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_operations_and_schemas_from_one_buffer() {
        let src = r"
struct Pet {
    long id;
    char *name;
};

/** @route GET /pets/{id} */
int api_pet_get(long id);

int api_pet_create(const struct Pet *p);
";

        let mut registry = SchemaRegistry::new();
        let mut aggregator = Aggregator::new();

        let report = extract_source(src, &mut registry, &mut aggregator).unwrap();
        assert_eq!(report.functions, 2);
        assert_eq!(report.operations, 2);
        assert_eq!(report.dropped, 0);

        aggregator.register_schemas(&registry);
        let spec = aggregator.into_spec();

        let paths = spec.paths.as_ref().unwrap();
        assert!(paths["/pets/{id}"].get.is_some());
        assert!(paths["/api_pet_create"].post.is_some());
        assert!(spec.components.as_ref().unwrap().schemas.contains_key("Pet"));
    }

    #[test]
    fn invalid_annotations_drop_only_the_affected_operation() {
        let src = r"
/** @route GET bad-route-without-slash */
int broken(void);

/** @route GET /fine */
int fine(void);
";

        let mut registry = SchemaRegistry::new();
        let mut aggregator = Aggregator::new();

        let report = extract_source(src, &mut registry, &mut aggregator).unwrap();
        assert_eq!(report.operations, 1);
        assert_eq!(report.dropped, 1);

        let spec = aggregator.into_spec();
        assert!(spec.paths.as_ref().unwrap().contains_key("/fine"));
    }
}
