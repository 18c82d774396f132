//! Semantic validation of a loaded [`Spec`].
//!
//! Cross-cutting checks the loader cannot make locally: path templating, template
//! collisions, querystring exclusivity, operation id uniqueness, tag parent acyclicity, and
//! security scheme well-formedness. Validators are independent; the first failure is
//! reported and the order of detection between unrelated failures is unspecified.

use crate::Spec;

mod error;
mod operations;
mod params;
mod paths;
mod security;
mod tags;

pub use self::error::ValidationError;
pub use self::params::effective_parameters;
pub use self::paths::{normalize, placeholders};

/// Runs every semantic validator against a loaded spec, reporting the first failure.
///
/// Schema documents carry no API surface and always validate.
pub fn validate(spec: &Spec) -> Result<(), ValidationError> {
    if spec.is_schema_document() {
        return Ok(());
    }

    operations::check_parameter_uniqueness(spec)?;
    paths::check_templates(spec)?;
    paths::check_collisions(spec)?;
    operations::check_querystring_exclusivity(spec)?;
    operations::check_operation_id_uniqueness(spec)?;
    tags::check_tags(spec)?;
    security::check_security_schemes(spec)?;

    Ok(())
}
