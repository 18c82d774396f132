//! JSON-pointer-style locations for error reporting.

use std::fmt;

/// Position within a document, reported alongside loader and validator failures.
///
/// Renders as a JSON-pointer-style path, `{ROOT}` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    parts: Vec<String>,
}

impl Location {
    /// Root location.
    pub fn root() -> Self {
        Self::default()
    }

    /// True when no parts have been pushed.
    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    /// Add a path part.
    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    /// Remove the last path part, returning it. If the location is empty, return `None`.
    pub fn pop(&mut self) -> Option<String> {
        self.parts.pop()
    }

    /// Shorthand for extending a location when passing down in recursive functions.
    pub fn extend(&self, part: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.parts.push(part.into());
        new
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("{ROOT}")
        } else {
            for part in &self.parts {
                // JSON Pointer escaping: `~` then `/`.
                let part = part.replace('~', "~0").replace('/', "~1");
                write!(f, "/{part}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_as_json_pointer() {
        let mut loc = Location::root();
        assert_eq!(loc.to_string(), "{ROOT}");

        loc.push("paths");
        loc.push("/pets/{petId}");
        loc.push("get");
        assert_eq!(loc.to_string(), "/paths/~1pets~1{petId}/get");
    }

    #[test]
    fn extend_leaves_original_untouched() {
        let base = Location::root().extend("components");
        let deeper = base.extend("schemas");

        assert_eq!(base.to_string(), "/components");
        assert_eq!(deeper.to_string(), "/components/schemas");
    }
}
