//! Tag uniqueness and parent-graph acyclicity.

use std::collections::BTreeMap;

use super::ValidationError;
use crate::spec::Spec;

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Grey,
    Black,
}

/// Tag names must be unique, every `parent` must resolve to a defined tag, and the parent
/// graph must be acyclic (three-color depth-first search).
pub fn check_tags(spec: &Spec) -> Result<(), ValidationError> {
    let mut parents: BTreeMap<&str, Option<&str>> = BTreeMap::new();

    for tag in &spec.tags {
        if parents
            .insert(tag.name.as_str(), tag.parent.as_deref())
            .is_some()
        {
            return Err(ValidationError::DuplicateTag(tag.name.clone()));
        }
    }

    for tag in &spec.tags {
        if let Some(parent) = tag.parent.as_deref() {
            if !parents.contains_key(parent) {
                return Err(ValidationError::UnknownTagParent {
                    tag: tag.name.clone(),
                    parent: parent.to_owned(),
                });
            }
        }
    }

    let mut colors: BTreeMap<&str, Color> =
        parents.keys().map(|name| (*name, Color::White)).collect();

    for name in parents.keys() {
        if colors[name] == Color::White {
            visit(name, &parents, &mut colors)?;
        }
    }

    Ok(())
}

fn visit<'s>(
    name: &'s str,
    parents: &BTreeMap<&'s str, Option<&'s str>>,
    colors: &mut BTreeMap<&'s str, Color>,
) -> Result<(), ValidationError> {
    colors.insert(name, Color::Grey);

    if let Some(Some(parent)) = parents.get(name) {
        match colors[parent] {
            Color::Grey => return Err(ValidationError::TagParentCycle(parent.to_string())),
            Color::White => visit(parent, parents, colors)?,
            Color::Black => {}
        }
    }

    colors.insert(name, Color::Black);
    Ok(())
}
