//! Function signature parsing: declarator → name, return type, and argument pairs.

use super::token::{tokenize, Token, TokenKind};
use super::ExtractError;

/// One parsed `(type, name)` argument pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArg {
    /// Argument name.
    pub name: String,

    /// C type text, normalized to single spaces, with `[]` suffixes folded in.
    pub type_name: String,
}

/// A function declarator split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Function name.
    pub name: String,

    /// Return type text, if any tokens precede the name.
    pub return_type: Option<String>,

    /// Arguments in declaration order.
    pub args: Vec<ParsedArg>,
}

/// Parses a contiguous slice covering a function declarator up to but not including the body.
pub fn parse_signature(src: &str) -> Result<ParsedSignature, ExtractError> {
    let tokens = tokenize(src)
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect::<Vec<_>>();

    let invalid = || ExtractError::InvalidSignature(src.trim().to_owned());

    // First `(` at depth zero opens the argument list.
    let open = tokens
        .iter()
        .position(|token| token.kind == TokenKind::Punct && token.text(src) == "(")
        .ok_or_else(invalid)?;

    let name_token = open.checked_sub(1).map(|idx| &tokens[idx]).ok_or_else(invalid)?;
    if name_token.kind != TokenKind::Ident {
        return Err(invalid());
    }
    let name = name_token.text(src).to_owned();

    let return_type = if open >= 2 {
        Some(join_tokens(&tokens[..open - 1], src))
    } else {
        None
    };

    let mut depth = 0usize;
    let mut close = None;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token.text(src) {
            "(" if token.kind == TokenKind::Punct => depth += 1,
            ")" if token.kind == TokenKind::Punct => {
                depth = depth.checked_sub(1).ok_or_else(invalid)?;
                if depth == 0 {
                    close = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(invalid)?;

    let mut args = Vec::new();
    for segment in split_top_level(&tokens[open + 1..close], src) {
        if let Some(arg) = split_declarator(segment, src) {
            args.push(arg);
        }
    }

    Ok(ParsedSignature {
        name,
        return_type,
        args,
    })
}

/// Splits an argument list on commas at depth zero.
fn split_top_level<'t>(tokens: &'t [Token], src: &str) -> Vec<&'t [Token]> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, token) in tokens.iter().enumerate() {
        match token.text(src) {
            "(" | "[" | "{" if token.kind == TokenKind::Punct => depth += 1,
            ")" | "]" | "}" if token.kind == TokenKind::Punct => depth = depth.saturating_sub(1),
            "," if token.kind == TokenKind::Punct && depth == 0 => {
                segments.push(&tokens[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if start < tokens.len() {
        segments.push(&tokens[start..]);
    }

    segments
}

/// Splits one declarator segment into `(type, name)`.
///
/// Walks right-to-left skipping array suffix groups; the last identifier is the name and
/// everything to its left is the type, with `[]` appended per skipped group. Segments with no
/// identifier (e.g. `void`) yield `None`.
pub(crate) fn split_declarator(tokens: &[Token], src: &str) -> Option<ParsedArg> {
    let mut idx = tokens.len();
    let mut array_suffix = String::new();

    while idx > 0 {
        let token = &tokens[idx - 1];

        if token.kind == TokenKind::Punct && token.text(src) == "]" {
            // Skip the bracket group, constants included.
            idx -= 1;
            while idx > 0 {
                let inner = &tokens[idx - 1];
                idx -= 1;
                if inner.kind == TokenKind::Punct && inner.text(src) == "[" {
                    break;
                }
            }
            array_suffix.push_str("[]");
            continue;
        }

        if token.kind == TokenKind::Ident {
            // `void`-style segments have the lone type keyword as their only identifier.
            if idx == 1 {
                return None;
            }

            let mut type_name = join_tokens(&tokens[..idx - 1], src);
            type_name.push_str(&array_suffix);

            return Some(ParsedArg {
                name: token.text(src).to_owned(),
                type_name,
            });
        }

        idx -= 1;
    }

    None
}

/// Joins token texts, spacing identifiers apart and gluing punctuation.
fn join_tokens(tokens: &[Token], src: &str) -> String {
    let mut out = String::new();

    for token in tokens {
        let text = token.text(src);

        if !out.is_empty() && token.kind == TokenKind::Ident {
            out.push(' ');
        }
        out.push_str(text);
    }

    out.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_a_simple_signature() {
        let sig = parse_signature("int api_user_get(int id)").unwrap();

        assert_eq!(sig.name, "api_user_get");
        assert_eq!(sig.return_type.as_deref(), Some("int"));
        assert_eq!(
            sig.args,
            vec![ParsedArg {
                name: "id".to_owned(),
                type_name: "int".to_owned(),
            }]
        );
    }

    #[test]
    fn parses_pointers_and_qualifiers() {
        let sig = parse_signature("int api_pet_create(const struct Pet *p, char *note)").unwrap();

        assert_eq!(sig.args.len(), 2);
        assert_eq!(sig.args[0].name, "p");
        assert_eq!(sig.args[0].type_name, "const struct Pet*");
        assert_eq!(sig.args[1].name, "note");
        assert_eq!(sig.args[1].type_name, "char*");
    }

    #[test]
    fn folds_array_suffixes_into_the_type() {
        let sig = parse_signature("void f(int xs[], char names[16])").unwrap();

        assert_eq!(sig.args[0].type_name, "int[]");
        assert_eq!(sig.args[0].name, "xs");
        assert_eq!(sig.args[1].type_name, "char[]");
        assert_eq!(sig.args[1].name, "names");
    }

    #[test]
    fn drops_void_segments() {
        let sig = parse_signature("int ping(void)").unwrap();
        assert!(sig.args.is_empty());
    }

    #[test]
    fn double_pointer_output_argument() {
        let sig = parse_signature("int get_obj(struct Obj **out)").unwrap();
        assert_eq!(sig.args[0].type_name, "struct Obj**");
        assert_eq!(sig.args[0].name, "out");
    }

    #[test]
    fn rejects_a_slice_without_parens() {
        assert!(parse_signature("int not_a_function").is_err());
    }
}
