//! C source inspection: top-level type declarations and documented function declarations.

use log::debug;

use super::signature::split_declarator;
use super::token::{tokenize, Token, TokenKind};

/// One member of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// Member name.
    pub name: String,

    /// C type text.
    pub type_name: String,
}

/// A struct declaration with its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// Struct tag or typedef alias.
    pub name: String,

    /// Members in declaration order.
    pub members: Vec<StructMember>,
}

/// An enum declaration with its enumerator names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Enum tag or typedef alias.
    pub name: String,

    /// Enumerator names in declaration order; initializer expressions are dropped.
    pub values: Vec<String>,
}

/// A plain `typedef <target> <alias>;` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefDecl {
    /// The alias being introduced.
    pub name: String,

    /// The aliased type text.
    pub target: String,
}

/// A top-level function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name.
    pub name: String,

    /// Byte span of the declarator, up to but not including `;` or the body `{`.
    pub signature: std::ops::Range<usize>,

    /// Raw text of the immediately preceding doc comment, if any.
    pub doc: Option<String>,
}

/// Everything the inspector collects from one source buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inspection {
    /// Struct declarations, including `typedef struct` forms.
    pub structs: Vec<StructDecl>,

    /// Enum declarations, including `typedef enum` forms.
    pub enums: Vec<EnumDecl>,

    /// Plain typedef aliases.
    pub typedefs: Vec<TypedefDecl>,

    /// Function declarations in source order.
    pub functions: Vec<FunctionDecl>,

    /// Every comment block in the buffer, in source order.
    ///
    /// Includes blocks attached to functions; document-level directives may appear anywhere.
    pub doc_blocks: Vec<String>,
}

/// Walks a token stream collecting struct/enum/typedef declarations and function
/// declarations with their preceding doc comments.
pub fn inspect(src: &str) -> Inspection {
    let tokens = tokenize(src);
    let mut inspection = Inspection::default();

    let mut cursor = Cursor {
        src,
        tokens: &tokens,
        pos: 0,
    };

    let mut pending_doc: Option<String> = None;
    let mut decl_start: Option<usize> = None;

    while let Some(token) = cursor.peek() {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Directive => {
                cursor.bump();
            }

            TokenKind::Comment => {
                if let Some(doc) = collect_doc_block(&mut cursor) {
                    inspection.doc_blocks.push(doc.clone());
                    pending_doc = Some(doc);
                }
            }

            TokenKind::Ident if token.text(src) == "typedef" => {
                cursor.bump();
                parse_typedef(&mut cursor, &mut inspection);
                pending_doc = None;
                decl_start = None;
            }

            TokenKind::Ident if token.text(src) == "struct" && cursor.is_definition() => {
                parse_struct(&mut cursor, &mut inspection, false);
                pending_doc = None;
                decl_start = None;
            }

            TokenKind::Ident if token.text(src) == "enum" && cursor.is_definition() => {
                parse_enum(&mut cursor, &mut inspection, false);
                pending_doc = None;
                decl_start = None;
            }

            TokenKind::Ident => {
                let start = *decl_start.get_or_insert(token.start);

                if let Some(function) = try_function(&mut cursor, start, pending_doc.take()) {
                    debug!("found function declaration `{}`", function.name);
                    inspection.functions.push(function);
                    decl_start = None;
                } else {
                    cursor.bump();
                }
            }

            TokenKind::Punct => {
                let text = token.text(src);
                cursor.bump();

                if text == ";" || text == "}" {
                    decl_start = None;
                    pending_doc = None;
                } else if text == "{" {
                    cursor.skip_balanced_braces();
                    decl_start = None;
                    pending_doc = None;
                }
            }

            _ => {
                cursor.bump();
            }
        }
    }

    inspection
}

struct Cursor<'s> {
    src: &'s str,
    tokens: &'s [Token],
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn peek(&self) -> Option<&'s Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'s Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    /// Nth non-trivia token ahead of the cursor, without consuming anything.
    fn peek_significant(&self, mut ahead: usize) -> Option<&'s Token> {
        let mut idx = self.pos;
        loop {
            let token = self.tokens.get(idx)?;
            if !token.is_trivia() {
                if ahead == 0 {
                    return Some(token);
                }
                ahead -= 1;
            }
            idx += 1;
        }
    }

    fn bump_significant(&mut self) -> Option<&'s Token> {
        loop {
            let token = self.tokens.get(self.pos)?;
            self.pos += 1;
            if !token.is_trivia() {
                return Some(token);
            }
        }
    }

    /// True for `struct X {`-style definitions, as opposed to `struct X` used as a type.
    fn is_definition(&self) -> bool {
        matches!(
            self.peek_significant(2).map(|t| t.text(self.src)),
            Some("{")
        )
    }

    /// Skips a balanced brace group; the opening `{` has already been consumed.
    fn skip_balanced_braces(&mut self) {
        let mut depth = 1usize;

        while depth > 0 {
            let Some(token) = self.bump() else {
                return;
            };

            if token.kind == TokenKind::Punct {
                match token.text(self.src) {
                    "{" => depth += 1,
                    "}" => depth -= 1,
                    _ => {}
                }
            }
        }
    }
}

/// Collects one doc block: a `/* ... */` comment or a run of adjacent line comments.
fn collect_doc_block(cursor: &mut Cursor<'_>) -> Option<String> {
    let first = cursor.bump()?;
    let mut text = first.text(cursor.src).to_owned();

    if text.starts_with("//") {
        while let Some(next) = cursor.peek_significant(0) {
            if next.kind == TokenKind::Comment && next.text(cursor.src).starts_with("//") {
                while cursor.peek().is_some_and(|t| t.kind == TokenKind::Whitespace) {
                    cursor.bump();
                }
                let Some(comment) = cursor.bump() else { break };
                text.push('\n');
                text.push_str(comment.text(cursor.src));
            } else {
                break;
            }
        }
    }

    Some(text)
}

fn parse_typedef(cursor: &mut Cursor<'_>, inspection: &mut Inspection) {
    match cursor.peek_significant(0).map(|t| t.text(cursor.src)) {
        Some("struct") => parse_struct(cursor, inspection, true),
        Some("enum") => parse_enum(cursor, inspection, true),
        _ => {
            // `typedef <target...> <alias>;`
            let mut tokens = Vec::new();
            while let Some(token) = cursor.bump_significant() {
                if token.kind == TokenKind::Punct && token.text(cursor.src) == ";" {
                    break;
                }
                tokens.push(*token);
            }

            if let Some(arg) = split_declarator(&tokens, cursor.src) {
                inspection.typedefs.push(TypedefDecl {
                    name: arg.name,
                    target: arg.type_name,
                });
            }
        }
    }
}

fn parse_struct(cursor: &mut Cursor<'_>, inspection: &mut Inspection, is_typedef: bool) {
    // Consume `struct`.
    cursor.bump_significant();

    let mut name = match cursor.peek_significant(0) {
        Some(token) if token.kind == TokenKind::Ident => {
            let text = token.text(cursor.src).to_owned();
            cursor.bump_significant();
            Some(text)
        }
        _ => None,
    };

    if cursor.peek_significant(0).map(|t| t.text(cursor.src)) != Some("{") {
        return;
    }
    cursor.bump_significant();

    let mut members = Vec::new();
    let mut member_tokens: Vec<Token> = Vec::new();
    let mut depth = 1usize;

    while let Some(token) = cursor.bump_significant() {
        let text = token.text(cursor.src);

        if token.kind == TokenKind::Punct {
            match text {
                "{" => {
                    depth += 1;
                    continue;
                }
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                ";" if depth == 1 => {
                    if let Some(member) = split_declarator(&member_tokens, cursor.src) {
                        members.push(StructMember {
                            name: member.name,
                            type_name: member.type_name,
                        });
                    }
                    member_tokens.clear();
                    continue;
                }
                _ => {}
            }
        }

        if depth == 1 {
            member_tokens.push(*token);
        }
    }

    // `typedef struct <tag>? { ... } Alias;` names the schema after the alias.
    if is_typedef {
        if let Some(token) = cursor.peek_significant(0) {
            if token.kind == TokenKind::Ident {
                let alias = token.text(cursor.src).to_owned();
                cursor.bump_significant();
                name = Some(alias);
            }
        }
    }

    if let Some(name) = name {
        inspection.structs.push(StructDecl { name, members });
    }
}

fn parse_enum(cursor: &mut Cursor<'_>, inspection: &mut Inspection, is_typedef: bool) {
    // Consume `enum`.
    cursor.bump_significant();

    let mut name = match cursor.peek_significant(0) {
        Some(token) if token.kind == TokenKind::Ident => {
            let text = token.text(cursor.src).to_owned();
            cursor.bump_significant();
            Some(text)
        }
        _ => None,
    };

    if cursor.peek_significant(0).map(|t| t.text(cursor.src)) != Some("{") {
        return;
    }
    cursor.bump_significant();

    let mut values = Vec::new();
    let mut expect_value = true;

    while let Some(token) = cursor.bump_significant() {
        let text = token.text(cursor.src);

        if token.kind == TokenKind::Punct && text == "}" {
            break;
        }

        if token.kind == TokenKind::Punct && text == "," {
            expect_value = true;
            continue;
        }

        if expect_value && token.kind == TokenKind::Ident {
            values.push(text.to_owned());
            expect_value = false;
        }
    }

    if is_typedef {
        if let Some(token) = cursor.peek_significant(0) {
            if token.kind == TokenKind::Ident {
                let alias = token.text(cursor.src).to_owned();
                cursor.bump_significant();
                name = Some(alias);
            }
        }
    }

    if let Some(name) = name {
        inspection.enums.push(EnumDecl { name, values });
    }
}

/// Recognizes `... name ( args ) ;|{` starting from the current identifier run.
///
/// Returns `None` without consuming anything when the pattern does not complete; the caller
/// then advances normally.
fn try_function(
    cursor: &mut Cursor<'_>,
    decl_start: usize,
    doc: Option<String>,
) -> Option<FunctionDecl> {
    // Find the `(` following the identifier run, tracking the candidate name.
    let mut idx = cursor.pos;
    let mut last_ident: Option<&Token> = None;

    loop {
        let token = cursor.tokens.get(idx)?;

        if token.is_trivia() {
            idx += 1;
            continue;
        }

        match token.kind {
            TokenKind::Ident => {
                last_ident = Some(token);
                idx += 1;
            }
            TokenKind::Punct if token.text(cursor.src) == "*" => {
                idx += 1;
            }
            TokenKind::Punct if token.text(cursor.src) == "(" => break,
            _ => return None,
        }
    }

    let name = last_ident?.text(cursor.src).to_owned();

    // Scan to the matching `)`.
    let mut depth = 0usize;
    let mut end = None;
    let mut scan = idx;
    loop {
        let token = cursor.tokens.get(scan)?;

        if token.kind == TokenKind::Punct {
            match token.text(cursor.src) {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some((scan, token.end));
                        break;
                    }
                }
                _ => {}
            }
        }
        scan += 1;
    }
    let (close_idx, signature_end) = end?;

    // The declarator must terminate in `;` (prototype) or `{` (definition).
    let mut after = close_idx + 1;
    let terminator = loop {
        match cursor.tokens.get(after) {
            Some(token) if token.is_trivia() => after += 1,
            Some(token) if token.kind == TokenKind::Punct => break token.text(cursor.src),
            _ => return None,
        }
    };

    if terminator != ";" && terminator != "{" {
        return None;
    }

    cursor.pos = after + 1;
    if terminator == "{" {
        cursor.skip_balanced_braces();
    }

    Some(FunctionDecl {
        name,
        signature: decl_start..signature_end,
        doc,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn collects_documented_prototypes() {
        let src = r"
/** @route GET /user/{id} */
int api_user_get(int id);

int undocumented(void);
";

        let inspection = inspect(src);
        assert_eq!(inspection.functions.len(), 2);

        let documented = &inspection.functions[0];
        assert_eq!(documented.name, "api_user_get");
        assert_eq!(
            documented.doc.as_deref(),
            Some("/** @route GET /user/{id} */")
        );
        assert_eq!(
            &src[documented.signature.clone()],
            "int api_user_get(int id)"
        );

        assert_eq!(inspection.functions[1].doc, None);
    }

    #[test]
    fn skips_function_bodies() {
        let src = r"
int helper(int x) { if (x) { return x; } return 0; }
int after(void);
";

        let inspection = inspect(src);
        let names = inspection
            .functions
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["helper", "after"]);
    }

    #[test]
    fn collects_struct_and_enum_declarations() {
        let src = r"
struct Pet {
    int id;
    char *name;
};

typedef struct {
    double lat;
    double lon;
} Coord;

enum Color { RED, GREEN = 3, BLUE };
";

        let inspection = inspect(src);

        assert_eq!(inspection.structs.len(), 2);
        assert_eq!(inspection.structs[0].name, "Pet");
        assert_eq!(
            inspection.structs[0].members,
            vec![
                StructMember {
                    name: "id".to_owned(),
                    type_name: "int".to_owned()
                },
                StructMember {
                    name: "name".to_owned(),
                    type_name: "char*".to_owned()
                },
            ]
        );
        assert_eq!(inspection.structs[1].name, "Coord");

        assert_eq!(inspection.enums.len(), 1);
        assert_eq!(inspection.enums[0].values, vec!["RED", "GREEN", "BLUE"]);
    }

    #[test]
    fn collects_plain_typedefs() {
        let src = "typedef unsigned long u64_t;";
        let inspection = inspect(src);

        assert_eq!(
            inspection.typedefs,
            vec![TypedefDecl {
                name: "u64_t".to_owned(),
                target: "unsigned long".to_owned(),
            }]
        );
    }

    #[test]
    fn line_comment_runs_merge_into_one_block() {
        let src = "/// @route GET /a\n/// fetches a\nint get_a(void);";
        let inspection = inspect(src);

        assert_eq!(
            inspection.functions[0].doc.as_deref(),
            Some("/// @route GET /a\n/// fetches a")
        );
    }

    #[test]
    fn preprocessor_lines_are_ignored() {
        let src = "#include <stdio.h>\n#define MAX 10\nint f(int a);";
        let inspection = inspect(src);
        assert_eq!(inspection.functions.len(), 1);
    }
}
