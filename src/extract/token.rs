//! Byte-span-tagged lexical tokens over a C source buffer.

/// Lexical class of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,

    /// Numeric literal, including suffixes.
    Number,

    /// String literal.
    Str,

    /// Character literal.
    Char,

    /// Single punctuator byte.
    Punct,

    /// Block or line comment.
    Comment,

    /// Preprocessor line, up to its (possibly continued) end.
    Directive,

    /// Run of whitespace.
    Whitespace,
}

/// A token with its byte span into the source buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenKind,

    /// Byte offset of the first byte.
    pub start: usize,

    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Token {
    /// The token's text within its source buffer.
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }

    /// True for whitespace and comment tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Directive
        )
    }
}

/// Tokenizes a C source buffer.
///
/// The lexer never fails: unterminated strings and comments extend to the end of the buffer.
pub fn tokenize(src: &str) -> Vec<Token> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut at_line_start = true;

    while pos < bytes.len() {
        let start = pos;
        let byte = bytes[pos];

        let kind = if byte.is_ascii_whitespace() {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            TokenKind::Whitespace
        } else if byte == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            TokenKind::Comment
        } else if byte == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            pos += 2;
            while pos < bytes.len() {
                if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            TokenKind::Comment
        } else if byte == b'#' && at_line_start {
            // Preprocessor line; honor backslash continuations.
            while pos < bytes.len() && bytes[pos] != b'\n' {
                if bytes[pos] == b'\\' && bytes.get(pos + 1) == Some(&b'\n') {
                    pos += 1;
                }
                pos += 1;
            }
            TokenKind::Directive
        } else if byte == b'"' {
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'"' {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            pos = (pos + 1).min(bytes.len());
            TokenKind::Str
        } else if byte == b'\'' {
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'\'' {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            pos = (pos + 1).min(bytes.len());
            TokenKind::Char
        } else if byte == b'_' || byte.is_ascii_alphabetic() {
            while pos < bytes.len() && (bytes[pos] == b'_' || bytes[pos].is_ascii_alphanumeric()) {
                pos += 1;
            }
            TokenKind::Ident
        } else if byte.is_ascii_digit() {
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'.' || bytes[pos] == b'_')
            {
                pos += 1;
            }
            TokenKind::Number
        } else {
            pos += 1;
            TokenKind::Punct
        };

        if kind == TokenKind::Whitespace {
            if src[start..pos].contains('\n') {
                at_line_start = true;
            }
        } else {
            at_line_start = false;
        }

        tokens.push(Token {
            kind,
            start,
            end: pos,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text(src)))
            .collect()
    }

    #[test]
    fn lexes_declaration_tokens() {
        assert_eq!(
            kinds("int api_user_get(int id);"),
            vec![
                (TokenKind::Ident, "int"),
                (TokenKind::Ident, "api_user_get"),
                (TokenKind::Punct, "("),
                (TokenKind::Ident, "int"),
                (TokenKind::Ident, "id"),
                (TokenKind::Punct, ")"),
                (TokenKind::Punct, ";"),
            ]
        );
    }

    #[test]
    fn lexes_comments_and_strings() {
        let src = "/* block */ // line\n\"str \\\" esc\" 'c'";
        assert_eq!(
            kinds(src),
            vec![
                (TokenKind::Comment, "/* block */"),
                (TokenKind::Comment, "// line"),
                (TokenKind::Str, "\"str \\\" esc\""),
                (TokenKind::Char, "'c'"),
            ]
        );
    }

    #[test]
    fn preprocessor_lines_are_single_tokens() {
        let src = "#include <stdio.h>\nint x;";
        let tokens = kinds(src);
        assert_eq!(tokens[0], (TokenKind::Directive, "#include <stdio.h>"));
        assert_eq!(tokens[1], (TokenKind::Ident, "int"));
    }

    #[test]
    fn hash_mid_line_is_a_punctuator() {
        let src = "a # b";
        assert_eq!(
            kinds(src),
            vec![
                (TokenKind::Ident, "a"),
                (TokenKind::Punct, "#"),
                (TokenKind::Ident, "b"),
            ]
        );
    }

    #[test]
    fn spans_cover_the_buffer() {
        let src = "int a = 1; /* tail";
        let tokens = tokenize(src);
        assert_eq!(tokens.first().unwrap().start, 0);
        assert_eq!(tokens.last().unwrap().end, src.len());

        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
