//! Token scanner for the supported PHP subset
//!
//! Produces a flat token stream with byte spans into the original source.
//! Whitespace and comments are skipped during scanning; format preservation
//! comes from span-based editing, not from retaining trivia.

use std::ops::Range;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<?php`
    OpenTag,
    /// Identifier or keyword.
    Ident,
    /// `$name`
    Variable,
    /// Integer literal.
    Int,
    /// Float literal.
    Float,
    /// Quoted string literal; the span includes the quotes.
    Str,
    /// `=>`
    DoubleArrow,
    /// `->`
    Arrow,
    /// `::`
    DoubleColon,
    /// `\` (namespace separator)
    Backslash,
    /// Any single-character punctuation.
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    pub fn is_ident(&self, source: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == word
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }
}

/// Tokenize `source`. Unterminated strings and block comments are fatal.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = source[pos..].chars().next().expect("pos is on a char boundary");

        // Whitespace
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        // Open tag
        if source[pos..].starts_with("<?php") {
            tokens.push(Token {
                kind: TokenKind::OpenTag,
                span: pos..pos + 5,
            });
            pos += 5;
            continue;
        }

        // Line comments (`//` and `#`, but `#[` starts an attribute)
        if source[pos..].starts_with("//")
            || (ch == '#' && !source[pos..].starts_with("#["))
        {
            match source[pos..].find('\n') {
                Some(offset) => pos += offset + 1,
                None => pos = bytes.len(),
            }
            continue;
        }

        // Block comments and docblocks
        if source[pos..].starts_with("/*") {
            match source[pos + 2..].find("*/") {
                Some(offset) => pos += 2 + offset + 2,
                None => {
                    return Err(Error::parse_at(source, pos, "unterminated block comment"));
                }
            }
            continue;
        }

        // String literals
        if ch == '\'' || ch == '"' {
            let start = pos;
            pos += 1;
            let mut closed = false;
            while pos < bytes.len() {
                let c = bytes[pos] as char;
                if c == '\\' {
                    pos += 2;
                    continue;
                }
                if c == ch {
                    pos += 1;
                    closed = true;
                    break;
                }
                pos += 1;
            }
            if !closed {
                return Err(Error::parse_at(source, start, "unterminated string literal"));
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                span: start..pos,
            });
            continue;
        }

        // Numbers
        if ch.is_ascii_digit() {
            let start = pos;
            let mut is_float = false;
            while pos < bytes.len() {
                let c = bytes[pos] as char;
                if c.is_ascii_alphanumeric() || c == '_' {
                    pos += 1;
                } else if c == '.'
                    && pos + 1 < bytes.len()
                    && (bytes[pos + 1] as char).is_ascii_digit()
                {
                    is_float = true;
                    pos += 1;
                } else {
                    break;
                }
            }
            let text = &source[start..pos];
            if text.contains(['e', 'E']) && !text.starts_with("0x") && !text.starts_with("0X") {
                is_float = true;
            }
            tokens.push(Token {
                kind: if is_float {
                    TokenKind::Float
                } else {
                    TokenKind::Int
                },
                span: start..pos,
            });
            continue;
        }

        // Variables
        if ch == '$' {
            let start = pos;
            pos += 1;
            while pos < bytes.len() {
                let c = bytes[pos] as char;
                if c.is_ascii_alphanumeric() || c == '_' {
                    pos += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Variable,
                span: start..pos,
            });
            continue;
        }

        // Identifiers and keywords (PHP allows non-ASCII identifier bytes)
        if ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii() {
            let start = pos;
            for (offset, c) in source[pos..].char_indices() {
                if c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii() {
                    pos = start + offset + c.len_utf8();
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                span: start..pos,
            });
            continue;
        }

        // Multi-character operators we care about
        if source[pos..].starts_with("=>") {
            tokens.push(Token {
                kind: TokenKind::DoubleArrow,
                span: pos..pos + 2,
            });
            pos += 2;
            continue;
        }
        if source[pos..].starts_with("->") {
            tokens.push(Token {
                kind: TokenKind::Arrow,
                span: pos..pos + 2,
            });
            pos += 2;
            continue;
        }
        if source[pos..].starts_with("::") {
            tokens.push(Token {
                kind: TokenKind::DoubleColon,
                span: pos..pos + 2,
            });
            pos += 2;
            continue;
        }

        if ch == '\\' {
            tokens.push(Token {
                kind: TokenKind::Backslash,
                span: pos..pos + 1,
            });
            pos += 1;
            continue;
        }

        // Everything else is single-character punctuation. Raw expressions
        // only need balanced-delimiter scanning, so `==`, `&&` and friends
        // can stay as punct sequences.
        tokens.push(Token {
            kind: TokenKind::Punct(ch),
            span: pos..pos + ch.len_utf8(),
        });
        pos += ch.len_utf8();
    }

    Ok(tokens)
}

/// Unescape a PHP string literal (span includes the quotes).
pub fn unquote(literal: &str) -> String {
    let Some(quote) = literal.chars().next() else {
        return String::new();
    };
    let inner = &literal[1..literal.len().saturating_sub(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some(c) if c == quote => out.push(c),
            Some('n') if quote == '"' => out.push('\n'),
            Some('t') if quote == '"' => out.push('\t'),
            Some('$') if quote == '"' => out.push('$'),
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("<?php return ['a' => 1];"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Ident,
                TokenKind::Punct('['),
                TokenKind::Str,
                TokenKind::DoubleArrow,
                TokenKind::Int,
                TokenKind::Punct(']'),
                TokenKind::Punct(';'),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("// line\n/* block */ $x # hash\n;"),
            vec![TokenKind::Variable, TokenKind::Punct(';')]
        );
    }

    #[test]
    fn test_attribute_hash_is_not_a_comment() {
        assert_eq!(
            kinds("#[Override]"),
            vec![
                TokenKind::Punct('#'),
                TokenKind::Punct('['),
                TokenKind::Ident,
                TokenKind::Punct(']'),
            ]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        let tokens = tokenize(r#"'it\'s' "a\"b""#).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(unquote(tokens[0].text(r#"'it\'s' "a\"b""#)), "it's");
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        assert!(matches!(
            tokenize("'oops"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_qualified_name_tokens() {
        assert_eq!(
            kinds("use App\\Providers\\AppServiceProvider;"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Backslash,
                TokenKind::Ident,
                TokenKind::Backslash,
                TokenKind::Ident,
                TokenKind::Punct(';'),
            ]
        );
    }

    #[test]
    fn test_float_and_int() {
        assert_eq!(kinds("1 2.5"), vec![TokenKind::Int, TokenKind::Float]);
    }
}
