//! Rendering structured values as PHP source literals
//!
//! Total over the closed value variant set. Raw expressions pass through
//! verbatim after callable normalization: single-expression arrow functions
//! are unwrapped to their inner expression, and multi-statement closures are
//! a hard failure rather than a source of malformed output.

use scaf_edit::Value;

use crate::error::{Error, Result};
use crate::lexer::{self, TokenKind};

const INDENT_STEP: usize = 4;

/// Render `value` as a PHP literal. `indent` is the column of the line the
/// literal starts on; nested array lines indent one step further.
pub fn render_value(value: &Value, indent: usize) -> Result<String> {
    Ok(match value {
        Value::Str(s) => quote(s),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => {
            let mut text = format!("{n}");
            if !text.contains(['.', 'e', 'E', 'n']) {
                text.push_str(".0");
            }
            text
        }
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Null => "null".to_string(),
        Value::List(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let inner = items
                    .iter()
                    .map(|item| {
                        Ok(format!(
                            "{}{},",
                            " ".repeat(indent + INDENT_STEP),
                            render_value(item, indent + INDENT_STEP)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                format!("[\n{}\n{}]", inner.join("\n"), " ".repeat(indent))
            }
        }
        Value::Map(entries) => {
            if entries.is_empty() {
                "[]".to_string()
            } else {
                let inner = entries
                    .iter()
                    .map(|(key, item)| {
                        Ok(format!(
                            "{}{} => {},",
                            " ".repeat(indent + INDENT_STEP),
                            quote(key),
                            render_value(item, indent + INDENT_STEP)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                format!("[\n{}\n{}]", inner.join("\n"), " ".repeat(indent))
            }
        }
        Value::Raw(text) => normalize_raw(text)?,
    })
}

/// Single-quote a string for PHP source.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Normalize a raw expression for use as a config value.
///
/// Arrow functions (`fn (...) => expr`, optionally `static`) are unwrapped to
/// exactly their inner expression. Full closures (`function (...) { ... }`)
/// cannot be represented as a single expression and fail loudly. Any other
/// text passes through with statement termination stripped.
fn normalize_raw(text: &str) -> Result<String> {
    let trimmed = text.trim().trim_end_matches(';').trim_end();

    let after_static = trimmed.strip_prefix("static").map(str::trim_start);
    let callable = after_static.unwrap_or(trimmed);

    if starts_with_word(callable, "function") {
        return Err(Error::MultiStatementClosure);
    }
    if starts_with_word(callable, "fn") {
        return arrow_body(callable);
    }

    Ok(trimmed.to_string())
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word).is_some_and(|rest| {
        rest.chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_')
    })
}

/// Extract the inner expression of an arrow function by locating its `=>`
/// at delimiter depth zero and re-tokenizing the remainder.
fn arrow_body(source: &str) -> Result<String> {
    let tokens = lexer::tokenize(source).map_err(|_| Error::MultiStatementClosure)?;
    let mut depth = 0usize;
    let mut body_start = None;
    for token in &tokens {
        match token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            TokenKind::DoubleArrow if depth == 0 => {
                body_start = Some(token.span.end);
                break;
            }
            _ => {}
        }
    }
    let Some(start) = body_start else {
        return Err(Error::MultiStatementClosure);
    };

    let body = source[start..].trim().trim_end_matches(';').trim_end();
    if body.is_empty() {
        return Err(Error::MultiStatementClosure);
    }
    // Re-parse: the body must itself be one balanced expression.
    let body_tokens = lexer::tokenize(body).map_err(|_| Error::MultiStatementClosure)?;
    let mut depth = 0usize;
    for token in &body_tokens {
        match token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => {
                if depth == 0 {
                    return Err(Error::MultiStatementClosure);
                }
                depth -= 1;
            }
            TokenKind::Punct(';') if depth == 0 => {
                return Err(Error::MultiStatementClosure);
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::MultiStatementClosure);
    }
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalars() {
        assert_eq!(render_value(&Value::str("it's"), 0).unwrap(), "'it\\'s'");
        assert_eq!(render_value(&Value::Int(42), 0).unwrap(), "42");
        assert_eq!(render_value(&Value::Float(1.0), 0).unwrap(), "1.0");
        assert_eq!(render_value(&Value::Float(2.5), 0).unwrap(), "2.5");
        assert_eq!(render_value(&Value::Bool(true), 0).unwrap(), "true");
        assert_eq!(render_value(&Value::Null, 0).unwrap(), "null");
    }

    #[test]
    fn test_nested_map_rendering() {
        let value = Value::map([(
            "mysql",
            Value::map([("host", Value::str("127.0.0.1")), ("port", Value::Int(3306))]),
        )]);
        assert_eq!(
            render_value(&value, 4).unwrap(),
            "[\n        'mysql' => [\n            'host' => '127.0.0.1',\n            'port' => 3306,\n        ],\n    ]"
        );
    }

    #[test]
    fn test_empty_collections_render_inline() {
        assert_eq!(render_value(&Value::list([]), 0).unwrap(), "[]");
        assert_eq!(render_value(&Value::Map(vec![]), 0).unwrap(), "[]");
    }

    #[test]
    fn test_raw_passthrough_strips_terminator() {
        assert_eq!(
            render_value(&Value::raw("env('APP_NAME', 'Laravel');"), 0).unwrap(),
            "env('APP_NAME', 'Laravel')"
        );
    }

    #[test]
    fn test_arrow_fn_unwraps_to_inner_expression() {
        assert_eq!(
            render_value(&Value::raw("fn () => env('APP_KEY')"), 0).unwrap(),
            "env('APP_KEY')"
        );
        assert_eq!(
            render_value(&Value::raw("static fn ($app) => $app->make('x');"), 0).unwrap(),
            "$app->make('x')"
        );
    }

    #[test]
    fn test_arrow_fn_with_nested_double_arrow() {
        assert_eq!(
            render_value(&Value::raw("fn () => ['a' => 1]"), 0).unwrap(),
            "['a' => 1]"
        );
    }

    #[test]
    fn test_full_closure_is_rejected() {
        let err = render_value(&Value::raw("function () { return 1; }"), 0).unwrap_err();
        assert!(matches!(err, Error::MultiStatementClosure));
        let message = err.to_string();
        assert!(message.contains("arrow function"));
    }

    #[test]
    fn test_multi_statement_arrow_body_is_rejected() {
        // two statements smuggled into an arrow body
        let err = render_value(&Value::raw("fn () => a(); b()"), 0).unwrap_err();
        assert!(matches!(err, Error::MultiStatementClosure));
    }
}
