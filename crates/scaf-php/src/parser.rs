//! Recursive-descent parser for the supported PHP subset
//!
//! Anchors are located by structural traversal of the token stream, never by
//! textual pattern matching. Anything outside the shapes the editors care
//! about (namespace/use header, class declarations, a top-level `return`) is
//! skipped in balanced units and left untouched.

use crate::ast::{
    ArrayEntry, ArrayLit, ClassDecl, Expr, MethodDecl, NamespaceDecl, ReturnStmt, SourceFile,
    UseDecl,
};
use crate::error::{Error, Result};
use crate::lexer::{self, Token, TokenKind};

/// Parse one source module.
pub fn parse_file(source: &str) -> Result<SourceFile> {
    let tokens = lexer::tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .file()
}

/// Check that `statement` lexes cleanly, is delimiter-balanced, and is
/// terminated like a statement. Used to validate caller-supplied statement
/// source before splicing it into a method body.
pub fn validate_statement(statement: &str) -> Result<()> {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidStatement {
            snippet: statement.to_string(),
            message: "empty statement".to_string(),
        });
    }
    let tokens = lexer::tokenize(trimmed).map_err(|e| Error::InvalidStatement {
        snippet: trimmed.to_string(),
        message: e.to_string(),
    })?;
    let mut stack = Vec::new();
    for token in &tokens {
        match token.kind {
            TokenKind::Punct(open @ ('(' | '[' | '{')) => stack.push(open),
            TokenKind::Punct(close @ (')' | ']' | '}')) => {
                let expected = match close {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return Err(Error::InvalidStatement {
                        snippet: trimmed.to_string(),
                        message: format!("unbalanced `{close}`"),
                    });
                }
            }
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(Error::InvalidStatement {
            snippet: trimmed.to_string(),
            message: format!("unclosed `{}`", stack[stack.len() - 1]),
        });
    }
    match tokens.last() {
        Some(last) if last.is_punct(';') || last.is_punct('}') => Ok(()),
        _ => Err(Error::InvalidStatement {
            snippet: trimmed.to_string(),
            message: "missing statement terminator".to_string(),
        }),
    }
}

/// Check that `method` parses as a complete method declaration, by wrapping
/// it in a synthetic enclosing class for parser context. The returned
/// declaration's spans point into the synthetic wrapper; only its name is
/// meaningful to callers.
pub fn validate_method(method: &str) -> Result<MethodDecl> {
    let wrapped = format!("<?php\nclass __ScafTmp\n{{\n{method}\n}}\n");
    let file = parse_file(&wrapped).map_err(|e| Error::InvalidMethod {
        message: e.to_string(),
    })?;
    file.classes
        .first()
        .and_then(|class| class.methods.first().cloned())
        .ok_or_else(|| Error::InvalidMethod {
            message: "no method declaration found".to_string(),
        })
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

const CLASS_MODIFIERS: &[&str] = &["final", "abstract", "readonly"];
const MEMBER_MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "final", "abstract", "readonly", "var",
];

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn err_here(&self, message: impl Into<String>) -> Error {
        let offset = self
            .peek()
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());
        Error::parse_at(self.source, offset, message)
    }

    fn at_ident(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(self.source, word))
    }

    fn at_punct(&self, ch: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(ch))
    }

    fn expect_punct(&mut self, ch: char) -> Result<Token> {
        if self.at_punct(ch) {
            Ok(self.bump().expect("peeked"))
        } else {
            Err(self.err_here(format!("expected `{ch}`")))
        }
    }

    /// Consume a balanced delimiter group, starting at its opening token.
    /// Returns the closing token.
    fn skip_balanced(&mut self) -> Result<Token> {
        let mut depth = 0usize;
        let start = self
            .peek()
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(token);
                    }
                }
                _ => {}
            }
        }
        Err(Error::parse_at(self.source, start, "unbalanced delimiters"))
    }

    /// Skip tokens until just past a `;` at delimiter depth zero.
    fn skip_statement(&mut self) -> Result<()> {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Punct(';') => {
                    self.bump();
                    return Ok(());
                }
                TokenKind::Punct('(' | '[' | '{') => {
                    self.skip_balanced()?;
                }
                _ => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    /// Parse a possibly-qualified name (`App\Providers\Foo`), returning it
    /// without any leading backslash.
    fn qualified_name(&mut self) -> Result<String> {
        let mut name = String::new();
        if self.peek().is_some_and(|t| t.kind == TokenKind::Backslash) {
            self.bump();
        }
        loop {
            match self.peek() {
                Some(t) if t.kind == TokenKind::Ident => {
                    name.push_str(t.text(self.source));
                    self.bump();
                }
                _ => break,
            }
            // Only follow a backslash that leads to another identifier;
            // group imports (`use A\{B, C}`) stop here.
            if self.peek().is_some_and(|t| t.kind == TokenKind::Backslash)
                && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Ident)
            {
                name.push('\\');
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.err_here("expected qualified name"));
        }
        Ok(name)
    }

    fn file(mut self) -> Result<SourceFile> {
        let mut file = SourceFile::default();

        if self.peek().is_some_and(|t| t.kind == TokenKind::OpenTag) {
            file.header_end = self.bump().expect("peeked").span.end;
        }

        while let Some(token) = self.peek().cloned() {
            match token.kind {
                TokenKind::Ident => {
                    let word = token.text(self.source);
                    match word {
                        "declare" => {
                            self.bump();
                            self.skip_statement()?;
                        }
                        "namespace" => {
                            self.bump();
                            let name = self.qualified_name()?;
                            let semi = self.expect_punct(';')?;
                            file.namespace = Some(NamespaceDecl {
                                name,
                                span: token.span.start..semi.span.end,
                            });
                        }
                        "use" => {
                            self.bump();
                            if let Some(decl) = self.use_decl(token.span.start)? {
                                file.uses.push(decl);
                            }
                        }
                        "return" => {
                            self.bump();
                            let expr = self.expr()?;
                            let semi = self.expect_punct(';')?;
                            file.ret = Some(ReturnStmt {
                                span: token.span.start..semi.span.end,
                                expr,
                            });
                        }
                        word if word == "class" || CLASS_MODIFIERS.contains(&word) => {
                            let class = self.class_decl(token.span.start)?;
                            file.classes.push(class);
                        }
                        _ => {
                            self.bump();
                        }
                    }
                }
                TokenKind::Punct('(' | '[' | '{') => {
                    self.skip_balanced()?;
                }
                _ => {
                    self.bump();
                }
            }
        }

        Ok(file)
    }

    /// Parse the remainder of a `use` statement. Group imports (`use A\{B, C};`)
    /// and aliased imports are skipped for dedup purposes but still consumed.
    fn use_decl(&mut self, start: usize) -> Result<Option<UseDecl>> {
        // `use function`/`use const` imports are consumed but not recorded.
        if self.at_ident("function") || self.at_ident("const") {
            self.skip_statement()?;
            return Ok(None);
        }
        let name = self.qualified_name()?;
        if self.at_punct(';') {
            let semi = self.bump().expect("peeked");
            return Ok(Some(UseDecl {
                name,
                span: start..semi.span.end,
            }));
        }
        // Alias or group import: not addressable by exact-name dedup.
        self.skip_statement()?;
        Ok(None)
    }

    fn class_decl(&mut self, start: usize) -> Result<ClassDecl> {
        while self
            .peek()
            .is_some_and(|t| CLASS_MODIFIERS.contains(&t.text(self.source)))
        {
            self.bump();
        }
        if !self.at_ident("class") {
            return Err(self.err_here("expected `class`"));
        }
        self.bump();

        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => {
                let name = t.text(self.source).to_string();
                self.bump();
                name
            }
            _ => return Err(self.err_here("expected class name")),
        };

        // extends / implements clauses
        while let Some(token) = self.peek() {
            if token.is_punct('{') {
                break;
            }
            self.bump();
        }
        let open = self.expect_punct('{')?;
        let body_start = open.span.end;

        let mut methods = Vec::new();
        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(Error::parse_at(
                    self.source,
                    open.span.start,
                    "unterminated class body",
                ));
            };
            if token.is_punct('}') {
                let close = self.bump().expect("peeked");
                return Ok(ClassDecl {
                    name,
                    span: start..close.span.end,
                    body_span: body_start..close.span.start,
                    methods,
                });
            }
            if let Some(method) = self.class_member()? {
                methods.push(method);
            }
        }
    }

    /// Parse one class member, returning a method declaration when the
    /// member is one. Properties, constants, and trait uses are skipped.
    fn class_member(&mut self) -> Result<Option<MethodDecl>> {
        let start = self
            .peek()
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());

        // Attributes: `#[...]`
        while self.at_punct('#') {
            self.bump();
            if self.at_punct('[') {
                self.skip_balanced()?;
            }
        }

        while self
            .peek()
            .is_some_and(|t| MEMBER_MODIFIERS.contains(&t.text(self.source)))
        {
            self.bump();
        }

        if !self.at_ident("function") {
            self.skip_statement()?;
            return Ok(None);
        }
        self.bump();

        // `function &name` by-reference returns
        if self.at_punct('&') {
            self.bump();
        }

        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => {
                let name = t.text(self.source).to_string();
                self.bump();
                name
            }
            _ => return Err(self.err_here("expected method name")),
        };

        if !self.at_punct('(') {
            return Err(self.err_here("expected parameter list"));
        }
        self.skip_balanced()?;

        // Return type and anything else before the body or terminator
        loop {
            match self.peek() {
                Some(t) if t.is_punct('{') => {
                    let open = self.bump().expect("peeked");
                    let close = {
                        // re-enter balanced skip from the already-consumed brace
                        let mut depth = 1usize;
                        let mut close = None;
                        while let Some(token) = self.bump() {
                            match token.kind {
                                TokenKind::Punct('{') => depth += 1,
                                TokenKind::Punct('}') => {
                                    depth -= 1;
                                    if depth == 0 {
                                        close = Some(token);
                                        break;
                                    }
                                }
                                _ => {}
                            }
                        }
                        close.ok_or_else(|| {
                            Error::parse_at(self.source, open.span.start, "unterminated method body")
                        })?
                    };
                    return Ok(Some(MethodDecl {
                        name,
                        span: start..close.span.end,
                        body_span: Some(open.span.end..close.span.start),
                    }));
                }
                Some(t) if t.is_punct(';') => {
                    let semi = self.bump().expect("peeked");
                    return Ok(Some(MethodDecl {
                        name,
                        span: start..semi.span.end,
                        body_span: None,
                    }));
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.err_here("unterminated method declaration")),
            }
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.err_here("expected expression"));
        };

        match token.kind {
            TokenKind::Punct('[') => self.array().map(Expr::Array),
            TokenKind::Str => {
                self.bump();
                // A literal followed by an operator (`'a' . 'b'`) is not a
                // plain scalar; fall back to a raw expression.
                if self.continues_expression() {
                    return self.raw_expr(token);
                }
                Ok(Expr::Str {
                    value: lexer::unquote(token.text(self.source)),
                    span: token.span,
                })
            }
            TokenKind::Int => {
                self.bump();
                if self.continues_expression() {
                    return self.raw_expr(token);
                }
                let text = token.text(self.source).replace('_', "");
                match text.parse::<i64>() {
                    Ok(value) => Ok(Expr::Int {
                        value,
                        span: token.span,
                    }),
                    Err(_) => Ok(Expr::Raw { span: token.span }),
                }
            }
            TokenKind::Float => {
                self.bump();
                if self.continues_expression() {
                    return self.raw_expr(token);
                }
                let text = token.text(self.source).replace('_', "");
                match text.parse::<f64>() {
                    Ok(value) => Ok(Expr::Float {
                        value,
                        span: token.span,
                    }),
                    Err(_) => Ok(Expr::Raw { span: token.span }),
                }
            }
            TokenKind::Ident => {
                let word = token.text(self.source);
                if word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false") {
                    self.bump();
                    if self.continues_expression() {
                        return self.raw_expr(token);
                    }
                    return Ok(Expr::Bool {
                        value: word.eq_ignore_ascii_case("true"),
                        span: token.span,
                    });
                }
                if word.eq_ignore_ascii_case("null") {
                    self.bump();
                    if self.continues_expression() {
                        return self.raw_expr(token);
                    }
                    return Ok(Expr::Null { span: token.span });
                }
                self.bump();
                self.raw_expr(token)
            }
            _ => {
                self.bump();
                self.raw_expr(token)
            }
        }
    }

    /// Whether the next token continues the current expression rather than
    /// terminating it (`,`, `]`, `)`, `;`, `=>`).
    fn continues_expression(&self) -> bool {
        match self.peek() {
            None => false,
            Some(t) => !matches!(
                t.kind,
                TokenKind::DoubleArrow | TokenKind::Punct(',' | ']' | ')' | ';' | '}')
            ),
        }
    }

    /// Consume the rest of an opaque expression. `first` has already been
    /// consumed. Arrow functions swallow their `=>`; every other expression
    /// stops at a top-level `=>` so array keys parse correctly.
    fn raw_expr(&mut self, first: Token) -> Result<Expr> {
        let is_lambda = matches!(first.kind, TokenKind::Ident)
            && matches!(first.text(self.source), "fn" | "function" | "static");
        let mut depth = usize::from(matches!(first.kind, TokenKind::Punct('(' | '[' | '{')));
        let mut end = first.span.end;

        loop {
            let Some(token) = self.peek() else { break };
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') if depth == 0 => break,
                TokenKind::Punct(')' | ']' | '}') => depth -= 1,
                TokenKind::Punct(',' | ';') if depth == 0 => break,
                TokenKind::DoubleArrow if depth == 0 && !is_lambda => break,
                _ => {}
            }
            end = token.span.end;
            self.bump();
        }

        Ok(Expr::Raw {
            span: first.span.start..end,
        })
    }

    fn array(&mut self) -> Result<ArrayLit> {
        let open = self.expect_punct('[')?;
        let mut entries = Vec::new();

        loop {
            if self.at_punct(']') {
                let close = self.bump().expect("peeked");
                return Ok(ArrayLit {
                    span: open.span.start..close.span.end,
                    entries,
                });
            }
            if self.peek().is_none() {
                return Err(Error::parse_at(
                    self.source,
                    open.span.start,
                    "unterminated array literal",
                ));
            }

            let first = self.expr()?;
            let entry = if self
                .peek()
                .is_some_and(|t| t.kind == TokenKind::DoubleArrow)
            {
                self.bump();
                let value = self.expr()?;
                let key = match &first {
                    Expr::Str { value, .. } => Some(value.clone()),
                    Expr::Int { value, .. } => Some(value.to_string()),
                    _ => None,
                };
                ArrayEntry {
                    key,
                    span: first.span().start..value.span().end,
                    value,
                }
            } else {
                ArrayEntry {
                    key: None,
                    span: first.span(),
                    value: first,
                }
            };
            entries.push(entry);

            if self.at_punct(',') {
                self.bump();
            } else if !self.at_punct(']') {
                return Err(self.err_here("expected `,` or `]` in array literal"));
            }
        }
    }
}
