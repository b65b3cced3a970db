//! Span-annotated syntax nodes for the supported PHP subset
//!
//! The nodes only model what the editors anchor on: the namespace/use header,
//! class declarations with their methods, and a top-level `return` expression.
//! Every node carries byte spans into the original source so edits can splice
//! text without re-rendering anything else.

use std::ops::Range;

/// One parsed source module.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Byte offset just past the `<?php` tag (0 if absent).
    pub header_end: usize,
    pub namespace: Option<NamespaceDecl>,
    pub uses: Vec<UseDecl>,
    pub classes: Vec<ClassDecl>,
    /// The top-level `return <expr>;` statement, if any.
    pub ret: Option<ReturnStmt>,
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub name: String,
    /// Span of the whole statement including the semicolon.
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct UseDecl {
    /// Fully-qualified name without a leading backslash.
    pub name: String,
    /// Span of the whole statement including the semicolon.
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    /// From the `class` keyword through the closing brace.
    pub span: Range<usize>,
    /// Between the braces, exclusive.
    pub body_span: Range<usize>,
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// From the first modifier (or `function`) through the closing brace or
    /// semicolon.
    pub span: Range<usize>,
    /// Between the body braces, exclusive. Absent for abstract methods.
    pub body_span: Option<Range<usize>>,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    /// From the `return` keyword through the semicolon.
    pub span: Range<usize>,
    pub expr: Expr,
}

impl ReturnStmt {
    /// The returned array literal, if that is what the module returns.
    pub fn array(&self) -> Option<&ArrayLit> {
        match &self.expr {
            Expr::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// An expression, as far as the editors need to distinguish shapes.
#[derive(Debug, Clone)]
pub enum Expr {
    Array(ArrayLit),
    Str { value: String, span: Range<usize> },
    Int { value: i64, span: Range<usize> },
    Float { value: f64, span: Range<usize> },
    Bool { value: bool, span: Range<usize> },
    Null { span: Range<usize> },
    /// Any other balanced expression, kept as an opaque span.
    Raw { span: Range<usize> },
}

impl Expr {
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Array(array) => array.span.clone(),
            Self::Str { span, .. }
            | Self::Int { span, .. }
            | Self::Float { span, .. }
            | Self::Bool { span, .. }
            | Self::Null { span }
            | Self::Raw { span } => span.clone(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayLit> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// A `[...]` array literal.
#[derive(Debug, Clone)]
pub struct ArrayLit {
    /// Including the brackets.
    pub span: Range<usize>,
    pub entries: Vec<ArrayEntry>,
}

impl ArrayLit {
    /// Find the entry with the given string key.
    pub fn entry(&self, key: &str) -> Option<&ArrayEntry> {
        self.entries
            .iter()
            .find(|e| e.key.as_deref() == Some(key))
    }

    /// Whether the literal spans multiple lines in the source.
    pub fn is_multiline(&self, source: &str) -> bool {
        source[self.span.clone()].contains('\n')
    }
}

/// One `key => value` or positional entry.
#[derive(Debug, Clone)]
pub struct ArrayEntry {
    /// The unquoted string key, when the key is a string literal. Integer
    /// and expression keys are kept but not addressable by dot-path.
    pub key: Option<String>,
    /// From the key (or value) start through the value end, excluding any
    /// trailing comma.
    pub span: Range<usize>,
    pub value: Expr,
}
