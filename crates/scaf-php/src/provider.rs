//! Service-provider module editor
//!
//! Edits a PHP class module in place: imports in the `use` header, statements
//! appended to lifecycle method bodies, and whole methods added to the class.
//! Statement and method fragments are validated before they are queued so a
//! bad fragment fails fast instead of corrupting the module on save.

use std::path::{Path, PathBuf};

use scaf_edit::Editor;

use crate::ast::{ClassDecl, SourceFile};
use crate::edit::{SourceEdit, apply_edits};
use crate::error::{Error, Result};
use crate::parser::{parse_file, validate_method, validate_statement};

const INDENT_STEP: usize = 4;

#[derive(Debug, Clone)]
enum ProviderOp {
    AddUses(Vec<String>),
    AddToMethod { method: String, statement: String },
    AddMethods(Vec<String>),
}

/// Editor for class modules such as Laravel service providers.
#[derive(Debug)]
pub struct ProviderEditor {
    path: PathBuf,
    original: String,
    source: String,
    ops: Vec<ProviderOp>,
}

impl ProviderEditor {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = scaf_fs::read_text(path)?;
        Ok(Self::from_content(path, content))
    }

    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            original: content.clone(),
            source: content,
            ops: Vec::new(),
        }
    }

    /// Current (possibly edited, unsaved) source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The source text a save would write, with pending operations applied.
    pub fn preview(&self) -> Result<String> {
        apply_ops(self.source.clone(), &self.ops)
    }

    /// Queue `use` imports for the module header. Names already imported are
    /// skipped at save time; the rest are added in the order given.
    pub fn add_use_statements<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim_start_matches('\\').to_string())
            .collect();
        if !names.is_empty() {
            self.ops.push(ProviderOp::AddUses(names));
        }
        self
    }

    /// Queue a statement for the end of the `register` method body.
    pub fn add_to_register(&mut self, statement: &str) -> Result<&mut Self> {
        self.add_to_method("register", statement)
    }

    /// Queue a statement for the end of the `boot` method body.
    pub fn add_to_boot(&mut self, statement: &str) -> Result<&mut Self> {
        self.add_to_method("boot", statement)
    }

    /// Queue a statement for the end of the named method body. The statement
    /// must lex, balance its delimiters, and end in `;` or `}`.
    pub fn add_to_method(&mut self, method: &str, statement: &str) -> Result<&mut Self> {
        validate_statement(statement)?;
        self.ops.push(ProviderOp::AddToMethod {
            method: method.to_string(),
            statement: statement.trim().to_string(),
        });
        Ok(self)
    }

    /// Queue complete method declarations to append to the class body. Each
    /// fragment must parse as a class method on its own.
    pub fn add_methods<I, S>(&mut self, methods: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods: Vec<String> = methods
            .into_iter()
            .map(|m| m.into().trim().to_string())
            .collect();
        for method in &methods {
            validate_method(method)?;
        }
        if !methods.is_empty() {
            self.ops.push(ProviderOp::AddMethods(methods));
        }
        Ok(self)
    }
}

impl Editor for ProviderEditor {
    type Error = Error;

    fn is_changed(&self) -> bool {
        !self.ops.is_empty() || self.source != self.original
    }

    fn save(&mut self) -> Result<bool> {
        if self.ops.is_empty() && self.source == self.original {
            return Ok(false);
        }

        self.source = apply_ops(self.source.clone(), &self.ops)?;
        self.ops.clear();

        if self.source == self.original {
            return Ok(false);
        }

        scaf_fs::write_text(&self.path, &self.source)?;
        tracing::debug!(path = %self.path.display(), "provider module written");
        self.original = self.source.clone();
        Ok(true)
    }
}

/// Apply queued operations in order, reparsing between operations.
fn apply_ops(mut source: String, ops: &[ProviderOp]) -> Result<String> {
    for op in ops {
        let file = parse_file(&source)?;
        let edits = apply_op(&source, &file, op)?;
        if !edits.is_empty() {
            source = apply_edits(&source, edits)?;
        }
    }
    Ok(source)
}

fn apply_op(source: &str, file: &SourceFile, op: &ProviderOp) -> Result<Vec<SourceEdit>> {
    match op {
        ProviderOp::AddUses(names) => Ok(apply_uses(source, file, names)),
        ProviderOp::AddToMethod { method, statement } => {
            Ok(apply_statement(source, file, method, statement))
        }
        ProviderOp::AddMethods(methods) => apply_methods(source, file, methods),
    }
}

fn apply_uses(source: &str, file: &SourceFile, names: &[String]) -> Vec<SourceEdit> {
    let missing: Vec<&String> = names
        .iter()
        .filter(|name| !file.uses.iter().any(|u| &u.name == *name))
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let lines: Vec<String> = missing.iter().map(|name| format!("use {name};")).collect();

    // Before the first existing import, after the namespace, or after the
    // open tag, in that order of preference.
    if let Some(first) = file.uses.first() {
        let line_start = source[..first.span.start].rfind('\n').map_or(0, |p| p + 1);
        vec![SourceEdit::insert(
            line_start,
            format!("{}\n", lines.join("\n")),
        )]
    } else if let Some(namespace) = &file.namespace {
        vec![SourceEdit::insert(
            namespace.span.end,
            format!("\n\n{}", lines.join("\n")),
        )]
    } else {
        vec![SourceEdit::insert(
            file.header_end,
            format!("\n\n{}", lines.join("\n")),
        )]
    }
}

fn apply_statement(
    source: &str,
    file: &SourceFile,
    method: &str,
    statement: &str,
) -> Vec<SourceEdit> {
    // A module without the target class or method has nowhere to put the
    // statement; the operation is skipped.
    let Some(class) = file.classes.first() else {
        return Vec::new();
    };
    let Some(decl) = class.method(method) else {
        tracing::debug!(method, "method not found, statement skipped");
        return Vec::new();
    };
    let Some(body_span) = &decl.body_span else {
        return Vec::new();
    };

    let body = &source[body_span.clone()];
    let base = line_indent(source, decl.span.start);
    let inner = base + INDENT_STEP;
    let indented = reindent(statement, inner);

    // A body holding only the scaffolded `//` placeholder is replaced
    // outright; anything else keeps its statements and grows at the end.
    if body.trim().is_empty() || body.trim() == "//" {
        let text = format!("\n{indented}\n{}", " ".repeat(base));
        vec![SourceEdit::replace(body_span.clone(), text)]
    } else {
        let insert_at = body_span.start + body.trim_end().len();
        vec![SourceEdit::insert(insert_at, format!("\n{indented}"))]
    }
}

fn apply_methods(source: &str, file: &SourceFile, methods: &[String]) -> Result<Vec<SourceEdit>> {
    let Some(class) = file.classes.first() else {
        return Err(Error::NoClassFound);
    };

    let mut edits = Vec::new();
    for method in methods {
        if let Some(edit) = append_method(source, class, method) {
            edits.push(edit);
        }
    }
    Ok(edits)
}

fn append_method(source: &str, class: &ClassDecl, method: &str) -> Option<SourceEdit> {
    if method_exists(class, method) {
        return None;
    }

    let body = &source[class.body_span.clone()];
    let indented = reindent(method, INDENT_STEP);
    if body.trim().is_empty() {
        Some(SourceEdit::replace(
            class.body_span.clone(),
            format!("\n{indented}\n"),
        ))
    } else {
        let insert_at = class.body_span.start + body.trim_end().len();
        Some(SourceEdit::insert(insert_at, format!("\n\n{indented}")))
    }
}

/// Whether the class already declares the method the fragment defines.
fn method_exists(class: &ClassDecl, fragment: &str) -> bool {
    parsed_method_name(fragment).is_some_and(|name| class.methods.iter().any(|m| m.name == name))
}

/// Name declared by a standalone method fragment, via [`validate_method`]'s
/// wrapper parse.
fn parsed_method_name(fragment: &str) -> Option<String> {
    validate_method(fragment).ok().map(|decl| decl.name)
}

/// Leading-whitespace width of the line containing `pos`.
fn line_indent(source: &str, pos: usize) -> usize {
    let line_start = source[..pos].rfind('\n').map_or(0, |p| p + 1);
    source[line_start..pos]
        .chars()
        .take_while(|c| *c == ' ')
        .count()
}

/// Prefix every non-blank line of `text` with `indent` spaces, preserving the
/// fragment's own relative indentation.
fn reindent(text: &str, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
