//! Config-module editor
//!
//! Edits the array literal returned by a PHP configuration module
//! (`return [...];`) by dot-path. Edits queue on the editor and are applied
//! on save, one reparse per operation, so each operation sees the structure
//! left behind by the previous one. Untouched regions of the file are never
//! re-rendered.

use std::path::{Path, PathBuf};

use scaf_edit::{Editor, Value};

use crate::ast::{ArrayEntry, ArrayLit, SourceFile};
use crate::edit::{SourceEdit, apply_edits};
use crate::error::{Error, Result};
use crate::parser::parse_file;
use crate::render::{quote, render_value};

#[derive(Debug, Clone)]
enum ConfigOp {
    Set { path: String, value: Value },
    Append { path: String, value: Value },
    Merge { path: String, values: Value },
    Remove { path: String },
}

/// Editor for configuration modules returning a single array literal.
///
/// # Examples
///
/// ```
/// use scaf_edit::Value;
/// use scaf_php::ConfigEditor;
///
/// let mut config = ConfigEditor::from_content(
///     "/tmp/app.php",
///     "<?php\n\nreturn [\n    'name' => 'Laravel',\n];\n",
/// );
/// config.set("debug", Value::Bool(true));
/// ```
#[derive(Debug)]
pub struct ConfigEditor {
    path: PathBuf,
    original: String,
    source: String,
    ops: Vec<ConfigOp>,
}

impl ConfigEditor {
    /// Load the module at `path`. A missing or unreadable file is a hard
    /// error; the content is parsed lazily on save.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = scaf_fs::read_text(path)?;
        Ok(Self::from_content(path, content))
    }

    /// Build an editor over already-loaded content.
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

    /// Create or replace the value at `path`, creating intermediate nested
    /// arrays as needed.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.ops.push(ConfigOp::Set {
            path: path.to_string(),
            value: value.into(),
        });
        self
    }

    /// Append one positional element to the array at `path`, creating the
    /// array if absent.
    pub fn append(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.ops.push(ConfigOp::Append {
            path: path.to_string(),
            value: value.into(),
        });
        self
    }

    /// Merge a map (keyed entries) or list (positional entries) into the
    /// array at `path`. Existing keys are replaced; new ones are appended.
    pub fn merge(&mut self, path: &str, values: impl Into<Value>) -> &mut Self {
        self.ops.push(ConfigOp::Merge {
            path: path.to_string(),
            values: values.into(),
        });
        self
    }

    /// Remove the top-level key named by `path`. Nested paths are rejected
    /// at save time.
    pub fn remove(&mut self, path: &str) -> &mut Self {
        self.ops.push(ConfigOp::Remove {
            path: path.to_string(),
        });
        self
    }
}

impl Editor for ConfigEditor {
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
        tracing::debug!(path = %self.path.display(), "config module written");
        self.original = self.source.clone();
        Ok(true)
    }
}

/// Apply queued operations in order, reparsing between operations so each
/// edit sees the structure produced by the previous one.
fn apply_ops(mut source: String, ops: &[ConfigOp]) -> Result<String> {
    for op in ops {
        let file = parse_file(&source)?;
        let edits = apply_op(&source, &file, op)?;
        if !edits.is_empty() {
            source = apply_edits(&source, edits)?;
        }
    }
    Ok(source)
}

fn apply_op(source: &str, file: &SourceFile, op: &ConfigOp) -> Result<Vec<SourceEdit>> {
    // Nested removal is rejected even when the anchor is missing.
    if let ConfigOp::Remove { path } = op {
        if path.contains('.') {
            return Err(Error::NestedRemoveUnsupported { path: path.clone() });
        }
    }

    // Missing anchor: a module without a returned array literal has nothing
    // to edit, so the operation is skipped.
    let Some(array) = file.ret.as_ref().and_then(|ret| ret.array()) else {
        return Ok(Vec::new());
    };

    match op {
        ConfigOp::Set { path, value } => apply_set(source, array, path, value),
        ConfigOp::Append { path, value } => apply_append(source, array, path, value),
        ConfigOp::Merge { path, values } => apply_merge(source, array, path, values),
        ConfigOp::Remove { path } => Ok(apply_remove(source, array, path)),
    }
}

fn apply_set(source: &str, root: &ArrayLit, path: &str, value: &Value) -> Result<Vec<SourceEdit>> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Ok(Vec::new());
    }

    let mut current = root;
    for (index, segment) in segments.iter().enumerate() {
        let terminal = index == segments.len() - 1;
        let remaining = &segments[index + 1..];

        match current.entry(segment) {
            Some(entry) if terminal => {
                return Ok(vec![replace_value(source, entry, value)?]);
            }
            Some(entry) => match entry.value.as_array() {
                Some(inner) => current = inner,
                None => {
                    // Non-array intermediate: replace it with the nested
                    // structure carrying the rest of the path.
                    let nested = nest(remaining, value.clone());
                    return Ok(vec![replace_value(source, entry, &nested)?]);
                }
            },
            None => {
                let nested = nest(remaining, value.clone());
                return insert_entry(source, current, Some(segment), &nested);
            }
        }
    }
    Ok(Vec::new())
}

fn apply_append(
    source: &str,
    root: &ArrayLit,
    path: &str,
    value: &Value,
) -> Result<Vec<SourceEdit>> {
    match resolve(root, path) {
        Some(array) => insert_entry(source, array, None, value),
        None => apply_set(source, root, path, &Value::List(vec![value.clone()])),
    }
}

fn apply_merge(
    source: &str,
    root: &ArrayLit,
    path: &str,
    values: &Value,
) -> Result<Vec<SourceEdit>> {
    let Some(array) = resolve(root, path) else {
        return apply_set(source, root, path, values);
    };

    let mut edits = Vec::new();
    match values {
        Value::Map(entries) => {
            for (key, value) in entries {
                match array.entry(key) {
                    Some(existing) => edits.push(replace_value(source, existing, value)?),
                    None => edits.extend(insert_entry(source, array, Some(key), value)?),
                }
            }
        }
        Value::List(items) => {
            for item in items {
                edits.extend(insert_entry(source, array, None, item)?);
            }
        }
        other => edits.extend(insert_entry(source, array, None, other)?),
    }
    Ok(edits)
}

fn apply_remove(source: &str, root: &ArrayLit, path: &str) -> Vec<SourceEdit> {
    let Some(entry) = root.entry(path) else {
        return Vec::new();
    };

    let mut start = entry.span.start;
    let mut end = entry.span.end;

    // Swallow the trailing comma and, for a whole line, the line itself.
    let mut cursor = end;
    while source[cursor..].starts_with([' ', '\t']) {
        cursor += 1;
    }
    let had_trailing_comma = source[cursor..].starts_with(',');
    let mut took_newline = false;
    if had_trailing_comma {
        end = cursor + 1;
        cursor = end;
        while source[cursor..].starts_with([' ', '\t']) {
            cursor += 1;
        }
        if source[cursor..].starts_with('\n') {
            end = cursor + 1;
            took_newline = true;
        } else {
            // Inline entry: eat the spacing that separated it from the
            // next one.
            end = cursor;
        }
    }

    if took_newline {
        let line_start = source[..start].rfind('\n').map_or(0, |p| p + 1);
        if source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
            start = line_start;
        }
    }

    if !had_trailing_comma {
        // Last entry without a trailing comma: eat the comma that separated
        // it from the previous entry.
        let before = source[..start].trim_end();
        if before.ends_with(',') {
            start = before.len() - 1;
        }
    }

    vec![SourceEdit::delete(start..end)]
}

/// Resolve a dot-path to the array literal it names, if every segment exists
/// and holds an array.
fn resolve<'f>(root: &'f ArrayLit, path: &str) -> Option<&'f ArrayLit> {
    let mut current = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = current.entry(segment)?.value.as_array()?;
    }
    Some(current)
}

fn replace_value(source: &str, entry: &ArrayEntry, value: &Value) -> Result<SourceEdit> {
    let indent = line_indent(source, entry.span.start);
    let rendered = render_value(value, indent)?;
    Ok(SourceEdit::replace(entry.value.span(), rendered))
}

/// Insert a new (optionally keyed) entry at the end of `array`, following
/// the literal's existing single-line or multiline style.
fn insert_entry(
    source: &str,
    array: &ArrayLit,
    key: Option<&str>,
    value: &Value,
) -> Result<Vec<SourceEdit>> {
    let key_part = key.map(|k| format!("{} => ", quote(k))).unwrap_or_default();

    let Some(last) = array.entries.last() else {
        // Empty literal: replace it wholesale with a one-entry array.
        let indent = line_indent(source, array.span.start);
        let step = indent + 4;
        let rendered = render_value(value, step)?;
        let text = format!(
            "[\n{}{}{},\n{}]",
            " ".repeat(step),
            key_part,
            rendered,
            " ".repeat(indent)
        );
        return Ok(vec![SourceEdit::replace(array.span.clone(), text)]);
    };

    if array.is_multiline(source) {
        let indent = line_indent(source, last.span.start);
        let rendered = render_value(value, indent)?;
        let entry_text = format!("{}{}{}", " ".repeat(indent), key_part, rendered);

        // Insert after the last entry's trailing comma when there is one,
        // otherwise add the separating comma ourselves.
        let mut cursor = last.span.end;
        while source[cursor..].starts_with([' ', '\t']) {
            cursor += 1;
        }
        if source[cursor..].starts_with(',') {
            Ok(vec![SourceEdit::insert(
                cursor + 1,
                format!("\n{entry_text},"),
            )])
        } else {
            Ok(vec![SourceEdit::insert(
                last.span.end,
                format!(",\n{entry_text}"),
            )])
        }
    } else {
        let rendered = render_value(value, line_indent(source, array.span.start))?;
        Ok(vec![SourceEdit::insert(
            last.span.end,
            format!(", {key_part}{rendered}"),
        )])
    }
}

/// Leading-whitespace width of the line containing `pos`.
fn line_indent(source: &str, pos: usize) -> usize {
    let line_start = source[..pos].rfind('\n').map_or(0, |p| p + 1);
    source[line_start..pos]
        .chars()
        .take_while(|c| *c == ' ')
        .count()
}

/// Wrap `value` in nested single-key maps for the remaining path segments.
fn nest(segments: &[&str], value: Value) -> Value {
    segments
        .iter()
        .rev()
        .fold(value, |inner, segment| Value::map([(*segment, inner)]))
}
