//! Structured-document editor
//!
//! Generic key/value editing over JSON manifest files (package manifests,
//! dependency manifests) with dot-path addressing. Intermediate path segments
//! are auto-created as maps, and the whole document is re-serialized with
//! two-space indentation on save, preserving original key order.

use std::path::{Path, PathBuf};

use serde_json::Value as Json;

use crate::editor::Editor;
use crate::error::Result;
use crate::value::{self, Value};

/// Editor for JSON manifest documents addressed by dot-paths.
///
/// # Examples
///
/// ```
/// use scaf_edit::{DocumentEditor, Value};
///
/// let mut doc = DocumentEditor::from_content(
///     "/tmp/package.json",
///     r#"{"name": "demo"}"#,
/// ).unwrap();
/// doc.set("scripts.build", Value::str("webpack")).unwrap();
/// assert!(doc.has("scripts.build"));
/// ```
#[derive(Debug)]
pub struct DocumentEditor {
    path: PathBuf,
    root: Json,
    changed: bool,
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Walk to the parent of the final segment, creating intermediate maps.
/// A non-map intermediate is replaced by an empty map.
fn vivify<'a>(root: &'a mut Json, segments: &[&str]) -> &'a mut Json {
    let mut current = root;
    for segment in segments {
        if !current.is_object() {
            *current = Json::Object(serde_json::Map::new());
        }
        current = current
            .as_object_mut()
            .expect("just ensured object")
            .entry(segment.to_string())
            .or_insert_with(|| Json::Object(serde_json::Map::new()));
    }
    current
}

fn lookup<'a>(root: &'a Json, segments: &[&str]) -> Option<&'a Json> {
    let mut current = root;
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current)
}

impl DocumentEditor {
    /// Load and parse the document at `path`. Missing file or invalid JSON is
    /// a hard error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = scaf_fs::read_text(path)?;
        Self::from_content(path, &content)
    }

    /// Build an editor over already-loaded content.
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let root: Json = serde_json::from_str(content)?;
        Ok(Self {
            path: path.into(),
            root,
            changed: false,
        })
    }

    /// Whether a value exists at `path`.
    pub fn has(&self, path: &str) -> bool {
        lookup(&self.root, &split_path(path)).is_some()
    }

    /// The value at `path`, or `default` if absent.
    pub fn get(&self, path: &str, default: Value) -> Value {
        lookup(&self.root, &split_path(path))
            .map(value::from_json)
            .unwrap_or(default)
    }

    /// Create or overwrite the leaf at `path`, auto-creating intermediate
    /// maps. A list value is deduplicated, keeping first occurrences.
    pub fn set(&mut self, path: &str, val: Value) -> Result<&mut Self> {
        let mut json = value::to_json(&val, path)?;
        if let Json::Array(items) = &mut json {
            let mut seen: Vec<Json> = Vec::new();
            items.retain(|item| {
                if seen.contains(item) {
                    false
                } else {
                    seen.push(item.clone());
                    true
                }
            });
        }

        let segments = split_path(path);
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(self),
        };
        let parent = vivify(&mut self.root, parents);
        if !parent.is_object() {
            *parent = Json::Object(serde_json::Map::new());
        }
        let map = parent.as_object_mut().expect("just ensured object");
        if map.get(*last) != Some(&json) {
            map.insert(last.to_string(), json);
            self.changed = true;
        }
        Ok(self)
    }

    /// Append one value to the list at `path`, coercing a scalar already
    /// there into a singleton list first. The list is created if absent.
    pub fn append(&mut self, path: &str, val: Value) -> Result<&mut Self> {
        let json = value::to_json(&val, path)?;
        let segments = split_path(path);
        let slot = vivify(&mut self.root, &segments);
        match slot {
            Json::Array(items) => items.push(json),
            other => {
                let existing = std::mem::take(other);
                let mut items = Vec::new();
                // A freshly vivified slot is an empty map, not a prior scalar.
                if !matches!(&existing, Json::Object(map) if map.is_empty()) {
                    items.push(existing);
                }
                items.push(json);
                *other = Json::Array(items);
            }
        }
        self.changed = true;
        Ok(self)
    }

    /// Concatenate `values` onto the list at `path`, creating an empty list
    /// first if the slot is absent or not a list.
    pub fn merge(&mut self, path: &str, values: Vec<Value>) -> Result<&mut Self> {
        if values.is_empty() {
            return Ok(self);
        }
        let mut incoming = Vec::with_capacity(values.len());
        for val in &values {
            incoming.push(value::to_json(val, path)?);
        }
        let segments = split_path(path);
        let slot = vivify(&mut self.root, &segments);
        if !slot.is_array() {
            *slot = Json::Array(Vec::new());
        }
        slot.as_array_mut()
            .expect("just ensured array")
            .extend(incoming);
        self.changed = true;
        Ok(self)
    }

    /// Drop every element of the list at `path` equal to `val`, re-indexing.
    pub fn remove_value(&mut self, path: &str, val: Value) -> Result<&mut Self> {
        let json = value::to_json(&val, path)?;
        let segments = split_path(path);
        if let Some(slot) = lookup(&self.root, &segments) {
            if slot.is_array() {
                let slot = vivify(&mut self.root, &segments);
                let items = slot.as_array_mut().expect("checked above");
                let before = items.len();
                items.retain(|item| *item != json);
                if items.len() != before {
                    self.changed = true;
                }
            }
        }
        Ok(self)
    }

    /// Remove the leaf key at `path` from its parent map, if present.
    pub fn delete(&mut self, path: &str) -> &mut Self {
        let segments = split_path(path);
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return self,
        };
        let mut current = &mut self.root;
        for segment in parents {
            match current.get_mut(segment) {
                Some(next) => current = next,
                None => return self,
            }
        }
        if let Some(map) = current.as_object_mut() {
            if map.shift_remove(*last).is_some() {
                self.changed = true;
            }
        }
        self
    }

    /// Whether a script named `name` exists under the `scripts` map.
    pub fn has_script(&self, name: &str) -> bool {
        self.has(&format!("scripts.{name}"))
    }

    /// Add script `name` with `command`. An already-declared script is left
    /// untouched; use `set` on the `scripts` path to overwrite one.
    pub fn add_script(&mut self, name: &str, command: &str) -> Result<&mut Self> {
        if self.has_script(name) {
            return Ok(self);
        }
        self.set(&format!("scripts.{name}"), Value::str(command))
    }

    /// Append a command to script `name`, coercing a scalar command into a
    /// single-element list first.
    pub fn append_to_script(&mut self, name: &str, command: &str) -> Result<&mut Self> {
        self.append(&format!("scripts.{name}"), Value::str(command))
    }

    /// Remove script `name`.
    pub fn remove_script(&mut self, name: &str) -> &mut Self {
        self.delete(&format!("scripts.{name}"))
    }

    /// Serialize the current document with two-space indentation.
    pub fn render(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.root).unwrap_or_default();
        out.push('\n');
        out
    }
}

impl Editor for DocumentEditor {
    type Error = crate::Error;

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn save(&mut self) -> Result<bool> {
        if !self.changed {
            return Ok(false);
        }
        scaf_fs::write_text(&self.path, &self.render())?;
        tracing::debug!(path = %self.path.display(), "document written");
        self.changed = false;
        Ok(true)
    }
}
