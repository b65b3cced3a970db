//! Environment-file editor
//!
//! Line-oriented editor for `KEY=VALUE` files with `#` comments and
//! commented-out keys. Every line parses into one entry; untouched entries
//! keep their original text and are written back byte-for-byte, so the editor
//! never reformats lines the caller did not change.

use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Blank,
    Comment,
    KeyValue,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: EntryKind,
    /// Original line, kept verbatim until the entry is touched.
    raw: Option<String>,
    key: String,
    value: String,
    was_quoted: bool,
    force_quoted: bool,
    is_commented: bool,
    /// Set when the value was freshly written in this batch; controls whether
    /// the auto-quoting rule is applied fresh on write.
    modified: bool,
}

/// A value must be quoted if it contains any character that would break the
/// line-oriented `KEY=VALUE` grammar.
fn needs_quoting(value: &str) -> bool {
    value.contains([' ', '#', '"', '\'', '=', '\n'])
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

impl Entry {
    fn blank() -> Self {
        Self {
            kind: EntryKind::Blank,
            raw: None,
            key: String::new(),
            value: String::new(),
            was_quoted: false,
            force_quoted: false,
            is_commented: false,
            modified: false,
        }
    }

    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            let mut entry = Self::blank();
            entry.raw = Some(line.to_string());
            return entry;
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            if rest.contains('=') {
                // Commented-out key: strip the marker and one space, then
                // parse the remainder as a normal pair.
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                let mut entry = Self::parse_pair(rest, true);
                entry.raw = Some(line.to_string());
                return entry;
            }
            return Self {
                kind: EntryKind::Comment,
                raw: Some(line.to_string()),
                key: String::new(),
                value: trimmed.to_string(),
                was_quoted: false,
                force_quoted: false,
                is_commented: false,
                modified: false,
            };
        }

        if line.contains('=') {
            let mut entry = Self::parse_pair(line, false);
            entry.raw = Some(line.to_string());
            return entry;
        }

        // Not blank, not a comment, no `=`: pass the line through untouched.
        Self {
            kind: EntryKind::Comment,
            raw: Some(line.to_string()),
            key: String::new(),
            value: trimmed.to_string(),
            was_quoted: false,
            force_quoted: false,
            is_commented: false,
            modified: false,
        }
    }

    fn parse_pair(text: &str, is_commented: bool) -> Self {
        let (key, value) = text.split_once('=').unwrap_or((text, ""));
        let key = key.trim().to_string();
        let value = value.trim();

        let (value, was_quoted) = if value.len() >= 2
            && value.starts_with('"')
            && value.ends_with('"')
        {
            (unescape(&value[1..value.len() - 1]), true)
        } else if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
            (value[1..value.len() - 1].to_string(), true)
        } else {
            (value.to_string(), false)
        };

        Self {
            kind: EntryKind::KeyValue,
            raw: None,
            key,
            value,
            was_quoted,
            force_quoted: false,
            is_commented,
            modified: false,
        }
    }

    fn render(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        match self.kind {
            EntryKind::Blank => String::new(),
            EntryKind::Comment => self.value.clone(),
            EntryKind::KeyValue => {
                // Freshly set values get the quoting rule applied fresh;
                // merely re-rendered ones (comment toggles) keep their
                // original quoting style.
                let quoted = self.force_quoted
                    || needs_quoting(&self.value)
                    || (!self.modified && self.was_quoted);
                let value = if quoted {
                    format!("\"{}\"", escape(&self.value))
                } else {
                    self.value.clone()
                };
                let line = format!("{}={}", self.key, value);
                if self.is_commented {
                    format!("# {line}")
                } else {
                    line
                }
            }
        }
    }
}

/// Editor for `KEY=VALUE` environment files.
///
/// # Examples
///
/// ```
/// use scaf_edit::{Editor, EnvEditor};
///
/// let mut env = EnvEditor::from_content("/tmp/.env", "APP_ENV=local\n");
/// env.set("APP_NAME", "My Application");
/// assert_eq!(env.render(), "APP_ENV=local\nAPP_NAME=\"My Application\"\n");
/// ```
#[derive(Debug)]
pub struct EnvEditor {
    path: PathBuf,
    entries: Vec<Entry>,
    trailing_newline: bool,
    changed: bool,
}

impl EnvEditor {
    /// Load the file at `path`. A missing or unreadable file is a hard error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = scaf_fs::read_text(path)?;
        Ok(Self::from_content(path, &content))
    }

    /// Build an editor over already-loaded content.
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        let trailing_newline = content.ends_with('\n');
        let mut lines: Vec<&str> = content.split('\n').collect();
        if trailing_newline || content.is_empty() {
            lines.pop();
        }
        Self {
            path: path.into(),
            entries: lines.iter().map(|line| Entry::parse(line)).collect(),
            trailing_newline,
            changed: false,
        }
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.kind == EntryKind::KeyValue && e.key == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.kind == EntryKind::KeyValue && e.key == key)
    }

    /// Whether `key` exists, commented or not.
    pub fn has(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The unquoted value for `key`, commented or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|e| e.value.as_str())
    }

    /// Every key in file order, regardless of commented state.
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::KeyValue)
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Every key/value pair in file order, regardless of commented state.
    pub fn all(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::KeyValue)
            .map(|e| (e.key.as_str(), e.value.as_str()))
            .collect()
    }

    /// Whether `key` is present but commented out.
    pub fn is_commented(&self, key: &str) -> bool {
        self.find(key).is_some_and(|e| e.is_commented)
    }

    fn upsert(&mut self, key: &str, value: &str, force_quoted: bool) {
        if let Some(entry) = self.find_mut(key) {
            if entry.value == value
                && !entry.is_commented
                && entry.force_quoted == force_quoted
                && !force_quoted
            {
                return;
            }
            entry.value = value.to_string();
            entry.is_commented = false;
            entry.modified = true;
            entry.force_quoted = force_quoted;
            entry.raw = None;
        } else {
            self.entries.push(Entry {
                kind: EntryKind::KeyValue,
                raw: None,
                key: key.to_string(),
                value: value.to_string(),
                was_quoted: false,
                force_quoted,
                is_commented: false,
                modified: true,
            });
        }
        self.changed = true;
    }

    /// Upsert `key`: update in place if present (clearing any comment
    /// marker), append at the end otherwise.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.upsert(key, value, false);
        self
    }

    /// Upsert every pair from `pairs`, in order.
    pub fn set_many<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        for (key, value) in pairs {
            self.set(key, value);
        }
        self
    }

    /// As `set`, but the value is always quote-wrapped on write.
    pub fn set_quoted(&mut self, key: &str, value: &str) -> &mut Self {
        self.upsert(key, value, true);
        self
    }

    /// Write a literal `true`/`false` token, never quoted.
    pub fn set_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.upsert(key, if value { "true" } else { "false" }, false);
        self
    }

    /// Remove `key` entirely.
    pub fn delete(&mut self, key: &str) -> &mut Self {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.kind != EntryKind::KeyValue || e.key != key);
        if self.entries.len() != before {
            self.changed = true;
        }
        self
    }

    /// Comment out `key` without altering its value.
    pub fn comment(&mut self, key: &str) -> &mut Self {
        if let Some(entry) = self.find_mut(key) {
            if !entry.is_commented {
                entry.is_commented = true;
                entry.raw = None;
                self.changed = true;
            }
        }
        self
    }

    /// Comment out each key in `keys`.
    pub fn comment_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for key in keys {
            self.comment(key);
        }
        self
    }

    /// Restore a commented-out `key` to an active pair.
    pub fn uncomment(&mut self, key: &str) -> &mut Self {
        if let Some(entry) = self.find_mut(key) {
            if entry.is_commented {
                entry.is_commented = false;
                entry.raw = None;
                self.changed = true;
            }
        }
        self
    }

    /// Uncomment each key in `keys`.
    pub fn uncomment_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for key in keys {
            self.uncomment(key);
        }
        self
    }

    /// Append a structural blank line.
    pub fn empty_line(&mut self) -> &mut Self {
        self.entries.push(Entry::blank());
        self.changed = true;
        self
    }

    /// Serialize the current entries.
    pub fn render(&self) -> String {
        let lines: Vec<String> = self.entries.iter().map(Entry::render).collect();
        let mut out = lines.join("\n");
        if self.trailing_newline || (!out.is_empty() && self.changed) {
            out.push('\n');
        }
        out
    }
}

impl Editor for EnvEditor {
    type Error = crate::Error;

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn save(&mut self) -> Result<bool> {
        if !self.changed {
            return Ok(false);
        }
        let content = self.render();
        scaf_fs::write_text(&self.path, &content)?;
        tracing::debug!(path = %self.path.display(), "env file written");

        // Consume the batch: from here on every entry counts as untouched.
        self.trailing_newline = content.ends_with('\n');
        for entry in &mut self.entries {
            let line = entry.render();
            entry.was_quoted = entry.kind == EntryKind::KeyValue && line.ends_with('"');
            entry.modified = false;
            entry.force_quoted = false;
            entry.raw = Some(line);
        }
        self.changed = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_strips_quotes() {
        let entry = Entry::parse("APP_NAME=\"My App\"");
        assert_eq!(entry.key, "APP_NAME");
        assert_eq!(entry.value, "My App");
        assert!(entry.was_quoted);
    }

    #[test]
    fn test_parse_commented_pair() {
        let entry = Entry::parse("# DB_HOST=127.0.0.1");
        assert_eq!(entry.kind, EntryKind::KeyValue);
        assert!(entry.is_commented);
        assert_eq!(entry.key, "DB_HOST");
        assert_eq!(entry.value, "127.0.0.1");
    }

    #[test]
    fn test_plain_comment_without_equals() {
        let entry = Entry::parse("# database settings");
        assert_eq!(entry.kind, EntryKind::Comment);
    }

    #[test]
    fn test_unescape_double_quoted() {
        let entry = Entry::parse(r#"KEY="a \"b\" \\ c""#);
        assert_eq!(entry.value, "a \"b\" \\ c");
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let entry = Entry::parse("DATABASE_URL=mysql://root@localhost?charset=utf8");
        assert_eq!(entry.key, "DATABASE_URL");
        assert_eq!(entry.value, "mysql://root@localhost?charset=utf8");
        // value contains `=` so a rewrite would quote it; untouched it stays raw
        assert!(entry.raw.is_some());
    }
}
