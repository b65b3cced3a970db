//! Command implementations
//!
//! Each command builds the matching editor, queues the requested mutations,
//! and either saves or prints a unified diff of what the save would write.

use std::path::Path;

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use scaf_edit::{
    DocumentEditor, Editor, EnvEditor, LiteralReplacement, RegexReplacement, TextEditor,
    value::{Value, from_json},
};
use scaf_php::{ConfigEditor, ProviderEditor};

use crate::cli::{ConfigAction, EnvAction, ManifestAction, ProviderAction, TextAction};
use crate::error::{Error, Result};

pub fn run_env(file: &Path, action: EnvAction, dry_run: bool) -> Result<()> {
    let mut editor = EnvEditor::from_path(file)?;

    match action {
        EnvAction::Get { key } => {
            let value = editor.get(&key).ok_or(Error::KeyNotFound { key })?;
            println!("{value}");
            return Ok(());
        }
        EnvAction::Set { key, value, quote } => {
            if quote {
                editor.set_quoted(&key, &value);
            } else {
                editor.set(&key, &value);
            }
        }
        EnvAction::Unset { key } => {
            editor.delete(&key);
        }
        EnvAction::Comment { keys } => {
            editor.comment_all(keys.iter().map(String::as_str));
        }
        EnvAction::Uncomment { keys } => {
            editor.uncomment_all(keys.iter().map(String::as_str));
        }
    }

    if dry_run {
        print_diff(file, &read_before(file), &editor.render());
        Ok(())
    } else {
        report(file, editor.save()?);
        Ok(())
    }
}

pub fn run_manifest(file: &Path, action: ManifestAction, dry_run: bool) -> Result<()> {
    let mut editor = DocumentEditor::from_path(file)?;

    match action {
        ManifestAction::Set { path, value } => {
            editor.set(&path, parse_value(&value))?;
        }
        ManifestAction::Append { path, value } => {
            editor.append(&path, parse_value(&value))?;
        }
        ManifestAction::Remove { path, value } => {
            editor.remove_value(&path, parse_value(&value))?;
        }
        ManifestAction::Delete { path } => {
            editor.delete(&path);
        }
        ManifestAction::AddScript { name, command } => {
            editor.add_script(&name, &command)?;
        }
        ManifestAction::AppendScript { name, command } => {
            editor.append_to_script(&name, &command)?;
        }
        ManifestAction::RemoveScript { name } => {
            editor.remove_script(&name);
        }
    }

    if dry_run {
        print_diff(file, &read_before(file), &editor.render());
        Ok(())
    } else {
        report(file, editor.save()?);
        Ok(())
    }
}

pub fn run_config(file: &Path, action: ConfigAction, dry_run: bool) -> Result<()> {
    let mut editor = ConfigEditor::from_path(file)?;

    match action {
        ConfigAction::Set { path, value, raw } => {
            editor.set(&path, config_value(&value, raw));
        }
        ConfigAction::Append { path, value, raw } => {
            editor.append(&path, config_value(&value, raw));
        }
        ConfigAction::Merge { path, values } => {
            let json: serde_json::Value = serde_json::from_str(&values)?;
            editor.merge(&path, from_json(&json));
        }
        ConfigAction::Remove { key } => {
            editor.remove(&key);
        }
    }

    if dry_run {
        let after = editor.preview()?;
        print_diff(file, editor.source(), &after);
        Ok(())
    } else {
        report(file, editor.save()?);
        Ok(())
    }
}

pub fn run_provider(file: &Path, action: ProviderAction, dry_run: bool) -> Result<()> {
    let mut editor = ProviderEditor::from_path(file)?;

    match action {
        ProviderAction::AddUse { names } => {
            editor.add_use_statements(names);
        }
        ProviderAction::Register { statement } => {
            editor.add_to_register(&statement)?;
        }
        ProviderAction::Boot { statement } => {
            editor.add_to_boot(&statement)?;
        }
        ProviderAction::AddMethod { method } => {
            editor.add_methods([method])?;
        }
    }

    if dry_run {
        let after = editor.preview()?;
        print_diff(file, editor.source(), &after);
        Ok(())
    } else {
        report(file, editor.save()?);
        Ok(())
    }
}

pub fn run_text(file: &Path, action: TextAction, dry_run: bool) -> Result<()> {
    let mut editor = TextEditor::from_path(file)?;

    match action {
        TextAction::Replace {
            search,
            replace,
            regex,
        } => {
            if regex {
                editor.replace_regex(&RegexReplacement::new(&search, replace)?);
            } else {
                editor.replace(&LiteralReplacement::new(search, replace)?);
            }
        }
    }

    if dry_run {
        print_diff(file, &read_before(file), &editor.content().to_string());
        Ok(())
    } else {
        report(file, editor.save()?);
        Ok(())
    }
}

/// Parse a CLI value argument as JSON, falling back to a plain string.
fn parse_value(arg: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(arg) {
        Ok(json) => from_json(&json),
        Err(_) => Value::str(arg),
    }
}

/// A config value is either a verbatim PHP expression or a JSON value.
fn config_value(arg: &str, raw: bool) -> Value {
    if raw { Value::raw(arg) } else { parse_value(arg) }
}

fn read_before(file: &Path) -> String {
    std::fs::read_to_string(file).unwrap_or_default()
}

fn report(file: &Path, changed: bool) {
    if changed {
        println!("{} {}", "updated".green().bold(), file.display());
    } else {
        println!("{} {}", "unchanged".dimmed(), file.display());
    }
}

/// Print a colored unified diff with three lines of context.
fn print_diff(file: &Path, before: &str, after: &str) {
    if before == after {
        println!("{} {}", "unchanged".dimmed(), file.display());
        return;
    }

    println!("{} {}", "would update".yellow().bold(), file.display());
    let diff = TextDiff::from_lines(before, after);
    for (index, group) in diff.grouped_ops(3).iter().enumerate() {
        if index > 0 {
            println!("{}", "...".dimmed());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                match change.tag() {
                    ChangeTag::Delete => print!("{}", format!("-{change}").red()),
                    ChangeTag::Insert => print!("{}", format!("+{change}").green()),
                    ChangeTag::Equal => print!(" {change}"),
                }
            }
        }
    }
}
