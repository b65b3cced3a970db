//! Span-based source edits
//!
//! Edits carry a byte range into the original source and the replacement
//! text. Applying a batch splices the ranges from the end of the file
//! backwards, so every byte outside an edited span is reproduced verbatim.
//! This is what makes the editors format-preserving: untouched regions are
//! never re-rendered.

use std::ops::Range;

use crate::error::{Error, Result};

/// One splice into the original source. A zero-width span is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub span: Range<usize>,
    pub new_text: String,
}

impl SourceEdit {
    /// Insert `text` at `position`.
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Self {
            span: position..position,
            new_text: text.into(),
        }
    }

    /// Replace the bytes in `span` with `text`.
    pub fn replace(span: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: text.into(),
        }
    }

    /// Delete the bytes in `span`.
    pub fn delete(span: Range<usize>) -> Self {
        Self {
            span,
            new_text: String::new(),
        }
    }
}

/// Apply a batch of edits to `source`.
///
/// Edits must not overlap; equal-position insertions are applied in queue
/// order.
pub fn apply_edits(source: &str, mut edits: Vec<SourceEdit>) -> Result<String> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    // Stable sort keeps queue order for insertions at the same position.
    edits.sort_by_key(|e| (e.span.start, e.span.end));

    for pair in edits.windows(2) {
        if pair[1].span.start < pair[0].span.end {
            return Err(Error::OverlappingEdits {
                position: pair[1].span.start,
            });
        }
    }

    let mut out = source.to_string();
    for edit in edits.iter().rev() {
        out.replace_range(edit.span.clone(), &edit.new_text);
    }
    Ok(out)
}
