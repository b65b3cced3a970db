//! Replacement value objects
//!
//! Validated descriptors for literal and regex find/replace operations.
//! Validation happens at construction; applying a replacement is a pure
//! function over the text buffer.

use regex::Regex;

use crate::error::{Error, Result};

/// A literal find/replace: either one pair or two parallel lists applied
/// element-wise in order.
#[derive(Debug, Clone)]
pub struct LiteralReplacement {
    pairs: Vec<(String, String)>,
}

impl LiteralReplacement {
    /// A single search/replace pair. An empty search string is rejected.
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Result<Self> {
        let search = search.into();
        if search.is_empty() {
            return Err(Error::EmptySearch);
        }
        Ok(Self {
            pairs: vec![(search, replace.into())],
        })
    }

    /// Parallel lists applied element-wise. The lists must be equal length
    /// and no search element may be empty.
    pub fn parallel(search: Vec<String>, replace: Vec<String>) -> Result<Self> {
        if search.len() != replace.len() {
            return Err(Error::LengthMismatch {
                search: search.len(),
                replace: replace.len(),
            });
        }
        if search.iter().any(String::is_empty) {
            return Err(Error::EmptySearch);
        }
        Ok(Self {
            pairs: search.into_iter().zip(replace).collect(),
        })
    }

    /// Apply every pair to `input` in order.
    pub fn apply(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (search, replace) in &self.pairs {
            out = out.replace(search.as_str(), replace);
        }
        out
    }
}

/// A regex find/replace with one replacement template applied to every match.
#[derive(Debug, Clone)]
pub struct RegexReplacement {
    regex: Regex,
    replace: String,
}

impl RegexReplacement {
    /// Compile and validate `pattern` up front; an invalid or empty pattern
    /// is rejected here, never at apply time.
    pub fn new(pattern: &str, replace: impl Into<String>) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::InvalidRegex {
                pattern: String::new(),
                message: "pattern must not be empty".to_string(),
            });
        }
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            regex,
            replace: replace.into(),
        })
    }

    /// Replace every match in `input` with the template.
    pub fn apply(&self, input: &str) -> String {
        self.regex
            .replace_all(input, self.replace.as_str())
            .into_owned()
    }
}
