//! Error types for scaf-php

/// Result type for scaf-php operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scaf-php operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] scaf_fs::Error),

    #[error("Failed to parse PHP source at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error(
        "Only single-expression arrow functions (`fn () => ...`) are supported \
         as config values; got a multi-statement closure"
    )]
    MultiStatementClosure,

    #[error("Removing the nested path `{path}` is not supported; only top-level keys can be removed")]
    NestedRemoveUnsupported { path: String },

    #[error("No class declaration found in target file; cannot add methods")]
    NoClassFound,

    #[error("Statement source does not parse as a valid PHP statement: `{snippet}` ({message})")]
    InvalidStatement { snippet: String, message: String },

    #[error("Method source does not parse as a valid PHP method: {message}")]
    InvalidMethod { message: String },

    #[error("Internal edit conflict: overlapping source edits at byte {position}")]
    OverlappingEdits { position: usize },
}

impl Error {
    /// Build a parse error from a byte offset into `source`.
    pub(crate) fn parse_at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let mut line = 1;
        let mut column = 1;
        for ch in source[..offset.min(source.len())].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}
