//! Error types for scaf-edit

/// Result type for scaf-edit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scaf-edit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] scaf_fs::Error),

    #[error("Failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Replacement search string must not be empty")]
    EmptySearch,

    #[error("Replacement arrays differ in length: {search} search vs {replace} replace")]
    LengthMismatch { search: usize, replace: usize },

    #[error("Invalid regex pattern `{pattern}`: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Raw expressions cannot be stored in a JSON document (at path `{path}`)")]
    RawValueInDocument { path: String },
}
