//! Error types for the scaf CLI

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Edit(#[from] scaf_edit::Error),

    #[error(transparent)]
    Php(#[from] scaf_php::Error),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
}
