//! Format-preserving PHP source-module editors
//!
//! Parses the subset of PHP that configuration and service-provider modules
//! use, keeps byte spans for every anchor, and applies edits as targeted
//! splices so untouched source survives byte for byte.

pub mod ast;
pub mod config;
pub mod edit;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod provider;
pub mod render;

pub use config::ConfigEditor;
pub use edit::{SourceEdit, apply_edits};
pub use error::{Error, Result};
pub use parser::{parse_file, validate_method, validate_statement};
pub use provider::ProviderEditor;
pub use render::render_value;
