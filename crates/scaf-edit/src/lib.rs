//! Format-preserving file editors for the scaf scaffolding tool
//!
//! Every editor follows the same contract: it reads its target file once at
//! construction, queues mutations in memory, and performs at most one write
//! per `save()` call. `save()` returns whether a write actually happened, and
//! untouched content is reproduced byte-for-byte.

pub mod document;
pub mod editor;
pub mod env;
pub mod error;
pub mod replace;
pub mod text;
pub mod value;

pub use document::DocumentEditor;
pub use editor::Editor;
pub use env::EnvEditor;
pub use error::{Error, Result};
pub use replace::{LiteralReplacement, RegexReplacement};
pub use text::TextEditor;
pub use value::Value;
