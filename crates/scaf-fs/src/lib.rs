//! Filesystem support for the scaf editors
//!
//! Provides eager reads and atomic writes for the file editors. Each editor
//! reads its target once at construction and performs at most one write per
//! save, so the I/O surface here is deliberately small.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{read_text, write_atomic, write_text};
