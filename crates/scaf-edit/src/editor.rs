//! The shared edit-batch contract
//!
//! Each editor instance owns one file's in-memory representation between
//! construction and `save()`. Mutation methods queue changes and flip the
//! dirty flag; `save()` is the only operation with an externally observable
//! effect.

/// Contract implemented by every file editor.
pub trait Editor {
    /// Error type surfaced by `save()`.
    type Error;

    /// Whether any queued mutation actually changed the content.
    fn is_changed(&self) -> bool;

    /// Write the file iff changed, returning whether a write occurred.
    ///
    /// A save with nothing queued returns `false` without touching the
    /// filesystem. A completed save resets the batch, so a second save is a
    /// no-op.
    fn save(&mut self) -> std::result::Result<bool, Self::Error>;
}
