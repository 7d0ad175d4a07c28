//! Error types for the diff crate.

/// Errors produced when an edit sequence is inconsistent with its source.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An edit's interval is not contained in the source text.
    #[error("edit [{start}, {end}) is out of bounds for a source of {len} bytes")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    /// An edit starts before the previous edit's end.
    #[error("edit [{start}, {end}) overlaps the previous edit ending at {prev_end}")]
    Overlapping {
        start: usize,
        end: usize,
        prev_end: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
