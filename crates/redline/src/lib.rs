//! Text diffing with byte-offset edit sequences.
//!
//! Computes the difference between two strings as a sorted, non-overlapping
//! sequence of [`Edit`]s that replays deterministically, and renders edit
//! sequences as unified diffs or as inline word-level markup. The
//! longest-common-subsequence engine underneath lives in the `redline-lcs`
//! crate.
//!
//! # Key Types
//!
//! - [`Edit`] -- Replacement of a byte span of the source by new text
//! - [`DiffError`] / [`DiffResult`] -- Failures validating an edit sequence
//!
//! # Key Operations
//!
//! - [`diff_strings`] -- Compute the edits turning one string into another
//! - [`apply_edits`] -- Replay an edit sequence over a source string
//! - [`unified`] -- Render edits as a unified diff with context
//! - [`inline_diff`] -- Render edits as inline markup over split units

pub mod align;
pub mod edit;
pub mod error;
pub mod inline;
pub mod text_diff;
pub mod unified;

pub use align::{line_edits, word_edits};
pub use edit::{apply_edits, sort_edits, Edit};
pub use error::{DiffError, DiffResult};
pub use inline::{color_markup, inline_diff, space_words};
pub use text_diff::diff_strings;
pub use unified::unified;
