//! Longest-common-subsequence engine for the redline diff library.
//!
//! Implements Myers' O(ND) algorithm over an abstract sequence pair, with
//! forward, backward, and two-sided (meet-in-the-middle) searches, bounded
//! search depth with graceful degradation, and conversion of the computed
//! subsequence into replacement intervals.
//!
//! # Key Types
//!
//! - [`Diff`] -- A replacement of a span of A by a span of B
//! - [`Lcs`] / [`Diag`] -- A common subsequence as a list of diagonal runs
//! - [`Strategy`] -- Which edit-graph search to run
//! - [`SequencePair`] / [`SlicePair`] -- The abstract view the engine searches over
//!
//! Most callers want [`diff_bytes`] or [`diff_chars`]; [`compute`] exposes
//! the individual search strategies and the raw subsequence.

pub mod graph;
pub mod lcs;
pub mod seq;

mod label;

pub use graph::{compute, Strategy};
pub use lcs::{diff_bytes, diff_chars, Diag, Diff, Lcs};
pub use seq::{SequencePair, SlicePair};
