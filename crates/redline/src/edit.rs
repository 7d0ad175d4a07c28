//! Byte-offset edits and their application to source text.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// A replacement of a span of the source text.
///
/// The half-open byte span `[start, end)` is replaced by `new`. An
/// insertion leaves the span empty (`start == end`); a deletion leaves the
/// replacement empty. Offsets must lie on UTF-8 character boundaries of
/// the source; edits produced by [`crate::diff_strings`] always do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Byte offset where the replaced span starts.
    pub start: usize,
    /// Byte offset just past the replaced span.
    pub end: usize,
    /// The replacement text.
    pub new: String,
}

impl Edit {
    /// Create an edit replacing `[start, end)` by `new`.
    pub fn new(start: usize, end: usize, new: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new: new.into(),
        }
    }

    /// Returns `true` if this edit inserts without deleting.
    pub fn is_insert(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this edit deletes without inserting.
    pub fn is_delete(&self) -> bool {
        self.new.is_empty()
    }
}

/// Sort edits by `(start, end)` offset, in place.
///
/// This ordering puts insertions (`end == start`) before deletions at the
/// same point, and the sort is stable so multiple insertions at one offset
/// keep their given order. (Application detects multiple deletions at the
/// same point as an overlap error.)
pub fn sort_edits(edits: &mut [Edit]) {
    // sort_by_key is a stable sort.
    edits.sort_by_key(|e| (e.start, e.end));
}

fn is_sorted(edits: &[Edit]) -> bool {
    edits
        .windows(2)
        .all(|w| (w[0].start, w[0].end) <= (w[1].start, w[1].end))
}

/// Check that `edits` are consistent with `src` and compute the size of
/// the patched output.
///
/// The caller's slice is never mutated; an unsorted input is sorted into
/// a copy.
pub(crate) fn validate<'a>(src: &str, edits: &'a [Edit]) -> DiffResult<(Cow<'a, [Edit]>, usize)> {
    let edits: Cow<'a, [Edit]> = if is_sorted(edits) {
        Cow::Borrowed(edits)
    } else {
        let mut sorted = edits.to_vec();
        sort_edits(&mut sorted);
        Cow::Owned(sorted)
    };

    let mut size = src.len();
    let mut last_end = 0;
    for edit in edits.iter() {
        if edit.start > edit.end || edit.end > src.len() {
            return Err(DiffError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len: src.len(),
            });
        }
        if edit.start < last_end {
            return Err(DiffError::Overlapping {
                start: edit.start,
                end: edit.end,
                prev_end: last_end,
            });
        }
        size += edit.new.len();
        size -= edit.end - edit.start;
        last_end = edit.end;
    }

    Ok((edits, size))
}

/// Apply a sequence of edits to `src` and return the patched result.
///
/// Edits are applied in order of start offset; edits with the same start
/// offset are applied in the order they were provided. Fails if any edit
/// is out of bounds or any pair of edits overlaps.
pub fn apply_edits(src: &str, edits: &[Edit]) -> DiffResult<String> {
    let (edits, size) = validate(src, edits)?;

    let mut out = String::with_capacity(size);
    let mut last_end = 0;
    for edit in edits.iter() {
        if last_end < edit.start {
            out.push_str(&src[last_end..edit.start]);
        }
        out.push_str(&edit.new);
        last_end = edit.end;
    }
    out.push_str(&src[last_end..]);

    assert_eq!(out.len(), size, "patched output size mismatch");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_spans_in_order() {
        let edits = vec![Edit::new(1, 3, "u"), Edit::new(6, 7, "r")];
        assert_eq!(apply_edits("blanket\n", &edits).unwrap(), "bunker\n");
    }

    #[test]
    fn apply_empty_sequence_is_identity() {
        assert_eq!(apply_edits("unchanged", &[]).unwrap(), "unchanged");
    }

    #[test]
    fn insertions_at_the_same_offset_keep_their_order() {
        let edits = vec![Edit::new(1, 1, "x"), Edit::new(1, 1, "y")];
        assert_eq!(apply_edits("ab", &edits).unwrap(), "axyb");
    }

    #[test]
    fn unsorted_input_is_sorted_without_mutation() {
        let edits = vec![Edit::new(6, 7, "r"), Edit::new(1, 3, "u")];
        assert_eq!(apply_edits("blanket\n", &edits).unwrap(), "bunker\n");
        // The caller's slice is untouched.
        assert_eq!(edits[0], Edit::new(6, 7, "r"));
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let err = apply_edits("abc", &[Edit::new(2, 9, "")]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfBounds { end: 9, len: 3, .. }));

        let err = apply_edits("abc", &[Edit::new(3, 2, "")]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfBounds { .. }));
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let edits = vec![Edit::new(0, 2, "x"), Edit::new(1, 3, "y")];
        let err = apply_edits("abcd", &edits).unwrap_err();
        assert!(matches!(err, DiffError::Overlapping { prev_end: 2, .. }));
    }

    #[test]
    fn duplicate_deletions_are_overlaps() {
        let edits = vec![Edit::new(0, 2, ""), Edit::new(0, 2, "")];
        assert!(apply_edits("abcd", &edits).is_err());
    }

    #[test]
    fn deletion_then_insertion_at_its_end_is_allowed() {
        let edits = vec![Edit::new(0, 2, ""), Edit::new(2, 2, "Z")];
        assert_eq!(apply_edits("abcd", &edits).unwrap(), "Zcd");
    }

    #[test]
    fn sort_orders_insertions_before_deletions_at_a_point() {
        let mut edits = vec![Edit::new(2, 4, "del"), Edit::new(2, 2, "ins")];
        sort_edits(&mut edits);
        assert_eq!(edits[0], Edit::new(2, 2, "ins"));
        assert_eq!(edits[1], Edit::new(2, 4, "del"));
    }

    #[test]
    fn predicates_classify_edits() {
        assert!(Edit::new(3, 3, "x").is_insert());
        assert!(!Edit::new(3, 4, "x").is_insert());
        assert!(Edit::new(3, 4, "").is_delete());
        assert!(!Edit::new(3, 4, "x").is_delete());
    }

    #[test]
    fn serde_roundtrip() {
        let edit = Edit::new(2, 5, "new text");
        let json = serde_json::to_string(&edit).unwrap();
        let parsed: Edit = serde_json::from_str(&json).unwrap();
        assert_eq!(edit, parsed);
    }
}
