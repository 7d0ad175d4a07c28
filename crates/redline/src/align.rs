//! Expanding edits to whole-line or whole-word boundaries.
//!
//! Formatters want edits that replace complete units: whole lines for the
//! unified form, whole words for the inline form. Both expansions share
//! one separator-parameterized implementation.

use std::borrow::Cow;

use crate::edit::{validate, Edit};
use crate::error::DiffResult;

/// Expand and merge `edits` so every resulting edit replaces one or more
/// complete lines of `src`.
///
/// Fails under the same conditions as [`crate::apply_edits`]. The result
/// replays to the same output as the input sequence.
pub fn line_edits(src: &str, edits: &[Edit]) -> DiffResult<Vec<Edit>> {
    let (edits, _) = validate(src, edits)?;
    Ok(align(src, edits, b'\n'))
}

/// Expand and merge `edits` so every resulting edit replaces one or more
/// complete space-separated words of `src`.
pub fn word_edits(src: &str, edits: &[Edit]) -> DiffResult<Vec<Edit>> {
    let (edits, _) = validate(src, edits)?;
    Ok(align(src, edits, b' '))
}

/// Whether the edit already replaces whole units ending in `sep`.
fn is_aligned(src: &str, edit: &Edit, sep: u8) -> bool {
    let bytes = src.as_bytes();
    edit.start < src.len()
        && (edit.start == 0 || bytes[edit.start - 1] == sep)
        && (edit.end == 0 || bytes[edit.end - 1] == sep)
        && (edit.new.is_empty() || edit.new.as_bytes().last() == Some(&sep))
}

fn align(src: &str, edits: Cow<'_, [Edit]>, sep: u8) -> Vec<Edit> {
    // Fast path: everything is already unit-aligned.
    if edits.iter().all(|e| is_aligned(src, e, sep)) {
        return edits.into_owned();
    }

    let mut iter = edits.into_owned().into_iter();
    let Some(mut prev) = iter.next() else {
        return Vec::new();
    };
    let mut expanded = Vec::new();
    for edit in iter {
        let between = &src[prev.end..edit.start];
        if !between.as_bytes().contains(&sep) {
            // Touching the same unit: merge into the previous edit.
            prev.new.push_str(between);
            prev.new.push_str(&edit.new);
            prev.end = edit.end;
        } else {
            expanded.push(expand_edit(prev, src, sep));
            prev = edit;
        }
    }
    expanded.push(expand_edit(prev, src, sep));
    expanded
}

/// Expand one edit to complete units.
fn expand_edit(mut edit: Edit, src: &str, sep: u8) -> Edit {
    let bytes = src.as_bytes();

    // Extend start left to just after the previous separator.
    let start = edit.start;
    let unit_start = bytes[..start]
        .iter()
        .rposition(|&b| b == sep)
        .map_or(0, |i| i + 1);
    if unit_start < start {
        edit.new.insert_str(0, &src[unit_start..start]);
        edit.start = unit_start;
    }

    // Extend end right to just past the next separator, unless both the
    // deleted span and the replacement already stop at one.
    let end = edit.end;
    if (end > 0 && bytes[end - 1] != sep)
        || (!edit.new.is_empty() && edit.new.as_bytes().last() != Some(&sep))
    {
        edit.end = match bytes[end..].iter().position(|&b| b == sep) {
            Some(i) => end + i + 1,
            None => src.len(),
        };
    }
    edit.new.push_str(&src[end..edit.end]);

    edit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use crate::text_diff::diff_strings;
    use proptest::prelude::*;

    #[test]
    fn aligned_edits_pass_through_unchanged() {
        let src = "a\nb\nc\n";
        let edits = vec![Edit::new(2, 4, "x\n")];
        assert_eq!(line_edits(src, &edits).unwrap(), edits);
    }

    #[test]
    fn partial_line_edit_expands_to_the_whole_line() {
        let cases: &[(&str, &str, &[(usize, usize, &str)])] = &[
            ("fruit\n", "cheese\n", &[(0, 6, "cheese\n")]),
            ("gord\n", "gourd\n", &[(0, 5, "gourd\n")]),
            ("groat\n", "goat\n", &[(0, 6, "goat\n")]),
            ("blanket\n", "bunker\n", &[(0, 8, "bunker\n")]),
            ("A", "AB", &[(0, 1, "AB")]),
            ("A\nB\n", "A\nC\n\n", &[(2, 4, "C\n\n")]),
            ("aaa\nccc\n", "aaa\nbbb\nccc\n", &[(0, 4, "aaa\nbbb\n")]),
        ];
        for &(before, after, want) in cases {
            let edits = diff_strings(before, after);
            let aligned = line_edits(before, &edits).unwrap();
            let want: Vec<Edit> = want.iter().map(|&(s, e, n)| Edit::new(s, e, n)).collect();
            assert_eq!(aligned, want, "line edits for ({before:?}, {after:?})");
            assert_eq!(apply_edits(before, &aligned).unwrap(), after);
        }
    }

    #[test]
    fn edits_on_one_line_are_merged() {
        // Two sub-line edits on the same line become one whole-line edit.
        let edits = diff_strings("blanket\n", "bunker\n");
        assert_eq!(edits.len(), 2);
        let aligned = line_edits("blanket\n", &edits).unwrap();
        assert_eq!(aligned, vec![Edit::new(0, 8, "bunker\n")]);
    }

    #[test]
    fn expansion_reaches_eof_without_trailing_newline() {
        let src = "one\ntwo";
        let edits = vec![Edit::new(5, 6, "X")];
        let aligned = line_edits(src, &edits).unwrap();
        assert_eq!(aligned, vec![Edit::new(4, 7, "tXo")]);
    }

    #[test]
    fn insertion_at_eof_takes_the_slow_path() {
        let src = "A";
        let edits = vec![Edit::new(1, 1, "B")];
        let aligned = line_edits(src, &edits).unwrap();
        assert_eq!(aligned, vec![Edit::new(0, 1, "AB")]);
    }

    #[test]
    fn word_edits_expand_to_whole_words() {
        let cases: &[(&str, &str, &[(usize, usize, &str)])] = &[
            ("a b c", "a d c", &[(2, 4, "d ")]),
            ("a b c", "a b c d", &[(4, 5, "c d")]),
            ("a b c", "a d c d", &[(2, 4, "d "), (4, 5, "c d")]),
        ];
        for &(before, after, want) in cases {
            let edits = diff_strings(before, after);
            let aligned = word_edits(before, &edits).unwrap();
            let want: Vec<Edit> = want.iter().map(|&(s, e, n)| Edit::new(s, e, n)).collect();
            assert_eq!(aligned, want, "word edits for ({before:?}, {after:?})");
            assert_eq!(apply_edits(before, &aligned).unwrap(), after);
        }
    }

    #[test]
    fn invalid_sequences_are_rejected() {
        assert!(line_edits("abc", &[Edit::new(0, 9, "")]).is_err());
        let overlapping = vec![Edit::new(0, 2, "x"), Edit::new(1, 3, "y")];
        assert!(line_edits("abcd", &overlapping).is_err());
    }

    proptest! {
        // Alignment preserves the replayed output, and every aligned edit
        // spans whole lines (or runs to EOF on unterminated input).
        #[test]
        fn line_alignment_preserves_replay(
            before in "[ab\n]{0,24}",
            after in "[ab\n]{0,24}",
        ) {
            let edits = diff_strings(&before, &after);
            let aligned = line_edits(&before, &edits).unwrap();
            prop_assert_eq!(apply_edits(&before, &aligned).unwrap(), after.clone());
            let bytes = before.as_bytes();
            for e in &aligned {
                prop_assert!(e.start == 0 || bytes[e.start - 1] == b'\n');
                prop_assert!(
                    e.end == before.len() || e.end == 0 || bytes[e.end - 1] == b'\n'
                );
                if !e.new.is_empty() && e.end < before.len() {
                    prop_assert!(e.new.ends_with('\n'));
                }
            }
        }
    }
}
