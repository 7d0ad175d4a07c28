//! Computing the edits that turn one string into another.

use redline_lcs::{diff_bytes, diff_chars};

use crate::edit::Edit;

/// Compute the differences between two strings.
///
/// Returns a sorted, non-overlapping edit sequence whose application to
/// `before` yields `after`; equal inputs return an empty sequence. All
/// offsets respect UTF-8 character boundaries. Results are minimal up to
/// the engine's bounded search depth; far-apart inputs may get a coarser
/// (but still correct) sequence.
pub fn diff_strings(before: &str, after: &str) -> Vec<Edit> {
    if before == after {
        return Vec::new();
    }

    if before.is_ascii() && after.is_ascii() {
        diff_ascii(before, after)
    } else {
        diff_unicode(before, after)
    }
}

/// Byte-level diff; valid because ASCII byte offsets are always character
/// boundaries.
fn diff_ascii(before: &str, after: &str) -> Vec<Edit> {
    diff_bytes(before.as_bytes(), after.as_bytes())
        .into_iter()
        .map(|d| Edit {
            start: d.start,
            end: d.end,
            new: after[d.repl_start..d.repl_end].to_string(),
        })
        .collect()
}

/// Code-point diff. The engine returns code-point indices; convert them to
/// byte offsets by accumulating the UTF-8 lengths of the code points
/// consumed so far, and re-encode each replacement from the after-side
/// code points.
fn diff_unicode(before: &str, after: &str) -> Vec<Edit> {
    let a: Vec<char> = before.chars().collect();
    let b: Vec<char> = after.chars().collect();

    let diffs = diff_chars(&a, &b);
    let mut edits = Vec::with_capacity(diffs.len());
    let mut last_end = 0;
    let mut utf8_len = 0;
    for d in diffs {
        utf8_len += chars_utf8_len(&a[last_end..d.start]); // text between edits
        let start = utf8_len;
        utf8_len += chars_utf8_len(&a[d.start..d.end]); // text deleted by this edit
        edits.push(Edit {
            start,
            end: utf8_len,
            new: b[d.repl_start..d.repl_end].iter().collect(),
        });
        last_end = d.end;
    }
    edits
}

/// Length in bytes of the UTF-8 encoding of `chars`.
fn chars_utf8_len(chars: &[char]) -> usize {
    chars.iter().map(|c| c.len_utf8()).sum()
}
