//! Rendering edit sequences as inline word-level markup.
//!
//! Instead of line-oriented hunks, this form weaves the changes back into
//! the text: unchanged words pass through, and each deleted word is
//! immediately followed by the words replacing it, both decorated by a
//! caller-supplied callback. Useful for prose, where a whole-line diff
//! obscures a one-word change.

use colored::Colorize;

use crate::align::word_edits;
use crate::edit::Edit;
use crate::error::DiffResult;

#[derive(Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    Equal,
    Deleted,
    Inserted,
}

/// Render `edits` applied to `content` as a single marked-up string.
///
/// The edits are first expanded to whole space-separated words. `split`
/// divides a region of text into display units; `format` decorates one
/// deleted (`true`) or inserted (`false`) unit. Units are joined by single
/// spaces, except that a deletion and the insertion replacing it are
/// emitted adjacent, so a replaced word reads as `old``new`. There is no
/// `---`/`+++` header and there are no `@@` markers.
///
/// Fails under the same conditions as [`crate::apply_edits`].
pub fn inline_diff<S, F>(content: &str, edits: &[Edit], split: S, format: F) -> DiffResult<String>
where
    S: Fn(&str) -> Vec<String>,
    F: Fn(&str, bool) -> String,
{
    let edits = word_edits(content, edits)?;

    let mut units: Vec<(UnitKind, String)> = Vec::new();
    let mut last_end = 0;
    for edit in &edits {
        for unit in split(&content[last_end..edit.start]) {
            units.push((UnitKind::Equal, unit));
        }
        for unit in split(&content[edit.start..edit.end]) {
            units.push((UnitKind::Deleted, format(&unit, true)));
        }
        for unit in split(&edit.new) {
            units.push((UnitKind::Inserted, format(&unit, false)));
        }
        last_end = edit.end;
    }
    for unit in split(&content[last_end..]) {
        units.push((UnitKind::Equal, unit));
    }

    let mut out = String::new();
    let mut prev: Option<UnitKind> = None;
    for (kind, text) in units {
        match prev {
            // A replacement reads as one deleted+inserted token.
            Some(UnitKind::Deleted) if kind == UnitKind::Inserted => {}
            Some(_) => out.push(' '),
            None => {}
        }
        out.push_str(&text);
        prev = Some(kind);
    }
    Ok(out)
}

/// Split on single spaces, dropping a trailing empty unit.
///
/// The natural `split` callback for [`inline_diff`] over prose.
pub fn space_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text.split(' ').map(str::to_string).collect();
    if words.last().is_some_and(String::is_empty) {
        words.pop();
    }
    words
}

/// Decorate a unit for terminal output: deletions in red strikethrough,
/// insertions in green.
///
/// A ready-made `format` callback for [`inline_diff`].
pub fn color_markup(unit: &str, deleted: bool) -> String {
    if deleted {
        unit.red().strikethrough().to_string()
    } else {
        unit.green().to_string()
    }
}
