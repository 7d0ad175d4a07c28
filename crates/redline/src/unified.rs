//! Rendering edit sequences as unified diffs.

use std::fmt;

use crate::align::line_edits;
use crate::edit::Edit;
use crate::error::DiffResult;

/// Render `edits` applied to `content` as a unified diff, with
/// `context_lines` unchanged lines around each hunk.
///
/// `old_label` and `new_label` name the two versions in the `---`/`+++`
/// header. An empty edit sequence renders as the empty string. Fails under
/// the same conditions as [`crate::apply_edits`].
///
/// The output is GNU-diff compatible, with one known deviation: adding
/// lines at the start of a file that lacks a trailing newline reports a
/// `+` count one larger than GNU diff does.
pub fn unified(
    old_label: &str,
    new_label: &str,
    content: &str,
    edits: &[Edit],
    context_lines: usize,
) -> DiffResult<String> {
    Ok(to_unified(old_label, new_label, content, edits, context_lines)?.to_string())
}

/// The kind of operation a rendered line represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpKind {
    /// Present in the input but not the output.
    Delete,
    /// New in the output.
    Insert,
    /// Unchanged; provides context around edited lines.
    Equal,
}

/// A single line of a hunk. For deletions the text is the line being
/// removed; otherwise it is the line to put in the output.
#[derive(Clone, Debug)]
struct Line {
    kind: OpKind,
    text: String,
}

/// A contiguous block of line edits plus surrounding context.
#[derive(Clone, Debug)]
struct Hunk {
    /// 1-based line in the original where the hunk starts.
    from_line: usize,
    /// 1-based line in the patched output where the hunk starts.
    to_line: usize,
    lines: Vec<Line>,
}

/// A set of edits as a unified diff.
#[derive(Clone, Debug)]
struct UnifiedDiff {
    from: String,
    to: String,
    hunks: Vec<Hunk>,
}

/// Expand the edits to whole lines and group them into hunks.
fn to_unified(
    from_name: &str,
    to_name: &str,
    content: &str,
    edits: &[Edit],
    context_lines: usize,
) -> DiffResult<UnifiedDiff> {
    let gap = context_lines * 2;
    let mut u = UnifiedDiff {
        from: from_name.to_string(),
        to: to_name.to_string(),
        hunks: Vec::new(),
    };
    if edits.is_empty() {
        return Ok(u);
    }
    let edits = line_edits(content, edits)?;
    let lines = split_lines(content);

    let mut open: Option<Hunk> = None;
    let mut last = 0usize;
    let mut to_line = 0usize;
    for edit in &edits {
        // Zero-based line numbers of the edit's start and end.
        let start = count_newlines(&content[..edit.start]);
        let mut end = count_newlines(&content[..edit.end]);
        if edit.end == content.len() && !content.is_empty() && !content.ends_with('\n') {
            // EOF counts as an implicit newline.
            end += 1;
        }

        let mut hunk = match open.take() {
            // Directly extends the open hunk.
            Some(hunk) if start == last => hunk,
            // Close enough to bridge with the intervening equal lines.
            Some(mut hunk) if start <= last + gap => {
                add_equal_lines(&mut hunk, &lines, last as isize, start as isize);
                hunk
            }
            prev => {
                // Close the open hunk (with trailing context) and start a
                // new one; its leading context may be clipped at line 0.
                if let Some(mut hunk) = prev {
                    add_equal_lines(
                        &mut hunk,
                        &lines,
                        last as isize,
                        (last + context_lines) as isize,
                    );
                    u.hunks.push(hunk);
                }
                to_line += start - last;
                let mut hunk = Hunk {
                    from_line: start + 1,
                    to_line: to_line + 1,
                    lines: Vec::new(),
                };
                let clipped = add_equal_lines(
                    &mut hunk,
                    &lines,
                    start as isize - context_lines as isize,
                    start as isize,
                );
                hunk.from_line -= clipped;
                hunk.to_line -= clipped;
                hunk
            }
        };

        last = start;
        for i in start..end {
            hunk.lines.push(Line {
                kind: OpKind::Delete,
                text: lines[i].to_string(),
            });
            last += 1;
        }
        if !edit.new.is_empty() {
            for text in split_lines(&edit.new) {
                hunk.lines.push(Line {
                    kind: OpKind::Insert,
                    text: text.to_string(),
                });
                to_line += 1;
            }
        }
        open = Some(hunk);
    }
    if let Some(mut hunk) = open {
        add_equal_lines(
            &mut hunk,
            &lines,
            last as isize,
            (last + context_lines) as isize,
        );
        u.hunks.push(hunk);
    }
    Ok(u)
}

/// Split into lines, each keeping its trailing newline; a final
/// unterminated line is kept as-is.
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

/// Append the equal lines `[start, end)` as context, skipping clipped
/// indices below 0 and stopping at the end of the file. Returns how many
/// lines were added.
fn add_equal_lines(hunk: &mut Hunk, lines: &[&str], start: isize, end: isize) -> usize {
    let mut added = 0;
    for i in start..end {
        if i < 0 {
            continue;
        }
        let i = i as usize;
        if i >= lines.len() {
            return added;
        }
        hunk.lines.push(Line {
            kind: OpKind::Equal,
            text: lines[i].to_string(),
        });
        added += 1;
    }
    added
}

impl fmt::Display for UnifiedDiff {
    /// The standard textual form; the output can be fed to `patch`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hunks.is_empty() {
            return Ok(());
        }
        writeln!(f, "--- {}", self.from)?;
        writeln!(f, "+++ {}", self.to)?;
        for hunk in &self.hunks {
            let (mut from_count, mut to_count) = (0, 0);
            for line in &hunk.lines {
                match line.kind {
                    OpKind::Delete => from_count += 1,
                    OpKind::Insert => to_count += 1,
                    OpKind::Equal => {
                        from_count += 1;
                        to_count += 1;
                    }
                }
            }
            write!(f, "@@")?;
            if from_count > 1 {
                write!(f, " -{},{}", hunk.from_line, from_count)?;
            } else if hunk.from_line == 1 && from_count == 0 {
                // GNU diff quirk when adding to an empty file.
                write!(f, " -0,0")?;
            } else {
                write!(f, " -{}", hunk.from_line)?;
            }
            if to_count > 1 {
                write!(f, " +{},{}", hunk.to_line, to_count)?;
            } else if hunk.to_line == 1 && to_count == 0 {
                // Symmetric quirk when deleting down to an empty file.
                write!(f, " +0,0")?;
            } else {
                write!(f, " +{}", hunk.to_line)?;
            }
            writeln!(f, " @@")?;
            for line in &hunk.lines {
                let prefix = match line.kind {
                    OpKind::Delete => '-',
                    OpKind::Insert => '+',
                    OpKind::Equal => ' ',
                };
                write!(f, "{}{}", prefix, line.text)?;
                if !line.text.ends_with('\n') {
                    write!(f, "\n\\ No newline at end of file\n")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use crate::text_diff::diff_strings;

    const HEADER: &str = "--- from\n+++ to\n";

    fn render(before: &str, after: &str, context: usize) -> String {
        let edits = diff_strings(before, after);
        unified("from", "to", before, &edits, context).unwrap()
    }

    #[test]
    fn no_edits_render_as_empty_output() {
        assert_eq!(render("", "", 3), "");
        assert_eq!(render("gargantuan\n", "gargantuan\n", 3), "");
    }

    #[test]
    fn single_line_replacements() {
        let cases: &[(&str, &str, &str)] = &[
            ("fruit\n", "cheese\n", "@@ -1 +1 @@\n-fruit\n+cheese\n"),
            ("gord\n", "gourd\n", "@@ -1 +1 @@\n-gord\n+gourd\n"),
            ("groat\n", "goat\n", "@@ -1 +1 @@\n-groat\n+goat\n"),
            ("loud\n", "lord\n", "@@ -1 +1 @@\n-loud\n+lord\n"),
            ("blanket\n", "bunker\n", "@@ -1 +1 @@\n-blanket\n+bunker\n"),
        ];
        for &(before, after, body) in cases {
            assert_eq!(
                render(before, after, 3),
                format!("{HEADER}{body}"),
                "unified for ({before:?}, {after:?})"
            );
        }
    }

    #[test]
    fn inserted_line_gets_surrounding_context() {
        assert_eq!(
            render("1: one\n3: three\n", "1: one\n2: two\n3: three\n", 3),
            format!("{HEADER}@@ -1,2 +1,3 @@\n 1: one\n+2: two\n 3: three\n"),
        );
    }

    #[test]
    fn missing_trailing_newlines_are_marked() {
        assert_eq!(
            render("A", "B", 3),
            format!(
                "{HEADER}@@ -1 +1 @@\n-A\n\\ No newline at end of file\n+B\n\\ No newline at end of file\n"
            ),
        );
        assert_eq!(
            render("A", "AB", 3),
            format!(
                "{HEADER}@@ -1 +1 @@\n-A\n\\ No newline at end of file\n+AB\n\\ No newline at end of file\n"
            ),
        );
        assert_eq!(
            render("A", "A\n", 3),
            format!("{HEADER}@@ -1 +1 @@\n-A\n\\ No newline at end of file\n+A\n"),
        );
    }

    #[test]
    fn emptying_a_file_uses_the_gnu_zero_count() {
        assert_eq!(
            render("meow", "", 3),
            format!("{HEADER}@@ -1 +0,0 @@\n-meow\n\\ No newline at end of file\n"),
        );
    }

    #[test]
    fn filling_an_empty_file_uses_the_gnu_zero_count() {
        let want = format!(
            "{HEADER}@@ -0,0 +1,2 @@\n+AB\n+C\n\\ No newline at end of file\n"
        );
        assert_eq!(render("", "AB\nC", 3), want);
    }

    #[test]
    fn replacing_the_last_line() {
        assert_eq!(
            render("A\nB\n", "A\nC\n\n", 3),
            format!("{HEADER}@@ -1,2 +1,3 @@\n A\n-B\n+C\n+\n"),
        );
    }

    #[test]
    fn leading_blank_line_removal() {
        assert_eq!(
            render("\nA\n", "A\n", 3),
            format!("{HEADER}@@ -1,2 +1 @@\n-\n A\n"),
        );
    }

    #[test]
    fn sub_line_insertion_expands_to_the_line() {
        assert_eq!(
            render("aaa\nccc\n", "aaa\nbbb\nccc\n", 3),
            format!("{HEADER}@@ -1,2 +1,3 @@\n aaa\n+bbb\n ccc\n"),
        );
    }

    #[test]
    fn indentation_change_inside_a_block() {
        let before = "package a\n\ntype S struct {\ns fmt.Stringer\n}\n";
        let after = "package a\n\ntype S struct {\n\ts fmt.Stringer\n}\n";
        assert_eq!(
            render(before, after, 3),
            format!(
                "{HEADER}@@ -1,5 +1,5 @@\n package a\n \n type S struct {{\n-s fmt.Stringer\n+\ts fmt.Stringer\n }}\n"
            ),
        );
    }

    #[test]
    fn single_context_line_hunk() {
        let edits = diff_strings("a\nb\nc\n", "a\nd\nc\n");
        assert_eq!(
            unified("from", "to", "a\nb\nc\n", &edits, 1).unwrap(),
            "--- from\n+++ to\n@@ -1,3 +1,3 @@\n a\n-b\n+d\n c\n",
        );
    }

    #[test]
    fn distant_edits_get_separate_hunks() {
        let before = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let after = "x\n2\n3\n4\n5\n6\n7\n8\n9\ny\n";
        let got = render(before, after, 1);
        assert_eq!(
            got,
            format!("{HEADER}@@ -1,2 +1,2 @@\n-1\n+x\n 2\n@@ -9,2 +9,2 @@\n 9\n-10\n+y\n"),
        );
    }

    #[test]
    fn nearby_edits_are_bridged_into_one_hunk() {
        let before = "1\n2\n3\n4\n5\n";
        let after = "x\n2\n3\n4\ny\n";
        // At context 2 the second edit falls within last + 2*context and
        // the equal lines join the hunks; at context 1 it does not.
        assert_eq!(
            render(before, after, 2),
            format!("{HEADER}@@ -1,5 +1,5 @@\n-1\n+x\n 2\n 3\n 4\n-5\n+y\n"),
        );
        assert_eq!(
            render(before, after, 1),
            format!("{HEADER}@@ -1,2 +1,2 @@\n-1\n+x\n 2\n@@ -4,2 +4,2 @@\n 4\n-5\n+y\n"),
        );
    }

    #[test]
    fn rewrites_render_and_their_line_edits_replay() {
        // Inputs whose exact hunk layout is incidental; the rendering
        // must succeed and the underlying line expansion must still
        // replay to the target text.
        for (before, after) in [
            ("A\nB\nC\nA\nB\nB\nA\n", "C\nB\nA\nB\nA\nC\n"),
            ("A\nB\nC\nD\nE\nF\nG\n", "A\nH\nI\nJ\nE\nF\nK\n"),
        ] {
            let edits = diff_strings(before, after);
            let out = unified("from", "to", before, &edits, 3).unwrap();
            assert!(out.starts_with(HEADER));
            assert!(out.contains("@@"));
            let expanded = line_edits(before, &edits).unwrap();
            assert_eq!(apply_edits(before, &expanded).unwrap(), after);
        }
    }

    #[test]
    fn inconsistent_edits_are_rejected() {
        let err = unified("from", "to", "abc", &[Edit::new(0, 9, "x")], 3);
        assert!(err.is_err());
    }
}
