//! Unified-diff reader.
//!
//! Parses a single file's unified patch body into [`ChangeHunk`]s with
//! per-change old/new line numbers. The input may be a bare hunk stream (as
//! delivered by forge APIs) or a full `git diff` body — file headers and
//! extended headers before the first `@@` are skipped.
//!
//! Recovery policy: the reader never throws away hunks it already parsed.
//! If a later hunk header is malformed or an unexpected line appears after
//! at least one hunk succeeded, the tail is truncated and reported once via
//! `tracing::warn!`. Only a patch whose *first* hunk is unusable is an error.

use tracing::warn;

use crate::error::EngineError;
use crate::types::{Change, ChangeHunk};

/// Parse a unified patch body into hunks.
///
/// Empty or whitespace-only input yields an empty vec.
pub fn parse_patch(patch: &str) -> Result<Vec<ChangeHunk>, EngineError> {
    if patch.trim().is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = patch.lines().collect();
    let mut hunks: Vec<ChangeHunk> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.starts_with("@@") {
            match parse_hunk(&lines, i) {
                Ok((hunk, next)) => {
                    hunks.push(hunk);
                    i = next;
                }
                Err(err) => {
                    if hunks.is_empty() {
                        return Err(err);
                    }
                    warn!(at_line = i + 1, error = %err, "truncating malformed patch tail");
                    break;
                }
            }
        } else if hunks.is_empty() {
            // Before the first hunk: tolerate git file headers and any other
            // preamble, but bare change lines mean the hunk header is missing.
            if is_change_line(line) {
                return Err(EngineError::PatchMalformed {
                    reason: format!("change line before any hunk header: {line:?}"),
                });
            }
            i += 1;
        } else {
            warn!(at_line = i + 1, "truncating patch at unexpected line {line:?}");
            break;
        }
    }

    Ok(hunks)
}

/// True for `+`/`-` change lines that are not `+++`/`---` file headers.
fn is_change_line(line: &str) -> bool {
    (line.starts_with('+') && !line.starts_with("+++"))
        || (line.starts_with('-') && !line.starts_with("---"))
}

/// Parse one hunk starting at the `@@` header in `lines[start]`.
///
/// Returns the hunk and the index of the first unconsumed line. Stops at the
/// next `@@` header, at any line that is not part of a hunk body, or at end
/// of input.
fn parse_hunk(lines: &[&str], start: usize) -> Result<(ChangeHunk, usize), EngineError> {
    let (old_start, old_lines, new_start, new_lines, context) = parse_hunk_header(lines[start])?;

    let mut changes = Vec::new();
    let mut old_line = old_start;
    let mut new_line = new_start;
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];

        if line.starts_with("@@") {
            break;
        }

        if let Some(content) = line.strip_prefix('+') {
            changes.push(Change::Insert { content: content.to_string(), new_line });
            new_line += 1;
        } else if let Some(content) = line.strip_prefix('-') {
            changes.push(Change::Delete { content: content.to_string(), old_line });
            old_line += 1;
        } else if let Some(content) = line.strip_prefix(' ') {
            changes.push(Change::Normal { content: content.to_string(), old_line, new_line });
            old_line += 1;
            new_line += 1;
        } else if line.is_empty() {
            // Some producers drop the leading space on blank context lines.
            changes.push(Change::Normal { content: String::new(), old_line, new_line });
            old_line += 1;
            new_line += 1;
        } else if line.starts_with('\\') {
            // "\ No newline at end of file" — metadata, not a change.
        } else {
            break;
        }

        i += 1;
    }

    // Cross-check the body against the header counts. A mismatch is worth a
    // warning but not a failure: the declared counts drive skip-block
    // arithmetic and trailing-truncation is already reported elsewhere.
    let actual_old = changes
        .iter()
        .filter(|c| matches!(c, Change::Delete { .. } | Change::Normal { .. }))
        .count() as u32;
    let actual_new = changes
        .iter()
        .filter(|c| matches!(c, Change::Insert { .. } | Change::Normal { .. }))
        .count() as u32;
    if actual_old != old_lines || actual_new != new_lines {
        warn!(
            header = lines[start],
            actual_old, actual_new, "hunk body does not match declared line counts"
        );
    }

    let hunk = ChangeHunk {
        header: lines[start].trim_end().to_string(),
        context,
        old_start,
        old_lines,
        new_start,
        new_lines,
        changes,
    };
    Ok((hunk, i))
}

/// Parse a header like `@@ -10,5 +10,7 @@ fn foo()`.
///
/// Returns `(old_start, old_lines, new_start, new_lines, context)`; an
/// omitted count defaults to 1.
fn parse_hunk_header(line: &str) -> Result<(u32, u32, u32, u32, String), EngineError> {
    let malformed = |why: &str| EngineError::PatchMalformed {
        reason: format!("{why}: {line:?}"),
    };

    let after_at = line.strip_prefix("@@ ").ok_or_else(|| malformed("not a hunk header"))?;
    let end_at = after_at.find(" @@").ok_or_else(|| malformed("missing closing @@"))?;

    let range_part = &after_at[..end_at];
    let context = after_at[end_at + 3..].trim().to_string();

    let parts: Vec<&str> = range_part.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(malformed("expected exactly one old and one new range"));
    }

    let old = parts[0].strip_prefix('-').ok_or_else(|| malformed("old range missing '-'"))?;
    let new = parts[1].strip_prefix('+').ok_or_else(|| malformed("new range missing '+'"))?;
    let (old_start, old_lines) = parse_range(old).ok_or_else(|| malformed("bad old range"))?;
    let (new_start, new_lines) = parse_range(new).ok_or_else(|| malformed("bad new range"))?;

    Ok((old_start, old_lines, new_start, new_lines, context))
}

/// Parse `"10,5"` or `"10"` (omitted count = 1).
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
