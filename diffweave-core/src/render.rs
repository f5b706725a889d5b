//! Hunk finalization: skip blocks, line numbering, and HTML attachment.
//!
//! Rows with a single normal segment index into the pre-tokenized file
//! version (delete → old, insert → new, normal → prefer new) so their
//! markup carries full cross-line context. Mixed-kind rows highlight each
//! segment in isolation — the segments are intra-line, so the lost context
//! is bounded.

use crate::error::EngineError;
use crate::highlight;
use crate::types::{
    ChangeHunk, ChangeKind, DiffLine, DiffSection, HunkBlock, Line, ParsedDiff, RenderedSegment,
    SkipBlock,
};

/// Per-request rendering inputs shared by every hunk.
pub(crate) struct RenderContext<'a> {
    pub filename: &'a str,
    pub old_language: &'a str,
    pub new_language: &'a str,
    /// Pre-rendered HTML per line of the old file, when content was given.
    pub old_lines: Option<Vec<String>>,
    /// Pre-rendered HTML per line of the new file, when content was given.
    pub new_lines: Option<Vec<String>>,
}

/// Assemble the final section stream from paired hunk rows.
///
/// A skip block is inserted before every hunk that does not touch the
/// previous one on the old side; `last_after` starts at 1 so a leading
/// skip appears exactly when the first hunk starts past line 1.
pub(crate) fn finalize(
    hunks: &[ChangeHunk],
    rows_per_hunk: Vec<Vec<Line>>,
    ctx: &RenderContext<'_>,
) -> Result<ParsedDiff, EngineError> {
    let mut sections = Vec::with_capacity(hunks.len() * 2);
    let mut last_after: u32 = 1;

    for (hunk, rows) in hunks.iter().zip(rows_per_hunk) {
        if hunk.old_start > last_after {
            let content = if hunk.context.is_empty() {
                hunk.header.clone()
            } else {
                hunk.context.clone()
            };
            sections.push(DiffSection::Skip(SkipBlock {
                count: hunk.old_start - last_after,
                content,
            }));
        }
        last_after = hunk.old_start + hunk.old_lines;

        let lines = rows
            .into_iter()
            .map(|row| render_row(row, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        sections.push(DiffSection::Hunk(HunkBlock {
            old_start: hunk.old_start,
            new_start: hunk.new_start,
            lines,
        }));
    }

    Ok(ParsedDiff { hunks: sections })
}

fn render_row(row: Line, ctx: &RenderContext<'_>) -> Result<DiffLine, EngineError> {
    let single_normal = row.segments.len() == 1 && row.segments[0].kind == ChangeKind::Normal;
    let prerendered = if single_normal { lookup_prerendered(&row, ctx)? } else { None };

    let content = match prerendered {
        Some(html) => {
            let mut segments = row.segments;
            let segment = segments.remove(0);
            vec![RenderedSegment { value: segment.value, html, kind: segment.kind }]
        }
        None => row
            .segments
            .into_iter()
            .map(|segment| {
                let language = match segment.kind {
                    ChangeKind::Delete => ctx.old_language,
                    ChangeKind::Insert | ChangeKind::Normal => ctx.new_language,
                };
                let html = highlight::render_snippet(&segment.value, language);
                RenderedSegment { value: segment.value, html, kind: segment.kind }
            })
            .collect(),
    };

    Ok(DiffLine {
        kind: row.kind,
        old_line_number: row.old_line,
        new_line_number: row.new_line,
        content,
    })
}

/// Fetch the pre-rendered HTML for a single-normal-segment row.
///
/// Returns `Ok(None)` when the relevant file content was not supplied; a
/// line number that falls outside the supplied file is a hard invariant
/// breach, reported with the file name.
fn lookup_prerendered(
    row: &Line,
    ctx: &RenderContext<'_>,
) -> Result<Option<String>, EngineError> {
    let (rendered, number) = match row.kind {
        ChangeKind::Delete => (ctx.old_lines.as_ref(), row.old_line),
        ChangeKind::Insert => (ctx.new_lines.as_ref(), row.new_line),
        ChangeKind::Normal => match (ctx.new_lines.as_ref(), row.new_line) {
            (Some(rendered), Some(number)) => (Some(rendered), Some(number)),
            _ => (ctx.old_lines.as_ref(), row.old_line),
        },
    };
    let (Some(rendered), Some(number)) = (rendered, number) else {
        return Ok(None);
    };

    number
        .checked_sub(1)
        .and_then(|idx| rendered.get(idx as usize))
        .cloned()
        .map(Some)
        .ok_or_else(|| EngineError::InternalInvariant {
            filename: ctx.filename.to_string(),
            detail: format!(
                "line {number} outside pre-rendered file of {} lines",
                rendered.len()
            ),
        })
}
