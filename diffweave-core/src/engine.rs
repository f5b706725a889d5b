//! Engine entry points.
//!
//! `Engine` is cheap to construct — the syntax set behind the highlighter
//! is a shared process-wide static — so each compute worker owns one.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::highlight;
use crate::language::language_for;
use crate::pairing::pair_changes;
use crate::render::{finalize, RenderContext};
use crate::types::{ChangeKind, DiffLine, ParsedDiff, RenderedSegment};
use crate::unified::parse_patch;

/// One file's parse request: the unified patch plus optional full file
/// contents for context-aware highlighting.
///
/// `previous_filename` matters for renames, where the old side may carry a
/// different language than the new side.
#[derive(Debug, Clone, Default)]
pub struct ParseRequest {
    pub patch: String,
    pub filename: String,
    pub previous_filename: Option<String>,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
}

/// The synchronous diff rendering engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Eagerly initialize the shared tokenizer state.
    ///
    /// Workers call this once at startup so the first request does not pay
    /// the syntax-set load cost.
    pub fn warm() {
        highlight::warm();
    }

    /// Parse and render one file's unified patch.
    ///
    /// Pre-tokenizes whichever full file versions were supplied, pairs
    /// deletes with inserts hunk by hunk, and attaches span markup to every
    /// segment. Absent file contents degrade to per-segment highlighting;
    /// they never fail the request.
    pub fn parse_diff(&self, request: &ParseRequest) -> Result<ParsedDiff, EngineError> {
        let hunks = parse_patch(&request.patch)?;

        let old_name = request.previous_filename.as_deref().unwrap_or(&request.filename);
        let old_language = language_for(old_name);
        let new_language = language_for(&request.filename);

        let ctx = RenderContext {
            filename: &request.filename,
            old_language,
            new_language,
            old_lines: request
                .old_content
                .as_deref()
                .map(|content| highlight::render_file(content, old_language)),
            new_lines: request
                .new_content
                .as_deref()
                .map(|content| highlight::render_file(content, new_language)),
        };

        let rows = hunks
            .iter()
            .map(|hunk| pair_changes(&hunk.changes, &self.config))
            .collect();
        finalize(&hunks, rows, &ctx)
    }

    /// Highlight a contiguous range of a file with full cross-line context.
    ///
    /// Returns up to `count` normal rows, both line numbers set to the
    /// absolute 1-based position; a range reaching past the end of the file
    /// is clamped.
    pub fn highlight_lines(
        &self,
        content: &str,
        filename: &str,
        start_line: u32,
        count: u32,
    ) -> Vec<DiffLine> {
        let language = language_for(filename);
        let rendered = highlight::render_file(content, language);
        let sources: Vec<&str> = content.split('\n').collect();

        let start = start_line.max(1) as usize - 1;
        let end = start.saturating_add(count as usize).min(rendered.len());
        if start >= end {
            return Vec::new();
        }

        (start..end)
            .map(|idx| {
                let number = idx as u32 + 1;
                DiffLine {
                    kind: ChangeKind::Normal,
                    old_line_number: Some(number),
                    new_line_number: Some(number),
                    content: vec![RenderedSegment {
                        value: sources.get(idx).copied().unwrap_or_default().to_string(),
                        html: rendered[idx].clone(),
                        kind: ChangeKind::Normal,
                    }],
                }
            })
            .collect()
    }
}
