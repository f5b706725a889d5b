//! Owned data types for the diff rendering pipeline.
//!
//! All types in this module are fully owned (no borrowed lifetimes) and
//! implement `Send` so they can be built inside a compute worker thread and
//! transferred to the caller. The wire-facing types (`DiffLine`,
//! `HunkBlock`, `SkipBlock`, `ParsedDiff`) carry serde derives matching the
//! JSON shape consumed by review UIs; the intermediate types (`Change`,
//! `ChangeHunk`, `Segment`, `Line`) never leave the engine.

use serde::{Deserialize, Serialize};

/// A single change parsed from a unified diff hunk body.
///
/// `content` is stored without the leading `+`/`-`/space marker and without
/// a trailing newline. Line numbers are 1-based positions in the old and
/// new file respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Context line present in both file versions.
    Normal {
        content: String,
        old_line: u32,
        new_line: u32,
    },
    /// Line present only in the old file.
    Delete { content: String, old_line: u32 },
    /// Line present only in the new file.
    Insert { content: String, new_line: u32 },
}

impl Change {
    /// The line text without diff marker or trailing newline.
    pub fn content(&self) -> &str {
        match self {
            Change::Normal { content, .. }
            | Change::Delete { content, .. }
            | Change::Insert { content, .. } => content,
        }
    }
}

/// One `@@` hunk block from a unified diff, fully owned.
///
/// `old_lines`/`new_lines` are the counts declared by the header; `context`
/// is the trailing text after the closing `@@` (often a function signature),
/// kept separately from the raw `header` so skip blocks can prefer it and
/// fall back to the header verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHunk {
    /// The raw `@@ -a,b +c,d @@ …` header line.
    pub header: String,
    /// Trailing header text after the closing `@@`, trimmed. May be empty.
    pub context: String,
    /// Starting line number in the old file.
    pub old_start: u32,
    /// Old-file line count declared by the header.
    pub old_lines: u32,
    /// Starting line number in the new file.
    pub new_start: u32,
    /// New-file line count declared by the header.
    pub new_lines: u32,
    /// All changes belonging to this hunk, in order.
    pub changes: Vec<Change>,
}

/// Change kind shared by lines and intra-line segments.
///
/// Serializes lowercase (`"normal"`, `"insert"`, `"delete"`) on both the
/// line level (`DiffLine::kind`) and the segment level
/// (`RenderedSegment::kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Normal,
    Insert,
    Delete,
}

/// A contiguous run of characters within a line, tagged with a change kind.
///
/// Adjacent same-kind segments are always merged before a line leaves the
/// engine; an empty `value` appears only as the placeholder segment of an
/// empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub value: String,
    pub kind: ChangeKind,
}

impl Segment {
    pub fn new(value: impl Into<String>, kind: ChangeKind) -> Self {
        Self { value: value.into(), kind }
    }
}

/// A display row before HTML attachment.
///
/// A *modified* row (one delete paired with one insert) has
/// `kind == ChangeKind::Normal` with **both** line numbers set and
/// mixed-kind segments — that combination is the signal that the row is an
/// edit rather than plain context. Pure insert/delete rows carry a single
/// `Normal` segment and exactly one line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: ChangeKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub segments: Vec<Segment>,
}

impl Line {
    /// A context row: both numbers set, one normal segment.
    pub fn context(content: &str, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: ChangeKind::Normal,
            old_line: Some(old_line),
            new_line: Some(new_line),
            segments: vec![Segment::new(content, ChangeKind::Normal)],
        }
    }

    /// A pure deletion row: old number only, one normal segment.
    pub fn deletion(content: &str, old_line: u32) -> Self {
        Self {
            kind: ChangeKind::Delete,
            old_line: Some(old_line),
            new_line: None,
            segments: vec![Segment::new(content, ChangeKind::Normal)],
        }
    }

    /// A pure insertion row: new number only, one normal segment.
    pub fn insertion(content: &str, new_line: u32) -> Self {
        Self {
            kind: ChangeKind::Insert,
            old_line: None,
            new_line: Some(new_line),
            segments: vec![Segment::new(content, ChangeKind::Normal)],
        }
    }

    /// A modified row collapsing a paired delete/insert into one line.
    pub fn modified(old_line: u32, new_line: u32, segments: Vec<Segment>) -> Self {
        Self {
            kind: ChangeKind::Normal,
            old_line: Some(old_line),
            new_line: Some(new_line),
            segments,
        }
    }
}

/// A segment with its pre-escaped HTML span markup attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSegment {
    pub value: String,
    pub html: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
}

/// A fully rendered display row as delivered to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line_number: Option<u32>,
    pub content: Vec<RenderedSegment>,
}

/// A rendered hunk: starting numbers plus its display rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HunkBlock {
    pub old_start: u32,
    pub new_start: u32,
    pub lines: Vec<DiffLine>,
}

/// A run of `count` unchanged lines elided between two hunks.
///
/// `content` carries the following hunk's header context (or the raw header
/// when the context is empty) so the UI can label the fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipBlock {
    pub count: u32,
    pub content: String,
}

/// One element of the rendered diff stream.
///
/// Tagged serialization yields `{"type":"hunk", …}` / `{"type":"skip", …}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffSection {
    Hunk(HunkBlock),
    Skip(SkipBlock),
}

/// The complete rendered diff for one file: hunks interleaved with skip
/// blocks, in old-file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDiff {
    pub hunks: Vec<DiffSection>,
}
