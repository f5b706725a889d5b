//! Wire-level request and response types.
//!
//! These mirror the JSON messages exchanged with embedding transports
//! (web workers, IPC, RPC). Ids are opaque strings chosen by the caller
//! and echoed back verbatim; the pool's internal dispatch ids are separate.

use serde::{Deserialize, Serialize};

use diffweave_core::{DiffLine, ParseRequest, ParsedDiff};

/// Request to parse and render one file's unified patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseDiffRequest {
    pub id: String,
    /// Unified-diff body; no file header required.
    pub patch: String,
    pub filename: String,
    /// Equal to `filename` when the file was not renamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
    /// Full pre-image text, enabling context-aware highlighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    /// Full post-image text, enabling context-aware highlighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
}

impl ParseDiffRequest {
    /// Strip the transport id, leaving the engine-level request.
    pub fn into_parse_request(self) -> (String, ParseRequest) {
        let ParseDiffRequest { id, patch, filename, previous_filename, old_content, new_content } =
            self;
        (id, ParseRequest { patch, filename, previous_filename, old_content, new_content })
    }
}

/// Request to highlight a contiguous range of a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightLinesRequest {
    pub id: String,
    pub content: String,
    pub filename: String,
    /// 1-based first line of the range.
    pub start_line: u32,
    pub count: u32,
}

/// Response envelope: `{id, result}` on success, `{id, error}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response<T> {
    Result { id: String, result: T },
    Error { id: String, error: String },
}

impl<T> Response<T> {
    pub fn from_outcome(id: String, outcome: Result<T, impl std::fmt::Display>) -> Self {
        match outcome {
            Ok(result) => Response::Result { id, result },
            Err(error) => Response::Error { id, error: error.to_string() },
        }
    }
}

/// Response to a [`ParseDiffRequest`].
pub type ParseDiffResponse = Response<ParsedDiff>;

/// Response to a [`HighlightLinesRequest`].
pub type HighlightLinesResponse = Response<Vec<DiffLine>>;
