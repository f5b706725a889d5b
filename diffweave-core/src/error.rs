//! Engine error types.
//!
//! Only two conditions are hard errors: a patch the reader cannot start on,
//! and a defensive invariant breach. Tokenizer failures are deliberately not
//! represented here — highlighting is best-effort and degrades to escaped
//! plain text inside the renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The unified reader rejected the input outright (no usable hunk
    /// header, range numbers that do not parse). A malformed *tail* after at
    /// least one good hunk is truncated with a warning instead.
    #[error("malformed patch: {reason}")]
    PatchMalformed { reason: String },

    /// Defensive check tripped while rendering, e.g. a change's line number
    /// falling outside the pre-tokenized file it should index into.
    #[error("internal invariant violated for {filename}: {detail}")]
    InternalInvariant { filename: String, detail: String },
}
