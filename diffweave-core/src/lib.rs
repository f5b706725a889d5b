//! diffweave-core — the synchronous diff rendering engine.
//!
//! Converts a unified patch plus optional full old/new file contents into a
//! structured, syntax-highlighted line stream for code-review UIs: hunks of
//! typed rows with old/new numbers, paired delete/insert rows collapsed
//! into single modified rows with intra-line segments, and skip blocks for
//! the unchanged runs between hunks.
//!
//! Everything here is pure CPU work with no I/O; the `diffweave` crate
//! wraps it in a worker pool and result cache for interactive throughput.

pub mod config;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod language;
pub mod types;
pub mod unified;

mod inline;
mod pairing;
mod render;

pub use config::EngineConfig;
pub use engine::{Engine, ParseRequest};
pub use error::EngineError;
pub use types::{
    ChangeKind, DiffLine, DiffSection, HunkBlock, ParsedDiff, RenderedSegment, SkipBlock,
};
