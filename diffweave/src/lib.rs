//! diffweave — concurrent service surface for the diff rendering engine.
//!
//! Wraps the synchronous `diffweave-core` engine in a pool of compute
//! worker threads with id-keyed reply routing, a content-addressed result
//! cache, and the wire-level request/response types used by embedding
//! transports. A large review touches many files; the pool keeps parsing
//! and highlighting off the interactive path, and the cache makes
//! re-renders of unchanged files free.

pub mod cache;
pub mod config;
pub mod error;
pub mod pool;
pub mod request;
pub mod service;

pub use config::ServiceConfig;
pub use error::PoolError;
pub use pool::{default_worker_count, DiffPool};
pub use request::{
    HighlightLinesRequest, HighlightLinesResponse, ParseDiffRequest, ParseDiffResponse, Response,
};
pub use service::DiffService;

pub use diffweave_core::{
    ChangeKind, DiffLine, DiffSection, Engine, EngineConfig, EngineError, HunkBlock,
    ParseRequest, ParsedDiff, RenderedSegment, SkipBlock,
};
