//! Service-level error types.

use thiserror::Error;

/// Per-request failures surfaced by the compute pool.
///
/// Failures are isolated: one request erroring leaves every other in-flight
/// request untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The engine rejected this request; carries the engine error text as
    /// it travels over the wire.
    #[error("{0}")]
    Request(String),

    /// The pool was terminated while this request was pending.
    #[error("request cancelled: pool terminated")]
    Terminated,

    /// The pool has been terminated and accepts no new requests.
    #[error("pool is closed")]
    PoolClosed,

    /// The worker transport failed (worker thread gone).
    #[error("compute worker failed")]
    WorkerFailed,
}
