//! Compute pool: worker threads behind channels.
//!
//! Parsing and highlighting are CPU-bound and must not block interactive
//! callers, so the engine runs on a pool of OS threads. Each worker owns an
//! `Engine` and a `crossbeam_channel` receiver; requests are dispatched
//! round-robin and tagged with a monotonic id. All replies travel over one
//! shared tokio unbounded channel to a router task that resolves the
//! matching pending `oneshot` — replies may interleave arbitrarily, id
//! keying makes resolution correct.
//!
//! Cancellation is cooperative: dropping the caller's future abandons only
//! that request (the worker's reply is discarded on arrival), and
//! `terminate` closes every worker channel, so workers exit after the job
//! in hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use diffweave_core::{DiffLine, Engine, EngineConfig, ParseRequest, ParsedDiff};

use crate::error::PoolError;

/// Work sent to a single worker thread.
#[derive(Debug)]
enum WorkerJob {
    ParseDiff { id: u64, request: ParseRequest },
    HighlightLines { id: u64, content: String, filename: String, start_line: u32, count: u32 },
}

/// Result payload carried back over the shared reply channel.
#[derive(Debug)]
enum WorkerOutput {
    Diff(ParsedDiff),
    Lines(Vec<DiffLine>),
}

#[derive(Debug)]
struct WorkerReply {
    id: u64,
    outcome: Result<WorkerOutput, String>,
}

type PendingMap = HashMap<u64, oneshot::Sender<Result<WorkerOutput, PoolError>>>;

struct Dispatch {
    /// Send halves of the per-worker job channels. Cleared on terminate;
    /// a worker exits once its channel closes.
    workers: Vec<Sender<WorkerJob>>,
    /// Round-robin cursor.
    next: usize,
}

/// A pool of compute workers keyed by request id.
pub struct DiffPool {
    dispatch: Mutex<Dispatch>,
    pending: Arc<Mutex<PendingMap>>,
    next_id: AtomicU64,
}

/// Worker count used when none is configured: every core, but at least 4
/// so small machines still overlap work with rendering.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4).max(4)
}

impl DiffPool {
    /// Spawn `workers` threads and the reply router.
    ///
    /// Must be called within a tokio runtime — the router is a tokio task.
    pub fn new(workers: usize, engine_config: EngineConfig) -> Self {
        let worker_count = workers.max(1);
        let pending: Arc<Mutex<PendingMap>> = Arc::new(Mutex::new(HashMap::new()));
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let mut senders = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let (job_tx, job_rx) = crossbeam_channel::unbounded::<WorkerJob>();
            let reply_tx = reply_tx.clone();
            let config = engine_config.clone();
            std::thread::spawn(move || worker_loop(index, config, job_rx, reply_tx));
            senders.push(job_tx);
        }
        // The router observes channel close once every worker has exited.
        drop(reply_tx);
        tokio::spawn(route_replies(reply_rx, Arc::clone(&pending)));

        debug!(workers = worker_count, "compute pool started");
        Self {
            dispatch: Mutex::new(Dispatch { workers: senders, next: 0 }),
            pending,
            next_id: AtomicU64::new(0),
        }
    }

    /// Parse and render one file's patch on a pool worker.
    pub async fn parse_diff(&self, request: ParseRequest) -> Result<ParsedDiff, PoolError> {
        match self.submit(|id| WorkerJob::ParseDiff { id, request }).await? {
            WorkerOutput::Diff(diff) => Ok(diff),
            WorkerOutput::Lines(_) => Err(PoolError::WorkerFailed),
        }
    }

    /// Fan out a batch of parse requests and await them all.
    ///
    /// The first failure fails the batch; callers needing per-request
    /// outcomes issue individual `parse_diff` calls.
    pub async fn parse_diff_batch(
        &self,
        requests: Vec<ParseRequest>,
    ) -> Result<Vec<ParsedDiff>, PoolError> {
        futures::future::try_join_all(requests.into_iter().map(|r| self.parse_diff(r))).await
    }

    /// Highlight a contiguous file range on a pool worker.
    pub async fn highlight_lines(
        &self,
        content: String,
        filename: String,
        start_line: u32,
        count: u32,
    ) -> Result<Vec<DiffLine>, PoolError> {
        let job = |id| WorkerJob::HighlightLines { id, content, filename, start_line, count };
        match self.submit(job).await? {
            WorkerOutput::Lines(lines) => Ok(lines),
            WorkerOutput::Diff(_) => Err(PoolError::WorkerFailed),
        }
    }

    /// Stop every worker and fail all pending requests.
    ///
    /// Workers finish the job in hand, then exit on channel close; the pool
    /// rejects new requests from this point on.
    pub fn terminate(&self) {
        lock(&self.dispatch).workers.clear();
        let drained: Vec<_> = lock(&self.pending).drain().collect();
        for (_, waiter) in drained {
            let _ = waiter.send(Err(PoolError::Terminated));
        }
        debug!("compute pool terminated");
    }

    async fn submit(
        &self,
        job_for: impl FnOnce(u64) -> WorkerJob,
    ) -> Result<WorkerOutput, PoolError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (waiter_tx, waiter_rx) = oneshot::channel();
        lock(&self.pending).insert(id, waiter_tx);

        let sent = {
            let mut dispatch = lock(&self.dispatch);
            if dispatch.workers.is_empty() {
                Err(PoolError::PoolClosed)
            } else {
                let slot = dispatch.next % dispatch.workers.len();
                dispatch.next = dispatch.next.wrapping_add(1);
                dispatch.workers[slot].send(job_for(id)).map_err(|_| PoolError::WorkerFailed)
            }
        };
        if let Err(error) = sent {
            lock(&self.pending).remove(&id);
            return Err(error);
        }

        waiter_rx.await.map_err(|_| PoolError::Terminated)?
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Entry point for one compute worker thread.
///
/// Loops over incoming jobs until the channel closes (pool terminated or
/// dropped). Engine errors are stringified here so the reply matches the
/// wire's `{id, error}` shape.
fn worker_loop(
    index: usize,
    config: EngineConfig,
    jobs: Receiver<WorkerJob>,
    replies: mpsc::UnboundedSender<WorkerReply>,
) {
    // Pay the syntax-set load once, before the first request arrives.
    Engine::warm();
    let engine = Engine::new(config);

    for job in jobs {
        let (id, outcome) = match job {
            WorkerJob::ParseDiff { id, request } => (
                id,
                engine
                    .parse_diff(&request)
                    .map(WorkerOutput::Diff)
                    .map_err(|e| e.to_string()),
            ),
            WorkerJob::HighlightLines { id, content, filename, start_line, count } => (
                id,
                Ok(WorkerOutput::Lines(
                    engine.highlight_lines(&content, &filename, start_line, count),
                )),
            ),
        };
        if replies.send(WorkerReply { id, outcome }).is_err() {
            break;
        }
    }
    debug!(worker = index, "compute worker exited");
}

/// Routes worker replies to their pending oneshot by id.
///
/// A reply without a waiter means the caller dropped its future; the result
/// is discarded, which is the cooperative-cancellation contract.
async fn route_replies(mut replies: mpsc::UnboundedReceiver<WorkerReply>, pending: Arc<Mutex<PendingMap>>) {
    while let Some(reply) = replies.recv().await {
        let waiter = lock(&pending).remove(&reply.id);
        if let Some(waiter) = waiter {
            let _ = waiter.send(reply.outcome.map_err(PoolError::Request));
        }
    }
}
