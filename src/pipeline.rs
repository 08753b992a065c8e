//! Wires the walker, the work queue and the worker pool together.
//!
//! The calling thread is the producer. Workers are scoped threads borrowing
//! the queue, the word and the shared total; leaving the scope is the join
//! barrier after which the total is stable and can be read.

use crate::config::RunConfig;
use crate::error::{Result, WordhuntError};
use crate::metrics::Metrics;
use crate::output::ReportSink;
use crate::queue::WorkQueue;
use crate::walker::{traverse, TraversalStats};
use crate::worker::{SharedTotal, Worker, WorkerContext, WorkerStats};
use log::{debug, error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

/// Final result of a run, read after every worker has joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: u64,
    pub files_queued: u64,
    pub files_scanned: u64,
    pub files_failed: u64,
    pub entries_skipped: u64,
    pub workers: usize,
    pub elapsed_ms: u64,
}

/// Signals completion when dropped, so a panicking producer cannot leave
/// workers parked in `pop` while the scope waits for them.
struct CompletionGuard<'a>(&'a WorkQueue<PathBuf>);

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.0.signal_completion();
    }
}

pub struct Pipeline {
    config: RunConfig,
    metrics: Metrics,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Result<Self> {
        Ok(Self {
            config,
            metrics: Metrics::new()?,
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs the search to completion and reports the summary to `sink`.
    pub fn run(&self, sink: &dyn ReportSink) -> Result<RunSummary> {
        let start = Instant::now();
        // Without a consumer the producer would block forever on a full queue.
        if self.config.threads == 0 {
            return Err(WordhuntError::config("at least one worker is required"));
        }
        let queue = WorkQueue::new(self.config.buffer_size)?;
        let total = SharedTotal::new();
        let ctx = WorkerContext {
            queue: &queue,
            word: &self.config.word,
            total: &total,
            sink,
            metrics: &self.metrics,
        };

        info!(
            "Searching {} for '{}' with {} worker(s), buffer size {}",
            self.config.root.display(),
            self.config.word,
            self.config.threads,
            self.config.buffer_size
        );

        let (traversal, workers) = thread::scope(|s| {
            let _guard = CompletionGuard(&queue);
            let ctx = &ctx;

            let mut handles = Vec::with_capacity(self.config.threads);
            for id in 0..self.config.threads {
                let worker = Worker::new(id);
                let spawned = thread::Builder::new()
                    .name(worker.label().to_string())
                    .spawn_scoped(s, move || worker.run(ctx));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    // Completion is signalled by the guard so the workers
                    // already running still drain and exit.
                    Err(e) => return (Err(WordhuntError::Io(e)), Vec::new()),
                }
            }

            let traversal = traverse(&self.config.root, &self.config.filter, &queue);
            debug!("Traversal finished, waiting for workers");
            queue.signal_completion();

            let joined = handles
                .into_iter()
                .map(|h| {
                    let name = h.thread().name().unwrap_or("worker").to_string();
                    h.join().map_err(|_| name)
                })
                .collect::<Vec<_>>();
            (traversal, joined)
        });

        let traversal: TraversalStats = traversal?;
        let mut stats = WorkerStats::default();
        for joined in workers {
            match joined {
                Ok(s) => stats += s,
                Err(name) => {
                    error!("{name} panicked");
                    return Err(WordhuntError::WorkerPanicked(name));
                }
            }
        }

        self.metrics.files_queued.inc_by(traversal.files_queued);
        self.metrics.entries_skipped.inc_by(traversal.entries_skipped);

        let summary = RunSummary {
            total: total.into_inner(),
            files_queued: traversal.files_queued,
            files_scanned: stats.files_scanned,
            files_failed: stats.files_failed,
            entries_skipped: traversal.entries_skipped,
            workers: self.config.threads,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Scanned {} file(s), {} failed, total {} in {}ms",
            summary.files_scanned, summary.files_failed, summary.total, summary.elapsed_ms
        );
        sink.finished(&summary);
        Ok(summary)
    }
}
