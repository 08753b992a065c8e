//! Consumer side of the pipeline.

use crate::metrics::Metrics;
use crate::output::{FileReport, ReportSink};
use crate::processor::{scan_file, SearchWord};
use crate::queue::WorkQueue;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Running sum of occurrences across all workers. Only ever grows.
#[derive(Debug, Default)]
pub struct SharedTotal(Mutex<u64>);

impl SharedTotal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: u64) {
        *self.0.lock() += n;
    }

    pub fn get(&self) -> u64 {
        *self.0.lock()
    }

    pub fn into_inner(self) -> u64 {
        self.0.into_inner()
    }
}

/// What a single worker did before it terminated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub files_scanned: u64,
    pub files_failed: u64,
    pub occurrences: u64,
}

impl std::ops::AddAssign for WorkerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files_scanned += rhs.files_scanned;
        self.files_failed += rhs.files_failed;
        self.occurrences += rhs.occurrences;
    }
}

/// Everything a worker borrows for the duration of a run.
pub struct WorkerContext<'a> {
    pub queue: &'a WorkQueue<PathBuf>,
    pub word: &'a SearchWord,
    pub total: &'a SharedTotal,
    pub sink: &'a dyn ReportSink,
    pub metrics: &'a Metrics,
}

pub struct Worker {
    label: String,
}

impl Worker {
    pub fn new(id: usize) -> Self {
        Self {
            label: format!("worker-{id}"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Pops and scans paths until the queue reports completion.
    pub fn run(&self, ctx: &WorkerContext<'_>) -> WorkerStats {
        let mut stats = WorkerStats::default();
        debug!("{} started", self.label);

        while let Some(path) = ctx.queue.pop() {
            trace!("{} processing {}", self.label, path.display());
            match scan_file(&path, ctx.word) {
                Ok(count) => {
                    ctx.sink.file_scanned(&FileReport {
                        worker: self.label.clone(),
                        path,
                        occurrences: count,
                    });
                    ctx.total.add(count);

                    stats.files_scanned += 1;
                    stats.occurrences += count;
                    ctx.metrics.files_scanned.inc();
                    ctx.metrics.occurrences_found.inc_by(count);
                }
                Err(e) => {
                    warn!("{}: {e}", self.label);
                    ctx.sink.file_failed(&self.label, &path, &e);
                    stats.files_failed += 1;
                    ctx.metrics.files_failed.inc();
                }
            }
        }

        debug!(
            "{} terminated after {} file(s), {} failure(s)",
            self.label, stats.files_scanned, stats.files_failed
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CollectingSink;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_shared_total_no_lost_updates() {
        let total = SharedTotal::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        total.add(1);
                    }
                });
            }
        });
        assert_eq!(total.into_inner(), 8_000);
    }

    #[test]
    fn test_worker_skips_unreadable_and_continues() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "foo FOO\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let queue = WorkQueue::new(4).unwrap();
        queue.push(missing.clone()).unwrap();
        queue.push(good.clone()).unwrap();
        queue.signal_completion();

        let word = SearchWord::new("foo").unwrap();
        let total = SharedTotal::new();
        let sink = CollectingSink::new();
        let metrics = Metrics::new().unwrap();
        let ctx = WorkerContext {
            queue: &queue,
            word: &word,
            total: &total,
            sink: &sink,
            metrics: &metrics,
        };

        let stats = Worker::new(0).run(&ctx);

        assert_eq!(
            stats,
            WorkerStats {
                files_scanned: 1,
                files_failed: 1,
                occurrences: 2,
            }
        );
        assert_eq!(total.get(), 2);
        assert_eq!(sink.failed()[0].path, missing);
        assert_eq!(sink.report_for(&good).unwrap().worker, "worker-0");
        assert_eq!(metrics.files_failed.get(), 1);
    }

    #[test]
    fn test_worker_exits_on_completed_empty_queue() {
        let queue = WorkQueue::new(1).unwrap();
        queue.signal_completion();
        let word = SearchWord::new("foo").unwrap();
        let total = SharedTotal::new();
        let sink = CollectingSink::new();
        let metrics = Metrics::new().unwrap();
        let ctx = WorkerContext {
            queue: &queue,
            word: &word,
            total: &total,
            sink: &sink,
            metrics: &metrics,
        };

        assert_eq!(Worker::new(3).run(&ctx), WorkerStats::default());
        assert_eq!(total.get(), 0);
    }
}
