pub mod cli;
pub mod config;
pub mod error;
pub mod file_types;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod queue;
pub mod walker;
pub mod worker;

pub use crate::error::{Result, WordhuntError};
pub use clap::Parser;
pub use cli::Cli;
pub use config::{Config, RunConfig};
pub use file_types::FileFilter;
pub use metrics::Metrics;
pub use output::{CollectingSink, ConsoleSink, FileReport, OutputFormat, ReportSink};
pub use pipeline::{Pipeline, RunSummary};
pub use processor::{count_occurrences, scan_file, SearchWord};
pub use queue::{QueueError, WorkQueue};
pub use walker::{traverse, walk_dir, TraversalStats};
pub use worker::{SharedTotal, Worker, WorkerStats};

/// Searches `root` for `word` with the given queue capacity and worker count,
/// collecting per-file reports in memory.
pub fn search_dir(
    root: impl Into<std::path::PathBuf>,
    word: &str,
    buffer_size: usize,
    threads: usize,
) -> Result<(RunSummary, CollectingSink)> {
    let config = RunConfig {
        buffer_size,
        threads,
        root: root.into(),
        word: SearchWord::new(word)?,
        filter: FileFilter::default(),
    };
    let sink = CollectingSink::new();
    let summary = Pipeline::new(config)?.run(&sink)?;
    Ok((summary, sink))
}
