//! Report sinks: where per-file results and the final total go.

use crate::error::WordhuntError;
use crate::pipeline::RunSummary;
use clap::ValueEnum;
use colored::*;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub worker: String,
    pub path: PathBuf,
    pub occurrences: u64,
}

/// A file that was popped but could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub worker: String,
    pub path: PathBuf,
    pub error: String,
}

/// Receives results from every worker concurrently.
pub trait ReportSink: Send + Sync {
    fn file_scanned(&self, report: &FileReport);

    fn file_failed(&self, worker: &str, path: &Path, error: &WordhuntError);

    fn finished(&self, _summary: &RunSummary) {}
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Writes reports to stdout, failures to stderr.
pub struct ConsoleSink {
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn emit_json<T: Serialize>(mut out: impl Write, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => {
                let _ = writeln!(out, "{line}");
            }
            Err(e) => log::error!("Failed to serialize report: {e}"),
        }
    }
}

impl ReportSink for ConsoleSink {
    fn file_scanned(&self, report: &FileReport) {
        match self.format {
            OutputFormat::Text => {
                // A single write per line keeps output from different workers whole.
                let _ = writeln!(
                    io::stdout().lock(),
                    "[{}] {}: {} occurrences",
                    report.worker.cyan(),
                    report.path.display(),
                    report.occurrences.to_string().yellow().bold()
                );
            }
            OutputFormat::Json => Self::emit_json(io::stdout().lock(), report),
        }
    }

    fn file_failed(&self, worker: &str, path: &Path, error: &WordhuntError) {
        match self.format {
            OutputFormat::Text => {
                let _ = writeln!(
                    io::stderr().lock(),
                    "[{}] {}: {}",
                    worker.cyan(),
                    path.display(),
                    format!("skipped ({error})").red()
                );
            }
            OutputFormat::Json => {
                let failure = FileFailure {
                    worker: worker.to_string(),
                    path: path.to_path_buf(),
                    error: error.to_string(),
                };
                Self::emit_json(io::stderr().lock(), &failure);
            }
        }
    }

    fn finished(&self, summary: &RunSummary) {
        match self.format {
            OutputFormat::Text => {
                let _ = writeln!(
                    io::stdout().lock(),
                    "{} {}",
                    "Total found =".green().bold(),
                    summary.total
                );
            }
            OutputFormat::Json => Self::emit_json(io::stdout().lock(), summary),
        }
    }
}

/// Keeps every report in memory.
#[derive(Default)]
pub struct CollectingSink {
    scanned: Mutex<Vec<FileReport>>,
    failed: Mutex<Vec<FileFailure>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scanned(&self) -> Vec<FileReport> {
        self.scanned.lock().clone()
    }

    pub fn failed(&self) -> Vec<FileFailure> {
        self.failed.lock().clone()
    }

    pub fn report_for(&self, path: &Path) -> Option<FileReport> {
        self.scanned.lock().iter().find(|r| r.path == path).cloned()
    }
}

impl ReportSink for CollectingSink {
    fn file_scanned(&self, report: &FileReport) {
        self.scanned.lock().push(report.clone());
    }

    fn file_failed(&self, worker: &str, path: &Path, error: &WordhuntError) {
        self.failed.lock().push(FileFailure {
            worker: worker.to_string(),
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_report_json_shape() {
        let report = FileReport {
            worker: "worker-1".to_string(),
            path: PathBuf::from("dir/a.txt"),
            occurrences: 3,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(value["worker"], "worker-1");
        assert_eq!(value["path"], "dir/a.txt");
        assert_eq!(value["occurrences"], 3);
    }

    #[test]
    fn test_collecting_sink_records_failures() {
        let sink = CollectingSink::new();
        let err = WordhuntError::FileProcessing {
            path: PathBuf::from("x.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        sink.file_failed("worker-0", Path::new("x.txt"), &err);

        let failed = sink.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].worker, "worker-0");
        assert!(failed[0].error.contains("gone"));
        assert!(sink.scanned().is_empty());
    }
}
