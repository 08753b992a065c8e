use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordhuntError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to scan file '{path}': {source}")]
    FileProcessing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Work queue was completed before the producer finished")]
    QueueClosed,

    #[error("Worker {0} panicked")]
    WorkerPanicked(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl WordhuntError {
    pub fn config(msg: impl Into<String>) -> Self {
        WordhuntError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WordhuntError>;
