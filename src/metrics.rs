use crate::error::Result;
use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Per-run counters. Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct Metrics {
    pub files_queued: IntCounter,
    pub files_scanned: IntCounter,
    pub files_failed: IntCounter,
    pub occurrences_found: IntCounter,
    pub entries_skipped: IntCounter,
    registry: Arc<Registry>,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter> {
    let c = IntCounter::with_opts(Opts::new(name, help).namespace("wordhunt"))?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        Ok(Metrics {
            files_queued: counter(&registry, "files_queued", "Files pushed onto the work queue")?,
            files_scanned: counter(&registry, "files_scanned", "Files scanned to completion")?,
            files_failed: counter(&registry, "files_failed", "Files that could not be read")?,
            occurrences_found: counter(
                &registry,
                "occurrences_found",
                "Occurrences of the search word",
            )?,
            entries_skipped: counter(
                &registry,
                "entries_skipped",
                "Directory entries skipped during traversal",
            )?,
            registry: Arc::new(registry),
        })
    }

    pub fn gather(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
