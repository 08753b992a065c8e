//! Producer side of the pipeline: walks the tree and feeds the work queue.

use crate::error::Result;
use crate::file_types::FileFilter;
use crate::queue::WorkQueue;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What the producer saw while walking the tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    pub files_queued: u64,
    pub files_filtered: u64,
    pub entries_skipped: u64,
}

/// Depth-first, pre-order walk of `root`, symlinks followed.
///
/// Hidden entries are pruned (not descended into) unless the filter allows
/// them. Entries that cannot be read, including symlink loops, are logged and
/// skipped.
pub fn walk_dir<'a>(
    root: &Path,
    filter: &'a FileFilter,
    entries_skipped: &'a mut u64,
) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(move |e| {
            // The root is always walked, even if its own name looks hidden.
            e.depth() == 0 || !filter.skips_entry(&e.file_name().to_string_lossy())
        })
        .filter_map(move |entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                let path = e.path().map(Path::display);
                match path {
                    Some(p) => warn!("Skipping unreadable entry {p}: {e}"),
                    None => warn!("Skipping unreadable entry: {e}"),
                }
                *entries_skipped += 1;
                None
            }
        })
}

/// Walks `root` and pushes every searchable regular file onto `queue`.
///
/// Signals completion on the queue exactly once when the walk ends, whether it
/// ran to the end or stopped on a closed queue.
pub fn traverse(
    root: &Path,
    filter: &FileFilter,
    queue: &WorkQueue<PathBuf>,
) -> Result<TraversalStats> {
    let result = produce(root, filter, queue);
    queue.signal_completion();
    result
}

fn produce(
    root: &Path,
    filter: &FileFilter,
    queue: &WorkQueue<PathBuf>,
) -> Result<TraversalStats> {
    let mut stats = TraversalStats::default();
    let mut skipped = 0;

    for entry in walk_dir(root, filter, &mut skipped) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !filter.is_searchable(&name) {
            stats.files_filtered += 1;
            continue;
        }
        debug!("Queueing {}", entry.path().display());
        queue.push(entry.into_path())?;
        stats.files_queued += 1;
    }

    stats.entries_skipped = skipped;
    Ok(stats)
}
