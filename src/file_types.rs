use std::collections::HashSet;
use std::path::Path;

/// Extensions searched when neither the command line nor the config file names any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "c", "h"];

/// Decides which directory entries the walker hands to the workers.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: HashSet<String>,
    show_hidden: bool,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied(), false)
    }
}

impl FileFilter {
    pub fn new<I, S>(extensions: I, show_hidden: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            show_hidden,
        }
    }

    /// True when a file called `name` should be scanned.
    pub fn is_searchable(&self, name: &str) -> bool {
        if !self.show_hidden && is_hidden(name) {
            return false;
        }
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }

    /// True when the walker should skip `name` entirely, without descending.
    pub fn skips_entry(&self, name: &str) -> bool {
        !self.show_hidden && is_hidden(name)
    }
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
