//! Run configuration.
//!
//! Settings come from the command line first, then an optional TOML file.
//! [`RunConfig::resolve`] validates the merged result before any thread is
//! started, so a bad value never leads to a partial run.

use crate::cli::Cli;
use crate::error::{Result, WordhuntError};
use crate::file_types::{FileFilter, DEFAULT_EXTENSIONS};
use crate::processor::SearchWord;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of an optional `config.toml`.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub buffer_size: Option<usize>,
    pub threads: Option<usize>,
    pub extensions: Option<Vec<String>>,
    pub show_hidden: Option<bool>,
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config file found in
    /// the usual places, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_path(),
        };
        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("wordhunt/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".wordhunt.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".wordhunt.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }
}

/// Fully validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub buffer_size: usize,
    pub threads: usize,
    pub root: PathBuf,
    pub word: SearchWord,
    pub filter: FileFilter,
}

impl RunConfig {
    /// Merges command line over config file and validates the result.
    pub fn resolve(cli: &Cli, file: &Config) -> Result<Self> {
        let buffer_size = positive(
            "buffer size (-b)",
            cli.buffer_size.or(file.search.buffer_size),
        )?;
        let threads = positive("thread count (-t)", cli.threads.or(file.search.threads))?;

        let root = cli
            .root
            .clone()
            .ok_or_else(|| WordhuntError::config("missing directory (-d)"))?;
        let meta = fs::metadata(&root).map_err(|e| {
            WordhuntError::config(format!("cannot access directory {}: {e}", root.display()))
        })?;
        if !meta.is_dir() {
            return Err(WordhuntError::config(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        fs::read_dir(&root).map_err(|e| {
            WordhuntError::config(format!("cannot read directory {}: {e}", root.display()))
        })?;

        let word = match cli.word.as_deref() {
            Some(w) => SearchWord::new(w)?,
            None => return Err(WordhuntError::config("missing search word (-w)")),
        };

        let show_hidden = cli
            .show_hidden_override()
            .or(file.search.show_hidden)
            .unwrap_or(false);
        let filter = match cli.extensions.as_ref().or(file.search.extensions.as_ref()) {
            Some(exts) if !exts.is_empty() => FileFilter::new(exts, show_hidden),
            _ => FileFilter::new(DEFAULT_EXTENSIONS.iter().copied(), show_hidden),
        };

        Ok(RunConfig {
            buffer_size,
            threads,
            root,
            word,
            filter,
        })
    }
}

fn positive(what: &str, value: Option<usize>) -> Result<usize> {
    match value {
        Some(0) => Err(WordhuntError::config(format!("{what} must be positive"))),
        Some(n) => Ok(n),
        None => Err(WordhuntError::config(format!("missing {what}"))),
    }
}
