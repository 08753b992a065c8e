//! Command-line interface.

use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Capacity of the work queue between the walker and the workers
    #[clap(short = 'b', long, value_parser)]
    pub buffer_size: Option<usize>,

    /// Number of worker threads
    #[clap(short = 't', long, value_parser)]
    pub threads: Option<usize>,

    /// Directory to search
    #[clap(short = 'd', long = "dir", value_parser)]
    pub root: Option<PathBuf>,

    /// Word to count, matched case-insensitively
    #[clap(short = 'w', long, value_parser)]
    pub word: Option<String>,

    /// File extensions to scan (defaults to txt,c,h)
    #[clap(long, value_parser, use_value_delimiter = true)]
    pub extensions: Option<Vec<String>>,

    /// Also walk and scan entries whose names start with a dot
    #[clap(long, value_parser, default_value_t = false, overrides_with = "no_show_hidden")]
    pub show_hidden: bool,

    /// Skip dot-entries even if the config file enables them
    #[clap(long, value_parser, default_value_t = false, overrides_with = "show_hidden")]
    pub no_show_hidden: bool,

    /// Output format for per-file reports and the total
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print run metrics to stderr when done
    #[clap(long, value_parser, default_value_t = false)]
    pub metrics: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    /// Read defaults from this TOML file instead of the usual locations
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Hidden-entry setting given on the command line, if any.
    pub fn show_hidden_override(&self) -> Option<bool> {
        if self.show_hidden {
            Some(true)
        } else if self.no_show_hidden {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["wordhunt", "-b", "4", "-t", "2", "-d", "src", "-w", "Foo"]);
        assert_eq!(cli.buffer_size, Some(4));
        assert_eq!(cli.threads, Some(2));
        assert_eq!(cli.root, Some(PathBuf::from("src")));
        assert_eq!(cli.word.as_deref(), Some("Foo"));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_last_hidden_flag_wins() {
        let cli = Cli::parse_from(["wordhunt", "--show-hidden", "--no-show-hidden"]);
        assert_eq!(cli.show_hidden_override(), Some(false));

        let cli = Cli::parse_from(["wordhunt", "--no-show-hidden", "--show-hidden"]);
        assert_eq!(cli.show_hidden_override(), Some(true));

        let cli = Cli::parse_from(["wordhunt"]);
        assert_eq!(cli.show_hidden_override(), None);
    }

    #[test]
    fn test_extension_list() {
        let cli = Cli::parse_from(["wordhunt", "--extensions", "md,rs"]);
        assert_eq!(cli.extensions, Some(vec!["md".to_string(), "rs".to_string()]));
    }
}
