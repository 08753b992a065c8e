use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use wordhunt::{Cli, Config, ConsoleSink, Pipeline, Result, RunConfig, WordhuntError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    setup_logging(cli)?;
    let start_time = Instant::now();

    // Everything is validated before a single thread exists.
    let file_config = Config::load(cli.config.as_deref())?;
    let config = RunConfig::resolve(cli, &file_config)?;

    let pipeline = Pipeline::new(config)?;
    let sink = ConsoleSink::new(cli.format);
    pipeline.run(&sink)?;

    if cli.metrics {
        let _ = write!(io::stderr().lock(), "{}", pipeline.metrics().gather()?);
    }

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| WordhuntError::Other(e.to_string()))?;
    Ok(())
}
