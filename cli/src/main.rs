use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rr::{Failure, MustExt, check, must};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rr-count", about = "Count lines, stopping at the first failure")]
struct Cli {
    /// Files to count
    files: Vec<PathBuf>,
    /// Print the call path of a failure
    #[arg(short, long)]
    debug: bool,
    /// Fail on any file longer than this many lines
    #[arg(long)]
    max_lines: Option<usize>,
}

#[derive(Debug, Error)]
enum CountError {
    #[error("no input files")]
    NoInput,

    #[error("{path}: {lines} lines exceeds the limit of {max}")]
    TooLong {
        path: String,
        lines: usize,
        max: usize,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!(debug = cli.debug, files = cli.files.len(), "starting");
    rr::recover(|| run(&cli));
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<(), Failure> {
    check(cli.files.is_empty().then_some(CountError::NoInput))?;

    let mut total = 0;
    for path in &cli.files {
        let lines = count_lines(path, cli.max_lines)?;
        println!("{lines} {}", path.display());
        total += lines;
    }
    if cli.files.len() > 1 {
        println!("{total} total");
    }
    Ok(())
}

fn count_lines(path: &Path, max_lines: Option<usize>) -> Result<usize, Failure> {
    let source = fs::read_to_string(path).must()?;
    let lines = source.lines().count();
    must(lines, over_limit(path, lines, max_lines))
}

fn over_limit(path: &Path, lines: usize, max_lines: Option<usize>) -> Option<CountError> {
    let max = max_lines?;
    (lines > max).then(|| CountError::TooLong {
        path: path.display().to_string(),
        lines,
        max,
    })
}
