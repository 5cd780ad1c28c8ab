use std::process;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use fnsort::common::io::{read_records, write_records};
use fnsort::common::reset_sigpipe;
use fnsort::psrs::{PsrsConfig, psrs_sort};

#[derive(Parser)]
#[command(
    name = "fnsort",
    about = "Sort name records in parallel by regular sampling"
)]
struct Cli {
    /// Number of sort workers (default: available CPU parallelism)
    #[arg(short = 'w', long = "workers", value_name = "N")]
    workers: Option<usize>,

    /// Write result to FILE instead of standard output
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// Report record count and wall-clock sort time on standard error
    #[arg(long = "time")]
    time: bool,

    /// Files to sort ("-" for standard input)
    files: Vec<String>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let inputs = if cli.files.is_empty() {
        vec!["-".to_string()]
    } else {
        cli.files
    };

    let workers = match cli.workers {
        Some(n) => n.max(1),
        None => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    };

    let mut records = read_records(&inputs)?;

    let config = PsrsConfig {
        workers,
        sentinel: None,
    };
    let start = Instant::now();
    psrs_sort(&mut records, &config);
    if cli.time {
        eprintln!(
            "fnsort: sorted {} records with {} workers in {:?}",
            records.len(),
            workers,
            start.elapsed()
        );
    }

    write_records(&records, cli.output.as_deref()).context("writing sorted output")?;
    Ok(())
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("fnsort: {:#}", e);
        process::exit(2);
    }
}
