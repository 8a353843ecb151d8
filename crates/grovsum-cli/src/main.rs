//! Grovsum Command-Line Interface
//!
//! Finds subsets of a list of numbers that add up to a target with
//! counting-driven Grover search on the local statevector simulator.
//!
//! ```text
//! grovsum search --numbers 5,7,8,9,1 --sum 16
//! grovsum search --demo --format json
//! grovsum count --numbers 2,4 --sum 6 --counter-digits 3
//! grovsum inspect --demo --iterations 2 --dump search.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::common::{OutputFormat, ProblemArgs, RunArgs};
use commands::{count, inspect, search};
use config::Config;

/// Grovsum - subset-sum search with Grover amplification and quantum counting
#[derive(Parser)]
#[command(name = "grovsum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML). Defaults to ~/.grovsum/config.yaml if present
    #[arg(long, global = true, env = "GROVSUM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the number of solutions, then run the amplified search
    Search {
        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run only the counting stage and print the estimate
    Count {
        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Build the counting and search circuits and print their size
    Inspect {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Width of the counting register
        #[arg(long)]
        counter_digits: Option<u32>,

        /// Grover iterations in the search circuit
        #[arg(short, long, default_value = "1")]
        iterations: u32,

        /// Write the search circuit as JSON to this file
        #[arg(long)]
        dump: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8, config_level: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("GROVSUM_LOG").unwrap_or_else(|_| EnvFilter::new(config_level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.logging.level);
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Search {
            problem,
            run,
            format,
        } => search::execute(&problem, &run, format, &config).await,

        Commands::Count {
            problem,
            run,
            format,
        } => count::execute(&problem, &run, format, &config).await,

        Commands::Inspect {
            problem,
            counter_digits,
            iterations,
            dump,
        } => inspect::execute(&problem, counter_digits, iterations, dump.as_deref(), &config),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
