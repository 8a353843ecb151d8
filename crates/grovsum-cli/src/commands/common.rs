//! Shared helpers for CLI commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use grovsum_adapter_sim::SimulatorBackend;
use grovsum_hal::{BackendConfig, BackendFactory};
use grovsum_search::{
    CounterEstimate, IndexHistogram, SearchParams, SubsetSumProblem, default_counter_digits,
};

use crate::config::Config;

/// Demo instance: two subsets of these numbers add up to 16.
pub const DEMO_NUMBERS: [u64; 5] = [5, 7, 8, 9, 1];
/// Target sum of the demo instance.
pub const DEMO_SUM: u64 = 16;
/// Running-total width of the demo instance.
pub const DEMO_DIGITS: u32 = 5;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// The subset-sum instance to solve.
#[derive(Args, Debug, Clone)]
pub struct ProblemArgs {
    /// Candidate numbers, comma separated
    #[arg(short, long, value_delimiter = ',', required_unless_present = "demo")]
    pub numbers: Vec<u64>,

    /// Target sum
    #[arg(short, long, required_unless_present = "demo")]
    pub sum: Option<u64>,

    /// Width of the running total in bits (default: wide enough that it cannot wrap)
    #[arg(short, long)]
    pub digits: Option<u32>,

    /// Use the built-in demo instance (5,7,8,9,1 with sum 16)
    #[arg(long, conflicts_with_all = ["numbers", "sum", "digits"])]
    pub demo: bool,
}

impl ProblemArgs {
    /// Build the validated problem.
    pub fn problem(&self) -> Result<SubsetSumProblem> {
        if self.demo {
            return Ok(SubsetSumProblem::new(
                DEMO_NUMBERS.to_vec(),
                DEMO_SUM,
                DEMO_DIGITS,
            )?);
        }
        let sum = self.sum.context("--sum is required")?;
        let problem = match self.digits {
            Some(digits) => SubsetSumProblem::new(self.numbers.clone(), sum, digits)?,
            None => SubsetSumProblem::with_auto_digits(self.numbers.clone(), sum)?,
        };
        Ok(problem)
    }
}

/// Run parameters and backend overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Width of the counting register (default: ceil(n/2) + 1)
    #[arg(long)]
    pub counter_digits: Option<u32>,

    /// Shots for the amplified search
    #[arg(long)]
    pub shots: Option<u32>,

    /// Shots for the counting stage
    #[arg(long)]
    pub counter_shots: Option<u32>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunArgs {
    /// Resolve run parameters: flags, then configuration, then defaults.
    pub fn params(&self, problem: SubsetSumProblem, config: &Config) -> Result<SearchParams> {
        let digits_counter = self
            .counter_digits
            .or(config.search.digits_counter)
            .unwrap_or_else(|| default_counter_digits(problem.len()));
        let shots = self.shots.unwrap_or(config.search.shots);
        let shots_counter = self.counter_shots.unwrap_or(config.search.shots_counter);
        Ok(SearchParams::new(problem, digits_counter, shots, shots_counter)?)
    }

    /// Build the simulator backend.
    pub fn backend(&self, config: &Config) -> Result<SimulatorBackend> {
        let mut backend_config = BackendConfig::new("simulator").with_extra(
            "max_qubits",
            serde_json::Value::from(config.simulator.max_qubits),
        );
        if let Some(seed) = self.seed.or(config.simulator.seed) {
            backend_config = backend_config.with_seed(seed);
        }
        Ok(SimulatorBackend::from_config(backend_config)?)
    }
}

/// A steady-ticking spinner on stderr.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print the problem header.
pub fn print_problem(problem: &SubsetSumProblem) {
    println!(
        "{} Searching {:?} for subsets summing to {} ({} bits)",
        style("→").cyan().bold(),
        problem.numbers(),
        style(problem.expected_sum()).green(),
        problem.digits()
    );
}

/// Print a counting estimate.
pub fn print_estimate(estimate: &CounterEstimate) {
    println!(
        "  Counter read {}: θ = {:.4}, ~{:.2} solutions, {} iterations (optimal {:.2})",
        style(estimate.measured).yellow(),
        estimate.theta,
        estimate.solutions,
        style(estimate.iterations()).yellow(),
        estimate.optimal_iterations
    );
}

/// Print the subset histogram, marking subsets that hit the target.
pub fn print_histogram(histogram: &IndexHistogram, expected_sum: u64) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        histogram.total_shots()
    );

    let sorted = histogram.sorted();
    let total = histogram.total_shots() as f64;

    for (key, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        let sum = histogram.subset_sum(key);
        let mark = if sum == expected_sum {
            style("✓").green()
        } else {
            style("·").dim()
        };

        println!(
            "  {} {}: {:>6} ({:>5.2}%) {:<24} {}",
            mark,
            style(key).cyan(),
            count,
            prob,
            format!("{:?}", histogram.subset_values(key)),
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
