//! Count command implementation.
//!
//! Runs only the counting stage.

use anyhow::Result;
use console::style;

use grovsum_search::SubsetSearch;

use super::common::{OutputFormat, ProblemArgs, RunArgs, print_estimate, print_problem, spinner};
use crate::config::Config;

/// Execute the count command.
pub async fn execute(
    problem_args: &ProblemArgs,
    run_args: &RunArgs,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let problem = problem_args.problem()?;
    let params = run_args.params(problem, config)?;
    let search = SubsetSearch::new(run_args.backend(config)?);

    if format == OutputFormat::Table {
        print_problem(&params.problem);
    }

    let progress = spinner(format!(
        "Counting with {} qubits, {} shots...",
        params.digits_counter, params.shots_counter
    ))?;
    let estimate = search.count_optimal_iterations(&params).await;
    progress.finish_and_clear();
    let estimate = estimate?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimate)?),
        OutputFormat::Table => match &estimate {
            Some(estimate) => print_estimate(estimate),
            None => println!(
                "  {} Counter is dominated by zero: no solution",
                style("✗").red().bold()
            ),
        },
    }

    Ok(())
}
