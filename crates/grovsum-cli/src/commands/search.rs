//! Search command implementation.

use anyhow::Result;
use console::style;

use grovsum_hal::Backend;
use grovsum_search::{SearchOutcome, SubsetSearch};

use super::common::{
    OutputFormat, ProblemArgs, RunArgs, print_estimate, print_histogram, print_problem, spinner,
};
use crate::config::Config;

/// Execute the search command.
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
        println!(
            "  Backend: {}, counter {} qubits, {} + {} shots",
            style(search.backend().name()).yellow(),
            params.digits_counter,
            params.shots_counter,
            params.shots
        );
    }

    let progress = spinner("Counting solutions and searching...")?;
    let outcome = search.find_indices(&params).await;
    progress.finish_and_clear();
    let outcome = outcome?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Table => match &outcome {
            SearchOutcome::NoSolution => {
                println!(
                    "\n{} No subset sums to {}",
                    style("✗").red().bold(),
                    params.problem.expected_sum()
                );
            }
            SearchOutcome::Found(report) => {
                print_estimate(&report.estimate);
                print_histogram(&report.histogram, params.problem.expected_sum());
            }
        },
    }

    Ok(())
}
