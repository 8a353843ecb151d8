//! Inspect command implementation.
//!
//! Builds the counting and search circuits without running them.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use grovsum_ir::Circuit;
use grovsum_search::{SearchParams, counting_circuit, default_counter_digits, search_circuit};

use super::common::{ProblemArgs, print_problem};
use crate::config::Config;

/// Execute the inspect command.
pub fn execute(
    problem_args: &ProblemArgs,
    counter_digits: Option<u32>,
    iterations: u32,
    dump: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let problem = problem_args.problem()?;
    let digits_counter = counter_digits
        .or(config.search.digits_counter)
        .unwrap_or_else(|| default_counter_digits(problem.len()));
    let params = SearchParams::new(
        problem,
        digits_counter,
        config.search.shots,
        config.search.shots_counter,
    )?;

    print_problem(&params.problem);

    let counting = counting_circuit(&params.problem, params.digits_counter)?;
    print_circuit(&counting);

    let search = search_circuit(&params.problem, iterations)?;
    print_circuit(&search);

    if let Some(path) = dump {
        std::fs::write(path, search.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "\n{} Wrote {} to {}",
            style("✓").green().bold(),
            search.name(),
            style(path.display()).cyan()
        );
    }

    Ok(())
}

fn print_circuit(circuit: &Circuit) {
    println!(
        "\n  {}: {} qubits, {} clbits, depth {}",
        style(circuit.name()).bold(),
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.depth()
    );

    let mut gates: Vec<(String, usize)> = circuit.count_elementary().into_iter().collect();
    gates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let total: usize = gates.iter().map(|(_, n)| n).sum();

    for (name, n) in &gates {
        println!("    {:<10} {:>8}", name, n);
    }
    println!("    {:<10} {:>8}", style("total").dim(), total);
}
