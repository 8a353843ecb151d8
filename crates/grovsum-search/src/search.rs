//! The counting-driven search orchestrator.

use grovsum_hal::{Backend, BitOrder, Counts};
use grovsum_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::counter::{CounterEstimate, counting_circuit, interpret_counter_counts};
use crate::error::SearchResult;
use crate::grover::grover_gate;
use crate::layout::SearchLayout;
use crate::problem::{SearchParams, SubsetSumProblem};

/// The measured search circuit: uniform `x`, `y` in `|−⟩`, `iterations`
/// Grover applications, then `x` measured into `creg_x`.
pub fn search_circuit(problem: &SubsetSumProblem, iterations: u32) -> SearchResult<Circuit> {
    let mut layout = SearchLayout::new("search", problem.len(), problem.digits());
    let x = layout.x().clone();
    let y = layout.y();
    let operands = layout.grover_operands();
    let creg_x = layout.add_creg_for("creg_x", &x);

    let qc = layout.circuit_mut();
    for q in x.iter() {
        qc.h(q)?;
    }
    qc.x(y)?.h(y)?;

    if iterations > 0 {
        qc.append(grover_gate(problem)?.repeat(iterations), operands)?;
    }

    qc.measure_register(&x, &creg_x)?;

    Ok(layout.into_circuit())
}

/// Search histogram keyed by index bit-strings: character `i` is `1` when
/// `numbers[i]` is in the subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHistogram {
    counts: Counts,
    numbers: Vec<u64>,
}

impl IndexHistogram {
    /// Remap a backend histogram over `creg_x`.
    pub fn from_backend(counts: &Counts, numbers: &[u64]) -> Self {
        Self {
            counts: counts.map_keys(|key| BitOrder::BACKEND.convert(key, BitOrder::LsbLeft)),
            numbers: numbers.to_vec(),
        }
    }

    /// The remapped counts.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Total observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.total_shots()
    }

    /// Outcomes sorted by count descending, then key ascending.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        self.counts.sorted()
    }

    /// Indices selected by `key`.
    pub fn subset_of(key: &str) -> Vec<usize> {
        key.char_indices()
            .filter(|&(_, c)| c == '1')
            .map(|(i, _)| i)
            .collect()
    }

    /// The numbers selected by `key`.
    pub fn subset_values(&self, key: &str) -> Vec<u64> {
        Self::subset_of(key)
            .into_iter()
            .filter_map(|i| self.numbers.get(i).copied())
            .collect()
    }

    /// Sum of the numbers selected by `key`, wrapping on overflow like
    /// [`SubsetSumProblem::subset_sum`].
    pub fn subset_sum(&self, key: &str) -> u64 {
        self.subset_values(key)
            .into_iter()
            .fold(0u64, |acc, n| acc.wrapping_add(n))
    }

    /// Outcomes holding at least `min_fraction` of all shots, most
    /// frequent first.
    pub fn dominant(&self, min_fraction: f64) -> Vec<(&str, u64)> {
        let threshold = min_fraction * self.total_shots() as f64;
        self.sorted()
            .into_iter()
            .filter(|&(_, count)| count as f64 >= threshold)
            .collect()
    }
}

/// A successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// The counting-stage estimate that chose the iteration count.
    pub estimate: CounterEstimate,
    /// Grover iterations applied.
    pub iterations: u32,
    /// Distribution over candidate subsets.
    pub histogram: IndexHistogram,
}

/// Result of [`SubsetSearch::find_indices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The counter found negligible marked amplitude. Terminal: rerunning
    /// with the same parameters is not expected to help.
    NoSolution,
    /// The amplified search ran.
    Found(SearchReport),
}

impl SearchOutcome {
    /// The report, if a search ran.
    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SearchOutcome::NoSolution => None,
            SearchOutcome::Found(report) => Some(report),
        }
    }
}

/// Runs counting and search against a backend.
pub struct SubsetSearch<B> {
    backend: B,
}

impl<B: Backend> SubsetSearch<B> {
    /// Create a search bound to `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Run the counting stage. `None` means no solution.
    #[instrument(skip_all, fields(digits_counter = params.digits_counter))]
    pub async fn count_optimal_iterations(
        &self,
        params: &SearchParams,
    ) -> SearchResult<Option<CounterEstimate>> {
        params.validate()?;
        let problem = &params.problem;

        let circuit = counting_circuit(problem, params.digits_counter)?;
        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.count_elementary().values().sum::<usize>(),
            "built counting circuit"
        );

        let counts = self.backend.execute(&circuit, params.shots_counter).await?;
        let estimate = interpret_counter_counts(
            &counts,
            params.digits_counter,
            problem.len(),
            params.shots_counter,
        );

        match &estimate {
            Some(est) => info!(
                measured = est.measured,
                solutions = est.solutions,
                optimal_iterations = est.optimal_iterations,
                "counter estimate"
            ),
            None => info!("counter reports no solution"),
        }
        Ok(estimate)
    }

    /// Count, then run the amplified search and remap its histogram.
    #[instrument(skip_all, fields(numbers = params.problem.len(), expected_sum = params.problem.expected_sum()))]
    pub async fn find_indices(&self, params: &SearchParams) -> SearchResult<SearchOutcome> {
        let Some(estimate) = self.count_optimal_iterations(params).await? else {
            return Ok(SearchOutcome::NoSolution);
        };
        let iterations = estimate.iterations();

        let circuit = search_circuit(&params.problem, iterations)?;
        debug!(qubits = circuit.num_qubits(), iterations, "built search circuit");

        let counts = self.backend.execute(&circuit, params.shots).await?;
        let histogram = IndexHistogram::from_backend(&counts, params.problem.numbers());

        if let Some((key, count)) = histogram.sorted().first() {
            info!(key, count, "most frequent subset");
        }

        Ok(SearchOutcome::Found(SearchReport {
            estimate,
            iterations,
            histogram,
        }))
    }
}

/// One-shot search with explicit widths and shot counts.
pub async fn find_indices<B: Backend>(
    backend: B,
    numbers: &[u64],
    expected_sum: u64,
    digits: u32,
    digits_counter: u32,
    shots: u32,
    shots_counter: u32,
) -> SearchResult<SearchOutcome> {
    let problem = SubsetSumProblem::new(numbers.to_vec(), expected_sum, digits)?;
    let params = SearchParams::new(problem, digits_counter, shots, shots_counter)?;
    SubsetSearch::new(backend).find_indices(&params).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_circuit_layout() {
        let problem = SubsetSumProblem::new(vec![2, 4], 6, 3).unwrap();
        let qc = search_circuit(&problem, 3).unwrap();
        assert_eq!(qc.num_qubits(), 6);
        assert_eq!(qc.num_clbits(), 2);
        assert!(qc.instructions().iter().any(|i| i.name() == "Grover^3"));

        let bare = search_circuit(&problem, 0).unwrap();
        assert!(!bare.instructions().iter().any(|i| i.name().starts_with("Grover")));
    }

    #[test]
    fn test_index_histogram_reverses_keys() {
        // Backend key "01": clbit 0 (x_0) is 1.
        let counts: Counts = [("01", 7u64), ("10", 3)].into_iter().collect();
        let hist = IndexHistogram::from_backend(&counts, &[5, 9]);
        assert_eq!(hist.counts().get("10"), 7);
        assert_eq!(hist.subset_values("10"), vec![5]);
        assert_eq!(hist.subset_sum("11"), 14);
        assert_eq!(IndexHistogram::subset_of("0110"), vec![1, 2]);
    }

    #[test]
    fn test_subset_sum_wraps() {
        let counts: Counts = [("11", 1u64)].into_iter().collect();
        let hist = IndexHistogram::from_backend(&counts, &[u64::MAX, 2]);
        assert_eq!(hist.subset_sum("11"), 1);
        assert_eq!(hist.subset_sum("10"), u64::MAX);
    }

    #[test]
    fn test_dominant() {
        let counts: Counts = [("001", 60u64), ("100", 30), ("111", 10)]
            .into_iter()
            .collect();
        let hist = IndexHistogram::from_backend(&counts, &[1, 2, 3]);
        assert_eq!(hist.dominant(0.25), vec![("100", 60), ("001", 30)]);
        assert_eq!(hist.dominant(0.0).len(), 3);
    }
}
