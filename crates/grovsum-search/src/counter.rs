//! Quantum counting: phase estimation of the Grover iterate.
//!
//! Counting qubit `t_i` controls `2^i` applications of the Grover gate, so
//! a counter of width `m` costs `2^m − 1` controlled iterations. The
//! measured value `r` estimates `θ/π · 2^m` where `sin²θ` is the marked
//! fraction of the search space.

use std::f64::consts::PI;

use grovsum_hal::{BitOrder, Counts};
use grovsum_ir::{Circuit, Gate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SearchError, SearchResult};
use crate::fourier::qft_inverse_gate;
use crate::grover::controlled_grover_gate;
use crate::layout::SearchLayout;
use crate::problem::{SubsetSumProblem, check_counter_digits};

/// Phase-estimation circuit on `(t, x, y, target)`, unmeasured.
///
/// `digits_counter` must be in `1..=MAX_COUNTER_DIGITS`.
pub fn counter_circuit(problem: &SubsetSumProblem, digits_counter: u32) -> SearchResult<Circuit> {
    check_counter_digits(digits_counter)?;
    let mut layout =
        SearchLayout::with_counter("counter", digits_counter, problem.len(), problem.digits());
    let Some(t) = layout.counter().cloned() else {
        unreachable!("layout allocated with a counting register")
    };
    let x = layout.x().clone();
    let y = layout.y();
    let grover_operands = layout.grover_operands();

    let grover = controlled_grover_gate(problem)?;
    let qc = layout.circuit_mut();

    for q in x.iter() {
        qc.h(q)?;
    }
    for q in t.iter() {
        qc.h(q)?;
    }
    qc.x(y)?.h(y)?;

    for (i, control) in (0u32..).zip(t.iter()) {
        let repetitions = 1u32.checked_shl(i).ok_or_else(|| {
            SearchError::InvalidParameters(format!("counting qubit {i} overflows the repeat count"))
        })?;
        let operands = std::iter::once(control).chain(grover_operands.iter().copied());
        qc.append(grover.repeat(repetitions), operands)?;
    }

    qc.append(qft_inverse_gate(digits_counter)?, t.iter())?;

    Ok(layout.into_circuit())
}

/// [`counter_circuit`] as a gate labelled `Counter`.
pub fn counter_gate(problem: &SubsetSumProblem, digits_counter: u32) -> SearchResult<Gate> {
    Ok(counter_circuit(problem, digits_counter)?.to_gate("Counter")?)
}

/// The counter with its `t` register measured into `creg_t`.
///
/// Outcome keys cover only the counting bits.
pub fn counting_circuit(problem: &SubsetSumProblem, digits_counter: u32) -> SearchResult<Circuit> {
    check_counter_digits(digits_counter)?;
    let mut layout =
        SearchLayout::with_counter("counting", digits_counter, problem.len(), problem.digits());
    let Some(t) = layout.counter().cloned() else {
        unreachable!("layout allocated with a counting register")
    };
    let creg_t = layout.add_creg_for("creg_t", &t);
    let operands: Vec<_> = t.iter().chain(layout.grover_operands()).collect();

    let qc = layout.circuit_mut();
    qc.append(counter_gate(problem, digits_counter)?, operands)?;
    qc.measure_register(&t, &creg_t)?;

    Ok(layout.into_circuit())
}

/// What a counting run says about the search space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterEstimate {
    /// The counting-register value the estimate was derived from.
    pub measured: u64,
    /// Grover angle in `[0, π/2]`.
    pub theta: f64,
    /// Estimated number of marked subsets.
    pub solutions: f64,
    /// Unrounded optimal iteration count, `π/(4θ) − 1/2`.
    pub optimal_iterations: f64,
}

impl CounterEstimate {
    /// Iterations to run: `optimal_iterations` rounded half away from
    /// zero, with negative and non-finite values mapped to 0.
    pub fn iterations(&self) -> u32 {
        let rounded = self.optimal_iterations.round();
        if rounded.is_finite() && rounded > 0.0 {
            rounded.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

/// Turn a measured counter value `r` into an estimate.
///
/// `θ = π·r/2^m` and `solutions = 2^len · sin²θ`. The counter cannot tell
/// θ from π − θ, so angles above π/2 are folded back before computing the
/// iteration count.
pub fn calculate_counter_result(r: u64, len_numbers: u32, digits_counter: u32) -> CounterEstimate {
    let mut theta = PI * r as f64 / 2f64.powi(digits_counter as i32);
    let solutions = 2f64.powi(len_numbers as i32) * theta.sin().powi(2);

    if theta > PI / 2.0 {
        theta = PI - theta;
    }
    let optimal_iterations = PI / (4.0 * theta) - 0.5;

    CounterEstimate {
        measured: r,
        theta,
        solutions,
        optimal_iterations,
    }
}

/// Interpret the histogram of a counting run.
///
/// Returns `None` (no solution) when the all-zero outcome holds more than
/// half of `shots_counter`. Otherwise the zero outcome is discarded and
/// the most frequent remaining value is used; ties go to the smallest
/// value. Keys follow [`BitOrder::BACKEND`] and must be `digits_counter`
/// bits wide.
pub fn interpret_counter_counts(
    counts: &Counts,
    digits_counter: u32,
    len_numbers: u32,
    shots_counter: u32,
) -> Option<CounterEstimate> {
    let zero_key = "0".repeat(digits_counter as usize);
    let zeros = counts.get(&zero_key);
    if 2 * zeros > u64::from(shots_counter) {
        debug!(zeros, shots_counter, "counter dominated by the zero outcome");
        return None;
    }

    let mut best: Option<(u64, u64)> = None;
    for (key, count) in counts.iter() {
        if key.len() != digits_counter as usize {
            warn!(key, digits_counter, "ignoring counter outcome of unexpected width");
            continue;
        }
        let Some(value) = BitOrder::BACKEND.value(key) else {
            warn!(key, "ignoring malformed counter outcome");
            continue;
        };
        if value == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_value, best_count)) => {
                count > best_count || (count == best_count && value < best_value)
            }
        };
        if better {
            best = Some((value, count));
        }
    }

    let (r, _) = best?;
    Some(calculate_counter_result(r, len_numbers, digits_counter))
}
