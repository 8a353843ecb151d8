//! Sum validator and the phase oracle built around it.

use grovsum_ir::{Circuit, Gate};

use crate::adder::sum_gate;
use crate::error::SearchResult;
use crate::layout::SearchLayout;
use crate::problem::{SubsetSumProblem, check_digits};

/// Flip every target qubit whose bit of `expected_sum` is 0, so that
/// "target equals expected_sum" becomes "every target qubit reads 1".
pub fn checker_circuit(expected_sum: u64, digits: u32) -> SearchResult<Circuit> {
    check_digits(digits)?;
    let mut qc = Circuit::new("checker");
    let target = qc.add_qreg("target", digits);
    for (bit, q) in target.iter().enumerate() {
        if expected_sum >> bit & 1 == 0 {
            qc.x(q)?;
        }
    }
    Ok(qc)
}

/// [`checker_circuit`] as a gate labelled `Checker`.
pub fn checker_gate(expected_sum: u64, digits: u32) -> SearchResult<Gate> {
    Ok(checker_circuit(expected_sum, digits)?.to_gate("Checker")?)
}

/// Sum into `target`, then check it. Registers: `x`, `target`.
pub fn validator_circuit(problem: &SubsetSumProblem) -> SearchResult<Circuit> {
    let digits = problem.digits();
    let mut qc = Circuit::new("validator");
    let x = qc.add_qreg("x", problem.len());
    let target = qc.add_qreg("target", digits);

    qc.append(
        sum_gate(problem.numbers(), digits)?,
        x.iter().chain(target.iter()),
    )?;
    qc.append(checker_gate(problem.expected_sum(), digits)?, target.iter())?;

    Ok(qc)
}

/// [`validator_circuit`] as a gate labelled `Validator`.
pub fn validator_gate(problem: &SubsetSumProblem) -> SearchResult<Gate> {
    Ok(validator_circuit(problem)?.to_gate("Validator")?)
}

/// The inverse validator, labelled `Validator Inv`.
pub fn validator_inverse_gate(problem: &SubsetSumProblem) -> SearchResult<Gate> {
    Ok(validator_gate(problem)?
        .inverse()
        .with_label("Validator Inv"))
}

/// `|x⟩|y⟩|target⟩ → |x⟩|y ⊕ f(x)⟩|target⟩` where `f(x)` is 1 exactly
/// when the subset selected by `x` sums to the expected value.
///
/// With `y` prepared in `|−⟩` this is a sign flip on the marked `x`.
/// `target` must start in `|0⟩` and is restored.
pub fn oracle_circuit(problem: &SubsetSumProblem) -> SearchResult<Circuit> {
    let mut layout = SearchLayout::new("oracle", problem.len(), problem.digits());
    let operands = layout.validator_operands();
    let controls = layout.target().clone();
    let y = layout.y();

    let qc = layout.circuit_mut();
    qc.append(validator_gate(problem)?, operands.iter().copied())?;
    qc.mcx(controls.iter(), y)?;
    qc.append(validator_inverse_gate(problem)?, operands)?;

    Ok(layout.into_circuit())
}

/// [`oracle_circuit`] as a gate labelled `Grover Oracle`.
pub fn oracle_gate(problem: &SubsetSumProblem) -> SearchResult<Gate> {
    Ok(oracle_circuit(problem)?.to_gate("Grover Oracle")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovsum_ir::QubitId;

    #[test]
    fn test_checker_flips_zero_bits() {
        // 7 = 0b00111 on 5 digits: bits 3 and 4 are zero.
        let qc = checker_circuit(7, 5).unwrap();
        let flipped: Vec<QubitId> = qc.instructions().iter().map(|i| i.qubits[0]).collect();
        assert_eq!(flipped, vec![QubitId(3), QubitId(4)]);
    }

    #[test]
    fn test_checker_rejects_wide_target() {
        assert!(checker_circuit(0, 64).is_err());
        assert!(checker_circuit(0, 0).is_err());
    }

    #[test]
    fn test_oracle_structure() {
        let problem = SubsetSumProblem::new(vec![2, 4], 6, 3).unwrap();
        let qc = oracle_circuit(&problem).unwrap();
        assert_eq!(qc.num_qubits(), 6);

        let names: Vec<String> = qc.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Validator", "mcx", "Validator Inv"]);
        assert_eq!(
            qc.instructions()[1].qubits,
            vec![QubitId(3), QubitId(4), QubitId(5), QubitId(2)]
        );
    }
}
