//! The Grover iterate: oracle, then diffuser.

use grovsum_ir::{Circuit, Gate};

use crate::diffuser::diffuser_gate;
use crate::error::SearchResult;
use crate::layout::SearchLayout;
use crate::oracle::oracle_gate;
use crate::problem::SubsetSumProblem;

/// One Grover iteration over `(x, y, target)`.
pub fn grover_circuit(problem: &SubsetSumProblem) -> SearchResult<Circuit> {
    let mut layout = SearchLayout::new("grover", problem.len(), problem.digits());
    let operands = layout.grover_operands();
    let x = layout.x().clone();

    let qc = layout.circuit_mut();
    qc.append(oracle_gate(problem)?, operands)?;
    qc.append(diffuser_gate(problem.len())?, x.iter())?;

    Ok(layout.into_circuit())
}

/// [`grover_circuit`] as a gate labelled `Grover`.
pub fn grover_gate(problem: &SubsetSumProblem) -> SearchResult<Gate> {
    Ok(grover_circuit(problem)?.to_gate("Grover")?)
}

/// The Grover gate with one control qubit in front of `(x, y, target)`.
pub fn controlled_grover_gate(problem: &SubsetSumProblem) -> SearchResult<Gate> {
    Ok(grover_gate(problem)?.control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grover_operands() {
        let problem = SubsetSumProblem::new(vec![2, 4], 6, 3).unwrap();
        let qc = grover_circuit(&problem).unwrap();
        assert_eq!(qc.instructions().len(), 2);
        assert_eq!(qc.instructions()[0].qubits.len(), 6);
        assert_eq!(qc.instructions()[1].qubits.len(), 2);

        let controlled = controlled_grover_gate(&problem).unwrap();
        assert_eq!(controlled.num_qubits(), 7);
        assert_eq!(controlled.name(), "Grover");
    }
}
