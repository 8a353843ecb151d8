//! Oracle, diffuser, Grover iterate and counter on a statevector.

use grovsum_adapter_sim::Statevector;
use grovsum_ir::{QubitId, StandardGate};
use grovsum_search::counter::counter_circuit;
use grovsum_search::diffuser::diffuser_gate;
use grovsum_search::grover::grover_gate;
use grovsum_search::oracle::oracle_circuit;
use grovsum_search::{SubsetSumProblem, calculate_counter_result};

fn q(i: u32) -> QubitId {
    QubitId(i)
}

/// numbers [2, 4], sum 6: only x = 0b11 is marked.
fn single_solution() -> SubsetSumProblem {
    SubsetSumProblem::new(vec![2, 4], 6, 3).unwrap()
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

#[test]
fn oracle_flips_ancilla_only_for_solutions() {
    let problem = single_solution();
    let oracle = oracle_circuit(&problem).unwrap();

    for mask in 0..4usize {
        let mut sv = Statevector::from_basis_state(6, mask);
        sv.apply_circuit(&oracle);

        let marked = usize::from(problem.is_solution(mask as u64));
        let expected = mask | marked << 2;
        assert!(
            (sv.probabilities()[expected] - 1.0).abs() < 1e-9,
            "x = {mask:02b}: target must be restored and y = {marked}"
        );
    }
}

#[test]
fn oracle_is_a_sign_flip_with_minus_ancilla() {
    let problem = single_solution();
    let oracle = oracle_circuit(&problem).unwrap();

    for mask in 0..4usize {
        let mut before = Statevector::from_basis_state(6, mask);
        before.apply_elementary(&StandardGate::X, &[], &[q(2)]);
        before.apply_elementary(&StandardGate::H, &[], &[q(2)]);

        let mut after = before.clone();
        after.apply_circuit(&oracle);

        let sign = if problem.is_solution(mask as u64) { -1.0 } else { 1.0 };
        for (a, b) in after.amplitudes().iter().zip(before.amplitudes()) {
            assert!((a - b * sign).norm() < 1e-9, "x = {mask:02b}");
        }
    }
}

// ---------------------------------------------------------------------------
// Diffuser
// ---------------------------------------------------------------------------

#[test]
fn diffuser_twice_is_identity() {
    let diffuser = diffuser_gate(3).unwrap();
    let operands = [q(0), q(1), q(2)];

    let mut original = Statevector::from_basis_state(3, 5);
    original.apply_elementary(&StandardGate::H, &[], &[q(0)]);
    original.apply_elementary(&StandardGate::H, &[], &[q(2)]);
    original.apply_elementary(&StandardGate::P(0.7), &[], &[q(0)]);
    original.apply_elementary(&StandardGate::CP(1.1), &[], &[q(0), q(2)]);
    original.apply_elementary(&StandardGate::H, &[], &[q(1)]);

    let mut sv = original.clone();
    sv.apply_gate(&diffuser, &operands);
    sv.apply_gate(&diffuser, &operands);

    for (a, b) in sv.amplitudes().iter().zip(original.amplitudes()) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn diffuser_fixes_uniform_superposition() {
    for n in 1..=4u32 {
        let operands: Vec<QubitId> = (0..n).map(QubitId).collect();
        let mut sv = Statevector::new(n as usize);
        for &qubit in &operands {
            sv.apply_elementary(&StandardGate::H, &[], &[qubit]);
        }
        let uniform = sv.clone();
        sv.apply_gate(&diffuser_gate(n).unwrap(), &operands);

        for (a, b) in sv.amplitudes().iter().zip(uniform.amplitudes()) {
            assert!((a - b).norm() < 1e-9, "n = {n}");
        }
    }
}

// ---------------------------------------------------------------------------
// Grover iterate and counter
// ---------------------------------------------------------------------------

#[test]
fn one_iteration_finds_the_single_solution_of_four() {
    let problem = single_solution();
    let grover = grover_gate(&problem).unwrap();

    let mut sv = Statevector::new(6);
    sv.apply_elementary(&StandardGate::H, &[], &[q(0)]);
    sv.apply_elementary(&StandardGate::H, &[], &[q(1)]);
    sv.apply_elementary(&StandardGate::X, &[], &[q(2)]);
    sv.apply_elementary(&StandardGate::H, &[], &[q(2)]);
    sv.apply_gate(&grover, &(0..6).map(QubitId).collect::<Vec<_>>());

    let dist = sv.marginal(&[q(0), q(1)]);
    assert!((dist[0b11] - 1.0).abs() < 1e-9);
}

#[test]
fn counter_resolves_half_marked_space_exactly() {
    // numbers [1, 1], sum 1: x = 01 and x = 10 are marked, so θ = π/4 and
    // a 3-qubit counter reads 2 or 8 − 2.
    let problem = SubsetSumProblem::new(vec![1, 1], 1, 2).unwrap();
    let circuit = counter_circuit(&problem, 3).unwrap();
    assert_eq!(circuit.num_qubits(), 8);

    let mut sv = Statevector::new(8);
    sv.apply_circuit(&circuit);
    let dist = sv.marginal(&[q(0), q(1), q(2)]);
    assert!((dist[2] + dist[6] - 1.0).abs() < 1e-9, "{dist:?}");

    for r in [2, 6] {
        let est = calculate_counter_result(r, 2, 3);
        assert!((est.solutions - 2.0).abs() < 1e-9);
        assert_eq!(est.iterations(), 1);
    }
}

#[test]
fn counter_reads_zero_without_solutions() {
    let problem = SubsetSumProblem::new(vec![2, 4], 5, 3).unwrap();
    let mut sv = Statevector::new(9);
    sv.apply_circuit(&counter_circuit(&problem, 3).unwrap());
    let dist = sv.marginal(&[q(0), q(1), q(2)]);
    assert!((dist[0] - 1.0).abs() < 1e-9);
}
