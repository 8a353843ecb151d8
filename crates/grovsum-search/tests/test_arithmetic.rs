//! Fourier transform and Fourier-space adder behaviour on a statevector.

use std::f64::consts::PI;

use grovsum_adapter_sim::Statevector;
use grovsum_ir::{Circuit, QubitId};
use grovsum_search::adder::{fourier_add_gate, sum_circuit};
use grovsum_search::fourier::{qft_circuit, qft_gate, qft_inverse_gate};
use num_complex::Complex64;
use proptest::prelude::*;

fn qubits(n: u32) -> Vec<QubitId> {
    (0..n).map(QubitId).collect()
}

// ---------------------------------------------------------------------------
// Fourier transform
// ---------------------------------------------------------------------------

#[test]
fn qft_matches_textbook_amplitudes() {
    // QFT|v⟩ = Σ_y e^{2πi·v·y/N} |y⟩ / √N
    let n = 3;
    let v = 5usize;
    let size = 1usize << n;

    let mut sv = Statevector::from_basis_state(n as usize, v);
    sv.apply_circuit(&qft_circuit(n).unwrap());

    let norm = 1.0 / (size as f64).sqrt();
    for (y, amp) in sv.amplitudes().iter().enumerate() {
        let expected = Complex64::from_polar(norm, 2.0 * PI * (v * y) as f64 / size as f64);
        assert!((amp - expected).norm() < 1e-10, "y = {y}: {amp} != {expected}");
    }
}

proptest! {
    #[test]
    fn qft_round_trip_is_identity(n in 1u32..=6, seed in any::<u64>()) {
        let v = (seed % (1u64 << n)) as usize;
        let mut circuit = Circuit::with_size("round_trip", n, 0);
        circuit.append(qft_gate(n).unwrap(), qubits(n)).unwrap();
        circuit.append(qft_inverse_gate(n).unwrap(), qubits(n)).unwrap();

        let original = Statevector::from_basis_state(n as usize, v);
        let mut sv = original.clone();
        sv.apply_circuit(&circuit);

        prop_assert!((sv.fidelity(&original) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fourier_adder_adds_modulo(
        (digits, v, a) in (1u32..=5).prop_flat_map(|d| (Just(d), 0..1u64 << d, 0..1u64 << d))
    ) {
        let mut circuit = Circuit::with_size("add", digits, 0);
        circuit.append(qft_gate(digits).unwrap(), qubits(digits)).unwrap();
        circuit.append(fourier_add_gate(a, digits).unwrap(), qubits(digits)).unwrap();
        circuit.append(qft_inverse_gate(digits).unwrap(), qubits(digits)).unwrap();

        let mut sv = Statevector::from_basis_state(digits as usize, v as usize);
        sv.apply_circuit(&circuit);

        let expected = ((v + a) % (1u64 << digits)) as usize;
        prop_assert!((sv.probabilities()[expected] - 1.0).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Controlled running sum
// ---------------------------------------------------------------------------

#[test]
fn sum_circuit_adds_selected_numbers() {
    let numbers = [1u64, 2, 3];
    let digits = 3;
    let circuit = sum_circuit(&numbers, digits).unwrap();
    let target = [QubitId(3), QubitId(4), QubitId(5)];

    for mask in 0..8usize {
        let mut sv = Statevector::from_basis_state(6, mask);
        sv.apply_circuit(&circuit);

        let expected: u64 = numbers
            .iter()
            .enumerate()
            .filter(|(i, _)| mask >> i & 1 == 1)
            .map(|(_, n)| n)
            .sum::<u64>()
            % 8;
        let index = mask | (expected as usize) << 3;
        assert!(
            (sv.probabilities()[index] - 1.0).abs() < 1e-9,
            "mask {mask:03b} should sum to {expected}"
        );
        assert!((sv.marginal(&target)[expected as usize] - 1.0).abs() < 1e-9);
    }
}

#[test]
fn sum_wraps_when_width_is_too_small() {
    // 3 + 2 = 5 ≡ 1 (mod 4)
    let circuit = sum_circuit(&[3, 2], 2).unwrap();
    let mut sv = Statevector::from_basis_state(4, 0b11);
    sv.apply_circuit(&circuit);
    assert!((sv.marginal(&[QubitId(2), QubitId(3)])[1] - 1.0).abs() < 1e-9);
}
