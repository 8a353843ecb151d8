//! Constant addition in Fourier space, and the controlled running sum
//! built from it.

use grovsum_ir::{Circuit, Gate};

use crate::error::SearchResult;
use crate::fourier::{dyadic_angle, fourier_position, qft_inverse_gate};
use crate::problem::{check_digits, register_width};

/// Add the constant `a` modulo `2^digits` to a register already in
/// Fourier space.
///
/// Only phase rotations are emitted. Bits of `a` above `digits` are
/// ignored, which is the same as adding `a mod 2^digits`. `digits` must
/// be in `1..=MAX_DIGITS`.
pub fn fourier_add_circuit(a: u64, digits: u32) -> SearchResult<Circuit> {
    check_digits(digits)?;
    let mut qc = Circuit::new("fourier_add");
    let f = qc.add_qreg("f", digits);

    for i in (0..digits).rev() {
        for j in (0..=i).rev() {
            if a >> j & 1 == 1 {
                let position = fourier_position(i, digits) as usize;
                qc.p(dyadic_angle(i - j), f[position])?;
            }
        }
    }

    Ok(qc)
}

/// [`fourier_add_circuit`] as a gate labelled `QFT Add`.
pub fn fourier_add_gate(a: u64, digits: u32) -> SearchResult<Gate> {
    Ok(fourier_add_circuit(a, digits)?.to_gate("QFT Add")?)
}

/// The adder with one control qubit in front of the register.
pub fn controlled_fourier_add_gate(a: u64, digits: u32) -> SearchResult<Gate> {
    Ok(fourier_add_gate(a, digits)?.control())
}

/// Compute `target += Σ x_k · numbers[k]` modulo `2^digits`.
///
/// Registers: `x` (one qubit per number), then `target`. The target must
/// start in `|0⟩`: it enters Fourier space through plain Hadamards and
/// leaves through the inverse transform.
pub fn sum_circuit(numbers: &[u64], digits: u32) -> SearchResult<Circuit> {
    check_digits(digits)?;
    let width = register_width(numbers.len())?;
    let mut qc = Circuit::new("sum");
    let x = qc.add_qreg("x", width);
    let target = qc.add_qreg("target", digits);

    for q in target.iter() {
        qc.h(q)?;
    }

    for (k, &number) in numbers.iter().enumerate() {
        let operands = std::iter::once(x[k]).chain(target.iter());
        qc.append(controlled_fourier_add_gate(number, digits)?, operands)?;
    }

    qc.append(qft_inverse_gate(digits)?, target.iter())?;

    Ok(qc)
}

/// [`sum_circuit`] as a gate labelled `Add`.
pub fn sum_gate(numbers: &[u64], digits: u32) -> SearchResult<Gate> {
    Ok(sum_circuit(numbers, digits)?.to_gate("Add")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::MAX_DIGITS;
    use grovsum_ir::{GateKind, QubitId, StandardGate};
    use std::f64::consts::PI;

    #[test]
    fn test_add_circuit_phases() {
        // a = 7 on 5 digits: bits 0..=2 set.
        let qc = fourier_add_circuit(7, 5).unwrap();
        assert!(qc.instructions().iter().all(|inst| inst.name() == "p"));

        // Position 0 carries bit i = 4, which sees j = 0, 1, 2.
        let on_first: Vec<f64> = qc
            .instructions()
            .iter()
            .filter(|inst| inst.qubits == vec![QubitId(0)])
            .filter_map(|inst| match &inst.as_gate()?.kind {
                GateKind::Standard(StandardGate::P(theta)) => Some(*theta),
                _ => None,
            })
            .collect();
        assert_eq!(on_first, vec![PI / 4.0, PI / 8.0, PI / 16.0]);
    }

    #[test]
    fn test_add_zero_is_empty() {
        assert!(fourier_add_circuit(0, 4).unwrap().instructions().is_empty());
        // Only bits below `digits` contribute.
        assert!(fourier_add_circuit(16, 4).unwrap().instructions().is_empty());
    }

    #[test]
    fn test_sum_circuit_shape() {
        let qc = sum_circuit(&[1, 2, 3], 4).unwrap();
        assert_eq!(qc.num_qubits(), 7);
        // 4 Hadamards, 3 controlled adders, 1 inverse transform
        assert_eq!(qc.instructions().len(), 8);
        assert_eq!(qc.instructions()[4].qubits[0], QubitId(0));
        assert_eq!(qc.instructions()[4].as_gate().unwrap().num_qubits(), 5);
    }

    #[test]
    fn test_width_out_of_range() {
        for digits in [0, MAX_DIGITS + 1, 64, 65] {
            assert!(fourier_add_circuit(u64::MAX, digits).is_err());
            assert!(sum_circuit(&[1, 2], digits).is_err());
        }
        assert!(fourier_add_circuit(u64::MAX, MAX_DIGITS).is_ok());
    }
}
