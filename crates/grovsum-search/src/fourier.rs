//! Quantum Fourier transform.
//!
//! The transform processes the most significant qubit first and reverses
//! qubit order with swaps at the end. Under that layout the classical
//! value's bit `b` is carried by Fourier position [`fourier_position`]`(b, n)`.

use std::f64::consts::PI;

use grovsum_ir::{Circuit, Gate, IrResult, QubitId};

/// Fourier-space position holding classical bit `bit` of a `width`-qubit
/// register.
///
/// # Panics
///
/// Panics if `bit >= width`.
#[inline]
pub fn fourier_position(bit: u32, width: u32) -> u32 {
    assert!(bit < width, "bit {bit} out of range for width {width}");
    width - 1 - bit
}

/// Rotation angle `π / 2^k`.
#[inline]
pub(crate) fn dyadic_angle(k: u32) -> f64 {
    PI / 2f64.powi(k as i32)
}

/// Build the `n`-qubit transform circuit.
pub fn qft_circuit(n: u32) -> IrResult<Circuit> {
    let mut qc = Circuit::with_size("qft", n, 0);

    for i in (0..n).rev() {
        qc.h(QubitId(i))?;
        for j in (0..i).rev() {
            qc.cp(dyadic_angle(i - j), QubitId(i), QubitId(j))?;
        }
    }

    for k in 0..n / 2 {
        qc.swap(QubitId(k), QubitId(n - k - 1))?;
    }

    Ok(qc)
}

/// The transform as an opaque gate labelled `QFT`.
pub fn qft_gate(n: u32) -> IrResult<Gate> {
    qft_circuit(n)?.to_gate("QFT")
}

/// The inverse transform, labelled `QFT Inv`.
pub fn qft_inverse_gate(n: u32) -> IrResult<Gate> {
    Ok(qft_gate(n)?.inverse().with_label("QFT Inv"))
}
