//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use grovsum_ir::{Circuit, Gate, QubitId, StandardGate};

/// A dense statevector. Qubit `q` is bit `q` of the basis index.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        Self::from_basis_state(num_qubits, 0)
    }

    /// Create the computational basis state `|index⟩`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 2^num_qubits`.
    pub fn from_basis_state(num_qubits: usize, index: usize) -> Self {
        let size = 1 << num_qubits;
        assert!(index < size, "basis index {index} out of range for {num_qubits} qubits");
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Born-rule probabilities of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Marginal distribution over `qubits`: entry `v` is the probability
    /// that qubit `qubits[k]` reads bit `k` of `v` for every `k`.
    pub fn marginal(&self, qubits: &[QubitId]) -> Vec<f64> {
        let mut dist = vec![0.0; 1 << qubits.len()];
        for (index, amp) in self.amplitudes.iter().enumerate() {
            let value = qubits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (k, q)| acc | ((index >> q.index()) & 1) << k);
            dist[value] += amp.norm_sqr();
        }
        dist
    }

    /// `|⟨self|other⟩|²`.
    pub fn fidelity(&self, other: &Statevector) -> f64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum::<Complex64>()
            .norm_sqr()
    }

    /// Apply every gate of `circuit`. Measurements are ignored.
    pub fn apply_circuit(&mut self, circuit: &Circuit) {
        circuit.for_each_elementary(
            &mut |gate: &StandardGate, controls: &[QubitId], targets: &[QubitId]| {
                self.apply_elementary(gate, controls, targets);
            },
        );
    }

    /// Apply `gate` with its operands bound to `qubits`.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[QubitId]) {
        gate.for_each_elementary(
            qubits,
            &mut |g: &StandardGate, controls: &[QubitId], targets: &[QubitId]| {
                self.apply_elementary(g, controls, targets);
            },
        );
    }

    /// Apply an elementary gate that only acts where every qubit in
    /// `controls` is 1.
    pub fn apply_elementary(&mut self, gate: &StandardGate, controls: &[QubitId], qubits: &[QubitId]) {
        let ctrl = controls.iter().fold(0usize, |m, q| m | 1 << q.index());
        let bit = |k: usize| 1usize << qubits[k].index();
        match gate {
            StandardGate::H => self.apply_h(ctrl, bit(0)),
            StandardGate::X => self.apply_x(ctrl, bit(0)),
            StandardGate::Z => self.apply_phase(ctrl | bit(0), PI),
            StandardGate::P(theta) => self.apply_phase(ctrl | bit(0), *theta),
            StandardGate::CP(theta) => self.apply_phase(ctrl | bit(0) | bit(1), *theta),
            StandardGate::Swap => self.apply_swap(ctrl, bit(0), bit(1)),
            StandardGate::Mcx { num_controls } => {
                let n = *num_controls as usize;
                let mask = (0..n).fold(ctrl, |m, k| m | bit(k));
                self.apply_x(mask, bit(n));
            }
        }
    }

    // =========================================================================
    // Gate kernels. `ctrl` is the mask of qubits that must all be 1.
    // =========================================================================

    fn apply_x(&mut self, ctrl: usize, target: usize) {
        for i in 0..self.amplitudes.len() {
            if i & ctrl == ctrl && i & target == 0 {
                self.amplitudes.swap(i, i | target);
            }
        }
    }

    fn apply_h(&mut self, ctrl: usize, target: usize) {
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & ctrl == ctrl && i & target == 0 {
                let j = i | target;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    /// Multiply by `e^{iθ}` wherever every bit in `mask` is 1.
    fn apply_phase(&mut self, mask: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, ctrl: usize, a: usize, b: usize) {
        for i in 0..self.amplitudes.len() {
            if i & ctrl == ctrl && i & a != 0 && i & b == 0 {
                self.amplitudes.swap(i, i ^ a ^ b);
            }
        }
    }

    /// Sample a measurement outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the total just under 1.
        self.amplitudes.len() - 1
    }

    /// Sample `shots` independent outcomes.
    pub fn sample_many<R: Rng + ?Sized>(&self, shots: usize, rng: &mut R) -> Vec<usize> {
        let mut cdf = Vec::with_capacity(self.amplitudes.len());
        let mut cumulative = 0.0;
        for amp in &self.amplitudes {
            cumulative += amp.norm_sqr();
            cdf.push(cumulative);
        }
        let last = self.amplitudes.len() - 1;
        (0..shots)
            .map(|_| {
                let r: f64 = rng.r#gen::<f64>() * cumulative;
                cdf.partition_point(|&c| c <= r).min(last)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_elementary(&StandardGate::H, &[], &[q(0)]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state_via_mcx() {
        let mut sv = Statevector::new(2);
        sv.apply_elementary(&StandardGate::H, &[], &[q(0)]);
        sv.apply_elementary(&StandardGate::Mcx { num_controls: 1 }, &[], &[q(0), q(1)]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_mcx_without_controls_is_x() {
        let mut sv = Statevector::new(1);
        sv.apply_elementary(&StandardGate::Mcx { num_controls: 0 }, &[], &[q(0)]);
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_extra_controls_gate_the_effect() {
        // Control qubit 1 is |0⟩, so nothing happens.
        let mut sv = Statevector::new(2);
        sv.apply_elementary(&StandardGate::X, &[q(1)], &[q(0)]);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));

        let mut sv = Statevector::from_basis_state(2, 0b10);
        sv.apply_elementary(&StandardGate::X, &[q(1)], &[q(0)]);
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_controlled_phase() {
        let mut sv = Statevector::from_basis_state(2, 0b11);
        sv.apply_elementary(&StandardGate::CP(PI / 2.0), &[], &[q(0), q(1)]);
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(0.0, 1.0)));

        let mut sv = Statevector::from_basis_state(2, 0b01);
        sv.apply_elementary(&StandardGate::CP(PI / 2.0), &[], &[q(0), q(1)]);
        assert!(approx_eq(sv.amplitudes[0b01], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_swap() {
        let mut sv = Statevector::from_basis_state(3, 0b001);
        sv.apply_elementary(&StandardGate::Swap, &[], &[q(0), q(2)]);
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_apply_controlled_composite() {
        let mut body = Circuit::with_size("flip", 1, 0);
        body.x(QubitId(0)).unwrap();
        let gate = body.to_gate("Flip").unwrap().control();

        let mut sv = Statevector::from_basis_state(2, 0b01);
        sv.apply_gate(&gate, &[q(0), q(1)]);
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_marginal_and_fidelity() {
        let mut sv = Statevector::new(3);
        sv.apply_elementary(&StandardGate::X, &[], &[q(2)]);
        sv.apply_elementary(&StandardGate::H, &[], &[q(0)]);

        let dist = sv.marginal(&[q(2), q(1)]);
        assert!((dist[0b01] - 1.0).abs() < 1e-12);

        let other = sv.clone();
        assert!((sv.fidelity(&other) - 1.0).abs() < 1e-12);
        assert!(sv.fidelity(&Statevector::new(3)) < 1e-12);
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = Statevector::new(1);
        sv.apply_elementary(&StandardGate::X, &[], &[q(0)]);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
        assert!(sv.sample_many(100, &mut rng).iter().all(|&o| o == 1));
    }
}
