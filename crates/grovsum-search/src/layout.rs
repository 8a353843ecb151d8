//! Register layout shared by every builder.
//!
//! All search circuits place their registers in one fixed order:
//! the optional counting register `t`, then `x` (one qubit per number),
//! then the phase-kickback ancilla `y`, then the running total `target`.
//! Gates built over `(x, y, target)` take their operands in that order.

use grovsum_ir::{Circuit, ClassicalRegister, QuantumRegister, QubitId};

/// A circuit with the search registers allocated.
#[derive(Debug, Clone)]
pub struct SearchLayout {
    circuit: Circuit,
    counter: Option<QuantumRegister>,
    x: QuantumRegister,
    y: QuantumRegister,
    target: QuantumRegister,
}

impl SearchLayout {
    /// Allocate `x` (`len_numbers` qubits), `y` and `target` (`digits` qubits).
    pub fn new(name: impl Into<String>, len_numbers: u32, digits: u32) -> Self {
        Self::build(name.into(), None, len_numbers, digits)
    }

    /// Allocate a `digits_counter`-qubit counting register `t` ahead of
    /// the usual registers.
    pub fn with_counter(
        name: impl Into<String>,
        digits_counter: u32,
        len_numbers: u32,
        digits: u32,
    ) -> Self {
        Self::build(name.into(), Some(digits_counter), len_numbers, digits)
    }

    fn build(name: String, digits_counter: Option<u32>, len_numbers: u32, digits: u32) -> Self {
        let mut circuit = Circuit::new(name);
        let counter = digits_counter.map(|m| circuit.add_qreg("t", m));
        let x = circuit.add_qreg("x", len_numbers);
        let y = circuit.add_qreg("y", 1);
        let target = circuit.add_qreg("target", digits);
        Self {
            circuit,
            counter,
            x,
            y,
            target,
        }
    }

    /// The counting register, if allocated.
    pub fn counter(&self) -> Option<&QuantumRegister> {
        self.counter.as_ref()
    }

    /// The subset-selection register.
    pub fn x(&self) -> &QuantumRegister {
        &self.x
    }

    /// The phase-kickback ancilla.
    pub fn y(&self) -> QubitId {
        self.y[0]
    }

    /// The running-total register.
    pub fn target(&self) -> &QuantumRegister {
        &self.target
    }

    /// Operands of a gate over `(x, target)`.
    pub fn validator_operands(&self) -> Vec<QubitId> {
        self.x.iter().chain(self.target.iter()).collect()
    }

    /// Operands of a gate over `(x, y, target)`.
    pub fn grover_operands(&self) -> Vec<QubitId> {
        self.x
            .iter()
            .chain(self.y.iter())
            .chain(self.target.iter())
            .collect()
    }

    /// Add a classical register as wide as `qreg`.
    pub fn add_creg_for(&mut self, name: &str, qreg: &QuantumRegister) -> ClassicalRegister {
        self.circuit.add_creg(name, qreg.len() as u32)
    }

    /// The circuit under construction.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Mutable access for appending instructions.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// Finish building.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_order() {
        let layout = SearchLayout::new("grover", 2, 3);
        assert_eq!(layout.x().qubits(), &[QubitId(0), QubitId(1)]);
        assert_eq!(layout.y(), QubitId(2));
        assert_eq!(layout.target()[0], QubitId(3));
        assert!(layout.counter().is_none());
        assert_eq!(layout.circuit().num_qubits(), 6);
        assert_eq!(
            layout.validator_operands(),
            vec![QubitId(0), QubitId(1), QubitId(3), QubitId(4), QubitId(5)]
        );
        assert_eq!(layout.grover_operands().len(), 6);
    }

    #[test]
    fn test_counter_comes_first() {
        let layout = SearchLayout::with_counter("counter", 4, 5, 5);
        let t = layout.counter().unwrap();
        assert_eq!(t.qubits()[0], QubitId(0));
        assert_eq!(layout.x()[0], QubitId(4));
        assert_eq!(layout.y(), QubitId(9));
        assert_eq!(layout.circuit().num_qubits(), 15);
    }
}
