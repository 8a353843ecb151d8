//! Qubit, classical bit and register types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Unique identifier for a qubit within a circuit.
///
/// Ids are allocated sequentially from zero, so an id doubles as the
/// qubit's position when the circuit is frozen into a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit within its circuit.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Unique identifier for a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Position of this bit within its circuit.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A quantum bit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The unique identifier.
    pub id: QubitId,
    /// The name of the register this qubit belongs to, if any.
    pub register: Option<String>,
    /// The index within the register, if any.
    pub index: Option<u32>,
}

impl Qubit {
    /// Create a new qubit with just an id.
    pub fn new(id: QubitId) -> Self {
        Self {
            id,
            register: None,
            index: None,
        }
    }

    /// Create a new qubit with register membership.
    pub fn with_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some(register.into()),
            index: Some(index),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
            _ => write!(f, "{}", self.id),
        }
    }
}

/// A classical bit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// The unique identifier.
    pub id: ClbitId,
    /// The name of the register this bit belongs to, if any.
    pub register: Option<String>,
    /// The index within the register, if any.
    pub index: Option<u32>,
}

impl Clbit {
    /// Create a new classical bit with just an id.
    pub fn new(id: ClbitId) -> Self {
        Self {
            id,
            register: None,
            index: None,
        }
    }

    /// Create a new classical bit with register membership.
    pub fn with_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some(register.into()),
            index: Some(index),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
            _ => write!(f, "{}", self.id),
        }
    }
}

/// A named, ordered group of qubits. Its size is fixed at allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl QuantumRegister {
    pub(crate) fn new(name: String, qubits: Vec<QubitId>) -> Self {
        Self { name, qubits }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// The qubits, least-significant first.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Qubit at `index`, if in range.
    pub fn qubit(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// Iterate over the qubits in register order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }
}

impl Index<usize> for QuantumRegister {
    type Output = QubitId;

    fn index(&self, index: usize) -> &QubitId {
        &self.qubits[index]
    }
}

/// A named, ordered group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    pub(crate) fn new(name: String, clbits: Vec<ClbitId>) -> Self {
        Self { name, clbits }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    /// Whether the register holds no bits.
    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }

    /// The bits, least-significant first.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Iterate over the bits in register order.
    pub fn iter(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new(QubitId(0));
        assert_eq!(format!("{q}"), "q0");

        let q_reg = Qubit::with_register(QubitId(1), "target", 0);
        assert_eq!(format!("{q_reg}"), "target[0]");
    }

    #[test]
    fn test_clbit_display() {
        let c = Clbit::new(ClbitId(0));
        assert_eq!(format!("{c}"), "c0");

        let c_reg = Clbit::with_register(ClbitId(1), "creg_x", 0);
        assert_eq!(format!("{c_reg}"), "creg_x[0]");
    }

    #[test]
    fn test_register_accessors() {
        let reg = QuantumRegister::new("x".into(), vec![QubitId(3), QubitId(4), QubitId(5)]);
        assert_eq!(reg.name(), "x");
        assert_eq!(reg.len(), 3);
        assert_eq!(reg[1], QubitId(4));
        assert_eq!(reg.qubit(2), Some(QubitId(5)));
        assert_eq!(reg.qubit(3), None);
        assert_eq!(reg.iter().collect::<Vec<_>>(), reg.qubits().to_vec());
    }
}
