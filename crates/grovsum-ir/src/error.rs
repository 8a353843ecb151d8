//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit:?} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit:?} not found in circuit")]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
    },

    /// A gate was embedded onto a position list of the wrong length.
    #[error("Gate '{gate_name}' acts on {expected} qubits, got {got} positions")]
    DimensionMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Number of qubits the gate declares.
        expected: usize,
        /// Number of positions supplied.
        got: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Quantum and classical registers differ in size.
    #[error("Register '{qreg}' has {qsize} qubits but '{creg}' has {csize} bits")]
    RegisterSizeMismatch {
        /// Quantum register name.
        qreg: String,
        /// Quantum register size.
        qsize: usize,
        /// Classical register name.
        creg: String,
        /// Classical register size.
        csize: usize,
    },

    /// Circuit contains non-unitary instructions and cannot become a gate.
    #[error("Circuit '{0}' contains measurements and cannot be frozen into a gate")]
    NonUnitary(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
