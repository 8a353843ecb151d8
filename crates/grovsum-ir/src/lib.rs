//! Grovsum Circuit Intermediate Representation
//!
//! This crate provides the data structures for describing reversible
//! quantum circuits as compositions of smaller ones.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over qubits grouped
//! into named registers. Any measurement-free circuit can be frozen into a
//! [`Gate`], and gates compose algebraically:
//!
//! - [`Gate::control`] adds one control qubit in front of the operands
//! - [`Gate::inverse`] yields the exact inverse, lazily
//! - [`Gate::repeat`] applies the gate `k` times in sequence
//!
//! Backends never see the algebra directly. They expand a circuit into
//! elementary gates with [`Circuit::for_each_elementary`], which resolves
//! controls, inversion and repetition on the fly.
//!
//! # Example: Controlled Inverse of a Sub-circuit
//!
//! ```rust
//! use grovsum_ir::{Circuit, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut body = Circuit::with_size("rotate", 2, 0);
//! body.h(QubitId(0)).unwrap();
//! body.cp(PI / 2.0, QubitId(0), QubitId(1)).unwrap();
//! let rotate = body.to_gate("Rotate").unwrap();
//!
//! let mut circuit = Circuit::new("outer");
//! let ctrl = circuit.add_qreg("ctrl", 1);
//! let work = circuit.add_qreg("work", 2);
//! circuit
//!     .append(rotate.inverse().control(), ctrl.iter().chain(work.iter()))
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.count_elementary()["c1_cp"], 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Z` | 1 | Pauli gates |
//! | `P` | 1 | Phase gate diag(1, e^{iθ}) |
//! | `CP` | 2 | Controlled phase |
//! | `Swap` | 2 | SWAP gate |
//! | `Mcx` | n+1 | Multi-controlled X |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CompositeGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, ClassicalRegister, QuantumRegister, Qubit, QubitId};
