//! Gate algebra: elementary gates and the combinators that build
//! composite, controlled, inverted and repeated operators from them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::instruction::InstructionKind;
use crate::qubit::QubitId;

/// Elementary gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate (basis change).
    H,
    /// Pauli-X gate (bit flip).
    X,
    /// Pauli-Z gate (sign flip).
    Z,
    /// Phase gate diag(1, e^{iθ}).
    P(f64),
    /// Controlled phase gate. Operands: control, target.
    CP(f64),
    /// SWAP gate.
    Swap,
    /// Multi-controlled X. Operands: the controls, then the target.
    ///
    /// With zero controls this is a plain X.
    Mcx {
        /// Number of control qubits.
        num_controls: u32,
    },
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::P(_) => "p",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::Mcx { .. } => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::H | StandardGate::X | StandardGate::Z | StandardGate::P(_) => 1,
            StandardGate::CP(_) | StandardGate::Swap => 2,
            StandardGate::Mcx { num_controls } => *num_controls as usize + 1,
        }
    }

    /// The rotation angle, if this gate has one.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::P(theta) | StandardGate::CP(theta) => Some(*theta),
            _ => None,
        }
    }

    /// The exact inverse. Rotations negate their angle; flips and
    /// permutations are self-inverse.
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::P(theta) => StandardGate::P(-theta),
            StandardGate::CP(theta) => StandardGate::CP(-theta),
            other => other.clone(),
        }
    }
}

/// A circuit frozen into an opaque operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    /// The name of the gate.
    pub name: String,
    /// The frozen body. Its qubit `k` binds to the `k`-th operand.
    pub body: Circuit,
}

impl CompositeGate {
    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        self.body.num_qubits()
    }
}

/// The shape of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// An elementary gate.
    Standard(StandardGate),
    /// A frozen sub-circuit, shared between every place it is embedded.
    Composite(Arc<CompositeGate>),
    /// The wrapped gate, gated by one extra control on the first operand.
    Controlled(Box<Gate>),
    /// The algebraic inverse of the wrapped gate.
    Inverse(Box<Gate>),
    /// `times`-fold sequential application of the wrapped gate.
    Repeat {
        /// The repeated gate.
        gate: Box<Gate>,
        /// Number of applications.
        times: u32,
    },
}

/// An immutable operation description, optionally labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a composite gate from a circuit body.
    ///
    /// Prefer [`Circuit::to_gate`], which rejects non-unitary bodies.
    pub(crate) fn composite(name: impl Into<String>, body: Circuit) -> Self {
        let name = name.into();
        Self {
            kind: GateKind::Composite(Arc::new(CompositeGate {
                name: name.clone(),
                body,
            })),
            label: Some(name),
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the display name of this gate.
    pub fn name(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.kind {
            GateKind::Standard(g) => g.name().to_string(),
            GateKind::Composite(c) => c.name.clone(),
            GateKind::Controlled(g) => format!("c_{}", g.name()),
            GateKind::Inverse(g) => format!("{}_dg", g.name()),
            GateKind::Repeat { gate, times } => format!("{}^{times}", gate.name()),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        match &self.kind {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Composite(c) => c.num_qubits(),
            GateKind::Controlled(g) => g.num_qubits() + 1,
            GateKind::Inverse(g) | GateKind::Repeat { gate: g, .. } => g.num_qubits(),
        }
    }

    /// A gate on `num_qubits() + 1` qubits whose first operand controls
    /// this gate's effect.
    #[must_use]
    pub fn control(&self) -> Gate {
        Gate {
            label: self.label.clone(),
            kind: GateKind::Controlled(Box::new(self.clone())),
        }
    }

    /// The exact inverse of this gate.
    ///
    /// Inverting twice yields the original gate.
    #[must_use]
    pub fn inverse(&self) -> Gate {
        let kind = match &self.kind {
            GateKind::Inverse(inner) => return (**inner).clone(),
            GateKind::Standard(g) => GateKind::Standard(g.inverse()),
            GateKind::Controlled(inner) => GateKind::Controlled(Box::new(inner.inverse())),
            GateKind::Repeat { gate, times } => GateKind::Repeat {
                gate: Box::new(gate.inverse()),
                times: *times,
            },
            GateKind::Composite(_) => GateKind::Inverse(Box::new(self.clone())),
        };
        Gate {
            kind,
            label: self.label.as_ref().map(|l| format!("{l}_dg")),
        }
    }

    /// `times`-fold sequential composition of this gate.
    ///
    /// The cost of a repeated gate is linear in `times`: a backend expands
    /// every application.
    #[must_use]
    pub fn repeat(&self, times: u32) -> Gate {
        Gate {
            label: self.label.as_ref().map(|l| format!("{l}^{times}")),
            kind: GateKind::Repeat {
                gate: Box::new(self.clone()),
                times,
            },
        }
    }

    /// Expand this gate, applied to `qubits`, into elementary gates.
    ///
    /// The callback receives each elementary gate, the extra control
    /// qubits accumulated from enclosing [`GateKind::Controlled`] wrappers,
    /// and the gate's own operands, in application order.
    pub fn for_each_elementary<F>(&self, qubits: &[QubitId], f: &mut F)
    where
        F: FnMut(&StandardGate, &[QubitId], &[QubitId]),
    {
        let mut controls = Vec::new();
        self.visit(qubits, &mut controls, false, f);
    }

    fn visit<F>(&self, qubits: &[QubitId], controls: &mut Vec<QubitId>, inverted: bool, f: &mut F)
    where
        F: FnMut(&StandardGate, &[QubitId], &[QubitId]),
    {
        match &self.kind {
            GateKind::Standard(g) => {
                if inverted {
                    f(&g.inverse(), controls, qubits);
                } else {
                    f(g, controls, qubits);
                }
            }
            GateKind::Composite(c) => {
                let mut apply = |kind: &InstructionKind, operands: &[QubitId]| {
                    if let InstructionKind::Gate(inner) = kind {
                        let mapped: Vec<QubitId> =
                            operands.iter().map(|q| qubits[q.index()]).collect();
                        inner.visit(&mapped, controls, inverted, f);
                    }
                };
                if inverted {
                    for inst in c.body.instructions().iter().rev() {
                        apply(&inst.kind, &inst.qubits);
                    }
                } else {
                    for inst in c.body.instructions() {
                        apply(&inst.kind, &inst.qubits);
                    }
                }
            }
            GateKind::Controlled(inner) => {
                controls.push(qubits[0]);
                inner.visit(&qubits[1..], controls, inverted, f);
                controls.pop();
            }
            GateKind::Inverse(inner) => inner.visit(qubits, controls, !inverted, f),
            GateKind::Repeat { gate, times } => {
                for _ in 0..*times {
                    gate.visit(qubits, controls, inverted, f);
                }
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}
