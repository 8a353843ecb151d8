//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, ClassicalRegister, QuantumRegister, Qubit, QubitId};

/// A quantum circuit.
///
/// An ordered list of instructions bound to the circuit's own qubits.
/// A circuit owns its registers; once built it can be frozen into a
/// [`Gate`] with [`Circuit::to_gate`] and embedded into other circuits
/// with [`Circuit::append`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit, indexed by id.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit, indexed by id.
    clbits: Vec<Clbit>,
    /// Quantum registers in allocation order.
    qregs: Vec<QuantumRegister>,
    /// Classical registers in allocation order.
    cregs: Vec<ClassicalRegister>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    fn next_qubit_id(&self) -> QubitId {
        QubitId::from(self.qubits.len())
    }

    fn next_clbit_id(&self) -> ClbitId {
        ClbitId(u32::try_from(self.clbits.len()).expect("ClbitId overflow: exceeds u32::MAX"))
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit_id();
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> QuantumRegister {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = self.next_qubit_id();
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }
        let reg = QuantumRegister::new(name, ids);
        self.qregs.push(reg.clone());
        reg
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit_id();
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> ClassicalRegister {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = self.next_clbit_id();
            self.clbits.push(Clbit::with_register(id, &name, i));
            ids.push(id);
        }
        let reg = ClassicalRegister::new(name, ids);
        self.cregs.push(reg.clone());
        reg
    }

    /// Validate and record an instruction.
    fn apply(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(Gate::name);

        if let Some(gate) = instruction.as_gate() {
            if gate.num_qubits() != instruction.qubits.len() {
                return Err(IrError::DimensionMismatch {
                    gate_name: gate.name(),
                    expected: gate.num_qubits(),
                    got: instruction.qubits.len(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.index() >= self.qubits.len() {
                return Err(IrError::QubitNotFound { qubit, gate_name });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }
        for &clbit in &instruction.clbits {
            if clbit.index() >= self.clbits.len() {
                return Err(IrError::ClbitNotFound { clbit });
            }
        }

        self.instructions.push(instruction);
        Ok(())
    }

    // =========================================================================
    // Elementary gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))?;
        Ok(self)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))?;
        Ok(self)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply a multi-controlled X: flips `target` when every control is 1.
    pub fn mcx(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let mut qubits: Vec<QubitId> = controls.into_iter().collect();
        let num_controls = u32::try_from(qubits.len()).expect("control count exceeds u32::MAX");
        qubits.push(target);
        self.apply(Instruction::gate(StandardGate::Mcx { num_controls }, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Embed `gate` onto `qubits`.
    ///
    /// The gate's `k`-th qubit binds to `qubits[k]`. Fails with
    /// [`IrError::DimensionMismatch`] if the position count differs from
    /// the gate's qubit count.
    pub fn append(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Freeze this circuit into a single opaque gate.
    pub fn to_gate(&self, label: impl Into<String>) -> IrResult<Gate> {
        if self.instructions.iter().any(Instruction::is_measure) {
            return Err(IrError::NonUnitary(self.name.clone()));
        }
        Ok(Gate::composite(label, self.clone()))
    }

    /// The inverse circuit: instructions reversed, each gate inverted.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let instructions = self
            .instructions
            .iter()
            .rev()
            .map(|inst| {
                inst.inverse()
                    .ok_or_else(|| IrError::NonUnitary(self.name.clone()))
            })
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Circuit {
            name: format!("{}_dg", self.name),
            instructions,
            ..self.clone()
        })
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure every qubit of `qreg` into the matching bit of `creg`.
    pub fn measure_register(
        &mut self,
        qreg: &QuantumRegister,
        creg: &ClassicalRegister,
    ) -> IrResult<&mut Self> {
        if qreg.len() != creg.len() {
            return Err(IrError::RegisterSizeMismatch {
                qreg: qreg.name().to_string(),
                qsize: qreg.len(),
                creg: creg.name().to_string(),
                csize: creg.len(),
            });
        }
        for (qubit, clbit) in qreg.iter().zip(creg.iter()) {
            self.measure(qubit, clbit)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Quantum registers in allocation order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in allocation order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// `(qubit, clbit)` pairs of every measurement, in order.
    pub fn measurements(&self) -> Vec<(QubitId, ClbitId)> {
        self.instructions
            .iter()
            .filter(|inst| inst.is_measure())
            .flat_map(|inst| inst.qubits.iter().copied().zip(inst.clbits.iter().copied()))
            .collect()
    }

    /// Depth counted over top-level instructions: composite gates count
    /// as one layer.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.qubits.len()];
        let mut clbit_depth = vec![0usize; self.clbits.len()];
        let mut depth = 0;
        for inst in &self.instructions {
            let layer = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.index()]))
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                qubit_depth[q.index()] = layer;
            }
            for c in &inst.clbits {
                clbit_depth[c.index()] = layer;
            }
            depth = depth.max(layer);
        }
        depth
    }

    /// Expand every gate instruction into elementary gates, in order.
    ///
    /// See [`Gate::for_each_elementary`] for the callback arguments.
    /// Measurements are skipped.
    pub fn for_each_elementary<F>(&self, f: &mut F)
    where
        F: FnMut(&StandardGate, &[QubitId], &[QubitId]),
    {
        for inst in &self.instructions {
            if let InstructionKind::Gate(gate) = &inst.kind {
                gate.for_each_elementary(&inst.qubits, f);
            }
        }
    }

    /// Number of elementary gates per gate name after full expansion.
    ///
    /// Gates carrying extra controls are counted under `c<n>_<name>`.
    pub fn count_elementary(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        self.for_each_elementary(
            &mut |gate: &StandardGate, controls: &[QubitId], _: &[QubitId]| {
                let key = if controls.is_empty() {
                    gate.name().to_string()
                } else {
                    format!("c{}_{}", controls.len(), gate.name())
                };
                *counts.entry(key).or_insert(0) += 1;
            },
        );
        counts
    }

    /// Serialize the circuit to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
