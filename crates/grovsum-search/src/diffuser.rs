//! Reflection about the uniform superposition.

use grovsum_ir::{Circuit, Gate, IrResult};

/// Build `2|s⟩⟨s| − I` on `n` qubits, `|s⟩` the uniform superposition.
///
/// The multi-controlled sign flip on qubit 0 is realized as
/// `H · MCX · H`. The trailing `Z X Z X` on qubit 0 contributes the global
/// factor −1, which becomes a relative phase once the diffuser is
/// controlled.
pub fn diffuser_circuit(n: u32) -> IrResult<Circuit> {
    let mut qc = Circuit::new("diffuser");
    let x = qc.add_qreg("x", n);
    let first = x[0];

    for q in x.iter() {
        qc.h(q)?;
    }
    for q in x.iter() {
        qc.x(q)?;
    }

    qc.h(first)?;
    qc.mcx(x.iter().skip(1), first)?;
    qc.h(first)?;

    for q in x.iter() {
        qc.x(q)?;
    }
    for q in x.iter() {
        qc.h(q)?;
    }

    qc.z(first)?.x(first)?.z(first)?.x(first)?;

    Ok(qc)
}

/// [`diffuser_circuit`] as a gate labelled `Diffuser`.
pub fn diffuser_gate(n: u32) -> IrResult<Gate> {
    diffuser_circuit(n)?.to_gate("Diffuser")
}
