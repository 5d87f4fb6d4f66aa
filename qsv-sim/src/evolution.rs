//! Unitary evolution of a circuit into its final statevector
//!
//! Measurements are markers on this path: they never touch amplitudes.
//! Final measurements are stripped before evolution; a measurement that is
//! followed by more gates on its qubit stays in place as a no-op. Resets
//! project deterministically onto |0⟩ and renormalize.

use crate::error::Result;
use qsv_core::{Circuit, Operation};
use qsv_state::DenseState;
use tracing::debug;

/// Apply one lowered operation to a dense state
///
/// Returns `true` if the amplitudes changed.
pub fn apply_operation(state: &mut DenseState, operation: &Operation) -> Result<bool> {
    match operation {
        Operation::Single { target, matrix, .. } => {
            state.apply_single_qubit_gate(matrix, target.index())?;
        }
        Operation::Controlled {
            controls,
            target,
            matrix,
            ..
        } => {
            let controls: smallvec::SmallVec<[usize; 2]> =
                controls.iter().map(|q| q.index()).collect();
            state.apply_controlled_gate(matrix, &controls, target.index())?;
        }
        Operation::Swap { a, b } => state.apply_swap(a.index(), b.index())?,
        Operation::Reset { target } => state.reset_qubit(target.index())?,
        Operation::Measure { .. } | Operation::Barrier => return Ok(false),
    }
    Ok(true)
}

/// Evolve |0...0⟩ through every operation of `circuit`
pub fn evolve(circuit: &Circuit) -> Result<DenseState> {
    let stripped = circuit.without_final_measurements();
    let mut state = DenseState::new(stripped.num_qubits())?;

    let mut applied = 0usize;
    for operation in stripped.operations() {
        if apply_operation(&mut state, operation)? {
            applied += 1;
        }
    }

    debug!(
        num_qubits = stripped.num_qubits(),
        operations = circuit.len(),
        applied,
        "statevector evolved"
    );
    Ok(state)
}
