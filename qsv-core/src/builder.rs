//! Gate descriptor list → ordered circuit
//!
//! Descriptors are stably sorted by `step` and lowered one by one. Broadcast
//! rules:
//! - single-qubit gates, resets and measurements apply once per target
//! - controlled gates apply once per `(control, target)` pair, controls in
//!   the outer loop
//! - `SWAP` uses the first two targets, `CCX` the first two controls and the
//!   first target; extra indices are ignored
//!
//! What happens to malformed descriptors depends on [`ValidationMode`].
//! Out-of-range and duplicated qubits are always errors.

use crate::descriptor::GateDescriptor;
use crate::gate::{GateKind, Matrix2, Operation};
use crate::{matrices, Circuit, QuantumError, QubitId, Result};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use tracing::debug;

/// How the builder treats descriptors it cannot use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Skip unknown names and incomplete descriptors silently
    #[default]
    Lenient,
    /// Reject them with a validation error
    Strict,
}

/// Builds a [`Circuit`] from unordered gate descriptors
///
/// # Example
/// ```
/// use qsv_core::{CircuitBuilder, GateDescriptor, ValidationMode};
///
/// let gates = vec![GateDescriptor::new("nope").with_targets([0])];
///
/// let lenient = CircuitBuilder::new(1).build(&gates).unwrap();
/// assert!(lenient.is_empty());
///
/// let strict = CircuitBuilder::new(1).with_mode(ValidationMode::Strict);
/// assert!(strict.build(&gates).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    num_qubits: usize,
    mode: ValidationMode,
}

impl CircuitBuilder {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            mode: ValidationMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Sort, lower and bounds-check the descriptors
    ///
    /// # Errors
    /// - [`QuantumError::EmptyCircuit`] if the register has no qubits
    /// - [`QuantumError::InvalidQubit`] / [`QuantumError::DuplicateQubit`]
    ///   in either mode
    /// - validation errors for malformed descriptors in strict mode
    pub fn build(&self, descriptors: &[GateDescriptor]) -> Result<Circuit> {
        let mut ordered: Vec<&GateDescriptor> = descriptors.iter().collect();
        // sort_by_key is stable: equal steps keep input order
        ordered.sort_by_key(|d| d.step);

        let mut circuit = Circuit::with_capacity(self.num_qubits, ordered.len())?;
        for descriptor in ordered {
            self.lower(descriptor, &mut circuit)?;
        }

        debug!(
            num_qubits = self.num_qubits,
            descriptors = descriptors.len(),
            operations = circuit.len(),
            "circuit built"
        );
        Ok(circuit)
    }

    fn lower(&self, d: &GateDescriptor, circuit: &mut Circuit) -> Result<()> {
        let Some(kind) = GateKind::parse(&d.name) else {
            return self.skip(d, QuantumError::UnknownGate(d.name.clone()));
        };

        // a barrier spans the whole register and needs no targets
        if kind == GateKind::Barrier {
            return circuit.push(Operation::Barrier);
        }

        if d.targets.is_empty() {
            return self.skip(d, QuantumError::MissingTargets(d.name.clone()));
        }

        if self.mode == ValidationMode::Strict && d.params.len() < kind.num_params() {
            return Err(QuantumError::MissingParameters {
                gate: d.name.clone(),
                expected: kind.num_params(),
                actual: d.params.len(),
            });
        }

        match kind {
            GateKind::Swap => {
                if d.targets.len() < 2 {
                    return self.skip(
                        d,
                        QuantumError::invalid_qubit_count(&d.name, "target", 2, d.targets.len()),
                    );
                }
                let a = self.qubit(d.targets[0])?;
                let b = self.qubit(d.targets[1])?;
                circuit.push(Operation::Swap { a, b })
            }
            GateKind::Ccx => {
                if d.controls.len() < 2 {
                    return self.skip(
                        d,
                        QuantumError::invalid_qubit_count(&d.name, "control", 2, d.controls.len()),
                    );
                }
                circuit.push(Operation::Controlled {
                    kind,
                    controls: smallvec![self.qubit(d.controls[0])?, self.qubit(d.controls[1])?],
                    target: self.qubit(d.targets[0])?,
                    matrix: matrices::PAULI_X,
                })
            }
            GateKind::Cx | GateKind::Cz | GateKind::Crx | GateKind::Cry | GateKind::Crz => {
                if d.controls.is_empty() {
                    return self.skip(
                        d,
                        QuantumError::invalid_qubit_count(&d.name, "control", 1, 0),
                    );
                }
                let matrix = controlled_matrix(kind, d);
                for &control in &d.controls {
                    let control = self.qubit(control)?;
                    for &target in &d.targets {
                        circuit.push(Operation::Controlled {
                            kind,
                            controls: smallvec![control],
                            target: self.qubit(target)?,
                            matrix,
                        })?;
                    }
                }
                Ok(())
            }
            GateKind::Measure => {
                for &target in &d.targets {
                    let qubit = self.qubit(target)?;
                    circuit.push(Operation::Measure {
                        qubit,
                        clbit: qubit.index(),
                    })?;
                }
                Ok(())
            }
            GateKind::Reset => {
                for &target in &d.targets {
                    circuit.push(Operation::Reset {
                        target: self.qubit(target)?,
                    })?;
                }
                Ok(())
            }
            _ => {
                let matrix = single_qubit_matrix(kind, d);
                for &target in &d.targets {
                    circuit.push(Operation::Single {
                        kind,
                        target: self.qubit(target)?,
                        matrix,
                    })?;
                }
                Ok(())
            }
        }
    }

    fn qubit(&self, index: usize) -> Result<QubitId> {
        if index >= self.num_qubits {
            return Err(QuantumError::invalid_qubit(index, self.num_qubits));
        }
        Ok(QubitId::new(index))
    }

    fn skip(&self, d: &GateDescriptor, reason: QuantumError) -> Result<()> {
        match self.mode {
            ValidationMode::Strict => Err(reason),
            ValidationMode::Lenient => {
                debug!(gate = %d.name, step = d.step, %reason, "skipping gate descriptor");
                Ok(())
            }
        }
    }
}

fn single_qubit_matrix(kind: GateKind, d: &GateDescriptor) -> Matrix2 {
    match kind {
        GateKind::X => matrices::PAULI_X,
        GateKind::Y => matrices::PAULI_Y,
        GateKind::Z => matrices::PAULI_Z,
        GateKind::H => matrices::HADAMARD,
        GateKind::S => matrices::S_GATE,
        GateKind::T => matrices::T_GATE,
        GateKind::Rx => matrices::rx(d.param_or_zero(0)),
        GateKind::Ry => matrices::ry(d.param_or_zero(0)),
        GateKind::Rz => matrices::rz(d.param_or_zero(0)),
        GateKind::Phase => matrices::phase(d.param_or_zero(0)),
        GateKind::U => matrices::u3(d.param_or_zero(0), d.param_or_zero(1), d.param_or_zero(2)),
        GateKind::U2 => matrices::u2(d.param_or_zero(0), d.param_or_zero(1)),
        _ => matrices::IDENTITY,
    }
}

fn controlled_matrix(kind: GateKind, d: &GateDescriptor) -> Matrix2 {
    match kind {
        GateKind::Cz => matrices::PAULI_Z,
        GateKind::Crx => matrices::rx(d.param_or_zero(0)),
        GateKind::Cry => matrices::ry(d.param_or_zero(0)),
        GateKind::Crz => matrices::rz(d.param_or_zero(0)),
        _ => matrices::PAULI_X,
    }
}
