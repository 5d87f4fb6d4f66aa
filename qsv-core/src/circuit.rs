//! Ordered, immutable operation sequence

use crate::gate::Operation;
use crate::{QuantumError, QubitId, Result};

/// A lowered quantum circuit
///
/// Produced by [`CircuitBuilder`](crate::CircuitBuilder); operations are in
/// execution order and every qubit index has been bounds-checked.
///
/// # Example
/// ```
/// use qsv_core::{Circuit, Operation, QubitId, GateKind, matrices};
///
/// let mut circuit = Circuit::new(1).unwrap();
/// circuit.push(Operation::Single {
///     kind: GateKind::H,
///     target: QubitId::new(0),
///     matrix: matrices::HADAMARD,
/// }).unwrap();
/// assert_eq!(circuit.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits
    ///
    /// # Errors
    /// Returns [`QuantumError::EmptyCircuit`] if `num_qubits` is 0
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_capacity(num_qubits, 0)
    }

    pub fn with_capacity(num_qubits: usize, capacity: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QuantumError::EmptyCircuit);
        }
        Ok(Self {
            num_qubits,
            operations: Vec::with_capacity(capacity),
        })
    }

    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Append an operation
    ///
    /// # Errors
    /// Returns error if a qubit is out of range or repeated
    pub fn push(&mut self, operation: Operation) -> Result<()> {
        let qubits = operation.qubits();
        for (i, qubit) in qubits.iter().enumerate() {
            if qubit.index() >= self.num_qubits {
                return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
            }
            if qubits[..i].contains(qubit) {
                return Err(QuantumError::DuplicateQubit(*qubit));
            }
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Whether any measurement is present
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(Operation::is_measurement)
    }

    /// Whether any reset is present
    pub fn has_resets(&self) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, Operation::Reset { .. }))
    }

    /// Indices of measurements that are final on their qubit
    ///
    /// A measurement is final when no later operation other than a barrier
    /// acts on the measured qubit.
    fn final_measurement_indices(&self) -> Vec<usize> {
        let mut busy = vec![false; self.num_qubits];
        let mut finals = Vec::new();

        for (index, op) in self.operations.iter().enumerate().rev() {
            match op {
                Operation::Measure { qubit, .. } => {
                    if !busy[qubit.index()] {
                        finals.push(index);
                    }
                    busy[qubit.index()] = true;
                }
                Operation::Barrier => {}
                other => {
                    for q in other.qubits() {
                        busy[q.index()] = true;
                    }
                }
            }
        }

        finals
    }

    /// Whether some measurement is followed by more work on its qubit
    pub fn has_mid_circuit_measurements(&self) -> bool {
        let finals = self.final_measurement_indices();
        self.operations
            .iter()
            .enumerate()
            .any(|(i, op)| op.is_measurement() && !finals.contains(&i))
    }

    /// Copy of the circuit with final measurements removed
    ///
    /// Mid-circuit measurements are kept; the statevector path treats them
    /// as markers.
    pub fn without_final_measurements(&self) -> Circuit {
        let finals = self.final_measurement_indices();
        let operations = self
            .operations
            .iter()
            .enumerate()
            .filter(|(i, _)| !finals.contains(i))
            .map(|(_, op)| op.clone())
            .collect();
        Circuit {
            num_qubits: self.num_qubits,
            operations,
        }
    }

    /// `(qubit, clbit)` pairs of every measurement, in circuit order
    pub fn measurement_map(&self) -> Vec<(QubitId, usize)> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Measure { qubit, clbit } => Some((*qubit, *clbit)),
                _ => None,
            })
            .collect()
    }
}
