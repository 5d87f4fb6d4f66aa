//! Error types for circuit construction and noise configuration

use crate::QubitId;
use thiserror::Error;

/// Errors raised while turning gate descriptors into a circuit
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantumError {
    /// Qubit index outside the register
    #[error("Invalid qubit index {0}: circuit has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// The register must contain at least one qubit
    #[error("Circuit must have at least one qubit")]
    EmptyCircuit,

    /// The same qubit appears twice in one primitive operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Gate name not recognized (strict mode only)
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Descriptor without targets (strict mode only)
    #[error("Gate '{0}' has no target qubits")]
    MissingTargets(String),

    /// Too few qubits for a gate (strict mode only)
    #[error("Gate '{gate}' requires {expected} {role} qubit(s), but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        role: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Missing rotation or phase parameters (strict mode only)
    #[error("Gate '{gate}' requires {expected} parameter(s), but {actual} were provided")]
    MissingParameters {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Probability or rate outside [0, 1]
    #[error("Noise parameter '{name}' must be in [0,1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(
        gate: impl Into<String>,
        role: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            role,
            expected,
            actual,
        }
    }
}
