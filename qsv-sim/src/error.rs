//! Error types for the simulator

use qsv_core::QuantumError;
use qsv_state::StateError;
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur while simulating or analyzing a request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulatorError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Register larger than the configured statevector ceiling
    #[error("Too many qubits: {num_qubits} requested, maximum is {max_qubits}")]
    TooManyQubits { num_qubits: usize, max_qubits: usize },

    /// Full density matrix requested above its ceiling
    #[error("Density matrix for {num_qubits} qubits exceeds the limit of {max_qubits}")]
    DensityMatrixTooLarge { num_qubits: usize, max_qubits: usize },

    /// Circuit construction or noise configuration failed
    #[error(transparent)]
    Circuit(#[from] QuantumError),

    /// State kernel failure
    #[error(transparent)]
    State(#[from] StateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lower_errors() {
        let err: SimulatorError = QuantumError::EmptyCircuit.into();
        assert!(matches!(err, SimulatorError::Circuit(_)));
        assert_eq!(err.to_string(), QuantumError::EmptyCircuit.to_string());

        let err: SimulatorError = StateError::InvalidDimension { dimension: 3 }.into();
        assert!(matches!(err, SimulatorError::State(_)));
    }

    #[test]
    fn test_too_many_qubits_message() {
        let err = SimulatorError::TooManyQubits {
            num_qubits: 40,
            max_qubits: 24,
        };
        let msg = err.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("24"));
    }
}
