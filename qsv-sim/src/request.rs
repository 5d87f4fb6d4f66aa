//! Boundary request types
//!
//! The circuit travels as a nested `circuit: {qubits, gates}` object, with
//! the request options as sibling fields.

use num_complex::Complex64;
use qsv_core::noise::NoiseConfig;
use qsv_core::CircuitSpec;
use serde::{Deserialize, Serialize};

/// Evolve a circuit and sample measurement counts
///
/// ```
/// use qsv_sim::SimulateRequest;
///
/// let body = r#"{
///     "circuit": {"qubits": 2, "gates": [{"name": "H", "targets": [0]}]},
///     "shots": 100,
///     "noise": {"depolarizing_prob": 0.01}
/// }"#;
/// let request: SimulateRequest = serde_json::from_str(body).unwrap();
/// assert_eq!(request.circuit.num_qubits, 2);
/// assert_eq!(request.shots, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub circuit: CircuitSpec,

    #[serde(default)]
    pub shots: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseConfig>,
}

impl SimulateRequest {
    pub fn new(circuit: CircuitSpec, shots: usize) -> Self {
        Self {
            circuit,
            shots,
            noise: None,
        }
    }

    pub fn with_noise(mut self, noise: NoiseConfig) -> Self {
        self.noise = Some(noise);
        self
    }
}

/// Evolve a circuit and report state properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub circuit: CircuitSpec,

    /// Reference state for the fidelity field, as `[re, im]` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_statevector: Option<Vec<Complex64>>,

    /// When non-trivial, adds a noisy-counts preview to the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseConfig>,

    #[serde(default)]
    pub include_density_matrix: bool,
}

impl AnalysisRequest {
    pub fn new(circuit: CircuitSpec) -> Self {
        Self {
            circuit,
            target_statevector: None,
            noise: None,
            include_density_matrix: false,
        }
    }

    pub fn with_target(mut self, target: Vec<Complex64>) -> Self {
        self.target_statevector = Some(target);
        self
    }

    pub fn with_noise(mut self, noise: NoiseConfig) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn with_density_matrix(mut self) -> Self {
        self.include_density_matrix = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_defaults() {
        let body = r#"{"circuit": {"qubits": 1, "gates": []}}"#;
        let request: AnalysisRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.circuit.num_qubits, 1);
        assert!(request.target_statevector.is_none());
        assert!(request.noise.is_none());
        assert!(!request.include_density_matrix);
    }

    #[test]
    fn test_target_as_pairs() {
        let body = r#"{
            "circuit": {"qubits": 1},
            "target_statevector": [[0.0, 0.0], [1.0, 0.0]]
        }"#;
        let request: AnalysisRequest = serde_json::from_str(body).unwrap();
        let target = request.target_statevector.unwrap();
        assert_eq!(target[1], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_circuit_is_nested() {
        let request = SimulateRequest::new(CircuitSpec::new(2, vec![]), 8);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["circuit"]["qubits"], 2);
        assert_eq!(json["shots"], 8);
        assert!(json.get("qubits").is_none());

        let flat = r#"{"qubits": 2, "gates": [], "shots": 8}"#;
        assert!(serde_json::from_str::<SimulateRequest>(flat).is_err());
    }
}
