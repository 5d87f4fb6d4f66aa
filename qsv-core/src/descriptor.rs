//! Request-side gate descriptors
//!
//! Descriptors are received as-is from the service boundary. They are
//! unvalidated: the [`CircuitBuilder`](crate::CircuitBuilder) decides what
//! to do with unknown names, empty target lists and missing parameters.

use serde::{Deserialize, Serialize};

/// One gate entry of an incoming circuit
///
/// `step` is the ordering key; descriptors sharing a step keep their input
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDescriptor {
    pub name: String,

    #[serde(default)]
    pub targets: Vec<usize>,

    #[serde(default)]
    pub controls: Vec<usize>,

    #[serde(default)]
    pub params: Vec<f64>,

    #[serde(default)]
    pub step: i64,
}

impl GateDescriptor {
    /// Create a descriptor with no qubits, parameters or step
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            controls: Vec::new(),
            params: Vec::new(),
            step: 0,
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = usize>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn with_controls(mut self, controls: impl IntoIterator<Item = usize>) -> Self {
        self.controls = controls.into_iter().collect();
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = f64>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    pub fn at_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Parameter `index`, or `0.0` when absent
    pub fn param_or_zero(&self, index: usize) -> f64 {
        self.params.get(index).copied().unwrap_or(0.0)
    }
}

/// A qubit count plus its unordered gate list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSpec {
    #[serde(rename = "qubits")]
    pub num_qubits: usize,

    #[serde(default)]
    pub gates: Vec<GateDescriptor>,
}

impl CircuitSpec {
    pub fn new(num_qubits: usize, gates: Vec<GateDescriptor>) -> Self {
        Self { num_qubits, gates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_helpers() {
        let g = GateDescriptor::new("CRX")
            .with_controls([0])
            .with_targets([1, 2])
            .with_params([0.5])
            .at_step(3);
        assert_eq!(g.controls, vec![0]);
        assert_eq!(g.targets, vec![1, 2]);
        assert_eq!(g.param_or_zero(0), 0.5);
        assert_eq!(g.param_or_zero(1), 0.0);
        assert_eq!(g.step, 3);
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let json = r#"{"name": "h", "targets": [0]}"#;
        let g: GateDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(g.name, "h");
        assert!(g.controls.is_empty());
        assert!(g.params.is_empty());
        assert_eq!(g.step, 0);
    }

    #[test]
    fn test_circuit_spec_field_name() {
        let json = r#"{"qubits": 2, "gates": [{"name": "X", "targets": [1], "step": 1}]}"#;
        let spec: CircuitSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.num_qubits, 2);
        assert_eq!(spec.gates.len(), 1);
        assert_eq!(spec.gates[0].step, 1);
    }
}
