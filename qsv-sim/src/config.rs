//! Simulator configuration

use crate::error::{Result, SimulatorError};
use qsv_core::ValidationMode;
use qsv_state::dense_state::MAX_QUBITS;

/// Configuration for the simulator
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Largest register accepted for statevector simulation
    ///
    /// Memory grows as 16 · 2^n bytes.
    ///
    /// Default: 24
    pub max_qubits: usize,

    /// Largest register for which the full 2^n × 2^n density matrix is built
    ///
    /// Reduced density matrices, Bloch vectors and entropies are not bound by
    /// this limit.
    ///
    /// Default: 12
    pub max_density_matrix_qubits: usize,

    /// How the circuit builder treats malformed gate descriptors
    ///
    /// Default: [`ValidationMode::Lenient`]
    pub validation: ValidationMode,

    /// Random number generator seed for reproducibility
    ///
    /// If None, every request draws a fresh seed from the OS.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Shots used for the noisy-counts preview of an analysis request
    ///
    /// Default: 1024
    pub noise_preview_shots: usize,

    /// Run per-shot trajectories on the rayon pool
    ///
    /// Per-shot seeds are drawn up front, so results do not depend on this.
    ///
    /// Default: true
    pub parallel_shots: bool,

    /// Minimum shot count before trajectories are parallelized
    ///
    /// Default: 256
    pub parallel_threshold: usize,

    /// Amplitudes with modulus at or below this count as zero
    ///
    /// Default: 1e-12
    pub zero_amplitude_tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 24,
            max_density_matrix_qubits: 12,
            validation: ValidationMode::Lenient,
            seed: None,
            noise_preview_shots: 1024,
            parallel_shots: true,
            parallel_threshold: 256,
            zero_amplitude_tolerance: 1e-12,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded and single-threaded, for reproducible tests
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            parallel_shots: false,
            ..Default::default()
        }
    }

    /// Reject malformed gate descriptors instead of skipping them
    pub fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
            ..Default::default()
        }
    }

    /// Set the statevector ceiling
    ///
    /// The density-matrix ceiling is lowered with it when it would
    /// otherwise exceed the new value.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self.max_density_matrix_qubits = self.max_density_matrix_qubits.min(max_qubits);
        self
    }

    pub fn with_max_density_matrix_qubits(mut self, max_qubits: usize) -> Self {
        self.max_density_matrix_qubits = max_qubits;
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_noise_preview_shots(mut self, shots: usize) -> Self {
        self.noise_preview_shots = shots;
        self
    }

    pub fn with_parallel_shots(mut self, enabled: bool) -> Self {
        self.parallel_shots = enabled;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_zero_amplitude_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_amplitude_tolerance = tolerance;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(SimulatorError::InvalidConfig(format!(
                "max_qubits must be in [1, {MAX_QUBITS}], got {}",
                self.max_qubits
            )));
        }

        if self.max_density_matrix_qubits > self.max_qubits {
            return Err(SimulatorError::InvalidConfig(format!(
                "max_density_matrix_qubits ({}) cannot exceed max_qubits ({})",
                self.max_density_matrix_qubits, self.max_qubits
            )));
        }

        if !self.zero_amplitude_tolerance.is_finite() || self.zero_amplitude_tolerance < 0.0 {
            return Err(SimulatorError::InvalidConfig(format!(
                "zero_amplitude_tolerance must be a non-negative number, got {}",
                self.zero_amplitude_tolerance
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.max_qubits, 24);
        assert_eq!(config.max_density_matrix_qubits, 12);
        assert_eq!(config.validation, ValidationMode::Lenient);
        assert_eq!(config.noise_preview_shots, 1024);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let config = SimulatorConfig::deterministic(7);
        assert_eq!(config.seed, Some(7));
        assert!(!config.parallel_shots);

        assert_eq!(SimulatorConfig::strict().validation, ValidationMode::Strict);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulatorConfig::new()
            .with_max_qubits(10)
            .with_max_density_matrix_qubits(4)
            .with_seed(1)
            .with_noise_preview_shots(64);
        assert_eq!(config.max_qubits, 10);
        assert_eq!(config.max_density_matrix_qubits, 4);
        assert_eq!(config.noise_preview_shots, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_register_cap_lowers_density_ceiling() {
        let config = SimulatorConfig::new().with_max_qubits(10);
        assert_eq!(config.max_density_matrix_qubits, 10);
        assert!(config.validate().is_ok());

        let config = SimulatorConfig::new()
            .with_max_density_matrix_qubits(4)
            .with_max_qubits(10);
        assert_eq!(config.max_density_matrix_qubits, 4);
    }

    #[test]
    fn test_validation() {
        assert!(SimulatorConfig::new().with_max_qubits(0).validate().is_err());
        assert!(SimulatorConfig::new().with_max_qubits(64).validate().is_err());
        assert!(SimulatorConfig::new()
            .with_max_qubits(8)
            .with_max_density_matrix_qubits(9)
            .validate()
            .is_err());
        assert!(SimulatorConfig::new()
            .with_zero_amplitude_tolerance(f64::NAN)
            .validate()
            .is_err());
    }
}
