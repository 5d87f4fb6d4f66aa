//! Request-scoped simulation façade
//!
//! A [`Simulator`] holds only its configuration. Every call builds its own
//! circuit, state and RNG, so one simulator can serve concurrent requests.

use crate::analysis::StateAnalyzer;
use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};
use crate::evolution;
use crate::request::{AnalysisRequest, SimulateRequest};
use crate::result::{AnalysisReport, MeasurementCounts, SimulationResult, StatevectorResult};
use crate::sampler::ShotSampler;
use qsv_core::noise::{NoiseConfig, NoiseModel};
use qsv_core::{Circuit, CircuitBuilder, CircuitSpec};
use qsv_state::{state_fidelity, DensityMatrix};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument, warn};

/// Probabilities must sum to one within this tolerance
const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Statevector simulator and analyzer
///
/// # Example
///
/// ```
/// use qsv_core::{CircuitSpec, GateDescriptor};
/// use qsv_sim::{SimulateRequest, Simulator, SimulatorConfig};
///
/// let simulator = Simulator::new(SimulatorConfig::deterministic(7)).unwrap();
/// let bell = CircuitSpec::new(2, vec![
///     GateDescriptor::new("H").with_targets([0]),
///     GateDescriptor::new("CX").with_controls([0]).with_targets([1]).at_step(1),
/// ]);
///
/// let result = simulator.simulate(&SimulateRequest::new(bell, 1000)).unwrap();
/// let counts = &result.measurement_counts;
/// assert_eq!(counts.get("00") + counts.get("11"), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator
    ///
    /// # Errors
    /// Returns [`SimulatorError::InvalidConfig`] if the configuration is invalid
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Lower a circuit spec under the configured validation mode
    ///
    /// # Errors
    /// - [`SimulatorError::TooManyQubits`] above `max_qubits`
    /// - circuit construction errors from the builder
    pub fn build_circuit(&self, spec: &CircuitSpec) -> Result<Circuit> {
        self.check_qubits(spec.num_qubits)?;
        let builder = CircuitBuilder::new(spec.num_qubits).with_mode(self.config.validation);
        Ok(builder.build(&spec.gates)?)
    }

    /// Final statevector and its probabilities
    #[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), ops = circuit.len()))]
    pub fn statevector(&self, circuit: &Circuit) -> Result<StatevectorResult> {
        self.check_qubits(circuit.num_qubits())?;

        let state = evolution::evolve(circuit)?;
        let probabilities = state.probabilities();
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            warn!(total, "final probabilities drift from one");
        }

        Ok(StatevectorResult {
            num_qubits: circuit.num_qubits(),
            statevector: state.into_amplitudes(),
            probabilities,
        })
    }

    /// Measurement counts over `shots` trials
    ///
    /// Zero shots return empty counts without simulating. A `None` or
    /// all-zero noise configuration samples the ideal circuit.
    #[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), shots = shots))]
    pub fn sample_counts(
        &self,
        circuit: &Circuit,
        shots: usize,
        noise: Option<&NoiseConfig>,
    ) -> Result<MeasurementCounts> {
        let model = match noise {
            Some(config) => NoiseModel::from_config(config)?,
            None => NoiseModel::new(),
        };
        if shots == 0 {
            return Ok(MeasurementCounts::new());
        }
        self.check_qubits(circuit.num_qubits())?;

        let mut rng = self.rng();
        ShotSampler::new(circuit, &model, &self.config).sample(shots, &mut rng)
    }

    /// Full density matrix, bounded by `max_density_matrix_qubits`
    pub fn density_matrix(&self, circuit: &Circuit) -> Result<DensityMatrix> {
        self.check_density(circuit.num_qubits())?;
        let state = self.statevector(circuit)?;
        Ok(DensityMatrix::from_state_vector(
            state.num_qubits,
            &state.statevector,
        )?)
    }

    /// Statevector, probabilities and counts for one request
    #[instrument(skip_all, fields(num_qubits = request.circuit.num_qubits, shots = request.shots))]
    pub fn simulate(&self, request: &SimulateRequest) -> Result<SimulationResult> {
        let circuit = self.build_circuit(&request.circuit)?;
        let state = self.statevector(&circuit)?;
        let measurement_counts =
            self.sample_counts(&circuit, request.shots, request.noise.as_ref())?;

        info!(
            operations = circuit.len(),
            outcomes = measurement_counts.num_outcomes(),
            "simulation complete"
        );
        Ok(SimulationResult {
            statevector: state.statevector,
            probabilities: state.probabilities,
            measurement_counts,
        })
    }

    /// Analysis report for one request
    ///
    /// Order: statevector, fidelity against the target, expectation values,
    /// Bloch vectors, prefix-cut entropies, participation ratio, then the
    /// optional density matrix and noisy-counts preview.
    #[instrument(skip_all, fields(num_qubits = request.circuit.num_qubits))]
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let circuit = self.build_circuit(&request.circuit)?;
        if request.include_density_matrix {
            self.check_density(circuit.num_qubits())?;
        }
        let state = self.statevector(&circuit)?;

        let fidelity = request
            .target_statevector
            .as_deref()
            .map(|target| state_fidelity(&state.statevector, target))
            .transpose()?;

        let analyzer = StateAnalyzer::new(&state.statevector)?
            .with_zero_tolerance(self.config.zero_amplitude_tolerance);
        let expectation_values = analyzer.expectation_values()?;
        let bloch_vectors = analyzer.bloch_vectors();
        let entanglement_entropies = analyzer.entanglement_entropies()?;
        let participation_ratio = analyzer.participation_ratio();
        let num_nonzero_amplitudes = analyzer.num_nonzero_amplitudes();

        let density_matrix = if request.include_density_matrix {
            Some(analyzer.density_matrix()?.to_rows())
        } else {
            None
        };

        let noisy_counts = match &request.noise {
            Some(noise) if !noise.is_noiseless() => Some(self.sample_counts(
                &circuit,
                self.config.noise_preview_shots,
                Some(noise),
            )?),
            Some(noise) => {
                noise.validate()?;
                None
            }
            None => None,
        };

        info!(
            operations = circuit.len(),
            fidelity,
            participation_ratio,
            noisy = noisy_counts.is_some(),
            "analysis complete"
        );
        Ok(AnalysisReport {
            statevector: state.statevector,
            probabilities: state.probabilities,
            fidelity,
            expectation_values,
            bloch_vectors,
            entanglement_entropies,
            participation_ratio,
            num_nonzero_amplitudes,
            density_matrix,
            noisy_counts,
        })
    }

    fn check_qubits(&self, num_qubits: usize) -> Result<()> {
        if num_qubits > self.config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }
        Ok(())
    }

    fn check_density(&self, num_qubits: usize) -> Result<()> {
        if num_qubits > self.config.max_density_matrix_qubits {
            return Err(SimulatorError::DensityMatrixTooLarge {
                num_qubits,
                max_qubits: self.config.max_density_matrix_qubits,
            });
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
