//! Shot sampling, noiseless and noisy
//!
//! Two paths produce the same count semantics:
//! - **exact**: a noiseless circuit without resets or mid-circuit
//!   measurements is evolved once and all shots are drawn from the final
//!   distribution through an [`AliasTable`]
//! - **trajectory**: every shot evolves its own statevector, samples one
//!   Kraus operator per channel application and collapses on measurements
//!
//! Each trajectory owns an RNG seeded from a value drawn up front from the
//! request RNG, so counts do not depend on whether shots run on the rayon
//! pool.
//!
//! Readout: a circuit without measurements reads every qubit at the end.
//! Otherwise the bitstring is the classical register, with bits that were
//! never written reading `0`.

use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::evolution;
use crate::result::MeasurementCounts;
use qsv_core::noise::NoiseModel;
use qsv_core::qubit::format_bitstring;
use qsv_core::{matrices, Circuit, GateKind, Operation, QubitId};
use qsv_state::{AliasTable, DenseState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Draws measurement counts for one circuit under one noise model
#[derive(Debug)]
pub struct ShotSampler<'a> {
    circuit: &'a Circuit,
    noise: &'a NoiseModel,
    parallel: bool,
    parallel_threshold: usize,
}

impl<'a> ShotSampler<'a> {
    pub fn new(circuit: &'a Circuit, noise: &'a NoiseModel, config: &SimulatorConfig) -> Self {
        Self {
            circuit,
            noise,
            parallel: config.parallel_shots,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Whether the single-evolution multinomial path applies
    pub fn is_exact(&self) -> bool {
        self.noise.is_empty()
            && !self.circuit.has_resets()
            && !self.circuit.has_mid_circuit_measurements()
    }

    /// Run `shots` trials; zero shots return empty counts without simulating
    pub fn sample(&self, shots: usize, rng: &mut StdRng) -> Result<MeasurementCounts> {
        if shots == 0 {
            return Ok(MeasurementCounts::new());
        }

        let registers = if self.is_exact() {
            self.sample_exact(shots, rng)?
        } else {
            self.sample_trajectories(shots, rng)?
        };

        let width = self.circuit.num_qubits();
        let counts = registers
            .into_iter()
            .fold(MeasurementCounts::new(), |mut counts, (register, n)| {
                counts.add(format_bitstring(register, width), n);
                counts
            });

        debug!(
            shots,
            exact = self.is_exact(),
            outcomes = counts.num_outcomes(),
            "shots sampled"
        );
        Ok(counts)
    }

    fn sample_exact(&self, shots: usize, rng: &mut StdRng) -> Result<BTreeMap<usize, usize>> {
        let state = evolution::evolve(self.circuit)?;
        let table = AliasTable::new(&state.probabilities())?;
        let measurements = self.circuit.measurement_map();

        let mut registers = BTreeMap::new();
        for (index, n) in table.sample_counts(shots, rng) {
            *registers.entry(readout(index, &measurements)).or_insert(0) += n;
        }
        Ok(registers)
    }

    fn sample_trajectories(
        &self,
        shots: usize,
        rng: &mut StdRng,
    ) -> Result<BTreeMap<usize, usize>> {
        let seeds: Vec<u64> = (0..shots).map(|_| rng.gen()).collect();

        let outcomes: Vec<usize> = if self.parallel && shots >= self.parallel_threshold {
            seeds
                .par_iter()
                .map(|&seed| self.run_trajectory(&mut StdRng::seed_from_u64(seed)))
                .collect::<Result<_>>()?
        } else {
            seeds
                .iter()
                .map(|&seed| self.run_trajectory(&mut StdRng::seed_from_u64(seed)))
                .collect::<Result<_>>()?
        };

        let mut registers = BTreeMap::new();
        for register in outcomes {
            *registers.entry(register).or_insert(0) += 1;
        }
        Ok(registers)
    }

    /// One shot: evolve, inject noise, collapse, return the classical register
    fn run_trajectory(&self, rng: &mut StdRng) -> Result<usize> {
        let mut state = DenseState::new(self.circuit.num_qubits())?;
        let mut register = 0usize;

        for operation in self.circuit.operations() {
            match operation {
                Operation::Measure { qubit, clbit } => {
                    let outcome = state.measure_qubit(qubit.index(), rng.gen())?;
                    register = write_bit(register, *clbit, outcome == 1);
                }
                Operation::Reset { target } => {
                    if state.measure_qubit(target.index(), rng.gen())? == 1 {
                        state.apply_single_qubit_gate(&matrices::PAULI_X, target.index())?;
                    }
                }
                Operation::Barrier => {}
                gate => {
                    evolution::apply_operation(&mut state, gate)?;
                    self.apply_noise(&mut state, gate, rng)?;
                }
            }
        }

        if self.circuit.has_measurements() {
            Ok(register)
        } else {
            measure_all(&state, rng)
        }
    }

    fn apply_noise(&self, state: &mut DenseState, gate: &Operation, rng: &mut StdRng) -> Result<()> {
        let kind = gate.kind();
        for channel in self.noise.channels_after(kind) {
            for qubit in noisy_qubits(gate, kind) {
                state.apply_kraus_sampled(channel.kraus_operators(), qubit.index(), rng.gen())?;
            }
        }
        Ok(())
    }
}

/// Qubits a channel acts on after `gate`: the target, and for CX the control too
fn noisy_qubits(gate: &Operation, kind: GateKind) -> smallvec::SmallVec<[QubitId; 3]> {
    match gate {
        Operation::Controlled { target, .. } if kind != GateKind::Cx => smallvec::smallvec![*target],
        _ => gate.qubits(),
    }
}

/// Project a sampled basis index onto the classical register
fn readout(index: usize, measurements: &[(QubitId, usize)]) -> usize {
    if measurements.is_empty() {
        return index;
    }
    measurements.iter().fold(0, |register, (qubit, clbit)| {
        write_bit(register, *clbit, qubit.is_set(index))
    })
}

fn write_bit(register: usize, clbit: usize, value: bool) -> usize {
    if value {
        register | (1 << clbit)
    } else {
        register & !(1 << clbit)
    }
}

/// Sample one basis index from the state's distribution
fn measure_all(state: &DenseState, rng: &mut StdRng) -> Result<usize> {
    let probabilities = state.probabilities();
    let threshold = rng.gen::<f64>() * probabilities.iter().sum::<f64>();

    let mut cumulative = 0.0;
    let mut last_nonzero = 0;
    for (index, p) in probabilities.iter().enumerate() {
        if *p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_nonzero = index;
        if threshold < cumulative {
            return Ok(index);
        }
    }
    Ok(last_nonzero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::noise::NoiseConfig;
    use qsv_core::{CircuitBuilder, GateDescriptor};

    fn circuit(num_qubits: usize, gates: Vec<GateDescriptor>) -> Circuit {
        CircuitBuilder::new(num_qubits).build(&gates).unwrap()
    }

    fn counts(circuit: &Circuit, noise: &NoiseConfig, shots: usize, seed: u64) -> MeasurementCounts {
        let model = NoiseModel::from_config(noise).unwrap();
        let config = SimulatorConfig::deterministic(seed);
        let sampler = ShotSampler::new(circuit, &model, &config);
        sampler.sample(shots, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_zero_shots() {
        let c = circuit(1, vec![GateDescriptor::new("H").with_targets([0])]);
        assert!(counts(&c, &NoiseConfig::new(), 0, 1).is_empty());
    }

    #[test]
    fn test_deterministic_circuit() {
        let c = circuit(3, vec![GateDescriptor::new("X").with_targets([0, 2])]);
        let result = counts(&c, &NoiseConfig::new(), 100, 1);
        assert_eq!(result.get("101"), 100);
    }

    #[test]
    fn test_bell_only_correlated_outcomes() {
        let c = circuit(
            2,
            vec![
                GateDescriptor::new("H").with_targets([0]),
                GateDescriptor::new("CX").with_controls([0]).with_targets([1]).at_step(1),
            ],
        );
        let result = counts(&c, &NoiseConfig::new(), 1000, 9);
        assert_eq!(result.total_shots(), 1000);
        assert_eq!(result.get("00") + result.get("11"), 1000);
        assert!(result.get("00") > 400 && result.get("11") > 400);
    }

    #[test]
    fn test_partial_measurement_register() {
        // only q1 measured; q0 reads as 0 even though it is 1
        let c = circuit(
            2,
            vec![
                GateDescriptor::new("X").with_targets([0, 1]),
                GateDescriptor::new("MEASURE").with_targets([1]).at_step(1),
            ],
        );
        let result = counts(&c, &NoiseConfig::new(), 50, 2);
        assert_eq!(result.get("10"), 50);
    }

    #[test]
    fn test_certain_bit_flip() {
        let c = circuit(1, vec![GateDescriptor::new("X").with_targets([0])]);
        let result = counts(&c, &NoiseConfig::new().with_bit_flip(1.0), 64, 3);
        assert_eq!(result.get("0"), 64);
    }

    #[test]
    fn test_full_damping_relaxes_to_ground() {
        let c = circuit(1, vec![GateDescriptor::new("X").with_targets([0])]);
        let result = counts(&c, &NoiseConfig::new().with_amplitude_damping(1.0), 64, 4);
        assert_eq!(result.get("0"), 64);
    }

    #[test]
    fn test_depolarizing_hits_cx_control() {
        // with p = 1 every CX is followed by X, Y or Z on both qubits; the
        // control leaves |0⟩ whenever X or Y is drawn
        let c = circuit(
            2,
            vec![GateDescriptor::new("CX").with_controls([0]).with_targets([1])],
        );
        let result = counts(&c, &NoiseConfig::new().with_depolarizing(1.0), 600, 5);
        let control_flipped: usize = ["01", "11"].iter().map(|bs| result.get(bs)).sum();
        assert!(control_flipped > 300, "{result}");
    }

    const RATE_SHOTS: usize = 20_000;

    /// Fraction of shots reading `1` for a one-qubit circuit of `gate`
    fn frequency_of_one(gate: &str, noise: NoiseConfig, seed: u64) -> f64 {
        let c = circuit(1, vec![GateDescriptor::new(gate).with_targets([0])]);
        counts(&c, &noise, RATE_SHOTS, seed).probability("1")
    }

    #[test]
    fn test_partial_damping_rate() {
        // |1⟩ decays with probability γ
        let p1 = frequency_of_one("X", NoiseConfig::new().with_amplitude_damping(0.3), 99);
        assert!((p1 - 0.7).abs() < 0.02, "P(1) = {p1}");
    }

    #[test]
    fn test_partial_bit_flip_rate() {
        let p1 = frequency_of_one("X", NoiseConfig::new().with_bit_flip(0.2), 99);
        assert!((p1 - 0.8).abs() < 0.02, "P(1) = {p1}");
    }

    #[test]
    fn test_depolarizing_splits_into_paulis() {
        // X and Y flip |1⟩, Z does not: P(flip) = 2p/3
        let p1 = frequency_of_one("X", NoiseConfig::new().with_depolarizing(0.3), 99);
        assert!((p1 - 0.8).abs() < 0.02, "P(1) = {p1}");
    }

    #[test]
    fn test_bit_flip_ignores_ineligible_gates() {
        let p1 = frequency_of_one("Y", NoiseConfig::new().with_bit_flip(0.5), 99);
        assert_eq!(p1, 1.0);
    }

    #[test]
    fn test_damping_weight_depends_on_state() {
        // U(π/2, 0, 0) prepares |+⟩; only the |1⟩ half can decay
        let c = circuit(
            1,
            vec![GateDescriptor::new("U")
                .with_targets([0])
                .with_params([std::f64::consts::FRAC_PI_2, 0.0, 0.0])],
        );
        let result = counts(&c, &NoiseConfig::new().with_amplitude_damping(0.4), RATE_SHOTS, 17);
        // P(1) = (1 - γ)/2
        let p1 = result.probability("1");
        assert!((p1 - 0.3).abs() < 0.02, "P(1) = {p1}");
    }

    #[test]
    fn test_mid_circuit_measurement_collapses() {
        // H, measure, H: collapse makes the second H produce 50/50 again
        let c = circuit(
            1,
            vec![
                GateDescriptor::new("H").with_targets([0]),
                GateDescriptor::new("MEASURE").with_targets([0]).at_step(1),
                GateDescriptor::new("H").with_targets([0]).at_step(2),
                GateDescriptor::new("MEASURE").with_targets([0]).at_step(3),
            ],
        );
        let model = NoiseModel::new();
        let config = SimulatorConfig::deterministic(0);
        assert!(!ShotSampler::new(&c, &model, &config).is_exact());

        let result = counts(&c, &NoiseConfig::new(), 2000, 6);
        assert!(result.get("1") > 800 && result.get("0") > 800);
    }

    #[test]
    fn test_reset_trajectory() {
        let c = circuit(
            1,
            vec![
                GateDescriptor::new("H").with_targets([0]),
                GateDescriptor::new("RESET").with_targets([0]).at_step(1),
            ],
        );
        let result = counts(&c, &NoiseConfig::new(), 200, 8);
        assert_eq!(result.get("0"), 200);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let c = circuit(
            2,
            vec![
                GateDescriptor::new("H").with_targets([0, 1]),
                GateDescriptor::new("X").with_targets([1]).at_step(1),
            ],
        );
        let model = NoiseModel::from_config(&NoiseConfig::new().with_bit_flip(0.2)).unwrap();

        let sequential = SimulatorConfig::deterministic(11);
        let parallel = SimulatorConfig::deterministic(11)
            .with_parallel_shots(true)
            .with_parallel_threshold(1);

        let a = ShotSampler::new(&c, &model, &sequential)
            .sample(500, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let b = ShotSampler::new(&c, &model, &parallel)
            .sample(500, &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_readout_mapping() {
        let map = [(QubitId::new(2), 2), (QubitId::new(0), 0)];
        assert_eq!(readout(0b111, &map), 0b101);
        assert_eq!(readout(0b010, &[]), 0b010);
    }
}
