//! End-to-end checks of the engine's observable properties

use approx::assert_relative_eq;
use num_complex::Complex64;
use qsv_core::noise::NoiseConfig;
use qsv_core::{CircuitSpec, GateDescriptor};
use qsv_sim::{AnalysisRequest, SimulateRequest, Simulator, SimulatorConfig, StateAnalyzer};
use qsv_state::state_fidelity;

fn simulator() -> Simulator {
    Simulator::new(SimulatorConfig::deterministic(2024)).unwrap()
}

fn gate(name: &str, targets: &[usize], step: i64) -> GateDescriptor {
    GateDescriptor::new(name)
        .with_targets(targets.iter().copied())
        .at_step(step)
}

fn bell() -> CircuitSpec {
    CircuitSpec::new(
        2,
        vec![
            gate("H", &[0], 0),
            GateDescriptor::new("CX").with_controls([0]).with_targets([1]).at_step(1),
        ],
    )
}

#[test]
fn unitary_circuit_probabilities_sum_to_one() {
    let spec = CircuitSpec::new(
        3,
        vec![
            gate("H", &[0, 1, 2], 0),
            GateDescriptor::new("RY").with_targets([1]).with_params([0.7]).at_step(1),
            GateDescriptor::new("CRZ")
                .with_controls([0])
                .with_targets([2])
                .with_params([1.3])
                .at_step(2),
            GateDescriptor::new("U")
                .with_targets([0])
                .with_params([0.4, 1.1, -0.3])
                .at_step(3),
            gate("T", &[2], 4),
            gate("SWAP", &[0, 2], 5),
        ],
    );
    let sim = simulator();
    let result = sim.statevector(&sim.build_circuit(&spec).unwrap()).unwrap();
    assert_relative_eq!(result.probabilities.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
}

#[test]
fn density_matrix_is_hermitian_with_unit_trace() {
    let sim = simulator();
    let circuit = sim.build_circuit(&bell()).unwrap();
    let rho = sim.density_matrix(&circuit).unwrap();
    assert!(rho.is_hermitian(1e-6));
    assert_relative_eq!(rho.trace(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(rho.purity(), 1.0, epsilon = 1e-6);
}

#[test]
fn x_on_single_qubit() {
    let spec = CircuitSpec::new(1, vec![gate("X", &[0], 0)]);
    let report = simulator().analyze(&AnalysisRequest::new(spec)).unwrap();

    assert_eq!(
        report.statevector,
        vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]
    );
    let bloch = &report.bloch_vectors[0];
    assert_relative_eq!(bloch.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(bloch.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(bloch.z, -1.0, epsilon = 1e-12);
    assert_eq!(bloch.label, "q0");
}

#[test]
fn hadamard_on_single_qubit() {
    let spec = CircuitSpec::new(1, vec![gate("H", &[0], 0)]);
    let report = simulator().analyze(&AnalysisRequest::new(spec)).unwrap();

    assert_relative_eq!(report.probabilities[0], 0.5, epsilon = 1e-6);
    assert_relative_eq!(report.probabilities[1], 0.5, epsilon = 1e-6);
    let bloch = &report.bloch_vectors[0];
    assert_relative_eq!(bloch.x, 1.0, epsilon = 1e-6);
    assert_relative_eq!(bloch.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(bloch.z, 0.0, epsilon = 1e-6);
    assert_relative_eq!(report.expectation_values.x[0], 1.0, epsilon = 1e-6);
}

#[test]
fn bell_state_is_maximally_entangled() {
    let report = simulator().analyze(&AnalysisRequest::new(bell())).unwrap();

    assert_eq!(report.entanglement_entropies.len(), 1);
    assert_relative_eq!(report.entanglement_entropies["cut_1"], 1.0, epsilon = 1e-6);
    for bloch in &report.bloch_vectors {
        assert_relative_eq!(bloch.norm(), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn fidelity_of_identical_and_orthogonal_states() {
    let zero = [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
    let one = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];

    assert_relative_eq!(state_fidelity(&zero, &zero).unwrap(), 1.0, epsilon = 1e-9);
    assert_eq!(state_fidelity(&zero, &one).unwrap(), 0.0);

    let report = simulator()
        .analyze(&AnalysisRequest::new(bell()).with_target(vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]))
        .unwrap();
    assert_relative_eq!(report.fidelity.unwrap(), 0.5, epsilon = 1e-9);
}

#[test]
fn counts_sum_to_shots() {
    let sim = simulator();
    for shots in [1, 17, 1000] {
        let ideal = sim.simulate(&SimulateRequest::new(bell(), shots)).unwrap();
        assert_eq!(ideal.measurement_counts.counts().values().sum::<usize>(), shots);

        let noisy = sim
            .simulate(
                &SimulateRequest::new(bell(), shots).with_noise(
                    NoiseConfig::new()
                        .with_depolarizing(0.05)
                        .with_amplitude_damping(0.02),
                ),
            )
            .unwrap();
        assert_eq!(noisy.measurement_counts.counts().values().sum::<usize>(), shots);
    }
}

#[test]
fn zero_shots_give_empty_counts() {
    let result = simulator()
        .simulate(&SimulateRequest::new(bell(), 0).with_noise(NoiseConfig::new().with_bit_flip(0.3)))
        .unwrap();
    assert!(result.measurement_counts.is_empty());
}

#[test]
fn participation_ratio_extremes() {
    let basis = CircuitSpec::new(3, vec![gate("X", &[1], 0)]);
    let uniform = CircuitSpec::new(3, vec![gate("H", &[0, 1, 2], 0)]);

    let sim = simulator();
    let basis_report = sim.analyze(&AnalysisRequest::new(basis)).unwrap();
    let uniform_report = sim.analyze(&AnalysisRequest::new(uniform)).unwrap();

    assert_relative_eq!(basis_report.participation_ratio, 1.0, epsilon = 1e-6);
    assert_relative_eq!(uniform_report.participation_ratio, 8.0, epsilon = 1e-6);
    assert_eq!(uniform_report.num_nonzero_amplitudes, 8);
}

#[test]
fn analyzer_is_idempotent() {
    let sim = simulator();
    let state = sim
        .statevector(&sim.build_circuit(&bell()).unwrap())
        .unwrap()
        .statevector;
    let before = state.clone();

    let analyzer = StateAnalyzer::new(&state).unwrap();
    let first = analyzer.summary().unwrap();
    let second = analyzer.summary().unwrap();

    assert_eq!(first, second);
    assert_eq!(state, before);
}

#[test]
fn bitstrings_put_qubit_zero_rightmost() {
    let spec = CircuitSpec::new(3, vec![gate("X", &[0], 0)]);
    let result = simulator().simulate(&SimulateRequest::new(spec, 10)).unwrap();
    assert_eq!(result.measurement_counts.get("001"), 10);
}

#[test]
fn gate_order_follows_step() {
    // X then H gives |−⟩, H then X gives |+⟩ up to phase; only the step
    // ordering decides which
    let spec = CircuitSpec::new(1, vec![gate("H", &[0], 5), gate("X", &[0], 1)]);
    let report = simulator().analyze(&AnalysisRequest::new(spec)).unwrap();
    assert_relative_eq!(report.bloch_vectors[0].x, -1.0, epsilon = 1e-9);
}

#[test]
fn out_of_range_qubit_is_an_error() {
    let spec = CircuitSpec::new(2, vec![gate("X", &[2], 0)]);
    assert!(simulator().simulate(&SimulateRequest::new(spec, 1)).is_err());
}

#[test]
fn report_serializes_with_boundary_field_names() {
    let report = simulator()
        .analyze(&AnalysisRequest::new(bell()).with_density_matrix())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["statevector"][0].as_array().map(Vec::len), Some(2));
    assert!(json["expectation_values"]["Z"].is_array());
    assert!(json["entanglement_entropies"]["cut_1"].is_number());
    assert_eq!(json["bloch_vectors"][1]["label"], "q1");
    assert_eq!(json["density_matrix"].as_array().map(Vec::len), Some(4));
    assert!(json.get("fidelity").is_none());
}
