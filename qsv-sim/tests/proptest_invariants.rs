//! Property-based tests over random circuits

use proptest::prelude::*;
use qsv_core::noise::NoiseConfig;
use qsv_core::{CircuitSpec, GateDescriptor};
use qsv_sim::{SimulateRequest, Simulator, SimulatorConfig, StateAnalyzer};
use qsv_state::DensityMatrix;

const SINGLE: [&str; 9] = ["H", "X", "Y", "Z", "S", "T", "RX", "RY", "U"];

/// One random gate over `n` qubits, always well-formed
fn gate_strategy(n: usize) -> impl Strategy<Value = GateDescriptor> {
    (0usize..SINGLE.len() + 3, 0..n, 1..n.max(2), -3.2f64..3.2, 0i64..20).prop_map(
        move |(kind, q, offset, theta, step)| {
            let other = (q + offset) % n;
            match kind {
                k if k < SINGLE.len() => GateDescriptor::new(SINGLE[k])
                    .with_targets([q])
                    .with_params([theta, theta / 2.0, -theta])
                    .at_step(step),
                k if k == SINGLE.len() && other != q => GateDescriptor::new("CX")
                    .with_controls([q])
                    .with_targets([other])
                    .at_step(step),
                k if k == SINGLE.len() + 1 && other != q => GateDescriptor::new("CRY")
                    .with_controls([q])
                    .with_targets([other])
                    .with_params([theta])
                    .at_step(step),
                _ if other != q => GateDescriptor::new("SWAP")
                    .with_targets([q, other])
                    .at_step(step),
                _ => GateDescriptor::new("H").with_targets([q]).at_step(step),
            }
        },
    )
}

fn circuit_strategy() -> impl Strategy<Value = CircuitSpec> {
    (1usize..6).prop_flat_map(|n| {
        prop::collection::vec(gate_strategy(n), 0..25)
            .prop_map(move |gates| CircuitSpec::new(n, gates))
    })
}

fn simulator(seed: u64) -> Simulator {
    Simulator::new(SimulatorConfig::deterministic(seed)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: unitary circuits keep total probability at one
    #[test]
    fn probabilities_normalized(spec in circuit_strategy()) {
        let sim = simulator(0);
        let circuit = sim.build_circuit(&spec).unwrap();
        let result = sim.statevector(&circuit).unwrap();
        let total: f64 = result.probabilities.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total probability {}", total);
    }

    /// Property: ψψ† is Hermitian with unit trace
    #[test]
    fn density_matrix_invariants(spec in circuit_strategy()) {
        let sim = simulator(0);
        let circuit = sim.build_circuit(&spec).unwrap();
        let rho = sim.density_matrix(&circuit).unwrap();
        prop_assert!(rho.is_hermitian(1e-6));
        prop_assert!((rho.trace() - 1.0).abs() < 1e-6);
    }

    /// Property: every reduced single-qubit state lies inside the Bloch ball
    #[test]
    fn bloch_vectors_in_ball(spec in circuit_strategy()) {
        let sim = simulator(0);
        let state = sim.statevector(&sim.build_circuit(&spec).unwrap()).unwrap();
        let analyzer = StateAnalyzer::new(&state.statevector).unwrap();
        for bloch in analyzer.bloch_vectors() {
            prop_assert!(bloch.norm() <= 1.0 + 1e-9, "{:?}", bloch);
        }
    }

    /// Property: a cut's entropy is bounded by the smaller side and symmetric
    #[test]
    fn entropy_bounds(spec in circuit_strategy()) {
        let sim = simulator(0);
        let state = sim.statevector(&sim.build_circuit(&spec).unwrap()).unwrap();
        let n = state.num_qubits;
        let analyzer = StateAnalyzer::new(&state.statevector).unwrap();

        for cut in 1..n {
            let prefix: Vec<usize> = (0..cut).collect();
            let rest: Vec<usize> = (cut..n).collect();
            let s = analyzer.entanglement_entropy(&prefix).unwrap();
            prop_assert!(s >= 0.0 && s <= cut.min(n - cut) as f64 + 1e-9);

            let direct = DensityMatrix::reduced_from_state(&state.statevector, n, &rest)
                .unwrap()
                .von_neumann_entropy();
            prop_assert!((s - direct).abs() < 1e-6, "{} vs {}", s, direct);
        }
    }

    /// Property: counts always total the requested shots
    #[test]
    fn counts_total_shots(
        spec in circuit_strategy(),
        shots in 0usize..200,
        p in 0.0f64..0.3,
        seed in any::<u64>()
    ) {
        let sim = simulator(seed);
        let request = SimulateRequest::new(spec, shots)
            .with_noise(NoiseConfig::new().with_depolarizing(p).with_bit_flip(p / 2.0));
        let result = sim.simulate(&request).unwrap();
        prop_assert_eq!(result.measurement_counts.total_shots(), shots);
        prop_assert_eq!(result.measurement_counts.counts().values().sum::<usize>(), shots);
    }

    /// Property: the analyzer never changes its input or its answer
    #[test]
    fn analyzer_idempotent(spec in circuit_strategy()) {
        let sim = simulator(0);
        let state = sim.statevector(&sim.build_circuit(&spec).unwrap()).unwrap();
        let copy = state.statevector.clone();
        let analyzer = StateAnalyzer::new(&state.statevector).unwrap();

        let first = analyzer.summary().unwrap();
        let second = analyzer.summary().unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(&state.statevector, &copy);
    }
}
