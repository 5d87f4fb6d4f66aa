//! Request-scoped quantum state engine
//!
//! Takes the gate lists of a request, lowers them with
//! [`qsv_core::CircuitBuilder`] and answers with:
//! - the final statevector and probabilities ([`evolution`])
//! - measurement counts, ideal or under a noise model ([`sampler`])
//! - reduced-state analysis: Bloch vectors, Pauli expectations, prefix-cut
//!   entanglement entropies, participation ratio ([`analysis`])
//! - fidelity against a reference state
//!
//! [`Simulator`] ties these together behind typed requests and results.
//! The engine keeps no state between calls; randomness comes from
//! [`SimulatorConfig::seed`] or fresh OS entropy per request.
//!
//! # Example
//!
//! ```
//! use qsv_core::{CircuitSpec, GateDescriptor};
//! use qsv_sim::{AnalysisRequest, Simulator, SimulatorConfig};
//!
//! let simulator = Simulator::new(SimulatorConfig::default()).unwrap();
//! let spec = CircuitSpec::new(1, vec![GateDescriptor::new("X").with_targets([0])]);
//!
//! let report = simulator.analyze(&AnalysisRequest::new(spec)).unwrap();
//! assert!((report.bloch_vectors[0].z + 1.0).abs() < 1e-12);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod evolution;
pub mod request;
pub mod result;
pub mod sampler;
pub mod simulator;

pub use analysis::StateAnalyzer;
pub use config::SimulatorConfig;
pub use error::{Result, SimulatorError};
pub use request::{AnalysisRequest, SimulateRequest};
pub use result::{
    AnalysisReport, BlochVector, CircuitAnalysis, ExpectationValues, MeasurementCounts,
    SimulationResult, StatevectorResult,
};
pub use sampler::ShotSampler;
pub use simulator::Simulator;
