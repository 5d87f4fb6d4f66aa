//! Core types for the QSV quantum state engine
//!
//! This crate turns the declarative gate lists received at the service
//! boundary into an ordered sequence of primitive operations:
//! - [`QubitId`]: qubit addressing and the bit-index convention
//! - [`GateDescriptor`]: one unvalidated gate entry from a request
//! - [`GateKind`] / [`Operation`]: recognized gates and lowered primitives
//! - [`Circuit`]: the immutable, ordered operation sequence
//! - [`CircuitBuilder`]: descriptor list → circuit, lenient or strict
//! - [`noise`]: noise configuration, Kraus channels and the noise model
//!
//! # Bit-index convention
//!
//! Qubit `q` is bit `q` of a basis-state index (qubit 0 is the least
//! significant bit). Every crate in the workspace relies on this.
//!
//! # Example
//! ```
//! use qsv_core::{CircuitBuilder, GateDescriptor};
//!
//! let gates = vec![
//!     GateDescriptor::new("CX").with_controls([0]).with_targets([1]).at_step(1),
//!     GateDescriptor::new("H").with_targets([0]).at_step(0),
//! ];
//! let circuit = CircuitBuilder::new(2).build(&gates).unwrap();
//! assert_eq!(circuit.len(), 2);
//! assert_eq!(circuit.operations()[0].kind().name(), "H");
//! ```

pub mod builder;
pub mod circuit;
pub mod descriptor;
pub mod error;
pub mod gate;
pub mod matrices;
pub mod noise;
pub mod qubit;

pub use builder::{CircuitBuilder, ValidationMode};
pub use circuit::Circuit;
pub use descriptor::{CircuitSpec, GateDescriptor};
pub use error::QuantumError;
pub use gate::{GateKind, Matrix2, Operation};
pub use num_complex::Complex64;
pub use qubit::QubitId;

/// Type alias for results in qsv-core
pub type Result<T> = std::result::Result<T, QuantumError>;
