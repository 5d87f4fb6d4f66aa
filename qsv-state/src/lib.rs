//! Dense quantum state kernels and state analysis primitives
//!
//! - [`DenseState`]: the 2^n amplitude vector with in-place gate kernels,
//!   projective measurement, reset and sampled Kraus channels
//! - [`DensityMatrix`]: full or reduced density matrices, partial trace,
//!   purity and exact von Neumann entropy
//! - [`PauliString`]: Pauli-string expectation values
//! - [`AliasTable`]: O(1) multinomial sampling from a probability vector
//! - [`state_fidelity`]: |⟨a|b⟩|² between two unnormalized vectors
//!
//! Qubit `q` is bit `q` of the basis index throughout.
//!
//! # Example
//!
//! ```
//! use qsv_core::matrices;
//! use qsv_state::{DenseState, DensityMatrix};
//!
//! let mut state = DenseState::new(2).unwrap();
//! state.apply_single_qubit_gate(&matrices::HADAMARD, 0).unwrap();
//! state.apply_controlled_gate(&matrices::PAULI_X, &[0], 1).unwrap();
//!
//! let rho_a = DensityMatrix::reduced_from_state(state.amplitudes(), 2, &[0]).unwrap();
//! assert!((rho_a.von_neumann_entropy() - 1.0).abs() < 1e-9);
//! ```

pub mod dense_state;
pub mod density_matrix;
pub mod error;
pub mod fidelity;
pub mod kernels;
pub mod measurement;
pub mod observable;

pub use dense_state::DenseState;
pub use density_matrix::DensityMatrix;
pub use error::{Result, StateError};
pub use fidelity::{inner_product, state_fidelity};
pub use measurement::AliasTable;
pub use observable::{Pauli, PauliString};
