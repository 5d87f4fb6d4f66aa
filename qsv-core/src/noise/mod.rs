//! Noise configuration and single-qubit error channels
//!
//! Three channels are supported, each attached to a fixed set of gates:
//!
//! | channel           | parameter                 | applied after          |
//! |-------------------|---------------------------|------------------------|
//! | bit flip          | `bit_flip_prob`           | X                      |
//! | depolarizing      | `depolarizing_prob`       | X, Y, Z, H, CX         |
//! | amplitude damping | `amplitude_damping_gamma` | I, U, U2, X, Y, Z      |
//!
//! When several channels follow the same gate they run in table order.
//! For CX the channel acts on both the control and the target qubit.
//!
//! # Usage
//!
//! ```
//! use qsv_core::noise::{NoiseConfig, NoiseModel};
//! use qsv_core::GateKind;
//!
//! let config = NoiseConfig::new().with_bit_flip(0.02).with_depolarizing(0.01);
//! let model = NoiseModel::from_config(&config).unwrap();
//!
//! let names: Vec<_> = model.channels_after(GateKind::X).map(|c| c.name()).collect();
//! assert_eq!(names, vec!["bit_flip", "depolarizing"]);
//! ```

pub mod channels;
pub mod config;
pub mod types;

pub use channels::{AmplitudeDamping, BitFlip, DepolarizingChannel};
pub use config::NoiseConfig;
pub use types::{KrausOperator, NoiseChannel, NoiseModel};
