//! Core types and traits for noise modeling

use super::channels::{AmplitudeDamping, BitFlip, DepolarizingChannel};
use super::config::NoiseConfig;
use crate::gate::{GateKind, Matrix2};
use crate::{matrices, Result};
use num_complex::Complex64;
use std::fmt;
use tracing::debug;

/// A single-qubit Kraus operator
///
/// A channel with operators {K_i} maps a state |ψ⟩ to K_i|ψ⟩/‖K_i|ψ⟩‖
/// with probability ‖K_i|ψ⟩‖², and a density matrix ρ to Σ_i K_i ρ K_i†.
#[derive(Clone, Debug, PartialEq)]
pub struct KrausOperator {
    pub matrix: Matrix2,
}

impl KrausOperator {
    pub fn new(matrix: Matrix2) -> Self {
        Self { matrix }
    }

    /// `sqrt(weight) * matrix`
    pub fn scaled(matrix: Matrix2, weight: f64) -> Self {
        let s = Complex64::new(weight.sqrt(), 0.0);
        Self {
            matrix: [
                [matrix[0][0] * s, matrix[0][1] * s],
                [matrix[1][0] * s, matrix[1][1] * s],
            ],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row][col]
    }

    pub fn adjoint(&self) -> Self {
        Self {
            matrix: matrices::adjoint(&self.matrix),
        }
    }
}

/// A quantum noise channel acting on one qubit
///
/// Channels decide for themselves which gates they follow.
pub trait NoiseChannel: Send + Sync + fmt::Debug {
    /// Operators satisfying Σ K_i† K_i = I
    fn kraus_operators(&self) -> &[KrausOperator];

    /// Short identifier, e.g. `"depolarizing"`
    fn name(&self) -> &str;

    /// Whether this channel runs after a gate of the given kind
    fn applies_after(&self, kind: GateKind) -> bool;

    /// Verify the completeness relation Σ K_i† K_i = I within `tolerance`
    fn verify_completeness(&self, tolerance: f64) -> bool {
        let operators = self.kraus_operators();
        if operators.is_empty() {
            return false;
        }

        let mut sum = [[Complex64::new(0.0, 0.0); 2]; 2];
        for kraus in operators {
            let product = matrices::multiply(&kraus.adjoint().matrix, &kraus.matrix);
            for i in 0..2 {
                for j in 0..2 {
                    sum[i][j] += product[i][j];
                }
            }
        }

        (0..2).all(|i| {
            (0..2).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (sum[i][j] - Complex64::new(expected, 0.0)).norm() <= tolerance
            })
        })
    }
}

/// Ordered set of active channels
///
/// Channel order is fixed: bit flip, depolarizing, amplitude damping.
#[derive(Debug, Default)]
pub struct NoiseModel {
    channels: Vec<Box<dyn NoiseChannel>>,
}

impl NoiseModel {
    /// A model with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the active channels from a configuration
    ///
    /// Parameters that are absent or zero produce no channel.
    ///
    /// # Errors
    /// Returns [`crate::QuantumError::InvalidProbability`] for values outside `[0, 1]`.
    pub fn from_config(config: &NoiseConfig) -> Result<Self> {
        config.validate()?;

        let mut model = Self::new();
        if let Some(p) = config.bit_flip_prob.filter(|&p| p > 0.0) {
            model.push(BitFlip::new(p)?);
        }
        if let Some(p) = config.depolarizing_prob.filter(|&p| p > 0.0) {
            model.push(DepolarizingChannel::new(p)?);
        }
        if let Some(gamma) = config.amplitude_damping_gamma.filter(|&g| g > 0.0) {
            model.push(AmplitudeDamping::new(gamma)?);
        }

        debug!(channels = model.channels.len(), "noise model built");
        Ok(model)
    }

    pub fn push(&mut self, channel: impl NoiseChannel + 'static) {
        self.channels.push(Box::new(channel));
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> impl Iterator<Item = &dyn NoiseChannel> {
        self.channels.iter().map(|c| c.as_ref())
    }

    /// Channels to run after a gate of `kind`, in application order
    pub fn channels_after(&self, kind: GateKind) -> impl Iterator<Item = &dyn NoiseChannel> {
        self.channels().filter(move |c| c.applies_after(kind))
    }
}
