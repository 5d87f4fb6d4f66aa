//! Concrete noise channels

use super::types::{KrausOperator, NoiseChannel};
use crate::gate::GateKind;
use crate::{matrices, QuantumError, Result};
use num_complex::Complex64;

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QuantumError::InvalidProbability { name, value });
    }
    Ok(())
}

/// Bit-flip channel
///
/// Applies X with probability p and leaves the qubit alone otherwise.
///
/// # Physical Interpretation
/// Models classical-style flips |0⟩ ↔ |1⟩, e.g. from a miscalibrated
/// π pulse. Only X gates are followed by this channel.
///
/// # Kraus Operators
/// ```text
/// K₀ = √(1-p) I
/// K₁ = √p X
/// ```
///
/// # Example
/// ```
/// use qsv_core::noise::{BitFlip, NoiseChannel};
/// use qsv_core::GateKind;
///
/// let channel = BitFlip::new(0.05).unwrap();
/// assert_eq!(channel.probability(), 0.05);
/// assert!(channel.applies_after(GateKind::X));
/// assert!(!channel.applies_after(GateKind::H));
/// ```
#[derive(Debug, Clone)]
pub struct BitFlip {
    /// Flip probability p ∈ [0, 1]
    probability: f64,
    operators: [KrausOperator; 2],
}

impl BitFlip {
    /// Create a bit-flip channel
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidProbability`] unless `probability` is in [0, 1]
    pub fn new(probability: f64) -> Result<Self> {
        check_probability("bit_flip_prob", probability)?;
        Ok(Self {
            probability,
            operators: [
                KrausOperator::scaled(matrices::IDENTITY, 1.0 - probability),
                KrausOperator::scaled(matrices::PAULI_X, probability),
            ],
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl NoiseChannel for BitFlip {
    fn kraus_operators(&self) -> &[KrausOperator] {
        &self.operators
    }

    fn name(&self) -> &str {
        "bit_flip"
    }

    fn applies_after(&self, kind: GateKind) -> bool {
        kind == GateKind::X
    }
}

/// Single-qubit depolarizing channel
///
/// With probability p one of X, Y, Z is applied, each with probability p/3.
///
/// # Physical Interpretation
/// Uniform random Pauli errors from all sources. On a basis state, X and
/// Y flip the measured bit and Z does not, so the readout flips with
/// probability 2p/3.
///
/// # Kraus Operators
/// ```text
/// K₀ = √(1-p) I
/// K₁ = √(p/3) X
/// K₂ = √(p/3) Y
/// K₃ = √(p/3) Z
/// ```
///
/// # Example
/// ```
/// use qsv_core::noise::{DepolarizingChannel, NoiseChannel};
///
/// let channel = DepolarizingChannel::new(0.01).unwrap();
/// assert_eq!(channel.error_probability(), 0.01);
/// assert_eq!(channel.kraus_operators().len(), 4);
/// assert!(channel.verify_completeness(1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct DepolarizingChannel {
    /// Total error probability p ∈ [0, 1]
    error_probability: f64,
    operators: [KrausOperator; 4],
}

impl DepolarizingChannel {
    /// Create a depolarizing channel
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidProbability`] unless `error_probability` is in [0, 1]
    pub fn new(error_probability: f64) -> Result<Self> {
        check_probability("depolarizing_prob", error_probability)?;
        let pauli_weight = error_probability / 3.0;
        Ok(Self {
            error_probability,
            operators: [
                KrausOperator::scaled(matrices::IDENTITY, 1.0 - error_probability),
                KrausOperator::scaled(matrices::PAULI_X, pauli_weight),
                KrausOperator::scaled(matrices::PAULI_Y, pauli_weight),
                KrausOperator::scaled(matrices::PAULI_Z, pauli_weight),
            ],
        })
    }

    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }
}

impl NoiseChannel for DepolarizingChannel {
    fn kraus_operators(&self) -> &[KrausOperator] {
        &self.operators
    }

    fn name(&self) -> &str {
        "depolarizing"
    }

    fn applies_after(&self, kind: GateKind) -> bool {
        matches!(
            kind,
            GateKind::X | GateKind::Y | GateKind::Z | GateKind::H | GateKind::Cx
        )
    }
}

/// Amplitude damping (T1 relaxation)
///
/// Energy loss from |1⟩ to |0⟩ with rate γ.
///
/// # Physical Interpretation
/// Spontaneous emission: an excited qubit decays to the ground state with
/// probability γ, while |0⟩ is left unchanged. Unlike the Pauli channels,
/// the chance of a jump depends on the state: for a|0⟩ + b|1⟩ it is γ|b|².
///
/// # Kraus Operators
/// ```text
/// K₀ = [[1, 0], [0, √(1-γ)]]  (no decay)
/// K₁ = [[0, √γ], [0, 0]]      (decay |1⟩ → |0⟩)
/// ```
///
/// # Example
/// ```
/// use qsv_core::noise::{AmplitudeDamping, NoiseChannel};
/// use qsv_core::GateKind;
///
/// let channel = AmplitudeDamping::new(0.02).unwrap();
/// assert_eq!(channel.gamma(), 0.02);
/// assert!(channel.applies_after(GateKind::I));
/// assert!(!channel.applies_after(GateKind::Cx));
/// ```
#[derive(Debug, Clone)]
pub struct AmplitudeDamping {
    /// Damping rate γ ∈ [0, 1]
    gamma: f64,
    operators: [KrausOperator; 2],
}

impl AmplitudeDamping {
    /// Create an amplitude-damping channel
    ///
    /// # Errors
    /// Returns [`QuantumError::InvalidProbability`] unless `gamma` is in [0, 1]
    pub fn new(gamma: f64) -> Result<Self> {
        check_probability("amplitude_damping_gamma", gamma)?;
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        Ok(Self {
            gamma,
            operators: [
                KrausOperator::new([[one, zero], [zero, Complex64::new((1.0 - gamma).sqrt(), 0.0)]]),
                KrausOperator::new([[zero, Complex64::new(gamma.sqrt(), 0.0)], [zero, zero]]),
            ],
        })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl NoiseChannel for AmplitudeDamping {
    fn kraus_operators(&self) -> &[KrausOperator] {
        &self.operators
    }

    fn name(&self) -> &str {
        "amplitude_damping"
    }

    fn applies_after(&self, kind: GateKind) -> bool {
        matches!(
            kind,
            GateKind::I | GateKind::U | GateKind::U2 | GateKind::X | GateKind::Y | GateKind::Z
        )
    }
}
