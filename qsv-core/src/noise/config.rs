//! User-facing noise parameters

use crate::{QuantumError, Result};
use serde::{Deserialize, Serialize};

/// Optional per-channel noise strengths
///
/// An absent parameter and a parameter equal to zero both disable the
/// channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_flip_prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depolarizing_prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_damping_gamma: Option<f64>,
}

impl NoiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bit_flip(mut self, p: f64) -> Self {
        self.bit_flip_prob = Some(p);
        self
    }

    pub fn with_depolarizing(mut self, p: f64) -> Self {
        self.depolarizing_prob = Some(p);
        self
    }

    pub fn with_amplitude_damping(mut self, gamma: f64) -> Self {
        self.amplitude_damping_gamma = Some(gamma);
        self
    }

    /// Check every present parameter lies in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        check("bit_flip_prob", self.bit_flip_prob)?;
        check("depolarizing_prob", self.depolarizing_prob)?;
        check("amplitude_damping_gamma", self.amplitude_damping_gamma)
    }

    /// True when no channel would be active
    pub fn is_noiseless(&self) -> bool {
        [
            self.bit_flip_prob,
            self.depolarizing_prob,
            self.amplitude_damping_gamma,
        ]
        .iter()
        .all(|p| p.map_or(true, |v| v == 0.0))
    }
}

fn check(name: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        // NaN fails the range check too
        Some(v) if !(0.0..=1.0).contains(&v) => {
            Err(QuantumError::InvalidProbability { name, value: v })
        }
        _ => Ok(()),
    }
}
