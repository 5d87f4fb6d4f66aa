//! Multinomial sampling from a probability vector
//!
//! Uses Walker's alias method: O(n) setup, O(1) per draw. One table is
//! built per request and shared across every shot.

use crate::error::{Result, StateError};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::warn;

/// Alias table for O(1) categorical sampling
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Probability of keeping column i rather than taking its alias
    prob: Vec<f64>,
    alias: Vec<usize>,
}

impl AliasTable {
    /// Build a table from non-negative weights
    ///
    /// Weights are normalized by their sum, so rounding error in a
    /// probability vector is harmless.
    ///
    /// # Errors
    /// Returns error for an empty slice or weights summing to zero
    pub fn new(weights: &[f64]) -> Result<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(StateError::InvalidDimension { dimension: 0 });
        }

        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(StateError::NotNormalized { norm: total });
        }
        if (total - 1.0).abs() > 1e-6 {
            warn!(total, "sampling weights do not sum to one, renormalizing");
        }

        let mut scaled: Vec<f64> = weights
            .iter()
            .map(|&w| w.max(0.0) / total * n as f64)
            .collect();
        let mut prob = vec![1.0; n];
        let mut alias: Vec<usize> = (0..n).collect();

        let mut small = Vec::new();
        let mut large = Vec::new();
        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            prob[s] = scaled[s];
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // leftovers are 1.0 up to rounding
        for i in large.into_iter().chain(small) {
            prob[i] = 1.0;
        }

        Ok(Self { prob, alias })
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draw one index
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let column = rng.gen_range(0..self.prob.len());
        if rng.gen::<f64>() < self.prob[column] {
            column
        } else {
            self.alias[column]
        }
    }

    /// Draw `shots` indices and tally them
    pub fn sample_counts<R: Rng>(&self, shots: usize, rng: &mut R) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            *counts.entry(self.sample(rng)).or_insert(0) += 1;
        }
        counts
    }
}
