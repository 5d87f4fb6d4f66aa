//! Density and reduced-state analysis of a final statevector
//!
//! Every quantity here is computed from the amplitudes without forming the
//! full density matrix, except [`StateAnalyzer::density_matrix`] itself.
//! The analyzer only borrows the amplitudes, so repeated calls see the same
//! input and return the same output.

use crate::error::Result;
use crate::result::{BlochVector, CircuitAnalysis, ExpectationValues};
use num_complex::Complex64;
use qsv_core::QubitId;
use qsv_state::{DensityMatrix, Pauli, PauliString, StateError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Read-only view over a statevector with analysis helpers
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use qsv_sim::StateAnalyzer;
///
/// let h = std::f64::consts::FRAC_1_SQRT_2;
/// let plus = [Complex64::new(h, 0.0), Complex64::new(h, 0.0)];
///
/// let analyzer = StateAnalyzer::new(&plus).unwrap();
/// let bloch = analyzer.bloch_vectors();
/// assert!((bloch[0].x - 1.0).abs() < 1e-12);
/// assert!((analyzer.participation_ratio() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StateAnalyzer<'a> {
    amplitudes: &'a [Complex64],
    num_qubits: usize,
    zero_tolerance: f64,
}

impl<'a> StateAnalyzer<'a> {
    /// Wrap a statevector of length 2^n, n ≥ 1
    pub fn new(amplitudes: &'a [Complex64]) -> Result<Self> {
        let dimension = amplitudes.len();
        if dimension < 2 || !dimension.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension }.into());
        }
        Ok(Self {
            amplitudes,
            num_qubits: dimension.trailing_zeros() as usize,
            zero_tolerance: 1e-12,
        })
    }

    /// Modulus at or below which an amplitude counts as zero
    pub fn with_zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = tolerance;
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &'a [Complex64] {
        self.amplitudes
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// Full ψψ†
    pub fn density_matrix(&self) -> Result<DensityMatrix> {
        Ok(DensityMatrix::from_state_vector(self.num_qubits, self.amplitudes)?)
    }

    /// Reduced density matrix of `keep`, tracing out the rest
    pub fn reduced_density_matrix(&self, keep: &[usize]) -> Result<DensityMatrix> {
        Ok(DensityMatrix::reduced_from_state(
            self.amplitudes,
            self.num_qubits,
            keep,
        )?)
    }

    /// Bloch vector of one qubit's reduced state
    ///
    /// The components equal ⟨X_q⟩, ⟨Y_q⟩ and ⟨Z_q⟩. Its length is 1 when the
    /// qubit is unentangled with the rest and 0 when its marginal is
    /// maximally mixed.
    ///
    /// Summed over amplitude pairs (a, b) = (ψᵢ, ψᵢ₊ₘ) differing only in
    /// the qubit: x = 2·Re(a*b), y = 2·Im(a*b), z = |a|² - |b|².
    pub fn bloch_vector(&self, qubit: usize) -> Result<BlochVector> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            }
            .into());
        }

        let id = QubitId::new(qubit);
        let mask = id.mask();
        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        for i in (0..self.amplitudes.len()).filter(|i| i & mask == 0) {
            let a = self.amplitudes[i];
            let b = self.amplitudes[i | mask];
            let coherence = a.conj() * b;
            x += 2.0 * coherence.re;
            y += 2.0 * coherence.im;
            z += a.norm_sqr() - b.norm_sqr();
        }

        Ok(BlochVector {
            x,
            y,
            z,
            qubit,
            label: id.label(),
        })
    }

    /// Bloch vectors of every qubit in index order
    pub fn bloch_vectors(&self) -> Vec<BlochVector> {
        (0..self.num_qubits)
            .filter_map(|q| self.bloch_vector(q).ok())
            .collect()
    }

    /// ⟨ψ|P_q|ψ⟩ with `pauli` on `qubit` and identity elsewhere
    pub fn expectation(&self, qubit: usize, pauli: Pauli) -> Result<f64> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            }
            .into());
        }
        Ok(PauliString::single(self.num_qubits, qubit, pauli).expectation_value(self.amplitudes)?)
    }

    /// ⟨X⟩, ⟨Y⟩, ⟨Z⟩ on every qubit, evaluated against the full state
    pub fn expectation_values(&self) -> Result<ExpectationValues> {
        let mut values = ExpectationValues::default();
        for q in 0..self.num_qubits {
            values.x.push(self.expectation(q, Pauli::X)?);
            values.y.push(self.expectation(q, Pauli::Y)?);
            values.z.push(self.expectation(q, Pauli::Z)?);
        }
        Ok(values)
    }

    /// Von Neumann entropy (bits) of `partition` against its complement
    ///
    /// An empty partition or one covering the whole register has entropy 0.
    /// For a pure state both sides have the same spectrum, so the smaller
    /// side is the one reduced.
    pub fn entanglement_entropy(&self, partition: &[usize]) -> Result<f64> {
        let side: BTreeSet<usize> = partition.iter().copied().collect();
        if let Some(&q) = side.iter().find(|&&q| q >= self.num_qubits) {
            return Err(StateError::InvalidQubitIndex {
                index: q,
                num_qubits: self.num_qubits,
            }
            .into());
        }
        if side.is_empty() || side.len() >= self.num_qubits {
            return Ok(0.0);
        }

        let complement: Vec<usize> = (0..self.num_qubits).filter(|q| !side.contains(q)).collect();
        let keep: Vec<usize> = if side.len() <= complement.len() {
            side.into_iter().collect()
        } else {
            complement
        };

        let rho = self.reduced_density_matrix(&keep)?;
        Ok(rho.von_neumann_entropy())
    }

    /// Entropy at every prefix cut `{0..i}` vs. the rest, keyed `cut_i`
    ///
    /// A register of n qubits has cuts `cut_1` .. `cut_{n-1}`; a single
    /// qubit has none. Keys are ordered as strings, so `cut_10` sorts
    /// before `cut_2`.
    ///
    /// # Example
    /// ```
    /// use num_complex::Complex64;
    /// use qsv_sim::StateAnalyzer;
    ///
    /// // GHZ on 3 qubits: every cut carries one bit of entanglement
    /// let h = std::f64::consts::FRAC_1_SQRT_2;
    /// let mut ghz = vec![Complex64::new(0.0, 0.0); 8];
    /// ghz[0] = Complex64::new(h, 0.0);
    /// ghz[7] = Complex64::new(h, 0.0);
    ///
    /// let entropies = StateAnalyzer::new(&ghz).unwrap().entanglement_entropies().unwrap();
    /// assert_eq!(entropies.len(), 2);
    /// assert!((entropies["cut_2"] - 1.0).abs() < 1e-9);
    /// ```
    pub fn entanglement_entropies(&self) -> Result<BTreeMap<String, f64>> {
        let mut entropies = BTreeMap::new();
        for cut in 1..self.num_qubits {
            let prefix: Vec<usize> = (0..cut).collect();
            entropies.insert(format!("cut_{cut}"), self.entanglement_entropy(&prefix)?);
        }
        Ok(entropies)
    }

    /// Inverse participation ratio 1 / Σ pᵢ²
    ///
    /// Counts how many basis states the state effectively spreads over:
    /// d for a uniform superposition of d states, 1 for a basis state.
    /// A zero vector reports 1.
    pub fn participation_ratio(&self) -> f64 {
        let sum_sq: f64 = self.amplitudes.iter().map(|amp| amp.norm_sqr().powi(2)).sum();
        if sum_sq > 0.0 {
            1.0 / sum_sq
        } else {
            1.0
        }
    }

    /// Amplitudes with modulus above the zero tolerance
    pub fn num_nonzero_amplitudes(&self) -> usize {
        self.amplitudes
            .iter()
            .filter(|amp| amp.norm() > self.zero_tolerance)
            .count()
    }

    /// Probabilities, Bloch vectors, prefix-cut entropies, participation
    /// ratio and support size in one pass
    pub fn summary(&self) -> Result<CircuitAnalysis> {
        let analysis = CircuitAnalysis {
            probabilities: self.probabilities(),
            bloch_vectors: self.bloch_vectors(),
            entanglement_entropies: self.entanglement_entropies()?,
            participation_ratio: self.participation_ratio(),
            num_nonzero_amplitudes: self.num_nonzero_amplitudes(),
        };
        debug!(
            num_qubits = self.num_qubits,
            participation_ratio = analysis.participation_ratio,
            nonzero = analysis.num_nonzero_amplitudes,
            "state analyzed"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn ghz(n: usize) -> Vec<Complex64> {
        let mut amps = vec![c(0.0, 0.0); 1 << n];
        amps[0] = c(FRAC_1_SQRT_2, 0.0);
        amps[(1 << n) - 1] = c(FRAC_1_SQRT_2, 0.0);
        amps
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(StateAnalyzer::new(&[c(1.0, 0.0)]).is_err());
        assert!(StateAnalyzer::new(&[c(1.0, 0.0); 3]).is_err());
    }

    #[test]
    fn test_bloch_matches_reduced_density() {
        let raw: Vec<Complex64> = (0..8).map(|i| c(0.3 + i as f64, 1.0 - 0.2 * i as f64)).collect();
        let norm = raw.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        let amps: Vec<Complex64> = raw.iter().map(|a| a / norm).collect();
        let analyzer = StateAnalyzer::new(&amps).unwrap();

        for q in 0..3 {
            let direct = analyzer.bloch_vector(q).unwrap();
            let [x, y, z] = analyzer.reduced_density_matrix(&[q]).unwrap().bloch_vector().unwrap();
            assert_relative_eq!(direct.x, x, epsilon = 1e-12);
            assert_relative_eq!(direct.y, y, epsilon = 1e-12);
            assert_relative_eq!(direct.z, z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_expectations_agree_with_bloch() {
        let amps = [c(0.6, 0.0), c(0.0, 0.0), c(0.0, 0.8), c(0.0, 0.0)];
        let analyzer = StateAnalyzer::new(&amps).unwrap();
        let values = analyzer.expectation_values().unwrap();
        for (q, bloch) in analyzer.bloch_vectors().iter().enumerate() {
            assert_relative_eq!(values.x[q], bloch.x, epsilon = 1e-9);
            assert_relative_eq!(values.y[q], bloch.y, epsilon = 1e-9);
            assert_relative_eq!(values.z[q], bloch.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ghz_entropies() {
        let amps = ghz(4);
        let analyzer = StateAnalyzer::new(&amps).unwrap();
        let entropies = analyzer.entanglement_entropies().unwrap();

        assert_eq!(entropies.len(), 3);
        for cut in ["cut_1", "cut_2", "cut_3"] {
            assert_relative_eq!(entropies[cut], 1.0, epsilon = 1e-9);
        }
        assert_relative_eq!(analyzer.entanglement_entropy(&[3, 0, 3]).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_entropy_degenerate_partitions() {
        let amps = ghz(2);
        let analyzer = StateAnalyzer::new(&amps).unwrap();
        assert_eq!(analyzer.entanglement_entropy(&[]).unwrap(), 0.0);
        assert_eq!(analyzer.entanglement_entropy(&[0, 1]).unwrap(), 0.0);
        assert!(analyzer.entanglement_entropy(&[5]).is_err());
    }

    #[test]
    fn test_product_state_has_no_entropy() {
        let half = 0.5;
        let amps = [c(half, 0.0); 4];
        let analyzer = StateAnalyzer::new(&amps).unwrap();
        assert_relative_eq!(analyzer.entanglement_entropy(&[0]).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(analyzer.participation_ratio(), 4.0, epsilon = 1e-12);
        assert_eq!(analyzer.num_nonzero_amplitudes(), 4);
    }

    #[test]
    fn test_single_qubit_has_no_cuts() {
        let amps = [c(1.0, 0.0), c(0.0, 0.0)];
        let summary = StateAnalyzer::new(&amps).unwrap().summary().unwrap();
        assert!(summary.entanglement_entropies.is_empty());
        assert_relative_eq!(summary.participation_ratio, 1.0);
        assert_eq!(summary.num_nonzero_amplitudes, 1);
    }
}
