//! Density matrix representation
//!
//! Full density matrices are O(4^n) in memory and are only built for small
//! registers. Reduced states of a statevector are built directly from the
//! amplitudes with [`DensityMatrix::reduced_from_state`], which never forms
//! the full matrix.
//!
//! # Example
//!
//! ```
//! use qsv_state::DensityMatrix;
//! use num_complex::Complex64;
//!
//! // Bell state (|00⟩ + |11⟩)/√2
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let bell = [
//!     Complex64::new(h, 0.0),
//!     Complex64::new(0.0, 0.0),
//!     Complex64::new(0.0, 0.0),
//!     Complex64::new(h, 0.0),
//! ];
//! let rho = DensityMatrix::from_state_vector(2, &bell).unwrap();
//! assert!((rho.purity() - 1.0).abs() < 1e-10);
//!
//! let rho_a = rho.partial_trace(&[1]).unwrap();
//! assert!((rho_a.purity() - 0.5).abs() < 1e-10);
//! ```

use crate::error::{Result, StateError};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::fmt;

/// Eigenvalues at or below this are dropped from the entropy sum
pub const EIGENVALUE_FLOOR: f64 = 1e-12;

/// Density matrix ρ of an n-qubit register
///
/// Stored row-major with `dimension²` entries, where `dimension = 2^n`.
/// Basis indices follow the register convention: bit `q` of a row or
/// column index is qubit `q`.
///
/// A valid density matrix is Hermitian, has unit trace and is positive
/// semidefinite; [`DensityMatrix::is_valid`] checks all three.
#[derive(Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    dimension: usize,
    matrix: Vec<Complex64>,
}

impl DensityMatrix {
    /// |ψ⟩⟨ψ| for a pure state
    ///
    /// Allocates 4^n entries; prefer [`DensityMatrix::reduced_from_state`]
    /// when only a subsystem is needed.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_state_vector(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        check_length(num_qubits, amplitudes)?;
        let dimension = amplitudes.len();

        let mut matrix = Vec::with_capacity(dimension * dimension);
        for a in amplitudes {
            for b in amplitudes {
                matrix.push(a * b.conj());
            }
        }

        Ok(Self {
            num_qubits,
            dimension,
            matrix,
        })
    }

    /// Reduced density matrix of the qubits in `keep`, straight from amplitudes
    ///
    /// Bit `j` of a reduced index is the `j`-th lowest kept qubit. Cost is
    /// O(2^(n-k) · 4^k) time and O(4^k) memory for k kept qubits.
    ///
    /// # Errors
    /// Returns error on a bad amplitude length, an out-of-range qubit or a
    /// qubit listed twice
    pub fn reduced_from_state(
        amplitudes: &[Complex64],
        num_qubits: usize,
        keep: &[usize],
    ) -> Result<Self> {
        check_length(num_qubits, amplitudes)?;

        let mut kept = keep.to_vec();
        kept.sort_unstable();
        for pair in kept.windows(2) {
            if pair[0] == pair[1] {
                return Err(StateError::DuplicateQubit(pair[0]));
            }
        }
        if let Some(&q) = kept.iter().find(|&&q| q >= num_qubits) {
            return Err(StateError::InvalidQubitIndex {
                index: q,
                num_qubits,
            });
        }
        let traced: Vec<usize> = (0..num_qubits).filter(|q| !kept.contains(q)).collect();

        let reduced_dim = 1usize << kept.len();
        let kept_offsets: Vec<usize> = (0..reduced_dim).map(|r| scatter(r, &kept)).collect();

        let mut matrix = vec![Complex64::new(0.0, 0.0); reduced_dim * reduced_dim];
        let mut block = vec![Complex64::new(0.0, 0.0); reduced_dim];

        for env in 0..(1usize << traced.len()) {
            let base = scatter(env, &traced);
            for (slot, offset) in block.iter_mut().zip(&kept_offsets) {
                *slot = amplitudes[base | offset];
            }
            if block.iter().all(|amp| amp.norm_sqr() == 0.0) {
                continue;
            }
            for (r, a) in block.iter().enumerate() {
                let row = &mut matrix[r * reduced_dim..(r + 1) * reduced_dim];
                for (entry, b) in row.iter_mut().zip(&block) {
                    *entry += a * b.conj();
                }
            }
        }

        Ok(Self {
            num_qubits: kept.len(),
            dimension: reduced_dim,
            matrix,
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// Row-major entries, `ρ[i][j]` at `i * dimension + j`
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Nested rows, the shape used in analysis reports
    pub fn to_rows(&self) -> Vec<Vec<Complex64>> {
        self.matrix
            .chunks(self.dimension)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Tr(ρ)
    pub fn trace(&self) -> f64 {
        (0..self.dimension).map(|i| self.get(i, i).re).sum()
    }

    /// Tr(ρ²): 1 for pure states, down to 1/d for the maximally mixed state
    pub fn purity(&self) -> f64 {
        let dim = self.dimension;
        let mut trace = Complex64::new(0.0, 0.0);
        for i in 0..dim {
            for j in 0..dim {
                trace += self.get(i, j) * self.get(j, i);
            }
        }
        trace.re
    }

    /// Whether ρᵢⱼ = ρⱼᵢ* for every entry, within `tolerance`
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        (0..self.dimension).all(|i| {
            (i..self.dimension).all(|j| (self.get(i, j) - self.get(j, i).conj()).norm() <= tolerance)
        })
    }

    /// Hermitian, unit trace and positive semidefinite within `tolerance`
    pub fn is_valid(&self, tolerance: f64) -> bool {
        (self.trace() - 1.0).abs() <= tolerance
            && self.is_hermitian(tolerance)
            && self.eigenvalues().iter().all(|&lambda| lambda >= -tolerance)
    }

    /// Eigenvalues of the Hermitian matrix, ascending
    ///
    /// Uses nalgebra's symmetric (Hermitian) eigensolver, so the values are
    /// real. For a valid state they lie in [0, 1] and sum to 1, up to
    /// rounding that can leave tiny negative values.
    pub fn eigenvalues(&self) -> Vec<f64> {
        let m = DMatrix::from_row_slice(self.dimension, self.dimension, &self.matrix);
        let mut values: Vec<f64> = m.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// S = -Σ λ log₂ λ over eigenvalues above [`EIGENVALUE_FLOOR`]
    ///
    /// 0 for pure states, n for the maximally mixed n-qubit state.
    pub fn von_neumann_entropy(&self) -> f64 {
        let entropy: f64 = self
            .eigenvalues()
            .into_iter()
            .filter(|&lambda| lambda > EIGENVALUE_FLOOR)
            .map(|lambda| -lambda * lambda.log2())
            .sum();
        entropy.max(0.0)
    }

    /// Bloch components `(Tr ρσx, Tr ρσy, Tr ρσz)` of a one-qubit matrix
    ///
    /// The vector has length 1 for a pure state and 0 for the maximally
    /// mixed state I/2.
    ///
    /// # Errors
    /// Returns error unless the matrix is 2×2
    pub fn bloch_vector(&self) -> Result<[f64; 3]> {
        if self.dimension != 2 {
            return Err(StateError::DimensionMismatch {
                expected: 2,
                actual: self.dimension,
            });
        }
        let rho01 = self.get(0, 1);
        Ok([
            2.0 * rho01.re,
            -2.0 * rho01.im,
            self.get(0, 0).re - self.get(1, 1).re,
        ])
    }

    /// Trace out `trace_qubits`, keeping the rest in ascending order
    ///
    /// ρ_A = Σ_e ⟨e|ρ|e⟩ over basis states `e` of the traced qubits. Bit
    /// `j` of a reduced index is the `j`-th lowest kept qubit.
    ///
    /// # Example
    /// ```
    /// use num_complex::Complex64;
    /// use qsv_state::DensityMatrix;
    ///
    /// // |10⟩: qubit 1 is 1, qubit 0 is 0
    /// let mut amps = vec![Complex64::new(0.0, 0.0); 4];
    /// amps[0b10] = Complex64::new(1.0, 0.0);
    /// let rho = DensityMatrix::from_state_vector(2, &amps).unwrap();
    ///
    /// let rho_q1 = rho.partial_trace(&[0]).unwrap();
    /// assert_eq!(rho_q1.dimension(), 2);
    /// assert_eq!(rho_q1.get(1, 1), Complex64::new(1.0, 0.0));
    /// ```
    ///
    /// # Errors
    /// Returns error if a traced qubit is out of range
    pub fn partial_trace(&self, trace_qubits: &[usize]) -> Result<Self> {
        for &q in trace_qubits {
            if q >= self.num_qubits {
                return Err(StateError::InvalidQubitIndex {
                    index: q,
                    num_qubits: self.num_qubits,
                });
            }
        }

        let kept: Vec<usize> = (0..self.num_qubits)
            .filter(|q| !trace_qubits.contains(q))
            .collect();
        let traced: Vec<usize> = (0..self.num_qubits)
            .filter(|q| trace_qubits.contains(q))
            .collect();

        let reduced_dim = 1usize << kept.len();
        let mut reduced = vec![Complex64::new(0.0, 0.0); reduced_dim * reduced_dim];

        for env in 0..(1usize << traced.len()) {
            let base = scatter(env, &traced);
            for r in 0..reduced_dim {
                let i = base | scatter(r, &kept);
                for c in 0..reduced_dim {
                    let j = base | scatter(c, &kept);
                    reduced[r * reduced_dim + c] += self.get(i, j);
                }
            }
        }

        Ok(Self {
            num_qubits: kept.len(),
            dimension: reduced_dim,
            matrix: reduced,
        })
    }
}

/// Spread the low bits of `value` onto the bit positions in `qubits`
fn scatter(value: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .filter(|(bit, _)| value >> bit & 1 == 1)
        .fold(0, |acc, (_, &q)| acc | 1 << q)
}

fn check_length(num_qubits: usize, amplitudes: &[Complex64]) -> Result<()> {
    let expected = 1usize
        .checked_shl(num_qubits as u32)
        .ok_or(StateError::InvalidDimension { dimension: 0 })?;
    if amplitudes.len() != expected {
        return Err(StateError::DimensionMismatch {
            expected,
            actual: amplitudes.len(),
        });
    }
    Ok(())
}

impl fmt::Debug for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DensityMatrix {{ qubits: {}, dim: {}, purity: {:.4} }}",
            self.num_qubits,
            self.dimension,
            self.purity()
        )
    }
}
