//! Dense quantum state representation
//!
//! Wraps the raw amplitude vector with bounds-checked gate application,
//! projective measurement, reset and per-shot Kraus sampling.

use crate::error::{Result, StateError};
use crate::kernels;
use num_complex::Complex64;
use qsv_core::noise::KrausOperator;
use qsv_core::Matrix2;
use std::fmt;
use tracing::warn;

/// Largest register a dense state will allocate
pub const MAX_QUBITS: usize = 30;

/// Branch weights below this are treated as empty
const BRANCH_EPSILON: f64 = 1e-15;

/// Dense 2^n amplitude vector
///
/// # Example
///
/// ```
/// use qsv_state::DenseState;
/// use qsv_core::matrices;
///
/// let mut state = DenseState::new(2).unwrap();
/// state.apply_single_qubit_gate(&matrices::HADAMARD, 0).unwrap();
///
/// assert_eq!(state.num_qubits(), 2);
/// assert!(state.is_normalized(1e-10));
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseState {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl DenseState {
    /// Create |0...0⟩
    ///
    /// # Errors
    /// Returns error if `num_qubits` is zero or exceeds [`MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a state from existing amplitudes (not renormalized)
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// 2^num_qubits
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    pub fn norm(&self) -> f64 {
        kernels::norm_sqr(&self.amplitudes).sqrt()
    }

    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() < epsilon
    }

    /// Rescale to unit norm; a zero vector is left untouched
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm < BRANCH_EPSILON {
            warn!("cannot normalize a zero state vector");
            return;
        }
        kernels::scale(&mut self.amplitudes, 1.0 / norm);
    }

    /// |ψᵢ|² for every basis index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// Apply a 2×2 unitary to one qubit
    pub fn apply_single_qubit_gate(&mut self, matrix: &Matrix2, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, qubit);
        Ok(())
    }

    /// Apply a 2×2 unitary on `target` conditioned on every control being |1⟩
    pub fn apply_controlled_gate(
        &mut self,
        matrix: &Matrix2,
        controls: &[usize],
        target: usize,
    ) -> Result<()> {
        self.check_qubit(target)?;
        let mut control_mask = 0usize;
        for &control in controls {
            self.check_qubit(control)?;
            let bit = 1usize << control;
            if control == target || control_mask & bit != 0 {
                return Err(StateError::DuplicateQubit(control));
            }
            control_mask |= bit;
        }
        kernels::apply_controlled(&mut self.amplitudes, matrix, control_mask, target);
        Ok(())
    }

    pub fn apply_swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b {
            return Err(StateError::DuplicateQubit(a));
        }
        kernels::apply_swap(&mut self.amplitudes, a, b);
        Ok(())
    }

    /// Probability of measuring `qubit` as 1
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        Ok(kernels::probability_of_one(&self.amplitudes, qubit))
    }

    /// Deterministic reset of `qubit` to |0⟩
    ///
    /// Amplitudes with the qubit in |1⟩ are discarded and the rest
    /// renormalized. When the |0⟩ branch is empty the |1⟩ branch is moved
    /// onto it instead, which is where a measure-and-flip reset lands.
    pub fn reset_qubit(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        let p_one = kernels::probability_of_one(&self.amplitudes, qubit);
        let p_zero = kernels::norm_sqr(&self.amplitudes) - p_one;

        if p_zero > BRANCH_EPSILON {
            for (idx, amp) in self.amplitudes.iter_mut().enumerate() {
                if idx & mask != 0 {
                    *amp = Complex64::new(0.0, 0.0);
                }
            }
            kernels::scale(&mut self.amplitudes, 1.0 / p_zero.sqrt());
        } else {
            for idx in 0..self.amplitudes.len() {
                if idx & mask != 0 {
                    self.amplitudes[idx & !mask] = self.amplitudes[idx];
                    self.amplitudes[idx] = Complex64::new(0.0, 0.0);
                }
            }
            self.normalize();
        }
        Ok(())
    }

    /// Projective measurement of one qubit
    ///
    /// `random_value` in `[0, 1)` selects the outcome: 0 if it falls below
    /// P(0). The state collapses onto the observed branch.
    pub fn measure_qubit(&mut self, qubit: usize, random_value: f64) -> Result<u8> {
        self.check_qubit(qubit)?;

        let p_one = kernels::probability_of_one(&self.amplitudes, qubit);
        let p_zero = (kernels::norm_sqr(&self.amplitudes) - p_one).max(0.0);

        let mut outcome = u8::from(random_value >= p_zero);
        // a draw can land on a branch that only rounding made non-empty
        if outcome == 0 && p_zero < BRANCH_EPSILON {
            outcome = 1;
        } else if outcome == 1 && p_one < BRANCH_EPSILON {
            outcome = 0;
        }

        let branch = if outcome == 0 { p_zero } else { p_one };
        if branch < BRANCH_EPSILON {
            return Err(StateError::NotNormalized { norm: branch.sqrt() });
        }

        let inv_norm = 1.0 / branch.sqrt();
        let mask = 1usize << qubit;
        for (idx, amp) in self.amplitudes.iter_mut().enumerate() {
            if u8::from(idx & mask != 0) != outcome {
                *amp = Complex64::new(0.0, 0.0);
            } else {
                *amp *= inv_norm;
            }
        }
        Ok(outcome)
    }

    /// Apply one Kraus operator drawn with probability ‖Kᵢψ‖²
    ///
    /// The chosen operator is applied to `qubit` and the state renormalized.
    /// Returns the index of the chosen operator.
    pub fn apply_kraus_sampled(
        &mut self,
        operators: &[KrausOperator],
        qubit: usize,
        random_value: f64,
    ) -> Result<usize> {
        self.check_qubit(qubit)?;
        if operators.is_empty() {
            return Err(StateError::InvalidDimension { dimension: 0 });
        }

        let weights: Vec<f64> = operators
            .iter()
            .map(|k| self.branch_weight(&k.matrix, qubit))
            .collect();
        let total: f64 = weights.iter().sum();

        let threshold = random_value * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (index, &weight) in weights.iter().enumerate() {
            if weight <= BRANCH_EPSILON {
                continue;
            }
            cumulative += weight;
            chosen = Some(index);
            if threshold < cumulative {
                break;
            }
        }

        let Some(index) = chosen else {
            return Err(StateError::NotNormalized { norm: total.sqrt() });
        };

        kernels::apply_single_qubit(&mut self.amplitudes, &operators[index].matrix, qubit);
        kernels::scale(&mut self.amplitudes, 1.0 / weights[index].sqrt());
        Ok(index)
    }

    /// ‖K ψ‖² for a 2×2 operator on `qubit`, without modifying the state
    fn branch_weight(&self, matrix: &Matrix2, qubit: usize) -> f64 {
        let mask = 1usize << qubit;
        let mut weight = 0.0;
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let a = self.amplitudes[i];
            let b = self.amplitudes[i | mask];
            weight += (matrix[0][0] * a + matrix[0][1] * b).norm_sqr();
            weight += (matrix[1][0] * a + matrix[1][1] * b).norm_sqr();
        }
        weight
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }
}

/// 2^num_qubits, rejecting empty and oversized registers
pub(crate) fn checked_dimension(num_qubits: usize) -> Result<usize> {
    if num_qubits == 0 {
        return Err(StateError::InvalidDimension { dimension: 0 });
    }
    if num_qubits > MAX_QUBITS {
        let size = 1usize
            .checked_shl(num_qubits as u32)
            .map_or(usize::MAX, |d| d.saturating_mul(std::mem::size_of::<Complex64>()));
        return Err(StateError::AllocationError { size });
    }
    Ok(1usize << num_qubits)
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DenseState {{ qubits: {}, dim: {}, norm: {:.6} }}",
            self.num_qubits,
            self.dimension(),
            self.norm()
        )
    }
}
