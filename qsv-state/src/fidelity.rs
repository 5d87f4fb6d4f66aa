//! Overlap and fidelity between pure states

use crate::error::{Result, StateError};
use num_complex::Complex64;

/// Added to each norm so near-zero vectors never divide by zero
pub const NORM_EPSILON: f64 = 1e-12;

/// ⟨a|b⟩ = Σ conj(aᵢ)·bᵢ
pub fn inner_product(a: &[Complex64], b: &[Complex64]) -> Result<Complex64> {
    if a.len() != b.len() {
        return Err(StateError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x.conj() * y).sum())
}

/// |⟨v2|v1⟩|² after normalizing each vector
///
/// Each vector is divided by `norm + 1e-12`, so a zero vector yields 0
/// rather than NaN. The result is clamped to `[0, 1]`.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use qsv_state::state_fidelity;
///
/// let zero = [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
/// let one = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
/// assert_eq!(state_fidelity(&zero, &one).unwrap(), 0.0);
/// ```
///
/// # Errors
/// Returns [`StateError::DimensionMismatch`] for vectors of different length
pub fn state_fidelity(v1: &[Complex64], v2: &[Complex64]) -> Result<f64> {
    let overlap = inner_product(v2, v1)?;
    let n1 = norm(v1) + NORM_EPSILON;
    let n2 = norm(v2) + NORM_EPSILON;
    let fidelity = overlap.norm_sqr() / (n1 * n1 * n2 * n2);
    Ok(fidelity.clamp(0.0, 1.0))
}

fn norm(v: &[Complex64]) -> f64 {
    v.iter().map(|amp| amp.norm_sqr()).sum::<f64>().sqrt()
}
