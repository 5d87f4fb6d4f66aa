//! In-place strided kernels over raw amplitude slices
//!
//! None of these materialize the full 2^n × 2^n operator. Callers check
//! qubit bounds; the kernels only assume `state.len()` is a power of two
//! larger than every mask they touch.

use num_complex::Complex64;
use qsv_core::Matrix2;

/// Apply a 2×2 matrix to every amplitude pair differing only in `qubit`
///
/// For each index `i` with bit `qubit` clear and `j = i | mask`:
/// `(ψᵢ, ψⱼ) ← M · (ψᵢ, ψⱼ)`.
pub fn apply_single_qubit(state: &mut [Complex64], matrix: &Matrix2, qubit: usize) {
    apply_masked(state, matrix, 0, qubit);
}

/// Apply a 2×2 matrix on `target` where every bit in `control_mask` is set
pub fn apply_controlled(
    state: &mut [Complex64],
    matrix: &Matrix2,
    control_mask: usize,
    target: usize,
) {
    apply_masked(state, matrix, control_mask, target);
}

#[inline]
fn apply_masked(state: &mut [Complex64], matrix: &Matrix2, control_mask: usize, target: usize) {
    let target_mask = 1usize << target;

    let m00 = matrix[0][0];
    let m01 = matrix[0][1];
    let m10 = matrix[1][0];
    let m11 = matrix[1][1];

    for i in 0..state.len() {
        if i & target_mask != 0 || i & control_mask != control_mask {
            continue;
        }
        let j = i | target_mask;

        let amp0 = state[i];
        let amp1 = state[j];
        state[i] = m00 * amp0 + m01 * amp1;
        state[j] = m10 * amp0 + m11 * amp1;
    }
}

/// Exchange the roles of qubits `a` and `b`
///
/// Only amplitudes with bit a = 1 and bit b = 0 move; each swaps with
/// its partner that has the two bits exchanged.
pub fn apply_swap(state: &mut [Complex64], a: usize, b: usize) {
    let mask_a = 1usize << a;
    let mask_b = 1usize << b;

    for i in 0..state.len() {
        if i & mask_a != 0 && i & mask_b == 0 {
            state.swap(i, (i & !mask_a) | mask_b);
        }
    }
}

/// Total probability of finding `qubit` in |1⟩
pub fn probability_of_one(state: &[Complex64], qubit: usize) -> f64 {
    let mask = 1usize << qubit;
    state
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx & mask != 0)
        .map(|(_, amp)| amp.norm_sqr())
        .sum()
}

/// Sum of squared magnitudes
pub fn norm_sqr(state: &[Complex64]) -> f64 {
    state.iter().map(|amp| amp.norm_sqr()).sum()
}

/// Multiply every amplitude by `factor`
pub fn scale(state: &mut [Complex64], factor: f64) {
    for amp in state.iter_mut() {
        *amp *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsv_core::matrices;

    fn basis(dim: usize, index: usize) -> Vec<Complex64> {
        let mut state = vec![Complex64::new(0.0, 0.0); dim];
        state[index] = Complex64::new(1.0, 0.0);
        state
    }

    #[test]
    fn test_x_on_high_qubit() {
        let mut state = basis(8, 0);
        apply_single_qubit(&mut state, &matrices::PAULI_X, 2);
        assert_relative_eq!(state[4].re, 1.0);
        assert_relative_eq!(state[0].norm(), 0.0);
    }

    #[test]
    fn test_controlled_respects_all_controls() {
        // |011⟩: q0 = q1 = 1
        let mut state = basis(8, 0b011);
        apply_controlled(&mut state, &matrices::PAULI_X, 0b011, 2);
        assert_relative_eq!(state[0b111].re, 1.0);

        // |001⟩: q1 = 0, untouched
        let mut state = basis(8, 0b001);
        apply_controlled(&mut state, &matrices::PAULI_X, 0b011, 2);
        assert_relative_eq!(state[0b001].re, 1.0);
    }

    #[test]
    fn test_swap() {
        let mut state = basis(4, 0b01);
        apply_swap(&mut state, 0, 1);
        assert_relative_eq!(state[0b10].re, 1.0);
        apply_swap(&mut state, 1, 0);
        assert_relative_eq!(state[0b01].re, 1.0);
    }

    #[test]
    fn test_probability_of_one() {
        let mut state = basis(2, 0);
        apply_single_qubit(&mut state, &matrices::HADAMARD, 0);
        assert_relative_eq!(probability_of_one(&state, 0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(norm_sqr(&state), 1.0, epsilon = 1e-12);
    }
}
