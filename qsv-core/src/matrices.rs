//! Gate matrices
//!
//! Fixed gates are compile-time constants; parametrized gates are built on
//! demand. All matrices are row-major `[[m00, m01], [m10, m11]]` acting on
//! `(|0⟩, |1⟩)` of the target qubit.

use crate::gate::Matrix2;
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// X = [[0, 1], [1, 0]]
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Y = [[0, -i], [i, 0]]
pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

/// Z = [[1, 0], [0, -1]]
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// H = 1/√2 [[1, 1], [1, -1]]
pub const HADAMARD: Matrix2 = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

/// S = diag(1, i)
pub const S_GATE: Matrix2 = [[ONE, ZERO], [ZERO, I]];

/// T = diag(1, e^(iπ/4))
pub const T_GATE: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)]];

/// RX(θ) = [[cos θ/2, -i sin θ/2], [-i sin θ/2, cos θ/2]]
pub fn rx(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
    ]
}

/// RY(θ) = [[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]
pub fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

/// RZ(θ) = diag(e^(-iθ/2), e^(iθ/2))
pub fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// P(λ) = diag(1, e^(iλ)); also U1
pub fn phase(lambda: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, lambda)]]
}

/// General single-qubit unitary
///
/// U(θ,φ,λ) = [[cos θ/2, -e^(iλ) sin θ/2], [e^(iφ) sin θ/2, e^(i(φ+λ)) cos θ/2]]
pub fn u3(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), -Complex64::from_polar(s, lambda)],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

/// U2(φ,λ) = U(π/2, φ, λ)
pub fn u2(phi: f64, lambda: f64) -> Matrix2 {
    u3(std::f64::consts::FRAC_PI_2, phi, lambda)
}

/// Conjugate transpose of a 2×2 matrix
pub fn adjoint(m: &Matrix2) -> Matrix2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Matrix product `a · b`
pub fn multiply(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[ZERO; 2]; 2];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

/// Check `U† U ≈ I` elementwise
pub fn is_unitary(m: &Matrix2, tolerance: f64) -> bool {
    let product = multiply(&adjoint(m), m);
    product
        .iter()
        .flatten()
        .zip(IDENTITY.iter().flatten())
        .all(|(a, b)| (a - b).norm() <= tolerance)
}
