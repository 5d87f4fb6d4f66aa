//! Pauli observables and expectation values ⟨ψ|P|ψ⟩
//!
//! A Pauli string is written with qubit 0 rightmost, matching bitstring
//! order: `"XIZ"` is Z on qubit 0, I on qubit 1 and X on qubit 2.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(StateError::InvalidPauli(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// I and Z do not move amplitudes between basis states
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }
}

/// Tensor product of single-qubit Paulis, indexed by qubit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    /// Paulis in qubit order (`paulis[q]` acts on qubit q)
    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    /// `pauli` on `qubit`, identity elsewhere
    pub fn single(num_qubits: usize, qubit: usize, pauli: Pauli) -> Self {
        let mut paulis = vec![Pauli::I; num_qubits];
        if let Some(slot) = paulis.get_mut(qubit) {
            *slot = pauli;
        }
        Self { paulis }
    }

    pub fn identity(num_qubits: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; num_qubits],
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        self.paulis.get(qubit).copied()
    }

    pub fn is_diagonal(&self) -> bool {
        self.paulis.iter().all(|p| p.is_diagonal())
    }

    /// ⟨ψ|P|ψ⟩ for a normalized statevector
    ///
    /// P|i⟩ = phase(i)·|i ⊕ flip⟩ where `flip` marks the X and Y positions,
    /// so the sum runs once over the amplitudes.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`, or if the string
    /// is too long for any statevector to match
    pub fn expectation_value(&self, amplitudes: &[Complex64]) -> Result<f64> {
        let expected = u32::try_from(self.paulis.len())
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or(StateError::InvalidDimension {
                dimension: amplitudes.len(),
            })?;
        if amplitudes.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }

        let mut flip_mask = 0usize;
        let mut z_mask = 0usize;
        let mut y_mask = 0usize;
        for (q, pauli) in self.paulis.iter().enumerate() {
            match pauli {
                Pauli::I => {}
                Pauli::X => flip_mask |= 1 << q,
                Pauli::Y => {
                    flip_mask |= 1 << q;
                    y_mask |= 1 << q;
                }
                Pauli::Z => z_mask |= 1 << q,
            }
        }

        // Y = i·X·Z, so Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
        let y_count = y_mask.count_ones();
        let base_phase = match y_count % 4 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };

        let mut total = Complex64::new(0.0, 0.0);
        for (i, amp) in amplitudes.iter().enumerate() {
            if amp.norm_sqr() == 0.0 {
                continue;
            }
            let negative = ((i & (z_mask | y_mask)).count_ones() & 1) == 1;
            let sign = if negative { -1.0 } else { 1.0 };
            total += amplitudes[i ^ flip_mask].conj() * amp * sign;
        }
        Ok((total * base_phase).re)
    }
}

impl FromStr for PauliString {
    type Err = StateError;

    /// Parse a label such as `"XIZ"` (qubit 0 rightmost)
    fn from_str(s: &str) -> Result<Self> {
        let paulis = s
            .chars()
            .rev()
            .map(Pauli::from_char)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { paulis })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pauli in self.paulis.iter().rev() {
            write!(f, "{}", pauli.to_char())?;
        }
        Ok(())
    }
}
