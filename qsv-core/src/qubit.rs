//! Qubit addressing and the basis-index bit convention

use std::fmt;

/// Type-safe identifier for a qubit in the register
///
/// Qubit `q` corresponds to bit `q` of a computational basis index, so
/// qubit 0 is the least significant bit.
///
/// # Example
/// ```
/// use qsv_core::QubitId;
///
/// let q2 = QubitId::new(2);
/// assert_eq!(q2.mask(), 0b100);
/// assert!(q2.is_set(0b110));
/// assert_eq!(q2.label(), "q2");
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Underlying register index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit mask selecting this qubit within a basis index
    #[inline]
    pub const fn mask(&self) -> usize {
        1usize << self.0
    }

    /// Whether this qubit reads `1` in the given basis index
    #[inline]
    pub const fn is_set(&self, basis_index: usize) -> bool {
        basis_index & self.mask() != 0
    }

    /// Display label used by analysis outputs (`q0`, `q1`, ...)
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

/// Render a classical register value as a bitstring, bit 0 rightmost
///
/// ```
/// use qsv_core::qubit::format_bitstring;
///
/// assert_eq!(format_bitstring(0b01, 2), "01");
/// assert_eq!(format_bitstring(0b110, 4), "0110");
/// ```
pub fn format_bitstring(value: usize, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}
