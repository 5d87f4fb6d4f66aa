//! Recognized gate kinds and the primitive operations they lower to

use crate::QubitId;
use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];

/// Every gate name the builder understands
///
/// Parsing is case-insensitive and folds aliases (`CNOT` → `CX`,
/// `U3` → `U`, `PHASE`/`U1` → `P`, `TOFFOLI` → `CCX`, `ID` → `I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    I,
    X,
    Y,
    Z,
    H,
    S,
    T,
    Rx,
    Ry,
    Rz,
    U,
    U2,
    Phase,
    Cx,
    Cz,
    Swap,
    Crx,
    Cry,
    Crz,
    Ccx,
    Measure,
    Reset,
    Barrier,
}

impl GateKind {
    /// Parse a descriptor name; `None` for unrecognized names
    ///
    /// ```
    /// use qsv_core::GateKind;
    ///
    /// assert_eq!(GateKind::parse("cnot"), Some(GateKind::Cx));
    /// assert_eq!(GateKind::parse("U1"), Some(GateKind::Phase));
    /// assert_eq!(GateKind::parse("foo"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.trim().to_ascii_uppercase().as_str() {
            "I" | "ID" => GateKind::I,
            "X" => GateKind::X,
            "Y" => GateKind::Y,
            "Z" => GateKind::Z,
            "H" => GateKind::H,
            "S" => GateKind::S,
            "T" => GateKind::T,
            "RX" => GateKind::Rx,
            "RY" => GateKind::Ry,
            "RZ" => GateKind::Rz,
            "U" | "U3" => GateKind::U,
            "U2" => GateKind::U2,
            "P" | "PHASE" | "U1" => GateKind::Phase,
            "CX" | "CNOT" => GateKind::Cx,
            "CZ" => GateKind::Cz,
            "SWAP" => GateKind::Swap,
            "CRX" => GateKind::Crx,
            "CRY" => GateKind::Cry,
            "CRZ" => GateKind::Crz,
            "CCX" | "TOFFOLI" => GateKind::Ccx,
            "MEASURE" => GateKind::Measure,
            "RESET" => GateKind::Reset,
            "BARRIER" => GateKind::Barrier,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        match self {
            GateKind::I => "I",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::H => "H",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::U => "U",
            GateKind::U2 => "U2",
            GateKind::Phase => "P",
            GateKind::Cx => "CX",
            GateKind::Cz => "CZ",
            GateKind::Swap => "SWAP",
            GateKind::Crx => "CRX",
            GateKind::Cry => "CRY",
            GateKind::Crz => "CRZ",
            GateKind::Ccx => "CCX",
            GateKind::Measure => "MEASURE",
            GateKind::Reset => "RESET",
            GateKind::Barrier => "BARRIER",
        }
    }

    /// Number of leading parameters the gate reads
    pub fn num_params(self) -> usize {
        match self {
            GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz
            | GateKind::Phase
            | GateKind::Crx
            | GateKind::Cry
            | GateKind::Crz => 1,
            GateKind::U2 => 2,
            GateKind::U => 3,
            _ => 0,
        }
    }

    /// Number of control qubits the gate consumes per application
    pub fn num_controls(self) -> usize {
        match self {
            GateKind::Cx | GateKind::Cz | GateKind::Crx | GateKind::Cry | GateKind::Crz => 1,
            GateKind::Ccx => 2,
            _ => 0,
        }
    }

    pub fn is_unitary(self) -> bool {
        !matches!(self, GateKind::Measure | GateKind::Reset | GateKind::Barrier)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive step of a lowered circuit
///
/// Every broadcast in a descriptor has already been expanded, so each
/// variant touches a fixed, small set of qubits.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Dense 2×2 unitary on one qubit
    Single {
        kind: GateKind,
        target: QubitId,
        matrix: Matrix2,
    },

    /// 2×2 unitary on `target`, applied where every control reads 1
    Controlled {
        kind: GateKind,
        controls: SmallVec<[QubitId; 2]>,
        target: QubitId,
        matrix: Matrix2,
    },

    /// Exchange two qubits
    Swap { a: QubitId, b: QubitId },

    /// Return a qubit to |0⟩
    Reset { target: QubitId },

    /// Record the qubit's outcome into classical bit `clbit`
    Measure { qubit: QubitId, clbit: usize },

    /// Ordering fence with no computational effect
    Barrier,
}

impl Operation {
    /// The gate kind this operation came from
    pub fn kind(&self) -> GateKind {
        match self {
            Operation::Single { kind, .. } | Operation::Controlled { kind, .. } => *kind,
            Operation::Swap { .. } => GateKind::Swap,
            Operation::Reset { .. } => GateKind::Reset,
            Operation::Measure { .. } => GateKind::Measure,
            Operation::Barrier => GateKind::Barrier,
        }
    }

    /// Qubits the operation acts on (controls first, then target)
    pub fn qubits(&self) -> SmallVec<[QubitId; 3]> {
        match self {
            Operation::Single { target, .. } | Operation::Reset { target } => {
                SmallVec::from_slice(&[*target])
            }
            Operation::Controlled {
                controls, target, ..
            } => {
                let mut qubits: SmallVec<[QubitId; 3]> = controls.iter().copied().collect();
                qubits.push(*target);
                qubits
            }
            Operation::Swap { a, b } => SmallVec::from_slice(&[*a, *b]),
            Operation::Measure { qubit, .. } => SmallVec::from_slice(&[*qubit]),
            Operation::Barrier => SmallVec::new(),
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        for (i, q) in self.qubits().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        if let Operation::Measure { clbit, .. } = self {
            write!(f, " -> c{}", clbit)?;
        }
        write!(f, ")")
    }
}
