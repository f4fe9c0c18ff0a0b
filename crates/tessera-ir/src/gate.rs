//! Quantum gate types.
//!
//! Gates are opaque unitaries to the rest of the crate: all the simulator
//! needs from a gate is its arity and its matrix. Matrices are row-major and
//! little-endian over the operand list, i.e. operand 0 is the least
//! significant bit of the row/column index. For `CX` that makes operand 0 the
//! control and operand 1 the target.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::{IrError, IrResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,

            _ => 1,
        }
    }

    /// Get parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::P(t)
            | StandardGate::CRz(t)
            | StandardGate::CP(t) => vec![*t],
            StandardGate::U(theta, phi, lambda) => vec![*theta, *phi, *lambda],
            _ => vec![],
        }
    }

    /// The unitary of this gate, row-major, little-endian over operands.
    pub fn matrix(&self) -> Vec<Complex64> {
        match self {
            StandardGate::I => vec![ONE, ZERO, ZERO, ONE],
            StandardGate::X => pauli_x(),
            StandardGate::Y => vec![ZERO, -I, I, ZERO],
            StandardGate::Z => phase(PI),
            StandardGate::H => hadamard(),
            StandardGate::S => phase(PI / 2.0),
            StandardGate::Sdg => phase(-PI / 2.0),
            StandardGate::T => phase(PI / 4.0),
            StandardGate::Tdg => phase(-PI / 4.0),
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                vec![a, b, b, a]
            }
            StandardGate::Rx(theta) => {
                let (c, s) = half_angle(*theta);
                let mis = Complex64::new(0.0, -s);
                vec![c.into(), mis, mis, c.into()]
            }
            StandardGate::Ry(theta) => {
                let (c, s) = half_angle(*theta);
                vec![c.into(), (-s).into(), s.into(), c.into()]
            }
            StandardGate::Rz(theta) => rz(*theta),
            StandardGate::P(theta) => phase(*theta),
            StandardGate::U(theta, phi, lambda) => {
                let (c, s) = half_angle(*theta);
                vec![
                    c.into(),
                    -Complex64::from_polar(s, *lambda),
                    Complex64::from_polar(s, *phi),
                    Complex64::from_polar(c, phi + lambda),
                ]
            }
            StandardGate::CX => controlled(1, &pauli_x()),
            StandardGate::CY => controlled(1, &StandardGate::Y.matrix()),
            StandardGate::CZ => controlled(1, &phase(PI)),
            StandardGate::CH => controlled(1, &hadamard()),
            StandardGate::Swap => swap(),
            StandardGate::CRz(theta) => controlled(1, &rz(*theta)),
            StandardGate::CP(theta) => controlled(1, &phase(*theta)),
            StandardGate::CCX => controlled(2, &pauli_x()),
            StandardGate::CSwap => controlled(1, &swap()),
        }
    }
}

fn half_angle(theta: f64) -> (f64, f64) {
    ((theta / 2.0).cos(), (theta / 2.0).sin())
}

fn pauli_x() -> Vec<Complex64> {
    vec![ZERO, ONE, ONE, ZERO]
}

fn hadamard() -> Vec<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    vec![h, h, h, -h]
}

fn phase(theta: f64) -> Vec<Complex64> {
    vec![ONE, ZERO, ZERO, Complex64::from_polar(1.0, theta)]
}

fn rz(theta: f64) -> Vec<Complex64> {
    vec![
        Complex64::from_polar(1.0, -theta / 2.0),
        ZERO,
        ZERO,
        Complex64::from_polar(1.0, theta / 2.0),
    ]
}

fn swap() -> Vec<Complex64> {
    let mut m = vec![ZERO; 16];
    for i in 0..4usize {
        let j = ((i & 1) << 1) | ((i >> 1) & 1);
        m[i * 4 + j] = ONE;
    }
    m
}

/// Lift `target` (a `d × d` unitary) to a gate controlled on the
/// `num_controls` lowest operands.
fn controlled(num_controls: u32, target: &[Complex64]) -> Vec<Complex64> {
    let d = (target.len() as f64).sqrt() as usize;
    let cmask = (1usize << num_controls) - 1;
    let dim = d << num_controls;
    let mut m = vec![ZERO; dim * dim];
    for i in 0..dim {
        for j in 0..dim {
            if i & cmask != j & cmask {
                continue;
            }
            m[i * dim + j] = if i & cmask == cmask {
                target[(i >> num_controls) * d + (j >> num_controls)]
            } else if i == j {
                ONE
            } else {
                ZERO
            };
        }
    }
    m
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom user-defined gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }
}

/// A user-defined gate given by an explicit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Parameters of the gate, carried for consumers; the matrix is authoritative.
    pub params: Vec<f64>,
    /// Unitary matrix (row-major, 2^n × 2^n).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Complex64>>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
            matrix: None,
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }

    /// Add a unitary matrix to the gate.
    ///
    /// Returns [`IrError::InvalidMatrix`] if `matrix.len()` is not
    /// `(2^num_qubits)^2`.
    pub fn with_matrix(mut self, matrix: Vec<Complex64>) -> IrResult<Self> {
        let expected = matrix_len(self.num_qubits);
        if expected != Some(matrix.len()) {
            return Err(IrError::InvalidMatrix {
                gate_name: self.name,
                expected: expected.unwrap_or(usize::MAX),
                got: matrix.len(),
            });
        }
        self.matrix = Some(matrix);
        Ok(self)
    }
}

/// Entries in a `2^n × 2^n` matrix, if that fits in memory at all.
pub(crate) fn matrix_len(num_qubits: u32) -> Option<usize> {
    let dim = 1usize.checked_shl(num_qubits)?;
    dim.checked_mul(dim)
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Get the gate parameters.
    pub fn params(&self) -> Vec<f64> {
        match &self.kind {
            GateKind::Standard(g) => g.params(),
            GateKind::Custom(g) => g.params.clone(),
        }
    }

    /// The unitary of this gate, if known.
    ///
    /// Always `Some` for standard gates; custom gates only carry one when
    /// built with [`CustomGate::with_matrix`].
    pub fn matrix(&self) -> Option<Vec<Complex64>> {
        match &self.kind {
            GateKind::Standard(g) => Some(g.matrix()),
            GateKind::Custom(g) => g.matrix.clone(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}
