//! Circuit instructions combining operations with operands.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{Clbit, Qubit};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(Gate),
    /// Measurement: `qubits[i]` is read into `clbits[i]`.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (ordering fence, no effect on the state).
    Barrier,
    /// Force the operand qubits into an explicit state.
    ///
    /// Amplitudes are little-endian over the operand list.
    Initialize {
        /// Target amplitudes, length `2^qubits.len()`.
        amplitudes: Vec<Complex64>,
    },
    /// Record the full state vector under a label.
    Snapshot {
        /// Slot label the state is stored under.
        label: String,
    },
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<Qubit>,
    /// Classical bits this instruction operates on (for measure).
    #[serde(default)]
    pub clbits: Vec<Clbit>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = Qubit>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: Qubit) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: Qubit, q2: Qubit) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: Qubit, clbit: Clbit) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    ///
    /// Operand counts are checked when the instruction is appended to a circuit.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = Qubit>,
        clbits: impl IntoIterator<Item = Clbit>,
    ) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: qubits.into_iter().collect(),
            clbits: clbits.into_iter().collect(),
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: Qubit) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = Qubit>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create an initialize instruction.
    pub fn initialize(
        amplitudes: impl IntoIterator<Item = Complex64>,
        qubits: impl IntoIterator<Item = Qubit>,
    ) -> Self {
        Self {
            kind: InstructionKind::Initialize {
                amplitudes: amplitudes.into_iter().collect(),
            },
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a snapshot instruction.
    ///
    /// Snapshots always capture the whole state, so they carry no operands.
    pub fn snapshot(label: impl Into<String>) -> Self {
        Self {
            kind: InstructionKind::Snapshot {
                label: label.into(),
            },
            qubits: vec![],
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this is an initialize.
    pub fn is_initialize(&self) -> bool {
        matches!(self.kind, InstructionKind::Initialize { .. })
    }

    /// Check if this is a snapshot.
    pub fn is_snapshot(&self) -> bool {
        matches!(self.kind, InstructionKind::Snapshot { .. })
    }

    /// Whether executing this instruction draws random numbers.
    pub fn is_stochastic(&self) -> bool {
        self.is_measure() || self.is_reset()
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Initialize { .. } => "initialize",
            InstructionKind::Snapshot { .. } => "snapshot",
        }
    }
}
