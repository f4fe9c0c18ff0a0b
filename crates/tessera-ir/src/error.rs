//! Error types for the IR crate.

use crate::register::{Register, RegisterKind};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Two circuits declare a register with the same name but a different
    /// size or kind.
    #[error("Register '{}' is incompatible: {existing} vs {incoming}", .existing.name())]
    IncompatibleRegister {
        /// The register already present in the left-hand circuit.
        existing: Register,
        /// The register coming from the right-hand circuit.
        incoming: Register,
    },

    /// A register with this name already exists in the circuit.
    #[error("Register name '{0}' is already in use")]
    DuplicateRegister(String),

    /// Registers must hold at least one bit.
    #[error("Register '{0}' must have a positive size")]
    EmptyRegister(String),

    /// Register not found in circuit.
    #[error("Register '{0}' not found in circuit")]
    RegisterNotFound(String),

    /// A quantum bit was taken from a classical register or vice versa.
    #[error("Register '{register}' is {actual}, expected {expected}")]
    RegisterKindMismatch {
        /// Name of the register.
        register: String,
        /// Kind the operation required.
        expected: RegisterKind,
        /// Kind the register actually has.
        actual: RegisterKind,
    },

    /// Bit index outside the register.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    BitOutOfRange {
        /// Name of the register.
        register: String,
        /// The offending index.
        index: u32,
        /// Size of the register.
        size: u32,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation '{instruction}'")]
    DuplicateQubit {
        /// The duplicate qubit, rendered as `reg[i]`.
        qubit: String,
        /// Name of the instruction.
        instruction: String,
    },

    /// Measurement operand lists differ in length.
    #[error("'{instruction}' needs matching operands: {qubits} qubits, {clbits} clbits")]
    OperandCountMismatch {
        /// Name of the instruction.
        instruction: String,
        /// Number of qubits supplied.
        qubits: usize,
        /// Number of classical bits supplied.
        clbits: usize,
    },

    /// Custom gate matrix has the wrong dimension.
    #[error("Matrix for '{gate_name}' has {got} entries, expected {expected}")]
    InvalidMatrix {
        /// Name of the gate.
        gate_name: String,
        /// Expected entry count, `(2^n)^2`.
        expected: usize,
        /// Actual entry count.
        got: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
