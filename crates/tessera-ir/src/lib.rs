//! Tessera Circuit Model
//!
//! This crate provides the core data structures for quantum circuits in
//! Tessera: registers, bit references, gates, instructions and the circuit
//! container, plus the composition engine that merges two circuits.
//!
//! # Core Components
//!
//! - **Registers**: [`Register`] is an immutable `(name, size, kind)` value;
//!   two registers are the same register iff all three match
//! - **Bits**: [`Qubit`] and [`Clbit`] address a bit by register name and index
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for
//!   user-supplied unitaries
//! - **Instructions**: [`Instruction`] pairs an [`InstructionKind`] (gate,
//!   measure, reset, barrier, initialize, snapshot) with its operands
//! - **Circuit**: [`Circuit`] builder with [`Circuit::combine`] and
//!   [`Circuit::extend`]
//!
//! # Example: Composing Two Circuits
//!
//! ```rust
//! use tessera_ir::{Circuit, Register};
//!
//! let qr = Register::quantum("qr", 2)?;
//! let cr = Register::classical("cr", 2)?;
//!
//! let mut prepare = Circuit::with_registers("prepare", [qr.clone()])?;
//! prepare.h(qr.qubit(0)?)?;
//!
//! let mut readout = Circuit::with_registers("readout", [qr.clone(), cr.clone()])?;
//! readout.measure_register(&qr, &cr)?;
//!
//! let full = prepare.combine(&readout)?;
//! assert_eq!(full.registers().len(), 2);
//! assert_eq!(full.len(), 3);
//! # Ok::<(), tessera_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Phase and sqrt(X) gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ`, `CH` | 2 | Controlled gates |
//! | `CRz`, `CP` | 2 | Controlled rotations |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CSwap` | 3 | Toffoli and Fredkin gates |

pub mod circuit;
pub mod compose;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod register;

pub use circuit::Circuit;
pub use compose::merge_plan;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, Qubit};
pub use register::{Register, RegisterKind};
