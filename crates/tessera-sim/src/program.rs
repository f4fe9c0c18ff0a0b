//! Lowering of a circuit into flat-indexed simulator operations.
//!
//! Registers are laid out in circuit order: the first quantum register's
//! bit 0 is flat qubit 0, its last bit is followed by the next quantum
//! register's bit 0, and so on. Classical bits are flattened the same way.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use tracing::trace;

use tessera_ir::{Circuit, Clbit, InstructionKind, Qubit};

use crate::error::{SimError, SimResult};

/// Register name → flat offset of its bit 0.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    qubit_offsets: FxHashMap<String, usize>,
    clbit_offsets: FxHashMap<String, usize>,
    num_qubits: usize,
    num_clbits: usize,
}

impl Layout {
    /// Compute the flat layout of a circuit's registers.
    pub fn new(circuit: &Circuit) -> Self {
        let mut layout = Self::default();
        for register in circuit.registers() {
            let size = register.size() as usize;
            if register.is_quantum() {
                layout
                    .qubit_offsets
                    .insert(register.name().to_string(), layout.num_qubits);
                layout.num_qubits += size;
            } else {
                layout
                    .clbit_offsets
                    .insert(register.name().to_string(), layout.num_clbits);
                layout.num_clbits += size;
            }
        }
        layout
    }

    /// Total qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Flat index of a qubit.
    pub fn qubit(&self, qubit: &Qubit) -> SimResult<usize> {
        self.qubit_offsets
            .get(&qubit.register)
            .map(|offset| offset + qubit.index as usize)
            .ok_or_else(|| SimError::invalid(format!("qubit {qubit} is not in the circuit")))
    }

    /// Flat index of a classical bit.
    pub fn clbit(&self, clbit: &Clbit) -> SimResult<usize> {
        self.clbit_offsets
            .get(&clbit.register)
            .map(|offset| offset + clbit.index as usize)
            .ok_or_else(|| SimError::invalid(format!("clbit {clbit} is not in the circuit")))
    }
}

/// A simulator operation on flat indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Apply a unitary to `targets` (matrix little-endian over `targets`).
    Unitary {
        matrix: Vec<Complex64>,
        targets: Vec<usize>,
    },
    /// Measure `(qubit, clbit)` pairs in order.
    Measure { pairs: Vec<(usize, usize)> },
    /// Reset each qubit to |0⟩.
    Reset { targets: Vec<usize> },
    /// Overwrite the state of `targets`.
    Initialize {
        targets: Vec<usize>,
        amplitudes: Vec<Complex64>,
    },
    /// Record the full state.
    Snapshot { label: String },
    /// No-op ordering fence.
    Barrier,
}

impl Op {
    /// Whether applying this operation consumes randomness.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Op::Measure { .. } | Op::Reset { .. })
    }
}

/// A circuit lowered to flat operations.
#[derive(Debug, Clone)]
pub struct Program {
    pub layout: Layout,
    pub ops: Vec<Op>,
}

impl Program {
    /// Lower a circuit, rejecting anything the simulator cannot execute.
    ///
    /// `tolerance` bounds how far an `Initialize` vector's norm may stray
    /// from 1.
    pub fn compile(circuit: &Circuit, tolerance: f64) -> SimResult<Self> {
        circuit.validate()?;
        let layout = Layout::new(circuit);

        let mut ops = Vec::with_capacity(circuit.len());
        for (position, inst) in circuit.instructions().iter().enumerate() {
            let targets = inst
                .qubits
                .iter()
                .map(|q| layout.qubit(q))
                .collect::<SimResult<Vec<_>>>()?;

            let op = match &inst.kind {
                InstructionKind::Gate(gate) => {
                    let matrix = gate.matrix().ok_or_else(|| {
                        SimError::invalid(format!(
                            "gate '{}' at position {position} has no matrix",
                            gate.name()
                        ))
                    })?;
                    Op::Unitary { matrix, targets }
                }
                InstructionKind::Measure => {
                    let clbits = inst
                        .clbits
                        .iter()
                        .map(|c| layout.clbit(c))
                        .collect::<SimResult<Vec<_>>>()?;
                    Op::Measure {
                        pairs: targets.into_iter().zip(clbits).collect(),
                    }
                }
                InstructionKind::Reset => Op::Reset { targets },
                InstructionKind::Barrier => Op::Barrier,
                InstructionKind::Initialize { amplitudes } => {
                    check_initialize(amplitudes, targets.len(), tolerance, position)?;
                    Op::Initialize {
                        targets,
                        amplitudes: amplitudes.clone(),
                    }
                }
                InstructionKind::Snapshot { label } => Op::Snapshot {
                    label: label.clone(),
                },
            };
            trace!(position, name = inst.name(), "lowered instruction");
            ops.push(op);
        }

        Ok(Self { layout, ops })
    }

    /// Index of the first stochastic operation, or `ops.len()` if none.
    ///
    /// Everything before it evolves identically in every shot.
    pub fn deterministic_prefix(&self) -> usize {
        self.ops
            .iter()
            .position(Op::is_stochastic)
            .unwrap_or(self.ops.len())
    }
}

fn check_initialize(
    amplitudes: &[Complex64],
    num_targets: usize,
    tolerance: f64,
    position: usize,
) -> SimResult<()> {
    let expected = u32::try_from(num_targets)
        .ok()
        .and_then(|n| 1usize.checked_shl(n));
    if expected != Some(amplitudes.len()) {
        return Err(SimError::invalid(format!(
            "initialize at position {position} has {} amplitudes for {num_targets} qubits",
            amplitudes.len()
        )));
    }
    let norm: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    // NaN norms must fail too.
    if !((norm - 1.0).abs() <= tolerance) {
        return Err(SimError::invalid(format!(
            "initialize at position {position} is not normalized (norm {norm})"
        )));
    }
    Ok(())
}
