//! High-level circuit builder API.

use num_complex::Complex64;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate, matrix_len};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, Qubit};
use crate::register::{Register, RegisterKind};

/// A quantum circuit.
///
/// A circuit owns a set of registers (unique by name, kept in insertion
/// order) and an ordered instruction stream. Every instruction appended
/// through the builder API is checked against the owned registers, so a
/// circuit built this way only ever references bits it owns.
///
/// Circuits that arrive through deserialisation skip those checks; call
/// [`Circuit::validate`] before trusting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    pub(crate) name: String,
    /// Registers, unique by name, in insertion order.
    pub(crate) registers: Vec<Register>,
    /// Instructions in program order.
    pub(crate) instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registers: vec![],
            instructions: vec![],
        }
    }

    /// Create an empty circuit over the given registers.
    pub fn with_registers(
        name: impl Into<String>,
        registers: impl IntoIterator<Item = Register>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(name);
        for register in registers {
            circuit.add_register(register)?;
        }
        Ok(circuit)
    }

    /// Assemble a circuit from parts, checking every instruction.
    pub fn from_parts(
        name: impl Into<String>,
        registers: impl IntoIterator<Item = Register>,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_registers(name, registers)?;
        for instruction in instructions {
            circuit.append(instruction)?;
        }
        Ok(circuit)
    }

    /// Add a register.
    ///
    /// Register names are unique within a circuit; adding a second register
    /// under a taken name fails with [`IrError::DuplicateRegister`].
    pub fn add_register(&mut self, register: Register) -> IrResult<&mut Self> {
        if self.register(register.name()).is_some() {
            return Err(IrError::DuplicateRegister(register.name().to_string()));
        }
        self.registers.push(register);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SX, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::U(theta, phi, lambda),
            qubit,
        ))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CY, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CH, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: Qubit, q2: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CRz(theta),
            control,
            target,
        ))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: Qubit, c2: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: Qubit, t1: Qubit, t2: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = Qubit>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Apply a single-qubit gate to every qubit of a register.
    ///
    /// Emits one instruction per qubit.
    pub fn gate_on_register(
        &mut self,
        gate: StandardGate,
        register: &Register,
    ) -> IrResult<&mut Self> {
        self.check_owned(register, RegisterKind::Quantum)?;
        for qubit in register.qubits() {
            self.append(Instruction::single_qubit_gate(gate.clone(), qubit))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: Qubit, clbit: Clbit) -> IrResult<&mut Self> {
        self.append(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit of `qreg` into the same index of `creg`.
    ///
    /// Emits one measurement per bit; the registers must have equal size.
    pub fn measure_register(&mut self, qreg: &Register, creg: &Register) -> IrResult<&mut Self> {
        self.check_owned(qreg, RegisterKind::Quantum)?;
        self.check_owned(creg, RegisterKind::Classical)?;
        if qreg.size() != creg.size() {
            return Err(IrError::OperandCountMismatch {
                instruction: "measure".into(),
                qubits: qreg.size() as usize,
                clbits: creg.size() as usize,
            });
        }
        for (qubit, clbit) in qreg.qubits().into_iter().zip(creg.clbits()) {
            self.append(Instruction::measure(qubit, clbit))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.append(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits = self.qubits();
        self.append(Instruction::barrier(qubits))
    }

    /// Initialize `qubits` to the state `amplitudes` (little-endian over `qubits`).
    ///
    /// Only operands are checked here; the amplitude vector is validated by
    /// the executor.
    pub fn initialize(
        &mut self,
        amplitudes: impl IntoIterator<Item = Complex64>,
        qubits: impl IntoIterator<Item = Qubit>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::initialize(amplitudes, qubits))
    }

    /// Record the full state vector under `label`.
    pub fn snapshot(&mut self, label: impl Into<String>) -> IrResult<&mut Self> {
        self.append(Instruction::snapshot(label))
    }

    /// Append an instruction after checking it against the owned registers.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check_instruction(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Re-check every invariant of the circuit.
    ///
    /// Registers must be non-empty with unique names and every instruction
    /// must reference owned bits with well-formed operands.
    pub fn validate(&self) -> IrResult<()> {
        let mut names = FxHashSet::default();
        for register in &self.registers {
            if register.size() == 0 {
                return Err(IrError::EmptyRegister(register.name().to_string()));
            }
            if !names.insert(register.name()) {
                return Err(IrError::DuplicateRegister(register.name().to_string()));
            }
        }
        self.instructions
            .iter()
            .try_for_each(|inst| self.check_instruction(inst))
    }

    fn check_owned(&self, register: &Register, kind: RegisterKind) -> IrResult<()> {
        match self.register(register.name()) {
            Some(owned) if owned == register => {
                if owned.kind() == kind {
                    Ok(())
                } else {
                    Err(IrError::RegisterKindMismatch {
                        register: owned.name().to_string(),
                        expected: kind,
                        actual: owned.kind(),
                    })
                }
            }
            Some(owned) => Err(IrError::IncompatibleRegister {
                existing: owned.clone(),
                incoming: register.clone(),
            }),
            None => Err(IrError::RegisterNotFound(register.name().to_string())),
        }
    }

    fn check_qubit(&self, qubit: &Qubit) -> IrResult<()> {
        self.register(&qubit.register)
            .ok_or_else(|| IrError::RegisterNotFound(qubit.register.clone()))?
            .check(qubit.index, RegisterKind::Quantum)
    }

    fn check_clbit(&self, clbit: &Clbit) -> IrResult<()> {
        self.register(&clbit.register)
            .ok_or_else(|| IrError::RegisterNotFound(clbit.register.clone()))?
            .check(clbit.index, RegisterKind::Classical)
    }

    fn check_instruction(&self, inst: &Instruction) -> IrResult<()> {
        for qubit in &inst.qubits {
            self.check_qubit(qubit)?;
        }
        for clbit in &inst.clbits {
            self.check_clbit(clbit)?;
        }

        match &inst.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                if inst.qubits.len() != expected as usize {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got: inst.qubits.len() as u32,
                    });
                }
                if let GateKind::Custom(custom) = &gate.kind {
                    if let Some(matrix) = &custom.matrix {
                        let expected = matrix_len(custom.num_qubits);
                        if expected != Some(matrix.len()) {
                            return Err(IrError::InvalidMatrix {
                                gate_name: custom.name.clone(),
                                expected: expected.unwrap_or(usize::MAX),
                                got: matrix.len(),
                            });
                        }
                    }
                }
                check_distinct(inst)?;
                check_no_clbits(inst)
            }
            InstructionKind::Measure => {
                if inst.qubits.is_empty() || inst.qubits.len() != inst.clbits.len() {
                    return Err(IrError::OperandCountMismatch {
                        instruction: inst.name().to_string(),
                        qubits: inst.qubits.len(),
                        clbits: inst.clbits.len(),
                    });
                }
                check_distinct(inst)
            }
            InstructionKind::Reset | InstructionKind::Initialize { .. } => {
                if inst.qubits.is_empty() {
                    return Err(IrError::OperandCountMismatch {
                        instruction: inst.name().to_string(),
                        qubits: 0,
                        clbits: inst.clbits.len(),
                    });
                }
                check_distinct(inst)?;
                check_no_clbits(inst)
            }
            InstructionKind::Barrier | InstructionKind::Snapshot { .. } => check_no_clbits(inst),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All registers, in insertion order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// Quantum registers, in insertion order.
    pub fn quantum_registers(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(|r| r.is_quantum())
    }

    /// Classical registers, in insertion order.
    pub fn classical_registers(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(|r| r.is_classical())
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.quantum_registers().map(|r| r.size() as usize).sum()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.classical_registers().map(|r| r.size() as usize).sum()
    }

    /// All qubits, register by register.
    pub fn qubits(&self) -> Vec<Qubit> {
        self.quantum_registers().flat_map(Register::qubits).collect()
    }

    /// All classical bits, register by register.
    pub fn clbits(&self) -> Vec<Clbit> {
        self.classical_registers().flat_map(Register::clbits).collect()
    }
}

fn check_distinct(inst: &Instruction) -> IrResult<()> {
    let mut seen = FxHashSet::default();
    for qubit in &inst.qubits {
        if !seen.insert(qubit) {
            return Err(IrError::DuplicateQubit {
                qubit: qubit.to_string(),
                instruction: inst.name().to_string(),
            });
        }
    }
    Ok(())
}

fn check_no_clbits(inst: &Instruction) -> IrResult<()> {
    if inst.clbits.is_empty() {
        Ok(())
    } else {
        Err(IrError::OperandCountMismatch {
            instruction: inst.name().to_string(),
            qubits: inst.qubits.len(),
            clbits: inst.clbits.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs() -> (Register, Register) {
        (
            Register::quantum("qr", 2).unwrap(),
            Register::classical("cr", 2).unwrap(),
        )
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_registers() {
        let (qr, cr) = regs();
        let circuit = Circuit::with_registers("test", [qr, cr]).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.registers().len(), 2);
        assert_eq!(circuit.qubits()[1], Qubit::new("qr", 1));
    }

    #[test]
    fn test_duplicate_register_name_rejected() {
        let (qr, _) = regs();
        let mut circuit = Circuit::with_registers("test", [qr.clone()]).unwrap();
        assert_eq!(
            circuit.add_register(qr).unwrap_err(),
            IrError::DuplicateRegister("qr".into())
        );
        let clash = Register::classical("qr", 2).unwrap();
        assert!(circuit.add_register(clash).is_err());
    }

    #[test]
    fn test_fluent_api() {
        let (qr, cr) = regs();
        let mut circuit = Circuit::with_registers("test", [qr.clone(), cr.clone()]).unwrap();
        circuit
            .h(qr.qubit(0).unwrap())
            .unwrap()
            .cx(qr.qubit(0).unwrap(), qr.qubit(1).unwrap())
            .unwrap()
            .measure_register(&qr, &cr)
            .unwrap();

        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.instructions()[0].name(), "h");
        assert_eq!(circuit.instructions()[3].name(), "measure");
    }

    #[test]
    fn test_foreign_bits_rejected() {
        let (qr, cr) = regs();
        let mut circuit = Circuit::with_registers("test", [qr, cr]).unwrap();

        assert!(matches!(
            circuit.x(Qubit::new("other", 0)),
            Err(IrError::RegisterNotFound(_))
        ));
        assert!(matches!(
            circuit.x(Qubit::new("qr", 2)),
            Err(IrError::BitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.x(Qubit::new("cr", 0)),
            Err(IrError::RegisterKindMismatch { .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_gate_operand_checks() {
        let (qr, _) = regs();
        let mut circuit = Circuit::with_registers("test", [qr.clone()]).unwrap();
        let q0 = qr.qubit(0).unwrap();

        assert!(matches!(
            circuit.cx(q0.clone(), q0.clone()),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.gate(StandardGate::CX, [q0]),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_measure_register_size_mismatch() {
        let qr = Register::quantum("qr", 2).unwrap();
        let cr = Register::classical("cr", 3).unwrap();
        let mut circuit = Circuit::with_registers("test", [qr.clone(), cr.clone()]).unwrap();
        assert!(matches!(
            circuit.measure_register(&qr, &cr),
            Err(IrError::OperandCountMismatch { qubits: 2, clbits: 3, .. })
        ));
    }

    #[test]
    fn test_extension_instructions() {
        let (qr, cr) = regs();
        let mut circuit = Circuit::with_registers("test", [qr.clone(), cr]).unwrap();
        circuit
            .initialize([Complex64::new(0.5, 0.0); 4], qr.qubits())
            .unwrap()
            .barrier_all()
            .unwrap()
            .snapshot("1")
            .unwrap()
            .reset(qr.qubit(1).unwrap())
            .unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, ["initialize", "barrier", "snapshot", "reset"]);
        assert_eq!(circuit.instructions()[1].qubits.len(), 2);
    }

    #[test]
    fn test_validate_catches_deserialized_garbage() {
        let json = r#"{
            "name": "bad",
            "registers": [{"name": "q", "size": 1, "kind": "quantum"}],
            "instructions": [
                {"kind": {"Gate": {"kind": {"Standard": "X"}}}, "qubits": [{"register": "q", "index": 3}]}
            ]
        }"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        assert!(matches!(
            circuit.validate(),
            Err(IrError::BitOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_from_parts() {
        let (qr, cr) = regs();
        let circuit = Circuit::from_parts(
            "parts",
            [qr.clone(), cr.clone()],
            [Instruction::measure(
                qr.qubit(0).unwrap(),
                cr.clbit(1).unwrap(),
            )],
        )
        .unwrap();
        assert_eq!(circuit.len(), 1);
        assert!(circuit.validate().is_ok());
    }
}
