//! Quantum and classical registers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{IrError, IrResult};
use crate::qubit::{Clbit, Qubit};

static ANONYMOUS_QREGS: AtomicU32 = AtomicU32::new(0);
static ANONYMOUS_CREGS: AtomicU32 = AtomicU32::new(0);

/// Whether a register holds qubits or classical bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterKind {
    /// A register of qubits.
    Quantum,
    /// A register of classical bits.
    Classical,
}

impl RegisterKind {
    /// Default name prefix for anonymous registers of this kind.
    fn prefix(self) -> &'static str {
        match self {
            RegisterKind::Quantum => "q",
            RegisterKind::Classical => "c",
        }
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterKind::Quantum => f.write_str("quantum"),
            RegisterKind::Classical => f.write_str("classical"),
        }
    }
}

/// A named, sized group of qubits or classical bits.
///
/// Registers are immutable values. Equality is structural over
/// `(name, size, kind)`: two registers built independently with the same
/// triple are the *same* register as far as circuit composition is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    size: u32,
    kind: RegisterKind,
}

impl Register {
    /// Create a register.
    ///
    /// Returns [`IrError::EmptyRegister`] if `size` is zero.
    pub fn new(name: impl Into<String>, size: u32, kind: RegisterKind) -> IrResult<Self> {
        let name = name.into();
        if size == 0 {
            return Err(IrError::EmptyRegister(name));
        }
        Ok(Self { name, size, kind })
    }

    /// Create a quantum register.
    pub fn quantum(name: impl Into<String>, size: u32) -> IrResult<Self> {
        Self::new(name, size, RegisterKind::Quantum)
    }

    /// Create a classical register.
    pub fn classical(name: impl Into<String>, size: u32) -> IrResult<Self> {
        Self::new(name, size, RegisterKind::Classical)
    }

    /// Create a quantum register with a fresh generated name (`q0`, `q1`, ...).
    pub fn anonymous_quantum(size: u32) -> IrResult<Self> {
        Self::anonymous(size, RegisterKind::Quantum)
    }

    /// Create a classical register with a fresh generated name (`c0`, `c1`, ...).
    pub fn anonymous_classical(size: u32) -> IrResult<Self> {
        Self::anonymous(size, RegisterKind::Classical)
    }

    fn anonymous(size: u32, kind: RegisterKind) -> IrResult<Self> {
        let counter = match kind {
            RegisterKind::Quantum => &ANONYMOUS_QREGS,
            RegisterKind::Classical => &ANONYMOUS_CREGS,
        };
        let n = counter.fetch_add(1, Ordering::Relaxed);
        Self::new(format!("{}{n}", kind.prefix()), size, kind)
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Quantum or classical.
    pub fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// Check if this is a quantum register.
    pub fn is_quantum(&self) -> bool {
        self.kind == RegisterKind::Quantum
    }

    /// Check if this is a classical register.
    pub fn is_classical(&self) -> bool {
        self.kind == RegisterKind::Classical
    }

    /// Same name, but a different size or kind.
    pub fn conflicts_with(&self, other: &Register) -> bool {
        self.name == other.name && (self.size != other.size || self.kind != other.kind)
    }

    /// Checked reference to qubit `index`.
    pub fn qubit(&self, index: u32) -> IrResult<Qubit> {
        self.check(index, RegisterKind::Quantum)?;
        Ok(Qubit::new(&self.name, index))
    }

    /// Checked reference to classical bit `index`.
    pub fn clbit(&self, index: u32) -> IrResult<Clbit> {
        self.check(index, RegisterKind::Classical)?;
        Ok(Clbit::new(&self.name, index))
    }

    /// All qubits of a quantum register, in index order.
    ///
    /// Empty for classical registers.
    pub fn qubits(&self) -> Vec<Qubit> {
        if !self.is_quantum() {
            return vec![];
        }
        (0..self.size).map(|i| Qubit::new(&self.name, i)).collect()
    }

    /// All bits of a classical register, in index order.
    ///
    /// Empty for quantum registers.
    pub fn clbits(&self) -> Vec<Clbit> {
        if !self.is_classical() {
            return vec![];
        }
        (0..self.size).map(|i| Clbit::new(&self.name, i)).collect()
    }

    pub(crate) fn check(&self, index: u32, expected: RegisterKind) -> IrResult<()> {
        if self.kind != expected {
            return Err(IrError::RegisterKindMismatch {
                register: self.name.clone(),
                expected,
                actual: self.kind,
            });
        }
        if index >= self.size {
            return Err(IrError::BitOutOfRange {
                register: self.name.clone(),
                index,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            RegisterKind::Quantum => "qreg",
            RegisterKind::Classical => "creg",
        };
        write!(f, "{keyword} {}[{}]", self.name, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_identity_is_structural() {
        let a = Register::quantum("q", 2).unwrap();
        let b = Register::quantum("q", 2).unwrap();
        assert_eq!(a, b);
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_register_conflicts() {
        let q1 = Register::quantum("q", 1).unwrap();
        let q2 = Register::quantum("q", 2).unwrap();
        let c1 = Register::classical("q", 1).unwrap();
        let other = Register::quantum("r", 5).unwrap();

        assert!(q1.conflicts_with(&q2));
        assert!(q1.conflicts_with(&c1));
        assert!(!q1.conflicts_with(&other));
    }

    #[test]
    fn test_empty_register_rejected() {
        assert_eq!(
            Register::quantum("q", 0),
            Err(IrError::EmptyRegister("q".into()))
        );
    }

    #[test]
    fn test_anonymous_names_are_unique() {
        let a = Register::anonymous_quantum(2).unwrap();
        let b = Register::anonymous_quantum(2).unwrap();
        let c = Register::anonymous_classical(2).unwrap();
        assert_ne!(a.name(), b.name());
        assert!(a.name().starts_with('q'));
        assert!(c.name().starts_with('c'));
    }

    #[test]
    fn test_bit_references() {
        let qr = Register::quantum("qr", 2).unwrap();
        let cr = Register::classical("cr", 2).unwrap();

        assert_eq!(qr.qubit(1).unwrap(), Qubit::new("qr", 1));
        assert!(matches!(
            qr.qubit(2),
            Err(IrError::BitOutOfRange { index: 2, size: 2, .. })
        ));
        assert!(matches!(
            qr.clbit(0),
            Err(IrError::RegisterKindMismatch { .. })
        ));
        assert_eq!(cr.clbits().len(), 2);
        assert!(cr.qubits().is_empty());
    }

    #[test]
    fn test_register_display() {
        let qr = Register::quantum("qr", 3).unwrap();
        assert_eq!(qr.to_string(), "qreg qr[3]");
        let cr = Register::classical("cr", 1).unwrap();
        assert_eq!(cr.to_string(), "creg cr[1]");
    }
}
