//! Qubit and classical bit references.
//!
//! A bit is addressed by the *name* of the register it lives in plus its
//! index. Two circuits that declare identical registers therefore address the
//! same logical bits, which is what lets composition concatenate instruction
//! streams without remapping operands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to one qubit of a quantum register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qubit {
    /// The name of the register this qubit belongs to.
    pub register: String,
    /// The index within the register.
    pub index: u32,
}

impl Qubit {
    /// Reference bit `index` of the quantum register `register`.
    ///
    /// No bounds check happens here; use [`Register::qubit`](crate::Register::qubit)
    /// for a checked reference.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A reference to one bit of a classical register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clbit {
    /// The name of the register this bit belongs to.
    pub register: String,
    /// The index within the register.
    pub index: u32,
}

impl Clbit {
    /// Reference bit `index` of the classical register `register`.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new("qr", 0);
        assert_eq!(format!("{q}"), "qr[0]");
    }

    #[test]
    fn test_clbit_display() {
        let c = Clbit::new("cr", 1);
        assert_eq!(format!("{c}"), "cr[1]");
    }

    #[test]
    fn test_bits_compare_by_value() {
        assert_eq!(Qubit::new("q", 1), Qubit::new(String::from("q"), 1));
        assert_ne!(Qubit::new("q", 1), Qubit::new("q", 0));
        assert!(Clbit::new("a", 3) < Clbit::new("b", 0));
    }
}
