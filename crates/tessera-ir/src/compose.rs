//! Circuit composition.
//!
//! Two circuits compose by merging their register sets and concatenating
//! their instruction streams. Registers are matched by name:
//!
//! | Right-hand register | Outcome |
//! |---------------------|---------|
//! | name absent on the left | adopted, appended after the left's registers |
//! | identical `(name, size, kind)` | unified, kept once |
//! | same name, different size or kind | [`IrError::IncompatibleRegister`] |
//!
//! The merge plan is computed in full before anything is written, so a
//! failing [`Circuit::extend`] leaves its receiver untouched.

use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::register::Register;

/// Registers of `incoming` that `existing` lacks, in their original order.
///
/// Fails on the first register that shares a name with one in `existing`
/// but differs in size or kind.
pub fn merge_plan<'a>(
    existing: &[Register],
    incoming: &'a [Register],
) -> IrResult<Vec<&'a Register>> {
    let mut adopted = Vec::new();
    for register in incoming {
        match existing.iter().find(|r| r.name() == register.name()) {
            None => adopted.push(register),
            Some(owned) if owned == register => {}
            Some(owned) => {
                return Err(IrError::IncompatibleRegister {
                    existing: owned.clone(),
                    incoming: register.clone(),
                });
            }
        }
    }
    Ok(adopted)
}

impl Circuit {
    /// Compose `self` followed by `other` into a new circuit.
    ///
    /// Neither input is modified. The result keeps `self`'s name, owns the
    /// union of both register sets and runs all of `self`'s instructions
    /// before all of `other`'s.
    pub fn combine(&self, other: &Circuit) -> IrResult<Circuit> {
        let mut combined = self.clone();
        combined.extend(other)?;
        Ok(combined)
    }

    /// Append `other` to `self` in place.
    ///
    /// `other` is validated first, so a deserialised circuit with duplicate
    /// registers or dangling operands is rejected. On error `self` is left
    /// exactly as it was.
    pub fn extend(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        other.validate()?;
        let adopted = merge_plan(&self.registers, &other.registers)?;

        debug!(
            circuit = %self.name,
            other = %other.name,
            adopted = adopted.len(),
            instructions = other.instructions.len(),
            "extending circuit"
        );

        self.registers.extend(adopted.into_iter().cloned());
        self.instructions.extend(other.instructions.iter().cloned());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::Qubit;

    #[test]
    fn test_merge_plan_adopts_only_missing() {
        let q = Register::quantum("q", 2).unwrap();
        let c = Register::classical("c", 2).unwrap();
        let a = [q.clone()];
        let b = [q.clone(), c.clone()];

        let plan = merge_plan(&a, &b).unwrap();
        assert_eq!(plan, vec![&c]);
    }

    #[test]
    fn test_merge_plan_rejects_conflicts() {
        let a = [Register::quantum("q", 1).unwrap()];
        let bigger = [Register::quantum("q", 2).unwrap()];
        let classical = [Register::classical("q", 1).unwrap()];

        assert!(matches!(
            merge_plan(&a, &bigger),
            Err(IrError::IncompatibleRegister { .. })
        ));
        assert!(matches!(
            merge_plan(&a, &classical),
            Err(IrError::IncompatibleRegister { .. })
        ));
    }

    #[test]
    fn test_combine_concatenates() {
        let qr = Register::quantum("qr", 1).unwrap();
        let mut a = Circuit::with_registers("a", [qr.clone()]).unwrap();
        a.h(Qubit::new("qr", 0)).unwrap();
        let mut b = Circuit::with_registers("b", [qr]).unwrap();
        b.x(Qubit::new("qr", 0)).unwrap();

        let c = a.combine(&b).unwrap();
        assert_eq!(c.name(), "a");
        assert_eq!(c.registers().len(), 1);
        let names: Vec<_> = c.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["h", "x"]);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_extend_failure_is_atomic() {
        let ok = Register::quantum("a", 1).unwrap();
        let q1 = Register::quantum("q", 1).unwrap();
        let mut left = Circuit::with_registers("left", [q1]).unwrap();
        left.x(Qubit::new("q", 0)).unwrap();
        let before = left.clone();

        // The adoptable register comes first; it must not be written either.
        let right = Circuit::with_registers(
            "right",
            [ok, Register::quantum("q", 2).unwrap()],
        )
        .unwrap();

        assert!(left.extend(&right).is_err());
        assert_eq!(left, before);
    }
}
