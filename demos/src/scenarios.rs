//! Composition scenarios.
//!
//! Each scenario is a pair of circuits that only make sense together: the
//! left half prepares a state, the right half reads it out. Composing them by
//! either [`Composition`] mode and executing must give the same distribution.

use anyhow::{Context, Result};
use num_complex::Complex64;
use tracing::info;

use tessera_ir::{Circuit, IrResult, Register, StandardGate};
use tessera_sim::{Counts, Executor, state_fidelity};

/// How the two halves are put together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Composition {
    /// `left.combine(&right)`, leaving both halves intact.
    Combine,
    /// `left.extend(&right)` on a copy of the left half.
    Extend,
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Composition::Combine => write!(f, "combine"),
            Composition::Extend => write!(f, "extend"),
        }
    }
}

/// Two halves and the distribution their composition should produce.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub left: Circuit,
    pub right: Circuit,
    /// Expected probability of each bitstring.
    pub expected: Vec<(&'static str, f64)>,
    /// A snapshot label and the state it should hold.
    pub snapshot: Option<(&'static str, Vec<Complex64>)>,
}

impl Scenario {
    /// Compose the halves.
    pub fn compose(&self, mode: Composition) -> IrResult<Circuit> {
        match mode {
            Composition::Combine => self.left.combine(&self.right),
            Composition::Extend => {
                let mut circuit = self.left.clone();
                circuit.extend(&self.right)?;
                Ok(circuit)
            }
        }
    }
}

/// Shared registers: measure one qubit in each half.
pub fn common_registers() -> IrResult<Scenario> {
    let qr = Register::anonymous_quantum(2)?;
    let cr = Register::anonymous_classical(2)?;
    let mut left = Circuit::with_registers("common_left", [qr.clone(), cr.clone()])?;
    left.h(qr.qubit(0)?)?.measure(qr.qubit(0)?, cr.clbit(0)?)?;
    let mut right = Circuit::with_registers("common_right", [qr.clone(), cr.clone()])?;
    right.measure(qr.qubit(1)?, cr.clbit(1)?)?;

    Ok(Scenario {
        name: "common registers",
        left,
        right,
        expected: vec![("00", 0.5), ("01", 0.5)],
        snapshot: None,
    })
}

/// The right half brings the classical register the left lacks.
pub fn different_registers() -> IrResult<Scenario> {
    let qr = Register::anonymous_quantum(2)?;
    let cr = Register::anonymous_classical(2)?;
    let mut left = Circuit::with_registers("flip", [qr.clone()])?;
    left.gate_on_register(StandardGate::X, &qr)?;
    let mut right = Circuit::with_registers("readout", [qr.clone(), cr.clone()])?;
    right.measure_register(&qr, &cr)?;

    Ok(Scenario {
        name: "different registers",
        left,
        right,
        expected: vec![("11", 1.0)],
        snapshot: None,
    })
}

/// Initialize, barrier and snapshot carried across the composition.
pub fn extension_instructions() -> IrResult<Scenario> {
    let uniform = vec![Complex64::new(0.5, 0.0); 4];
    let qr = Register::anonymous_quantum(2)?;
    let cr = Register::anonymous_classical(2)?;
    let mut left = Circuit::with_registers("prepare", [qr.clone()])?;
    left.initialize(uniform.clone(), qr.qubits())?.barrier_all()?;
    let mut right = Circuit::with_registers("record", [qr.clone(), cr.clone()])?;
    right.snapshot("1")?.measure_register(&qr, &cr)?;

    Ok(Scenario {
        name: "extension instructions",
        left,
        right,
        expected: vec![("00", 0.25), ("01", 0.25), ("10", 0.25), ("11", 0.25)],
        snapshot: Some(("1", uniform)),
    })
}

/// Every scenario, in presentation order.
pub fn all() -> IrResult<Vec<Scenario>> {
    Ok(vec![
        common_registers()?,
        different_registers()?,
        extension_instructions()?,
    ])
}

/// What one run of a scenario produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub scenario: &'static str,
    pub mode: Composition,
    pub counts: Counts,
    /// Largest gap between observed and expected count for any bitstring.
    pub max_deviation: u64,
    pub fidelity: Option<f64>,
}

impl Report {
    /// Whether the counts sit within `threshold` of expectation and any
    /// snapshot matches its target state.
    pub fn passed(&self, threshold: u64) -> bool {
        self.max_deviation <= threshold && self.fidelity.is_none_or(|f| f > 0.99)
    }
}

/// Compose and execute a scenario.
pub fn run(
    scenario: &Scenario,
    mode: Composition,
    executor: &Executor,
    shots: u32,
    seed: u64,
) -> Result<Report> {
    let circuit = scenario
        .compose(mode)
        .with_context(|| format!("composing '{}'", scenario.name))?;
    let result = executor
        .execute(&circuit, shots, seed)
        .with_context(|| format!("executing '{}'", scenario.name))?;
    let counts = result.counts().clone();

    let mut max_deviation = counts
        .iter()
        .filter(|(bits, _)| !scenario.expected.iter().any(|(e, _)| *e == bits.as_str()))
        .map(|(_, &n)| n)
        .max()
        .unwrap_or(0);
    for &(bits, p) in &scenario.expected {
        let expected = (p * f64::from(shots)).round() as u64;
        max_deviation = max_deviation.max(counts.get(bits).abs_diff(expected));
    }

    let fidelity = match &scenario.snapshot {
        Some((label, target)) => {
            let states = result.snapshot(Some(*label))?;
            let first = states
                .first()
                .with_context(|| format!("snapshot '{label}' is empty"))?;
            Some(state_fidelity(first, target))
        }
        None => None,
    };

    info!(
        scenario = scenario.name,
        %mode,
        max_deviation,
        elapsed_ms = result.execution_time_ms(),
        "scenario executed"
    );

    Ok(Report {
        scenario: scenario.name,
        mode,
        counts,
        max_deviation,
        fidelity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_modes_compose_identically() {
        for scenario in all().unwrap() {
            assert_eq!(
                scenario.compose(Composition::Combine).unwrap(),
                scenario.compose(Composition::Extend).unwrap()
            );
        }
    }

    #[test]
    fn test_expected_distributions_sum_to_one() {
        for scenario in all().unwrap() {
            let total: f64 = scenario.expected.iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-12, "{}", scenario.name);
        }
    }
}
