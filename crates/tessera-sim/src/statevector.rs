//! Statevector simulation engine.
//!
//! Flat qubit `k` is bit `k` of the amplitude index (little-endian).

use num_complex::Complex64;

use crate::error::{SimError, SimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// Fails with `TooManyQubits` when `2^num_qubits` does not fit in `usize`.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        let size = u32::try_from(num_qubits)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or(SimError::TooManyQubits {
                num_qubits,
                max_qubits: usize::BITS as usize - 1,
            })?;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed little-endian by flat qubit.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm of the state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Index offsets of every basis state of `targets`, little-endian over `targets`.
    fn offsets(targets: &[usize]) -> Vec<usize> {
        (0..1usize << targets.len())
            .map(|s| {
                targets
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (s >> bit) & 1 == 1)
                    .fold(0, |acc, (_, &q)| acc | (1 << q))
            })
            .collect()
    }

    /// Indices with every target bit cleared.
    fn bases(&self, targets: &[usize]) -> impl Iterator<Item = usize> {
        let mask = targets.iter().fold(0usize, |acc, &q| acc | (1 << q));
        (0..self.amplitudes.len()).filter(move |i| i & mask == 0)
    }

    /// Apply a `2^k × 2^k` row-major unitary to the `k` target qubits.
    ///
    /// The matrix is little-endian over `targets`; all other qubits are left
    /// untouched (tensor with identity).
    pub fn apply_unitary(&mut self, matrix: &[Complex64], targets: &[usize]) {
        if let [qubit] = targets {
            self.apply_single(matrix, *qubit);
            return;
        }

        let offsets = Self::offsets(targets);
        let dim = offsets.len();
        let mut local = vec![ZERO; dim];
        let bases: Vec<usize> = self.bases(targets).collect();
        for base in bases {
            for (slot, &off) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | off];
            }
            for (row, &off) in offsets.iter().enumerate() {
                let coeffs = &matrix[row * dim..(row + 1) * dim];
                self.amplitudes[base | off] =
                    coeffs.iter().zip(&local).map(|(m, a)| m * a).sum();
            }
        }
    }

    fn apply_single(&mut self, m: &[Complex64], qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    /// Probability of reading 1 on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit` given a uniform sample `r` in `[0, 1)`.
    ///
    /// Reads 1 when `r < P(1)`, then projects onto the outcome and
    /// renormalises.
    pub fn measure(&mut self, qubit: usize, r: f64) -> bool {
        let p1 = self.probability_one(qubit);
        let mut outcome = r < p1;
        // Rounding can leave the drawn branch with no weight at all.
        if (outcome && p1 <= f64::EPSILON) || (!outcome && 1.0 - p1 <= f64::EPSILON) {
            outcome = !outcome;
        }
        let p = if outcome { p1 } else { 1.0 - p1 };
        let scale = 1.0 / p.sqrt();

        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
        outcome
    }

    /// Reset `qubit` to |0⟩: measure it, then flip it back if it read 1.
    pub fn reset(&mut self, qubit: usize, r: f64) {
        if self.measure(qubit, r) {
            self.apply_x(qubit);
        }
    }

    /// Overwrite the state of `targets` with `values` (little-endian over `targets`).
    ///
    /// The rest of the register is assumed to be in a product state with the
    /// targets. It is recovered from the target basis state carrying the most
    /// weight, renormalised, and re-tensored with `values`. For fresh qubits
    /// that basis state is |0…0⟩.
    pub fn initialize(&mut self, targets: &[usize], values: &[Complex64]) {
        let offsets = Self::offsets(targets);
        let bases: Vec<usize> = self.bases(targets).collect();

        let weight = |off: usize| -> f64 {
            bases
                .iter()
                .map(|&b| self.amplitudes[b | off].norm_sqr())
                .sum()
        };
        let mut pivot = offsets[0];
        let mut best = weight(pivot);
        for &off in &offsets[1..] {
            let w = weight(off);
            if w > best {
                best = w;
                pivot = off;
            }
        }

        let norm = best.sqrt();
        let rest: Vec<Complex64> = bases
            .iter()
            .map(|&b| self.amplitudes[b | pivot] / norm)
            .collect();

        for (&base, r) in bases.iter().zip(&rest) {
            for (&off, v) in offsets.iter().zip(values) {
                self.amplitudes[base | off] = r * v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;
    use tessera_ir::StandardGate;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], c(1.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_unitary(&StandardGate::H.matrix(), &[0]);

        assert!(approx_eq(sv.amplitudes[0], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(sv.amplitudes[1], c(FRAC_1_SQRT_2)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_unitary(&StandardGate::H.matrix(), &[0]);
        sv.apply_unitary(&StandardGate::CX.matrix(), &[0, 1]);

        assert!(approx_eq(sv.amplitudes[0], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], c(FRAC_1_SQRT_2)));
    }

    #[test]
    fn test_cx_reversed_operands() {
        // Control on qubit 1, target qubit 0: |10⟩ (index 2) → |11⟩ (index 3).
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_unitary(&StandardGate::X.matrix(), &[1]);
        sv.apply_unitary(&StandardGate::CX.matrix(), &[1, 0]);
        assert!(approx_eq(sv.amplitudes[3], c(1.0)));
    }

    #[test]
    fn test_gate_leaves_other_qubits_alone() {
        let mut sv = Statevector::new(3).unwrap();
        sv.apply_unitary(&StandardGate::X.matrix(), &[2]);
        sv.apply_unitary(&StandardGate::Swap.matrix(), &[0, 2]);
        assert!(approx_eq(sv.amplitudes[0b001], c(1.0)));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_toffoli() {
        let mut sv = Statevector::new(3).unwrap();
        sv.apply_unitary(&StandardGate::X.matrix(), &[0]);
        sv.apply_unitary(&StandardGate::X.matrix(), &[1]);
        sv.apply_unitary(&StandardGate::CCX.matrix(), &[0, 1, 2]);
        assert!(approx_eq(sv.amplitudes[0b111], c(1.0)));
    }

    #[test]
    fn test_measure_collapses() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_unitary(&StandardGate::H.matrix(), &[0]);
        sv.apply_unitary(&StandardGate::CX.matrix(), &[0, 1]);

        assert!(sv.measure(0, 0.1));
        assert!(approx_eq(sv.amplitudes[3], c(1.0)));
        assert!((sv.probability_one(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_measure_deterministic_states() {
        let mut sv = Statevector::new(1).unwrap();
        assert!(!sv.measure(0, 0.0));
        sv.apply_x(0);
        assert!(sv.measure(0, 0.999_999));
    }

    #[test]
    fn test_reset() {
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_unitary(&StandardGate::H.matrix(), &[0]);
        sv.reset(0, 0.0);
        assert!(approx_eq(sv.amplitudes[0], c(1.0)));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
    }

    #[test]
    fn test_initialize_fresh_register() {
        let mut sv = Statevector::new(2).unwrap();
        sv.initialize(&[0, 1], &[c(0.5); 4]);
        assert!(sv.amplitudes.iter().all(|a| approx_eq(*a, c(0.5))));
    }

    #[test]
    fn test_initialize_subsystem_keeps_rest() {
        // Qubit 0 in |1⟩; initialize qubit 1 to |+⟩.
        let mut sv = Statevector::new(2).unwrap();
        sv.apply_x(0);
        sv.initialize(&[1], &[c(FRAC_1_SQRT_2), c(FRAC_1_SQRT_2)]);

        assert!(approx_eq(sv.amplitudes[0b01], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(sv.amplitudes[0b11], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(sv.amplitudes[0b00], ZERO));
        assert!(approx_eq(sv.amplitudes[0b10], ZERO));
    }

    #[test]
    fn test_initialize_overwrites_prepared_qubit() {
        // Target already in |1⟩; initialize back to |0⟩.
        let mut sv = Statevector::new(1).unwrap();
        sv.apply_x(0);
        sv.initialize(&[0], &[c(1.0), ZERO]);
        assert!(approx_eq(sv.amplitudes[0], c(1.0)));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
    }

    #[test]
    fn test_new_rejects_unaddressable_width() {
        assert!(matches!(
            Statevector::new(64),
            Err(SimError::TooManyQubits { num_qubits: 64, .. })
        ));
    }
}
