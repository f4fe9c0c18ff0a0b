//! State fidelity between pure states.

use num_complex::Complex64;

/// Fidelity `|⟨a|b⟩|² / (⟨a|a⟩⟨b|b⟩)` of two pure states.
///
/// Returns 0 for vectors of different length or a zero vector.
pub fn state_fidelity(a: &[Complex64], b: &[Complex64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norms: f64 = a.iter().map(Complex64::norm_sqr).sum::<f64>()
        * b.iter().map(Complex64::norm_sqr).sum::<f64>();
    if norms == 0.0 {
        return 0.0;
    }
    let overlap: Complex64 = a.iter().zip(b).map(|(x, y)| x.conj() * y).sum();
    overlap.norm_sqr() / norms
}
