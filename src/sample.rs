//! Noise sampling from the per-variant CDF table.

use crate::matrix::SignedMat;
use crate::params::Params;

/// Draws one sample from χ by inverting the cumulative distribution table.
///
/// It implements Frodo.Sample according to the FrodoKEM specification,
/// Algorithm 5. The low bit of the uniform word selects the sign lobe and
/// the remaining 15 bits index the CDF. The scan visits every table entry
/// and the negation is arithmetic, so no branch or access pattern depends
/// on `r`.
pub(crate) fn sample(params: &Params, r: u16) -> i16 {
    let t = r >> 1;
    let mut e: u16 = 0;
    for &c in &params.t_chi[..params.t_chi.len() - 1] {
        // adds 1 exactly when c < t; both sides are below 2¹⁵, so the
        // borrow lands in the top bit
        e += c.wrapping_sub(t) >> 15;
    }
    let r0 = (r & 1) as i16;
    ((e as i16) ^ -r0).wrapping_add(r0)
}

/// Fills an n1×n2 noise matrix row-major from consecutive uniform words.
///
/// It implements Frodo.SampleMatrix according to the FrodoKEM
/// specification, Algorithm 6.
pub(crate) fn sample_matrix(params: &Params, r: &[u16], n1: usize, n2: usize) -> SignedMat {
    assert_eq!(r.len(), n1 * n2, "matrix shape mismatch");
    SignedMat { rows: n1, cols: n2, v: r.iter().map(|&w| sample(params, w)).collect() }
}
