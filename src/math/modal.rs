//! Generalized eigensolver for undamped free vibration: `(K - λM)φ = 0`
//!
//! `M` is diagonal (lumped mass), so `A = M⁻¹K` is generally non-symmetric
//! even though `K` and `M` are themselves symmetric. Rather than pull in a
//! non-symmetric eigensolver, this symmetrizes via
//! `A_sym = M^{-1/2}·K·M^{-1/2}`, solves the symmetric eigenproblem with
//! `nalgebra`'s dense `SymmetricEigen`, then recovers mode shapes as
//! `φ = M^{-1/2}·ψ`. This is mathematically equivalent to `A = M⁻¹K` and
//! is the standard numerically-stable reduction for a diagonal mass matrix.

use nalgebra::{DMatrix, DVector};

/// A solved mode: natural frequency and mode shape, in ascending frequency order.
pub struct Mode {
    pub eigenvalue: f64,
    pub angular_frequency: f64,
    pub shape: DVector<f64>,
}

/// Solve for the lowest `num_modes` modes of `(K - λM)φ = 0` given dense
/// symmetric `k` and the diagonal of lumped mass `m_diag`.
///
/// Negative eigenvalues produced by round-off (expected only very close to
/// zero for a well-posed model) are clamped to zero before taking `sqrt`.
pub fn solve_modal(k: &DMatrix<f64>, m_diag: &DVector<f64>, num_modes: usize) -> Vec<Mode> {
    let n = k.nrows();
    let mut m_inv_sqrt = DVector::zeros(n);
    for i in 0..n {
        let m = m_diag[i].max(1e-300);
        m_inv_sqrt[i] = 1.0 / m.sqrt();
    }

    let mut a_sym = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            a_sym[(i, j)] = m_inv_sqrt[i] * k[(i, j)] * m_inv_sqrt[j];
        }
    }
    // Round-off can leave a_sym very slightly asymmetric; enforce it exactly
    // before handing to a symmetric eigensolver.
    let a_sym = (&a_sym + a_sym.transpose()) * 0.5;

    let eigen = nalgebra::linalg::SymmetricEigen::new(a_sym);

    let mut order: std::vec::Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].partial_cmp(&eigen.eigenvalues[b]).unwrap());

    order
        .into_iter()
        .take(num_modes.min(n))
        .map(|idx| {
            let lambda = eigen.eigenvalues[idx].max(0.0);
            let psi = eigen.eigenvectors.column(idx).into_owned();
            let mut shape = DVector::zeros(n);
            for i in 0..n {
                shape[i] = m_inv_sqrt[i] * psi[i];
            }
            Mode {
                eigenvalue: lambda,
                angular_frequency: lambda.sqrt(),
                shape,
            }
        })
        .collect()
}
