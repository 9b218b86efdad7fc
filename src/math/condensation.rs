//! Static (Guyan) condensation: eliminate interior DOFs from a stiffness
//! matrix, keeping only boundary DOFs, for use as a super-element.

use nalgebra::DMatrix;

use crate::error::{SolverError, UnstableKind};

/// Result of condensing a stiffness matrix down to its boundary DOFs.
#[derive(Debug)]
pub struct CondensationResult {
    /// The condensed boundary stiffness `K* = Kmm - Kmi·Kii⁻¹·Kim`
    pub k_star: DMatrix<f64>,
    /// Recovery transform `T = -Kii⁻¹·Kim`: interior displacements are
    /// recovered as `u_i = T · u_b` once the reduced model is solved.
    pub transformation: DMatrix<f64>,
    /// `max|K*_ij - K*_ji| / max|K*_ij|`, the relative asymmetry introduced
    /// by floating-point round-off during elimination.
    pub relative_asymmetry: f64,
}

fn extract(k: &DMatrix<f64>, rows: &[usize], cols: &[usize]) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(rows.len(), cols.len());
    for (i, &r) in rows.iter().enumerate() {
        for (j, &c) in cols.iter().enumerate() {
            out[(i, j)] = k[(r, c)];
        }
    }
    out
}

/// Condense `k` (indexed over the full DOF set) down to `boundary`,
/// eliminating `interior`. `boundary` and `interior` must partition the
/// full DOF range with no overlap.
pub fn condense(
    k: &DMatrix<f64>,
    boundary: &[usize],
    interior: &[usize],
) -> Result<CondensationResult, SolverError> {
    if interior.is_empty() {
        let k_star = extract(k, boundary, boundary);
        let transformation = DMatrix::zeros(0, boundary.len());
        return Ok(CondensationResult {
            k_star,
            transformation,
            relative_asymmetry: 0.0,
        });
    }

    let kmm = extract(k, boundary, boundary);
    let kmi = extract(k, boundary, interior);
    let kim = extract(k, interior, boundary);
    let kii = extract(k, interior, interior);

    let kii_inv = kii.clone().try_inverse().ok_or_else(|| SolverError::Unstable {
        kind: UnstableKind::Mechanism,
        message: "interior partition is singular during static condensation".to_string(),
    })?;

    let transformation = -&kii_inv * &kim;
    let k_star = &kmm - &kmi * &kii_inv * &kim;

    let n_b = boundary.len();
    let mut max_asym = 0.0_f64;
    let mut max_val = 0.0_f64;
    for i in 0..n_b {
        for j in 0..n_b {
            max_asym = max_asym.max((k_star[(i, j)] - k_star[(j, i)]).abs());
            max_val = max_val.max(k_star[(i, j)].abs());
        }
    }
    let relative_asymmetry = if max_val > 1e-300 { max_asym / max_val } else { 0.0 };

    // Symmetrize for storage; the asymmetry is reported, not hidden.
    let k_star_sym = (&k_star + k_star.transpose()) * 0.5;

    Ok(CondensationResult {
        k_star: k_star_sym,
        transformation,
        relative_asymmetry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condensing_no_interior_dofs_is_identity() {
        let k = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
        let result = condense(&k, &[0, 1], &[]).unwrap();
        assert_eq!(result.k_star, k);
    }

    #[test]
    fn condensation_round_trip_preserves_stiffness_of_a_simple_chain() {
        // Three collinear unit springs in series, k=1 each: full 4-node
        // chain collapses to a single spring between the two end nodes.
        let n = 4;
        let mut k = DMatrix::zeros(n, n);
        for i in 0..n - 1 {
            k[(i, i)] += 1.0;
            k[(i + 1, i + 1)] += 1.0;
            k[(i, i + 1)] -= 1.0;
            k[(i + 1, i)] -= 1.0;
        }
        let boundary = [0, 3];
        let interior = [1, 2];
        let result = condense(&k, &boundary, &interior).unwrap();
        // Three springs in series (k=1 each) combine to k = 1/3
        assert!((result.k_star[(0, 0)] - 1.0 / 3.0).abs() < 1e-8);
        assert!((result.k_star[(0, 1)] + 1.0 / 3.0).abs() < 1e-8);
        assert!(result.relative_asymmetry < 1e-10);
    }

    #[test]
    fn singular_interior_partition_is_reported_as_mechanism() {
        let k = DMatrix::from_row_slice(3, 3, &[1.0, -1.0, 0.0, -1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let err = condense(&k, &[0], &[1, 2]).unwrap_err();
        assert!(matches!(err, SolverError::Unstable { .. }));
    }
}
