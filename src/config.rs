//! Caller-supplied solver configuration
//!
//! Unlike the teacher's `AnalysisOptions` (which bundled analysis-type
//! selection together with numerical tuning), `Config` carries only the
//! recognized options: it has no `analysis_type` field because each
//! operation (`solve`, `condense`, `modal`, `diagram`) is its own entrypoint.

use serde::{Deserialize, Serialize};

/// Recognized solver configuration. All fields have documented defaults;
/// there is no environment-variable or CLI surface for the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Free-DOF count at or above which the sparse CG/BiCGSTAB path is used
    /// instead of dense LU.
    pub sparse_threshold_dofs: usize,
    /// Relative convergence tolerance for CG/BiCGSTAB: ‖r_k‖₂ < τ·‖b‖₂.
    pub cg_tolerance: f64,
    /// Iteration cap for CG/BiCGSTAB. `None` means `3 * n_free`.
    pub cg_max_iterations: Option<usize>,
    /// Apply a Jacobi (diagonal) preconditioner to CG.
    pub cg_use_jacobi_preconditioner: bool,
    /// Diagonal penalty stiffness used by the condensation hybrid driver's
    /// boundary-condition strategy.
    pub penalty: f64,
    /// Relative tolerance below which a condensation pivot is flagged ill-conditioned.
    pub condensation_conditioning_tolerance: f64,
    /// Number of segments used to sample an internal-force diagram.
    pub diagram_segments: usize,
    /// Damping ratio (percent of critical) used by the seismic spectral
    /// coefficient correction.
    pub seismic_damping_percent: f64,
    /// Advisory DOF count above which a `Warning::LargeModel` is recorded.
    pub dof_warning_threshold: usize,
    /// Hard ceiling on DOF count for a single solve; `None` disables the check.
    pub dof_budget: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sparse_threshold_dofs: 300,
            cg_tolerance: 1e-8,
            cg_max_iterations: None,
            cg_use_jacobi_preconditioner: true,
            penalty: 1e20,
            condensation_conditioning_tolerance: 1e-10,
            diagram_segments: 20,
            seismic_damping_percent: 5.0,
            dof_warning_threshold: 3000,
            dof_budget: Some(6000),
        }
    }
}

impl Config {
    pub fn cg_max_iterations_for(&self, n_free: usize) -> usize {
        self.cg_max_iterations.unwrap_or(3 * n_free.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();
        assert_eq!(c.sparse_threshold_dofs, 300);
        assert_eq!(c.cg_tolerance, 1e-8);
        assert!(c.cg_use_jacobi_preconditioner);
        assert_eq!(c.penalty, 1e20);
        assert_eq!(c.condensation_conditioning_tolerance, 1e-10);
        assert_eq!(c.diagram_segments, 20);
        assert_eq!(c.seismic_damping_percent, 5.0);
    }

    #[test]
    fn cg_max_iterations_defaults_to_three_times_n_free() {
        let c = Config::default();
        assert_eq!(c.cg_max_iterations_for(100), 300);
    }
}
