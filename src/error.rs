//! Error and warning taxonomy for the analysis core

use thiserror::Error;

/// Why a stiffness system was judged unstable
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnstableKind {
    /// No free degrees of freedom remain after applying supports
    FullyConstrained,
    /// Rank deficiency detected by pivot collapse or CG breakdown
    Mechanism,
    /// Large residual norm persisted after the iteration cap
    IllConditioned,
}

/// Main error type for the analysis core.
///
/// Validation errors (`InvalidModel`) abort before any linear algebra.
/// Numerical failures during solve are captured here rather than
/// surfacing raw nalgebra panics. `Unconverged` is deliberately absent:
/// a CG/BiCGSTAB run that hits its iteration cap still returns an
/// `AnalysisResult` with `converged = false`, not an `Err`.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("member '{0}' not found in model")]
    MemberNotFound(String),

    #[error("load case '{0}' not found in model")]
    LoadCaseNotFound(String),

    #[error("duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("model is unstable ({kind:?}): {message}")]
    Unstable { kind: UnstableKind, message: String },

    #[error("cancelled by caller")]
    Cancelled,

    #[error("DOF count {dofs} exceeds configured budget {budget}")]
    ResourceBudgetExceeded { dofs: usize, budget: usize },

    #[error("design check not implemented for this member: {0}")]
    DesignCheckNotImplemented(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for analysis-core operations
pub type SolverResult<T> = Result<T, SolverError>;

/// Non-fatal conditions accumulated during a solve; never abort, always
/// recorded on the result and also emitted via `log::warn!`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Warning {
    /// Reference to an unknown material/section resolved to a built-in default
    DefaultedReference { kind: String, name: String },
    /// A degenerate (zero-length) member was skipped during assembly
    DegenerateMemberSkipped { member: String },
    /// CG/BiCGSTAB hit the iteration cap without reaching tolerance
    Unconverged { residual_norm: f64, tolerance: f64 },
    /// Super-element K* failed the relative-symmetry check
    AsymmetricCondensedStiffness { relative_error: f64 },
    /// A diagonal entry was smaller than the conditioning tolerance
    SmallDiagonal { index: usize, value: f64 },
    /// DOF count crossed the advisory threshold but stayed within budget
    LargeModel { dofs: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DefaultedReference { kind, name } => {
                write!(f, "{kind} '{name}' not found, using default")
            }
            Warning::DegenerateMemberSkipped { member } => {
                write!(f, "member '{member}' has near-zero length, skipped")
            }
            Warning::Unconverged {
                residual_norm,
                tolerance,
            } => write!(
                f,
                "solver did not converge: residual {residual_norm:.3e} > tolerance {tolerance:.3e}"
            ),
            Warning::AsymmetricCondensedStiffness { relative_error } => write!(
                f,
                "condensed stiffness failed symmetry check, relative error {relative_error:.3e}"
            ),
            Warning::SmallDiagonal { index, value } => {
                write!(f, "diagonal entry {index} is small ({value:.3e})")
            }
            Warning::LargeModel { dofs } => {
                write!(f, "model has {dofs} DOFs, above the advisory threshold")
            }
        }
    }
}
