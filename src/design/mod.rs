//! Code-based design checks that consume solver output: steel interaction
//! ratios and RC beam/column sizing. Dispatches on the member's material
//! category; a category with no implemented check is a reported result
//! (`SolverError::DesignCheckNotImplemented`), not a panic or a guess.

pub mod rc;
pub mod steel;

use crate::elements::MaterialCategory;
use crate::error::{SolverError, SolverResult};
use crate::model::Model;
use crate::results::MemberForces;
use steel::{SteelCheck, SteelDemand};

/// A single scalar utilization with the name of the governing check.
#[derive(Debug, Clone)]
pub struct DesignRatio {
    pub utilization: f64,
    pub governing: String,
}

/// Outcome of dispatching a member through the design-check subsystem.
#[derive(Debug, Clone)]
pub enum DesignCheck {
    Steel(SteelCheck),
}

/// Check `member` against its material's code-based design rule, using the
/// governing end forces already recovered by the solver. Effective-length
/// factor `k` and unbraced lengths are caller-supplied (they depend on
/// bracing the model doesn't represent).
pub fn check_member(
    model: &Model,
    member_name: &str,
    forces: &MemberForces,
    k: f64,
    unbraced_length: f64,
    unbraced_flexural_length: f64,
) -> SolverResult<DesignCheck> {
    let (_, member) = model
        .members()
        .find(|(name, _)| name.as_str() == member_name)
        .ok_or_else(|| SolverError::MemberNotFound(member_name.to_string()))?;
    let (material, _) = model.material_or_default(&member.material);
    let (section, _) = model.section_or_default(&member.section);

    match material.category {
        MaterialCategory::Steel => {
            let demand = SteelDemand {
                p_u: forces.axial,
                m_ux: forces.moment_z,
                m_uy: forces.moment_y,
            };
            let check = steel::check_interaction(&material, &section, demand, k, unbraced_length, unbraced_flexural_length)?;
            Ok(DesignCheck::Steel(check))
        }
        MaterialCategory::Concrete | MaterialCategory::Timber | MaterialCategory::Other => Err(
            SolverError::DesignCheckNotImplemented(format!("no design check implemented for material category {:?}", material.category)),
        ),
    }
}

impl DesignCheck {
    pub fn as_ratio(&self) -> DesignRatio {
        match self {
            DesignCheck::Steel(check) => {
                let entries = [
                    ("tension", check.tension_ratio),
                    ("compression", check.compression_ratio),
                    ("Mx", check.mx_ratio),
                    ("My", check.my_ratio),
                    ("interaction", check.interaction_ratio),
                ];
                let (governing, utilization) = entries
                    .into_iter()
                    .fold(("tension", 0.0_f64), |acc, (name, value)| if value > acc.1 { (name, value) } else { acc });
                DesignRatio {
                    utilization,
                    governing: governing.to_string(),
                }
            }
        }
    }
}
