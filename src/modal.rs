//! Crate-level modal eigensolver entrypoint: takes a `Model`, assembles the
//! free-DOF stiffness partition the same way `solve::solve` does, lumps a
//! diagonal mass vector from member self-weight, and hands both to
//! `math::modal::solve_modal`.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};

use crate::config::Config;
use crate::error::{SolverError, SolverResult, UnstableKind, Warning};
use crate::math::modal::solve_modal;
use crate::model::Model;
use crate::results::{ModalResult, ModeResult};
use crate::solve::build_member_assembly;

/// Lumped mass floor substituted for a DOF with no mass contribution
/// (typically rotational DOFs, which this crate does not lump rotary
/// inertia onto), so the mass matrix stays invertible.
const MASS_FLOOR: f64 = 1e-6;

/// Solve for the lowest `num_modes` natural modes of `model`, ignoring
/// applied loads (stiffness only) and restrained DOFs. Member self-weight
/// is lumped half to each end node's translational DOFs; rotational DOFs
/// and unloaded translational DOFs get `MASS_FLOOR` to keep the mass matrix
/// invertible, per the "zero entries replaced with a small positive value"
/// rule.
pub fn solve(model: &Model, config: &Config, num_modes: usize) -> SolverResult<ModalResult> {
    let n = model.num_dofs();
    if let Some(budget) = config.dof_budget {
        if n > budget {
            return Err(SolverError::ResourceBudgetExceeded { dofs: n, budget });
        }
    }

    let mut warnings = Vec::new();
    let dof_map = model.dof_map();

    // Stiffness-only assembly: no load case in the model will match this
    // sentinel, so every member's fixed-end reaction vector is zero and only
    // k_local is exercised.
    let members = build_member_assembly(model, "__modal__", config, &dof_map, &mut warnings)?;

    let mut free_compact: Vec<Option<usize>> = vec![None; n];
    for (name, base) in &dof_map {
        let support = model.support(name);
        let restrained = support.map(|s| [s.dx, s.dy, s.dz, s.rx, s.ry, s.rz]);
        for local in 0..6 {
            let gdof = base + local;
            let is_restrained = restrained.map(|r| r[local]).unwrap_or(false);
            if !is_restrained {
                free_compact[gdof] = Some(0);
            }
        }
    }
    let mut next_free = 0usize;
    for slot in free_compact.iter_mut() {
        if slot.is_some() {
            *slot = Some(next_free);
            next_free += 1;
        }
    }
    let n_free = next_free;

    if n_free == 0 {
        return Err(SolverError::Unstable {
            kind: UnstableKind::FullyConstrained,
            message: "model has no free degrees of freedom".to_string(),
        });
    }

    let mut k_ff = DMatrix::zeros(n_free, n_free);
    for assembly in &members {
        for a in 0..12 {
            let Some(fa) = free_compact[assembly.dofs[a]] else { continue };
            for b in 0..12 {
                let Some(fb) = free_compact[assembly.dofs[b]] else { continue };
                k_ff[(fa, fb)] += assembly.k_local[(a, b)];
            }
        }
    }

    let mut m_full = vec![0.0_f64; n];
    for (name, member) in model.members() {
        let Some(length) = model.member_length(member) else { continue };
        let (material, _) = model.material_or_default(&member.material);
        let (section, _) = model.section_or_default(&member.section);
        let member_mass = material.rho * section.a * length;
        let half = member_mass * 0.5;

        for node_name in [&member.i_node, &member.j_node] {
            if let Some(&base) = dof_map.get(node_name) {
                for local in 0..3 {
                    m_full[base + local] += half;
                }
            }
        }
        let _ = name;
    }

    let mut m_free = DVector::zeros(n_free);
    for gdof in 0..n {
        if let Some(fi) = free_compact[gdof] {
            let mass = m_full[gdof];
            m_free[fi] = if mass > MASS_FLOOR { mass } else { MASS_FLOOR };
        }
    }

    if n_free > config.dof_warning_threshold {
        let w = Warning::LargeModel { dofs: n_free };
        log::warn!("{w}");
        warnings.push(w);
    }

    let modes = solve_modal(&k_ff, &m_free, num_modes);
    let modes = modes
        .into_iter()
        .map(|mode| ModeResult {
            eigenvalue: mode.eigenvalue,
            angular_frequency: mode.angular_frequency,
            frequency_hz: mode.angular_frequency / (2.0 * std::f64::consts::PI),
            shape: mode.shape.iter().copied().collect(),
        })
        .collect();

    Ok(ModalResult { modes, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Member, Node, Section, Support};

    fn cantilever_column() -> Model {
        let mut model = Model::new();
        model.add_node("Base", Node::new(0.0, 0.0, 0.0));
        model.add_node("Top", Node::new(0.0, 3.0, 0.0));
        model.add_material("Steel", Material::steel());
        model.add_section("Sec", Section::wide_flange(0.3, 0.2, 0.015, 0.01));
        model.add_member("Col", Member::new("Base", "Top", "Steel", "Sec"));
        model.add_support("Base", Support::fixed());
        model
    }

    #[test]
    fn cantilever_produces_ascending_positive_frequencies() {
        let model = cantilever_column();
        let config = Config::default();
        let result = solve(&model, &config, 3).unwrap();
        assert!(!result.modes.is_empty());
        for pair in result.modes.windows(2) {
            assert!(pair[0].angular_frequency <= pair[1].angular_frequency);
        }
        for mode in &result.modes {
            assert!(mode.frequency_hz >= 0.0);
        }
    }

    #[test]
    fn fully_constrained_model_has_no_free_dofs() {
        let mut model = Model::new();
        model.add_node("A", Node::new(0.0, 0.0, 0.0));
        model.add_support("A", Support::fixed());
        let config = Config::default();
        let err = solve(&model, &config, 1).unwrap_err();
        assert!(matches!(
            err,
            SolverError::Unstable {
                kind: UnstableKind::FullyConstrained,
                ..
            }
        ));
    }
}
