//! The static-condensation hybrid assembly driver (§4.E "Hybrid driver"):
//! solves a reduced model — boundary nodes of each super-element, plus every
//! node and member outside any substructure — with super-element stiffness
//! blocks (`K*`) scattered directly into the global system alongside
//! ordinary member stiffness, via `DokBuilder::add_submatrix` for both.
//! Supports are applied by the penalty method (large diagonal, zeroed RHS
//! row) rather than partitioning, and the system is solved iteratively with
//! BiCGSTAB rather than plain CG, since a condensed `K*` isn't guaranteed
//! exactly symmetric once mixed with the penalty diagonal. Once solved,
//! each super-element's internal displacements are recovered from its
//! stored `T` via `u_i = T · u_m`.

use std::collections::BTreeMap;

use nalgebra::DVector;

use crate::config::Config;
use crate::error::{SolverError, SolverResult, Warning};
use crate::math::{solve_bicgstab, DokBuilder, Mat12};
use crate::model::Model;
use crate::results::NodeDisplacement;
use crate::solve::build_member_assembly;
use crate::superelement::SuperElement;

fn to_dense(mat: &Mat12) -> nalgebra::DMatrix<f64> {
    nalgebra::DMatrix::from_column_slice(12, 12, mat.as_slice())
}

/// Outcome of a hybrid solve: displacements at every node of the reduced
/// model plus every recovered super-element interior node.
#[derive(Debug, Clone)]
pub struct HybridResult {
    pub displacements: BTreeMap<String, NodeDisplacement>,
    pub converged: bool,
    pub residual_norm: f64,
    pub warnings: Vec<Warning>,
}

/// Solve `reduced_model` under load case `case` with one or more
/// super-elements contributing condensed stiffness at their boundary nodes.
/// `reduced_model` must already contain every boundary node referenced by
/// `super_elements` (the caller builds the reduced model per §4.E: boundary
/// nodes of each super-element, union the nodes and members outside any
/// substructure).
pub fn solve_hybrid(reduced_model: &Model, case: &str, super_elements: &[&SuperElement], config: &Config) -> SolverResult<HybridResult> {
    let n = reduced_model.num_dofs();
    if let Some(budget) = config.dof_budget {
        if n > budget {
            return Err(SolverError::ResourceBudgetExceeded { dofs: n, budget });
        }
    }

    let dof_map = reduced_model.dof_map();
    let mut warnings = Vec::new();

    let members = build_member_assembly(reduced_model, case, config, &dof_map, &mut warnings)?;

    let mut builder = DokBuilder::new(n);
    for assembly in &members {
        builder.add_submatrix(&assembly.dofs, &to_dense(&assembly.k_global));
    }

    let mut se_boundary_dofs: Vec<Vec<usize>> = Vec::with_capacity(super_elements.len());
    for se in super_elements {
        // `k_star`'s rows/cols follow `se.boundary_nodes` sorted by name (the
        // order `SuperElement::reduce` walked the sub-model's nodes in), not
        // necessarily the order callers originally listed them in.
        let mut sorted_boundary = se.boundary_nodes.clone();
        sorted_boundary.sort();

        let mut dofs = Vec::with_capacity(sorted_boundary.len() * 6);
        for name in &sorted_boundary {
            let &base = dof_map.get(name).ok_or_else(|| SolverError::NodeNotFound(name.clone()))?;
            dofs.extend(base..base + 6);
        }
        builder.add_submatrix(&dofs, &se.k_star);
        se_boundary_dofs.push(dofs);
    }

    let mut f = DVector::zeros(n);
    for assembly in &members {
        let equiv = -assembly.t.transpose() * assembly.fer_local;
        for a in 0..12 {
            f[assembly.dofs[a]] += equiv[a];
        }
    }
    for load in reduced_model.node_loads() {
        if load.load.case != case {
            continue;
        }
        let &base = dof_map.get(&load.node).ok_or_else(|| SolverError::NodeNotFound(load.node.clone()))?;
        let arr = load.load.as_array();
        for local in 0..6 {
            f[base + local] += arr[local];
        }
    }

    // Penalty boundary conditions: diagonal <- large, RHS row <- 0.
    for (name, &base) in &dof_map {
        let Some(support) = reduced_model.support(name) else { continue };
        let restrained = [support.dx, support.dy, support.dz, support.rx, support.ry, support.rz];
        for local in 0..6 {
            if restrained[local] {
                builder.add(base + local, base + local, config.penalty);
                f[base + local] = 0.0;
            }
        }
    }

    let csr = builder.to_csr();
    let max_iter = config.cg_max_iterations_for(n);
    // K* carries whatever asymmetry survived condensation (see
    // `Warning::AsymmetricCondensedStiffness`), so the penalty-conditioned
    // system isn't guaranteed symmetric once it's mixed in — BiCGSTAB rather
    // than plain CG, per `solve_bicgstab`'s own doc comment.
    let (u, converged, residual) = solve_bicgstab(&csr, &f, config.cg_tolerance, max_iter, None);
    if !converged {
        let w = Warning::Unconverged {
            residual_norm: residual,
            tolerance: config.cg_tolerance,
        };
        log::warn!("{w}");
        warnings.push(w);
    }

    let mut displacements = BTreeMap::new();
    for (name, &base) in &dof_map {
        let arr: [f64; 6] = std::array::from_fn(|i| u[base + i]);
        displacements.insert(name.clone(), NodeDisplacement::from_array(arr));
    }

    for (se, dofs) in super_elements.iter().zip(se_boundary_dofs.iter()) {
        let Some(recovery) = &se.recovery else { continue };
        if se.internal_nodes.is_empty() {
            continue;
        }
        let u_m = DVector::from_iterator(dofs.len(), dofs.iter().map(|&d| u[d]));
        let u_i = recovery * u_m;
        for (idx, node_name) in se.internal_nodes.iter().enumerate() {
            let arr: [f64; 6] = std::array::from_fn(|k| u_i[idx * 6 + k]);
            displacements.insert(node_name.clone(), NodeDisplacement::from_array(arr));
        }
    }

    Ok(HybridResult {
        displacements,
        converged,
        residual_norm: residual,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Member, Node, Section, Support};
    use crate::loads::NodeLoad;
    use approx::assert_relative_eq;

    /// A 4-node collinear chain (N0..N3), condensed down to its end nodes,
    /// then re-solved through the hybrid driver and compared against a
    /// direct solve of the uncondensed chain: property 4 (condensation
    /// round-trip), exercised end to end.
    fn chain_model() -> Model {
        let mut model = Model::new();
        for (i, x) in [0.0, 1.0, 2.0, 3.0].into_iter().enumerate() {
            model.add_node(&format!("N{i}"), Node::new(x, 0.0, 0.0));
        }
        model.add_material("Steel", Material::steel());
        model.add_section("Sec", Section::rectangular(0.1, 0.1));
        model.add_member("M0", Member::new("N0", "N1", "Steel", "Sec"));
        model.add_member("M1", Member::new("N1", "N2", "Steel", "Sec"));
        model.add_member("M2", Member::new("N2", "N3", "Steel", "Sec"));
        model
    }

    #[test]
    fn hybrid_solve_matches_direct_solve_at_boundary_and_recovers_interior() {
        let mut full = chain_model();
        full.add_support("N0", Support::fixed());
        full.add_node_load("N3", NodeLoad::fy(-1e3, "Case 1"));

        let config = Config::default();
        let direct = crate::solve::solve(&full, "Case 1", &config).unwrap();

        let condense_model = chain_model();
        let boundary = vec!["N0".to_string(), "N3".to_string()];
        let se = SuperElement::reduce("SE1", &condense_model, &boundary, &config).unwrap();

        let mut reduced = Model::new();
        reduced.add_node("N0", Node::new(0.0, 0.0, 0.0));
        reduced.add_node("N3", Node::new(3.0, 0.0, 0.0));
        reduced.add_support("N0", Support::fixed());
        reduced.add_node_load("N3", NodeLoad::fy(-1e3, "Case 1"));

        let hybrid = solve_hybrid(&reduced, "Case 1", &[&se], &config).unwrap();
        assert!(hybrid.converged);

        assert_relative_eq!(hybrid.displacements["N3"].dy, direct.displacements["N3"].dy, max_relative = 1e-4);
        assert_relative_eq!(hybrid.displacements["N1"].dy, direct.displacements["N1"].dy, max_relative = 1e-3);
        assert_relative_eq!(hybrid.displacements["N2"].dy, direct.displacements["N2"].dy, max_relative = 1e-3);
    }
}
