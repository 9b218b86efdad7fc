//! Super-elements: persisted results of static condensation, plus the
//! boundary-detection and merge rules that let them compose.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{SolverResult, Warning};
use crate::math::condensation::condense;
use crate::math::{apply_releases, member_local_stiffness, member_transformation_matrix, Mat12};
use crate::model::Model;

/// Original/condensed DOF counts and the resulting reduction ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CondensationStats {
    pub original_dofs: usize,
    pub condensed_dofs: usize,
    pub reduction_ratio: f64,
}

/// A persisted result of static condensation: a condensed stiffness block
/// plus the operator that recovers internal displacements from boundary
/// displacements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperElement {
    pub id: String,
    pub boundary_nodes: Vec<String>,
    /// Condensed stiffness K*, size `6*boundary_nodes.len()` square.
    pub k_star: DMatrix<f64>,
    /// Recovery operator T: `u_interior = T * u_boundary`. Empty for a
    /// merged super-element.
    pub recovery: Option<DMatrix<f64>>,
    pub internal_nodes: Vec<String>,
    pub stats: CondensationStats,
    pub created_at: DateTime<Utc>,
    pub warnings: Vec<Warning>,
}

fn member_global_stiffness(model: &Model, dof_map: &BTreeMap<String, usize>, member_name: &str) -> Option<([usize; 12], Mat12)> {
    let member = model.members().find(|(name, _)| *name == member_name)?.1;
    let i_node = model.node(&member.i_node)?;
    let j_node = model.node(&member.j_node)?;
    let length = i_node.distance_to(j_node);
    if length < 1e-10 {
        return None;
    }
    let (material, _) = model.material_or_default(&member.material);
    let (section, _) = model.section_or_default(&member.section);

    let t = member_transformation_matrix(&i_node.coords(), &j_node.coords(), member.rotation);
    let k_local = member_local_stiffness(
        material.e,
        material.effective_g(),
        section.a,
        section.iy,
        section.iz,
        section.j,
        length,
    );
    let releases = member.releases.as_array();
    let k_local = if member.releases.any() {
        apply_releases(&k_local, &releases)
    } else {
        k_local
    };
    let k_global = t.transpose() * k_local * t;

    let i_base = dof_map[&member.i_node];
    let j_base = dof_map[&member.j_node];
    let mut dofs = [0usize; 12];
    for k in 0..6 {
        dofs[k] = i_base + k;
        dofs[k + 6] = j_base + k;
    }
    Some((dofs, k_global))
}

/// Full dense stiffness matrix of `model`, in its own DOF numbering.
fn assemble_dense(model: &Model) -> (DMatrix<f64>, BTreeMap<String, usize>) {
    let dof_map = model.dof_map();
    let n = model.num_dofs();
    let mut k = DMatrix::zeros(n, n);
    for (name, _) in model.members() {
        if let Some((dofs, k_elem)) = member_global_stiffness(model, &dof_map, name) {
            for a in 0..12 {
                for b in 0..12 {
                    k[(dofs[a], dofs[b])] += k_elem[(a, b)];
                }
            }
        }
    }
    (k, dof_map)
}

impl SuperElement {
    /// Condense `sub_model` down to `boundary_node_ids`, eliminating every
    /// other node's DOFs.
    pub fn reduce(id: &str, sub_model: &Model, boundary_node_ids: &[String], config: &Config) -> SolverResult<SuperElement> {
        let (k, dof_map) = assemble_dense(sub_model);
        let boundary_set: BTreeSet<&String> = boundary_node_ids.iter().collect();

        let mut boundary_dofs = Vec::new();
        let mut internal_dofs = Vec::new();
        let mut internal_nodes = Vec::new();
        for name in sub_model.node_names() {
            let base = dof_map[name];
            if boundary_set.contains(name) {
                boundary_dofs.extend(base..base + 6);
            } else {
                internal_dofs.extend(base..base + 6);
                internal_nodes.push(name.clone());
            }
        }

        let result = condense(&k, &boundary_dofs, &internal_dofs)?;

        let mut warnings = Vec::new();
        if result.relative_asymmetry > config.condensation_conditioning_tolerance {
            let w = Warning::AsymmetricCondensedStiffness {
                relative_error: result.relative_asymmetry,
            };
            log::warn!("{w}");
            warnings.push(w);
        }

        let original_dofs = k.nrows();
        let condensed_dofs = boundary_dofs.len();
        let stats = CondensationStats {
            original_dofs,
            condensed_dofs,
            reduction_ratio: if original_dofs > 0 {
                1.0 - (condensed_dofs as f64 / original_dofs as f64)
            } else {
                0.0
            },
        };

        Ok(SuperElement {
            id: id.to_string(),
            boundary_nodes: boundary_node_ids.to_vec(),
            k_star: result.k_star,
            recovery: Some(result.transformation),
            internal_nodes,
            stats,
            created_at: Utc::now(),
            warnings,
        })
    }

    /// Boundary-node auto-detection: a node in `sub_model` is boundary if it
    /// is incident to a member in `full_model` that isn't part of
    /// `sub_model`. Falls back to the first and last node (in stable order)
    /// if no such node exists.
    pub fn auto_detect_boundary(sub_model: &Model, full_model: &Model) -> Vec<String> {
        let sub_members: BTreeSet<&String> = sub_model.members().map(|(name, _)| name).collect();
        let sub_nodes: BTreeSet<&String> = sub_model.node_names().collect();

        let mut boundary = BTreeSet::new();
        for (name, member) in full_model.members() {
            if sub_members.contains(name) {
                continue;
            }
            if sub_nodes.contains(&member.i_node) {
                boundary.insert(member.i_node.clone());
            }
            if sub_nodes.contains(&member.j_node) {
                boundary.insert(member.j_node.clone());
            }
        }

        if !boundary.is_empty() {
            return boundary.into_iter().collect();
        }

        let names: Vec<&String> = sub_model.node_names().collect();
        match (names.first(), names.last()) {
            (Some(&first), Some(&last)) if first != last => vec![first.clone(), last.clone()],
            (Some(&first), _) => vec![first.clone()],
            _ => Vec::new(),
        }
    }

    /// Merge super-elements that share boundary nodes into one. The merged
    /// element keeps only boundary DOFs; `recovery` and `internal_nodes` are
    /// empty, matching the serialized-form contract for a merged element.
    pub fn merge(id: &str, elements: &[&SuperElement]) -> SolverResult<SuperElement> {
        let mut all_boundary: BTreeSet<String> = BTreeSet::new();
        for e in elements {
            all_boundary.extend(e.boundary_nodes.iter().cloned());
        }
        let boundary_nodes: Vec<String> = all_boundary.into_iter().collect();
        let index: BTreeMap<&str, usize> = boundary_nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        let n = boundary_nodes.len() * 6;
        let mut k_star = DMatrix::zeros(n, n);

        for e in elements {
            for (a, node_a) in e.boundary_nodes.iter().enumerate() {
                let global_a = index[node_a.as_str()] * 6;
                for (b, node_b) in e.boundary_nodes.iter().enumerate() {
                    let global_b = index[node_b.as_str()] * 6;
                    for da in 0..6 {
                        for db in 0..6 {
                            k_star[(global_a + da, global_b + db)] += e.k_star[(a * 6 + da, b * 6 + db)];
                        }
                    }
                }
            }
        }

        let original_dofs: usize = elements.iter().map(|e| e.stats.original_dofs).sum();
        let stats = CondensationStats {
            original_dofs,
            condensed_dofs: n,
            reduction_ratio: if original_dofs > 0 {
                1.0 - (n as f64 / original_dofs as f64)
            } else {
                0.0
            },
        };

        Ok(SuperElement {
            id: id.to_string(),
            boundary_nodes,
            k_star,
            recovery: None,
            internal_nodes: Vec::new(),
            stats,
            created_at: Utc::now(),
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Member, Node, Section};

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
    fn reducing_to_end_nodes_preserves_dof_counts() {
        let model = chain_model();
        let boundary = vec!["N0".to_string(), "N3".to_string()];
        let se = SuperElement::reduce("SE1", &model, &boundary, &Config::default()).unwrap();
        assert_eq!(se.stats.original_dofs, 24);
        assert_eq!(se.stats.condensed_dofs, 12);
        assert!(se.recovery.is_some());
    }

    #[test]
    fn auto_detect_falls_back_to_first_and_last_when_isolated() {
        let model = chain_model();
        let full = chain_model();
        let boundary = SuperElement::auto_detect_boundary(&model, &full);
        assert_eq!(boundary, vec!["N0".to_string(), "N3".to_string()]);
    }

    #[test]
    fn merging_two_elements_sums_shared_boundary_stiffness() {
        let model = chain_model();
        let boundary = vec!["N0".to_string(), "N3".to_string()];
        let se = SuperElement::reduce("SE1", &model, &boundary, &Config::default()).unwrap();
        let merged = SuperElement::merge("Merged", &[&se, &se]).unwrap();
        assert!(merged.recovery.is_none());
        assert!(merged.internal_nodes.is_empty());
        assert_relative_eq_matrix(&merged.k_star, &(&se.k_star * 2.0));
    }

    fn assert_relative_eq_matrix(a: &DMatrix<f64>, b: &DMatrix<f64>) {
        assert_eq!(a.shape(), b.shape());
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert!((a[(i, j)] - b[(i, j)]).abs() < 1e-6);
            }
        }
    }
}
