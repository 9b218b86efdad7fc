//! Global assembly and solve: the single entrypoint that turns a `Model` and
//! an active load case into an `AnalysisResult`.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};

use crate::config::Config;
use crate::diagrams::{sample_diagram, SpanDistLoad, SpanPointLoad};
use crate::error::{SolverError, SolverResult, UnstableKind, Warning};
use crate::loads::LoadDirection;
use crate::math::{
    apply_fer_releases, apply_releases, extract_rotation_matrix, fer_point_load, member_local_stiffness,
    member_transformation_matrix, solve_cg, solve_linear_system, solve_pcg, DokBuilder, Mat12, Mat3, Vec12,
};
use crate::model::Model;
use crate::diagrams::DiagramSample;
use crate::results::{AnalysisResult, MemberEndForces, MemberForces, NodeDisplacement, Reactions};

/// Length below which a member is treated as degenerate and skipped during
/// assembly rather than aborting the solve.
const DEGENERATE_LENGTH: f64 = 1e-10;

pub(crate) struct MemberAssembly {
    pub(crate) name: String,
    pub(crate) dofs: [usize; 12],
    pub(crate) k_local: Mat12,
    /// Global-frame stiffness `Tᵀ k_local T`, what actually gets scattered
    /// into the global assembly — `k_local` alone is only valid in the
    /// member's own local frame and is kept around for end-force recovery.
    pub(crate) k_global: Mat12,
    pub(crate) t: Mat12,
    pub(crate) r: Mat3,
    pub(crate) length: f64,
    pub(crate) fer_local: Vec12,
}

/// Local-Y component of a span load's magnitude, for diagram sampling.
/// Loads already expressed in the member's local frame (`Fy`) pass through
/// directly; global-frame loads (`FX`/`FY`/`FZ`) are projected through `r`.
/// Loads that don't act in the local Y direction at all (axial, out-of-plane,
/// or moments) contribute nothing to the Fy/Mz diagram.
fn local_y_component(direction: LoadDirection, magnitude: f64, r: &Mat3) -> f64 {
    match direction {
        LoadDirection::Fy => magnitude,
        LoadDirection::Fx | LoadDirection::Fz | LoadDirection::Mx | LoadDirection::My | LoadDirection::Mz => 0.0,
        LoadDirection::FX | LoadDirection::FY | LoadDirection::FZ => {
            let global = match direction {
                LoadDirection::FX => nalgebra::Vector3::new(magnitude, 0.0, 0.0),
                LoadDirection::FY => nalgebra::Vector3::new(0.0, magnitude, 0.0),
                _ => nalgebra::Vector3::new(0.0, 0.0, magnitude),
            };
            (r * global).y
        }
    }
}

fn point_load_fer(magnitude: f64, position: f64, length: f64, direction: LoadDirection, r: &Mat3) -> Vec12 {
    let a = position.clamp(0.0, length);
    match direction {
        LoadDirection::Fx => fer_point_load(magnitude, a, length, 0),
        LoadDirection::Fy => fer_point_load(magnitude, a, length, 1),
        LoadDirection::Fz => fer_point_load(magnitude, a, length, 2),
        LoadDirection::Mx | LoadDirection::My | LoadDirection::Mz => Vec12::zeros(),
        LoadDirection::FX | LoadDirection::FY | LoadDirection::FZ => {
            let global = match direction {
                LoadDirection::FX => nalgebra::Vector3::new(magnitude, 0.0, 0.0),
                LoadDirection::FY => nalgebra::Vector3::new(0.0, magnitude, 0.0),
                _ => nalgebra::Vector3::new(0.0, 0.0, magnitude),
            };
            let local = r * global;
            let mut fer = Vec12::zeros();
            if local.x.abs() > 1e-15 {
                fer += fer_point_load(local.x, a, length, 0);
            }
            if local.y.abs() > 1e-15 {
                fer += fer_point_load(local.y, a, length, 1);
            }
            if local.z.abs() > 1e-15 {
                fer += fer_point_load(local.z, a, length, 2);
            }
            fer
        }
    }
}

/// Fixed-end reactions for a (possibly non-uniform, partial-span) distributed
/// load: the span is subdivided into `segments` strips and each is lumped to
/// an equivalent point load at its midpoint, matching the sampling
/// granularity already used for internal-force diagrams.
fn distributed_fer(
    w1: f64,
    w2: f64,
    x1: f64,
    x2: f64,
    direction: LoadDirection,
    length: f64,
    r: &Mat3,
    segments: usize,
) -> Vec12 {
    let x1 = x1.max(0.0);
    let x2 = x2.min(length).max(x1);
    let span = x2 - x1;
    if span <= 1e-12 {
        return Vec12::zeros();
    }

    let n = segments.max(1);
    let dx = span / n as f64;
    let mut fer = Vec12::zeros();
    for k in 0..n {
        let xm = x1 + (k as f64 + 0.5) * dx;
        let t = (xm - x1) / span;
        let w = w1 + (w2 - w1) * t;
        fer += point_load_fer(w * dx, xm, length, direction, r);
    }
    fer
}

pub(crate) fn build_member_assembly(
    model: &Model,
    case: &str,
    config: &Config,
    dof_map: &BTreeMap<String, usize>,
    warnings: &mut Vec<Warning>,
) -> SolverResult<Vec<MemberAssembly>> {
    let mut out = Vec::new();

    for (name, member) in model.members() {
        let i_node = model
            .node(&member.i_node)
            .ok_or_else(|| SolverError::NodeNotFound(member.i_node.clone()))?;
        let j_node = model
            .node(&member.j_node)
            .ok_or_else(|| SolverError::NodeNotFound(member.j_node.clone()))?;

        let length = i_node.distance_to(j_node);
        if length < DEGENERATE_LENGTH {
            warnings.push(Warning::DegenerateMemberSkipped { member: name.clone() });
            continue;
        }

        let (material, mat_warning) = model.material_or_default(&member.material);
        if let Some(w) = mat_warning {
            warnings.push(w);
        }
        let (section, sec_warning) = model.section_or_default(&member.section);
        if let Some(w) = sec_warning {
            warnings.push(w);
        }

        let t = member_transformation_matrix(&i_node.coords(), &j_node.coords(), member.rotation);
        let r = extract_rotation_matrix(&t);

        let k_local_full = member_local_stiffness(
            material.e,
            material.effective_g(),
            section.a,
            section.iy,
            section.iz,
            section.j,
            length,
        );

        let mut fer_raw = Vec12::zeros();
        for dist in model.member_dist_loads() {
            if dist.member != *name || dist.load.case != case {
                continue;
            }
            fer_raw += distributed_fer(
                dist.load.w1,
                dist.load.w2,
                dist.load.x1,
                dist.load.x2,
                dist.load.direction,
                length,
                &r,
                config.diagram_segments,
            );
        }
        for point in model.member_point_loads() {
            if point.member != *name || point.load.case != case {
                continue;
            }
            fer_raw += point_load_fer(point.load.magnitude, point.load.position, length, point.load.direction, &r);
        }

        let releases = member.releases.as_array();
        let (k_local, fer_local) = if member.releases.any() {
            (
                apply_releases(&k_local_full, &releases),
                apply_fer_releases(&fer_raw, &k_local_full, &releases),
            )
        } else {
            (k_local_full, fer_raw)
        };

        let i_base = dof_map[&member.i_node];
        let j_base = dof_map[&member.j_node];
        let mut dofs = [0usize; 12];
        for k in 0..6 {
            dofs[k] = i_base + k;
            dofs[k + 6] = j_base + k;
        }

        let k_global = t.transpose() * k_local * t;

        out.push(MemberAssembly {
            name: name.clone(),
            dofs,
            k_local,
            k_global,
            t,
            r,
            length,
            fer_local,
        });
    }

    Ok(out)
}

/// Solve `model` under its load case `case`, returning displacements,
/// reactions, and member end forces. Borrows the model immutably and
/// returns an independently-owned result.
pub fn solve(model: &Model, case: &str, config: &Config) -> SolverResult<AnalysisResult> {
    let n = model.num_dofs();
    if let Some(budget) = config.dof_budget {
        if n > budget {
            return Err(SolverError::ResourceBudgetExceeded { dofs: n, budget });
        }
    }

    let mut warnings = Vec::new();
    if n > config.dof_warning_threshold {
        let w = Warning::LargeModel { dofs: n };
        log::warn!("{w}");
        warnings.push(w);
    }

    let dof_map = model.dof_map();
    log::info!("assembling model: {} dofs, load case '{case}'", n);

    let members = build_member_assembly(model, case, config, &dof_map, &mut warnings)?;

    // Determine each global dof's role: free (compact index) or constrained
    // (compact index, with its enforced displacement value).
    let mut free_compact: Vec<Option<usize>> = vec![None; n];
    let mut constrained_compact: Vec<Option<usize>> = vec![None; n];
    let mut u_c_values = Vec::new();
    let mut constrained_node_dof: Vec<(String, usize)> = Vec::new();

    for (name, base) in &dof_map {
        let support = model.support(name);
        let enforced = support.map(|s| s.enforced_displacements());
        let restrained = support.map(|s| {
            [s.dx, s.dy, s.dz, s.rx, s.ry, s.rz]
        });
        for local in 0..6 {
            let gdof = base + local;
            let is_restrained = restrained.map(|r| r[local]).unwrap_or(false);
            if is_restrained {
                let value = enforced.and_then(|e| e[local]).unwrap_or(0.0);
                constrained_compact[gdof] = Some(u_c_values.len());
                u_c_values.push(value);
                constrained_node_dof.push((name.clone(), local));
            } else {
                free_compact[gdof] = Some(0); // placeholder, fixed up below
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
    let n_c = u_c_values.len();
    let u_c = DVector::from_vec(u_c_values);

    if n_free == 0 {
        return Err(SolverError::Unstable {
            kind: UnstableKind::FullyConstrained,
            message: "model has no free degrees of freedom".to_string(),
        });
    }

    let mut k_ff_builder = DokBuilder::new(n_free);
    let mut k_fc = DMatrix::zeros(n_free, n_c);
    let mut k_cf = DMatrix::zeros(n_c, n_free);
    let mut k_cc = DMatrix::zeros(n_c, n_c);
    let mut f_free = DVector::zeros(n_free);
    let mut f_c = DVector::zeros(n_c);

    let scatter_vec = |dofs: &[usize; 12], v: &Vec12, f_free: &mut DVector<f64>, f_c: &mut DVector<f64>| {
        for a in 0..12 {
            let gdof = dofs[a];
            if let Some(fi) = free_compact[gdof] {
                f_free[fi] += v[a];
            } else if let Some(ci) = constrained_compact[gdof] {
                f_c[ci] += v[a];
            }
        }
    };

    for assembly in &members {
        for a in 0..12 {
            let ga = assembly.dofs[a];
            for b in 0..12 {
                let gb = assembly.dofs[b];
                let value = assembly.k_global[(a, b)];
                match (free_compact[ga], free_compact[gb], constrained_compact[ga], constrained_compact[gb]) {
                    (Some(fa), Some(fb), _, _) => k_ff_builder.add(fa, fb, value),
                    (Some(fa), None, _, Some(cb)) => k_fc[(fa, cb)] += value,
                    (None, Some(fb), Some(ca), _) => k_cf[(ca, fb)] += value,
                    (None, None, Some(ca), Some(cb)) => k_cc[(ca, cb)] += value,
                    _ => unreachable!("every global dof is exactly one of free or constrained"),
                }
            }
        }

        // Equivalent nodal load from the member's span loads is -Tᵀ·FER.
        let equiv = -assembly.t.transpose() * assembly.fer_local;
        scatter_vec(&assembly.dofs, &equiv, &mut f_free, &mut f_c);
    }

    for load in model.node_loads() {
        if load.load.case != case {
            continue;
        }
        let Some(&base) = dof_map.get(&load.node) else {
            return Err(SolverError::NodeNotFound(load.node.clone()));
        };
        let arr = load.load.as_array();
        for local in 0..6 {
            let gdof = base + local;
            if let Some(fi) = free_compact[gdof] {
                f_free[fi] += arr[local];
            } else if let Some(ci) = constrained_compact[gdof] {
                f_c[ci] += arr[local];
            }
        }
    }

    let f_free_adjusted = &f_free - &k_fc * &u_c;

    let (u_f, converged, residual_norm) = if n_free >= config.sparse_threshold_dofs {
        let csr = k_ff_builder.to_csr();
        let max_iter = config.cg_max_iterations_for(n_free);
        let (u_f, converged, residual) = if config.cg_use_jacobi_preconditioner {
            solve_pcg(&csr, &f_free_adjusted, config.cg_tolerance, max_iter)
        } else {
            solve_cg(&csr, &f_free_adjusted, config.cg_tolerance, max_iter)
        };
        if !converged {
            let w = Warning::Unconverged {
                residual_norm: residual,
                tolerance: config.cg_tolerance,
            };
            log::warn!("{w}");
            warnings.push(w);
        }
        (u_f, converged, Some(residual))
    } else {
        let k_ff_dense = k_ff_builder.to_dense();
        match solve_linear_system(&k_ff_dense, &f_free_adjusted) {
            Some(u_f) => (u_f, true, None),
            None => {
                return Err(SolverError::Unstable {
                    kind: UnstableKind::Mechanism,
                    message: "free-free stiffness partition is singular".to_string(),
                })
            }
        }
    };

    if u_f.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::Unstable {
            kind: UnstableKind::IllConditioned,
            message: "solution contains non-finite values".to_string(),
        });
    }

    // Reactions: R_c = K_cf·u_f + K_cc·u_c - F_c
    let r_c = &k_cf * &u_f + &k_cc * &u_c - &f_c;

    let mut u_full = DVector::zeros(n);
    for gdof in 0..n {
        if let Some(fi) = free_compact[gdof] {
            u_full[gdof] = u_f[fi];
        } else if let Some(ci) = constrained_compact[gdof] {
            u_full[gdof] = u_c[ci];
        }
    }

    let mut displacements = BTreeMap::new();
    for (name, &base) in &dof_map {
        let arr: [f64; 6] = std::array::from_fn(|i| u_full[base + i]);
        displacements.insert(name.clone(), NodeDisplacement::from_array(arr));
    }

    let mut reactions = BTreeMap::new();
    for (node_name, local) in &constrained_node_dof {
        let gdof = dof_map[node_name] + local;
        let ci = constrained_compact[gdof].unwrap();
        let entry = reactions
            .entry(node_name.clone())
            .or_insert_with(|| Reactions::from_array([0.0; 6]));
        let mut arr = [entry.fx, entry.fy, entry.fz, entry.mx, entry.my, entry.mz];
        arr[*local] = r_c[ci];
        *entry = Reactions::from_array(arr);
    }

    let mut member_forces = BTreeMap::new();
    for assembly in &members {
        let mut d_local12 = Vec12::zeros();
        for a in 0..12 {
            d_local12[a] = u_full[assembly.dofs[a]];
        }
        let d_local = assembly.t * d_local12;
        let f_local = assembly.k_local * d_local + assembly.fer_local;
        let forces: [f64; 12] = std::array::from_fn(|i| f_local[i]);
        member_forces.insert(
            assembly.name.clone(),
            MemberEndForces {
                i: MemberForces::from_i_node_forces(&forces),
                j: MemberForces::from_j_node_forces(&forces),
            },
        );
    }

    let mut diagrams: BTreeMap<String, Vec<DiagramSample>> = BTreeMap::new();
    for assembly in &members {
        let end_forces = &member_forces[&assembly.name];

        let dist_loads: Vec<SpanDistLoad> = model
            .member_dist_loads()
            .iter()
            .filter(|d| d.member == assembly.name && d.load.case == case)
            .map(|d| SpanDistLoad {
                w1: local_y_component(d.load.direction, d.load.w1, &assembly.r),
                w2: local_y_component(d.load.direction, d.load.w2, &assembly.r),
                x1: d.load.x1,
                x2: d.load.x2,
            })
            .collect();
        let point_loads: Vec<SpanPointLoad> = model
            .member_point_loads()
            .iter()
            .filter(|p| p.member == assembly.name && p.load.case == case)
            .map(|p| SpanPointLoad {
                position: p.load.position,
                magnitude: local_y_component(p.load.direction, p.load.magnitude, &assembly.r),
            })
            .collect();

        diagrams.insert(
            assembly.name.clone(),
            sample_diagram(end_forces, assembly.length, &dist_loads, &point_loads, config.diagram_segments),
        );
    }

    Ok(AnalysisResult {
        displacements,
        reactions,
        member_forces,
        diagrams,
        converged,
        residual_norm,
        warnings,
    })
}
