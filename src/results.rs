//! Result types returned by the solver

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagrams::DiagramSample;
use crate::error::Warning;

/// Displacement results at a node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl NodeDisplacement {
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl Reactions {
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
        }
    }

    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }

    pub fn moment_magnitude(&self) -> f64 {
        (self.mx.powi(2) + self.my.powi(2) + self.mz.powi(2)).sqrt()
    }
}

/// Internal (local-axis) end forces for a member, at one end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force, positive = tension
    pub axial: f64,
    pub shear_y: f64,
    pub shear_z: f64,
    pub torsion: f64,
    pub moment_y: f64,
    pub moment_z: f64,
}

impl MemberForces {
    pub fn from_i_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: -forces[0],
            shear_y: forces[1],
            shear_z: forces[2],
            torsion: -forces[3],
            moment_y: forces[4],
            moment_z: forces[5],
        }
    }

    pub fn from_j_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: forces[6],
            shear_y: -forces[7],
            shear_z: -forces[8],
            torsion: forces[9],
            moment_y: forces[10],
            moment_z: forces[11],
        }
    }
}

/// End forces for a single member, both ends, in local axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemberEndForces {
    pub i: MemberForces,
    pub j: MemberForces,
}

/// The outcome of a single-load-case solve: displacements, reactions, and
/// member end forces, owned independently of the `Model` that produced
/// them. `converged == false` means the iterative solver hit its cap
/// without meeting tolerance — the result is still returned, per the
/// "result still returned" contract, rather than raised as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub displacements: BTreeMap<String, NodeDisplacement>,
    pub reactions: BTreeMap<String, Reactions>,
    pub member_forces: BTreeMap<String, MemberEndForces>,
    /// Per-member `(x, M_z, F_y)` diagram samples, at `Config::diagram_segments + 1`
    /// points along each member's length.
    pub diagrams: BTreeMap<String, Vec<DiagramSample>>,
    pub converged: bool,
    pub residual_norm: Option<f64>,
    pub warnings: Vec<Warning>,
}

/// A single solved vibration mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeResult {
    pub eigenvalue: f64,
    pub angular_frequency: f64,
    pub frequency_hz: f64,
    /// Mode shape over free DOFs, in the same order the solver used.
    pub shape: Vec<f64>,
}

/// Result of a modal eigensolve: the requested modes, ascending by frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalResult {
    pub modes: Vec<ModeResult>,
    pub warnings: Vec<Warning>,
}

/// Summary statistics over an `AnalysisResult`, convenient for quick display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub max_displacement: f64,
    pub max_disp_node: String,
    pub max_reaction: f64,
    pub max_reaction_node: String,
    pub max_axial: f64,
    pub max_axial_member: String,
    pub max_moment: f64,
    pub max_moment_member: String,
    pub num_nodes: usize,
    pub num_members: usize,
    pub total_dofs: usize,
    pub free_dofs: usize,
}

impl AnalysisSummary {
    pub fn from_result(result: &AnalysisResult, num_nodes: usize, num_members: usize, free_dofs: usize) -> Self {
        let mut summary = Self {
            max_displacement: 0.0,
            max_disp_node: String::new(),
            max_reaction: 0.0,
            max_reaction_node: String::new(),
            max_axial: 0.0,
            max_axial_member: String::new(),
            max_moment: 0.0,
            max_moment_member: String::new(),
            num_nodes,
            num_members,
            total_dofs: num_nodes * 6,
            free_dofs,
        };

        for (name, disp) in &result.displacements {
            let mag = disp.translation_magnitude();
            if mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = name.clone();
            }
        }
        for (name, reaction) in &result.reactions {
            let mag = reaction.force_magnitude();
            if mag > summary.max_reaction {
                summary.max_reaction = mag;
                summary.max_reaction_node = name.clone();
            }
        }
        for (name, forces) in &result.member_forces {
            let axial = forces.i.axial.abs().max(forces.j.axial.abs());
            if axial > summary.max_axial {
                summary.max_axial = axial;
                summary.max_axial_member = name.clone();
            }
            let moment = forces.i.moment_z.abs().max(forces.j.moment_z.abs());
            if moment > summary.max_moment {
                summary.max_moment = moment;
                summary.max_moment_member = name.clone();
            }
        }

        summary
    }
}
