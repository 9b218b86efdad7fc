//! frame-analysis - a native Rust 3D frame finite-element analysis library
//!
//! Provides:
//! - 12-DOF space-frame elements (axial, biaxial bending, Saint-Venant torsion)
//! - Linear static analysis via dense LU or sparse CG/BiCGSTAB
//! - Static condensation and super-elements
//! - Modal (eigenvalue) analysis
//! - Internal-force diagrams
//! - Wind/seismic equivalent-static load generation
//! - Code-based steel and reinforced-concrete design checks
//!
//! ## Example
//! ```rust
//! use frame_analysis::prelude::*;
//!
//! let mut model = Model::new();
//!
//! model.add_material("Steel", Material::new(200e9, 77e9, 0.3, 7850.0));
//! model.add_section("W12x26", Section::new(7.65e-3, 204e-6, 17.3e-6, 0.3e-6));
//!
//! model.add_node("N1", Node::new(0.0, 0.0, 0.0));
//! model.add_node("N2", Node::new(10.0, 0.0, 0.0));
//!
//! model.add_member("M1", Member::new("N1", "N2", "Steel", "W12x26"));
//! model.add_support("N1", Support::fixed());
//! model.add_node_load("N2", NodeLoad::force(0.0, -10000.0, 0.0, "Dead"));
//!
//! let config = Config::default();
//! let result = solve(&model, "Dead", &config).unwrap();
//! let displacement = result.displacements.get("N2").unwrap();
//! ```

pub mod config;
pub mod design;
pub mod diagrams;
pub mod elements;
pub mod error;
pub mod hybrid;
pub mod loadgen;
pub mod loads;
pub mod math;
pub mod modal;
pub mod model;
pub mod results;
pub mod solve;
pub mod superelement;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::design::{DesignCheck, DesignRatio};
    pub use crate::diagrams::{sample_diagram, DiagramSample, SpanDistLoad, SpanPointLoad};
    pub use crate::elements::{Material, MaterialCategory, Member, MemberReleases, Node, Section, SectionType, Support};
    pub use crate::error::{SolverError, SolverResult, UnstableKind, Warning};
    pub use crate::hybrid::{solve_hybrid, HybridResult};
    pub use crate::loadgen::{seismic, wind};
    pub use crate::loads::{DistributedLoad, LoadCase, LoadDirection, NodeLoad, PointLoad};
    pub use crate::math::condensation::condense;
    pub use crate::math::modal::{solve_modal, Mode};
    pub use crate::modal::solve as solve_modal_analysis;
    pub use crate::model::Model;
    pub use crate::results::{
        AnalysisResult, AnalysisSummary, MemberEndForces, MemberForces, ModalResult, ModeResult, NodeDisplacement, Reactions,
    };
    pub use crate::solve::solve;
    pub use crate::superelement::SuperElement;
}
