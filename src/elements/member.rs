//! Member element - a 3D frame element (beam/column) connecting two nodes

use serde::{Deserialize, Serialize};

/// End releases for a member, freeing specific local DOFs at either end
/// (e.g. a moment release models a pin).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemberReleases {
    /// i-node releases [DX, DY, DZ, RX, RY, RZ]
    pub i_node: [bool; 6],
    /// j-node releases [DX, DY, DZ, RX, RY, RZ]
    pub j_node: [bool; 6],
}

impl MemberReleases {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn pin_i() -> Self {
        Self {
            i_node: [false, false, false, false, true, true],
            j_node: [false; 6],
        }
    }

    pub fn pin_j() -> Self {
        Self {
            i_node: [false; 6],
            j_node: [false, false, false, false, true, true],
        }
    }

    pub fn pin_both() -> Self {
        Self {
            i_node: [false, false, false, false, true, true],
            j_node: [false, false, false, false, true, true],
        }
    }

    pub fn as_array(&self) -> [bool; 12] {
        let mut arr = [false; 12];
        arr[0..6].copy_from_slice(&self.i_node);
        arr[6..12].copy_from_slice(&self.j_node);
        arr
    }

    pub fn any(&self) -> bool {
        self.as_array().iter().any(|r| *r)
    }
}

/// A 3D frame member (beam or column) connecting `i_node` to `j_node`.
///
/// Members hold only the definition; end forces and displacements come back
/// on `AnalysisResult`, keyed by member name, rather than cached here —
/// a `Model` is an immutable snapshot handed to the solver by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub i_node: String,
    pub j_node: String,
    pub material: String,
    pub section: String,
    /// Roll angle β about the member's longitudinal axis, radians
    pub rotation: f64,
    pub releases: MemberReleases,
}

impl Member {
    pub fn new(i_node: &str, j_node: &str, material: &str, section: &str) -> Self {
        Self {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            material: material.to_string(),
            section: section.to_string(),
            rotation: 0.0,
            releases: MemberReleases::none(),
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_releases(mut self, releases: MemberReleases) -> Self {
        self.releases = releases;
        self
    }
}
