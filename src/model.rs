//! The model store: an owned, serializable structural model.
//!
//! A `Model` is handed to the solver by reference; the solver never mutates
//! it and returns an independently-owned `AnalysisResult`. Node/material/
//! section/member containers are `BTreeMap`s rather than the teacher's
//! `HashMap`s so that iteration order (by name) is the stable order that
//! defines global DOF numbering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elements::{Material, Member, Node, Section, Support};
use crate::error::Warning;
use crate::loads::{DistributedLoad, NodeLoad, PointLoad};

/// A distributed or point load tagged to the member it acts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPointLoad {
    pub member: String,
    pub load: PointLoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDistLoad {
    pub member: String,
    pub load: DistributedLoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedNodeLoad {
    pub node: String,
    pub load: NodeLoad,
}

/// The structural model: nodes, materials, sections, members, supports, and
/// loads. Owned by the caller; the solver borrows it immutably.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    nodes: BTreeMap<String, Node>,
    materials: BTreeMap<String, Material>,
    sections: BTreeMap<String, Section>,
    members: BTreeMap<String, Member>,
    supports: BTreeMap<String, Support>,
    node_loads: Vec<AppliedNodeLoad>,
    member_point_loads: Vec<MemberPointLoad>,
    member_dist_loads: Vec<MemberDistLoad>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, node: Node) {
        self.nodes.insert(name.to_string(), node);
    }

    pub fn add_material(&mut self, name: &str, material: Material) {
        self.materials.insert(name.to_string(), material);
    }

    pub fn add_section(&mut self, name: &str, section: Section) {
        self.sections.insert(name.to_string(), section);
    }

    pub fn add_member(&mut self, name: &str, member: Member) {
        self.members.insert(name.to_string(), member);
    }

    pub fn add_support(&mut self, node: &str, support: Support) {
        self.supports.insert(node.to_string(), support);
    }

    pub fn add_node_load(&mut self, node: &str, load: NodeLoad) {
        self.node_loads.push(AppliedNodeLoad {
            node: node.to_string(),
            load,
        });
    }

    pub fn add_member_point_load(&mut self, member: &str, load: PointLoad) {
        self.member_point_loads.push(MemberPointLoad {
            member: member.to_string(),
            load,
        });
    }

    pub fn add_member_dist_load(&mut self, member: &str, load: DistributedLoad) {
        self.member_dist_loads.push(MemberDistLoad {
            member: member.to_string(),
            load,
        });
    }

    /// Remove a node and cascade-delete every member, support, and node load
    /// that referenced it.
    pub fn remove_node(&mut self, name: &str) {
        self.nodes.remove(name);
        self.supports.remove(name);
        self.members.retain(|_, m| m.i_node != name && m.j_node != name);
        self.node_loads.retain(|l| l.node != name);
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn support(&self, node: &str) -> Option<&Support> {
        self.supports.get(node)
    }

    pub fn members(&self) -> impl Iterator<Item = (&String, &Member)> {
        self.members.iter()
    }

    pub fn node_loads(&self) -> &[AppliedNodeLoad] {
        &self.node_loads
    }

    pub fn member_point_loads(&self) -> &[MemberPointLoad] {
        &self.member_point_loads
    }

    pub fn member_dist_loads(&self) -> &[MemberDistLoad] {
        &self.member_dist_loads
    }

    /// Material for `name`, or the crate default plus a warning if `name`
    /// is unknown (rather than failing the whole analysis).
    pub fn material_or_default(&self, name: &str) -> (Material, Option<Warning>) {
        match self.materials.get(name) {
            Some(m) => (m.clone(), None),
            None => (
                Material::default(),
                Some(Warning::DefaultedReference {
                    kind: "material".to_string(),
                    name: name.to_string(),
                }),
            ),
        }
    }

    pub fn section_or_default(&self, name: &str) -> (Section, Option<Warning>) {
        match self.sections.get(name) {
            Some(s) => (s.clone(), None),
            None => (
                Section::default(),
                Some(Warning::DefaultedReference {
                    kind: "section".to_string(),
                    name: name.to_string(),
                }),
            ),
        }
    }

    /// Length of `member`, or `None` if either endpoint is missing.
    pub fn member_length(&self, member: &Member) -> Option<f64> {
        let i = self.nodes.get(&member.i_node)?;
        let j = self.nodes.get(&member.j_node)?;
        Some(i.distance_to(j))
    }

    /// The stable DOF map: node name -> index of its first (x-translation)
    /// DOF. Node `i` (in sorted-name order) occupies DOFs `[6i, 6i+6)`.
    pub fn dof_map(&self) -> BTreeMap<String, usize> {
        self.nodes
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), i * 6))
            .collect()
    }

    pub fn num_dofs(&self) -> usize {
        self.nodes.len() * 6
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dof_map_follows_sorted_node_name_order() {
        let mut model = Model::new();
        model.add_node("N2", Node::new(1.0, 0.0, 0.0));
        model.add_node("N1", Node::new(0.0, 0.0, 0.0));

        let dofs = model.dof_map();
        assert_eq!(dofs["N1"], 0);
        assert_eq!(dofs["N2"], 6);
    }

    #[test]
    fn unknown_material_reference_defaults_with_warning() {
        let model = Model::new();
        let (material, warning) = model.material_or_default("missing");
        assert_eq!(material.e, Material::default().e);
        assert!(warning.is_some());
    }

    #[test]
    fn removing_a_node_cascades_to_members_and_supports() {
        let mut model = Model::new();
        model.add_node("N1", Node::new(0.0, 0.0, 0.0));
        model.add_node("N2", Node::new(1.0, 0.0, 0.0));
        model.add_material("Steel", Material::steel());
        model.add_section("Sec", Section::default());
        model.add_member("M1", Member::new("N1", "N2", "Steel", "Sec"));
        model.add_support("N1", Support::fixed());

        model.remove_node("N1");

        assert!(model.node("N1").is_none());
        assert!(model.support("N1").is_none());
        assert_eq!(model.members().count(), 0);
    }
}
