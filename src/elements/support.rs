//! Support conditions

use serde::{Deserialize, Serialize};

/// Support conditions at a node: a restraint mask plus optional enforced
/// (nonzero) displacement values on restrained DOFs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Support {
    pub dx: bool,
    pub dy: bool,
    pub dz: bool,
    pub rx: bool,
    pub ry: bool,
    pub rz: bool,

    pub enforced_dx: Option<f64>,
    pub enforced_dy: Option<f64>,
    pub enforced_dz: Option<f64>,
    pub enforced_rx: Option<f64>,
    pub enforced_ry: Option<f64>,
    pub enforced_rz: Option<f64>,
}

impl Support {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed() -> Self {
        Self {
            dx: true,
            dy: true,
            dz: true,
            rx: true,
            ry: true,
            rz: true,
            ..Default::default()
        }
    }

    pub fn pinned() -> Self {
        Self {
            dx: true,
            dy: true,
            dz: true,
            rx: false,
            ry: false,
            rz: false,
            ..Default::default()
        }
    }

    pub fn roller_y() -> Self {
        Self {
            dx: false,
            dy: true,
            dz: false,
            rx: false,
            ry: false,
            rz: false,
            ..Default::default()
        }
    }

    pub fn roller_x() -> Self {
        Self {
            dx: true,
            dy: false,
            dz: false,
            rx: false,
            ry: false,
            rz: false,
            ..Default::default()
        }
    }

    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            ..Default::default()
        }
    }

    pub fn with_enforced_dx(mut self, value: f64) -> Self {
        self.enforced_dx = Some(value);
        self.dx = true;
        self
    }

    pub fn with_enforced_dy(mut self, value: f64) -> Self {
        self.enforced_dy = Some(value);
        self.dy = true;
        self
    }

    pub fn with_enforced_dz(mut self, value: f64) -> Self {
        self.enforced_dz = Some(value);
        self.dz = true;
        self
    }

    /// Restrained DOF indices (0-5, in displacement-vector order).
    pub fn restrained_dofs(&self) -> Vec<usize> {
        let mut dofs = Vec::new();
        if self.dx { dofs.push(0); }
        if self.dy { dofs.push(1); }
        if self.dz { dofs.push(2); }
        if self.rx { dofs.push(3); }
        if self.ry { dofs.push(4); }
        if self.rz { dofs.push(5); }
        dofs
    }

    pub fn free_dofs(&self) -> Vec<usize> {
        let mut dofs = Vec::new();
        if !self.dx { dofs.push(0); }
        if !self.dy { dofs.push(1); }
        if !self.dz { dofs.push(2); }
        if !self.rx { dofs.push(3); }
        if !self.ry { dofs.push(4); }
        if !self.rz { dofs.push(5); }
        dofs
    }

    pub fn enforced_displacements(&self) -> [Option<f64>; 6] {
        [
            self.enforced_dx,
            self.enforced_dy,
            self.enforced_dz,
            self.enforced_rx,
            self.enforced_ry,
            self.enforced_rz,
        ]
    }

    pub fn is_supported(&self) -> bool {
        self.dx || self.dy || self.dz || self.rx || self.ry || self.rz
    }

    pub fn num_restrained(&self) -> usize {
        self.restrained_dofs().len()
    }
}

impl Default for Support {
    fn default() -> Self {
        Self {
            dx: false,
            dy: false,
            dz: false,
            rx: false,
            ry: false,
            rz: false,
            enforced_dx: None,
            enforced_dy: None,
            enforced_dz: None,
            enforced_rx: None,
            enforced_ry: None,
            enforced_rz: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_support_restrains_all_six() {
        let support = Support::fixed();
        assert!(support.dx && support.dy && support.dz);
        assert!(support.rx && support.ry && support.rz);
        assert_eq!(support.num_restrained(), 6);
    }

    #[test]
    fn pinned_support_frees_rotation() {
        let support = Support::pinned();
        assert!(support.dx && support.dy && support.dz);
        assert!(!support.rx && !support.ry && !support.rz);
        assert_eq!(support.num_restrained(), 3);
    }

    #[test]
    fn enforced_displacement_implies_restraint() {
        let support = Support::pinned().with_enforced_dy(-0.01);
        assert!(support.dy);
        assert_eq!(support.enforced_dy, Some(-0.01));
    }
}
