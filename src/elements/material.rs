//! Material properties

use serde::{Deserialize, Serialize};

/// Broad material family, used by the design-check subsystem to pick a
/// code-based check (steel interaction vs. RC sizing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialCategory {
    Steel,
    Concrete,
    Timber,
    Other,
}

/// Material properties for structural analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa. `None` means derive from `e`/`nu` assuming isotropy.
    pub g: Option<f64>,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Yield strength (optional) in Pa
    pub fy: Option<f64>,
    /// Broad material family
    pub category: MaterialCategory,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            g: Some(g),
            nu,
            rho,
            fy: None,
            category: MaterialCategory::Other,
        }
    }

    pub fn with_yield_strength(mut self, fy: f64) -> Self {
        self.fy = Some(fy);
        self
    }

    pub fn with_category(mut self, category: MaterialCategory) -> Self {
        self.category = category;
        self
    }

    /// Isotropic material from E and nu; G is left unset and derived on demand.
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            g: None,
            nu,
            rho,
            fy: None,
            category: MaterialCategory::Other,
        }
    }

    /// Shear modulus, deriving `E / (2 * (1 + nu))` when not given explicitly.
    pub fn effective_g(&self) -> f64 {
        self.g.unwrap_or_else(|| self.e / (2.0 * (1.0 + self.nu)))
    }

    pub fn steel() -> Self {
        Self {
            e: 200e9,
            g: Some(77e9),
            nu: 0.3,
            rho: 7850.0,
            fy: Some(250e6),
            category: MaterialCategory::Steel,
        }
    }

    /// Concrete material from compressive strength `fc` (Pa); E via the
    /// ACI formula `E = 4700 * sqrt(f'c in MPa)` MPa.
    pub fn concrete(fc: f64) -> Self {
        let fc_mpa = fc / 1e6;
        let e = 4700.0 * fc_mpa.sqrt() * 1e6;

        Self {
            e,
            g: Some(e / (2.0 * (1.0 + 0.2))),
            nu: 0.2,
            rho: 2400.0,
            fy: None,
            category: MaterialCategory::Concrete,
        }
    }

    pub fn aluminum() -> Self {
        Self {
            e: 68.9e9,
            g: Some(26e9),
            nu: 0.33,
            rho: 2700.0,
            fy: Some(276e6),
            category: MaterialCategory::Other,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotropic_derives_g_on_demand() {
        let mat = Material::isotropic(200e9, 0.3, 7850.0);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.effective_g() - expected_g).abs() < 1.0);
    }

    #[test]
    fn steel_properties() {
        let steel = Material::steel();
        assert_eq!(steel.e, 200e9);
        assert!(steel.fy.is_some());
        assert_eq!(steel.category, MaterialCategory::Steel);
    }
}
