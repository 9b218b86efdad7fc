//! Steel member interaction check: tension/compression/flexure capacities
//! plus the combined axial-flexure interaction ratio.

use crate::elements::{Material, Section};
use crate::error::{SolverError, SolverResult};

pub const PHI_T: f64 = 0.9;
pub const PHI_C: f64 = 0.9;
pub const PHI_M: f64 = 0.9;

/// End-force demand on a member for the steel check.
#[derive(Debug, Clone, Copy)]
pub struct SteelDemand {
    /// Axial force, positive = tension, negative = compression (N).
    pub p_u: f64,
    /// Strong-axis moment demand (N·m).
    pub m_ux: f64,
    /// Weak-axis moment demand (N·m).
    pub m_uy: f64,
}

/// The governing ratio of a steel interaction check, plus the individual
/// components that fed it.
#[derive(Debug, Clone, Copy)]
pub struct SteelCheck {
    pub tension_ratio: f64,
    pub compression_ratio: f64,
    pub mx_ratio: f64,
    pub my_ratio: f64,
    pub interaction_ratio: f64,
    pub utilization: f64,
}

/// Elastic buckling load `F_e = pi^2 E / (kL/r)^2`, with `r` taken from the
/// more slender (smaller-radius) axis.
fn euler_buckling_stress(material: &Material, section: &Section, k: f64, length: f64) -> f64 {
    let r = section.ry().min(section.rz());
    let slenderness = k * length / r;
    std::f64::consts::PI.powi(2) * material.e / slenderness.powi(2)
}

/// Steel interaction check per member. Requires explicit `zy`/`zz` section
/// moduli — derived moduli (e.g. from `depth`/`width` assuming an I-shape)
/// are wrong for hollow/closed sections, so this is a hard requirement
/// rather than a silent fallback.
pub fn check_interaction(
    material: &Material,
    section: &Section,
    demand: SteelDemand,
    k: f64,
    unbraced_length: f64,
    unbraced_flexural_length: f64,
) -> SolverResult<SteelCheck> {
    let zy = section
        .zy
        .ok_or_else(|| SolverError::DesignCheckNotImplemented("section modulus zy not specified".to_string()))?;
    let zz = section
        .zz
        .ok_or_else(|| SolverError::DesignCheckNotImplemented("section modulus zz not specified".to_string()))?;
    let fy = material
        .fy
        .ok_or_else(|| SolverError::DesignCheckNotImplemented("material yield strength not specified".to_string()))?;

    let f_e = euler_buckling_stress(material, section, k, unbraced_length);
    let f_cr = fy.min(0.877 * f_e);

    let p_t = PHI_T * section.a * fy;
    let p_c = PHI_C * section.a * f_cr;

    let rz = section.rz();
    let l_p = 1.76 * rz * (material.e / fy).sqrt();
    let l_r = std::f64::consts::PI * rz * (material.e / (0.7 * fy)).sqrt();

    let m_p = fy * zy;
    let m_r = 0.7 * fy * zy;
    let m_n = if unbraced_flexural_length <= l_p {
        m_p
    } else if unbraced_flexural_length >= l_r {
        m_r
    } else {
        let t = (unbraced_flexural_length - l_p) / (l_r - l_p);
        m_p - (m_p - m_r) * t
    };
    let m_cx = PHI_M * m_n;
    let m_cy = PHI_M * fy * zz;

    let tension_ratio = demand.p_u.max(0.0) / p_t;
    let compression_ratio = (-demand.p_u).max(0.0) / p_c;
    let mx_ratio = demand.m_ux.abs() / m_cx;
    let my_ratio = demand.m_uy.abs() / m_cy;

    let axial_ratio = if demand.p_u >= 0.0 { tension_ratio } else { compression_ratio };
    let interaction_ratio = axial_ratio + (8.0 / 9.0) * mx_ratio;

    let utilization = [tension_ratio, compression_ratio, mx_ratio, my_ratio, interaction_ratio]
        .into_iter()
        .fold(0.0_f64, f64::max);

    Ok(SteelCheck {
        tension_ratio,
        compression_ratio,
        mx_ratio,
        my_ratio,
        interaction_ratio,
        utilization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Section;

    #[test]
    fn axial_tension_only_governs_via_tension_ratio() {
        let material = Material::steel();
        let section = Section::wide_flange(0.3, 0.2, 0.015, 0.01);
        let demand = SteelDemand { p_u: 3e5, m_ux: 0.0, m_uy: 0.0 };
        let check = check_interaction(&material, &section, demand, 1.0, 3.0, 3.0).unwrap();
        assert!(check.tension_ratio > 0.0);
        assert_eq!(check.compression_ratio, 0.0);
        assert!((check.utilization - check.tension_ratio).abs() < 1e-9);
    }

    #[test]
    fn missing_section_modulus_is_reported_not_guessed() {
        let material = Material::steel();
        let section = Section::pipe(0.2, 0.01);
        let demand = SteelDemand { p_u: 1e4, m_ux: 1e3, m_uy: 0.0 };
        let err = check_interaction(&material, &section, demand, 1.0, 3.0, 3.0).unwrap_err();
        assert!(matches!(err, SolverError::DesignCheckNotImplemented(_)));
    }

    #[test]
    fn long_unbraced_length_reduces_flexural_capacity() {
        let material = Material::steel();
        let section = Section::wide_flange(0.3, 0.2, 0.015, 0.01);
        let demand = SteelDemand { p_u: 0.0, m_ux: 5e4, m_uy: 0.0 };
        let short = check_interaction(&material, &section, demand, 1.0, 3.0, 0.5).unwrap();
        let long = check_interaction(&material, &section, demand, 1.0, 3.0, 20.0).unwrap();
        assert!(long.mx_ratio > short.mx_ratio);
    }
}
