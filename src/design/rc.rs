//! Reinforced-concrete beam and column sizing checks.
//!
//! Unlike the rest of the crate (SI throughout), these functions use the
//! mixed units the underlying code-based formulas are conventionally
//! expressed in: `b`, `d`, spacings in mm; `fck`, `fy` in N/mm² (MPa);
//! moments `Mu` in kN·m; shears `Vu` in kN. This boundary is documented
//! here rather than silently mixed with the solver's SI convention.

/// Limiting neutral-axis-depth ratio `x_u,max / d`, by steel grade.
fn limiting_xu_ratio(fy: f64) -> f64 {
    if fy >= 500.0 {
        0.48
    } else {
        0.53
    }
}

/// Result of an RC beam flexure check.
#[derive(Debug, Clone, Copy)]
pub struct RcBeamFlexure {
    pub ast_mm2: f64,
    pub mu_lim_knm: f64,
    pub doubly_reinforced: bool,
}

/// Tension steel area for a singly-reinforced rectangular section, via the
/// closed-form solution of the rectangular stress-block equation. `b`, `d`
/// in mm; `mu_knm` in kN·m; `fck`, `fy` in N/mm².
pub fn beam_flexure(b: f64, d: f64, mu_knm: f64, fck: f64, fy: f64) -> RcBeamFlexure {
    let mu_nmm = mu_knm * 1e6;
    let xu_ratio = limiting_xu_ratio(fy);
    let mu_lim_nmm = 0.36 * xu_ratio * (1.0 - 0.42 * xu_ratio) * fck * b * d * d;

    let discriminant = (1.0 - 4.6 * mu_nmm / (fck * b * d * d)).max(0.0);
    let ast = 0.5 * fck / fy * (1.0 - discriminant.sqrt()) * b * d;

    RcBeamFlexure {
        ast_mm2: ast,
        mu_lim_knm: mu_lim_nmm / 1e6,
        doubly_reinforced: mu_nmm > mu_lim_nmm,
    }
}

/// Result of an RC beam shear check.
#[derive(Debug, Clone, Copy)]
pub struct RcBeamShear {
    pub vc_kn: f64,
    pub stirrup_spacing_mm: f64,
}

/// Shear design: concrete capacity `V_c = 0.85 sqrt(fck) b d / 1000` (kN),
/// stirrups sized to carry `V_u - V_c`, spacing capped by `0.75 d` or
/// 300 mm and snapped down to the nearest 25 mm.
pub fn beam_shear(b: f64, d: f64, vu_kn: f64, fck: f64, fy: f64, asv_mm2: f64) -> RcBeamShear {
    let vc_kn = 0.85 * fck.sqrt() * b * d / 1000.0;
    let cap = (0.75 * d).min(300.0);

    let vs_kn = (vu_kn - vc_kn).max(0.0);
    let spacing = if vs_kn < 1e-9 {
        cap
    } else {
        (0.87 * fy * asv_mm2 * d / (vs_kn * 1000.0)).min(cap)
    };

    let snapped = (spacing / 25.0).floor() * 25.0;
    RcBeamShear {
        vc_kn,
        stirrup_spacing_mm: snapped.max(25.0),
    }
}

/// Uniaxial RC column capacity `0.4 fck Ac + 0.67 fy Asc` (N, with
/// `fck`/`fy` in N/mm² and areas in mm²).
pub fn column_uniaxial_capacity(fck: f64, ac_mm2: f64, fy: f64, asc_mm2: f64) -> f64 {
    0.4 * fck * ac_mm2 + 0.67 * fy * asc_mm2
}

/// Biaxial interaction exponent, linearly interpolated 1.0 -> 2.0 over
/// `Pu/Puz in [0.2, 0.8]`.
pub fn biaxial_exponent(pu_over_puz: f64) -> f64 {
    if pu_over_puz <= 0.2 {
        1.0
    } else if pu_over_puz >= 0.8 {
        2.0
    } else {
        1.0 + (pu_over_puz - 0.2) / 0.6
    }
}

/// Biaxial interaction utilization `(Mux/Mux1)^a + (Muy/Muy1)^a`; <= 1.0 is adequate.
pub fn biaxial_interaction(mux: f64, mux1: f64, muy: f64, muy1: f64, alpha: f64) -> f64 {
    (mux / mux1).abs().powf(alpha) + (muy / muy1).abs().powf(alpha)
}

/// Minimum design eccentricity `L/500 + D/30`, floored at 20 mm.
pub fn minimum_eccentricity(unsupported_length_mm: f64, lateral_dimension_mm: f64) -> f64 {
    (unsupported_length_mm / 500.0 + lateral_dimension_mm / 30.0).max(20.0)
}

/// Additional slenderness moment `Pu * D/2000 * (l_ex/D)^2` (the Pδ
/// amplification for a slender column), per the simplified code formula.
pub fn slenderness_additional_moment(pu: f64, effective_length_mm: f64, depth_mm: f64) -> f64 {
    pu * depth_mm / 2000.0 * (effective_length_mm / depth_mm).powi(2)
}
