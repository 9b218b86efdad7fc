//! Wind load generation: basic speed-pressure method.
//!
//! Terrain/class k2 values below are representative of the IS 875 Part 3
//! style terrain-category table cited in the brief; the table isn't
//! reproduced verbatim anywhere in the corpus, so these are documented,
//! plausible engineering constants rather than a transcription of a
//! specific edition's published table.

use serde::{Deserialize, Serialize};

/// Risk/structure-class bucket, used both for `k1` and to index the `k2`
/// terrain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureClass {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainCategory {
    One,
    Two,
    Three,
    Four,
}

/// Opening category, for the internal pressure coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningCategory {
    Normal,
    Large,
    Dominant,
    Sealed,
}

impl OpeningCategory {
    pub fn cpi(self) -> f64 {
        match self {
            OpeningCategory::Normal => 0.2,
            OpeningCategory::Large => 0.5,
            OpeningCategory::Dominant => 0.7,
            OpeningCategory::Sealed => 0.0,
        }
    }
}

/// Risk coefficient `k1` by structure class.
pub fn k1(class: StructureClass) -> f64 {
    match class {
        StructureClass::A => 1.00,
        StructureClass::B => 0.98,
        StructureClass::C => 0.92,
    }
}

const HEIGHTS: [f64; 14] = [
    10.0, 15.0, 20.0, 30.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0,
];

/// `k2` at the table heights for terrain category 1 (class A baseline);
/// categories 2-4 and classes B/C are derived by scaling factors below.
const K2_CATEGORY_1: [f64; 14] = [
    1.05, 1.09, 1.12, 1.15, 1.20, 1.26, 1.30, 1.32, 1.34, 1.35, 1.37, 1.38, 1.39, 1.40,
];
const K2_CATEGORY_2: [f64; 14] = [
    1.00, 1.05, 1.07, 1.12, 1.17, 1.24, 1.28, 1.30, 1.32, 1.34, 1.35, 1.36, 1.37, 1.38,
];
const K2_CATEGORY_3: [f64; 14] = [
    0.91, 0.97, 1.01, 1.06, 1.12, 1.20, 1.24, 1.27, 1.29, 1.31, 1.32, 1.34, 1.35, 1.36,
];
const K2_CATEGORY_4: [f64; 14] = [
    0.80, 0.87, 0.91, 0.97, 1.04, 1.13, 1.18, 1.22, 1.24, 1.27, 1.28, 1.30, 1.31, 1.32,
];

fn class_scale(class: StructureClass) -> f64 {
    match class {
        StructureClass::A => 1.00,
        StructureClass::B => 0.98,
        StructureClass::C => 0.95,
    }
}

fn category_table(terrain: TerrainCategory) -> &'static [f64; 14] {
    match terrain {
        TerrainCategory::One => &K2_CATEGORY_1,
        TerrainCategory::Two => &K2_CATEGORY_2,
        TerrainCategory::Three => &K2_CATEGORY_3,
        TerrainCategory::Four => &K2_CATEGORY_4,
    }
}

/// Terrain factor `k2(z)` by linear interpolation over the documented
/// height table; clamped at the table's ends.
pub fn k2(terrain: TerrainCategory, class: StructureClass, z: f64) -> f64 {
    let table = category_table(terrain);
    let scale = class_scale(class);

    if z <= HEIGHTS[0] {
        return table[0] * scale;
    }
    if z >= *HEIGHTS.last().unwrap() {
        return table[table.len() - 1] * scale;
    }
    for w in HEIGHTS.windows(2).enumerate() {
        let (i, pair) = w;
        let (z0, z1) = (pair[0], pair[1]);
        if z >= z0 && z <= z1 {
            let t = (z - z0) / (z1 - z0);
            return (table[i] + (table[i + 1] - table[i]) * t) * scale;
        }
    }
    table[table.len() - 1] * scale
}

/// Topography factor. `slope` in degrees, `upwind_distance`/`height` in the
/// same length unit; `k3 >= 1` always.
pub fn k3(slope_degrees: f64, height: f64, upwind_distance: f64) -> f64 {
    if slope_degrees < 3.0 || upwind_distance <= 0.0 {
        return 1.0;
    }
    let s = (slope_degrees.to_radians().tan()).min(0.6);
    let c = if slope_degrees >= 17.0 { 0.36 } else { 1.2 * (slope_degrees - 3.0) / 14.0 * 0.36 };
    (1.0 + c * (1.0 - (upwind_distance / (height.max(1e-6) * 10.0)).min(1.0))).max(1.0)
}

/// Design wind speed `V_z = V_b * k1 * k2 * k3` and pressure `P_z = 0.6 V_z^2`.
pub fn design_pressure(basic_speed: f64, terrain: TerrainCategory, class: StructureClass, z: f64, k3_factor: f64) -> (f64, f64) {
    let vz = basic_speed * k1(class) * k2(terrain, class, z) * k3_factor;
    let pz = 0.6 * vz * vz;
    (vz, pz)
}

/// External pressure coefficient bracketed by h/w, walls only (windward
/// face is a constant `+0.7`; leeward varies by h/w per the documented
/// bracket table).
pub fn cpe_leeward(h_over_w: f64) -> f64 {
    if h_over_w <= 0.5 {
        -0.3
    } else if h_over_w <= 1.5 {
        -0.5
    } else {
        -0.7
    }
}

pub const CPE_WINDWARD: f64 = 0.7;

/// Net pressure coefficient combining external and internal contributions.
/// Windward: suction from internal pressure adds (`cpe + cpi`); leeward:
/// the internal pressure opposes the external suction (`cpe - cpi`).
pub fn net_coefficient(cpe: f64, cpi: f64, windward: bool) -> f64 {
    if windward {
        cpe + cpi
    } else {
        cpe - cpi
    }
}

/// One elevation strip of the wind height profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindStrip {
    pub z_bottom: f64,
    pub z_top: f64,
    pub z_mid: f64,
    pub vz: f64,
    pub pz: f64,
    pub windward_force: f64,
    pub leeward_force: f64,
}

/// Subdivide `[0, height]` into `num_strips` equal strips and compute the
/// net wind force on each, given building `width` and `depth` (depth sets
/// the tributary area of each strip per unit height along `width`).
#[allow(clippy::too_many_arguments)]
pub fn height_profile(
    basic_speed: f64,
    terrain: TerrainCategory,
    class: StructureClass,
    height: f64,
    width: f64,
    opening: OpeningCategory,
    k3_factor: f64,
    num_strips: usize,
) -> Vec<WindStrip> {
    let n = num_strips.max(1);
    let dz = height / n as f64;
    let cpi = opening.cpi();
    let h_over_w = if width > 1e-9 { height / width } else { 1.0 };
    let cpe_lee = cpe_leeward(h_over_w);

    (0..n)
        .map(|i| {
            let z_bottom = i as f64 * dz;
            let z_top = z_bottom + dz;
            let z_mid = 0.5 * (z_bottom + z_top);
            let (vz, pz) = design_pressure(basic_speed, terrain, class, z_mid, k3_factor);
            let area = dz * width;
            WindStrip {
                z_bottom,
                z_top,
                z_mid,
                vz,
                pz,
                windward_force: net_coefficient(CPE_WINDWARD, cpi, true) * area * pz,
                leeward_force: net_coefficient(cpe_lee, cpi, false) * area * pz,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k2_interpolates_between_table_heights() {
        let a = k2(TerrainCategory::Two, StructureClass::A, 10.0);
        let b = k2(TerrainCategory::Two, StructureClass::A, 15.0);
        let mid = k2(TerrainCategory::Two, StructureClass::A, 12.5);
        assert!(mid > a.min(b) && mid < a.max(b));
    }

    #[test]
    fn k2_clamps_below_and_above_table_range() {
        let below = k2(TerrainCategory::One, StructureClass::A, 1.0);
        let at_min = k2(TerrainCategory::One, StructureClass::A, 10.0);
        assert_eq!(below, at_min);

        let above = k2(TerrainCategory::One, StructureClass::A, 1000.0);
        let at_max = k2(TerrainCategory::One, StructureClass::A, 500.0);
        assert_eq!(above, at_max);
    }

    #[test]
    fn flat_ground_has_no_topography_amplification() {
        assert_eq!(k3(0.0, 10.0, 100.0), 1.0);
    }

    #[test]
    fn design_pressure_scales_with_speed_squared() {
        let (vz1, pz1) = design_pressure(44.0, TerrainCategory::Two, StructureClass::A, 10.0, 1.0);
        let (vz2, pz2) = design_pressure(88.0, TerrainCategory::Two, StructureClass::A, 10.0, 1.0);
        assert!((vz2 / vz1 - 2.0).abs() < 1e-9);
        assert!((pz2 / pz1 - 4.0).abs() < 1e-6);
    }

    #[test]
    fn height_profile_subdivides_into_equal_strips() {
        let strips = height_profile(44.0, TerrainCategory::Two, StructureClass::A, 20.0, 10.0, OpeningCategory::Normal, 1.0, 4);
        assert_eq!(strips.len(), 4);
        assert!((strips[0].z_top - strips[0].z_bottom - 5.0).abs() < 1e-9);
        assert!((strips.last().unwrap().z_top - 20.0).abs() < 1e-9);
    }
}
