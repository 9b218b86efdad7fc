//! Seismic load generation: equivalent static lateral force procedure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeismicZone {
    Two,
    Three,
    Four,
    Five,
}

impl SeismicZone {
    pub fn factor(self) -> f64 {
        match self {
            SeismicZone::Two => 0.10,
            SeismicZone::Three => 0.16,
            SeismicZone::Four => 0.24,
            SeismicZone::Five => 0.36,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportanceCategory {
    Standard,
    Normal,
    Important,
    Critical,
}

impl ImportanceCategory {
    pub fn factor(self) -> f64 {
        match self {
            ImportanceCategory::Standard => 1.0,
            ImportanceCategory::Normal => 1.0,
            ImportanceCategory::Important => 1.2,
            ImportanceCategory::Critical => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilType {
    /// Hard soil / rock.
    One,
    /// Medium soil.
    Two,
    /// Soft soil.
    Three,
}

impl SoilType {
    fn descending_coefficient(self) -> f64 {
        match self {
            SoilType::One => 1.0,
            SoilType::Two => 1.36,
            SoilType::Three => 1.67,
        }
    }

    fn plateau_upper_period(self) -> f64 {
        match self {
            SoilType::One => 0.40,
            SoilType::Two => 0.55,
            SoilType::Three => 0.67,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    ReinforcedConcrete,
    Steel,
    ShearWallOrMasonry,
}

/// Empirical fundamental period `T_a`, per the documented formula for each
/// frame type. `depth` is only used for shear-wall/masonry buildings.
pub fn empirical_period(frame: FrameType, height: f64, depth: f64) -> f64 {
    match frame {
        FrameType::ReinforcedConcrete => 0.075 * height.powf(0.75),
        FrameType::Steel => 0.085 * height.powf(0.75),
        FrameType::ShearWallOrMasonry => 0.09 * height / depth.max(1e-9).sqrt(),
    }
}

/// Spectral acceleration coefficient `S_a/g`, three-piece spectrum:
/// ascending below 0.1s, plateau at 2.5 up to the soil's plateau period,
/// then a soil-dependent descending hyperbola.
pub fn spectral_coefficient(period: f64, soil: SoilType) -> f64 {
    if period <= 0.1 {
        1.0 + 15.0 * period
    } else if period <= soil.plateau_upper_period() {
        2.5
    } else {
        soil.descending_coefficient() / period
    }
}

/// Damping correction multiplying factor, linearly interpolated over the
/// documented table (damping % -> factor), 5% damping giving unity.
pub fn damping_correction(damping_percent: f64) -> f64 {
    const TABLE: [(f64, f64); 9] = [
        (0.0, 3.20),
        (2.0, 1.40),
        (5.0, 1.00),
        (7.0, 0.90),
        (10.0, 0.80),
        (15.0, 0.70),
        (20.0, 0.63),
        (25.0, 0.58),
        (30.0, 0.54),
    ];
    if damping_percent <= TABLE[0].0 {
        return TABLE[0].1;
    }
    if damping_percent >= TABLE[TABLE.len() - 1].0 {
        return TABLE[TABLE.len() - 1].1;
    }
    for w in TABLE.windows(2) {
        let (d0, f0) = w[0];
        let (d1, f1) = w[1];
        if damping_percent >= d0 && damping_percent <= d1 {
            let t = (damping_percent - d0) / (d1 - d0);
            return f0 + (f1 - f0) * t;
        }
    }
    1.0
}

/// Design horizontal seismic coefficient `A_h = max((Z/2)(I/R)(Sa/g), 0.10 Z)`.
pub fn design_horizontal_coefficient(zone: SeismicZone, importance: ImportanceCategory, response_reduction: f64, sa_over_g: f64) -> f64 {
    let z = zone.factor();
    let computed = (z / 2.0) * (importance.factor() / response_reduction) * sa_over_g;
    computed.max(0.10 * z)
}

/// Per-floor seismic input: seismic weight and height above base.
#[derive(Debug, Clone, Copy)]
pub struct FloorLoad {
    pub weight: f64,
    pub height: f64,
}

/// Result of the vertical distribution: per-floor lateral force, cumulative
/// story shear (from the top down), and overturning moment at each level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeismicDistribution {
    pub base_shear: f64,
    pub lateral_forces: Vec<f64>,
    pub story_shears: Vec<f64>,
    pub overturning_moments: Vec<f64>,
}

/// Distribute base shear `V_B = A_h * W` vertically as
/// `Q_i = V_B * (W_i h_i^2) / sum_j(W_j h_j^2)`, then accumulate story
/// shears from the top and overturning moments.
pub fn distribute(floors: &[FloorLoad], a_h: f64) -> SeismicDistribution {
    let total_weight: f64 = floors.iter().map(|f| f.weight).sum();
    let base_shear = a_h * total_weight;

    let denom: f64 = floors.iter().map(|f| f.weight * f.height * f.height).sum();
    let lateral_forces: Vec<f64> = if denom > 1e-12 {
        floors.iter().map(|f| base_shear * f.weight * f.height * f.height / denom).collect()
    } else {
        vec![0.0; floors.len()]
    };

    let n = floors.len();
    let mut story_shears = vec![0.0; n];
    let mut running = 0.0;
    for i in (0..n).rev() {
        running += lateral_forces[i];
        story_shears[i] = running;
    }

    let mut overturning_moments = vec![0.0; n];
    for i in 0..n {
        let base_height = if i == 0 { 0.0 } else { floors[i - 1].height };
        let mut moment = 0.0;
        for (j, force) in lateral_forces.iter().enumerate().skip(i) {
            moment += force * (floors[j].height - base_height);
        }
        overturning_moments[i] = moment;
    }

    SeismicDistribution {
        base_shear,
        lateral_forces,
        story_shears,
        overturning_moments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn three_story_distribution_matches_worked_example() {
        // Heights (3,6,9) m, weights (100,100,80) kN, Z=0.24, I=1, R=5, RC frame.
        let period = empirical_period(FrameType::ReinforcedConcrete, 9.0, 1.0);
        assert_relative_eq!(period, 0.39, max_relative = 0.02);

        let sa_over_g = spectral_coefficient(period, SoilType::Two);
        assert_relative_eq!(sa_over_g, 2.5, max_relative = 1e-9);

        let a_h = design_horizontal_coefficient(SeismicZone::Four, ImportanceCategory::Normal, 5.0, sa_over_g);
        assert_relative_eq!(a_h, 0.06, max_relative = 1e-9);

        let floors = [
            FloorLoad { weight: 100.0, height: 3.0 },
            FloorLoad { weight: 100.0, height: 6.0 },
            FloorLoad { weight: 80.0, height: 9.0 },
        ];
        let dist = distribute(&floors, a_h);
        assert_relative_eq!(dist.base_shear, 16.8, max_relative = 1e-9);
        assert_relative_eq!(dist.lateral_forces[0], 1.38, max_relative = 0.01);
        assert_relative_eq!(dist.lateral_forces[1], 5.51, max_relative = 0.01);
        assert_relative_eq!(dist.lateral_forces[2], 9.91, max_relative = 0.01);

        let sum: f64 = dist.lateral_forces.iter().sum();
        assert_relative_eq!(sum, dist.base_shear, max_relative = 1e-9);
    }

    #[test]
    fn unity_damping_correction_at_five_percent() {
        assert_relative_eq!(damping_correction(5.0), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn story_shear_is_cumulative_from_the_top() {
        let floors = [
            FloorLoad { weight: 100.0, height: 3.0 },
            FloorLoad { weight: 100.0, height: 6.0 },
        ];
        let dist = distribute(&floors, 0.06);
        assert_relative_eq!(dist.story_shears[1], dist.lateral_forces[1], max_relative = 1e-9);
        assert_relative_eq!(dist.story_shears[0], dist.lateral_forces[0] + dist.lateral_forces[1], max_relative = 1e-9);
    }
}
