//! Internal-force diagrams: shear Fy(x) and moment Mz(x) along a member,
//! sampled from its end forces and local-Y span loads.

use serde::{Deserialize, Serialize};

use crate::results::MemberEndForces;

/// A point load in the member's local Y direction, at distance `position`
/// from the i-node.
#[derive(Debug, Clone, Copy)]
pub struct SpanPointLoad {
    pub position: f64,
    pub magnitude: f64,
}

/// A (possibly trapezoidal) distributed load in local Y over `[x1, x2]`,
/// positive downward per the diagram sign convention.
#[derive(Debug, Clone, Copy)]
pub struct SpanDistLoad {
    pub w1: f64,
    pub w2: f64,
    pub x1: f64,
    pub x2: f64,
}

impl SpanDistLoad {
    fn intensity_at(&self, x: f64) -> f64 {
        if x < self.x1 || x > self.x2 || (self.x2 - self.x1).abs() < 1e-12 {
            return 0.0;
        }
        let t = (x - self.x1) / (self.x2 - self.x1);
        self.w1 + (self.w2 - self.w1) * t
    }
}

/// One sample along a member's length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiagramSample {
    pub x: f64,
    pub moment_z: f64,
    pub shear_y: f64,
}

/// Sample the shear/moment diagram for a member of length `length`, given
/// its end forces and local-Y span loads, at `segments + 1` points.
///
/// Positive `q` is downward, positive `V_y` upward, positive `M_z` follows
/// the right-hand rule about local z — the end samples are overwritten with
/// the member's actual end forces to absorb rounding drift from the
/// trapezoidal shear integration.
pub fn sample_diagram(
    end_forces: &MemberEndForces,
    length: f64,
    dist_loads: &[SpanDistLoad],
    point_loads: &[SpanPointLoad],
    segments: usize,
) -> Vec<DiagramSample> {
    let n = segments.max(1);
    let dx = length / n as f64;

    let mut samples = Vec::with_capacity(n + 1);
    let mut v = end_forces.i.shear_y;
    let mut m = end_forces.i.moment_z;
    samples.push(DiagramSample {
        x: 0.0,
        moment_z: m,
        shear_y: v,
    });

    let q_at = |x: f64| -> f64 { dist_loads.iter().map(|d| d.intensity_at(x)).sum() };

    for p in 0..n {
        let x0 = p as f64 * dx;
        let x1 = x0 + dx;
        let v0 = v;

        let q_mid = q_at(x0 + dx / 2.0);
        let v1 = v0 - q_mid * dx;
        let mut m1 = m + 0.5 * (v0 + v1) * dx;
        let mut v_end = v1;

        for pl in point_loads {
            if pl.position > x0 && pl.position <= x1 {
                v_end -= pl.magnitude;
                m1 -= pl.magnitude * (x1 - pl.position);
            }
        }

        v = v_end;
        m = m1;
        samples.push(DiagramSample {
            x: x1,
            moment_z: m,
            shear_y: v,
        });
    }

    if let Some(last) = samples.last_mut() {
        last.shear_y = end_forces.j.shear_y;
        last.moment_z = end_forces.j.moment_z;
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::MemberForces;
    use approx::assert_relative_eq;

    fn end_forces(vi: f64, mi: f64, vj: f64, mj: f64) -> MemberEndForces {
        MemberEndForces {
            i: MemberForces {
                axial: 0.0,
                shear_y: vi,
                shear_z: 0.0,
                torsion: 0.0,
                moment_y: 0.0,
                moment_z: mi,
            },
            j: MemberForces {
                axial: 0.0,
                shear_y: vj,
                shear_z: 0.0,
                torsion: 0.0,
                moment_y: 0.0,
                moment_z: mj,
            },
        }
    }

    #[test]
    fn end_samples_match_end_forces_exactly() {
        let forces = end_forces(5.0, 0.0, -5.0, 10.0);
        let samples = sample_diagram(&forces, 4.0, &[], &[], 10);
        let first = samples.first().unwrap();
        let last = samples.last().unwrap();
        assert_relative_eq!(first.shear_y, 5.0);
        assert_relative_eq!(first.moment_z, 0.0);
        assert_relative_eq!(last.shear_y, -5.0);
        assert_relative_eq!(last.moment_z, 10.0);
    }

    #[test]
    fn midspan_point_load_produces_expected_moment() {
        // Simply-supported beam, P=10 at midspan, L=4: reactions +5 at each
        // end, moment at midspan = PL/4 = 10.
        let forces = end_forces(5.0, 0.0, -5.0, 0.0);
        let point = SpanPointLoad {
            position: 2.0,
            magnitude: 10.0,
        };
        let samples = sample_diagram(&forces, 4.0, &[], &[point], 20);
        let mid = samples.iter().min_by(|a, b| (a.x - 2.0).abs().partial_cmp(&(b.x - 2.0).abs()).unwrap()).unwrap();
        assert_relative_eq!(mid.moment_z, 10.0, max_relative = 1e-6);
    }

    #[test]
    fn zero_length_distributed_load_has_no_effect() {
        let forces = end_forces(0.0, 0.0, 0.0, 0.0);
        let dist = SpanDistLoad {
            w1: 5.0,
            w2: 5.0,
            x1: 2.0,
            x2: 2.0,
        };
        let samples = sample_diagram(&forces, 4.0, &[dist], &[], 10);
        for s in &samples {
            assert_relative_eq!(s.shear_y, 0.0, epsilon = 1e-10);
        }
    }
}
