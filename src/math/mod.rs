//! Dense linear-algebra primitives and the frame element kernel

pub mod condensation;
pub mod modal;
pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3};

pub use sparse::{solve_cg, solve_cg_with_progress, solve_pcg, solve_bicgstab, Csr, DokBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// The world-up reference used to build a member's local y/z axes. World-Y
/// is tried first; if the member axis is within `1e-6` of parallel to it
/// (i.e. a vertical member), world-Z is substituted instead. This keeps the
/// local frame well-defined and stable under small perturbations of a
/// near-vertical member's endpoints.
fn reference_up(local_x: &Vec3) -> Vec3 {
    let world_y = Vec3::new(0.0, 1.0, 0.0);
    if local_x.dot(&world_y).abs() > 1.0 - 1e-6 {
        Vec3::new(0.0, 0.0, 1.0)
    } else {
        world_y
    }
}

/// Compute the 12x12 local-to-global transformation matrix for a frame
/// member, given its end coordinates and roll angle about its own axis.
///
/// Precondition: the member has nonzero length (callers must skip
/// degenerate members before reaching the kernel).
pub fn member_transformation_matrix(
    i_node: &[f64; 3],
    j_node: &[f64; 3],
    rotation: f64,
) -> Mat12 {
    let d = Vector3::new(
        j_node[0] - i_node[0],
        j_node[1] - i_node[1],
        j_node[2] - i_node[2],
    );
    let length = d.norm();
    debug_assert!(length > 1e-10, "member has zero length");

    let x = d / length;
    let up = reference_up(&x);

    let mut z = x.cross(&up);
    z.normalize_mut();
    let mut y = z.cross(&x);
    y.normalize_mut();

    let (y, z) = if rotation.abs() > 1e-12 {
        let cos_r = rotation.cos();
        let sin_r = rotation.sin();
        (y * cos_r + z * sin_r, z * cos_r - y * sin_r)
    } else {
        (y, z)
    };

    let r = Mat3::new(
        x[0], x[1], x[2],
        y[0], y[1], y[2],
        z[0], z[1], z[2],
    );

    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        for row in 0..3 {
            for col in 0..3 {
                t[(offset + row, offset + col)] = r[(row, col)];
            }
        }
    }
    t
}

/// Extract the 3x3 direction-cosine block shared by the four diagonal
/// blocks of a member transformation matrix.
pub fn extract_rotation_matrix(t: &Mat12) -> Mat3 {
    Mat3::new(
        t[(0, 0)], t[(0, 1)], t[(0, 2)],
        t[(1, 0)], t[(1, 1)], t[(1, 2)],
        t[(2, 0)], t[(2, 1)], t[(2, 2)],
    )
}

/// The 12x12 local Euler-Bernoulli stiffness matrix for a 3D frame element.
pub fn member_local_stiffness(e: f64, g: f64, a: f64, iy: f64, iz: f64, j: f64, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Statically condense out released local DOFs from a member stiffness
/// matrix (e.g. a moment release at one end models a pin).
pub fn apply_releases(k: &Mat12, releases: &[bool; 12]) -> Mat12 {
    let unreleased: std::vec::Vec<usize> = (0..12).filter(|&i| !releases[i]).collect();
    let released: std::vec::Vec<usize> = (0..12).filter(|&i| releases[i]).collect();

    if released.is_empty() {
        return *k;
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k11 = DMatrix::zeros(n1, n1);
    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k11[(i, j)] = k[(ui, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in released.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k21[(i, j)] = k[(ri, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *k,
    };

    let k_condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut k_result = Mat12::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k_result[(ui, uj)] = k_condensed[(i, j)];
        }
    }
    k_result
}

/// Condense the fixed-end-reaction vector consistently with `apply_releases`.
pub fn apply_fer_releases(fer: &Vec12, k: &Mat12, releases: &[bool; 12]) -> Vec12 {
    let unreleased: std::vec::Vec<usize> = (0..12).filter(|&i| !releases[i]).collect();
    let released: std::vec::Vec<usize> = (0..12).filter(|&i| releases[i]).collect();

    if released.is_empty() {
        return *fer;
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in released.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let mut fer1 = DVector::zeros(n1);
    let mut fer2 = DVector::zeros(n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        fer1[i] = fer[ui];
    }
    for (i, &ri) in released.iter().enumerate() {
        fer2[i] = fer[ri];
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *fer,
    };

    let fer_condensed = &fer1 - &k12 * &k22_inv * &fer2;

    let mut fer_result = Vec12::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        fer_result[ui] = fer_condensed[i];
    }
    fer_result
}

/// Fixed-end reactions for a uniformly distributed load in local
/// `direction` (0=axial, 1=local-y, 2=local-z).
pub fn fer_uniform_load(w: f64, length: f64, direction: usize) -> Vec12 {
    let l = length;
    let l2 = l * l;

    let mut fer = Vec12::zeros();
    match direction {
        0 => {
            fer[0] = -w * l / 2.0;
            fer[6] = -w * l / 2.0;
        }
        1 => {
            fer[1] = -w * l / 2.0;
            fer[5] = -w * l2 / 12.0;
            fer[7] = -w * l / 2.0;
            fer[11] = w * l2 / 12.0;
        }
        2 => {
            fer[2] = -w * l / 2.0;
            fer[4] = w * l2 / 12.0;
            fer[8] = -w * l / 2.0;
            fer[10] = -w * l2 / 12.0;
        }
        _ => {}
    }
    fer
}

/// Fixed-end reactions for a point load at distance `a` from the i-node.
pub fn fer_point_load(p: f64, a: f64, length: f64, direction: usize) -> Vec12 {
    let l = length;
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;

    let mut fer = Vec12::zeros();
    match direction {
        0 => {
            fer[0] = -p * b / l;
            fer[6] = -p * a / l;
        }
        1 => {
            fer[1] = -p * b * b * (3.0 * a + b) / l3;
            fer[5] = -p * a * b * b / l2;
            fer[7] = -p * a * a * (a + 3.0 * b) / l3;
            fer[11] = p * a * a * b / l2;
        }
        2 => {
            fer[2] = -p * b * b * (3.0 * a + b) / l3;
            fer[4] = p * a * b * b / l2;
            fer[8] = -p * a * a * (a + 3.0 * b) / l3;
            fer[10] = -p * a * a * b / l2;
        }
        _ => {}
    }
    fer
}

/// Dense LU solve with partial pivoting (`nalgebra`'s default).
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

/// Dense Cholesky solve, for symmetric positive-definite systems.
pub fn solve_cholesky(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().cholesky().map(|chol| chol.solve(b))
}
