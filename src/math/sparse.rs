//! Sparse matrix storage and iterative solvers for the global stiffness system
//!
//! Frame stiffness matrices are typically 95-99% sparse. Above
//! `Config::sparse_threshold_dofs` free DOFs the solver switches from dense
//! LU to this CSR + Krylov path.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Dictionary-of-keys style sparse matrix builder: accumulates `(row, col,
/// value)` triples and sorts once at `to_csr()`. Values with magnitude below
/// `1e-15` are dropped at insertion, matching the conditioning floor used
/// elsewhere in the solver.
pub struct DokBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl DokBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: Vec::with_capacity(size * 36),
        }
    }

    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > 1e-15 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter-add a small fixed-size element matrix at the given global DOFs.
    pub fn add_element_matrix<const N: usize>(&mut self, dofs: &[usize; N], k_elem: &[[f64; N]; N]) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[i][j]);
            }
        }
    }

    /// Scatter-add an arbitrarily-sized dense block at the given global DOFs,
    /// used by the super-element hybrid assembly driver.
    pub fn add_submatrix(&mut self, dofs: &[usize], block: &nalgebra::DMatrix<f64>) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, block[(i, j)]);
            }
        }
    }

    pub fn to_csr(&self) -> Csr {
        let mut coo = CooMatrix::new(self.size, self.size);
        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }
        Csr(CsrMatrix::from(&coo))
    }

    pub fn to_dense(&self) -> nalgebra::DMatrix<f64> {
        let mut mat = nalgebra::DMatrix::zeros(self.size, self.size);
        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }
        mat
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Thin wrapper over `nalgebra_sparse::CsrMatrix` exposing the surface the
/// rest of the solver needs: raw CSR arrays, matvec, diagonal extraction,
/// and submatrix extraction (for static condensation partitions).
pub struct Csr(CsrMatrix<f64>);

impl Csr {
    pub fn nrows(&self) -> usize {
        self.0.nrows()
    }

    pub fn values(&self) -> &[f64] {
        self.0.values()
    }

    pub fn col_indices(&self) -> &[usize] {
        self.0.col_indices()
    }

    pub fn row_ptrs(&self) -> &[usize] {
        self.0.row_offsets()
    }

    pub fn diagonal(&self) -> DVector<f64> {
        let n = self.nrows();
        let mut diag = DVector::zeros(n);
        for (row, col, &val) in self.0.triplet_iter() {
            if row == col {
                diag[row] = val;
            }
        }
        diag
    }

    pub fn matvec(&self, x: &DVector<f64>) -> DVector<f64> {
        sparse_matvec(&self.0, x)
    }

    /// Extract the dense submatrix at the cross product of `rows` x `cols`,
    /// used when partitioning K into condensation/boundary-condition blocks.
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> nalgebra::DMatrix<f64> {
        use std::collections::HashMap;
        let col_index: HashMap<usize, usize> = cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let row_index: HashMap<usize, usize> = rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();

        let mut out = nalgebra::DMatrix::zeros(rows.len(), cols.len());
        for (row, col, &val) in self.0.triplet_iter() {
            if let (Some(&ri), Some(&ci)) = (row_index.get(&row), col_index.get(&col)) {
                out[(ri, ci)] = val;
            }
        }
        out
    }
}

#[inline]
fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let start = row_offsets[row];
        let end = row_offsets[row + 1];
        let mut sum = 0.0;
        for idx in start..end {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }
    y
}

type Progress<'a> = Option<&'a mut dyn FnMut(usize, f64) -> bool>;

/// Unpreconditioned conjugate gradient with a relative convergence
/// criterion `‖r_k‖₂ < tol · ‖b‖₂`. Returns `(x, converged, residual_norm)`.
pub fn solve_cg(csr: &Csr, b: &DVector<f64>, tol: f64, max_iter: usize) -> (DVector<f64>, bool, f64) {
    solve_cg_with_progress(csr, b, tol, max_iter, None)
}

pub fn solve_cg_with_progress(
    csr: &Csr,
    b: &DVector<f64>,
    tol: f64,
    max_iter: usize,
    mut progress: Progress,
) -> (DVector<f64>, bool, f64) {
    let n = csr.nrows();
    let b_norm = b.norm();
    if b_norm < 1e-300 {
        return (DVector::zeros(n), true, 0.0);
    }
    let threshold = tol * b_norm;

    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let mut p = r.clone();
    let mut r_dot_r = r.dot(&r);

    if r.norm() < threshold {
        return (x, true, r.norm());
    }

    for iter in 0..max_iter {
        let ap = csr.matvec(&p);
        let p_dot_ap = p.dot(&ap);
        if p_dot_ap.abs() <= 1e-15 {
            return (x, false, r.norm());
        }

        let alpha = r_dot_r / p_dot_ap;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        let r_norm = r.norm();
        if let Some(cb) = progress.as_deref_mut() {
            if !cb(iter, r_norm) {
                return (x, false, r_norm);
            }
        }
        if r_norm < threshold {
            return (x, true, r_norm);
        }

        let r_dot_r_new = r.dot(&r);
        let beta = r_dot_r_new / r_dot_r;
        r_dot_r = r_dot_r_new;
        p = &r + beta * &p;
    }

    (x, false, r.norm())
}

/// Jacobi-preconditioned conjugate gradient, same relative convergence
/// criterion as [`solve_cg`].
pub fn solve_pcg(csr: &Csr, b: &DVector<f64>, tol: f64, max_iter: usize) -> (DVector<f64>, bool, f64) {
    let n = csr.nrows();
    let b_norm = b.norm();
    if b_norm < 1e-300 {
        return (DVector::zeros(n), true, 0.0);
    }
    let threshold = tol * b_norm;

    let mut diag = csr.diagonal();
    for i in 0..n {
        if diag[i].abs() < 1e-15 {
            diag[i] = 1.0;
        }
    }

    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let mut z = r.component_div(&diag);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);

    if r.norm() < threshold {
        return (x, true, r.norm());
    }

    for _iter in 0..max_iter {
        let ap = csr.matvec(&p);
        let p_dot_ap = p.dot(&ap);
        if p_dot_ap.abs() <= 1e-15 {
            return (x, false, r.norm());
        }

        let alpha = r_dot_z / p_dot_ap;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        let r_norm = r.norm();
        if r_norm < threshold {
            return (x, true, r_norm);
        }

        z = r.component_div(&diag);
        let r_dot_z_new = r.dot(&z);
        let beta = r_dot_z_new / r_dot_z;
        r_dot_z = r_dot_z_new;
        p = &z + beta * &p;
    }

    (x, false, r.norm())
}

/// BiCGSTAB for non-symmetric sparse systems (used by the condensation
/// hybrid driver's penalty-BC path, which is not guaranteed symmetric once
/// penalties are mixed with off-diagonal coupling). Guards against the
/// three classical breakdown modes: `rho ≈ 0`, `r̂ᵀv ≈ 0`, and `tᵀt ≈ 0`.
pub fn solve_bicgstab(
    csr: &Csr,
    b: &DVector<f64>,
    tol: f64,
    max_iter: usize,
    mut progress: Progress,
) -> (DVector<f64>, bool, f64) {
    let n = csr.nrows();
    let b_norm = b.norm();
    if b_norm < 1e-300 {
        return (DVector::zeros(n), true, 0.0);
    }
    let threshold = tol * b_norm;

    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let r_hat = r.clone();

    if r.norm() < threshold {
        return (x, true, r.norm());
    }

    let mut rho = 1.0;
    let mut alpha = 1.0;
    let mut omega = 1.0;
    let mut v = DVector::zeros(n);
    let mut p = DVector::zeros(n);

    for iter in 0..max_iter {
        let rho_new = r_hat.dot(&r);
        if rho_new.abs() <= 1e-15 {
            return (x, false, r.norm());
        }

        let beta = (rho_new / rho) * (alpha / omega);
        p = &r + beta * (&p - omega * &v);
        rho = rho_new;

        v = csr.matvec(&p);
        let r_hat_dot_v = r_hat.dot(&v);
        if r_hat_dot_v.abs() <= 1e-15 {
            return (x, false, r.norm());
        }
        alpha = rho / r_hat_dot_v;

        let s = &r - alpha * &v;
        if s.norm() < threshold {
            x.axpy(alpha, &p, 1.0);
            return (x, true, s.norm());
        }

        let t = csr.matvec(&s);
        let t_dot_t = t.dot(&t);
        if t_dot_t <= 1e-15 {
            return (x, false, r.norm());
        }
        omega = t.dot(&s) / t_dot_t;

        x.axpy(alpha, &p, 1.0);
        x.axpy(omega, &s, 1.0);

        r = &s - omega * &t;
        let r_norm = r.norm();
        if let Some(cb) = progress.as_deref_mut() {
            if !cb(iter, r_norm) {
                return (x, false, r_norm);
            }
        }
        if r_norm < threshold {
            return (x, true, r_norm);
        }

        if omega.abs() <= 1e-15 {
            return (x, false, r_norm);
        }
    }

    (x, false, r.norm())
}
