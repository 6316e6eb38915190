use super::{Tensor2, Tensor4};

/// Computes the double-dot product of two second-order tensors: `a : b`
pub fn t2_ddot_t2(a: &Tensor2, b: &Tensor2) -> f64 {
    let mut sum = 0.0;
    for i in 0..6 {
        sum += a.vec[i] * b.vec[i];
    }
    sum
}

/// Computes `out = α D : ε`
pub fn t4_ddot_t2(out: &mut Tensor2, alpha: f64, dd: &Tensor4, eps: &Tensor2) {
    for i in 0..6 {
        let mut sum = 0.0;
        for j in 0..6 {
            sum += dd.mat.get(i, j) * eps.vec[j];
        }
        out.vec[i] = alpha * sum;
    }
}

/// Computes `σ += α D : ε`
pub fn t4_ddot_t2_update(sigma: &mut Tensor2, alpha: f64, dd: &Tensor4, eps: &Tensor2) {
    for i in 0..6 {
        let mut sum = 0.0;
        for j in 0..6 {
            sum += dd.mat.get(i, j) * eps.vec[j];
        }
        sigma.vec[i] += alpha * sum;
    }
}

/// Computes `D += α a ⊗ b` (dyadic product update)
pub fn t2_dyad_t2_update(dd: &mut Tensor4, alpha: f64, a: &Tensor2, b: &Tensor2) {
    for i in 0..6 {
        for j in 0..6 {
            let value = dd.mat.get(i, j) + alpha * a.vec[i] * b.vec[j];
            dd.mat.set(i, j, value);
        }
    }
}

/// Computes the scalar `a : D : b`
pub fn t2_ddot_t4_ddot_t2(a: &Tensor2, dd: &Tensor4, b: &Tensor2) -> f64 {
    let mut sum = 0.0;
    for i in 0..6 {
        for j in 0..6 {
            sum += a.vec[i] * dd.mat.get(i, j) * b.vec[j];
        }
    }
    sum
}

/// Computes `out = α D + β (D : a) ⊗ (b : D)`
///
/// This operation assembles the elastoplastic tangent from the elastic
/// rigidity `D` and the yield/potential gradients `a = dg/dσ`, `b = df/dσ`.
pub fn t4_ddot_t2_dyad_t2_ddot_t4(out: &mut Tensor4, alpha: f64, dd: &Tensor4, beta: f64, a: &Tensor2, b: &Tensor2) {
    let mut da = Tensor2::new(); // D : a
    let mut bd = Tensor2::new(); // b : D
    t4_ddot_t2(&mut da, 1.0, dd, a);
    for j in 0..6 {
        let mut sum = 0.0;
        for i in 0..6 {
            sum += b.vec[i] * dd.mat.get(i, j);
        }
        bd.vec[j] = sum;
    }
    for i in 0..6 {
        for j in 0..6 {
            out.mat.set(i, j, alpha * dd.mat.get(i, j) + beta * da.vec[i] * bd.vec[j]);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{t2_ddot_t2, t2_ddot_t4_ddot_t2, t2_dyad_t2_update, t4_ddot_t2, t4_ddot_t2_dyad_t2_ddot_t4, t4_ddot_t2_update};
    use crate::tensor::{Tensor2, Tensor4};
    use russell_lab::approx_eq;

    fn sample_dd() -> Tensor4 {
        let mut dd = Tensor4::new();
        for i in 0..6 {
            dd.mat.set(i, i, 2.0 + i as f64);
        }
        dd.mat.set(0, 1, 0.5);
        dd.mat.set(1, 0, 0.5);
        dd
    }

    #[test]
    fn contraction_operations_work() {
        let dd = sample_dd();
        let mut a = Tensor2::new();
        let mut b = Tensor2::new();
        a.vec[0] = 1.0;
        a.vec[3] = 2.0;
        b.vec[1] = 3.0;
        b.vec[3] = -1.0;
        approx_eq(t2_ddot_t2(&a, &b), -2.0, 1e-15);

        let mut out = Tensor2::new();
        t4_ddot_t2(&mut out, 1.0, &dd, &a);
        approx_eq(out.vec[0], 2.0, 1e-15);
        approx_eq(out.vec[1], 0.5, 1e-15);
        approx_eq(out.vec[3], 10.0, 1e-15);

        let mut sigma = Tensor2::new();
        sigma.vec[0] = 1.0;
        t4_ddot_t2_update(&mut sigma, 2.0, &dd, &a);
        approx_eq(sigma.vec[0], 5.0, 1e-15);

        // a : D : b = (D : b) : a
        let mut db = Tensor2::new();
        t4_ddot_t2(&mut db, 1.0, &dd, &b);
        approx_eq(t2_ddot_t4_ddot_t2(&a, &dd, &b), t2_ddot_t2(&a, &db), 1e-14);
    }

    #[test]
    fn dyad_operations_work() {
        let mut dd = Tensor4::new();
        let mut a = Tensor2::new();
        let mut b = Tensor2::new();
        a.vec[0] = 2.0;
        b.vec[1] = 3.0;
        t2_dyad_t2_update(&mut dd, 0.5, &a, &b);
        approx_eq(dd.mat.get(0, 1), 3.0, 1e-15);
        approx_eq(dd.mat.get(1, 0), 0.0, 1e-15);
    }

    #[test]
    fn elastoplastic_assembly_matches_manual_computation() {
        let dd = sample_dd();
        let mut n = Tensor2::new();
        n.vec[0] = 1.0;
        n.vec[1] = -1.0;
        let mut out = Tensor4::new();
        let phi = t2_ddot_t4_ddot_t2(&n, &dd, &n);
        t4_ddot_t2_dyad_t2_ddot_t4(&mut out, 1.0, &dd, -1.0 / phi, &n, &n);
        // the resulting operator must annihilate D:n along n: n : Dep : n = 0
        approx_eq(t2_ddot_t4_ddot_t2(&n, &out, &n), 0.0, 1e-12);
    }
}
