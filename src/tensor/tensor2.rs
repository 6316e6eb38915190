use super::{eigen_sym_3x3, SQRT_2};
use russell_lab::Vector;
use serde::{Deserialize, Serialize};

/// Holds a symmetric second-order tensor in Mandel-scaled Voigt form
///
/// Component order: `[xx, yy, zz, √2·xy, √2·yz, √2·zx]`. With this scaling,
/// the Euclidean dot product of two 6-vectors equals the double-dot
/// contraction of the corresponding tensors.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tensor2 {
    /// Mandel components
    pub vec: Vector,
}

impl Tensor2 {
    /// Allocates a zero tensor
    pub fn new() -> Self {
        Tensor2 { vec: Vector::new(6) }
    }

    /// Allocates a tensor from the (i,j) components of a symmetric matrix
    pub fn from_matrix(a: &[[f64; 3]; 3]) -> Self {
        let mut t = Tensor2::new();
        t.vec[0] = a[0][0];
        t.vec[1] = a[1][1];
        t.vec[2] = a[2][2];
        t.vec[3] = a[0][1] * SQRT_2;
        t.vec[4] = a[1][2] * SQRT_2;
        t.vec[5] = a[0][2] * SQRT_2;
        t
    }

    /// Returns the (i,j) component of the tensor
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return self.vec[i];
        }
        let m = match (i, j) {
            (0, 1) | (1, 0) => 3,
            (1, 2) | (2, 1) => 4,
            _ => 5,
        };
        self.vec[m] / SQRT_2
    }

    /// Sets the (i,j) component of the tensor (with Mandel scaling)
    pub fn sym_set(&mut self, i: usize, j: usize, value: f64) {
        if i == j {
            self.vec[i] = value;
            return;
        }
        let m = match (i, j) {
            (0, 1) | (1, 0) => 3,
            (1, 2) | (2, 1) => 4,
            _ => 5,
        };
        self.vec[m] = value * SQRT_2;
    }

    /// Sets this tensor to α times another tensor
    pub fn set_tensor(&mut self, alpha: f64, other: &Tensor2) {
        for i in 0..6 {
            self.vec[i] = alpha * other.vec[i];
        }
    }

    /// Adds α times another tensor to this tensor
    pub fn update(&mut self, alpha: f64, other: &Tensor2) {
        for i in 0..6 {
            self.vec[i] += alpha * other.vec[i];
        }
    }

    /// Fills this tensor with zeros
    pub fn clear(&mut self) {
        self.vec.fill(0.0);
    }

    /// Returns the trace
    pub fn trace(&self) -> f64 {
        self.vec[0] + self.vec[1] + self.vec[2]
    }

    /// Returns the Euclidean norm (equals the tensor norm under Mandel scaling)
    pub fn norm(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..6 {
            sum += self.vec[i] * self.vec[i];
        }
        f64::sqrt(sum)
    }

    /// Computes the deviator: s = dev(σ)
    pub fn deviator(&self, s: &mut Tensor2) {
        let m = self.trace() / 3.0;
        s.set_tensor(1.0, self);
        s.vec[0] -= m;
        s.vec[1] -= m;
        s.vec[2] -= m;
    }

    /// Returns the mean invariant: σm = tr(σ)/3
    pub fn invariant_sigma_m(&self) -> f64 {
        self.trace() / 3.0
    }

    /// Returns the deviatoric invariant: σd = √(3 J2) (von Mises norm)
    pub fn invariant_sigma_d(&self) -> f64 {
        let mut s = Tensor2::new();
        self.deviator(&mut s);
        f64::sqrt(1.5) * s.norm()
    }

    /// Converts the Mandel components to a symmetric 3x3 matrix
    pub fn as_matrix(&self) -> [[f64; 3]; 3] {
        let (xy, yz, zx) = (self.vec[3] / SQRT_2, self.vec[4] / SQRT_2, self.vec[5] / SQRT_2);
        [
            [self.vec[0], xy, zx],
            [xy, self.vec[1], yz],
            [zx, yz, self.vec[2]],
        ]
    }

    /// Computes the principal values and eigenprojectors
    ///
    /// Returns `(l, pp)` where `l[0] ≥ l[1] ≥ l[2]` are the principal values
    /// and `pp[k]` is the Mandel representation of the eigenprojector
    /// `v_k ⊗ v_k`.
    pub fn principal_values_and_projectors(&self) -> ([f64; 3], [Tensor2; 3]) {
        let (l, v) = eigen_sym_3x3(&self.as_matrix());
        let mut order = [0, 1, 2];
        order.sort_by(|&a, &b| l[b].partial_cmp(&l[a]).unwrap());
        let mut values = [0.0; 3];
        let mut projectors = [Tensor2::new(), Tensor2::new(), Tensor2::new()];
        for (rank, &k) in order.iter().enumerate() {
            values[rank] = l[k];
            let p = &mut projectors[rank];
            p.vec[0] = v[0][k] * v[0][k];
            p.vec[1] = v[1][k] * v[1][k];
            p.vec[2] = v[2][k] * v[2][k];
            p.vec[3] = v[0][k] * v[1][k] * SQRT_2;
            p.vec[4] = v[1][k] * v[2][k] * SQRT_2;
            p.vec[5] = v[0][k] * v[2][k] * SQRT_2;
        }
        (values, projectors)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
