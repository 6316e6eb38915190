use russell_lab::Matrix;
use serde::{Deserialize, Serialize};

/// Holds a minor-symmetric fourth-order tensor as a 6x6 matrix (Mandel basis)
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tensor4 {
    /// Mandel components
    pub mat: Matrix,
}

impl Tensor4 {
    /// Allocates a zero tensor
    pub fn new() -> Self {
        Tensor4 { mat: Matrix::new(6, 6) }
    }

    /// Sets this tensor to α times another tensor
    pub fn set_tensor(&mut self, alpha: f64, other: &Tensor4) {
        for i in 0..6 {
            for j in 0..6 {
                self.mat.set(i, j, alpha * other.mat.get(i, j));
            }
        }
    }

    /// Fills this tensor with zeros
    pub fn clear(&mut self) {
        self.mat.fill(0.0);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
