use super::{shape_derivatives, shape_functions, GeoKind};
use crate::base::{Error, Result, INVERSE_MAP_NMAX, INVERSE_MAP_TOL};
use russell_lab::{Matrix, Vector};

/// Holds the scratchpad of geometry computations for one element
///
/// The pad owns the (transposed) real coordinates of the element nodes and
/// the workspaces for interpolation functions, local derivatives, Jacobian,
/// and Cartesian gradients.
#[derive(Clone, Debug)]
pub struct Pad {
    /// Geometry kind
    pub kind: GeoKind,

    /// Space dimension (2 or 3; may exceed the reference dimension for Lin kinds)
    pub ndim: usize,

    /// Transposed real coordinates of the nodes `(ndim, nnode)`
    pub xxt: Matrix,

    /// Interpolation functions N `(nnode)`
    pub interp: Vector,

    /// Local derivatives dN/dξ `(nnode, geo_ndim)`
    pub deriv: Matrix,

    /// Cartesian gradients dN/dx `(nnode, ndim)`; valid after [`Pad::calc_gradient`]
    pub gradient: Matrix,

    /// Jacobian matrix `(ndim, geo_ndim)`
    pub jacobian: Matrix,

    /// Inverse Jacobian `(ndim, ndim)`; valid after [`Pad::calc_gradient`]
    inv_jacobian: Matrix,
}

impl Pad {
    /// Allocates a new instance
    pub fn new(ndim: usize, kind: GeoKind) -> Result<Self> {
        if ndim < 2 || ndim > 3 {
            return Err(Error::validation("ndim must be 2 or 3"));
        }
        if kind.geo_ndim() > ndim {
            return Err(Error::validation("geometry dimension must not exceed the space dimension"));
        }
        let nnode = kind.nnode();
        let gdim = kind.geo_ndim();
        Ok(Pad {
            kind,
            ndim,
            xxt: Matrix::new(ndim, nnode),
            interp: Vector::new(nnode),
            deriv: Matrix::new(nnode, gdim),
            gradient: Matrix::new(nnode, ndim),
            jacobian: Matrix::new(ndim, gdim),
            inv_jacobian: Matrix::new(ndim, ndim),
        })
    }

    /// Sets the j-th component of the m-th node coordinate
    pub fn set_xx(&mut self, m: usize, j: usize, value: f64) {
        self.xxt.set(j, m, value);
    }

    /// Computes the interpolation functions at a reference coordinate
    pub fn calc_interp(&mut self, ksi: &[f64]) {
        shape_functions(self.kind, &mut self.interp, ksi);
    }

    /// Computes the real coordinates of a reference coordinate
    pub fn calc_coords(&mut self, x: &mut Vector, ksi: &[f64]) {
        self.calc_interp(ksi);
        let nnode = self.kind.nnode();
        for i in 0..self.ndim {
            x[i] = 0.0;
            for m in 0..nnode {
                x[i] += self.interp[m] * self.xxt.get(i, m);
            }
        }
    }

    /// Computes the Jacobian matrix at a reference coordinate
    ///
    /// Returns the determinant of the Jacobian (for solid kinds) or the norm
    /// of the Jacobian vector (for Lin kinds; half the current length of a
    /// straight Lin2).
    pub fn calc_jacobian(&mut self, ksi: &[f64]) -> Result<f64> {
        shape_derivatives(self.kind, &mut self.deriv, ksi);
        let nnode = self.kind.nnode();
        let gdim = self.kind.geo_ndim();
        for i in 0..self.ndim {
            for j in 0..gdim {
                let mut sum = 0.0;
                for m in 0..nnode {
                    sum += self.xxt.get(i, m) * self.deriv.get(m, j);
                }
                self.jacobian.set(i, j, sum);
            }
        }
        if gdim == 1 {
            let mut norm = 0.0;
            for i in 0..self.ndim {
                norm += self.jacobian.get(i, 0) * self.jacobian.get(i, 0);
            }
            return Ok(f64::sqrt(norm));
        }
        if gdim != self.ndim {
            return Err(Error::validation("determinant requires geo_ndim equal to ndim"));
        }
        let det = if self.ndim == 2 {
            self.jacobian.get(0, 0) * self.jacobian.get(1, 1) - self.jacobian.get(0, 1) * self.jacobian.get(1, 0)
        } else {
            let j = &self.jacobian;
            j.get(0, 0) * (j.get(1, 1) * j.get(2, 2) - j.get(1, 2) * j.get(2, 1))
                - j.get(0, 1) * (j.get(1, 0) * j.get(2, 2) - j.get(1, 2) * j.get(2, 0))
                + j.get(0, 2) * (j.get(1, 0) * j.get(2, 1) - j.get(1, 1) * j.get(2, 0))
        };
        Ok(det)
    }

    /// Computes the Cartesian gradients dN/dx at a reference coordinate
    ///
    /// Returns the determinant of the Jacobian. Fails for non-positive
    /// determinants (distorted or inverted geometry).
    pub fn calc_gradient(&mut self, ksi: &[f64]) -> Result<f64> {
        let det = self.calc_jacobian(ksi)?;
        if self.kind.geo_ndim() != self.ndim {
            return Err(Error::validation("gradient requires geo_ndim equal to ndim"));
        }
        if det <= 0.0 {
            return Err(Error::validation("Jacobian determinant must be positive"));
        }
        let j = &self.jacobian;
        if self.ndim == 2 {
            self.inv_jacobian.set(0, 0, j.get(1, 1) / det);
            self.inv_jacobian.set(0, 1, -j.get(0, 1) / det);
            self.inv_jacobian.set(1, 0, -j.get(1, 0) / det);
            self.inv_jacobian.set(1, 1, j.get(0, 0) / det);
        } else {
            self.inv_jacobian
                .set(0, 0, (j.get(1, 1) * j.get(2, 2) - j.get(1, 2) * j.get(2, 1)) / det);
            self.inv_jacobian
                .set(0, 1, (j.get(0, 2) * j.get(2, 1) - j.get(0, 1) * j.get(2, 2)) / det);
            self.inv_jacobian
                .set(0, 2, (j.get(0, 1) * j.get(1, 2) - j.get(0, 2) * j.get(1, 1)) / det);
            self.inv_jacobian
                .set(1, 0, (j.get(1, 2) * j.get(2, 0) - j.get(1, 0) * j.get(2, 2)) / det);
            self.inv_jacobian
                .set(1, 1, (j.get(0, 0) * j.get(2, 2) - j.get(0, 2) * j.get(2, 0)) / det);
            self.inv_jacobian
                .set(1, 2, (j.get(0, 2) * j.get(1, 0) - j.get(0, 0) * j.get(1, 2)) / det);
            self.inv_jacobian
                .set(2, 0, (j.get(1, 0) * j.get(2, 1) - j.get(1, 1) * j.get(2, 0)) / det);
            self.inv_jacobian
                .set(2, 1, (j.get(0, 1) * j.get(2, 0) - j.get(0, 0) * j.get(2, 1)) / det);
            self.inv_jacobian
                .set(2, 2, (j.get(0, 0) * j.get(1, 1) - j.get(0, 1) * j.get(1, 0)) / det);
        }
        let nnode = self.kind.nnode();
        for m in 0..nnode {
            for j in 0..self.ndim {
                let mut sum = 0.0;
                for k in 0..self.ndim {
                    sum += self.deriv.get(m, k) * self.inv_jacobian.get(k, j);
                }
                self.gradient.set(m, j, sum);
            }
        }
        Ok(det)
    }

    /// Computes the unit tangent vector of a Lin kind at a reference coordinate
    ///
    /// Returns the norm of the Jacobian vector (line scale factor).
    pub fn calc_tangent(&mut self, tangent: &mut Vector, ksi: &[f64]) -> Result<f64> {
        if !self.kind.is_lin() {
            return Err(Error::validation("tangent requires a Lin geometry kind"));
        }
        let scale = self.calc_jacobian(ksi)?;
        if scale <= 0.0 {
            return Err(Error::validation("line Jacobian norm must be positive"));
        }
        for i in 0..self.ndim {
            tangent[i] = self.jacobian.get(i, 0) / scale;
        }
        Ok(scale)
    }

    /// Finds the reference coordinate corresponding to a real coordinate
    ///
    /// Runs the iterative inverse-mapping Newton solve; fails with a
    /// Convergence error when the iterations do not reduce the coordinate
    /// residual below the tolerance.
    pub fn approximate_ksi(&mut self, ksi: &mut [f64], x: &[f64]) -> Result<usize> {
        if self.kind.geo_ndim() != self.ndim {
            return Err(Error::validation("inverse mapping requires geo_ndim equal to ndim"));
        }
        let centroid = self.kind.centroid();
        for j in 0..self.ndim {
            ksi[j] = centroid[j];
        }
        let mut xc = Vector::new(self.ndim);
        for it in 0..INVERSE_MAP_NMAX {
            self.calc_coords(&mut xc, ksi);
            let mut norm = 0.0;
            for i in 0..self.ndim {
                xc[i] = x[i] - xc[i];
                norm += xc[i] * xc[i];
            }
            if f64::sqrt(norm) <= INVERSE_MAP_TOL {
                return Ok(it);
            }
            self.calc_gradient(ksi)?;
            for j in 0..self.ndim {
                let mut delta = 0.0;
                for i in 0..self.ndim {
                    delta += self.inv_jacobian.get(j, i) * xc[i];
                }
                ksi[j] += delta;
            }
        }
        self.calc_coords(&mut xc, ksi);
        let mut norm = 0.0;
        for i in 0..self.ndim {
            norm += (x[i] - xc[i]) * (x[i] - xc[i]);
        }
        Err(Error::convergence(
            INVERSE_MAP_NMAX,
            f64::sqrt(norm),
            "inverse mapping Newton solve did not converge",
        ))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Pad;
    use crate::shapes::GeoKind;
    use russell_lab::{approx_eq, Vector};

    /// Returns a pad with a 2x1 rectangle discretized by one Qua4
    fn rectangle_qua4() -> Pad {
        let mut pad = Pad::new(2, GeoKind::Qua4).unwrap();
        let coords = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        for m in 0..4 {
            pad.set_xx(m, 0, coords[m][0]);
            pad.set_xx(m, 1, coords[m][1]);
        }
        pad
    }

    #[test]
    fn new_captures_errors() {
        assert!(Pad::new(1, GeoKind::Lin2).is_err());
        assert!(Pad::new(2, GeoKind::Hex8).is_err());
        assert!(Pad::new(2, GeoKind::Tet4).is_err());
        assert!(Pad::new(3, GeoKind::Hex8).is_ok());
        assert!(Pad::new(3, GeoKind::Lin2).is_ok());
    }

    #[test]
    fn jacobian_of_rectangle_is_constant() {
        let mut pad = rectangle_qua4();
        let det = pad.calc_gradient(&[0.0, 0.0]).unwrap();
        // J = diag(a/2, b/2) for an a x b rectangle
        approx_eq(det, 0.5, 1e-15);
        let det = pad.calc_gradient(&[0.3, -0.7]).unwrap();
        approx_eq(det, 0.5, 1e-15);
    }

    #[test]
    fn gradient_recovers_linear_field() {
        // u = 2x + 3y  =>  du/dx = 2, du/dy = 3
        let mut pad = rectangle_qua4();
        let coords = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        let u: Vec<f64> = coords.iter().map(|c| 2.0 * c[0] + 3.0 * c[1]).collect();
        pad.calc_gradient(&[0.2, 0.4]).unwrap();
        let mut dudx = [0.0, 0.0];
        for m in 0..4 {
            dudx[0] += pad.gradient.get(m, 0) * u[m];
            dudx[1] += pad.gradient.get(m, 1) * u[m];
        }
        approx_eq(dudx[0], 2.0, 1e-14);
        approx_eq(dudx[1], 3.0, 1e-14);
    }

    #[test]
    fn calc_coords_works() {
        let mut pad = rectangle_qua4();
        let mut x = Vector::new(2);
        pad.calc_coords(&mut x, &[0.0, 0.0]);
        approx_eq(x[0], 1.0, 1e-15);
        approx_eq(x[1], 0.5, 1e-15);
        pad.calc_coords(&mut x, &[1.0, 1.0]);
        approx_eq(x[0], 2.0, 1e-15);
        approx_eq(x[1], 1.0, 1e-15);
    }

    #[test]
    fn approximate_ksi_inverts_the_mapping() {
        let mut pad = rectangle_qua4();
        let mut ksi = [0.0, 0.0];
        pad.approximate_ksi(&mut ksi, &[0.5, 0.25]).unwrap();
        approx_eq(ksi[0], -0.5, 1e-10);
        approx_eq(ksi[1], -0.5, 1e-10);

        // distorted quadrilateral
        let mut pad = Pad::new(2, GeoKind::Qua4).unwrap();
        let coords = [[0.0, 0.0], [3.0, 0.5], [2.5, 2.0], [-0.5, 1.5]];
        for m in 0..4 {
            pad.set_xx(m, 0, coords[m][0]);
            pad.set_xx(m, 1, coords[m][1]);
        }
        let mut x = Vector::new(2);
        let ksi_ref = [0.35, -0.6];
        pad.calc_coords(&mut x, &ksi_ref);
        let mut ksi = [0.0, 0.0];
        pad.approximate_ksi(&mut ksi, &[x[0], x[1]]).unwrap();
        approx_eq(ksi[0], ksi_ref[0], 1e-9);
        approx_eq(ksi[1], ksi_ref[1], 1e-9);
    }

    #[test]
    fn calc_tangent_works() {
        let mut pad = Pad::new(2, GeoKind::Lin2).unwrap();
        pad.set_xx(0, 0, 1.0);
        pad.set_xx(0, 1, 1.0);
        pad.set_xx(1, 0, 4.0);
        pad.set_xx(1, 1, 5.0);
        let mut tangent = Vector::new(2);
        let scale = pad.calc_tangent(&mut tangent, &[0.0]).unwrap();
        // length 5, scale = L/2, tangent = (3/5, 4/5)
        approx_eq(scale, 2.5, 1e-15);
        approx_eq(tangent[0], 0.6, 1e-15);
        approx_eq(tangent[1], 0.8, 1e-15);
    }
}
