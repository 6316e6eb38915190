use russell_lab::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Defines the geometry class (family of reference shapes)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum GeoClass {
    /// Line segments
    Lin,

    /// Triangles
    Tri,

    /// Quadrilaterals
    Qua,

    /// Tetrahedra
    Tet,

    /// Hexahedra
    Hex,
}

/// Defines the geometry kind (reference shape with a fixed number of nodes)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum GeoKind {
    /// Line with 2 nodes
    Lin2,

    /// Triangle with 3 nodes (linear)
    Tri3,

    /// Triangle with 6 nodes (quadratic)
    Tri6,

    /// Quadrilateral with 4 nodes (bilinear)
    Qua4,

    /// Quadrilateral with 8 nodes (serendipity)
    Qua8,

    /// Tetrahedron with 4 nodes (linear)
    Tet4,

    /// Hexahedron with 8 nodes (trilinear)
    Hex8,
}

impl GeoKind {
    /// Returns the number of nodes
    pub fn nnode(&self) -> usize {
        match self {
            GeoKind::Lin2 => 2,
            GeoKind::Tri3 => 3,
            GeoKind::Tri6 => 6,
            GeoKind::Qua4 => 4,
            GeoKind::Qua8 => 8,
            GeoKind::Tet4 => 4,
            GeoKind::Hex8 => 8,
        }
    }

    /// Returns the dimension of the reference geometry
    pub fn geo_ndim(&self) -> usize {
        match self {
            GeoKind::Lin2 => 1,
            GeoKind::Tri3 | GeoKind::Tri6 | GeoKind::Qua4 | GeoKind::Qua8 => 2,
            GeoKind::Tet4 | GeoKind::Hex8 => 3,
        }
    }

    /// Returns the geometry class
    pub fn class(&self) -> GeoClass {
        match self {
            GeoKind::Lin2 => GeoClass::Lin,
            GeoKind::Tri3 | GeoKind::Tri6 => GeoClass::Tri,
            GeoKind::Qua4 | GeoKind::Qua8 => GeoClass::Qua,
            GeoKind::Tet4 => GeoClass::Tet,
            GeoKind::Hex8 => GeoClass::Hex,
        }
    }

    /// Tells whether this kind belongs to the Lin class
    pub fn is_lin(&self) -> bool {
        self.class() == GeoClass::Lin
    }

    /// Returns the reference coordinates of the centroid
    pub fn centroid(&self) -> [f64; 3] {
        match self.class() {
            GeoClass::Lin => [0.0, 0.0, 0.0],
            GeoClass::Tri => [1.0 / 3.0, 1.0 / 3.0, 0.0],
            GeoClass::Qua => [0.0, 0.0, 0.0],
            GeoClass::Tet => [0.25, 0.25, 0.25],
            GeoClass::Hex => [0.0, 0.0, 0.0],
        }
    }
}

/// Reference coordinates of Qua4/Qua8 nodes (corners first, then midsides)
const QUA_REF: [[f64; 2]; 8] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [0.0, -1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [-1.0, 0.0],
];

/// Reference coordinates of Hex8 nodes
const HEX_REF: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Evaluates the interpolation functions N at a reference coordinate
///
/// The output vector `nn` must have length equal to `kind.nnode()`.
pub fn shape_functions(kind: GeoKind, nn: &mut Vector, ksi: &[f64]) {
    match kind {
        GeoKind::Lin2 => {
            let r = ksi[0];
            nn[0] = 0.5 * (1.0 - r);
            nn[1] = 0.5 * (1.0 + r);
        }
        GeoKind::Tri3 => {
            let (r, s) = (ksi[0], ksi[1]);
            nn[0] = 1.0 - r - s;
            nn[1] = r;
            nn[2] = s;
        }
        GeoKind::Tri6 => {
            let (r, s) = (ksi[0], ksi[1]);
            let t = 1.0 - r - s;
            nn[0] = t * (2.0 * t - 1.0);
            nn[1] = r * (2.0 * r - 1.0);
            nn[2] = s * (2.0 * s - 1.0);
            nn[3] = 4.0 * r * t;
            nn[4] = 4.0 * r * s;
            nn[5] = 4.0 * s * t;
        }
        GeoKind::Qua4 => {
            let (r, s) = (ksi[0], ksi[1]);
            for m in 0..4 {
                nn[m] = 0.25 * (1.0 + r * QUA_REF[m][0]) * (1.0 + s * QUA_REF[m][1]);
            }
        }
        GeoKind::Qua8 => {
            let (r, s) = (ksi[0], ksi[1]);
            for m in 0..4 {
                let (rm, sm) = (QUA_REF[m][0], QUA_REF[m][1]);
                nn[m] = 0.25 * (1.0 + r * rm) * (1.0 + s * sm) * (r * rm + s * sm - 1.0);
            }
            for m in 4..8 {
                let (rm, sm) = (QUA_REF[m][0], QUA_REF[m][1]);
                if rm == 0.0 {
                    nn[m] = 0.5 * (1.0 - r * r) * (1.0 + s * sm);
                } else {
                    nn[m] = 0.5 * (1.0 + r * rm) * (1.0 - s * s);
                }
            }
        }
        GeoKind::Tet4 => {
            let (r, s, t) = (ksi[0], ksi[1], ksi[2]);
            nn[0] = 1.0 - r - s - t;
            nn[1] = r;
            nn[2] = s;
            nn[3] = t;
        }
        GeoKind::Hex8 => {
            let (r, s, t) = (ksi[0], ksi[1], ksi[2]);
            for m in 0..8 {
                nn[m] = 0.125
                    * (1.0 + r * HEX_REF[m][0])
                    * (1.0 + s * HEX_REF[m][1])
                    * (1.0 + t * HEX_REF[m][2]);
            }
        }
    }
}

/// Evaluates the derivatives dN/dξ at a reference coordinate
///
/// The output matrix `deriv` must be `(nnode, geo_ndim)`.
pub fn shape_derivatives(kind: GeoKind, deriv: &mut Matrix, ksi: &[f64]) {
    match kind {
        GeoKind::Lin2 => {
            deriv.set(0, 0, -0.5);
            deriv.set(1, 0, 0.5);
        }
        GeoKind::Tri3 => {
            deriv.set(0, 0, -1.0);
            deriv.set(0, 1, -1.0);
            deriv.set(1, 0, 1.0);
            deriv.set(1, 1, 0.0);
            deriv.set(2, 0, 0.0);
            deriv.set(2, 1, 1.0);
        }
        GeoKind::Tri6 => {
            let (r, s) = (ksi[0], ksi[1]);
            let t = 1.0 - r - s;
            deriv.set(0, 0, 1.0 - 4.0 * t);
            deriv.set(0, 1, 1.0 - 4.0 * t);
            deriv.set(1, 0, 4.0 * r - 1.0);
            deriv.set(1, 1, 0.0);
            deriv.set(2, 0, 0.0);
            deriv.set(2, 1, 4.0 * s - 1.0);
            deriv.set(3, 0, 4.0 * (t - r));
            deriv.set(3, 1, -4.0 * r);
            deriv.set(4, 0, 4.0 * s);
            deriv.set(4, 1, 4.0 * r);
            deriv.set(5, 0, -4.0 * s);
            deriv.set(5, 1, 4.0 * (t - s));
        }
        GeoKind::Qua4 => {
            let (r, s) = (ksi[0], ksi[1]);
            for m in 0..4 {
                let (rm, sm) = (QUA_REF[m][0], QUA_REF[m][1]);
                deriv.set(m, 0, 0.25 * rm * (1.0 + s * sm));
                deriv.set(m, 1, 0.25 * sm * (1.0 + r * rm));
            }
        }
        GeoKind::Qua8 => {
            let (r, s) = (ksi[0], ksi[1]);
            for m in 0..4 {
                let (rm, sm) = (QUA_REF[m][0], QUA_REF[m][1]);
                deriv.set(m, 0, 0.25 * rm * (1.0 + s * sm) * (2.0 * r * rm + s * sm));
                deriv.set(m, 1, 0.25 * sm * (1.0 + r * rm) * (r * rm + 2.0 * s * sm));
            }
            for m in 4..8 {
                let (rm, sm) = (QUA_REF[m][0], QUA_REF[m][1]);
                if rm == 0.0 {
                    deriv.set(m, 0, -r * (1.0 + s * sm));
                    deriv.set(m, 1, 0.5 * sm * (1.0 - r * r));
                } else {
                    deriv.set(m, 0, 0.5 * rm * (1.0 - s * s));
                    deriv.set(m, 1, -s * (1.0 + r * rm));
                }
            }
        }
        GeoKind::Tet4 => {
            for j in 0..3 {
                deriv.set(0, j, -1.0);
            }
            deriv.set(1, 0, 1.0);
            deriv.set(1, 1, 0.0);
            deriv.set(1, 2, 0.0);
            deriv.set(2, 0, 0.0);
            deriv.set(2, 1, 1.0);
            deriv.set(2, 2, 0.0);
            deriv.set(3, 0, 0.0);
            deriv.set(3, 1, 0.0);
            deriv.set(3, 2, 1.0);
        }
        GeoKind::Hex8 => {
            let (r, s, t) = (ksi[0], ksi[1], ksi[2]);
            for m in 0..8 {
                let (rm, sm, tm) = (HEX_REF[m][0], HEX_REF[m][1], HEX_REF[m][2]);
                deriv.set(m, 0, 0.125 * rm * (1.0 + s * sm) * (1.0 + t * tm));
                deriv.set(m, 1, 0.125 * sm * (1.0 + r * rm) * (1.0 + t * tm));
                deriv.set(m, 2, 0.125 * tm * (1.0 + r * rm) * (1.0 + s * sm));
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{shape_derivatives, shape_functions, GeoClass, GeoKind};
    use russell_lab::{approx_eq, Matrix, Vector};

    const KINDS: [GeoKind; 7] = [
        GeoKind::Lin2,
        GeoKind::Tri3,
        GeoKind::Tri6,
        GeoKind::Qua4,
        GeoKind::Qua8,
        GeoKind::Tet4,
        GeoKind::Hex8,
    ];

    #[test]
    fn partition_of_unity_holds() {
        for kind in KINDS {
            let nnode = kind.nnode();
            let mut nn = Vector::new(nnode);
            let ksi = match kind.class() {
                GeoClass::Lin => vec![0.37],
                GeoClass::Tri => vec![0.21, 0.43],
                GeoClass::Qua => vec![0.37, -0.51],
                GeoClass::Tet => vec![0.1, 0.2, 0.3],
                GeoClass::Hex => vec![0.37, -0.51, 0.12],
            };
            shape_functions(kind, &mut nn, &ksi);
            let sum: f64 = (0..nnode).map(|m| nn[m]).sum();
            approx_eq(sum, 1.0, 1e-14);
        }
    }

    #[test]
    fn derivatives_sum_to_zero() {
        // the gradient of the partition of unity is zero
        for kind in KINDS {
            let (nnode, gdim) = (kind.nnode(), kind.geo_ndim());
            let mut deriv = Matrix::new(nnode, gdim);
            let ksi = match kind.class() {
                GeoClass::Lin => vec![-0.25],
                GeoClass::Tri => vec![0.11, 0.33],
                GeoClass::Qua => vec![0.6, 0.45],
                GeoClass::Tet => vec![0.25, 0.3, 0.15],
                GeoClass::Hex => vec![0.6, 0.45, -0.2],
            };
            shape_derivatives(kind, &mut deriv, &ksi);
            for j in 0..gdim {
                let sum: f64 = (0..nnode).map(|m| deriv.get(m, j)).sum();
                approx_eq(sum, 0.0, 1e-14);
            }
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for kind in KINDS {
            let (nnode, gdim) = (kind.nnode(), kind.geo_ndim());
            let mut deriv = Matrix::new(nnode, gdim);
            let ksi0 = match kind.class() {
                GeoClass::Lin => vec![0.2],
                GeoClass::Tri => vec![0.2, 0.3],
                GeoClass::Qua => vec![0.2, -0.3],
                GeoClass::Tet => vec![0.2, 0.25, 0.3],
                GeoClass::Hex => vec![0.2, -0.3, 0.4],
            };
            shape_derivatives(kind, &mut deriv, &ksi0);
            let mut na = Vector::new(nnode);
            let mut nb = Vector::new(nnode);
            for j in 0..gdim {
                let mut ka = ksi0.clone();
                let mut kb = ksi0.clone();
                ka[j] -= h;
                kb[j] += h;
                shape_functions(kind, &mut na, &ka);
                shape_functions(kind, &mut nb, &kb);
                for m in 0..nnode {
                    let numerical = (nb[m] - na[m]) / (2.0 * h);
                    approx_eq(deriv.get(m, j), numerical, 1e-8);
                }
            }
        }
    }

    #[test]
    fn kronecker_property_holds_for_qua8() {
        // N_m(ξ_n) = δ_mn at the corner and midside nodes
        let nodes: [[f64; 2]; 8] = [
            [-1.0, -1.0],
            [1.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
            [0.0, -1.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [-1.0, 0.0],
        ];
        let mut nn = Vector::new(8);
        for n in 0..8 {
            shape_functions(GeoKind::Qua8, &mut nn, &nodes[n]);
            for m in 0..8 {
                let correct = if m == n { 1.0 } else { 0.0 };
                approx_eq(nn[m], correct, 1e-14);
            }
        }
    }

    #[test]
    fn getters_work() {
        assert_eq!(GeoKind::Lin2.nnode(), 2);
        assert_eq!(GeoKind::Tri6.nnode(), 6);
        assert_eq!(GeoKind::Hex8.geo_ndim(), 3);
        assert_eq!(GeoKind::Qua8.class(), GeoClass::Qua);
        assert!(GeoKind::Lin2.is_lin());
        assert!(!GeoKind::Tet4.is_lin());
        assert_eq!(GeoKind::Tet4.centroid(), [0.25, 0.25, 0.25]);
    }
}
