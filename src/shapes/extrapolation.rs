use super::{integration_rule, shape_functions, GeoKind};
use crate::base::{Error, Result};
use russell_lab::{mat_inverse, Matrix, Vector};

/// Computes the matrix extrapolating integration-point values to nodal values
///
/// The returned matrix `E` is `(nnode, nip)` such that `v_node = E · v_ip`.
/// When the number of integration points differs from the number of nodes,
/// the extrapolation is the least-squares (or minimum-norm) pseudo-inverse of
/// the interpolation matrix evaluated at the integration points.
pub fn extrapolation_matrix(kind: GeoKind) -> Result<Matrix> {
    let ips = integration_rule(kind);
    let nip = ips.len();
    let nnode = kind.nnode();

    // interpolation matrix at the integration points: (nip, nnode)
    let mut nn = Matrix::new(nip, nnode);
    let mut interp = Vector::new(nnode);
    for p in 0..nip {
        shape_functions(kind, &mut interp, &ips[p][0..3]);
        for m in 0..nnode {
            nn.set(p, m, interp[m]);
        }
    }

    let mut ee = Matrix::new(nnode, nip);
    if nip >= nnode {
        // least squares: E = (NᵀN)⁻¹ Nᵀ
        let mut ntn = Matrix::new(nnode, nnode);
        for i in 0..nnode {
            for j in 0..nnode {
                let mut sum = 0.0;
                for p in 0..nip {
                    sum += nn.get(p, i) * nn.get(p, j);
                }
                ntn.set(i, j, sum);
            }
        }
        let mut inv = Matrix::new(nnode, nnode);
        mat_inverse(&mut inv, &ntn).map_err(|_| Error::validation("cannot invert extrapolation normal matrix"))?;
        for i in 0..nnode {
            for p in 0..nip {
                let mut sum = 0.0;
                for k in 0..nnode {
                    sum += inv.get(i, k) * nn.get(p, k);
                }
                ee.set(i, p, sum);
            }
        }
    } else {
        // fewer points than nodes: extrapolate with the corner (lower-order)
        // interpolation and average the midside nodes from their corners
        if kind != GeoKind::Tri6 {
            return Err(Error::validation("extrapolation is not available for this geometry kind"));
        }
        let mut n3 = Matrix::new(nip, 3);
        let mut interp3 = Vector::new(3);
        for p in 0..nip {
            shape_functions(GeoKind::Tri3, &mut interp3, &ips[p][0..3]);
            for m in 0..3 {
                n3.set(p, m, interp3[m]);
            }
        }
        let mut inv = Matrix::new(3, 3);
        mat_inverse(&mut inv, &n3).map_err(|_| Error::validation("cannot invert extrapolation normal matrix"))?;
        for m in 0..3 {
            for p in 0..nip {
                ee.set(m, p, inv.get(m, p));
            }
        }
        // midside order: 3 between (0,1), 4 between (1,2), 5 between (2,0)
        let midsides = [(3, 0, 1), (4, 1, 2), (5, 2, 0)];
        for (m, a, b) in midsides {
            for p in 0..nip {
                ee.set(m, p, 0.5 * (ee.get(a, p) + ee.get(b, p)));
            }
        }
    }
    Ok(ee)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::extrapolation_matrix;
    use crate::shapes::{integration_rule, GeoKind};
    use russell_lab::approx_eq;

    #[test]
    fn constant_fields_are_preserved() {
        // extrapolating a constant integration-point field must give the same
        // constant at every node (rows of E sum to one)
        for kind in [
            GeoKind::Lin2,
            GeoKind::Tri3,
            GeoKind::Tri6,
            GeoKind::Qua4,
            GeoKind::Qua8,
            GeoKind::Tet4,
            GeoKind::Hex8,
        ] {
            let ee = extrapolation_matrix(kind).unwrap();
            let (nnode, nip) = ee.dims();
            assert_eq!(nnode, kind.nnode());
            assert_eq!(nip, integration_rule(kind).len());
            for m in 0..nnode {
                let sum: f64 = (0..nip).map(|p| ee.get(m, p)).sum();
                approx_eq(sum, 1.0, 1e-12);
            }
        }
    }

    #[test]
    fn linear_fields_are_recovered_for_qua4() {
        // v(ξ,η) = 1 + 2ξ + 3η sampled at the 2x2 Gauss points extrapolates
        // exactly to the corner values
        let ee = extrapolation_matrix(GeoKind::Qua4).unwrap();
        let ips = integration_rule(GeoKind::Qua4);
        let field = |r: f64, s: f64| 1.0 + 2.0 * r + 3.0 * s;
        let v_ip: Vec<f64> = ips.iter().map(|p| field(p[0], p[1])).collect();
        let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
        for m in 0..4 {
            let mut v = 0.0;
            for p in 0..4 {
                v += ee.get(m, p) * v_ip[p];
            }
            approx_eq(v, field(corners[m][0], corners[m][1]), 1e-13);
        }
    }
}
