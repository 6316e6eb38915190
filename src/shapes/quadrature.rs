use super::GeoKind;

/// Integration point data: `[ξ0, ξ1, ξ2, weight]` per point
pub type IntegPointData = &'static [[f64; 4]];

/// ±1/√3 (2-point Gauss-Legendre abscissa)
const GP: f64 = 0.577_350_269_189_625_7;

/// √(3/5) (3-point Gauss-Legendre abscissa)
const GQ: f64 = 0.774_596_669_241_483_4;

/// 3-point Gauss-Legendre weights
const W3: [f64; 3] = [5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0];

const IP_LIN_2: [[f64; 4]; 2] = [[-GP, 0.0, 0.0, 1.0], [GP, 0.0, 0.0, 1.0]];

const IP_TRI_3: [[f64; 4]; 3] = [
    [1.0 / 6.0, 1.0 / 6.0, 0.0, 1.0 / 6.0],
    [2.0 / 3.0, 1.0 / 6.0, 0.0, 1.0 / 6.0],
    [1.0 / 6.0, 2.0 / 3.0, 0.0, 1.0 / 6.0],
];

const IP_QUA_4: [[f64; 4]; 4] = [
    [-GP, -GP, 0.0, 1.0],
    [GP, -GP, 0.0, 1.0],
    [-GP, GP, 0.0, 1.0],
    [GP, GP, 0.0, 1.0],
];

const IP_QUA_9: [[f64; 4]; 9] = [
    [-GQ, -GQ, 0.0, W3[0] * W3[0]],
    [0.0, -GQ, 0.0, W3[1] * W3[0]],
    [GQ, -GQ, 0.0, W3[2] * W3[0]],
    [-GQ, 0.0, 0.0, W3[0] * W3[1]],
    [0.0, 0.0, 0.0, W3[1] * W3[1]],
    [GQ, 0.0, 0.0, W3[2] * W3[1]],
    [-GQ, GQ, 0.0, W3[0] * W3[2]],
    [0.0, GQ, 0.0, W3[1] * W3[2]],
    [GQ, GQ, 0.0, W3[2] * W3[2]],
];

/// (5 + 3√5)/20 and (5 - √5)/20
const TET_A: f64 = 0.585_410_196_624_968_5;
const TET_B: f64 = 0.138_196_601_125_010_5;

const IP_TET_4: [[f64; 4]; 4] = [
    [TET_B, TET_B, TET_B, 1.0 / 24.0],
    [TET_A, TET_B, TET_B, 1.0 / 24.0],
    [TET_B, TET_A, TET_B, 1.0 / 24.0],
    [TET_B, TET_B, TET_A, 1.0 / 24.0],
];

const IP_HEX_8: [[f64; 4]; 8] = [
    [-GP, -GP, -GP, 1.0],
    [GP, -GP, -GP, 1.0],
    [-GP, GP, -GP, 1.0],
    [GP, GP, -GP, 1.0],
    [-GP, -GP, GP, 1.0],
    [GP, -GP, GP, 1.0],
    [-GP, GP, GP, 1.0],
    [GP, GP, GP, 1.0],
];

/// Returns the default integration rule for a geometry kind
pub fn integration_rule(kind: GeoKind) -> IntegPointData {
    match kind {
        GeoKind::Lin2 => &IP_LIN_2,
        GeoKind::Tri3 => &IP_TRI_3,
        GeoKind::Tri6 => &IP_TRI_3,
        GeoKind::Qua4 => &IP_QUA_4,
        GeoKind::Qua8 => &IP_QUA_9,
        GeoKind::Tet4 => &IP_TET_4,
        GeoKind::Hex8 => &IP_HEX_8,
    }
}

/// Returns an integration rule with a requested number of points, if available
pub fn integration_rule_sized(kind: GeoKind, nip: usize) -> Option<IntegPointData> {
    match (kind, nip) {
        (GeoKind::Lin2, 2) => Some(&IP_LIN_2),
        (GeoKind::Tri3, 3) | (GeoKind::Tri6, 3) => Some(&IP_TRI_3),
        (GeoKind::Qua4, 4) | (GeoKind::Qua8, 4) => Some(&IP_QUA_4),
        (GeoKind::Qua4, 9) | (GeoKind::Qua8, 9) => Some(&IP_QUA_9),
        (GeoKind::Tet4, 4) => Some(&IP_TET_4),
        (GeoKind::Hex8, 8) => Some(&IP_HEX_8),
        _ => None,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
