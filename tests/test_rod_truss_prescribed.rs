use equisim::base::{Control, Dof, Elem, Idealization, ParamRod, Scheme};
use equisim::fem::{nodal_and_element_values, Elements, Essential, FemBase, FemState, Natural, Solver, Stage};
use equisim::mesh::{Cell, Mesh, Node};
use equisim::shapes::GeoKind;
use russell_lab::approx_eq;

/// Two collinear bars, fixed at one end, unit tip displacement prescribed:
/// the axial stress must equal E Δu / L.
#[test]
fn truss_with_prescribed_tip_displacement() {
    // 0-----1-----2  (total length = 1)
    let mesh = Mesh {
        ndim: 2,
        nodes: vec![
            Node {
                id: 0,
                marker: 0,
                coords: vec![0.0, 0.0],
            },
            Node {
                id: 1,
                marker: 0,
                coords: vec![0.5, 0.0],
            },
            Node {
                id: 2,
                marker: 0,
                coords: vec![1.0, 0.0],
            },
        ],
        cells: vec![
            Cell::new(0, 1, GeoKind::Lin2, vec![0, 1]),
            Cell::new(1, 1, GeoKind::Lin2, vec![1, 2]),
        ],
    };
    let (young, area) = (100_000.0, 0.01);
    let param = ParamRod {
        young,
        area,
        sig_y: None,
        hh: 0.0,
    };
    let base = FemBase::new(&mesh, [(1, Elem::Rod(param))]).unwrap();
    let ideal = Idealization::plane_strain(1.0);
    let mut elements = Elements::new(&mesh, &base, &ideal).unwrap();
    let mut state = FemState::new(&mesh, &base).unwrap();

    let mut essential = Essential::new();
    essential.points(&[0], Dof::Ux, 0.0);
    essential.points(&[0, 1, 2], Dof::Uy, 0.0);
    essential.points(&[2], Dof::Ux, 1.0);
    let mut control = Control::new();
    control.set_scheme(Scheme::Nr).set_nincs(1);
    let stage = Stage::new("pull", essential, Natural::new(), control);
    let solver = Solver::new(&mesh, &base);
    let summary = solver.run_stage(&mut elements, &mut state, &stage).unwrap();
    assert!(summary.increments[0].converged);

    // σ = E Δu / L
    let correct = young * 1.0 / 1.0;
    let snapshot = nodal_and_element_values(&mesh, &base, &mut elements, &state).unwrap();
    let sig = snapshot.element.get("sig_axial").unwrap();
    approx_eq(sig[0], correct, 1e-9 * correct);
    approx_eq(sig[1], correct, 1e-9 * correct);

    // reaction at the fixed end balances the axial force
    let tid = base.dofs.tid(0, Dof::Ux).unwrap();
    approx_eq(state.ff_ext[tid], -correct * area, 1e-8);

    // mid node moved halfway
    let tid = base.dofs.tid(1, Dof::Ux).unwrap();
    approx_eq(state.uu[tid], 0.5, 1e-12);
}
