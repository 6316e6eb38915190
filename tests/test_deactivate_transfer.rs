use equisim::base::{Dof, Elem, Idealization, ParamSolid, SampleMeshes};
use equisim::fem::{Elements, FemBase, FemState};
use russell_lab::approx_eq;

/// Deactivating an element with one node shared by an active neighbor
/// transfers a nonzero equivalent nodal force to the shared nodes.
#[test]
fn deactivation_with_active_neighbor_transfers_forces() {
    let mesh = SampleMeshes::two_qua4();
    let base = FemBase::new(&mesh, [(1, Elem::Solid(ParamSolid::sample_linear_elastic()))]).unwrap();
    let ideal = Idealization::plane_strain(1.0);
    let mut elements = Elements::new(&mesh, &base, &ideal).unwrap();
    let mut state = FemState::new(&mesh, &base).unwrap();

    // seed a uniform stress field in both elements
    for cell_id in 0..2 {
        for ip in state.solid_ips_mut(cell_id).unwrap() {
            ip.stress.sym_set(0, 0, -10.0);
            ip.stress.sym_set(1, 1, -4.0);
        }
    }
    elements.deactivate(0, &base.dofs, &mut state).unwrap();

    // shared nodes 1 and 2 carry the equivalent natural value
    let mut total_shared = 0.0;
    for node in [1, 2] {
        let tid = base.dofs.tid(node, Dof::Ux).unwrap();
        total_shared += state.ff_ext[tid].abs();
    }
    assert!(total_shared > 1.0, "shared nodes must receive a nonzero transfer");

    // exclusive nodes 0 and 3 receive none
    for node in [0, 3] {
        for dof in [Dof::Ux, Dof::Uy] {
            let tid = base.dofs.tid(node, dof).unwrap();
            approx_eq(state.ff_ext[tid], 0.0, 1e-14);
        }
    }

    // the accumulated internal forces dropped the element contribution
    let tid = base.dofs.tid(0, Dof::Ux).unwrap();
    assert!(state.ff_int[tid].abs() > 0.0);
}

/// Deactivating an element with no active neighbors transfers nothing.
#[test]
fn deactivation_without_neighbors_transfers_nothing() {
    let mesh = SampleMeshes::one_qua4();
    let base = FemBase::new(&mesh, [(1, Elem::Solid(ParamSolid::sample_linear_elastic()))]).unwrap();
    let ideal = Idealization::plane_strain(1.0);
    let mut elements = Elements::new(&mesh, &base, &ideal).unwrap();
    let mut state = FemState::new(&mesh, &base).unwrap();
    for ip in state.solid_ips_mut(0).unwrap() {
        ip.stress.sym_set(0, 0, -10.0);
    }
    elements.deactivate(0, &base.dofs, &mut state).unwrap();
    for tid in 0..base.dofs.n_dof {
        approx_eq(state.ff_ext[tid], 0.0, 1e-14);
    }
}
