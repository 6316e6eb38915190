use equisim::base::{Control, Dof, Elem, Idealization, Nbc, ParamRod, SampleMeshes, Scheme};
use equisim::fem::{solve_to_limit, CapacityOptions, Elements, Essential, FemBase, FemState, Natural, Solver, Stage};
use russell_lab::approx_eq;

/// Limit-load search on a perfectly plastic bar: the capacity is σy·A, so
/// the load factor converges to σy·A divided by the base load.
#[test]
fn capacity_search_finds_the_plastic_limit() {
    let mesh = SampleMeshes::one_lin2();
    let param = ParamRod {
        young: 1000.0,
        area: 1.0,
        sig_y: Some(5.0),
        hh: 0.0, // perfect plasticity
    };
    let base = FemBase::new(&mesh, [(1, Elem::Rod(param))]).unwrap();
    let ideal = Idealization::plane_strain(1.0);
    let mut elements = Elements::new(&mesh, &base, &ideal).unwrap();
    let mut state = FemState::new(&mesh, &base).unwrap();
    let solver = Solver::new(&mesh, &base);

    let base_load = 8.0;
    let mut essential = Essential::new();
    essential.points(&[0], Dof::Ux, 0.0);
    essential.points(&[0, 1], Dof::Uy, 0.0);
    let mut natural = Natural::new();
    natural.points(&[1], Nbc::Fx, base_load);
    let mut control = Control::new();
    control.set_scheme(Scheme::Nr).set_nincs(1).set_nmaxits(10);
    let stage = Stage::new("push", essential, natural, control);

    let options = CapacityOptions::new();
    let result = solve_to_limit(&solver, &mut elements, &mut state, &stage, &options).unwrap();

    // capacity = σy A = 5.0; factor = 5/8
    approx_eq(result.load_factor, 5.0 / base_load, 1e-12);
    assert!(result.n_rejected >= 3);

    // the committed state carries the limit force
    let tid = base.dofs.tid(1, Dof::Ux).unwrap();
    approx_eq(state.ff_int[tid], 5.0, 1e-8);
    approx_eq(state.ff_ext[tid], 5.0, 1e-8);
}

/// A failed trial rolls the state back to the last checkpoint: after the
/// search, the accumulated external force matches the committed factor only.
#[test]
fn failed_trials_are_rolled_back() {
    let mesh = SampleMeshes::one_lin2();
    let param = ParamRod {
        young: 1000.0,
        area: 1.0,
        sig_y: Some(5.0),
        hh: 0.0,
    };
    let base = FemBase::new(&mesh, [(1, Elem::Rod(param))]).unwrap();
    let ideal = Idealization::plane_strain(1.0);
    let mut elements = Elements::new(&mesh, &base, &ideal).unwrap();
    let mut state = FemState::new(&mesh, &base).unwrap();
    let solver = Solver::new(&mesh, &base);

    let mut essential = Essential::new();
    essential.points(&[0], Dof::Ux, 0.0);
    essential.points(&[0, 1], Dof::Uy, 0.0);
    let mut natural = Natural::new();
    natural.points(&[1], Nbc::Fx, 100.0); // far beyond the capacity
    let mut control = Control::new();
    control.set_scheme(Scheme::Nr).set_nincs(1).set_nmaxits(8);
    let stage = Stage::new("push", essential, natural, control);

    let options = CapacityOptions::new();
    let result = solve_to_limit(&solver, &mut elements, &mut state, &stage, &options).unwrap();
    // the committed factor approaches the capacity from below, within the
    // step tolerance (the trial factors are dyadic, the capacity is not)
    assert!(result.load_factor * 100.0 <= 5.0 + 1e-10);
    assert!(result.load_factor * 100.0 > 5.0 - 100.0 * options.step_tol * 2.0);
    // no residue of rejected trials in the accumulated loads
    let tid = base.dofs.tid(1, Dof::Ux).unwrap();
    approx_eq(state.ff_ext[tid], result.load_factor * 100.0, 1e-8);
}
