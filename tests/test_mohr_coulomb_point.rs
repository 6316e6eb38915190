use equisim::base::{Error, ParamStressStrain, YIELD_TOL};
use equisim::material::{new_stress_strain_model, LocalState};
use equisim::tensor::Tensor2;

/// Mohr-Coulomb point (φ = 30°, c = 10) pushed far outside the yield surface
/// by a large trial strain increment: the return mapping must bring the
/// stress back within tolerance.
#[test]
fn large_step_returns_to_the_yield_surface() {
    let param = ParamStressStrain::MohrCoulomb {
        young: 10_000.0,
        poisson: 0.3,
        c: 10.0,
        phi: 30.0,
    };
    let mut model = new_stress_strain_model(&param, false).unwrap();
    let mut state = LocalState::new(model.n_internal_values());
    model.initialize_internal_values(&mut state).unwrap();

    // large shear-dominant increment crossing the surface by a wide margin
    let mut deps = Tensor2::new();
    deps.sym_set(0, 1, 0.02);
    deps.sym_set(0, 0, -0.001);
    model.update_stress(&mut state, &deps).unwrap();

    assert!(!state.elastic);
    let f = model.yield_value(&state);
    assert!(f <= 1e-4, "f = {} must be within 1e-4", f);

    // the next increment starts from a consistent state (no StateError)
    let mut small = Tensor2::new();
    small.sym_set(0, 0, -1e-5);
    model.update_stress(&mut state, &small).unwrap();
    assert!(model.yield_value(&state) <= 1e-4);
}

/// An inconsistent (restarted) state beyond tolerance is rejected with a
/// structured State error.
#[test]
fn inconsistent_entry_state_is_rejected() {
    let param = ParamStressStrain::MohrCoulomb {
        young: 10_000.0,
        poisson: 0.3,
        c: 10.0,
        phi: 30.0,
    };
    let mut model = new_stress_strain_model(&param, false).unwrap();
    let mut state = LocalState::new(model.n_internal_values());
    state.stress.sym_set(0, 0, 500.0); // far outside
    let mut deps = Tensor2::new();
    deps.sym_set(0, 0, 1e-5);
    match model.update_stress(&mut state, &deps) {
        Err(Error::State { yield_value, .. }) => assert!(yield_value > YIELD_TOL),
        other => panic!("expected a State error, got {:?}", other.err()),
    }
}
