use super::{Elements, Equations, Essential, FemBase, FemState, LinearSystem, Natural};
use crate::base::{Control, Error, Result, Scheme};
use crate::mesh::Mesh;
use russell_lab::Vector;

/// Reference-force magnitude below which the residual is not normalized
const F_REF_MIN: f64 = 1e-12;

/// Holds one analysis stage: a fixed boundary-condition configuration
///
/// Essential conditions prescribe TOTAL target values; natural conditions
/// are loads ADDED over the stage. Both are ramped in `control.nincs` equal
/// increments.
pub struct Stage {
    /// Stage name (for messages)
    pub name: String,

    /// Essential (prescribed) conditions
    pub essential: Essential,

    /// Natural (applied) conditions
    pub natural: Natural,

    /// Control settings
    pub control: Control,
}

impl Stage {
    /// Allocates a new instance
    pub fn new(name: &str, essential: Essential, natural: Natural, control: Control) -> Self {
        Stage {
            name: name.to_string(),
            essential,
            natural,
            control,
        }
    }

    /// Returns a copy with the natural values multiplied by a load factor
    pub fn scaled_natural(&self, factor: f64) -> Stage {
        Stage {
            name: self.name.clone(),
            essential: self.essential.clone(),
            natural: self.natural.scaled(factor),
            control: self.control,
        }
    }
}

/// Holds the outcome of one increment
#[derive(Clone, Copy, Debug)]
pub struct IncrementSummary {
    /// Normalized residual before the first solve of the increment
    pub residual_initial: f64,

    /// Normalized residual at the end of the increment
    pub residual: f64,

    /// Number of iterations performed
    pub iterations: usize,

    /// Convergence flag (always false for the FE scheme)
    pub converged: bool,
}

/// Holds the outcome of one stage
#[derive(Clone, Debug)]
pub struct StageSummary {
    /// Outcome of every increment
    pub increments: Vec<IncrementSummary>,

    /// Number of free equations of the stage
    pub nu: usize,

    /// Total number of equations of the stage
    pub n_equation: usize,
}

/// Implements the nonlinear incremental-iterative solver
///
/// The control hierarchy is Stage -> Increment -> Iteration. The canonical
/// residual is the max-norm of the unbalanced free-DOF force divided by the
/// max-norm of the stage's external-force increment (absolute max-norm when
/// the stage applies no external force, e.g., pure prescribed-displacement
/// stages).
///
/// A solver instance is not re-entrant: only one `run_stage` may be in
/// flight against a given state at a time.
pub struct Solver<'a> {
    /// Mesh
    mesh: &'a Mesh,

    /// Basic analysis data (attributes and DOF registry)
    base: &'a FemBase,
}

impl<'a> Solver<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh, base: &'a FemBase) -> Self {
        Solver { mesh, base }
    }

    /// Runs one stage: numbering, increments, and iterations
    ///
    /// The element `update` side effect permanently mutates material state
    /// and is NOT idempotent; a failed stage leaves the state partially
    /// updated (the capacity search rolls back via checkpoints).
    pub fn run_stage(&self, elements: &mut Elements, state: &mut FemState, stage: &Stage) -> Result<StageSummary> {
        let control = &stage.control;
        control.validate()?;
        if stage.essential.all.is_empty() {
            return Err(Error::validation("stage must prescribe at least one DOF"));
        }
        let dofs = &self.base.dofs;
        let n_dof = dofs.n_dof;
        if self.mesh.nodes.len() != dofs.point_dofs.len() {
            return Err(Error::validation("DOF registry does not match the mesh"));
        }

        // validate the material states (e.g., seeded in-situ stresses)
        elements.initialize_states(state)?;

        // numbering protocol: DOFs unused by active elements join the
        // prescribed partition (zero increment)
        let used = elements.used_tids(n_dof, &state.active);
        let mut prescribed: Vec<bool> = used.iter().map(|u| !u).collect();
        for (node, dof, _) in &stage.essential.all {
            prescribed[dofs.tid(*node, *dof)?] = true;
        }
        let equations = Equations::new(dofs, &prescribed)?;
        let (nu, np) = (equations.nu, equations.n_equation - equations.nu);
        log::debug!("stage '{}': nu = {}, np = {}", stage.name, nu, np);

        // stage targets
        let mut du2_total = Vector::new(n_dof);
        for (node, dof, value) in &stage.essential.all {
            let tid = dofs.tid(*node, *dof)?;
            du2_total[tid] = value - state.uu[tid];
        }
        let mut df_total = Vector::new(n_dof);
        for (node, nbc, value) in &stage.natural.all {
            let tid = dofs.tid(*node, nbc.dof())?;
            if prescribed[tid] {
                log::warn!("natural condition at node {} ignored: the DOF is prescribed", node);
                continue;
            }
            df_total[tid] += value;
        }
        let mut f_ref = 0.0;
        for tid in 0..n_dof {
            f_ref = f64::max(f_ref, df_total[tid].abs());
        }
        let norm = if f_ref > F_REF_MIN { f_ref } else { 1.0 };

        // linear system and workspaces
        let mut ls = LinearSystem::new(nu, np, elements.nnz_sup(&state.active))?;
        let mut rr1 = Vector::new(nu);
        let mut du1 = Vector::new(nu);
        let mut du2 = Vector::new(np);
        let du2_zero = Vector::new(np);
        let mut df2 = Vector::new(np);
        let mut duu = Vector::new(n_dof);
        let mut dff_int = Vector::new(n_dof);

        if control.verbose_increments || control.verbose_iterations {
            println!("\nEQUISIM === STAGE '{}' ({} increments) ====================", stage.name, control.nincs);
            println!("{:>9} {:>5} {:>12} {:>5}", "increment", "iter", "residual", "conv");
        }

        let mut summary = StageSummary {
            increments: Vec::with_capacity(control.nincs),
            nu,
            n_equation: equations.n_equation,
        };

        for inc in 0..control.nincs {
            // apply the natural-condition increment on the free DOFs
            for tid in 0..n_dof {
                if !prescribed[tid] {
                    state.ff_ext[tid] += df_total[tid] / (control.nincs as f64);
                }
            }
            // prescribed increment (consumed at iteration 0)
            for eq in nu..equations.n_equation {
                let tid = equations.eq_to_tid[eq];
                du2[eq - nu] = du2_total[tid] / (control.nincs as f64);
            }

            let mut residual_initial = 0.0;
            let mut it = 0;
            let mut converged = false;
            let residual = loop {
                // residual of the free partition
                let mut res = 0.0;
                for eq in 0..nu {
                    let tid = equations.eq_to_tid[eq];
                    rr1[eq] = state.ff_ext[tid] - state.ff_int[tid];
                    res = f64::max(res, rr1[eq].abs());
                }
                let res = res / norm;
                if it == 0 {
                    residual_initial = res;
                }
                if !res.is_finite() {
                    return Err(Error::convergence(it, res, "residual is not finite (NaN or Inf)"));
                }
                if res > control.blowup_rr {
                    return Err(Error::convergence(it, res, "residual is diverging"));
                }
                if it > 0 && res < control.tol_rr {
                    converged = true;
                    break res;
                }
                if it >= control.nmaxits {
                    return Err(Error::convergence(it, res, "maximum number of iterations reached"));
                }

                // tangent assembly: FE/MNR build once per increment, NR at
                // every iteration
                if it == 0 || control.scheme == Scheme::Nr {
                    ls.reset()?;
                    for (cell_id, element) in elements.all.iter_mut().enumerate() {
                        if !state.active[cell_id] {
                            continue;
                        }
                        element
                            .actual
                            .stiffness(&mut element.kk, state)
                            .map_err(|e| e.with_element(cell_id))?;
                        let l2g = element.actual.local_to_global();
                        for (i, ti) in l2g.iter().enumerate() {
                            for (j, tj) in l2g.iter().enumerate() {
                                ls.put(equations.tid_to_eq[*ti], equations.tid_to_eq[*tj], element.kk.get(i, j))?;
                            }
                        }
                    }
                    ls.factorize()?;
                }

                // partitioned solve and reaction recovery
                let du2_now = if it == 0 { &du2 } else { &du2_zero };
                ls.solve(&mut du1, &rr1, du2_now)?;
                ls.recover_reactions(&mut df2, &du1, du2_now)?;

                // scatter the increment and run the element updates
                duu.fill(0.0);
                for eq in 0..nu {
                    duu[equations.eq_to_tid[eq]] = du1[eq];
                }
                if it == 0 {
                    for eq in nu..equations.n_equation {
                        duu[equations.eq_to_tid[eq]] = du2[eq - nu];
                    }
                }
                for tid in 0..n_dof {
                    state.uu[tid] += duu[tid];
                }
                dff_int.fill(0.0);
                elements.update_all(state, &duu, &mut dff_int)?;
                for tid in 0..n_dof {
                    state.ff_int[tid] += dff_int[tid];
                }
                for eq in nu..equations.n_equation {
                    state.ff_ext[equations.eq_to_tid[eq]] += df2[eq - nu];
                }

                if control.verbose_iterations {
                    println!("{:>9} {:>5} {:>12.4e} {:>5}", inc + 1, it, res, "...");
                }

                it += 1;
                if control.scheme == Scheme::Fe {
                    // one solve per increment; report the residual only
                    let mut res = 0.0;
                    for eq in 0..nu {
                        let tid = equations.eq_to_tid[eq];
                        res = f64::max(res, (state.ff_ext[tid] - state.ff_int[tid]).abs());
                    }
                    break res / norm;
                }
            };

            if control.verbose_increments {
                println!(
                    "{:>9} {:>5} {:>12.4e} {:>5}",
                    inc + 1,
                    it,
                    residual,
                    if converged { "yes" } else { "no" }
                );
            }
            summary.increments.push(IncrementSummary {
                residual_initial,
                residual,
                iterations: it,
                converged,
            });
        }
        Ok(summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
