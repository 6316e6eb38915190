//! Equisim - nonlinear finite element equilibrium engine
//!
//! This crate implements an incremental-iterative solver for structural and
//! geotechnical equilibrium problems (elasticity, elastoplasticity, seepage,
//! coupled hydromechanics). The main ingredients are:
//!
//! * [`tensor`] -- Mandel-scaled Voigt tensor primitives
//! * [`material`] -- per-integration-point constitutive models (return mapping)
//! * [`fem`] -- element kernels, DOF numbering, partitioned sparse solve,
//!   the Stage -> Increment -> Iteration control loop, and the capacity search
//! * [`mesh`] and [`shapes`] -- the arena mesh and the shape-function /
//!   quadrature interfaces consumed by the element kernels
//!
//! A minimal analysis assembles a mesh, attaches element parameters per cell
//! attribute, defines essential/natural boundary conditions for a stage, and
//! runs the solver:
//!
//! ```text
//! let mesh = SampleMeshes::one_qua4();
//! let p1 = ParamSolid::sample_linear_elastic();
//! let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))])?;
//! let mut elements = Elements::new(&mesh, &base, &config)?;
//! let mut state = FemState::new(&mesh, &base, &config)?;
//! let mut essential = Essential::new();
//! essential.points(&[0, 3], Dof::Ux, 0.0);
//! let stage = Stage::new("load", essential, natural, Control::new());
//! Solver::new(&mesh, &base, &config)?.run_stage(&mut elements, &mut state, &stage)?;
//! ```

pub mod base;
pub mod fem;
pub mod material;
pub mod mesh;
pub mod shapes;
pub mod tensor;

pub use crate::base::{Error, Result};
