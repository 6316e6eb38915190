use super::FemBase;
use crate::base::{Elem, Error, ParamStressStrain, Result};
use crate::material::{AxialState, LocalState};
use crate::mesh::Mesh;
use crate::shapes::integration_rule;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of one joint integration point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JointIpState {
    /// Tangential (slip) state along the bar axis
    pub tangential: AxialState,

    /// Normal relative-displacement stresses (one per normal direction)
    pub sig_n: [f64; 2],
}

impl JointIpState {
    /// Allocates a new zeroed instance
    pub fn new() -> Self {
        JointIpState {
            tangential: AxialState::new(),
            sig_n: [0.0, 0.0],
        }
    }
}

/// Holds the secondary values (material states) of one cell
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum CellState {
    /// Continuum solid: one stress/strain state per integration point
    Solid {
        /// States at all integration points
        ips: Vec<LocalState>,
    },

    /// Rod: a single axial state (constant strain over the bar)
    Rod {
        /// Axial state
        ip: AxialState,
    },

    /// Joint: one slip/normal state per integration point
    Joint {
        /// States at all integration points
        ips: Vec<JointIpState>,
    },

    /// Seepage: one velocity vector per integration point (for reporting)
    Seepage {
        /// Darcy velocities
        velocity: Vec<[f64; 3]>,
    },

    /// Porous: effective-stress states plus velocities
    Porous {
        /// Effective-stress states at all integration points
        ips: Vec<LocalState>,

        /// Darcy velocities
        velocity: Vec<[f64; 3]>,
    },
}

/// Returns the number of internal values of a stress-strain model
fn n_internal_values(param: &ParamStressStrain) -> usize {
    match param {
        ParamStressStrain::LinearElastic { .. } => 0,
        _ => 1,
    }
}

/// Holds the state of an analysis (primary and secondary variables)
///
/// All vectors are indexed by the stable DOF id; the per-stage equation
/// numbers never enter this struct. Checkpoint/restore for the capacity
/// search is a plain clone of this struct.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FemState {
    /// Accumulated essential values U per DOF
    pub uu: Vector,

    /// Accumulated natural values F per DOF (applied loads and reactions)
    pub ff_ext: Vector,

    /// Accumulated internal forces per DOF
    pub ff_int: Vector,

    /// Active flag per cell (deactivation clears the flag; no reactivation)
    pub active: Vec<bool>,

    /// Secondary values (material states) per cell
    pub gauss: Vec<CellState>,
}

impl FemState {
    /// Allocates a new instance with zeroed values
    pub fn new(mesh: &Mesh, base: &FemBase) -> Result<FemState> {
        let ncell = mesh.cells.len();
        if ncell == 0 {
            return Err(Error::validation("there are no cells in the mesh"));
        }
        let mut gauss = Vec::with_capacity(ncell);
        for cell in &mesh.cells {
            let elem = base.get_elem(cell)?;
            let state = match elem {
                Elem::Solid(param) => {
                    let nip = integration_rule(cell.kind).len();
                    let n_int = n_internal_values(&param.stress_strain);
                    CellState::Solid {
                        ips: vec![LocalState::new(n_int); nip],
                    }
                }
                Elem::Rod(..) => CellState::Rod { ip: AxialState::new() },
                Elem::JointLine(..) => CellState::Joint {
                    ips: vec![JointIpState::new(); 2],
                },
                Elem::JointPoint(..) => CellState::Joint {
                    ips: vec![JointIpState::new(); 1],
                },
                Elem::Seepage(..) => {
                    let nip = integration_rule(cell.kind).len();
                    CellState::Seepage {
                        velocity: vec![[0.0; 3]; nip],
                    }
                }
                Elem::Porous(param) => {
                    let nip = integration_rule(cell.kind).len();
                    let n_int = n_internal_values(&param.stress_strain);
                    CellState::Porous {
                        ips: vec![LocalState::new(n_int); nip],
                        velocity: vec![[0.0; 3]; nip],
                    }
                }
            };
            gauss.push(state);
        }
        Ok(FemState {
            uu: Vector::new(base.dofs.n_dof),
            ff_ext: Vector::new(base.dofs.n_dof),
            ff_int: Vector::new(base.dofs.n_dof),
            active: vec![true; ncell],
            gauss,
        })
    }

    /// Returns the solid states of a cell
    pub fn solid_ips(&self, cell_id: usize) -> Result<&Vec<LocalState>> {
        if cell_id >= self.gauss.len() {
            return Err(Error::validation("cell id is out of range"));
        }
        match &self.gauss[cell_id] {
            CellState::Solid { ips } => Ok(ips),
            CellState::Porous { ips, .. } => Ok(ips),
            _ => Err(Error::validation("cell state does not hold solid integration points")),
        }
    }

    /// Returns the mutable solid states of a cell
    pub fn solid_ips_mut(&mut self, cell_id: usize) -> Result<&mut Vec<LocalState>> {
        if cell_id >= self.gauss.len() {
            return Err(Error::validation("cell id is out of range"));
        }
        match &mut self.gauss[cell_id] {
            CellState::Solid { ips } => Ok(ips),
            CellState::Porous { ips, .. } => Ok(ips),
            _ => Err(Error::validation("cell state does not hold solid integration points")),
        }
    }

    /// Seeds a (non-zero) initial stress state at all points of a cell
    ///
    /// Used to set in-situ stresses before the first stage. The seeded state
    /// is validated against the yield surface by
    /// [`crate::fem::Elements::initialize_states`].
    pub fn set_initial_stress(&mut self, cell_id: usize, stress: &crate::tensor::Tensor2) -> Result<()> {
        for ip in self.solid_ips_mut(cell_id)? {
            ip.stress.set_tensor(1.0, stress);
        }
        Ok(())
    }

    /// Reads a JSON file containing the state data
    pub fn read_json<P>(full_path: &P) -> Result<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| Error::validation("cannot open state file"))?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| Error::validation("cannot parse state file"))?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
    pub fn write_json<P>(&self, full_path: &P) -> Result<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| Error::validation("cannot create directory"))?;
        }
        let mut file = File::create(&path).map_err(|_| Error::validation("cannot create state file"))?;
        serde_json::to_writer(&mut file, &self).map_err(|_| Error::validation("cannot write state file"))?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CellState, FemState};
    use crate::base::{Elem, Error, ParamRod, ParamSolid, SampleMeshes};
    use crate::fem::FemBase;
    use crate::mesh::Mesh;

    #[test]
    fn new_captures_empty_mesh() {
        let mesh = Mesh {
            ndim: 2,
            nodes: Vec::new(),
            cells: Vec::new(),
        };
        // an empty attribute map is fine; the cell check fails first
        let base = FemBase::new(&mesh, [(1, Elem::Rod(ParamRod::sample_elastic()))]).unwrap();
        assert_eq!(
            FemState::new(&mesh, &base).err(),
            Some(Error::validation("there are no cells in the mesh"))
        );
    }

    #[test]
    fn new_allocates_per_cell_states() {
        let mesh = SampleMeshes::one_qua4();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(ParamSolid::sample_mohr_coulomb()))]).unwrap();
        let state = FemState::new(&mesh, &base).unwrap();
        assert_eq!(state.uu.dim(), 8);
        assert_eq!(state.active, &[true]);
        match &state.gauss[0] {
            CellState::Solid { ips } => {
                assert_eq!(ips.len(), 4);
                assert_eq!(ips[0].internal_values.len(), 1);
            }
            _ => panic!("wrong cell state"),
        }
        assert!(state.solid_ips(0).is_ok());
    }

    #[test]
    fn clone_checkpoints_the_whole_state() {
        let mesh = SampleMeshes::one_qua4();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(ParamSolid::sample_linear_elastic()))]).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();
        let checkpoint = state.clone();
        state.uu[0] = 123.0;
        state.solid_ips_mut(0).unwrap()[0].stress.sym_set(0, 0, -9.0);
        // restore
        state = checkpoint;
        assert_eq!(state.uu[0], 0.0);
        assert_eq!(state.solid_ips(0).unwrap()[0].stress.get(0, 0), 0.0);
    }

    #[test]
    fn set_initial_stress_seeds_all_points() {
        let mesh = SampleMeshes::one_qua4();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(ParamSolid::sample_mohr_coulomb()))]).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();
        let mut sig0 = crate::tensor::Tensor2::new();
        sig0.sym_set(0, 0, -10.0);
        sig0.sym_set(1, 1, -10.0);
        sig0.sym_set(2, 2, -10.0);
        state.set_initial_stress(0, &sig0).unwrap();
        for ip in state.solid_ips(0).unwrap() {
            assert_eq!(ip.stress.get(1, 1), -10.0);
        }
        assert!(state.set_initial_stress(5, &sig0).is_err());
    }

    #[test]
    fn derive_works() {
        let mesh = SampleMeshes::one_lin2();
        let base = FemBase::new(&mesh, [(1, Elem::Rod(ParamRod::sample_elastic()))]).unwrap();
        let state = FemState::new(&mesh, &base).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let read: FemState = serde_json::from_str(&json).unwrap();
        assert_eq!(read.uu.dim(), 4);
    }
}
