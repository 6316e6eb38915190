use super::{Dofs, ElementTrait, FemState};
use crate::base::{Elem, Error, Idealization, ParamSeepage, Result};
use crate::mesh::{Cell, CellId, Mesh};
use crate::shapes::{integration_rule, IntegPointData, Pad};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Implements the seepage continuum element (steady liquid flow)
///
/// ```text
/// H_e = Σ_ip Bpᵀ · k · Bp · det(J) · w · thickness
/// ```
///
/// with the pressure-gradient operator Bp collecting the shape-function
/// gradients and k the (diagonal) permeability tensor.
pub struct ElementSeepage {
    /// Cell id
    cell_id: CellId,

    /// Space dimension
    ndim: usize,

    /// Number of nodes
    nnode: usize,

    /// Local-to-global map (stable DOF ids)
    local_to_global: Vec<usize>,

    /// Scratchpad with the cell coordinates
    pad: Pad,

    /// Integration points
    ips: IntegPointData,

    /// Diagonal permeability components
    kk_perm: [f64; 3],

    /// Out-of-plane thickness (1.0 in 3D)
    thickness: f64,

    /// Workspace: local values
    pp_local: Vector,
}

impl ElementSeepage {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamSeepage, ideal: &Idealization) -> Result<Self> {
        param.validate()?;
        if ideal.ndim() == 3 && param.kz <= 0.0 {
            return Err(Error::validation("permeability components must be positive"));
        }
        let ndim = mesh.ndim;
        let mut pad = Pad::new(ndim, cell.kind)?;
        mesh.set_pad(&mut pad, &cell.points);
        let nnode = cell.kind.nnode();
        Ok(ElementSeepage {
            cell_id: cell.id,
            ndim,
            nnode,
            local_to_global: dofs.cell_tids(ndim, &Elem::Seepage(*param), cell)?,
            pad,
            ips: integration_rule(cell.kind),
            kk_perm: [param.kx, param.ky, param.kz],
            thickness: ideal.thickness(),
            pp_local: Vector::new(nnode),
        })
    }

    /// Accumulates `out += H_local · p_local` and refreshes the velocities
    fn flux_product(&mut self, p_local: &Vector, out: &mut Vector, velocity: Option<&mut Vec<[f64; 3]>>) -> Result<()> {
        let mut velocity = velocity;
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            let coef = det * ip[3] * self.thickness;
            // grad p at the integration point
            let mut grad = [0.0; 3];
            for j in 0..self.ndim {
                for m in 0..self.nnode {
                    grad[j] += self.pad.gradient.get(m, j) * p_local[m];
                }
            }
            if let Some(vel) = velocity.as_deref_mut() {
                for j in 0..self.ndim {
                    vel[p][j] = -self.kk_perm[j] * grad[j];
                }
            }
            for m in 0..self.nnode {
                let mut sum = 0.0;
                for j in 0..self.ndim {
                    sum += self.pad.gradient.get(m, j) * self.kk_perm[j] * grad[j];
                }
                out[m] += sum * coef;
            }
        }
        Ok(())
    }
}

impl ElementTrait for ElementSeepage {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn initialize_state(&mut self, _state: &mut FemState) -> Result<()> {
        Ok(())
    }

    fn stiffness(&mut self, kk: &mut Matrix, _state: &FemState) -> Result<()> {
        kk.fill(0.0);
        for ip in self.ips {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            let coef = det * ip[3] * self.thickness;
            for m in 0..self.nnode {
                for n in 0..self.nnode {
                    let mut sum = 0.0;
                    for j in 0..self.ndim {
                        sum += self.pad.gradient.get(m, j) * self.kk_perm[j] * self.pad.gradient.get(n, j);
                    }
                    kk.set(m, n, kk.get(m, n) + sum * coef);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        // internal flux increment from the pressure increment
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.pp_local[local] = duu[*tid];
        }
        let mut dq = Vector::new(self.nnode);
        let dp_local = self.pp_local.clone();
        self.flux_product(&dp_local, &mut dq, None)?;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            dff_int[*tid] += dq[local];
        }
        // refresh the Darcy velocities from the total pressures
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.pp_local[local] = state.uu[*tid];
        }
        let p_total = self.pp_local.clone();
        let mut scratch = Vector::new(self.nnode);
        let mut vel = vec![[0.0; 3]; self.ips.len()];
        self.flux_product(&p_total, &mut scratch, Some(&mut vel))?;
        match &mut state.gauss[self.cell_id] {
            crate::fem::CellState::Seepage { velocity } => *velocity = vel,
            _ => return Err(Error::validation("cell state does not hold seepage velocities")),
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.pp_local[local] = state.uu[*tid];
        }
        let p_total = self.pp_local.clone();
        let mut q = Vector::new(self.nnode);
        self.flux_product(&p_total, &mut q, None)?;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            ff[*tid] += q[local];
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        match &state.gauss[self.cell_id] {
            crate::fem::CellState::Seepage { velocity } => Ok(velocity
                .iter()
                .map(|v| {
                    let mut map = HashMap::new();
                    map.insert("vel_x".to_string(), v[0]);
                    map.insert("vel_y".to_string(), v[1]);
                    map.insert("vel_z".to_string(), v[2]);
                    map
                })
                .collect()),
            _ => Err(Error::validation("cell state does not hold seepage velocities")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
