use super::{Dofs, ElementTrait, FemState};
use crate::base::{Error, Idealization, ParamSolid, Result};
use crate::material::{new_stress_strain_model, StressStrainTrait};
use crate::mesh::{Cell, CellId, Mesh};
use crate::shapes::{integration_rule, integration_rule_sized, IntegPointData, Pad};
use crate::tensor::{Tensor2, Tensor4, SQRT_2};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Implements the continuum solid element (small-strain equilibrium)
///
/// ```text
/// K_e = Σ_ip Bᵀ · D · B · det(J) · w · thickness
/// ```
///
/// with the 6-row Mandel strain-displacement operator B built from the
/// shape-function gradients.
pub struct ElementSolid {
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

    /// Material model (one instance shared by all integration points)
    model: Box<dyn StressStrainTrait>,

    /// Out-of-plane thickness (1.0 in 3D)
    thickness: f64,

    /// Strain-displacement operator (6, nnode*ndim)
    bb: Matrix,

    /// Workspace: tangent modulus
    dd: Tensor4,

    /// Workspace: strain increment
    deps: Tensor2,

    /// Workspace: stress before the update
    sig_old: Tensor2,

    /// Workspace: local displacement increment
    duu_local: Vector,

    /// Workspace: local force vector
    ff_local: Vector,
}

impl ElementSolid {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamSolid, ideal: &Idealization) -> Result<Self> {
        let ndim = mesh.ndim;
        let nnode = cell.kind.nnode();
        let ips = match param.ngauss {
            Some(n) => integration_rule_sized(cell.kind, n)
                .ok_or(Error::validation("requested number of integration points is not available"))?,
            None => integration_rule(cell.kind),
        };
        let mut pad = Pad::new(ndim, cell.kind)?;
        mesh.set_pad(&mut pad, &cell.points);
        let model = new_stress_strain_model(&param.stress_strain, ideal.plane_stress())?;
        let local_to_global = dofs.cell_tids(ndim, &crate::base::Elem::Solid(*param), cell)?;
        let ndof = nnode * ndim;
        Ok(ElementSolid {
            cell_id: cell.id,
            ndim,
            nnode,
            local_to_global,
            pad,
            ips,
            model,
            thickness: ideal.thickness(),
            bb: Matrix::new(6, ndof),
            dd: Tensor4::new(),
            deps: Tensor2::new(),
            sig_old: Tensor2::new(),
            duu_local: Vector::new(ndof),
            ff_local: Vector::new(ndof),
        })
    }

    /// Fills the strain-displacement operator from the current gradients
    fn calc_bb(&mut self) {
        self.bb.fill(0.0);
        for m in 0..self.nnode {
            let col = m * self.ndim;
            let g0 = self.pad.gradient.get(m, 0);
            let g1 = self.pad.gradient.get(m, 1);
            self.bb.set(0, col, g0);
            self.bb.set(1, col + 1, g1);
            self.bb.set(3, col, g1 / SQRT_2);
            self.bb.set(3, col + 1, g0 / SQRT_2);
            if self.ndim == 3 {
                let g2 = self.pad.gradient.get(m, 2);
                self.bb.set(2, col + 2, g2);
                self.bb.set(4, col + 1, g2 / SQRT_2);
                self.bb.set(4, col + 2, g1 / SQRT_2);
                self.bb.set(5, col, g2 / SQRT_2);
                self.bb.set(5, col + 2, g0 / SQRT_2);
            }
        }
    }
}

impl ElementTrait for ElementSolid {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        self.model.symmetric_stiffness()
    }

    fn initialize_state(&mut self, state: &mut FemState) -> Result<()> {
        let ips = state.solid_ips_mut(self.cell_id)?;
        for ip_state in ips.iter_mut() {
            self.model
                .initialize_internal_values(ip_state)
                .map_err(|e| e.with_element(self.cell_id))?;
        }
        Ok(())
    }

    fn stiffness(&mut self, kk: &mut Matrix, state: &FemState) -> Result<()> {
        let ndof = self.nnode * self.ndim;
        kk.fill(0.0);
        let ip_states = state.solid_ips(self.cell_id)?;
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.calc_bb();
            self.model
                .stiffness(&mut self.dd, &ip_states[p])
                .map_err(|e| e.with_element(self.cell_id))?;
            let coef = det * ip[3] * self.thickness;
            // K += Bᵀ D B coef
            for i in 0..ndof {
                for j in 0..ndof {
                    let mut sum = 0.0;
                    for a in 0..6 {
                        let mut db = 0.0;
                        for b in 0..6 {
                            db += self.dd.mat.get(a, b) * self.bb.get(b, j);
                        }
                        sum += self.bb.get(a, i) * db;
                    }
                    kk.set(i, j, kk.get(i, j) + sum * coef);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        let ndof = self.nnode * self.ndim;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = duu[*tid];
        }
        self.ff_local.fill(0.0);
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.calc_bb();
            // Δε = B ΔU
            for a in 0..6 {
                let mut sum = 0.0;
                for j in 0..ndof {
                    sum += self.bb.get(a, j) * self.duu_local[j];
                }
                self.deps.vec[a] = sum;
            }
            let ip_state = &mut state.solid_ips_mut(self.cell_id)?[p];
            self.sig_old.set_tensor(1.0, &ip_state.stress);
            self.model
                .update_stress(ip_state, &self.deps)
                .map_err(|e| e.with_element(self.cell_id))?;
            // ΔF += Bᵀ Δσ coef
            let coef = det * ip[3] * self.thickness;
            for j in 0..ndof {
                let mut sum = 0.0;
                for a in 0..6 {
                    sum += self.bb.get(a, j) * (ip_state.stress.vec[a] - self.sig_old.vec[a]);
                }
                self.ff_local[j] += sum * coef;
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            dff_int[*tid] += self.ff_local[local];
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        let ndof = self.nnode * self.ndim;
        self.ff_local.fill(0.0);
        let ip_states = state.solid_ips(self.cell_id)?;
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.calc_bb();
            let coef = det * ip[3] * self.thickness;
            for j in 0..ndof {
                let mut sum = 0.0;
                for a in 0..6 {
                    sum += self.bb.get(a, j) * ip_states[p].stress.vec[a];
                }
                self.ff_local[j] += sum * coef;
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            ff[*tid] += self.ff_local[local];
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        let ip_states = state.solid_ips(self.cell_id)?;
        let mut res = Vec::with_capacity(ip_states.len());
        for ip_state in ip_states {
            let mut map = HashMap::new();
            self.model.output_values(&mut map, ip_state);
            res.push(map);
        }
        Ok(res)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
