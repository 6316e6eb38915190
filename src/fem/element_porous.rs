use super::{Dofs, ElementTrait, FemState};
use crate::base::{Elem, Error, Idealization, ParamPorous, Result};
use crate::material::{new_stress_strain_model, StressStrainTrait};
use crate::mesh::{Cell, CellId, Mesh};
use crate::shapes::{integration_rule, GeoKind, IntegPointData, Pad};
use crate::tensor::{Tensor2, Tensor4, SQRT_2};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Returns the lower-order kind interpolating the pressure field
fn pressure_kind(kind: GeoKind) -> GeoKind {
    match kind {
        GeoKind::Tri6 => GeoKind::Tri3,
        GeoKind::Qua8 => GeoKind::Qua4,
        _ => kind,
    }
}

/// Implements the hydromechanical-coupled porous element (static u-p form)
///
/// The local system couples the skeleton equilibrium (effective stress) with
/// steady seepage through the coupling operator `Q = ∫ Bᵀ m N_p dV`:
///
/// ```text
/// K_e = | Kuu  -Q |        f_int = | ∫ Bᵀ σ' dV - Q p |
///       |  0    H |                | H p              |
/// ```
///
/// Sign convention: σ = σ' - m·p (tension-positive total stress, pressure
/// positive in compression).
pub struct ElementPorous {
    /// Cell id
    cell_id: CellId,

    /// Space dimension
    ndim: usize,

    /// Number of nodes (displacement interpolation)
    nnode: usize,

    /// Number of corner nodes (pressure interpolation)
    ncorner: usize,

    /// Local-to-global map: u DOFs first, then Pw DOFs of the corners
    local_to_global: Vec<usize>,

    /// Scratchpad for the displacement interpolation
    pad: Pad,

    /// Scratchpad for the pressure interpolation (corner nodes)
    pad_p: Pad,

    /// Integration points
    ips: IntegPointData,

    /// Material model of the solid skeleton (effective stress)
    model: Box<dyn StressStrainTrait>,

    /// Diagonal permeability components
    kk_perm: [f64; 3],

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

    /// Workspace: local increment
    duu_local: Vector,

    /// Workspace: local force vector
    ff_local: Vector,
}

impl ElementPorous {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamPorous, ideal: &Idealization) -> Result<Self> {
        param.validate()?;
        if ideal.plane_stress() {
            return Err(Error::validation("porous elements do not work in plane-stress"));
        }
        let ndim = mesh.ndim;
        let nnode = cell.kind.nnode();
        let p_kind = pressure_kind(cell.kind);
        let ncorner = p_kind.nnode();
        let mut pad = Pad::new(ndim, cell.kind)?;
        mesh.set_pad(&mut pad, &cell.points);
        let mut pad_p = Pad::new(ndim, p_kind)?;
        mesh.set_pad(&mut pad_p, &cell.points[0..ncorner]);
        let model = new_stress_strain_model(&param.stress_strain, false)?;
        let local_to_global = dofs.cell_tids(ndim, &Elem::Porous(*param), cell)?;
        let ndof = nnode * ndim + ncorner;
        Ok(ElementPorous {
            cell_id: cell.id,
            ndim,
            nnode,
            ncorner,
            local_to_global,
            pad,
            pad_p,
            ips: integration_rule(cell.kind),
            model,
            kk_perm: [param.kx, param.ky, param.kz],
            thickness: ideal.thickness(),
            bb: Matrix::new(6, nnode * ndim),
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

impl ElementTrait for ElementPorous {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        false // one-sided coupling of the static u-p form
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
        let nu = self.nnode * self.ndim;
        kk.fill(0.0);
        let ip_states = state.solid_ips(self.cell_id)?;
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_interp(&ip[0..3]);
            self.calc_bb();
            self.model
                .stiffness(&mut self.dd, &ip_states[p])
                .map_err(|e| e.with_element(self.cell_id))?;
            let coef = det * ip[3] * self.thickness;
            // Kuu += Bᵀ D B coef
            for i in 0..nu {
                for j in 0..nu {
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
            // -Q += -(Bᵀ m) Npᵀ coef
            for i in 0..nu {
                let btm = self.bb.get(0, i) + self.bb.get(1, i) + self.bb.get(2, i);
                for j in 0..self.ncorner {
                    let value = kk.get(i, nu + j) - btm * self.pad_p.interp[j] * coef;
                    kk.set(i, nu + j, value);
                }
            }
            // H += Bpᵀ k Bp coef
            for i in 0..self.ncorner {
                for j in 0..self.ncorner {
                    let mut sum = 0.0;
                    for d in 0..self.ndim {
                        sum += self.pad_p.gradient.get(i, d) * self.kk_perm[d] * self.pad_p.gradient.get(j, d);
                    }
                    kk.set(nu + i, nu + j, kk.get(nu + i, nu + j) + sum * coef);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        let nu = self.nnode * self.ndim;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = duu[*tid];
        }
        self.ff_local.fill(0.0);
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_interp(&ip[0..3]);
            self.calc_bb();
            let coef = det * ip[3] * self.thickness;
            // Δε = B ΔU
            for a in 0..6 {
                let mut sum = 0.0;
                for j in 0..nu {
                    sum += self.bb.get(a, j) * self.duu_local[j];
                }
                self.deps.vec[a] = sum;
            }
            // effective stress update
            {
                let ip_state = &mut state.solid_ips_mut(self.cell_id)?[p];
                self.sig_old.set_tensor(1.0, &ip_state.stress);
                self.model
                    .update_stress(ip_state, &self.deps)
                    .map_err(|e| e.with_element(self.cell_id))?;
                for j in 0..nu {
                    let mut sum = 0.0;
                    for a in 0..6 {
                        sum += self.bb.get(a, j) * (ip_state.stress.vec[a] - self.sig_old.vec[a]);
                    }
                    self.ff_local[j] += sum * coef;
                }
            }
            // pressure coupling: Δf_u -= (Bᵀ m) (Np·Δp) coef
            let mut dp_ip = 0.0;
            for j in 0..self.ncorner {
                dp_ip += self.pad_p.interp[j] * self.duu_local[nu + j];
            }
            for j in 0..nu {
                let btm = self.bb.get(0, j) + self.bb.get(1, j) + self.bb.get(2, j);
                self.ff_local[j] -= btm * dp_ip * coef;
            }
            // flow: Δf_p += Bpᵀ k Bp Δp coef, and refresh the Darcy velocity
            let mut dgrad = [0.0; 3];
            let mut grad_total = [0.0; 3];
            for d in 0..self.ndim {
                for m in 0..self.ncorner {
                    dgrad[d] += self.pad_p.gradient.get(m, d) * self.duu_local[nu + m];
                    grad_total[d] +=
                        self.pad_p.gradient.get(m, d) * state.uu[self.local_to_global[nu + m]];
                }
            }
            for m in 0..self.ncorner {
                let mut sum = 0.0;
                for d in 0..self.ndim {
                    sum += self.pad_p.gradient.get(m, d) * self.kk_perm[d] * dgrad[d];
                }
                self.ff_local[nu + m] += sum * coef;
            }
            match &mut state.gauss[self.cell_id] {
                crate::fem::CellState::Porous { velocity, .. } => {
                    for d in 0..self.ndim {
                        velocity[p][d] = -self.kk_perm[d] * grad_total[d];
                    }
                }
                _ => return Err(Error::validation("cell state does not hold porous data")),
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            dff_int[*tid] += self.ff_local[local];
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        let nu = self.nnode * self.ndim;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = state.uu[*tid];
        }
        self.ff_local.fill(0.0);
        let ip_states = state.solid_ips(self.cell_id)?;
        for (p, ip) in self.ips.iter().enumerate() {
            let det = self.pad.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_gradient(&ip[0..3])?;
            self.pad_p.calc_interp(&ip[0..3]);
            self.calc_bb();
            let coef = det * ip[3] * self.thickness;
            let mut p_ip = 0.0;
            for j in 0..self.ncorner {
                p_ip += self.pad_p.interp[j] * self.duu_local[nu + j];
            }
            for j in 0..nu {
                let mut sum = 0.0;
                for a in 0..6 {
                    sum += self.bb.get(a, j) * ip_states[p].stress.vec[a];
                }
                let btm = self.bb.get(0, j) + self.bb.get(1, j) + self.bb.get(2, j);
                self.ff_local[j] += (sum - btm * p_ip) * coef;
            }
            let mut grad = [0.0; 3];
            for d in 0..self.ndim {
                for m in 0..self.ncorner {
                    grad[d] += self.pad_p.gradient.get(m, d) * self.duu_local[nu + m];
                }
            }
            for m in 0..self.ncorner {
                let mut sum = 0.0;
                for d in 0..self.ndim {
                    sum += self.pad_p.gradient.get(m, d) * self.kk_perm[d] * grad[d];
                }
                self.ff_local[nu + m] += sum * coef;
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            ff[*tid] += self.ff_local[local];
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        let (ips, velocity) = match &state.gauss[self.cell_id] {
            crate::fem::CellState::Porous { ips, velocity } => (ips, velocity),
            _ => return Err(Error::validation("cell state does not hold porous data")),
        };
        let mut res = Vec::with_capacity(ips.len());
        for (p, ip_state) in ips.iter().enumerate() {
            let mut map = HashMap::new();
            self.model.output_values(&mut map, ip_state);
            map.insert("vel_x".to_string(), velocity[p][0]);
            map.insert("vel_y".to_string(), velocity[p][1]);
            map.insert("vel_z".to_string(), velocity[p][2]);
            res.push(map);
        }
        Ok(res)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElementPorous;
    use crate::base::{Elem, Idealization, ParamPorous, ParamStressStrain, SampleMeshes};
    use crate::fem::{ElementTrait, FemBase, FemState};
    use russell_lab::{approx_eq, Matrix, Vector};

    fn sample_param() -> ParamPorous {
        ParamPorous {
            stress_strain: ParamStressStrain::LinearElastic {
                young: 1000.0,
                poisson: 0.25,
            },
            kx: 1.0,
            ky: 1.0,
            kz: 1.0,
        }
    }

    #[test]
    fn new_rejects_plane_stress() {
        let mesh = SampleMeshes::one_qua4();
        let param = sample_param();
        let base = FemBase::new(&mesh, [(1, Elem::Porous(param))]).unwrap();
        let ideal = Idealization::plane_stress(1.0);
        assert!(ElementPorous::new(&mesh, &base.dofs, &mesh.cells[0], &param, &ideal).is_err());
    }

    #[test]
    fn coupling_block_transfers_pressure_to_forces() {
        // uniform Δp = 1 with zero displacements: Δf_u = -Q·1 must pull the
        // element inward along the outward normals (total force balance = 0)
        let mesh = SampleMeshes::one_qua4();
        let param = sample_param();
        let base = FemBase::new(&mesh, [(1, Elem::Porous(param))]).unwrap();
        let ideal = Idealization::plane_strain(1.0);
        let mut elem = ElementPorous::new(&mesh, &base.dofs, &mesh.cells[0], &param, &ideal).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();
        let ndof = 12; // 4 nodes x 2 u-dofs + 4 pw
        let mut duu = Vector::new(base.dofs.n_dof);
        // set Δp = 1 at all pw tids (local slots 8..12 map to pw)
        for local in 8..12 {
            duu[elem.local_to_global()[local]] = 1.0;
        }
        let mut dff = Vector::new(base.dofs.n_dof);
        elem.update(&mut state, &duu, &mut dff).unwrap();
        // the u-forces sum to zero and are nonzero individually
        let (mut sum_fx, mut sum_fy, mut max_abs) = (0.0, 0.0, 0.0_f64);
        for local in 0..8 {
            let f = dff[elem.local_to_global()[local]];
            if local % 2 == 0 {
                sum_fx += f;
            } else {
                sum_fy += f;
            }
            max_abs = max_abs.max(f.abs());
        }
        approx_eq(sum_fx, 0.0, 1e-12);
        approx_eq(sum_fy, 0.0, 1e-12);
        assert!(max_abs > 0.1);
        // uniform pressure produces no internal flux
        for local in 8..12 {
            approx_eq(dff[elem.local_to_global()[local]], 0.0, 1e-12);
        }
        // stiffness has the same structure: upper-right block is -Q
        let mut kk = Matrix::new(ndof, ndof);
        elem.stiffness(&mut kk, &state).unwrap();
        let mut fx_from_kk = 0.0;
        for j in 8..12 {
            fx_from_kk += kk.get(0, j);
        }
        approx_eq(fx_from_kk, dff[elem.local_to_global()[0]], 1e-12);
    }
}
