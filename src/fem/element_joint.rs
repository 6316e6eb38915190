use super::{Dofs, ElementTrait, FemState};
use crate::base::{Elem, Error, ParamJoint, Result};
use crate::material::Axial1D;
use crate::mesh::{Cell, CellId, Mesh};
use crate::shapes::{integration_rule, Pad};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Holds the fixed per-integration-point data of a joint
///
/// The quadrature layout is fixed at setup time, so the inverse mapping and
/// the local basis are computed once and cached here.
struct JointIpData {
    /// Rotation matrix: rows are the tangent and the normal direction(s)
    rr: Matrix,

    /// Bar shape functions at the point
    nn_rod: Vector,

    /// Host shape functions at the (inverse-mapped) point
    nn_host: Vector,

    /// Integration coefficient (perimeter x line scale x weight)
    coef: f64,
}

/// Builds the rotation matrix whose first row is the given unit tangent
fn rotation_from_tangent(ndim: usize, tangent: &Vector) -> Matrix {
    let mut rr = Matrix::new(ndim, ndim);
    for j in 0..ndim {
        rr.set(0, j, tangent[j]);
    }
    if ndim == 2 {
        rr.set(1, 0, -tangent[1]);
        rr.set(1, 1, tangent[0]);
    } else {
        // pick the axis least aligned with the tangent
        let mut axis = [0.0; 3];
        let mut k_min = 0;
        for k in 1..3 {
            if tangent[k].abs() < tangent[k_min].abs() {
                k_min = k;
            }
        }
        axis[k_min] = 1.0;
        // n1 = normalize(e - (e·t) t)
        let dot = axis[0] * tangent[0] + axis[1] * tangent[1] + axis[2] * tangent[2];
        let mut n1 = [0.0; 3];
        let mut norm = 0.0;
        for j in 0..3 {
            n1[j] = axis[j] - dot * tangent[j];
            norm += n1[j] * n1[j];
        }
        let norm = f64::sqrt(norm);
        for j in 0..3 {
            rr.set(1, j, n1[j] / norm);
        }
        // n2 = t x n1
        rr.set(2, 0, tangent[1] * rr.get(1, 2) - tangent[2] * rr.get(1, 1));
        rr.set(2, 1, tangent[2] * rr.get(1, 0) - tangent[0] * rr.get(1, 2));
        rr.set(2, 2, tangent[0] * rr.get(1, 1) - tangent[1] * rr.get(1, 0));
    }
    rr
}

/// Implements the line joint along a bar crossing a continuum host
///
/// The relative-displacement operator combines the bar shape functions, the
/// host shape functions at the inverse-mapped point, and the local basis
/// rotation aligning the bar tangent with the first axis:
///
/// ```text
/// w = R (N_rod·u_rod - N_host·u_host)
/// K_e = Σ_ip Bᵀ · D · B · perimeter · scale · w_ip
/// ```
pub struct ElementJointLine {
    /// Cell id
    cell_id: CellId,

    /// Space dimension
    ndim: usize,

    /// Number of host nodes
    nh: usize,

    /// Local-to-global map: bar DOFs first, then host DOFs
    local_to_global: Vec<usize>,

    /// Cached per-integration-point data
    ip_data: Vec<JointIpData>,

    /// Tangential (slip) material model
    model: Axial1D,

    /// Normal stiffness
    kn: f64,

    /// Workspace: relative-displacement operator (ndim, ndof)
    bb: Matrix,

    /// Workspace: local increment
    duu_local: Vector,
}

impl ElementJointLine {
    /// Allocates a new instance
    ///
    /// The inverse mapping of the bar integration points into the host
    /// reference coordinates runs here and fails with a Convergence error if
    /// the Newton solve does not find the point.
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamJoint) -> Result<Self> {
        param.validate()?;
        let host_id = cell.host.ok_or(Error::validation("JointLine requires host and rod element links"))?;
        let ndim = mesh.ndim;
        let host_cell = &mesh.cells[host_id];
        if cell.points.len() != 2 + host_cell.points.len() {
            return Err(Error::validation("JointLine connectivity must list the bar nodes then the host nodes"));
        }
        let nh = host_cell.points.len();

        let mut pad_rod = Pad::new(ndim, crate::shapes::GeoKind::Lin2)?;
        mesh.set_pad(&mut pad_rod, &cell.points[0..2]);
        let mut pad_host = Pad::new(ndim, host_cell.kind)?;
        mesh.set_pad(&mut pad_host, &host_cell.points);

        let ips = integration_rule(crate::shapes::GeoKind::Lin2);
        let mut ip_data = Vec::with_capacity(ips.len());
        let mut x_ip = Vector::new(ndim);
        let mut tangent = Vector::new(ndim);
        for ip in ips {
            let scale = pad_rod.calc_tangent(&mut tangent, &ip[0..1])?;
            pad_rod.calc_interp(&ip[0..1]);
            let nn_rod = pad_rod.interp.clone();
            pad_rod.calc_coords(&mut x_ip, &ip[0..1]);
            let mut ksi_host = [0.0; 3];
            pad_host
                .approximate_ksi(&mut ksi_host[0..ndim], x_ip.as_data())
                .map_err(|e| e.with_element(cell.id))?;
            pad_host.calc_interp(&ksi_host[0..ndim]);
            ip_data.push(JointIpData {
                rr: rotation_from_tangent(ndim, &tangent),
                nn_rod,
                nn_host: pad_host.interp.clone(),
                coef: param.perimeter * scale * ip[3],
            });
        }

        let ndof = (2 + nh) * ndim;
        Ok(ElementJointLine {
            cell_id: cell.id,
            ndim,
            nh,
            local_to_global: dofs.cell_tids(ndim, &Elem::JointLine(*param), cell)?,
            ip_data,
            model: Axial1D::new(param.ks, param.sig_y, param.hh)?,
            kn: param.kn,
            bb: Matrix::new(ndim, ndof),
            duu_local: Vector::new(ndof),
        })
    }

    /// Fills the relative-displacement operator for one integration point
    fn calc_bb(&mut self, p: usize) {
        let data = &self.ip_data[p];
        self.bb.fill(0.0);
        for i in 0..self.ndim {
            for j in 0..self.ndim {
                let r = data.rr.get(i, j);
                for m in 0..2 {
                    self.bb.set(i, m * self.ndim + j, r * data.nn_rod[m]);
                }
                for m in 0..self.nh {
                    self.bb.set(i, (2 + m) * self.ndim + j, -r * data.nn_host[m]);
                }
            }
        }
    }

    /// Returns the joint states of this cell
    fn joint_ips<'a>(&self, state: &'a FemState) -> Result<&'a Vec<super::JointIpState>> {
        match &state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => Ok(ips),
            _ => Err(Error::validation("cell state does not hold joint states")),
        }
    }
}

impl ElementTrait for ElementJointLine {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn initialize_state(&mut self, state: &mut FemState) -> Result<()> {
        for ip in self.joint_ips(state)? {
            let f = self.model.yield_function(&ip.tangential);
            if f > crate::base::YIELD_TOL {
                return Err(Error::state(f, "initial stress state is outside the yield surface").with_element(self.cell_id));
            }
        }
        Ok(())
    }

    fn stiffness(&mut self, kk: &mut Matrix, state: &FemState) -> Result<()> {
        let ndof = (2 + self.nh) * self.ndim;
        kk.fill(0.0);
        let tangents: Vec<f64> = self
            .joint_ips(state)?
            .iter()
            .map(|ip| self.model.tangent(&ip.tangential))
            .collect();
        for p in 0..self.ip_data.len() {
            self.calc_bb(p);
            let coef = self.ip_data[p].coef;
            for i in 0..ndof {
                for j in 0..ndof {
                    // D = diag(ks_t, kn, kn)
                    let mut sum = self.bb.get(0, i) * tangents[p] * self.bb.get(0, j);
                    for d in 1..self.ndim {
                        sum += self.bb.get(d, i) * self.kn * self.bb.get(d, j);
                    }
                    kk.set(i, j, kk.get(i, j) + sum * coef);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        let ndof = (2 + self.nh) * self.ndim;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = duu[*tid];
        }
        let mut ff_local = vec![0.0; ndof];
        for p in 0..self.ip_data.len() {
            self.calc_bb(p);
            let coef = self.ip_data[p].coef;
            // Δw = B ΔU (local relative displacement)
            let mut dw = [0.0; 3];
            for i in 0..self.ndim {
                for j in 0..ndof {
                    dw[i] += self.bb.get(i, j) * self.duu_local[j];
                }
            }
            // traction increment: tangential return mapping, elastic normal
            let mut dt = [0.0; 3];
            match &mut state.gauss[self.cell_id] {
                crate::fem::CellState::Joint { ips } => {
                    dt[0] = self
                        .model
                        .update_stress(&mut ips[p].tangential, dw[0])
                        .map_err(|e| e.with_element(self.cell_id))?;
                    for d in 1..self.ndim {
                        dt[d] = self.kn * dw[d];
                        ips[p].sig_n[d - 1] += dt[d];
                    }
                }
                _ => return Err(Error::validation("cell state does not hold joint states")),
            }
            for j in 0..ndof {
                let mut sum = 0.0;
                for i in 0..self.ndim {
                    sum += self.bb.get(i, j) * dt[i];
                }
                ff_local[j] += sum * coef;
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            dff_int[*tid] += ff_local[local];
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        let ndof = (2 + self.nh) * self.ndim;
        let tractions: Vec<[f64; 3]> = self
            .joint_ips(state)?
            .iter()
            .map(|ip| [ip.tangential.sig, ip.sig_n[0], ip.sig_n[1]])
            .collect();
        let mut ff_local = vec![0.0; ndof];
        for p in 0..self.ip_data.len() {
            self.calc_bb(p);
            let coef = self.ip_data[p].coef;
            for j in 0..ndof {
                let mut sum = 0.0;
                for i in 0..self.ndim {
                    sum += self.bb.get(i, j) * tractions[p][i];
                }
                ff_local[j] += sum * coef;
            }
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            ff[*tid] += ff_local[local];
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        Ok(self
            .joint_ips(state)?
            .iter()
            .map(|ip| {
                let mut map = HashMap::new();
                map.insert("sig_tangential".to_string(), ip.tangential.sig);
                map.insert("sig_normal".to_string(), ip.sig_n[0]);
                map.insert("plastic".to_string(), if ip.tangential.elastic { 0.0 } else { 1.0 });
                map
            })
            .collect())
    }
}

/// Implements the punctual joint connecting a bar node to a continuum host
///
/// A single connection point carries the spring stiffnesses directly (units
/// of force per length); the tangent direction comes from the linked bar.
pub struct ElementJointPoint {
    /// Cell id
    cell_id: CellId,

    /// Space dimension
    ndim: usize,

    /// Number of host nodes
    nh: usize,

    /// Local-to-global map: bar-node DOFs first, then host DOFs
    local_to_global: Vec<usize>,

    /// Rotation matrix from the bar tangent
    rr: Matrix,

    /// Host shape functions at the connection point
    nn_host: Vector,

    /// Tangential (slip) material model
    model: Axial1D,

    /// Normal stiffness
    kn: f64,

    /// Workspace: relative-displacement operator (ndim, ndof)
    bb: Matrix,

    /// Workspace: local increment
    duu_local: Vector,
}

impl ElementJointPoint {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamJoint) -> Result<Self> {
        param.validate()?;
        let host_id = cell.host.ok_or(Error::validation("JointPoint requires host and rod element links"))?;
        let rod_id = cell.rod.ok_or(Error::validation("JointPoint requires host and rod element links"))?;
        let ndim = mesh.ndim;
        let host_cell = &mesh.cells[host_id];
        if cell.points.len() != 1 + host_cell.points.len() {
            return Err(Error::validation("JointPoint connectivity must list the bar node then the host nodes"));
        }
        let nh = host_cell.points.len();

        // tangent from the linked bar geometry
        let rod_cell = &mesh.cells[rod_id];
        let xa = &mesh.nodes[rod_cell.points[0]].coords;
        let xb = &mesh.nodes[rod_cell.points[1]].coords;
        let mut tangent = Vector::new(ndim);
        let mut length = 0.0;
        for j in 0..ndim {
            tangent[j] = xb[j] - xa[j];
            length += tangent[j] * tangent[j];
        }
        let length = f64::sqrt(length);
        if length <= 0.0 {
            return Err(Error::validation("linked bar length must be positive"));
        }
        for j in 0..ndim {
            tangent[j] /= length;
        }

        // inverse-map the connection point into the host
        let mut pad_host = Pad::new(ndim, host_cell.kind)?;
        mesh.set_pad(&mut pad_host, &host_cell.points);
        let x_point = &mesh.nodes[cell.points[0]].coords;
        let mut ksi_host = [0.0; 3];
        pad_host
            .approximate_ksi(&mut ksi_host[0..ndim], x_point)
            .map_err(|e| e.with_element(cell.id))?;
        pad_host.calc_interp(&ksi_host[0..ndim]);

        let ndof = (1 + nh) * ndim;
        Ok(ElementJointPoint {
            cell_id: cell.id,
            ndim,
            nh,
            local_to_global: dofs.cell_tids(ndim, &Elem::JointPoint(*param), cell)?,
            rr: rotation_from_tangent(ndim, &tangent),
            nn_host: pad_host.interp.clone(),
            model: Axial1D::new(param.ks, param.sig_y, param.hh)?,
            kn: param.kn,
            bb: Matrix::new(ndim, ndof),
            duu_local: Vector::new(ndof),
        })
    }

    /// Fills the relative-displacement operator
    fn calc_bb(&mut self) {
        self.bb.fill(0.0);
        for i in 0..self.ndim {
            for j in 0..self.ndim {
                let r = self.rr.get(i, j);
                self.bb.set(i, j, r);
                for m in 0..self.nh {
                    self.bb.set(i, (1 + m) * self.ndim + j, -r * self.nn_host[m]);
                }
            }
        }
    }
}

impl ElementTrait for ElementJointPoint {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn initialize_state(&mut self, state: &mut FemState) -> Result<()> {
        match &state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => {
                let f = self.model.yield_function(&ips[0].tangential);
                if f > crate::base::YIELD_TOL {
                    return Err(
                        Error::state(f, "initial stress state is outside the yield surface").with_element(self.cell_id)
                    );
                }
                Ok(())
            }
            _ => Err(Error::validation("cell state does not hold joint states")),
        }
    }

    fn stiffness(&mut self, kk: &mut Matrix, state: &FemState) -> Result<()> {
        let ndof = (1 + self.nh) * self.ndim;
        let ks_t = match &state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => self.model.tangent(&ips[0].tangential),
            _ => return Err(Error::validation("cell state does not hold joint states")),
        };
        self.calc_bb();
        kk.fill(0.0);
        for i in 0..ndof {
            for j in 0..ndof {
                let mut sum = self.bb.get(0, i) * ks_t * self.bb.get(0, j);
                for d in 1..self.ndim {
                    sum += self.bb.get(d, i) * self.kn * self.bb.get(d, j);
                }
                kk.set(i, j, sum);
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        let ndof = (1 + self.nh) * self.ndim;
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = duu[*tid];
        }
        self.calc_bb();
        let mut dw = [0.0; 3];
        for i in 0..self.ndim {
            for j in 0..ndof {
                dw[i] += self.bb.get(i, j) * self.duu_local[j];
            }
        }
        let mut dt = [0.0; 3];
        match &mut state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => {
                dt[0] = self
                    .model
                    .update_stress(&mut ips[0].tangential, dw[0])
                    .map_err(|e| e.with_element(self.cell_id))?;
                for d in 1..self.ndim {
                    dt[d] = self.kn * dw[d];
                    ips[0].sig_n[d - 1] += dt[d];
                }
            }
            _ => return Err(Error::validation("cell state does not hold joint states")),
        }
        for (local, tid) in self.local_to_global.iter().enumerate() {
            let mut sum = 0.0;
            for i in 0..self.ndim {
                sum += self.bb.get(i, local) * dt[i];
            }
            dff_int[*tid] += sum;
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        let traction = match &state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => [ips[0].tangential.sig, ips[0].sig_n[0], ips[0].sig_n[1]],
            _ => return Err(Error::validation("cell state does not hold joint states")),
        };
        self.calc_bb();
        for (local, tid) in self.local_to_global.iter().enumerate() {
            let mut sum = 0.0;
            for i in 0..self.ndim {
                sum += self.bb.get(i, local) * traction[i];
            }
            ff[*tid] += sum;
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        match &state.gauss[self.cell_id] {
            crate::fem::CellState::Joint { ips } => {
                let mut map = HashMap::new();
                map.insert("sig_tangential".to_string(), ips[0].tangential.sig);
                map.insert("sig_normal".to_string(), ips[0].sig_n[0]);
                map.insert("plastic".to_string(), if ips[0].tangential.elastic { 0.0 } else { 1.0 });
                Ok(vec![map])
            }
            _ => Err(Error::validation("cell state does not hold joint states")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{rotation_from_tangent, ElementJointLine};
    use crate::base::{Elem, ParamJoint, ParamRod, ParamSolid, SampleMeshes};
    use crate::fem::{ElementTrait, FemBase, FemState};
    use russell_lab::{approx_eq, Matrix, Vector};

    fn sample_joint_param() -> ParamJoint {
        ParamJoint {
            ks: 100.0,
            kn: 1000.0,
            sig_y: 5.0,
            hh: 0.0,
            perimeter: 0.2,
        }
    }

    fn sample_base() -> (crate::mesh::Mesh, FemBase) {
        let mesh = SampleMeshes::bar_in_qua4();
        let base = FemBase::new(
            &mesh,
            [
                (1, Elem::Solid(ParamSolid::sample_linear_elastic())),
                (2, Elem::Rod(ParamRod::sample_elastic())),
                (3, Elem::JointLine(sample_joint_param())),
            ],
        )
        .unwrap();
        (mesh, base)
    }

    #[test]
    fn rotation_is_orthonormal() {
        for tangent in [[0.6, 0.8], [1.0, 0.0]] {
            let mut t = Vector::new(2);
            t[0] = tangent[0];
            t[1] = tangent[1];
            let rr = rotation_from_tangent(2, &t);
            for i in 0..2 {
                for j in 0..2 {
                    let mut dot = 0.0;
                    for k in 0..2 {
                        dot += rr.get(i, k) * rr.get(j, k);
                    }
                    let correct = if i == j { 1.0 } else { 0.0 };
                    approx_eq(dot, correct, 1e-14);
                }
            }
        }
        let mut t = Vector::new(3);
        t[2] = 1.0;
        let rr = rotation_from_tangent(3, &t);
        for i in 0..3 {
            let mut norm = 0.0;
            for k in 0..3 {
                norm += rr.get(i, k) * rr.get(i, k);
            }
            approx_eq(norm, 1.0, 1e-14);
        }
    }

    #[test]
    fn rigid_common_motion_produces_no_force() {
        // moving bar and host together gives zero relative displacement
        let (mesh, base) = sample_base();
        let param = sample_joint_param();
        let mut joint = ElementJointLine::new(&mesh, &base.dofs, &mesh.cells[2], &param).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();
        let mut duu = Vector::new(base.dofs.n_dof);
        duu.fill(1e-3); // uniform translation of every DOF
        let mut dff = Vector::new(base.dofs.n_dof);
        joint.update(&mut state, &duu, &mut dff).unwrap();
        for i in 0..base.dofs.n_dof {
            approx_eq(dff[i], 0.0, 1e-12);
        }
    }

    #[test]
    fn bar_slip_mobilizes_tangential_traction() {
        // move only the bar along x: tangential slip on both ips
        let (mesh, base) = sample_base();
        let param = sample_joint_param();
        let mut joint = ElementJointLine::new(&mesh, &base.dofs, &mesh.cells[2], &param).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();
        let mut duu = Vector::new(base.dofs.n_dof);
        let slip = 1e-3;
        for node in [4, 5] {
            let tid = base.dofs.tid(node, crate::base::Dof::Ux).unwrap();
            duu[tid] = slip;
        }
        let mut dff = Vector::new(base.dofs.n_dof);
        joint.update(&mut state, &duu, &mut dff).unwrap();
        match &state.gauss[2] {
            crate::fem::CellState::Joint { ips } => {
                for ip in ips {
                    approx_eq(ip.tangential.sig, param.ks * slip, 1e-12);
                    approx_eq(ip.sig_n[0], 0.0, 1e-15);
                }
            }
            _ => panic!("wrong state"),
        }
        // the total tangential force is τ * perimeter * length
        let mut fx_bar = 0.0;
        for node in [4, 5] {
            let tid = base.dofs.tid(node, crate::base::Dof::Ux).unwrap();
            fx_bar += dff[tid];
        }
        approx_eq(fx_bar, param.ks * slip * param.perimeter * 1.0, 1e-12);
        // equilibrium: host receives the opposite force
        let mut fx_host = 0.0;
        for node in [0, 1, 2, 3] {
            let tid = base.dofs.tid(node, crate::base::Dof::Ux).unwrap();
            fx_host += dff[tid];
        }
        approx_eq(fx_bar + fx_host, 0.0, 1e-12);
    }

    #[test]
    fn stiffness_is_symmetric() {
        let (mesh, base) = sample_base();
        let param = sample_joint_param();
        let mut joint = ElementJointLine::new(&mesh, &base.dofs, &mesh.cells[2], &param).unwrap();
        let state = FemState::new(&mesh, &base).unwrap();
        let ndof = 12;
        let mut kk = Matrix::new(ndof, ndof);
        joint.stiffness(&mut kk, &state).unwrap();
        for i in 0..ndof {
            for j in 0..ndof {
                approx_eq(kk.get(i, j), kk.get(j, i), 1e-12);
            }
        }
    }

    #[test]
    fn punctual_joint_connects_a_bar_node_to_the_host() {
        use super::ElementJointPoint;
        use crate::mesh::Cell;
        use crate::shapes::GeoKind;
        let mut mesh = SampleMeshes::bar_in_qua4();
        let mut point_joint = Cell::new(3, 4, GeoKind::Lin2, vec![4, 0, 1, 2, 3]);
        point_joint.host = Some(0);
        point_joint.rod = Some(1);
        mesh.cells.push(point_joint);
        let param = sample_joint_param();
        let base = FemBase::new(
            &mesh,
            [
                (1, Elem::Solid(ParamSolid::sample_linear_elastic())),
                (2, Elem::Rod(ParamRod::sample_elastic())),
                (3, Elem::JointLine(param)),
                (4, Elem::JointPoint(param)),
            ],
        )
        .unwrap();
        let mut joint = ElementJointPoint::new(&mesh, &base.dofs, &mesh.cells[3], &param).unwrap();
        let mut state = FemState::new(&mesh, &base).unwrap();

        // slip the bar node along the bar axis with the host at rest
        let slip = 1e-3;
        let mut duu = Vector::new(base.dofs.n_dof);
        duu[base.dofs.tid(4, crate::base::Dof::Ux).unwrap()] = slip;
        let mut dff = Vector::new(base.dofs.n_dof);
        joint.update(&mut state, &duu, &mut dff).unwrap();
        match &state.gauss[3] {
            crate::fem::CellState::Joint { ips } => {
                approx_eq(ips[0].tangential.sig, param.ks * slip, 1e-12);
            }
            _ => panic!("wrong state"),
        }
        // the bar node carries the spring force; the host balances it
        let f_bar = dff[base.dofs.tid(4, crate::base::Dof::Ux).unwrap()];
        approx_eq(f_bar, param.ks * slip, 1e-12);
        let mut f_host = 0.0;
        for node in [0, 1, 2, 3] {
            f_host += dff[base.dofs.tid(node, crate::base::Dof::Ux).unwrap()];
        }
        approx_eq(f_bar + f_host, 0.0, 1e-12);
    }
}
