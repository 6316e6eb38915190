use super::{Dofs, ElementTrait, FemState};
use crate::base::{Elem, Error, ParamRod, Result};
use crate::material::Axial1D;
use crate::mesh::{Cell, CellId, Mesh};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Implements the truss/bar element with axial elastoplasticity
///
/// The axial operator is the 1-row strain-displacement matrix projected by
/// the direction cosines; the strain is constant over the bar, so a single
/// material point is carried.
pub struct ElementRod {
    /// Cell id
    cell_id: CellId,

    /// Space dimension
    ndim: usize,

    /// Local-to-global map (stable DOF ids)
    local_to_global: Vec<usize>,

    /// Direction cosines of the bar axis
    cosines: Vec<f64>,

    /// Bar length
    length: f64,

    /// Cross-sectional area
    area: f64,

    /// Axial material model
    model: Axial1D,

    /// Workspace: local displacement increment
    duu_local: Vector,
}

impl ElementRod {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, dofs: &Dofs, cell: &Cell, param: &ParamRod) -> Result<Self> {
        if cell.points.len() != 2 {
            return Err(Error::validation("number of nodes for Rod must be 2"));
        }
        param.validate()?;
        let ndim = mesh.ndim;
        let xa = &mesh.nodes[cell.points[0]].coords;
        let xb = &mesh.nodes[cell.points[1]].coords;
        let mut length = 0.0;
        for j in 0..ndim {
            length += (xb[j] - xa[j]) * (xb[j] - xa[j]);
        }
        let length = f64::sqrt(length);
        if length <= 0.0 {
            return Err(Error::validation("Rod length must be positive"));
        }
        let cosines: Vec<f64> = (0..ndim).map(|j| (xb[j] - xa[j]) / length).collect();
        let model = match param.sig_y {
            Some(sig_y) => Axial1D::new(param.young, sig_y, param.hh)?,
            None => Axial1D::new_elastic(param.young)?,
        };
        Ok(ElementRod {
            cell_id: cell.id,
            ndim,
            local_to_global: dofs.cell_tids(ndim, &Elem::Rod(*param), cell)?,
            cosines,
            length,
            area: param.area,
            model,
            duu_local: Vector::new(2 * ndim),
        })
    }

    /// Returns the axial state of this bar
    fn axial_state<'a>(&self, state: &'a FemState) -> Result<&'a crate::material::AxialState> {
        match &state.gauss[self.cell_id] {
            crate::fem::CellState::Rod { ip } => Ok(ip),
            _ => Err(Error::validation("cell state does not hold a rod state")),
        }
    }
}

impl ElementTrait for ElementRod {
    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn initialize_state(&mut self, state: &mut FemState) -> Result<()> {
        let ip = self.axial_state(state)?;
        let f = self.model.yield_function(ip);
        if f > crate::base::YIELD_TOL {
            return Err(Error::state(f, "initial stress state is outside the yield surface").with_element(self.cell_id));
        }
        Ok(())
    }

    fn stiffness(&mut self, kk: &mut Matrix, state: &FemState) -> Result<()> {
        let ip = self.axial_state(state)?;
        let k = self.model.tangent(ip) * self.area / self.length;
        let ndim = self.ndim;
        for i in 0..ndim {
            for j in 0..ndim {
                let v = k * self.cosines[i] * self.cosines[j];
                kk.set(i, j, v);
                kk.set(i, ndim + j, -v);
                kk.set(ndim + i, j, -v);
                kk.set(ndim + i, ndim + j, v);
            }
        }
        Ok(())
    }

    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        for (local, tid) in self.local_to_global.iter().enumerate() {
            self.duu_local[local] = duu[*tid];
        }
        // Δε = c · (Δu_b - Δu_a) / L
        let mut deps = 0.0;
        for j in 0..self.ndim {
            deps += self.cosines[j] * (self.duu_local[self.ndim + j] - self.duu_local[j]) / self.length;
        }
        let dsig = match &mut state.gauss[self.cell_id] {
            crate::fem::CellState::Rod { ip } => self
                .model
                .update_stress(ip, deps)
                .map_err(|e| e.with_element(self.cell_id))?,
            _ => return Err(Error::validation("cell state does not hold a rod state")),
        };
        // ΔF = Δσ A (-c | +c)
        let df = dsig * self.area;
        for j in 0..self.ndim {
            dff_int[self.local_to_global[j]] -= df * self.cosines[j];
            dff_int[self.local_to_global[self.ndim + j]] += df * self.cosines[j];
        }
        Ok(())
    }

    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()> {
        let ip = self.axial_state(state)?;
        let f = ip.sig * self.area;
        for j in 0..self.ndim {
            ff[self.local_to_global[j]] -= f * self.cosines[j];
            ff[self.local_to_global[self.ndim + j]] += f * self.cosines[j];
        }
        Ok(())
    }

    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>> {
        let ip = self.axial_state(state)?;
        let mut map = HashMap::new();
        map.insert("sig_axial".to_string(), ip.sig);
        map.insert("eps_axial".to_string(), ip.eps);
        map.insert("force_axial".to_string(), ip.sig * self.area);
        map.insert("plastic".to_string(), if ip.elastic { 0.0 } else { 1.0 });
        Ok(vec![map])
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
