use super::{Elements, FemBase, FemState};
use crate::base::{Dof, Result};
use crate::mesh::Mesh;
use crate::shapes::extrapolation_matrix;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Holds a result snapshot of a converged stage
///
/// Nodal fields are recovered from the integration points by the
/// least-squares extrapolation matrices and averaged over the patch of
/// elements sharing each node. Element fields are integration-point means.
#[derive(Clone, Debug, Serialize)]
pub struct ResultSnapshot {
    /// Node coordinates
    pub coords: Vec<Vec<f64>>,

    /// Displacement vector per node (ndim components)
    pub displacement: Vec<Vec<f64>>,

    /// Named nodal scalar fields (length = number of nodes)
    pub nodal: HashMap<String, Vec<f64>>,

    /// Named per-element scalar fields (length = number of cells; NaN for
    /// cells without the field)
    pub element: HashMap<String, Vec<f64>>,
}

/// Collects the nodal and element values of the current state
pub fn nodal_and_element_values(
    mesh: &Mesh,
    base: &FemBase,
    elements: &mut Elements,
    state: &FemState,
) -> Result<ResultSnapshot> {
    let ndim = mesh.ndim;
    let npoint = mesh.nodes.len();
    let ncell = mesh.cells.len();

    // coordinates and displacements (plus the pressure field, if present)
    let mut coords = Vec::with_capacity(npoint);
    let mut displacement = Vec::with_capacity(npoint);
    let mut has_pressure = false;
    for node in &mesh.nodes {
        coords.push(node.coords.clone());
        let mut u = vec![0.0; ndim];
        for (j, dof) in [Dof::Ux, Dof::Uy, Dof::Uz].iter().enumerate().take(ndim) {
            if let Ok(tid) = base.dofs.tid(node.id, *dof) {
                u[j] = state.uu[tid];
            }
        }
        if base.dofs.tid(node.id, Dof::Pw).is_ok() {
            has_pressure = true;
        }
        displacement.push(u);
    }
    let mut nodal: HashMap<String, Vec<f64>> = HashMap::new();
    if has_pressure {
        let mut wp = vec![0.0; npoint];
        for node in &mesh.nodes {
            if let Ok(tid) = base.dofs.tid(node.id, Dof::Pw) {
                wp[node.id] = state.uu[tid];
            }
        }
        nodal.insert("wp".to_string(), wp);
    }

    // recover integration-point fields
    let mut counts: HashMap<String, Vec<f64>> = HashMap::new();
    let mut element: HashMap<String, Vec<f64>> = HashMap::new();
    for cell in &mesh.cells {
        if !state.active[cell.id] {
            continue;
        }
        let ip_values = elements.all[cell.id].actual.ip_values(state)?;
        if ip_values.is_empty() {
            continue;
        }
        let keys: HashSet<&String> = ip_values.iter().flat_map(|map| map.keys()).collect();

        // element means
        for key in &keys {
            let mean: f64 = ip_values.iter().filter_map(|m| m.get(*key)).sum::<f64>() / (ip_values.len() as f64);
            element
                .entry((*key).clone())
                .or_insert_with(|| vec![f64::NAN; ncell])[cell.id] = mean;
        }

        // nodal recovery (continuum cells only)
        if cell.kind.is_lin() || ip_values.len() != crate::shapes::integration_rule(cell.kind).len() {
            continue;
        }
        let ee = extrapolation_matrix(cell.kind)?;
        let nnode = cell.kind.nnode();
        for key in &keys {
            let values = nodal.entry((*key).clone()).or_insert_with(|| vec![0.0; npoint]);
            let count = counts.entry((*key).clone()).or_insert_with(|| vec![0.0; npoint]);
            for m in 0..nnode {
                let mut v = 0.0;
                for (p, map) in ip_values.iter().enumerate() {
                    v += ee.get(m, p) * map.get(*key).copied().unwrap_or(0.0);
                }
                values[cell.points[m]] += v;
                count[cell.points[m]] += 1.0;
            }
        }
    }

    // patch averaging
    for (key, count) in &counts {
        if let Some(values) = nodal.get_mut(key) {
            for m in 0..npoint {
                if count[m] > 0.0 {
                    values[m] /= count[m];
                }
            }
        }
    }

    Ok(ResultSnapshot {
        coords,
        displacement,
        nodal,
        element,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
