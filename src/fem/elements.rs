use super::{
    ElementJointLine, ElementJointPoint, ElementPorous, ElementRod, ElementSeepage, ElementSolid, ElementTrait,
    FemBase, FemState,
};
use crate::base::{Elem, Error, Idealization, Result};
use crate::mesh::{CellId, Mesh};
use russell_lab::{Matrix, Vector};

/// Holds one element model and its local stiffness workspace
pub struct GenericElement {
    /// Actual element kernel
    pub actual: Box<dyn ElementTrait>,

    /// Local stiffness matrix workspace
    pub kk: Matrix,
}

/// Holds the collection of element models (closed set of variants)
pub struct Elements {
    /// All elements, one per cell
    pub all: Vec<GenericElement>,

    /// Number of nodes in the mesh (for reference counting)
    nnode_mesh: usize,

    /// Connectivity copy for activation bookkeeping
    connectivity: Vec<Vec<usize>>,
}

impl Elements {
    /// Allocates all element models from the mesh and the attribute map
    pub fn new(mesh: &Mesh, base: &FemBase, ideal: &Idealization) -> Result<Self> {
        if ideal.ndim() != mesh.ndim {
            return Err(Error::validation("idealization dimension must match the mesh dimension"));
        }
        let mut all = Vec::with_capacity(mesh.cells.len());
        for cell in &mesh.cells {
            let elem = base.get_elem(cell)?;
            let actual: Box<dyn ElementTrait> = match elem {
                Elem::Solid(p) => Box::new(ElementSolid::new(mesh, &base.dofs, cell, p, ideal)?),
                Elem::Rod(p) => Box::new(ElementRod::new(mesh, &base.dofs, cell, p)?),
                Elem::JointLine(p) => Box::new(ElementJointLine::new(mesh, &base.dofs, cell, p)?),
                Elem::JointPoint(p) => Box::new(ElementJointPoint::new(mesh, &base.dofs, cell, p)?),
                Elem::Seepage(p) => Box::new(ElementSeepage::new(mesh, &base.dofs, cell, p, ideal)?),
                Elem::Porous(p) => Box::new(ElementPorous::new(mesh, &base.dofs, cell, p, ideal)?),
            };
            let n = actual.local_to_global().len();
            all.push(GenericElement {
                actual,
                kk: Matrix::new(n, n),
            });
        }
        Ok(Elements {
            all,
            nnode_mesh: mesh.nodes.len(),
            connectivity: mesh.cells.iter().map(|c| c.points.clone()).collect(),
        })
    }

    /// Initializes/validates the material states of all active elements
    pub fn initialize_states(&mut self, state: &mut FemState) -> Result<()> {
        for (cell_id, element) in self.all.iter_mut().enumerate() {
            if state.active[cell_id] {
                element.actual.initialize_state(state)?;
            }
        }
        Ok(())
    }

    /// Returns the supremum of the number of nonzeros in the global matrix
    pub fn nnz_sup(&self, active: &[bool]) -> usize {
        self.all
            .iter()
            .enumerate()
            .filter(|(i, _)| active[*i])
            .map(|(_, e)| {
                let n = e.actual.local_to_global().len();
                n * n
            })
            .sum()
    }

    /// Flags the DOFs used by at least one active element
    pub fn used_tids(&self, n_dof: usize, active: &[bool]) -> Vec<bool> {
        let mut used = vec![false; n_dof];
        for (cell_id, element) in self.all.iter().enumerate() {
            if active[cell_id] {
                for tid in element.actual.local_to_global() {
                    used[*tid] = true;
                }
            }
        }
        used
    }

    /// Counts, for every node, the number of active elements referencing it
    pub fn node_ref_counts(&self, active: &[bool]) -> Vec<usize> {
        let mut counts = vec![0; self.nnode_mesh];
        for (cell_id, points) in self.connectivity.iter().enumerate() {
            if active[cell_id] {
                for p in points {
                    counts[*p] += 1;
                }
            }
        }
        counts
    }

    /// Invokes `update` on every active element (side-effecting)
    pub fn update_all(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()> {
        for (cell_id, element) in self.all.iter_mut().enumerate() {
            if state.active[cell_id] {
                element.actual.update(state, duu, dff_int)?;
            }
        }
        Ok(())
    }

    /// Deactivates an element, transferring its stress resultant
    ///
    /// The internal resultant is removed from the accumulated internal
    /// forces; on nodes still referenced by another active element, an
    /// equivalent natural value keeps the nodal equilibrium. Orphan nodes
    /// receive no transfer (their DOFs leave the free partition at the next
    /// numbering). Reactivation is unsupported.
    pub fn deactivate(&mut self, cell_id: CellId, dofs: &super::Dofs, state: &mut FemState) -> Result<()> {
        if cell_id >= self.all.len() {
            return Err(Error::validation("cell id is out of range"));
        }
        if !state.active[cell_id] {
            return Err(Error::validation("element is already inactive"));
        }
        let n_dof = state.ff_int.dim();
        let mut resultant = Vector::new(n_dof);
        self.all[cell_id].actual.resultant(state, &mut resultant)?;
        state.active[cell_id] = false;
        let ref_counts = self.node_ref_counts(&state.active);

        // drop the contribution from the accumulated internal forces
        for tid in self.all[cell_id].actual.local_to_global() {
            state.ff_int[*tid] -= resultant[*tid];
        }
        // transfer the equivalent natural value on shared nodes only
        for p in &self.connectivity[cell_id] {
            if ref_counts[*p] > 0 {
                for (_, tid) in &dofs.point_dofs[*p] {
                    state.ff_ext[*tid] -= resultant[*tid];
                }
            }
        }
        Ok(())
    }

    /// Reactivation is not modeled
    pub fn activate(&mut self, _cell_id: CellId, _state: &mut FemState) -> Result<()> {
        Err(Error::validation("element reactivation is not supported"))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
