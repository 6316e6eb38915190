use crate::base::{Dof, Elem, Error, Result};
use crate::mesh::{Cell, Mesh};
use crate::shapes::GeoKind;
use std::collections::{HashMap, HashSet};

/// Holds the DOF keys and local equation numbers of one cell kind
///
/// ```text
/// leq: local equation number       leq   node    dof
///                                   0 -> Ux @ 0
///                                   1 -> Uy @ 0
///                                   2 -> Ux @ 1
///                                   ...
///                                   8 -> Pw @ 0   <- eq_first_pw
/// ```
///
/// Displacement DOFs come first (all nodes), then the pore-pressure DOFs of
/// the corner nodes.
pub struct CellDofInfo {
    /// All cell DOF keys and local equation numbers (outer len = nnode)
    pub dof_equation_pairs: Vec<Vec<(Dof, usize)>>,

    /// Dimension of the local system of equations
    pub n_equation_local: usize,

    /// Local equation number of the first Dof::Pw
    pub eq_first_pw: Option<usize>,
}

/// Returns the number of corner nodes carrying the pressure DOF
fn n_corner(kind: GeoKind) -> usize {
    match kind {
        GeoKind::Tri6 => 3,
        GeoKind::Qua8 => 4,
        _ => kind.nnode(),
    }
}

/// Returns the DOF keys and local equation numbers for each cell node
///
/// This function also validates the geometry/model pairing: continuum models
/// require non-Lin kinds and Lin kinds are reserved for rods and joints.
pub fn cell_dof_info(ndim: usize, elem: &Elem, cell: &Cell) -> Result<CellDofInfo> {
    let kind = cell.kind;
    let nnode = kind.nnode();
    let mut dofs = vec![Vec::new(); cell.points.len()];
    let mut count = 0;
    let mut eq_first_pw = None;
    let push_displacements = |dofs: &mut Vec<Vec<(Dof, usize)>>, count: &mut usize, n: usize| {
        for m in 0..n {
            dofs[m].push((Dof::Ux, *count));
            *count += 1;
            dofs[m].push((Dof::Uy, *count));
            *count += 1;
            if ndim == 3 {
                dofs[m].push((Dof::Uz, *count));
                *count += 1;
            }
        }
    };
    match elem {
        Elem::Rod(..) => {
            if !kind.is_lin() {
                return Err(Error::validation("cannot set Rod with a non-Lin geometry kind"));
            }
            push_displacements(&mut dofs, &mut count, nnode);
        }
        Elem::Solid(..) => {
            if kind.is_lin() {
                return Err(Error::validation("Lin geometry kinds are reserved for Rod and joint models"));
            }
            push_displacements(&mut dofs, &mut count, nnode);
        }
        Elem::JointLine(..) => {
            if kind != GeoKind::Lin2 {
                return Err(Error::validation("JointLine requires the Lin2 geometry kind"));
            }
            if cell.host.is_none() || cell.rod.is_none() {
                return Err(Error::validation("JointLine requires host and rod element links"));
            }
            // bar nodes plus host nodes
            push_displacements(&mut dofs, &mut count, cell.points.len());
        }
        Elem::JointPoint(..) => {
            if cell.host.is_none() || cell.rod.is_none() {
                return Err(Error::validation("JointPoint requires host and rod element links"));
            }
            push_displacements(&mut dofs, &mut count, cell.points.len());
        }
        Elem::Seepage(..) => {
            if kind.is_lin() {
                return Err(Error::validation("Lin geometry kinds are reserved for Rod and joint models"));
            }
            for m in 0..nnode {
                dofs[m].push((Dof::Pw, count));
                count += 1;
            }
        }
        Elem::Porous(..) => {
            if kind.is_lin() {
                return Err(Error::validation("Lin geometry kinds are reserved for Rod and joint models"));
            }
            push_displacements(&mut dofs, &mut count, nnode);
            eq_first_pw = Some(count);
            for m in 0..n_corner(kind) {
                dofs[m].push((Dof::Pw, count));
                count += 1;
            }
        }
    }
    Ok(CellDofInfo {
        dof_equation_pairs: dofs,
        n_equation_local: count,
        eq_first_pw,
    })
}

/// Holds the registry of DOFs: one stable id (tid) per (node, DOF) pair
///
/// The tid numbering is independent of the prescribed/free partitioning,
/// which is (re)assigned per stage by [`crate::fem::Equations`].
pub struct Dofs {
    /// All DOFs and their stable ids, per node (sorted by DOF within a node)
    pub point_dofs: Vec<Vec<(Dof, usize)>>,

    /// Maps (node, DOF) to the stable id
    lookup: Vec<HashMap<Dof, usize>>,

    /// Total number of DOFs
    pub n_dof: usize,
}

impl Dofs {
    /// Allocates the registry from the mesh and the attribute map
    ///
    /// DOFs are created exactly once per (node, key) pair, regardless of how
    /// many elements share the node.
    pub fn new(mesh: &Mesh, amap: &HashMap<usize, Elem>) -> Result<Self> {
        let npoint = mesh.nodes.len();
        let mut memo: Vec<HashSet<Dof>> = vec![HashSet::new(); npoint];
        for cell in &mesh.cells {
            let elem = amap
                .get(&cell.attribute)
                .ok_or(Error::validation("cannot find CellAttribute in the attributes map"))?;
            let info = cell_dof_info(mesh.ndim, elem, cell)?;
            for (m, pairs) in info.dof_equation_pairs.iter().enumerate() {
                for (dof, _) in pairs {
                    memo[cell.points[m]].insert(*dof);
                }
            }
        }
        let mut point_dofs = vec![Vec::new(); npoint];
        let mut lookup = vec![HashMap::new(); npoint];
        let mut n_dof = 0;
        for point_id in 0..npoint {
            let mut sorted: Vec<_> = memo[point_id].iter().copied().collect();
            sorted.sort();
            for dof in sorted {
                point_dofs[point_id].push((dof, n_dof));
                lookup[point_id].insert(dof, n_dof);
                n_dof += 1;
            }
        }
        Ok(Dofs {
            point_dofs,
            lookup,
            n_dof,
        })
    }

    /// Returns the stable id of a (node, DOF) pair
    pub fn tid(&self, point_id: usize, dof: Dof) -> Result<usize> {
        if point_id >= self.lookup.len() {
            return Err(Error::validation("point id is out of range"));
        }
        self.lookup[point_id]
            .get(&dof)
            .copied()
            .ok_or(Error::validation("DOF is not available at this node"))
    }

    /// Returns the local-to-global (tid) map of a cell
    pub fn cell_tids(&self, ndim: usize, elem: &Elem, cell: &Cell) -> Result<Vec<usize>> {
        let info = cell_dof_info(ndim, elem, cell)?;
        let mut l2g = vec![0; info.n_equation_local];
        for (m, pairs) in info.dof_equation_pairs.iter().enumerate() {
            for (dof, local) in pairs {
                l2g[*local] = self.tid(cell.points[m], *dof)?;
            }
        }
        Ok(l2g)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
