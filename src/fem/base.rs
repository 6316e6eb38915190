use super::Dofs;
use crate::base::{Elem, Error, Result};
use crate::mesh::{Cell, Mesh};
use std::collections::HashMap;

/// Holds the basic data of an analysis: attribute map and DOF registry
pub struct FemBase {
    /// Maps cell attributes to element models and parameters
    pub amap: HashMap<usize, Elem>,

    /// DOF registry (stable ids per (node, DOF) pair)
    pub dofs: Dofs,
}

impl FemBase {
    /// Allocates a new instance, validating all parameters
    pub fn new<const N: usize>(mesh: &Mesh, arr: [(usize, Elem); N]) -> Result<Self> {
        mesh.check()?;
        let amap = HashMap::from(arr);
        for elem in amap.values() {
            elem.validate()?;
        }
        let dofs = Dofs::new(mesh, &amap)?;
        Ok(FemBase { amap, dofs })
    }

    /// Returns the element model and parameters of a cell
    pub fn get_elem(&self, cell: &Cell) -> Result<&Elem> {
        self.amap
            .get(&cell.attribute)
            .ok_or(Error::validation("cannot find CellAttribute in the attributes map"))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
