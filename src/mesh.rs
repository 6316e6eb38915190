//! Arena mesh: nodes and cells addressed by stable integer ids
//!
//! The mesh is produced by an external mesh/geometry layer; this module only
//! defines the data consumed by the element kernels plus the thin queries
//! used to select nodes for boundary-condition setup.

use crate::base::{Error, Result};
use crate::shapes::{GeoKind, Pad};
use serde::{Deserialize, Serialize};

/// Defines the node id type
pub type NodeId = usize;

/// Defines the cell (element) id type
pub type CellId = usize;

/// Defines the cell attribute type (maps to element model + parameters)
pub type CellAttribute = usize;

/// Holds node data
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Node {
    /// Identification number (index in the nodes array)
    pub id: NodeId,

    /// Marker tag for queries (0 means untagged)
    pub marker: i32,

    /// Coordinates (len = ndim)
    pub coords: Vec<f64>,
}

/// Holds cell (element geometry) data
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Cell {
    /// Identification number (index in the cells array)
    pub id: CellId,

    /// Attribute selecting the element model and parameters
    pub attribute: CellAttribute,

    /// Geometry kind
    pub kind: GeoKind,

    /// Connectivity (node ids; joints list the crossing-bar nodes)
    pub points: Vec<NodeId>,

    /// Host continuum cell crossed by this joint (joints only)
    pub host: Option<CellId>,

    /// Embedded rod cell referenced by this joint (joints only)
    pub rod: Option<CellId>,
}

impl Cell {
    /// Allocates a new (non-joint) cell
    pub fn new(id: CellId, attribute: CellAttribute, kind: GeoKind, points: Vec<NodeId>) -> Self {
        Cell {
            id,
            attribute,
            kind,
            points,
            host: None,
            rod: None,
        }
    }
}

/// Holds the mesh data
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Mesh {
    /// Space dimension (2 or 3)
    pub ndim: usize,

    /// All nodes
    pub nodes: Vec<Node>,

    /// All cells
    pub cells: Vec<Cell>,
}

impl Mesh {
    /// Performs basic consistency checks
    pub fn check(&self) -> Result<()> {
        if self.ndim < 2 || self.ndim > 3 {
            return Err(Error::validation("ndim must be 2 or 3"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id != i {
                return Err(Error::validation("node ids must equal their position in the array"));
            }
            if node.coords.len() != self.ndim {
                return Err(Error::validation("node coordinates must have ndim components"));
            }
        }
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.id != i {
                return Err(Error::validation("cell ids must equal their position in the array"));
            }
            if cell.points.len() < cell.kind.nnode() {
                return Err(Error::validation("cell connectivity is incompatible with its geometry kind"));
            }
            for p in &cell.points {
                if *p >= self.nodes.len() {
                    return Err(Error::validation("cell references an out-of-range node id"));
                }
            }
            if let Some(h) = cell.host {
                if h >= self.cells.len() {
                    return Err(Error::validation("joint references an out-of-range host cell id"));
                }
            }
            if let Some(r) = cell.rod {
                if r >= self.cells.len() {
                    return Err(Error::validation("joint references an out-of-range rod cell id"));
                }
            }
        }
        Ok(())
    }

    /// Copies the coordinates of a cell's own nodes into a scratchpad
    pub fn set_pad(&self, pad: &mut Pad, points: &[NodeId]) {
        for (m, p) in points.iter().enumerate() {
            for j in 0..self.ndim {
                pad.set_xx(m, j, self.nodes[*p].coords[j]);
            }
        }
    }

    /// Finds node ids satisfying a coordinate predicate
    pub fn find_nodes<F>(&self, filter: F) -> Vec<NodeId>
    where
        F: Fn(&[f64]) -> bool,
    {
        self.nodes
            .iter()
            .filter(|n| filter(&n.coords))
            .map(|n| n.id)
            .collect()
    }

    /// Finds node ids carrying a marker tag
    pub fn find_marked_nodes(&self, marker: i32) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.marker == marker)
            .map(|n| n.id)
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
