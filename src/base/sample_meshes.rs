use crate::mesh::{Cell, Mesh, Node};
use crate::shapes::GeoKind;

/// Holds small meshes for tests and examples
pub struct SampleMeshes {}

impl SampleMeshes {
    /// Returns a mesh with a single 2-node rod along x
    ///
    /// ```text
    /// 0-------1   (length = 1)
    /// ```
    pub fn one_lin2() -> Mesh {
        Mesh {
            ndim: 2,
            nodes: vec![
                Node {
                    id: 0,
                    marker: 0,
                    coords: vec![0.0, 0.0],
                },
                Node {
                    id: 1,
                    marker: 0,
                    coords: vec![1.0, 0.0],
                },
            ],
            cells: vec![Cell::new(0, 1, GeoKind::Lin2, vec![0, 1])],
        }
    }

    /// Returns a mesh with a single Tri3
    ///
    /// ```text
    /// 2
    /// | \
    /// 0--1
    /// ```
    pub fn one_tri3() -> Mesh {
        Mesh {
            ndim: 2,
            nodes: vec![
                Node {
                    id: 0,
                    marker: 0,
                    coords: vec![0.0, 0.0],
                },
                Node {
                    id: 1,
                    marker: 0,
                    coords: vec![1.0, 0.0],
                },
                Node {
                    id: 2,
                    marker: 0,
                    coords: vec![0.0, 1.0],
                },
            ],
            cells: vec![Cell::new(0, 1, GeoKind::Tri3, vec![0, 1, 2])],
        }
    }

    /// Returns a mesh with a single unit-square Qua4
    ///
    /// ```text
    /// 3-------2
    /// |       |
    /// 0-------1
    /// ```
    pub fn one_qua4() -> Mesh {
        Mesh {
            ndim: 2,
            nodes: vec![
                Node {
                    id: 0,
                    marker: 0,
                    coords: vec![0.0, 0.0],
                },
                Node {
                    id: 1,
                    marker: 0,
                    coords: vec![1.0, 0.0],
                },
                Node {
                    id: 2,
                    marker: 0,
                    coords: vec![1.0, 1.0],
                },
                Node {
                    id: 3,
                    marker: 0,
                    coords: vec![0.0, 1.0],
                },
            ],
            cells: vec![Cell::new(0, 1, GeoKind::Qua4, vec![0, 1, 2, 3])],
        }
    }

    /// Returns a mesh with two unit-square Qua4 sharing one edge
    ///
    /// ```text
    /// 3-------2-------5
    /// |  [0]  |  [1]  |
    /// 0-------1-------4
    /// ```
    pub fn two_qua4() -> Mesh {
        Mesh {
            ndim: 2,
            nodes: vec![
                Node {
                    id: 0,
                    marker: 0,
                    coords: vec![0.0, 0.0],
                },
                Node {
                    id: 1,
                    marker: 0,
                    coords: vec![1.0, 0.0],
                },
                Node {
                    id: 2,
                    marker: 0,
                    coords: vec![1.0, 1.0],
                },
                Node {
                    id: 3,
                    marker: 0,
                    coords: vec![0.0, 1.0],
                },
                Node {
                    id: 4,
                    marker: 0,
                    coords: vec![2.0, 0.0],
                },
                Node {
                    id: 5,
                    marker: 0,
                    coords: vec![2.0, 1.0],
                },
            ],
            cells: vec![
                Cell::new(0, 1, GeoKind::Qua4, vec![0, 1, 2, 3]),
                Cell::new(1, 1, GeoKind::Qua4, vec![1, 4, 5, 2]),
            ],
        }
    }

    /// Returns a mesh with a single unit-cube Hex8
    pub fn one_hex8() -> Mesh {
        let coords = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        Mesh {
            ndim: 3,
            nodes: coords
                .iter()
                .enumerate()
                .map(|(id, c)| Node {
                    id,
                    marker: 0,
                    coords: c.to_vec(),
                })
                .collect(),
            cells: vec![Cell::new(0, 1, GeoKind::Hex8, vec![0, 1, 2, 3, 4, 5, 6, 7])],
        }
    }

    /// Returns a Qua4 host crossed by a horizontal bar with a line joint
    ///
    /// ```text
    /// 3--------2
    /// |        |
    /// 4--------5   <- bar at mid-height (cell 1) + joint (cell 2)
    /// |        |
    /// 0--------1
    /// ```
    pub fn bar_in_qua4() -> Mesh {
        let mut mesh = SampleMeshes::one_qua4();
        mesh.nodes.push(Node {
            id: 4,
            marker: 0,
            coords: vec![0.0, 0.5],
        });
        mesh.nodes.push(Node {
            id: 5,
            marker: 0,
            coords: vec![1.0, 0.5],
        });
        mesh.cells.push(Cell::new(1, 2, GeoKind::Lin2, vec![4, 5]));
        let mut joint = Cell::new(2, 3, GeoKind::Lin2, vec![4, 5, 0, 1, 2, 3]);
        joint.host = Some(0);
        joint.rod = Some(1);
        mesh.cells.push(joint);
        mesh
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
