use serde::{Deserialize, Serialize};

/// Defines degrees-of-freedom (DOF) types (essential-value keys)
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along the first dimension
    Ux = 0,

    /// Displacement along the second dimension
    Uy = 1,

    /// Displacement along the third dimension
    Uz = 2,

    /// Pore water pressure
    Pw = 3,
}

impl Dof {
    /// Returns the natural-value (dual) key paired with this DOF
    pub fn natural(&self) -> Nbc {
        match self {
            Dof::Ux => Nbc::Fx,
            Dof::Uy => Nbc::Fy,
            Dof::Uz => Nbc::Fz,
            Dof::Pw => Nbc::Wd,
        }
    }
}

/// Defines natural boundary condition keys (duals of the essential keys)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Nbc {
    /// Concentrated force parallel to x (dual of Ux)
    Fx,

    /// Concentrated force parallel to y (dual of Uy)
    Fy,

    /// Concentrated force parallel to z (dual of Uz)
    Fz,

    /// Water discharge (dual of Pw)
    Wd,
}

impl Nbc {
    /// Returns the essential DOF paired with this natural key
    pub fn dof(&self) -> Dof {
        match self {
            Nbc::Fx => Dof::Ux,
            Nbc::Fy => Dof::Uy,
            Nbc::Fz => Dof::Uz,
            Nbc::Wd => Dof::Pw,
        }
    }
}

/// Defines the iterative scheme of an analysis stage
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Scheme {
    /// Forward-Euler: one linear solve per increment with the tangent built
    /// at increment start; the residual is reported, not driven to zero
    Fe,

    /// Newton-Raphson: the tangent is rebuilt at every iteration
    Nr,

    /// Modified Newton-Raphson: the tangent is built once per increment and
    /// reused by all iterations of that increment
    Mnr,
}

/// Defines the 2D/3D idealization of the analysis
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum Idealization {
    /// Plane-strain idealization with out-of-plane thickness
    PlaneStrain {
        /// Out-of-plane thickness
        thickness: f64,
    },

    /// Plane-stress idealization with out-of-plane thickness
    PlaneStress {
        /// Out-of-plane thickness
        thickness: f64,
    },

    /// Three-dimensional analysis
    ThreeDim,
}

impl Idealization {
    /// Returns a plane-strain idealization
    pub fn plane_strain(thickness: f64) -> Self {
        Idealization::PlaneStrain { thickness }
    }

    /// Returns a plane-stress idealization
    pub fn plane_stress(thickness: f64) -> Self {
        Idealization::PlaneStress { thickness }
    }

    /// Returns the number of space dimensions
    pub fn ndim(&self) -> usize {
        match self {
            Idealization::ThreeDim => 3,
            _ => 2,
        }
    }

    /// Tells whether this is a two-dimensional idealization
    pub fn two_dim(&self) -> bool {
        self.ndim() == 2
    }

    /// Tells whether this is the plane-stress idealization
    pub fn plane_stress(&self) -> bool {
        matches!(self, Idealization::PlaneStress { .. })
    }

    /// Returns the out-of-plane thickness (1.0 in 3D)
    pub fn thickness(&self) -> f64 {
        match self {
            Idealization::PlaneStrain { thickness } => *thickness,
            Idealization::PlaneStress { thickness } => *thickness,
            Idealization::ThreeDim => 1.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Dof, Idealization, Nbc, Scheme};

    #[test]
    fn dof_natural_pairs_are_consistent() {
        for dof in [Dof::Ux, Dof::Uy, Dof::Uz, Dof::Pw] {
            assert_eq!(dof.natural().dof(), dof);
        }
        assert_eq!(Dof::Ux.natural(), Nbc::Fx);
        assert_eq!(Dof::Pw.natural(), Nbc::Wd);
    }

    #[test]
    fn dof_ordering_is_fixed() {
        let mut dofs = vec![Dof::Pw, Dof::Uy, Dof::Ux];
        dofs.sort();
        assert_eq!(dofs, &[Dof::Ux, Dof::Uy, Dof::Pw]);
    }

    #[test]
    fn idealization_works() {
        let ideal = Idealization::plane_strain(0.5);
        assert_eq!(ideal.ndim(), 2);
        assert_eq!(ideal.thickness(), 0.5);
        assert!(!ideal.plane_stress());
        let ideal = Idealization::plane_stress(0.25);
        assert!(ideal.plane_stress());
        let ideal = Idealization::ThreeDim;
        assert_eq!(ideal.ndim(), 3);
        assert_eq!(ideal.thickness(), 1.0);
        assert!(!ideal.two_dim());
    }

    #[test]
    fn derive_works() {
        let scheme = Scheme::Mnr;
        let json = serde_json::to_string(&scheme).unwrap();
        let read: Scheme = serde_json::from_str(&json).unwrap();
        assert_eq!(read, scheme);
    }
}
