use super::{Error, Result};

/// Holds parameters for stress-strain models (one variant per model)
///
/// The parameters are validated by [`ParamStressStrain::validate`], which is
/// called by the material model allocator; invalid values fail fast with a
/// Validation error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamStressStrain {
    /// Linear elastic model
    LinearElastic {
        /// Young's modulus E
        young: f64,

        /// Poisson's coefficient ν
        poisson: f64,
    },

    /// Smooth Mohr-Coulomb plasticity model (principal-stress form)
    ///
    /// ```text
    /// f = (σ1 - σ3) + (σ1 + σ3) sin(φ) - 2 c cos(φ)
    /// ```
    MohrCoulomb {
        /// Young's modulus E
        young: f64,

        /// Poisson's coefficient ν
        poisson: f64,

        /// Cohesion c
        c: f64,

        /// Friction angle φ (degrees)
        phi: f64,
    },

    /// Drucker-Prager plasticity model with hydrostatic tension cut-off
    ///
    /// ```text
    /// f = √J2 + α I1 - κ     (cone)
    /// f = σm - t_cut         (tension cut-off)
    /// ```
    DruckerPrager {
        /// Young's modulus E
        young: f64,

        /// Poisson's coefficient ν
        poisson: f64,

        /// Cohesion c
        c: f64,

        /// Friction angle φ (degrees)
        phi: f64,

        /// Mean-stress limit of the hydrostatic tension cut-off
        ten_max: f64,
    },
}

impl ParamStressStrain {
    /// Validates the parameters
    pub fn validate(&self) -> Result<()> {
        let (young, poisson) = match self {
            ParamStressStrain::LinearElastic { young, poisson } => (*young, *poisson),
            ParamStressStrain::MohrCoulomb { young, poisson, c, phi } => {
                if *c <= 0.0 {
                    return Err(Error::validation("c (cohesion) must be positive"));
                }
                if *phi <= 0.0 || *phi >= 90.0 {
                    return Err(Error::validation("phi (friction angle) must be in (0, 90) degrees"));
                }
                (*young, *poisson)
            }
            ParamStressStrain::DruckerPrager {
                young,
                poisson,
                c,
                phi,
                ten_max,
            } => {
                if *c <= 0.0 {
                    return Err(Error::validation("c (cohesion) must be positive"));
                }
                if *phi <= 0.0 || *phi >= 90.0 {
                    return Err(Error::validation("phi (friction angle) must be in (0, 90) degrees"));
                }
                if *ten_max < 0.0 {
                    return Err(Error::validation("ten_max (tension cut-off) must not be negative"));
                }
                (*young, *poisson)
            }
        };
        if young <= 0.0 {
            return Err(Error::validation("young (Young's modulus) must be positive"));
        }
        if poisson < 0.0 || poisson >= 0.5 {
            return Err(Error::validation("poisson (Poisson's coefficient) must be in [0, 0.5)"));
        }
        Ok(())
    }

    /// Returns the Young's modulus and Poisson's coefficient
    pub fn young_poisson(&self) -> (f64, f64) {
        match self {
            ParamStressStrain::LinearElastic { young, poisson } => (*young, *poisson),
            ParamStressStrain::MohrCoulomb { young, poisson, .. } => (*young, *poisson),
            ParamStressStrain::DruckerPrager { young, poisson, .. } => (*young, *poisson),
        }
    }
}

/// Holds parameters for continuum solid elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSolid {
    /// Stress-strain model parameters
    pub stress_strain: ParamStressStrain,

    /// Optional number of integration points (None means the default rule)
    pub ngauss: Option<usize>,
}

impl ParamSolid {
    /// Returns sample parameters: linear elastic with E = 1500 and ν = 0.25
    pub fn sample_linear_elastic() -> Self {
        ParamSolid {
            stress_strain: ParamStressStrain::LinearElastic {
                young: 1500.0,
                poisson: 0.25,
            },
            ngauss: None,
        }
    }

    /// Returns sample parameters: Mohr-Coulomb with φ = 30° and c = 10
    pub fn sample_mohr_coulomb() -> Self {
        ParamSolid {
            stress_strain: ParamStressStrain::MohrCoulomb {
                young: 10_000.0,
                poisson: 0.3,
                c: 10.0,
                phi: 30.0,
            },
            ngauss: None,
        }
    }
}

/// Holds parameters for elastoplastic truss/bar elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRod {
    /// Young's modulus E
    pub young: f64,

    /// Cross-sectional area A
    pub area: f64,

    /// Optional axial yield stress (None means linear elastic bar)
    pub sig_y: Option<f64>,

    /// Linear hardening modulus for the axial plasticity
    pub hh: f64,
}

impl ParamRod {
    /// Validates the parameters
    pub fn validate(&self) -> Result<()> {
        if self.young <= 0.0 {
            return Err(Error::validation("young (Young's modulus) must be positive"));
        }
        if self.area <= 0.0 {
            return Err(Error::validation("area (cross-sectional area) must be positive"));
        }
        if let Some(sy) = self.sig_y {
            if sy <= 0.0 {
                return Err(Error::validation("sig_y (yield stress) must be positive"));
            }
        }
        if self.hh < 0.0 {
            return Err(Error::validation("hh (hardening modulus) must not be negative"));
        }
        Ok(())
    }

    /// Returns sample parameters: elastic bar with E = 100000 and A = 0.01
    pub fn sample_elastic() -> Self {
        ParamRod {
            young: 100_000.0,
            area: 0.01,
            sig_y: None,
            hh: 0.0,
        }
    }
}

/// Holds parameters for line-joint and punctual-joint elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamJoint {
    /// Tangential (shear) stiffness per unit contact area
    pub ks: f64,

    /// Normal stiffness per unit contact area
    pub kn: f64,

    /// Tangential yield stress of the interface
    pub sig_y: f64,

    /// Linear hardening modulus for the tangential plasticity
    pub hh: f64,

    /// Contact perimeter of the crossing bar
    pub perimeter: f64,
}

impl ParamJoint {
    /// Validates the parameters
    pub fn validate(&self) -> Result<()> {
        if self.ks <= 0.0 || self.kn <= 0.0 {
            return Err(Error::validation("ks and kn (joint stiffnesses) must be positive"));
        }
        if self.sig_y <= 0.0 {
            return Err(Error::validation("sig_y (joint strength) must be positive"));
        }
        if self.hh < 0.0 {
            return Err(Error::validation("hh (hardening modulus) must not be negative"));
        }
        if self.perimeter <= 0.0 {
            return Err(Error::validation("perimeter must be positive"));
        }
        Ok(())
    }
}

/// Holds parameters for seepage continuum elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSeepage {
    /// x-component of the permeability tensor
    pub kx: f64,

    /// y-component of the permeability tensor
    pub ky: f64,

    /// z-component of the permeability tensor
    pub kz: f64,
}

impl ParamSeepage {
    /// Validates the parameters
    pub fn validate(&self) -> Result<()> {
        if self.kx <= 0.0 || self.ky <= 0.0 {
            return Err(Error::validation("permeability components must be positive"));
        }
        Ok(())
    }
}

/// Holds parameters for hydromechanical-coupled porous elements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamPorous {
    /// Stress-strain model parameters of the solid skeleton (effective stress)
    pub stress_strain: ParamStressStrain,

    /// x-component of the permeability tensor
    pub kx: f64,

    /// y-component of the permeability tensor
    pub ky: f64,

    /// z-component of the permeability tensor
    pub kz: f64,
}

impl ParamPorous {
    /// Validates the parameters
    pub fn validate(&self) -> Result<()> {
        self.stress_strain.validate()?;
        if self.kx <= 0.0 || self.ky <= 0.0 {
            return Err(Error::validation("permeability components must be positive"));
        }
        Ok(())
    }
}

/// Defines the element models and associated parameters (closed set)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Elem {
    /// Continuum solid element
    Solid(ParamSolid),

    /// Truss/bar element (optionally elastoplastic)
    Rod(ParamRod),

    /// Line joint along a bar crossing a continuum host
    JointLine(ParamJoint),

    /// Punctual joint connecting a bar node to a continuum host
    JointPoint(ParamJoint),

    /// Seepage continuum element (pore pressure only)
    Seepage(ParamSeepage),

    /// Hydromechanical-coupled porous element (displacement + pore pressure)
    Porous(ParamPorous),
}

impl Elem {
    /// Validates the parameters of the variant
    pub fn validate(&self) -> Result<()> {
        match self {
            Elem::Solid(p) => p.stress_strain.validate(),
            Elem::Rod(p) => p.validate(),
            Elem::JointLine(p) => p.validate(),
            Elem::JointPoint(p) => p.validate(),
            Elem::Seepage(p) => p.validate(),
            Elem::Porous(p) => p.validate(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
