use super::Dofs;
use crate::base::{Error, Result};

/// Holds the per-stage equation numbering (free DOFs first, then prescribed)
///
/// The partitioned solve requires free DOFs to receive the contiguous
/// indices `0..nu-1` and prescribed DOFs `nu..n_equation-1`.
pub struct Equations {
    /// Total number of equations (equals the number of DOFs)
    pub n_equation: usize,

    /// Number of unknown (free) equations
    pub nu: usize,

    /// Maps the stable DOF id to the equation index
    pub tid_to_eq: Vec<usize>,

    /// Maps the equation index back to the stable DOF id
    pub eq_to_tid: Vec<usize>,

    /// Prescribed flag per stable DOF id
    pub prescribed: Vec<bool>,
}

impl Equations {
    /// Runs the numbering protocol given the prescribed mask
    ///
    /// The mask must flag at least one and fewer than all DOFs.
    pub fn new(dofs: &Dofs, prescribed: &[bool]) -> Result<Self> {
        let n_equation = dofs.n_dof;
        if prescribed.len() != n_equation {
            return Err(Error::validation("prescribed mask must have one flag per DOF"));
        }
        let np = prescribed.iter().filter(|p| **p).count();
        if np == 0 {
            return Err(Error::validation("stage must have at least one prescribed DOF"));
        }
        if np == n_equation {
            return Err(Error::validation("stage must have at least one free DOF"));
        }
        let nu = n_equation - np;
        let mut tid_to_eq = vec![0; n_equation];
        let mut eq_to_tid = vec![0; n_equation];
        let mut eq_free = 0;
        let mut eq_presc = nu;
        for tid in 0..n_equation {
            let eq = if prescribed[tid] {
                let eq = eq_presc;
                eq_presc += 1;
                eq
            } else {
                let eq = eq_free;
                eq_free += 1;
                eq
            };
            tid_to_eq[tid] = eq;
            eq_to_tid[eq] = tid;
        }
        Ok(Equations {
            n_equation,
            nu,
            tid_to_eq,
            eq_to_tid,
            prescribed: prescribed.to_vec(),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Equations;
    use crate::base::{Elem, Error, ParamSolid, SampleMeshes};
    use crate::fem::Dofs;
    use std::collections::HashMap;

    fn sample_dofs() -> Dofs {
        let mesh = SampleMeshes::two_qua4();
        let amap = HashMap::from([(1, Elem::Solid(ParamSolid::sample_linear_elastic()))]);
        Dofs::new(&mesh, &amap).unwrap()
    }

    #[test]
    fn numbering_partitions_free_then_prescribed() {
        let dofs = sample_dofs();
        let mut prescribed = vec![false; dofs.n_dof];
        prescribed[0] = true;
        prescribed[5] = true;
        prescribed[11] = true;
        let eqs = Equations::new(&dofs, &prescribed).unwrap();
        assert_eq!(eqs.n_equation, 12);
        assert_eq!(eqs.nu, 9);
        // free indices below prescribed indices
        for tid in 0..dofs.n_dof {
            if prescribed[tid] {
                assert!(eqs.tid_to_eq[tid] >= eqs.nu);
            } else {
                assert!(eqs.tid_to_eq[tid] < eqs.nu);
            }
        }
        // the concatenation is a permutation of 0..n with no gaps/duplicates
        let mut seen = vec![false; eqs.n_equation];
        for tid in 0..eqs.n_equation {
            let eq = eqs.tid_to_eq[tid];
            assert!(!seen[eq]);
            seen[eq] = true;
            assert_eq!(eqs.eq_to_tid[eq], tid);
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn new_captures_errors() {
        let dofs = sample_dofs();
        let none = vec![false; dofs.n_dof];
        assert_eq!(
            Equations::new(&dofs, &none).err(),
            Some(Error::validation("stage must have at least one prescribed DOF"))
        );
        let all = vec![true; dofs.n_dof];
        assert_eq!(
            Equations::new(&dofs, &all).err(),
            Some(Error::validation("stage must have at least one free DOF"))
        );
        let wrong = vec![true; 3];
        assert_eq!(
            Equations::new(&dofs, &wrong).err(),
            Some(Error::validation("prescribed mask must have one flag per DOF"))
        );
    }
}
