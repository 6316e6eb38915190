use crate::base::{Error, Result};
use russell_lab::Vector;
use russell_sparse::{CooMatrix, Genie, LinSolver, SparseMatrix, Sym};

/// Holds the partitioned global linear system
///
/// With free DOFs numbered `0..nu-1` and prescribed DOFs `nu..n-1` (enforced
/// by the numbering protocol), the solve is:
///
/// ```text
/// K11·U1 = F1 - K12·U2      (sparse factorization + solve)
/// F2     = K21·U1 + K22·U2  (reaction recovery)
/// ```
pub struct LinearSystem<'a> {
    /// Number of free equations
    pub nu: usize,

    /// Number of prescribed equations
    pub np: usize,

    /// Free-free block (factorized)
    pub kk11: SparseMatrix,

    /// Free-prescribed block
    pub kk12: CooMatrix,

    /// Prescribed-free block
    pub kk21: CooMatrix,

    /// Prescribed-prescribed block
    pub kk22: CooMatrix,

    /// Sparse direct solver
    solver: LinSolver<'a>,

    /// Workspace for block products
    tmp1: Vector,

    /// Workspace for block products
    tmp2: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    pub fn new(nu: usize, np: usize, nnz_sup: usize) -> Result<Self> {
        if nu == 0 || np == 0 {
            return Err(Error::validation("both free and prescribed partitions must be non-empty"));
        }
        let nnz = usize::max(nnz_sup, 1);
        Ok(LinearSystem {
            nu,
            np,
            kk11: SparseMatrix::new_coo(nu, nu, nnz, Sym::No)
                .map_err(|_| Error::validation("cannot allocate the K11 sparse matrix"))?,
            kk12: CooMatrix::new(nu, np, nnz, Sym::No)
                .map_err(|_| Error::validation("cannot allocate the K12 sparse matrix"))?,
            kk21: CooMatrix::new(np, nu, nnz, Sym::No)
                .map_err(|_| Error::validation("cannot allocate the K21 sparse matrix"))?,
            kk22: CooMatrix::new(np, np, nnz, Sym::No)
                .map_err(|_| Error::validation("cannot allocate the K22 sparse matrix"))?,
            solver: LinSolver::new(Genie::Umfpack)
                .map_err(|_| Error::validation("cannot allocate the sparse linear solver"))?,
            tmp1: Vector::new(nu),
            tmp2: Vector::new(np),
        })
    }

    /// Clears all blocks before a new assembly
    pub fn reset(&mut self) -> Result<()> {
        self.kk11
            .reset()
            .map_err(|_| Error::validation("cannot reset the K11 sparse matrix"))?;
        self.kk12.reset();
        self.kk21.reset();
        self.kk22.reset();
        Ok(())
    }

    /// Routes one stiffness entry into the proper block
    pub fn put(&mut self, eq_i: usize, eq_j: usize, value: f64) -> Result<()> {
        let res = if eq_i < self.nu {
            if eq_j < self.nu {
                self.kk11.put(eq_i, eq_j, value)
            } else {
                self.kk12.put(eq_i, eq_j - self.nu, value)
            }
        } else {
            if eq_j < self.nu {
                self.kk21.put(eq_i - self.nu, eq_j, value)
            } else {
                self.kk22.put(eq_i - self.nu, eq_j - self.nu, value)
            }
        };
        res.map_err(|_| Error::validation("cannot insert a value into the global sparse matrix"))
    }

    /// Factorizes the K11 block
    pub fn factorize(&mut self) -> Result<()> {
        self.solver
            .actual
            .factorize(&mut self.kk11, None)
            .map_err(|_| Error::convergence(0, f64::NAN, "sparse factorization of K11 failed"))
    }

    /// Solves `K11·du1 = rhs1 - K12·du2` (factorization must have run)
    pub fn solve(&mut self, du1: &mut Vector, rhs1: &Vector, du2: &Vector) -> Result<()> {
        // tmp1 = rhs1 - K12 du2
        self.kk12
            .mat_vec_mul(&mut self.tmp1, -1.0, du2)
            .map_err(|_| Error::validation("cannot multiply the K12 block"))?;
        for i in 0..self.nu {
            self.tmp1[i] += rhs1[i];
        }
        self.solver
            .actual
            .solve(du1, &self.kk11, &self.tmp1, false)
            .map_err(|_| Error::convergence(0, f64::NAN, "sparse solve with K11 failed"))
    }

    /// Recovers the reactions: `df2 = K21·du1 + K22·du2`
    pub fn recover_reactions(&mut self, df2: &mut Vector, du1: &Vector, du2: &Vector) -> Result<()> {
        self.kk21
            .mat_vec_mul(df2, 1.0, du1)
            .map_err(|_| Error::validation("cannot multiply the K21 block"))?;
        self.kk22
            .mat_vec_mul(&mut self.tmp2, 1.0, du2)
            .map_err(|_| Error::validation("cannot multiply the K22 block"))?;
        for i in 0..self.np {
            df2[i] += self.tmp2[i];
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
