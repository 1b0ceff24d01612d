use std::ops::Index;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{CrystalError, Result};
use crate::normal_forms::IntegerMatrix;
use crate::scalar::{determinant, matrix_to_integer, try_inverse, LatticeScalar};

/// A lattice `A·ℤᴺ` given by a square nonsingular basis (columns are the base vectors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct Lattice<T: LatticeScalar> {
    basis: DMatrix<T>,
    inverse: DMatrix<T>,
}

impl<T: LatticeScalar> Lattice<T> {
    pub fn new(basis: DMatrix<T>) -> Result<Self> {
        // Run checks on the basis before anything is derived from it
        if !basis.is_square() || basis.nrows() == 0 {
            return Err(CrystalError::SingularBasis(format!(
                "basis must be a nonempty square matrix, got {}x{}",
                basis.nrows(),
                basis.ncols()
            )));
        }
        // Hadamard: |det| is at most the product of the column norms
        let scale = basis
            .column_iter()
            .map(|c| c.iter().fold(T::zero(), |acc, x| acc + x.abs()))
            .fold(T::one(), |acc, norm| acc * norm);
        if determinant(&basis).is_negligible(&scale) {
            return Err(CrystalError::SingularBasis(
                "determinant too small, base vectors are linearly dependent".into(),
            ));
        }
        let inverse = try_inverse(&basis).ok_or_else(|| {
            CrystalError::SingularBasis("basis could not be inverted".into())
        })?;
        Ok(Lattice { basis, inverse })
    }

    /// ℤᴺ
    pub fn identity(dim: usize) -> Self {
        Lattice {
            basis: DMatrix::identity(dim, dim),
            inverse: DMatrix::identity(dim, dim),
        }
    }

    /// `factor·ℤᴺ`
    pub fn uniform(dim: usize, factor: T) -> Result<Self> {
        Self::new(DMatrix::from_diagonal_element(dim, dim, factor))
    }

    pub fn dim(&self) -> usize {
        self.basis.nrows()
    }

    pub fn basis(&self) -> &DMatrix<T> {
        &self.basis
    }

    pub fn inverse(&self) -> &DMatrix<T> {
        &self.inverse
    }

    /// Basis of the dual lattice, `A⁻ᵀ`.
    pub fn dual(&self) -> DMatrix<T> {
        self.inverse.transpose()
    }

    pub fn determinant(&self) -> T {
        determinant(&self.basis)
    }

    /// Volume of the unit cell.
    pub fn volume(&self) -> T {
        self.determinant().abs()
    }

    pub fn frac_to_cart(&self, v_frac: &DVector<T>) -> DVector<T> {
        &self.basis * v_frac
    }

    pub fn cart_to_frac(&self, v_cart: &DVector<T>) -> DVector<T> {
        &self.inverse * v_cart
    }

    pub(crate) fn check_dimension(&self, other: &Lattice<T>) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(CrystalError::dimension(self.dim(), other.dim()));
        }
        Ok(())
    }

    /// Integer matrix `T` with `other = self·T`; fails unless `other` is a sublattice of `self`.
    pub fn integer_transformation_to(&self, other: &Lattice<T>) -> Result<IntegerMatrix> {
        self.check_dimension(other)?;
        matrix_to_integer(&(&self.inverse * &other.basis)).map_err(|_| {
            CrystalError::IncommensurableLattice(
                "target lattice is not a sublattice of the source lattice".into(),
            )
        })
    }

    pub fn is_sublattice_of(&self, other: &Lattice<T>) -> bool {
        other.integer_transformation_to(self).is_ok()
    }

    /// Whether both bases generate the same point set.
    pub fn same_points(&self, other: &Lattice<T>) -> bool {
        self.is_sublattice_of(other) && other.is_sublattice_of(self)
    }
}

impl<T: LatticeScalar> Index<(usize, usize)> for Lattice<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.basis[index]
    }
}
