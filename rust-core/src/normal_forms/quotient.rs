//! Cosets of an integer sublattice `T·ℤᴺ ⊆ ℤᴺ`.

use log::trace;
use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::integer_matrix::{
    integer_determinant, integer_mat_vec, to_rational, unimodular_inverse, IntegerMatrix,
};
use super::smith::smith_normal_form_with_transform;
use crate::error::{CrystalError, Result};
use crate::scalar::try_inverse;

#[derive(Debug, Clone)]
pub struct IntegerSublattice {
    basis: IntegerMatrix,
    inverse: DMatrix<BigRational>,
    index: BigInt,
}

/// One representative per coset, all inside the fundamental cell of the sublattice.
#[derive(Debug, Clone, PartialEq)]
pub struct CosetRepresentatives {
    /// Integer coordinates, sorted lexicographically by `fractional` from the last coordinate.
    pub points: Vec<Vec<BigInt>>,
    /// Coordinates of each point with respect to the sublattice basis, all in `[0, 1)`.
    pub fractional: Vec<Vec<BigRational>>,
    /// Elementary divisors of the sublattice basis.
    pub smith_diagonal: Vec<BigInt>,
}

impl IntegerSublattice {
    pub fn new(basis: IntegerMatrix) -> Result<Self> {
        if !basis.is_square() {
            return Err(CrystalError::SingularBasis(format!(
                "sublattice basis is {}x{}",
                basis.nrows(),
                basis.ncols()
            )));
        }
        let inverse = try_inverse(&to_rational(&basis))
            .ok_or_else(|| CrystalError::SingularBasis("sublattice basis is singular".into()))?;
        let index = integer_determinant(&basis).abs();
        Ok(Self {
            basis,
            inverse,
            index,
        })
    }

    pub fn basis(&self) -> &IntegerMatrix {
        &self.basis
    }

    pub fn dim(&self) -> usize {
        self.basis.nrows()
    }

    /// Number of cosets, `|det T|`.
    pub fn index(&self) -> &BigInt {
        &self.index
    }

    /// `T⁻¹ w`
    pub fn fractional(&self, w: &[BigInt]) -> Vec<BigRational> {
        (0..self.dim())
            .map(|i| {
                w.iter().enumerate().fold(BigRational::zero(), |acc, (j, x)| {
                    acc + &self.inverse[(i, j)] * BigRational::from_integer(x.clone())
                })
            })
            .collect()
    }

    /// Splits `w = T·shift + residue` with `T⁻¹ residue ∈ [0, 1)ᴺ`.
    pub fn reduce(&self, w: &[BigInt]) -> (Vec<BigInt>, Vec<BigInt>) {
        let shift: Vec<BigInt> = self
            .fractional(w)
            .iter()
            .map(|x| x.floor().to_integer())
            .collect();
        let lattice_part = integer_mat_vec(&self.basis, &shift);
        let residue = w
            .iter()
            .zip(lattice_part.iter())
            .map(|(a, b)| a - b)
            .collect();
        (shift, residue)
    }

    pub fn contains(&self, w: &[BigInt]) -> bool {
        self.fractional(w).iter().all(|x| x.is_integer())
    }

    /// Enumerates `ℤᴺ / T·ℤᴺ`.
    ///
    /// With `U T V = S` in Smith form, `x ↦ U x mod S·ℤᴺ` is an isomorphism onto
    /// `⊕ ℤ/sᵢ`, so `U⁻¹ c` for `0 ≤ cᵢ < sᵢ` hits every coset exactly once.
    pub fn representatives(&self) -> Result<CosetRepresentatives> {
        let n = self.dim();
        let smith = smith_normal_form_with_transform(&self.basis);
        let diagonal = smith.diagonal();
        if diagonal.iter().any(|d| d.is_zero()) {
            return Err(CrystalError::SingularBasis(
                "sublattice basis has a zero elementary divisor".into(),
            ));
        }
        let u_inverse = unimodular_inverse(&smith.u).ok_or_else(|| {
            CrystalError::NotRepresentable("Smith transform is not unimodular".into())
        })?;
        let count = self.index.to_usize().ok_or_else(|| {
            CrystalError::InvalidArgument(format!("quotient with {} elements", self.index))
        })?;
        trace!("enumerating {count} cosets, elementary divisors {diagonal:?}");

        let mut entries: Vec<(Vec<BigRational>, Vec<BigInt>)> = Vec::with_capacity(count);
        let mut counter = vec![BigInt::zero(); n];
        'odometer: loop {
            let (_, residue) = self.reduce(&integer_mat_vec(&u_inverse, &counter));
            entries.push((self.fractional(&residue), residue));

            let mut digit = 0;
            loop {
                if digit == n {
                    break 'odometer;
                }
                counter[digit] += BigInt::one();
                if counter[digit] < diagonal[digit] {
                    break;
                }
                counter[digit] = BigInt::zero();
                digit += 1;
            }
        }

        entries.sort_by(|a, b| a.0.iter().rev().cmp(b.0.iter().rev()));
        let (fractional, points) = entries.into_iter().unzip();
        Ok(CosetRepresentatives {
            points,
            fractional,
            smith_diagonal: diagonal,
        })
    }
}
