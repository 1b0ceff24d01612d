use log::debug;
use nalgebra::{DMatrix, DVector};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use super::base_matrix::Lattice;
use crate::error::{CrystalError, Result};
use crate::interfaces::Position;
use crate::normal_forms::{
    hermite_normal_form, lll_reduce, scale_to_integer, smith_normal_form_with_transform,
    to_position, to_rational, HermiteForm, IntegerMatrix, IntegerSublattice, SmithForm,
};
use crate::scalar::{
    coordinate_key, matrix_from_integer, matrix_from_rational, matrix_to_integer,
    matrix_to_rational, try_inverse, LatticeScalar,
};

/// Representatives of `fine / coarse`, one per coset, inside the primitive cell of `coarse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct QuotientSpace<T: LatticeScalar> {
    /// Cartesian coordinates.
    pub points: Vec<DVector<T>>,
    /// Integer coordinates with respect to the fine basis.
    pub coordinates: Vec<Position>,
    /// Coordinates with respect to the coarse basis, in `[0, 1)ᴺ`.
    pub fractional: Vec<DVector<T>>,
    pub smith_diagonal: Vec<BigInt>,
}

impl<T: LatticeScalar> QuotientSpace<T> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Result of [`shift_into_standard_cell`]: `points[j] + A·shifts[j] == input[permutation[j]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct StandardCellShift<T: LatticeScalar> {
    pub points: Vec<DVector<T>>,
    pub shifts: Vec<Position>,
    pub permutation: Vec<usize>,
}

/// Reduced basis `basis = M·transform`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeReduction<T: LatticeScalar> {
    pub basis: DMatrix<T>,
    pub transform: IntegerMatrix,
}

fn rational_basis<T: LatticeScalar>(m: &DMatrix<T>) -> Result<DMatrix<BigRational>> {
    matrix_to_rational(m).map_err(|e| CrystalError::IncommensurableLattice(e.to_string()))
}

fn vector_from_integers<T: LatticeScalar>(v: &[BigInt]) -> DVector<T> {
    DVector::from_iterator(v.len(), v.iter().map(T::from_integer))
}

// ======================== NORMAL FORMS OF LATTICE DATA ========================

/// Hermite normal form of an integer-valued matrix.
pub fn hermite_form<T: LatticeScalar>(m: &DMatrix<T>) -> Result<HermiteForm> {
    Ok(hermite_normal_form(&matrix_to_integer(m)?))
}

/// Smith normal form with transforms of an integer-valued matrix.
pub fn smith_form<T: LatticeScalar>(m: &DMatrix<T>) -> Result<SmithForm> {
    Ok(smith_normal_form_with_transform(&matrix_to_integer(m)?))
}

/// LLL reduction of a (rational) basis.
pub fn lattice_reduce<T: LatticeScalar>(m: &DMatrix<T>) -> Result<LatticeReduction<T>> {
    let (integer, _) = scale_to_integer(&rational_basis(m)?);
    let transform = lll_reduce(&integer).transform;
    let basis = m * matrix_from_integer::<T>(&transform);
    Ok(LatticeReduction { basis, transform })
}

impl<T: LatticeScalar> Lattice<T> {
    /// Same lattice, LLL-reduced basis.
    pub fn reduced(&self) -> Result<Self> {
        Lattice::new(lattice_reduce(self.basis())?.basis)
    }

    /// Same lattice, basis in column Hermite normal form.
    pub fn hermite_basis(&self) -> Result<Self> {
        let (integer, d) = scale_to_integer(&rational_basis(self.basis())?);
        let h = hermite_normal_form(&integer).h;
        let scale = BigRational::from_integer(d);
        Lattice::new(matrix_from_rational(&to_rational(&h).map(|x| x / &scale)))
    }
}

// ======================== LCM OF LATTICES ========================

/// Finest common sublattice (the intersection) of all inputs.
///
/// The intersection is dual to the sum of the dual lattices. The duals are stacked,
/// brought to a common denominator and reduced with the Hermite normal form, the
/// result is dualised back and LLL-reduced.
pub fn lcm_of_lattices<T: LatticeScalar>(lattices: &[Lattice<T>]) -> Result<Lattice<T>> {
    let first = lattices.first().ok_or_else(|| {
        CrystalError::InvalidArgument("lcm of an empty set of lattices".into())
    })?;
    for lattice in lattices {
        first.check_dimension(lattice)?;
    }

    // An input contained in all others is already the answer
    if let Some(finest) = lattices
        .iter()
        .find(|candidate| lattices.iter().all(|l| candidate.is_sublattice_of(l)))
    {
        return Ok(finest.clone());
    }

    let n = first.dim();
    let mut stacked = DMatrix::from_element(n, n * lattices.len(), BigRational::zero());
    for (i, lattice) in lattices.iter().enumerate() {
        let inverse = try_inverse(&rational_basis(lattice.basis())?)
            .ok_or_else(|| CrystalError::SingularBasis("lattice basis is singular".into()))?;
        stacked.view_mut((0, i * n), (n, n)).copy_from(&inverse.transpose());
    }

    let (integer, d) = scale_to_integer(&stacked);
    let hermite = hermite_normal_form(&integer);
    if hermite.rank != n {
        return Err(CrystalError::IncommensurableLattice(
            "sum of the dual lattices is degenerate".into(),
        ));
    }
    let scale = BigRational::from_integer(d);
    let dual_sum = to_rational(&hermite.h.columns(0, n).into_owned()).map(|x| x / &scale);
    let intersection = try_inverse(&dual_sum)
        .ok_or_else(|| CrystalError::IncommensurableLattice("no common sublattice".into()))?
        .transpose();

    let (integer_basis, c) = scale_to_integer(&intersection);
    let reduced = lll_reduce(&integer_basis).reduced;
    let scale = BigRational::from_integer(c);
    let basis = matrix_from_rational::<T>(&to_rational(&reduced).map(|x| x / &scale));
    debug!(
        "lcm of {} lattices in dimension {} has cell volume {:?}",
        lattices.len(),
        n,
        crate::scalar::determinant(&basis).abs()
    );
    Lattice::new(basis)
}

// ======================== QUOTIENT SPACES ========================

/// `T` with `coarse = fine·T`, as a sublattice of ℤᴺ.
pub fn quotient_sublattice<T: LatticeScalar>(
    fine: &Lattice<T>,
    coarse: &Lattice<T>,
) -> Result<IntegerSublattice> {
    IntegerSublattice::new(fine.integer_transformation_to(coarse)?)
}

/// Points of `fine` inside the half-open primitive cell of `coarse`, lexicographically
/// ordered by their coordinates with respect to `coarse` (last coordinate most significant).
pub fn elements_in_quotient_space<T: LatticeScalar>(
    fine: &Lattice<T>,
    coarse: &Lattice<T>,
) -> Result<QuotientSpace<T>> {
    let sublattice = quotient_sublattice(fine, coarse)?;
    let representatives = sublattice.representatives()?;

    let points = representatives
        .points
        .iter()
        .map(|tau| fine.frac_to_cart(&vector_from_integers(tau)))
        .collect();
    let coordinates = representatives
        .points
        .iter()
        .map(|tau| to_position(tau))
        .collect::<Result<Vec<_>>>()?;
    let fractional = representatives
        .fractional
        .iter()
        .map(|f| DVector::from_iterator(f.len(), f.iter().map(T::from_rational)))
        .collect();

    Ok(QuotientSpace {
        points,
        coordinates,
        fractional,
        smith_diagonal: representatives.smith_diagonal,
    })
}

// ======================== STANDARD CELL ========================

/// Moves every point into the half-open cell `A·[0,1)ᴺ` and sorts the results
/// lexicographically by their fractional coordinates, last coordinate most significant.
pub fn shift_into_standard_cell<T: LatticeScalar>(
    points: &[DVector<T>],
    lattice: &Lattice<T>,
) -> Result<StandardCellShift<T>> {
    let n = lattice.dim();
    let mut shifted = Vec::with_capacity(points.len());
    let mut fractional = Vec::with_capacity(points.len());
    let mut shifts = Vec::with_capacity(points.len());

    for s in points {
        if s.len() != n {
            return Err(CrystalError::dimension(n, s.len()));
        }
        let frac = lattice.cart_to_frac(s);
        let shift: Vec<BigInt> = frac.iter().map(|x| x.floor_integer()).collect();
        let y = vector_from_integers::<T>(&shift);
        shifted.push(s - lattice.frac_to_cart(&y));
        fractional.push(frac - y);
        shifts.push(to_position(&shift)?);
    }

    let mut permutation: Vec<usize> = (0..points.len()).collect();
    permutation.sort_by_cached_key(|&j| coordinate_key(fractional[j].as_slice()));

    Ok(StandardCellShift {
        points: permutation.iter().map(|&j| shifted[j].clone()).collect(),
        shifts: permutation.iter().map(|&j| shifts[j].clone()).collect(),
        permutation,
    })
}

/// Whether all points lie in the standard cell and are lexicographically sorted.
pub fn check_if_normal<T: LatticeScalar>(points: &[DVector<T>], lattice: &Lattice<T>) -> bool {
    let fractional: Vec<DVector<T>> = points.iter().map(|p| lattice.cart_to_frac(p)).collect();
    let in_cell = fractional.iter().all(|f| {
        f.iter().all(|x| {
            x.approx_cmp(&T::zero()) != std::cmp::Ordering::Less
                && x.approx_cmp(&T::one()) == std::cmp::Ordering::Less
        })
    });
    let sorted = fractional
        .windows(2)
        .all(|pair| coordinate_key(pair[0].as_slice()) <= coordinate_key(pair[1].as_slice()));
    in_cell && sorted
}
