//! Scalar types a lattice basis (and the stencil coefficients living on it) can be written in.
//!
//! Two implementations exist: `f64`, which compares with [`LATTICE_TOLERANCE`], and
//! [`BigRational`], which is exact. Everything that has to be exact regardless of the
//! caller's choice (normal forms, quotient enumeration) goes through `BigInt`/`BigRational`
//! via [`LatticeScalar::to_rational`] and [`LatticeScalar::as_integer`].

use std::cmp::Ordering;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Num, One, Signed, ToPrimitive, Zero};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{
    BASE_VECTOR_TOLERANCE, LATTICE_TOLERANCE, MAX_RATIONAL_DENOMINATOR, RATIONALIZE_TOLERANCE,
};
use crate::error::{CrystalError, Result};

pub trait LatticeScalar:
    nalgebra::Scalar
    + PartialOrd
    + Num
    + Signed
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
{
    fn from_integer(value: &BigInt) -> Self;

    fn from_rational(value: &BigRational) -> Self;

    /// Exact value for rationals, bounded continued-fraction approximation for floats.
    fn to_rational(&self) -> Result<BigRational>;

    fn to_f64(&self) -> f64;

    /// Largest integer not above `self`; floats within tolerance of an integer snap onto it.
    fn floor_integer(&self) -> BigInt;

    /// `Some(n)` if `self` is (within tolerance) the integer `n`.
    fn as_integer(&self) -> Option<BigInt>;

    /// Total order that treats values within tolerance as equal.
    fn approx_cmp(&self, other: &Self) -> Ordering;

    /// Exact sort key; floats snap onto a grid of spacing [`LATTICE_TOLERANCE`].
    fn snapped(&self) -> BigRational;

    /// Whether a pivot or determinant counts as zero next to a quantity of size `scale`.
    fn is_negligible(&self, scale: &Self) -> bool;

    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_cmp(other) == Ordering::Equal
    }

    fn from_int(value: i64) -> Self {
        Self::from_integer(&BigInt::from(value))
    }
}

impl LatticeScalar for f64 {
    fn from_integer(value: &BigInt) -> Self {
        value.to_f64().unwrap_or(f64::NAN)
    }

    fn from_rational(value: &BigRational) -> Self {
        ToPrimitive::to_f64(value)
            .unwrap_or_else(|| value.numer().to_f64().unwrap_or(f64::NAN) / value.denom().to_f64().unwrap_or(f64::NAN))
    }

    fn to_rational(&self) -> Result<BigRational> {
        rationalize(*self)
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn floor_integer(&self) -> BigInt {
        let rounded = self.round();
        let floored = if (self - rounded).abs() < LATTICE_TOLERANCE {
            rounded
        } else {
            self.floor()
        };
        BigInt::from_f64(floored).unwrap_or_else(BigInt::zero)
    }

    fn as_integer(&self) -> Option<BigInt> {
        let rounded = self.round();
        if (self - rounded).abs() < LATTICE_TOLERANCE {
            BigInt::from_f64(rounded)
        } else {
            None
        }
    }

    fn approx_cmp(&self, other: &Self) -> Ordering {
        if (self - other).abs() < LATTICE_TOLERANCE {
            Ordering::Equal
        } else {
            self.partial_cmp(other).unwrap_or(Ordering::Equal)
        }
    }

    fn snapped(&self) -> BigRational {
        let steps = (self / LATTICE_TOLERANCE).round();
        BigRational::from_integer(BigInt::from_f64(steps).unwrap_or_else(BigInt::zero))
    }

    fn is_negligible(&self, scale: &Self) -> bool {
        self.abs() <= BASE_VECTOR_TOLERANCE * scale.abs()
    }
}

impl LatticeScalar for BigRational {
    fn from_integer(value: &BigInt) -> Self {
        BigRational::from_integer(value.clone())
    }

    fn from_rational(value: &BigRational) -> Self {
        value.clone()
    }

    fn to_rational(&self) -> Result<BigRational> {
        Ok(self.clone())
    }

    fn to_f64(&self) -> f64 {
        <f64 as LatticeScalar>::from_rational(self)
    }

    fn floor_integer(&self) -> BigInt {
        self.floor().to_integer()
    }

    fn as_integer(&self) -> Option<BigInt> {
        if self.is_integer() {
            Some(self.to_integer())
        } else {
            None
        }
    }

    fn approx_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn snapped(&self) -> BigRational {
        self.clone()
    }

    fn is_negligible(&self, _scale: &Self) -> bool {
        self.is_zero()
    }
}

/// Best rational approximation of `x` (continued fractions) with a bounded denominator.
///
/// Fails when no convergent with denominator up to [`MAX_RATIONAL_DENOMINATOR`] is within
/// [`RATIONALIZE_TOLERANCE`] (relative), e.g. for irrational lattice ratios.
pub fn rationalize(x: f64) -> Result<BigRational> {
    if !x.is_finite() {
        return Err(CrystalError::NotRepresentable(format!("{x} is not finite")));
    }
    let target = x.abs();
    let tolerance = RATIONALIZE_TOLERANCE * target.max(1.0);
    let max_denominator = BigInt::from(MAX_RATIONAL_DENOMINATOR);

    // Convergents h/k, seeded with h_{-2}/k_{-2} = 0/1 and h_{-1}/k_{-1} = 1/0
    let (mut h_prev, mut h) = (BigInt::zero(), BigInt::one());
    let (mut k_prev, mut k) = (BigInt::one(), BigInt::zero());
    let mut remainder = target;

    for _ in 0..64 {
        let a_float = remainder.floor();
        let a = BigInt::from_f64(a_float)
            .ok_or_else(|| CrystalError::NotRepresentable(format!("{x} overflows")))?;
        let h_next = &a * &h + &h_prev;
        let k_next = &a * &k + &k_prev;
        if k_next > max_denominator {
            break;
        }
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);

        let approximation = h.to_f64().unwrap_or(f64::INFINITY) / k.to_f64().unwrap_or(1.0);
        if (approximation - target).abs() <= tolerance {
            let value = BigRational::new(h, k);
            return Ok(if x < 0.0 { -value } else { value });
        }

        let fraction = remainder - a_float;
        if fraction <= 0.0 {
            break;
        }
        remainder = 1.0 / fraction;
    }

    Err(CrystalError::NotRepresentable(format!(
        "{x} has no rational approximation with denominator <= {MAX_RATIONAL_DENOMINATOR}"
    )))
}

/// Lexicographic sort key of a coordinate slice, last coordinate most significant.
pub fn coordinate_key<T: LatticeScalar>(coordinates: &[T]) -> Vec<BigRational> {
    coordinates.iter().rev().map(LatticeScalar::snapped).collect()
}

pub fn approx_eq_slices<T: LatticeScalar>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.approx_eq(y))
}

/// Largest absolute entry of `m`.
pub fn max_abs<T: LatticeScalar>(m: &DMatrix<T>) -> T {
    m.iter()
        .map(|x| x.abs())
        .fold(T::zero(), |acc, x| if x > acc { x } else { acc })
}

// ======================== GAUSSIAN ELIMINATION ========================

fn pivot_row<T: LatticeScalar>(a: &DMatrix<T>, col: usize, start: usize) -> usize {
    let mut best = start;
    for row in start + 1..a.nrows() {
        if a[(row, col)].abs() > a[(best, col)].abs() {
            best = row;
        }
    }
    best
}

/// Determinant by elimination with partial pivoting. Non-square input yields zero.
pub fn determinant<T: LatticeScalar>(m: &DMatrix<T>) -> T {
    if !m.is_square() {
        return T::zero();
    }
    let n = m.nrows();
    let mut a = m.clone();
    let mut det = T::one();

    for col in 0..n {
        let p = pivot_row(&a, col, col);
        if a[(p, col)].is_zero() {
            return T::zero();
        }
        if p != col {
            a.swap_rows(p, col);
            det = -det;
        }
        let pivot = a[(col, col)].clone();
        for row in col + 1..n {
            let factor = a[(row, col)].clone() / pivot.clone();
            if factor.is_zero() {
                continue;
            }
            for j in col..n {
                let delta = a[(col, j)].clone() * factor.clone();
                a[(row, j)] -= delta;
            }
        }
        det *= pivot;
    }
    det
}

/// Gauss-Jordan inverse; `None` for non-square or (numerically) singular input.
pub fn try_inverse<T: LatticeScalar>(m: &DMatrix<T>) -> Option<DMatrix<T>> {
    if !m.is_square() {
        return None;
    }
    let n = m.nrows();
    let scale = max_abs(m);
    let mut a = m.clone();
    let mut inverse = DMatrix::<T>::identity(n, n);

    for col in 0..n {
        let p = pivot_row(&a, col, col);
        if a[(p, col)].is_negligible(&scale) {
            return None;
        }
        a.swap_rows(p, col);
        inverse.swap_rows(p, col);

        let pivot = a[(col, col)].clone();
        for j in 0..n {
            a[(col, j)] /= pivot.clone();
            inverse[(col, j)] /= pivot.clone();
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[(row, col)].clone();
            if factor.is_zero() {
                continue;
            }
            for j in 0..n {
                let delta_a = a[(col, j)].clone() * factor.clone();
                a[(row, j)] -= delta_a;
                let delta_inv = inverse[(col, j)].clone() * factor.clone();
                inverse[(row, j)] -= delta_inv;
            }
        }
    }
    Some(inverse)
}

// ======================== MATRIX CONVERSIONS ========================

pub fn matrix_to_rational<T: LatticeScalar>(m: &DMatrix<T>) -> Result<DMatrix<BigRational>> {
    let data = m
        .iter()
        .map(|x| x.to_rational())
        .collect::<Result<Vec<_>>>()?;
    Ok(DMatrix::from_vec(m.nrows(), m.ncols(), data))
}

pub fn matrix_from_rational<T: LatticeScalar>(m: &DMatrix<BigRational>) -> DMatrix<T> {
    DMatrix::from_iterator(m.nrows(), m.ncols(), m.iter().map(T::from_rational))
}

/// Lossless conversion to integers; any non-integral entry is an error.
pub fn matrix_to_integer<T: LatticeScalar>(m: &DMatrix<T>) -> Result<DMatrix<BigInt>> {
    let data = m
        .iter()
        .map(|x| {
            x.as_integer().ok_or_else(|| {
                CrystalError::NotRepresentable(format!("{x:?} is not an integer"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DMatrix::from_vec(m.nrows(), m.ncols(), data))
}

pub fn matrix_from_integer<T: LatticeScalar>(m: &DMatrix<BigInt>) -> DMatrix<T> {
    DMatrix::from_iterator(m.nrows(), m.ncols(), m.iter().map(T::from_integer))
}

pub fn matrix_to_f64<T: LatticeScalar>(m: &DMatrix<T>) -> DMatrix<f64> {
    DMatrix::from_iterator(m.nrows(), m.ncols(), m.iter().map(|x| x.to_f64()))
}
