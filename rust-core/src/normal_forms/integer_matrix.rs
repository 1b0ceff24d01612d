//! Exact integer/rational matrix helpers shared by the normal-form algorithms.

use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{CrystalError, Result};
use crate::interfaces::Position;
use crate::scalar::{determinant, try_inverse};

pub type IntegerMatrix = DMatrix<BigInt>;

/// Build an integer matrix from row-major entries. Panics if `entries.len() != rows * cols`.
pub fn integer_matrix(rows: usize, cols: usize, entries: &[i64]) -> IntegerMatrix {
    assert_eq!(entries.len(), rows * cols, "Entry count does not match the shape");
    DMatrix::from_row_iterator(rows, cols, entries.iter().map(|&x| BigInt::from(x)))
}

pub fn integer_identity(n: usize) -> IntegerMatrix {
    DMatrix::identity(n, n)
}

pub fn to_rational(m: &IntegerMatrix) -> DMatrix<BigRational> {
    DMatrix::from_iterator(
        m.nrows(),
        m.ncols(),
        m.iter().map(|x| BigRational::from_integer(x.clone())),
    )
}

pub fn integer_mat_vec(m: &IntegerMatrix, v: &[BigInt]) -> Vec<BigInt> {
    (0..m.nrows())
        .map(|i| {
            v.iter()
                .enumerate()
                .fold(BigInt::zero(), |acc, (j, x)| acc + &m[(i, j)] * x)
        })
        .collect()
}

pub fn integer_determinant(m: &IntegerMatrix) -> BigInt {
    determinant(&to_rational(m)).to_integer()
}

pub fn is_unimodular(m: &IntegerMatrix) -> bool {
    m.is_square() && integer_determinant(m).abs().is_one()
}

/// Inverse of a unimodular matrix (which is again integral).
pub fn unimodular_inverse(m: &IntegerMatrix) -> Option<IntegerMatrix> {
    let inverse = try_inverse(&to_rational(m))?;
    let data = inverse
        .iter()
        .map(|x| if x.is_integer() { Some(x.to_integer()) } else { None })
        .collect::<Option<Vec<_>>>()?;
    Some(DMatrix::from_vec(m.nrows(), m.ncols(), data))
}

/// Least common multiple of all denominators.
pub fn common_denominator(m: &DMatrix<BigRational>) -> BigInt {
    m.iter().fold(BigInt::one(), |acc, x| acc.lcm(x.denom()))
}

/// Returns `(d·m, d)` with `d` the common denominator, so `d·m` is integral.
pub fn scale_to_integer(m: &DMatrix<BigRational>) -> (IntegerMatrix, BigInt) {
    let d = common_denominator(m);
    let scale = BigRational::from_integer(d.clone());
    let scaled = DMatrix::from_iterator(
        m.nrows(),
        m.ncols(),
        m.iter().map(|x| (x * &scale).to_integer()),
    );
    (scaled, d)
}

pub fn to_position(v: &[BigInt]) -> Result<Position> {
    v.iter()
        .map(|x| {
            x.to_i64()
                .ok_or_else(|| CrystalError::NotRepresentable(format!("{x} does not fit a position")))
        })
        .collect()
}

pub fn from_position(p: &[i64]) -> Vec<BigInt> {
    p.iter().map(|&x| BigInt::from(x)).collect()
}

// ======================== ELEMENTARY OPERATIONS ========================

/// col[target] += factor * col[source]
pub(crate) fn add_column_multiple(m: &mut IntegerMatrix, target: usize, source: usize, factor: &BigInt) {
    if factor.is_zero() {
        return;
    }
    for r in 0..m.nrows() {
        let delta = &m[(r, source)] * factor;
        m[(r, target)] += delta;
    }
}

/// row[target] += factor * row[source]
pub(crate) fn add_row_multiple(m: &mut IntegerMatrix, target: usize, source: usize, factor: &BigInt) {
    if factor.is_zero() {
        return;
    }
    for c in 0..m.ncols() {
        let delta = &m[(source, c)] * factor;
        m[(target, c)] += delta;
    }
}

pub(crate) fn negate_column(m: &mut IntegerMatrix, col: usize) {
    for r in 0..m.nrows() {
        let value = -m[(r, col)].clone();
        m[(r, col)] = value;
    }
}

pub(crate) fn negate_row(m: &mut IntegerMatrix, row: usize) {
    for c in 0..m.ncols() {
        let value = -m[(row, c)].clone();
        m[(row, c)] = value;
    }
}
