use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::integer_matrix::{add_column_multiple, integer_identity, to_rational, IntegerMatrix};
use crate::config::LLL_DELTA;

/// LLL-reduced basis `reduced == m * transform` with `transform` unimodular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LllReduction {
    pub reduced: IntegerMatrix,
    pub transform: IntegerMatrix,
}

fn dot(a: &[BigRational], b: &[BigRational]) -> BigRational {
    a.iter()
        .zip(b.iter())
        .fold(BigRational::zero(), |acc, (x, y)| acc + x * y)
}

/// Gram-Schmidt coefficients `mu` and squared norms of the orthogonalised columns.
fn gram_schmidt(basis: &IntegerMatrix) -> (DMatrix<BigRational>, Vec<BigRational>) {
    let cols = basis.ncols();
    let rational = to_rational(basis);
    let columns: Vec<Vec<BigRational>> = (0..cols)
        .map(|c| rational.column(c).iter().cloned().collect())
        .collect();

    let mut ortho: Vec<Vec<BigRational>> = Vec::with_capacity(cols);
    let mut mu = DMatrix::from_element(cols, cols, BigRational::zero());
    let mut norms: Vec<BigRational> = Vec::with_capacity(cols);

    for i in 0..cols {
        let mut v = columns[i].clone();
        for j in 0..i {
            if norms[j].is_zero() {
                continue;
            }
            let coefficient = dot(&columns[i], &ortho[j]) / &norms[j];
            for (x, o) in v.iter_mut().zip(ortho[j].iter()) {
                *x -= o * &coefficient;
            }
            mu[(i, j)] = coefficient;
        }
        norms.push(dot(&v, &v));
        ortho.push(v);
    }
    (mu, norms)
}

/// Exact LLL reduction of the columns of `m` (full column rank expected).
pub fn lll_reduce(m: &IntegerMatrix) -> LllReduction {
    let cols = m.ncols();
    let mut reduced = m.clone();
    let mut transform = integer_identity(cols);
    if cols < 2 {
        return LllReduction { reduced, transform };
    }

    let delta = BigRational::new(BigInt::from(LLL_DELTA.0), BigInt::from(LLL_DELTA.1));
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let (mut mu, mut norms) = gram_schmidt(&reduced);
    let mut k = 1;

    while k < cols {
        // Size reduction
        for j in (0..k).rev() {
            if mu[(k, j)].abs() > half {
                let r = -mu[(k, j)].round().to_integer();
                add_column_multiple(&mut reduced, k, j, &r);
                add_column_multiple(&mut transform, k, j, &r);
                (mu, norms) = gram_schmidt(&reduced);
            }
        }

        // Lovász condition
        let bound = (&delta - &mu[(k, k - 1)] * &mu[(k, k - 1)]) * &norms[k - 1];
        if norms[k] >= bound {
            k += 1;
        } else {
            reduced.swap_columns(k, k - 1);
            transform.swap_columns(k, k - 1);
            (mu, norms) = gram_schmidt(&reduced);
            k = (k - 1).max(1);
        }
    }

    LllReduction { reduced, transform }
}
