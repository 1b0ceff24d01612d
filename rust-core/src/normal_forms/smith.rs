use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use super::integer_matrix::{
    add_column_multiple, add_row_multiple, integer_identity, negate_row, IntegerMatrix,
};

/// Smith normal form with transforms: `u * m * v == s`.
///
/// `s` is diagonal with nonnegative entries, each dividing the next; `u` and `v` are unimodular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmithForm {
    pub s: IntegerMatrix,
    pub u: IntegerMatrix,
    pub v: IntegerMatrix,
}

impl SmithForm {
    pub fn diagonal(&self) -> Vec<BigInt> {
        (0..self.s.nrows().min(self.s.ncols()))
            .map(|i| self.s[(i, i)].clone())
            .collect()
    }
}

pub fn smith_normal_form_with_transform(m: &IntegerMatrix) -> SmithForm {
    let (rows, cols) = m.shape();
    let mut s = m.clone();
    let mut u = integer_identity(rows);
    let mut v = integer_identity(cols);

    for t in 0..rows.min(cols) {
        loop {
            // Smallest nonzero entry of the trailing block becomes the pivot
            let mut best: Option<(usize, usize)> = None;
            for i in t..rows {
                for j in t..cols {
                    if s[(i, j)].is_zero() {
                        continue;
                    }
                    let smaller = match best {
                        None => true,
                        Some((bi, bj)) => s[(i, j)].abs() < s[(bi, bj)].abs(),
                    };
                    if smaller {
                        best = Some((i, j));
                    }
                }
            }
            let Some((pi, pj)) = best else {
                return SmithForm { s, u, v };
            };
            if pi != t {
                s.swap_rows(pi, t);
                u.swap_rows(pi, t);
            }
            if pj != t {
                s.swap_columns(pj, t);
                v.swap_columns(pj, t);
            }

            let pivot = s[(t, t)].clone();
            let mut clean = true;
            for i in t + 1..rows {
                if s[(i, t)].is_zero() {
                    continue;
                }
                let q = -s[(i, t)].div_floor(&pivot);
                add_row_multiple(&mut s, i, t, &q);
                add_row_multiple(&mut u, i, t, &q);
                if !s[(i, t)].is_zero() {
                    clean = false;
                }
            }
            for j in t + 1..cols {
                if s[(t, j)].is_zero() {
                    continue;
                }
                let q = -s[(t, j)].div_floor(&pivot);
                add_column_multiple(&mut s, j, t, &q);
                add_column_multiple(&mut v, j, t, &q);
                if !s[(t, j)].is_zero() {
                    clean = false;
                }
            }
            if !clean {
                continue;
            }

            // Every trailing entry must be a multiple of the pivot
            let offender = (t + 1..rows)
                .find(|&i| (t + 1..cols).any(|j| !s[(i, j)].is_multiple_of(&pivot)));
            match offender {
                Some(i) => {
                    add_row_multiple(&mut s, t, i, &BigInt::one());
                    add_row_multiple(&mut u, t, i, &BigInt::one());
                }
                None => break,
            }
        }

        if s[(t, t)].is_negative() {
            negate_row(&mut s, t);
            negate_row(&mut u, t);
        }
    }

    SmithForm { s, u, v }
}
