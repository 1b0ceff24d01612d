use num_integer::Integer;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::integer_matrix::{add_column_multiple, integer_identity, negate_column, IntegerMatrix};

/// Column-style Hermite normal form `h = m * u`.
///
/// `h` is lower triangular (echelon in the rank-deficient case) with a positive pivot in
/// every nonzero column, and each entry left of a pivot lies in `[0, pivot)`.
/// `u` is unimodular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HermiteForm {
    pub h: IntegerMatrix,
    pub u: IntegerMatrix,
    /// Number of pivot columns; the remaining columns of `h` are zero.
    pub rank: usize,
}

pub fn hermite_normal_form(m: &IntegerMatrix) -> HermiteForm {
    let (rows, cols) = m.shape();
    let mut h = m.clone();
    let mut u = integer_identity(cols);
    let mut pivot_col = 0;

    for row in 0..rows {
        if pivot_col == cols {
            break;
        }

        // Euclid along the row until a single nonzero entry remains in pivot_col..
        loop {
            let smallest = (pivot_col..cols)
                .filter(|&c| !h[(row, c)].is_zero())
                .min_by(|&a, &b| h[(row, a)].abs().cmp(&h[(row, b)].abs()));
            let Some(c) = smallest else { break };
            if c != pivot_col {
                h.swap_columns(c, pivot_col);
                u.swap_columns(c, pivot_col);
            }

            let pivot = h[(row, pivot_col)].clone();
            let mut cleared = true;
            for j in pivot_col + 1..cols {
                if h[(row, j)].is_zero() {
                    continue;
                }
                let q = -h[(row, j)].div_floor(&pivot);
                add_column_multiple(&mut h, j, pivot_col, &q);
                add_column_multiple(&mut u, j, pivot_col, &q);
                if !h[(row, j)].is_zero() {
                    cleared = false;
                }
            }
            if cleared {
                break;
            }
        }

        if h[(row, pivot_col)].is_zero() {
            continue;
        }
        if h[(row, pivot_col)].is_negative() {
            negate_column(&mut h, pivot_col);
            negate_column(&mut u, pivot_col);
        }

        let pivot = h[(row, pivot_col)].clone();
        for j in 0..pivot_col {
            let q = -h[(row, j)].div_floor(&pivot);
            add_column_multiple(&mut h, j, pivot_col, &q);
            add_column_multiple(&mut u, j, pivot_col, &q);
        }
        pivot_col += 1;
    }

    HermiteForm {
        h,
        u,
        rank: pivot_col,
    }
}
