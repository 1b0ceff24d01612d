use log::{trace, warn};
use nalgebra::{DMatrix, DVector, Schur};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;
use crate::config::{
    EIGENVALUE_CLUSTER_TOLERANCE, EIGENVECTOR_RESIDUAL, SCHUR_EPSILON, SCHUR_MAX_ITERATIONS,
};
use crate::error::{CrystalError, Result};
use crate::interfaces::SortKey;

/// Eigenvalues and matching unit eigenvectors (as columns) of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenDecomposition {
    pub values: Vec<Complex64>,
    pub vectors: DMatrix<Complex64>,
}

fn check_square(m: &DMatrix<Complex64>) -> Result<()> {
    if !m.is_square() {
        return Err(CrystalError::NotSquare {
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}

/// Eigenvalues of the 2x2 block `[a b; c d]`.
fn block_eigenvalues(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> [Complex64; 2] {
    let half_trace = (a + d) * 0.5;
    let discriminant = ((a - d) * 0.5).powu(2) + b * c;
    let root = discriminant.sqrt();
    [half_trace + root, half_trace - root]
}

/// Eigenvalues of a square complex matrix via its Schur form.
pub fn matrix_eigenvalues(m: &DMatrix<Complex64>) -> Result<Vec<Complex64>> {
    check_square(m)?;
    let n = m.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![m[(0, 0)]]);
    }

    let schur = Schur::try_new(m.clone(), SCHUR_EPSILON, SCHUR_MAX_ITERATIONS).ok_or_else(|| {
        CrystalError::EigenDecomposition(format!(
            "Schur iteration did not converge within {SCHUR_MAX_ITERATIONS} steps"
        ))
    })?;
    let (_, t) = schur.unpack();

    // The form is triangular up to leftover 2x2 blocks on the diagonal
    let scale = t.iter().map(|z| z.norm()).fold(0.0, f64::max).max(f64::MIN_POSITIVE);
    let mut values = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if i + 1 < n && t[(i + 1, i)].norm() > SCHUR_EPSILON * scale {
            values.extend(block_eigenvalues(
                t[(i, i)],
                t[(i, i + 1)],
                t[(i + 1, i)],
                t[(i + 1, i + 1)],
            ));
            i += 2;
        } else {
            values.push(t[(i, i)]);
            i += 1;
        }
    }
    Ok(values)
}

fn sort_values(values: &mut [Complex64], sort_key: &SortKey) {
    values.sort_by(|a, b| sort_key.key(a).total_cmp(&sort_key.key(b)));
}

/// Index groups of `values` that agree up to [`EIGENVALUE_CLUSTER_TOLERANCE`].
fn clusters(values: &[Complex64]) -> Vec<Vec<usize>> {
    let scale = values.iter().map(|z| z.norm()).fold(1.0, f64::max);
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let close = |group: &&mut Vec<usize>| {
            (values[group[0]] - value).norm() <= EIGENVALUE_CLUSTER_TOLERANCE * scale
        };
        match groups.iter_mut().find(close) {
            Some(group) => group.push(i),
            None => groups.push(vec![i]),
        }
    }
    groups
}

/// `count` orthonormal vectors spanning (numerically) the kernel of `m - λI`.
///
/// These are the right singular vectors belonging to the `count` smallest singular values,
/// so a repeated eigenvalue gets as many independent columns as its multiplicity.
fn null_space(
    m: &DMatrix<Complex64>,
    lambda: Complex64,
    count: usize,
) -> Result<Vec<DVector<Complex64>>> {
    let n = m.nrows();
    let shifted = m - DMatrix::<Complex64>::identity(n, n) * lambda;
    let svd = shifted
        .try_svd(false, true, SCHUR_EPSILON, SCHUR_MAX_ITERATIONS)
        .ok_or_else(|| CrystalError::EigenDecomposition("SVD did not converge".into()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| CrystalError::EigenDecomposition("right singular vectors missing".into()))?;

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| svd.singular_values[a].total_cmp(&svd.singular_values[b]));
    let largest = svd.singular_values.iter().fold(0.0, |acc: f64, &s| acc.max(s));
    let threshold = EIGENVECTOR_RESIDUAL * largest.max(lambda.norm()).max(1.0);

    let vectors: Vec<DVector<Complex64>> = order
        .into_iter()
        .take(count)
        .map(|i| {
            let sigma = svd.singular_values[i];
            if sigma > threshold {
                warn!("eigenvector for {lambda} has residual {sigma:.3e}");
            }
            let vector: DVector<Complex64> = v_t.row(i).adjoint();
            vector.normalize()
        })
        .collect();
    if vectors.len() < count {
        return Err(CrystalError::EigenDecomposition(format!(
            "{count} eigenvectors requested for {lambda}, {} available",
            vectors.len()
        )));
    }
    Ok(vectors)
}

/// Sorted eigenvalues of the symbol at frequency `k`.
pub fn eigvals<S: Symbol + ?Sized>(
    operator: &S,
    k: &[f64],
    sort_key: &SortKey,
) -> Result<Vec<Complex64>> {
    let symbol = operator.symbol(k)?;
    let mut values = matrix_eigenvalues(&symbol)?;
    sort_values(&mut values, sort_key);
    trace!("eigenvalues at {k:?}: {values:?}");
    Ok(values)
}

/// Sorted eigenvalues of the symbol at `k` together with unit eigenvectors.
///
/// Columns belonging to a repeated eigenvalue are orthonormal.
pub fn eigen<S: Symbol + ?Sized>(
    operator: &S,
    k: &[f64],
    sort_key: &SortKey,
) -> Result<EigenDecomposition> {
    let symbol = operator.symbol(k)?;
    let mut values = matrix_eigenvalues(&symbol)?;
    sort_values(&mut values, sort_key);

    let n = symbol.nrows();
    let mut vectors = DMatrix::<Complex64>::zeros(n, n);
    for group in clusters(&values) {
        let lambda = group.iter().map(|&j| values[j]).sum::<Complex64>() / group.len() as f64;
        let basis = null_space(&symbol, lambda, group.len())?;
        for (&j, vector) in group.iter().zip(basis.iter()) {
            vectors.set_column(j, vector);
        }
    }
    Ok(EigenDecomposition { values, vectors })
}
