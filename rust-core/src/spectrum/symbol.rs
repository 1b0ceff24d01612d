use std::f64::consts::PI;

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::crystal::{CrystalOperator, OperatorComposition};
use crate::error::{CrystalError, Result};
use crate::scalar::LatticeScalar;

/// Anything with a Fourier symbol: a matrix-valued function of the frequency `k`,
/// given in coordinates of the dual of the operator's lattice.
pub trait Symbol {
    fn dimension(&self) -> usize;

    /// `(rows, cols)` of every symbol matrix.
    fn shape(&self) -> (usize, usize);

    fn symbol(&self, k: &[f64]) -> Result<DMatrix<Complex64>>;
}

fn check_frequency(dim: usize, k: &[f64]) -> Result<()> {
    if k.len() != dim {
        return Err(CrystalError::dimension(dim, k.len()));
    }
    Ok(())
}

impl<T: LatticeScalar> Symbol for CrystalOperator<T> {
    fn dimension(&self) -> usize {
        self.dim()
    }

    fn shape(&self) -> (usize, usize) {
        CrystalOperator::shape(self)
    }

    /// `Σ mat · exp(−2πi k·pos)`
    fn symbol(&self, k: &[f64]) -> Result<DMatrix<Complex64>> {
        check_frequency(self.dim(), k)?;
        let (rows, cols) = CrystalOperator::shape(self);
        let mut result = DMatrix::<Complex64>::zeros(rows, cols);
        for (pos, mat) in self.iter() {
            let phase: f64 = pos.iter().zip(k.iter()).map(|(&p, &x)| p as f64 * x).sum();
            let factor = Complex64::from_polar(1.0, -2.0 * PI * phase);
            for (target, value) in result.iter_mut().zip(mat.iter()) {
                *target += factor * value.to_f64();
            }
        }
        Ok(result)
    }
}

impl<T: LatticeScalar> Symbol for OperatorComposition<T> {
    fn dimension(&self) -> usize {
        self.crystal().dim()
    }

    fn shape(&self) -> (usize, usize) {
        (self.crystal().codomain_size(), self.crystal().domain_size())
    }

    fn symbol(&self, k: &[f64]) -> Result<DMatrix<Complex64>> {
        check_frequency(self.dimension(), k)?;
        self.evaluate_symbol(k)
    }
}
