//! Ready-made operators used by the tests, the benchmarks and the command-line driver.

use nalgebra::{DMatrix, DVector};

use super::crystal_operator::CrystalOperator;
use super::multiplier::Multiplier;
use super::structure::Crystal;
use crate::error::{CrystalError, Result};
use crate::interfaces::MergePolicy;
use crate::lattice::Lattice;
use crate::scalar::LatticeScalar;

fn check_dim(dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(CrystalError::InvalidArgument("dimension must be positive".into()));
    }
    Ok(())
}

/// Central-difference Laplacian on `h·ℤᴺ`: `1/h²` at the `2N` nearest neighbours and
/// `-2N/h²` at the centre.
pub fn laplace<T: LatticeScalar>(dim: usize, h: T) -> Result<CrystalOperator<T>> {
    check_dim(dim)?;
    let lattice = Lattice::uniform(dim, h.clone())?;
    let weight = T::one() / (h.clone() * h);

    let mut operator = CrystalOperator::zero(Crystal::with_lattice(lattice));
    let centre = -(T::from_int(2 * dim as i64) * weight.clone());
    operator.push(Multiplier::scalar(vec![0; dim], centre), MergePolicy::Replace)?;
    for axis in 0..dim {
        for step in [-1, 1] {
            let mut pos = vec![0; dim];
            pos[axis] = step;
            operator.push(Multiplier::scalar(pos, weight.clone()), MergePolicy::Replace)?;
        }
    }
    Ok(operator)
}

/// Points `{0, 1}ᴺ` of one cell of `2ℤᴺ`, last coordinate most significant.
fn fine_cell(dim: usize) -> Vec<Vec<i64>> {
    (0..1usize << dim)
        .map(|k| (0..dim).map(|i| ((k >> i) & 1) as i64).collect())
        .collect()
}

/// Full-weighting restriction from `ℤᴺ` onto `2ℤᴺ`: tensor product of the weights
/// `(1/2, 1, 1/2)`.
pub fn fw_restriction<T: LatticeScalar>(dim: usize) -> Result<CrystalOperator<T>> {
    check_dim(dim)?;
    let coarse = Lattice::uniform(dim, T::from_int(2))?;
    let cell = fine_cell(dim);
    let domain: Vec<DVector<T>> = cell
        .iter()
        .map(|d| DVector::from_iterator(dim, d.iter().map(|&x| T::from_int(x))))
        .collect();
    let crystal = Crystal::new(coarse, domain, Some(vec![DVector::zeros(dim)]))?;

    let half = T::one() / T::from_int(2);
    let mut operator = CrystalOperator::zero(crystal);
    let neighbourhood = 3usize.pow(dim as u32);
    for n in 0..neighbourhood {
        // Offset in {-1, 0, 1}ᴺ from the coarse point, in fine lattice steps
        let offset: Vec<i64> = (0..dim)
            .map(|i| ((n / 3usize.pow(i as u32)) % 3) as i64 - 1)
            .collect();
        let weight = offset.iter().fold(T::one(), |acc, &o| {
            if o == 0 {
                acc
            } else {
                acc * half.clone()
            }
        });
        let pos: Vec<i64> = offset.iter().map(|o| o.div_euclid(2)).collect();
        let column = offset
            .iter()
            .rev()
            .fold(0usize, |acc, o| 2 * acc + o.rem_euclid(2) as usize);

        let mut block = DMatrix::zeros(1, cell.len());
        block[(0, column)] = weight;
        operator.push(Multiplier::new(pos, block), MergePolicy::Add)?;
    }
    Ok(operator)
}

/// Linear interpolation from `2ℤᴺ` onto `ℤᴺ`, the adjoint of [`fw_restriction`].
pub fn linear_interpolation<T: LatticeScalar>(dim: usize) -> Result<CrystalOperator<T>> {
    fw_restriction(dim)?.transpose()
}
