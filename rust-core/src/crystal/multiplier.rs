use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{CrystalError, Result};
use crate::interfaces::Position;
use crate::scalar::LatticeScalar;

/// One stencil entry: the block applied to the values sampled `pos` lattice steps away.
///
/// `mat` has one row per codomain element and one column per domain element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct Multiplier<T: LatticeScalar> {
    pub pos: Position,
    pub mat: DMatrix<T>,
}

impl<T: LatticeScalar> Multiplier<T> {
    pub fn new(pos: Position, mat: DMatrix<T>) -> Self {
        Multiplier { pos, mat }
    }

    /// 1x1 block, for operators on a single structure element.
    pub fn scalar(pos: Position, value: T) -> Self {
        Multiplier {
            pos,
            mat: DMatrix::from_element(1, 1, value),
        }
    }

    /// Exact zero test; no tolerance is applied.
    pub fn is_zero(&self) -> bool {
        self.mat.iter().all(|x| x.is_zero())
    }
}

fn overflow(a: &[i64], b: &[i64]) -> CrystalError {
    CrystalError::NotRepresentable(format!("position {a:?} shifted by {b:?} overflows"))
}

pub(crate) fn add_positions(a: &[i64], b: &[i64]) -> Result<Position> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.checked_add(*y).ok_or_else(|| overflow(a, b)))
        .collect()
}

pub(crate) fn sub_positions(a: &[i64], b: &[i64]) -> Result<Position> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.checked_sub(*y).ok_or_else(|| overflow(a, b)))
        .collect()
}

pub(crate) fn negate_position(a: &[i64]) -> Result<Position> {
    a.iter()
        .map(|x| {
            x.checked_neg()
                .ok_or_else(|| CrystalError::NotRepresentable(format!("-{x} overflows")))
        })
        .collect()
}
