use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::multiplier::{add_positions, negate_position, sub_positions, Multiplier};
use super::structure::Crystal;
use crate::error::{CrystalError, Result};
use crate::interfaces::{MergePolicy, Position};
use crate::lattice::{quotient_sublattice, Lattice};
use crate::normal_forms::{from_position, to_position};
use crate::scalar::LatticeScalar;

/// A translation-invariant linear map
/// `(C·f)(x + c_i) = Σ_pos Σ_j mat[i, j] · f(x + A·pos + d_j)` for all lattice points `x`.
///
/// Multipliers are keyed uniquely by position and kept in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct CrystalOperator<T: LatticeScalar> {
    crystal: Crystal<T>,
    #[serde(with = "multiplier_list")]
    multipliers: BTreeMap<Position, DMatrix<T>>,
}

// Multipliers travel as a list of (position, block) pairs
mod multiplier_list {
    use std::collections::BTreeMap;

    use nalgebra::DMatrix;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::interfaces::Position;
    use crate::scalar::LatticeScalar;

    pub fn serialize<S, T>(map: &BTreeMap<Position, DMatrix<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: LatticeScalar,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<Position, DMatrix<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: LatticeScalar,
    {
        let entries: Vec<(Position, DMatrix<T>)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl<T: LatticeScalar> CrystalOperator<T> {
    /// Later multipliers replace earlier ones at the same position.
    pub fn new(crystal: Crystal<T>, multipliers: Vec<Multiplier<T>>) -> Result<Self> {
        let mut operator = Self::zero(crystal);
        for multiplier in multipliers {
            operator.push(multiplier, MergePolicy::Replace)?;
        }
        Ok(operator)
    }

    /// `scalar` times the identity-shaped block at the origin.
    pub fn identity(crystal: Crystal<T>, scalar: T) -> Self {
        let block = DMatrix::identity(crystal.codomain_size(), crystal.domain_size()) * scalar;
        let mut multipliers = BTreeMap::new();
        multipliers.insert(vec![0; crystal.dim()], block);
        CrystalOperator {
            crystal,
            multipliers,
        }
    }

    /// No multipliers at all.
    pub fn zero(crystal: Crystal<T>) -> Self {
        CrystalOperator {
            crystal,
            multipliers: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(crystal: Crystal<T>, multipliers: BTreeMap<Position, DMatrix<T>>) -> Self {
        CrystalOperator {
            crystal,
            multipliers,
        }
    }

    pub fn crystal(&self) -> &Crystal<T> {
        &self.crystal
    }

    pub fn lattice(&self) -> &Lattice<T> {
        self.crystal.lattice()
    }

    pub fn dim(&self) -> usize {
        self.crystal.dim()
    }

    /// `(|codomain|, |domain|)`, the shape of every block.
    pub fn shape(&self) -> (usize, usize) {
        (self.crystal.codomain_size(), self.crystal.domain_size())
    }

    /// Number of multipliers.
    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// Multipliers in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (&Position, &DMatrix<T>)> {
        self.multipliers.iter()
    }

    pub fn multipliers(&self) -> Vec<Multiplier<T>> {
        self.multipliers
            .iter()
            .map(|(pos, mat)| Multiplier::new(pos.clone(), mat.clone()))
            .collect()
    }

    pub fn find_multiplier(&self, pos: &[i64]) -> Option<&DMatrix<T>> {
        self.multipliers.get(pos)
    }

    fn check_multiplier(&self, multiplier: &Multiplier<T>) -> Result<()> {
        if multiplier.pos.len() != self.dim() {
            return Err(CrystalError::dimension(self.dim(), multiplier.pos.len()));
        }
        if multiplier.mat.shape() != self.shape() {
            return Err(CrystalError::ShapeMismatch(format!(
                "multiplier block is {:?}, operator blocks are {:?}",
                multiplier.mat.shape(),
                self.shape()
            )));
        }
        Ok(())
    }

    /// Inserts `multiplier`; an existing block at the same position is replaced or summed.
    pub fn push(&mut self, multiplier: Multiplier<T>, policy: MergePolicy) -> Result<()> {
        self.check_multiplier(&multiplier)?;
        let Multiplier { pos, mat } = multiplier;
        match (policy, self.multipliers.entry(pos)) {
            (MergePolicy::Add, Entry::Occupied(mut slot)) => *slot.get_mut() += mat,
            (MergePolicy::Replace, Entry::Occupied(mut slot)) => {
                slot.insert(mat);
            }
            (_, Entry::Vacant(slot)) => {
                slot.insert(mat);
            }
        }
        Ok(())
    }

    /// Drops every multiplier whose block is exactly zero.
    pub fn clean_up(&mut self) {
        self.multipliers
            .retain(|_, mat| !mat.iter().all(|x| x.is_zero()));
    }

    pub fn is_normal(&self) -> bool {
        self.crystal.is_normal()
    }

    // ======================== CHANGE OF LATTICE ========================

    /// The same map expressed over `lattice`, which has to be a sublattice of the current one.
    ///
    /// Structure elements are replicated over the quotient `current / lattice`; the
    /// block entry `(i, j)` at `pos`, read from replica `k`, lands in block `(k, l)` at
    /// the position `p'` with `τ_k + pos = T·p' + τ_l`.
    pub fn wrt_lattice(&self, lattice: &Lattice<T>) -> Result<Self> {
        let current = self.lattice();
        let sublattice = quotient_sublattice(current, lattice)?;
        let cosets = sublattice.representatives()?;
        let offsets: Vec<DVector<T>> = cosets
            .points
            .iter()
            .map(|tau| {
                current.frac_to_cart(&DVector::from_iterator(
                    tau.len(),
                    tau.iter().map(T::from_integer),
                ))
            })
            .collect();
        let crystal = self.crystal.expanded(lattice.clone(), &offsets);

        let index: BTreeMap<&Vec<BigInt>, usize> = cosets
            .points
            .iter()
            .enumerate()
            .map(|(i, tau)| (tau, i))
            .collect();
        let count = cosets.points.len();
        let (rows, cols) = self.shape();

        let mut multipliers: BTreeMap<Position, DMatrix<T>> = BTreeMap::new();
        for (pos, mat) in &self.multipliers {
            let p = from_position(pos);
            for (k, tau) in cosets.points.iter().enumerate() {
                let w: Vec<BigInt> = p.iter().zip(tau.iter()).map(|(a, b)| a + b).collect();
                let (shift, residue) = sublattice.reduce(&w);
                let l = *index.get(&residue).ok_or_else(|| {
                    CrystalError::NotRepresentable(format!("{residue:?} is not a coset representative"))
                })?;
                let block = multipliers
                    .entry(to_position(&shift)?)
                    .or_insert_with(|| DMatrix::zeros(count * rows, count * cols));
                let mut target = block.view_mut((k * rows, l * cols), (rows, cols));
                target += mat;
            }
        }

        debug!(
            "rewrote operator with {} multipliers onto a sublattice of index {}: {} multipliers, blocks {}x{}",
            self.len(),
            count,
            multipliers.len(),
            count * rows,
            count * cols
        );
        let mut operator = CrystalOperator {
            crystal,
            multipliers,
        };
        operator.clean_up();
        Ok(operator)
    }

    /// Shape check for [`wrt_lattice`](Self::wrt_lattice) followed by normalisation: only
    /// the crystal is rewritten, the multipliers are left alone.
    pub fn check_wrt_lattice(&self, lattice: &Lattice<T>) -> Result<Crystal<T>> {
        self.crystal.wrt_lattice(lattice)?.normalize()
    }

    // ======================== CANONICAL FORM ========================

    /// Moves all structure elements into the standard cell, sorts them and re-keys the
    /// blocks accordingly. Operators that differ only by a relabelling of structure
    /// elements normalise to identical values.
    pub fn normalize(&self) -> Result<Self> {
        let (domain, codomain) = self.crystal.standard_cell_shifts()?;
        let (rows, cols) = self.shape();

        let mut multipliers: BTreeMap<Position, DMatrix<T>> = BTreeMap::new();
        for (pos, mat) in &self.multipliers {
            for i in 0..rows {
                let source_row = codomain.permutation[i];
                for j in 0..cols {
                    let entry = &mat[(source_row, domain.permutation[j])];
                    if entry.is_zero() {
                        continue;
                    }
                    // Input shift moves the stencil forward, output shift moves it back
                    let target = sub_positions(
                        &add_positions(pos, &domain.shifts[j])?,
                        &codomain.shifts[i],
                    )?;
                    multipliers
                        .entry(target)
                        .or_insert_with(|| DMatrix::zeros(rows, cols))[(i, j)] += entry.clone();
                }
            }
        }
        trace!("normalized operator: {} -> {} multipliers", self.len(), multipliers.len());

        let crystal = Crystal::from_parts(self.lattice().clone(), domain.points, codomain.points);
        let mut operator = CrystalOperator {
            crystal,
            multipliers,
        };
        operator.clean_up();
        Ok(operator)
    }

    /// The adjoint stencil: positions negated, blocks transposed, domain and codomain swapped.
    pub fn transpose(&self) -> Result<Self> {
        let multipliers = self
            .multipliers
            .iter()
            .map(|(pos, mat)| Ok((negate_position(pos)?, mat.transpose())))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(CrystalOperator {
            crystal: self.crystal.swapped(),
            multipliers,
        })
    }

    /// Equality up to the scalar tolerance (exact for rationals).
    pub fn approx_eq(&self, other: &CrystalOperator<T>) -> bool {
        self.crystal.same_structure(&other.crystal)
            && self.multipliers.len() == other.multipliers.len()
            && self
                .multipliers
                .iter()
                .zip(other.multipliers.iter())
                .all(|((p, a), (q, b))| {
                    p == q && a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| x.approx_eq(y))
                })
    }
}
