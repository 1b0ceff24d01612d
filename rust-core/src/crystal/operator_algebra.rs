//! Sums, scalar multiples and products of crystal operators.
//!
//! Binary operations first rewrite both operands onto the lcm of their lattices and
//! normalise them, so that structure elements can be compared one by one.

use std::collections::BTreeMap;

use log::debug;
use nalgebra::DMatrix;

use super::crystal_operator::CrystalOperator;
use super::multiplier::{add_positions, Multiplier};
use super::structure::{same_element_lists, Crystal};
use crate::error::{CrystalError, Result};
use crate::interfaces::{MergePolicy, Position};
use crate::lattice::lcm_of_lattices;
use crate::scalar::LatticeScalar;

/// Both operators rewritten onto the lcm of their lattices, then normalised.
pub fn wrt_same_lattice_and_normalize<T: LatticeScalar>(
    a: &CrystalOperator<T>,
    b: &CrystalOperator<T>,
) -> Result<(CrystalOperator<T>, CrystalOperator<T>)> {
    let lattice = lcm_of_lattices(&[a.lattice().clone(), b.lattice().clone()])?;
    let a = a.wrt_lattice(&lattice)?.normalize()?;
    let b = b.wrt_lattice(&lattice)?.normalize()?;
    debug!(
        "common lattice reached: shapes {:?} and {:?}",
        a.shape(),
        b.shape()
    );
    Ok((a, b))
}

impl<T: LatticeScalar> CrystalOperator<T> {
    /// `self + other`; both must map between the same structure elements.
    pub fn add(&self, other: &CrystalOperator<T>) -> Result<Self> {
        let (mut sum, other) = wrt_same_lattice_and_normalize(self, other)?;
        if !sum.crystal().same_structure(other.crystal()) {
            return Err(CrystalError::ShapeMismatch(format!(
                "cannot add operators with shapes {:?} and {:?} or different structure elements",
                sum.shape(),
                other.shape()
            )));
        }
        for multiplier in other.multipliers() {
            sum.push(multiplier, MergePolicy::Add)?;
        }
        sum.clean_up();
        Ok(sum)
    }

    pub fn sub(&self, other: &CrystalOperator<T>) -> Result<Self> {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Self {
        self.scale(-T::one())
    }

    /// Every block multiplied by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        let multipliers = self
            .iter()
            .map(|(pos, mat)| (pos.clone(), mat * factor.clone()))
            .collect();
        CrystalOperator::from_parts(self.crystal().clone(), multipliers)
    }

    pub fn divide(&self, divisor: T) -> Result<Self> {
        if divisor.is_zero() {
            return Err(CrystalError::DivisionByZero);
        }
        Ok(self.scale(T::one() / divisor))
    }

    /// The product `self · other`: apply `other`, then `self`.
    ///
    /// Each pair of multipliers contributes `a.mat · b.mat` at `a.pos + b.pos`;
    /// colliding contributions are summed.
    pub fn compose(&self, other: &CrystalOperator<T>) -> Result<Self> {
        let (a, b) = wrt_same_lattice_and_normalize(self, other)?;
        if !same_element_lists(a.crystal().domain(), b.crystal().codomain()) {
            return Err(CrystalError::ShapeMismatch(format!(
                "domain of the left factor ({} elements) does not match the codomain of the right factor ({} elements)",
                a.crystal().domain_size(),
                b.crystal().codomain_size()
            )));
        }

        let crystal = Crystal::from_parts(
            a.lattice().clone(),
            b.crystal().domain().to_vec(),
            a.crystal().codomain().to_vec(),
        );
        let mut product = CrystalOperator::from_parts(crystal, BTreeMap::<Position, DMatrix<T>>::new());
        for (pa, ma) in a.iter() {
            for (pb, mb) in b.iter() {
                product.push(Multiplier::new(add_positions(pa, pb)?, ma * mb), MergePolicy::Add)?;
            }
        }
        product.clean_up();
        debug!(
            "composed {} x {} multipliers into {}",
            a.len(),
            b.len(),
            product.len()
        );
        Ok(product)
    }
}
