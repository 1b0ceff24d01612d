//! Expression trees over crystal operators.

use std::ops::{Add, Mul, Sub};

use log::debug;
use nalgebra::DMatrix;
use num_complex::Complex64;

use super::crystal_operator::CrystalOperator;
use super::multiplier::Multiplier;
use super::structure::{same_element_lists, Crystal};
use crate::error::{CrystalError, Result};
use crate::interfaces::MergePolicy;
use crate::lattice::{lcm_of_lattices, Lattice};
use crate::scalar::{try_inverse, LatticeScalar};
use crate::spectrum::Symbol;

/// A node of an operator expression.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorExpr<T: LatticeScalar> {
    Operator(CrystalOperator<T>),
    Sum(Box<OperatorExpr<T>>, Box<OperatorExpr<T>>),
    Difference(Box<OperatorExpr<T>>, Box<OperatorExpr<T>>),
    /// Left factor applied after the right one.
    Product(Box<OperatorExpr<T>>, Box<OperatorExpr<T>>),
    Scale(T, Box<OperatorExpr<T>>),
    Inverse(Box<OperatorExpr<T>>),
}

impl<T: LatticeScalar> OperatorExpr<T> {
    pub fn leaf(operator: CrystalOperator<T>) -> Self {
        OperatorExpr::Operator(operator)
    }

    pub fn scale(factor: T, expression: OperatorExpr<T>) -> Self {
        OperatorExpr::Scale(factor, Box::new(expression))
    }

    pub fn inverse(expression: OperatorExpr<T>) -> Self {
        OperatorExpr::Inverse(Box::new(expression))
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a CrystalOperator<T>>) {
        match self {
            OperatorExpr::Operator(op) => leaves.push(op),
            OperatorExpr::Sum(a, b) | OperatorExpr::Difference(a, b) | OperatorExpr::Product(a, b) => {
                a.collect_leaves(leaves);
                b.collect_leaves(leaves);
            }
            OperatorExpr::Scale(_, a) | OperatorExpr::Inverse(a) => a.collect_leaves(leaves),
        }
    }

    pub fn leaves(&self) -> Vec<&CrystalOperator<T>> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn try_map_leaves<F>(&self, f: &F) -> Result<OperatorExpr<T>>
    where
        F: Fn(&CrystalOperator<T>) -> Result<CrystalOperator<T>>,
    {
        Ok(match self {
            OperatorExpr::Operator(op) => OperatorExpr::Operator(f(op)?),
            OperatorExpr::Sum(a, b) => {
                OperatorExpr::Sum(Box::new(a.try_map_leaves(f)?), Box::new(b.try_map_leaves(f)?))
            }
            OperatorExpr::Difference(a, b) => OperatorExpr::Difference(
                Box::new(a.try_map_leaves(f)?),
                Box::new(b.try_map_leaves(f)?),
            ),
            OperatorExpr::Product(a, b) => OperatorExpr::Product(
                Box::new(a.try_map_leaves(f)?),
                Box::new(b.try_map_leaves(f)?),
            ),
            OperatorExpr::Scale(factor, a) => {
                OperatorExpr::Scale(factor.clone(), Box::new(a.try_map_leaves(f)?))
            }
            OperatorExpr::Inverse(a) => OperatorExpr::Inverse(Box::new(a.try_map_leaves(f)?)),
        })
    }
}

impl<T: LatticeScalar> From<CrystalOperator<T>> for OperatorExpr<T> {
    fn from(operator: CrystalOperator<T>) -> Self {
        OperatorExpr::Operator(operator)
    }
}

impl<T: LatticeScalar> Add for OperatorExpr<T> {
    type Output = OperatorExpr<T>;

    fn add(self, rhs: Self) -> Self::Output {
        OperatorExpr::Sum(Box::new(self), Box::new(rhs))
    }
}

impl<T: LatticeScalar> Sub for OperatorExpr<T> {
    type Output = OperatorExpr<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        OperatorExpr::Difference(Box::new(self), Box::new(rhs))
    }
}

impl<T: LatticeScalar> Mul for OperatorExpr<T> {
    type Output = OperatorExpr<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        OperatorExpr::Product(Box::new(self), Box::new(rhs))
    }
}

/// A validated operator expression whose leaves all live on one common lattice
/// (the lcm of the leaves' lattices) and are normalised.
#[derive(Debug, Clone)]
pub struct OperatorComposition<T: LatticeScalar> {
    expression: OperatorExpr<T>,
    crystal: Crystal<T>,
}

impl<T: LatticeScalar> OperatorComposition<T> {
    /// Rewrites all leaves onto their common lattice and checks every node for
    /// compatible structure elements. The shape check runs on crystals only, so a
    /// mismatch is reported before any multiplier is rewritten.
    pub fn new(expression: OperatorExpr<T>) -> Result<Self> {
        let lattices: Vec<Lattice<T>> = expression
            .leaves()
            .iter()
            .map(|op| op.lattice().clone())
            .collect();
        let lattice = lcm_of_lattices(&lattices)?;
        let crystal = check_node(&expression, &lattice)?;
        let expression = expression.try_map_leaves(&|op| op.wrt_lattice(&lattice)?.normalize())?;
        debug!(
            "operator composition over {} leaves, symbol shape {}x{}",
            lattices.len(),
            crystal.codomain_size(),
            crystal.domain_size()
        );
        Ok(OperatorComposition {
            expression,
            crystal,
        })
    }

    pub fn expression(&self) -> &OperatorExpr<T> {
        &self.expression
    }

    /// Normalised crystal of the whole expression.
    pub fn crystal(&self) -> &Crystal<T> {
        &self.crystal
    }

    pub fn lattice(&self) -> &Lattice<T> {
        self.crystal.lattice()
    }

    /// Collapses the tree into a single operator.
    ///
    /// Inverses are only representable for operators consisting of one multiplier at the
    /// origin; anything else fails with [`CrystalError::NotInvertible`].
    pub fn to_operator(&self) -> Result<CrystalOperator<T>> {
        collapse(&self.expression)?.normalize()
    }

    pub(crate) fn evaluate_symbol(&self, k: &[f64]) -> Result<DMatrix<Complex64>> {
        symbol_of(&self.expression, k)
    }
}

fn check_node<T: LatticeScalar>(node: &OperatorExpr<T>, lattice: &Lattice<T>) -> Result<Crystal<T>> {
    match node {
        OperatorExpr::Operator(op) => op.check_wrt_lattice(lattice),
        OperatorExpr::Sum(a, b) | OperatorExpr::Difference(a, b) => {
            let (ca, cb) = (check_node(a, lattice)?, check_node(b, lattice)?);
            if !ca.same_structure(&cb) {
                return Err(CrystalError::ShapeMismatch(format!(
                    "summands map {} -> {} and {} -> {} structure elements",
                    ca.domain_size(),
                    ca.codomain_size(),
                    cb.domain_size(),
                    cb.codomain_size()
                )));
            }
            Ok(ca)
        }
        OperatorExpr::Product(a, b) => {
            let (ca, cb) = (check_node(a, lattice)?, check_node(b, lattice)?);
            if !same_element_lists(ca.domain(), cb.codomain()) {
                return Err(CrystalError::ShapeMismatch(format!(
                    "left factor takes {} structure elements, right factor produces {}",
                    ca.domain_size(),
                    cb.codomain_size()
                )));
            }
            Ok(Crystal::from_parts(
                lattice.clone(),
                cb.domain().to_vec(),
                ca.codomain().to_vec(),
            ))
        }
        OperatorExpr::Scale(_, a) => check_node(a, lattice),
        OperatorExpr::Inverse(a) => {
            let ca = check_node(a, lattice)?;
            if !same_element_lists(ca.domain(), ca.codomain()) {
                return Err(CrystalError::NotInvertible(format!(
                    "operator maps {} onto {} structure elements",
                    ca.domain_size(),
                    ca.codomain_size()
                )));
            }
            Ok(ca.swapped())
        }
    }
}

fn symbol_of<T: LatticeScalar>(node: &OperatorExpr<T>, k: &[f64]) -> Result<DMatrix<Complex64>> {
    match node {
        OperatorExpr::Operator(op) => op.symbol(k),
        OperatorExpr::Sum(a, b) => Ok(symbol_of(a, k)? + symbol_of(b, k)?),
        OperatorExpr::Difference(a, b) => Ok(symbol_of(a, k)? - symbol_of(b, k)?),
        OperatorExpr::Product(a, b) => Ok(symbol_of(a, k)? * symbol_of(b, k)?),
        OperatorExpr::Scale(factor, a) => Ok(symbol_of(a, k)? * Complex64::new(factor.to_f64(), 0.0)),
        OperatorExpr::Inverse(a) => {
            let inner = symbol_of(a, k)?;
            inner
                .try_inverse()
                .filter(|inverse| inverse.iter().all(|z| z.re.is_finite() && z.im.is_finite()))
                .ok_or_else(|| {
                    CrystalError::NotInvertible(format!("symbol is singular at frequency {k:?}"))
                })
        }
    }
}

fn collapse<T: LatticeScalar>(node: &OperatorExpr<T>) -> Result<CrystalOperator<T>> {
    match node {
        OperatorExpr::Operator(op) => Ok(op.clone()),
        OperatorExpr::Sum(a, b) => collapse(a)?.add(&collapse(b)?),
        OperatorExpr::Difference(a, b) => collapse(a)?.sub(&collapse(b)?),
        OperatorExpr::Product(a, b) => collapse(a)?.compose(&collapse(b)?),
        OperatorExpr::Scale(factor, a) => Ok(collapse(a)?.scale(factor.clone())),
        OperatorExpr::Inverse(a) => invert_local(&collapse(a)?),
    }
}

/// Inverse of an operator that acts pointwise (single multiplier at the origin).
fn invert_local<T: LatticeScalar>(operator: &CrystalOperator<T>) -> Result<CrystalOperator<T>> {
    let mut multipliers = operator.iter();
    let local = match (multipliers.next(), multipliers.next()) {
        (Some((pos, mat)), None) if pos.iter().all(|&p| p == 0) => mat,
        _ => {
            return Err(CrystalError::NotInvertible(format!(
                "only a single multiplier at the origin can be inverted, found {} multipliers",
                operator.len()
            )))
        }
    };
    let inverse = try_inverse(local)
        .ok_or_else(|| CrystalError::NotInvertible("local block is singular".into()))?;
    let mut result = CrystalOperator::zero(operator.crystal().swapped());
    result.push(
        Multiplier::new(vec![0; operator.dim()], inverse),
        MergePolicy::Replace,
    )?;
    Ok(result)
}
