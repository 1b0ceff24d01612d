use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{CrystalError, Result};
use crate::lattice::{
    check_if_normal, elements_in_quotient_space, shift_into_standard_cell, Lattice,
    StandardCellShift,
};
use crate::scalar::{approx_eq_slices, LatticeScalar};

/// A lattice together with the structure elements an operator maps from (`domain`)
/// and to (`codomain`). Each element `s` stands for the point set `A·ℤᴺ + s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: LatticeScalar")]
pub struct Crystal<T: LatticeScalar> {
    lattice: Lattice<T>,
    domain: Vec<DVector<T>>,
    codomain: Vec<DVector<T>>,
}

fn check_elements<T: LatticeScalar>(
    elements: &[DVector<T>],
    dim: usize,
    what: &str,
) -> Result<()> {
    if elements.is_empty() {
        return Err(CrystalError::InvalidArgument(format!("{what} must not be empty")));
    }
    match elements.iter().find(|e| e.len() != dim) {
        Some(e) => Err(CrystalError::dimension(dim, e.len())),
        None => Ok(()),
    }
}

impl<T: LatticeScalar> Crystal<T> {
    /// The codomain defaults to the domain.
    pub fn new(
        lattice: Lattice<T>,
        domain: Vec<DVector<T>>,
        codomain: Option<Vec<DVector<T>>>,
    ) -> Result<Self> {
        let codomain = codomain.unwrap_or_else(|| domain.clone());
        check_elements(&domain, lattice.dim(), "domain")?;
        check_elements(&codomain, lattice.dim(), "codomain")?;
        Ok(Crystal {
            lattice,
            domain,
            codomain,
        })
    }

    /// A single structure element at the origin.
    pub fn with_lattice(lattice: Lattice<T>) -> Self {
        let origin = vec![DVector::zeros(lattice.dim())];
        Crystal {
            lattice,
            domain: origin.clone(),
            codomain: origin,
        }
    }

    /// ℤᴺ with a single structure element at the origin.
    pub fn identity(dim: usize) -> Self {
        Self::with_lattice(Lattice::identity(dim))
    }

    pub fn dim(&self) -> usize {
        self.lattice.dim()
    }

    pub fn lattice(&self) -> &Lattice<T> {
        &self.lattice
    }

    pub fn domain(&self) -> &[DVector<T>] {
        &self.domain
    }

    pub fn codomain(&self) -> &[DVector<T>] {
        &self.codomain
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    pub fn codomain_size(&self) -> usize {
        self.codomain.len()
    }

    /// Domain and codomain of the adjoint map.
    pub fn swapped(&self) -> Self {
        Crystal {
            lattice: self.lattice.clone(),
            domain: self.codomain.clone(),
            codomain: self.domain.clone(),
        }
    }

    pub(crate) fn from_parts(
        lattice: Lattice<T>,
        domain: Vec<DVector<T>>,
        codomain: Vec<DVector<T>>,
    ) -> Self {
        Crystal {
            lattice,
            domain,
            codomain,
        }
    }

    pub(crate) fn standard_cell_shifts(&self) -> Result<(StandardCellShift<T>, StandardCellShift<T>)> {
        Ok((
            shift_into_standard_cell(&self.domain, &self.lattice)?,
            shift_into_standard_cell(&self.codomain, &self.lattice)?,
        ))
    }

    /// Structure elements moved into the standard cell and sorted.
    pub fn normalize(&self) -> Result<Self> {
        let (domain, codomain) = self.standard_cell_shifts()?;
        Ok(Crystal {
            lattice: self.lattice.clone(),
            domain: domain.points,
            codomain: codomain.points,
        })
    }

    pub fn is_normal(&self) -> bool {
        check_if_normal(&self.domain, &self.lattice) && check_if_normal(&self.codomain, &self.lattice)
    }

    /// The same point sets described over a sublattice: element `s` and quotient
    /// point `q` become the element `s + q` at index `q·|S| + s`.
    pub fn wrt_lattice(&self, lattice: &Lattice<T>) -> Result<Self> {
        let quotient = elements_in_quotient_space(&self.lattice, lattice)?;
        Ok(self.expanded(lattice.clone(), &quotient.points))
    }

    pub(crate) fn expanded(&self, lattice: Lattice<T>, offsets: &[DVector<T>]) -> Self {
        let expand = |elements: &[DVector<T>]| -> Vec<DVector<T>> {
            offsets
                .iter()
                .flat_map(|q| elements.iter().map(move |s| s + q))
                .collect()
        };
        Crystal {
            domain: expand(&self.domain),
            codomain: expand(&self.codomain),
            lattice,
        }
    }

    /// Same lattice basis and elementwise equal structure elements.
    pub fn same_structure(&self, other: &Crystal<T>) -> bool {
        approx_eq_slices(self.lattice.basis().as_slice(), other.lattice.basis().as_slice())
            && same_element_lists(&self.domain, &other.domain)
            && same_element_lists(&self.codomain, &other.codomain)
    }
}

pub(crate) fn same_element_lists<T: LatticeScalar>(a: &[DVector<T>], b: &[DVector<T>]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| approx_eq_slices(x.as_slice(), y.as_slice()))
}
