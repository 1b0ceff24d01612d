//! Translation-invariant operators on crystals
//!
//! This library provides exact lattice arithmetic (Hermite, Smith and LLL normal forms,
//! least common multiples and quotients of lattices), an algebra of crystal operators
//! (stencils with block-valued coefficients acting on periodic point sets) and the local
//! Fourier analysis of such operators through their symbols.

pub mod config;
pub mod crystal;
pub mod error;
pub mod interfaces;
pub mod lattice;
pub mod normal_forms;
pub mod scalar;
pub mod spectrum;

pub use crystal::{Crystal, CrystalOperator, Multiplier, OperatorComposition, OperatorExpr};
pub use error::{CrystalError, Result};
pub use interfaces::{MergePolicy, Position, SortKey};
pub use lattice::Lattice;
pub use scalar::LatticeScalar;
pub use spectrum::{compute_spectrum, eigen, eigvals, Spectrum, SpectrumOptions, Symbol};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
