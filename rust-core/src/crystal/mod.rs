// Crystal module: periodic structures, crystal operators and their algebra

// ======================== MODULE DECLARATIONS ========================
pub mod composition;
pub mod crystal_operator;
pub mod gallery;
pub mod multiplier;
pub mod operator_algebra;
pub mod structure;

mod _tests_crystal_operator;
mod _tests_structure;

// ======================== STRUCTURE ========================
pub use structure::Crystal; // struct - lattice plus domain/codomain structure elements
// Crystal impl methods:
//   new(lattice, domain, codomain: Option<..>) -> Result<Self> - codomain defaults to domain
//   with_lattice(lattice) / identity(dim)                     - single element at the origin
//   normalize() -> Result<Self>                               - elements in [0,1)ᴺ, sorted
//   wrt_lattice(&lattice) -> Result<Self>                     - replicate elements over the quotient

pub use multiplier::Multiplier; // struct - stencil entry (position, coupling block)

// ======================== CRYSTAL OPERATORS ========================
pub use crystal_operator::CrystalOperator; // struct - crystal plus multipliers keyed by position
// CrystalOperator impl methods:
//   new(crystal, multipliers) / identity(crystal, scalar) / zero(crystal) - construction
//   push(multiplier, MergePolicy) / clean_up()                           - in-place edits
//   find_multiplier(pos), iter(), multipliers()                           - inspection
//   wrt_lattice(&lattice), check_wrt_lattice(&lattice)                    - change of lattice
//   normalize(), transpose()                                              - canonical form, adjoint
//   add, sub, neg, scale, divide, compose                                 - operator algebra

pub use operator_algebra::wrt_same_lattice_and_normalize; // fn(&A, &B) -> Result<(A', B')> - common lattice, normalised

// ======================== EXPRESSIONS ========================
pub use composition::{
    OperatorComposition, // struct - validated expression over one common lattice
    OperatorExpr,        // enum - sum / difference / product / scale / inverse tree
};

// ======================== GALLERY ========================
pub use gallery::{
    fw_restriction,       // fn(dim) -> Result<CrystalOperator<T>> - full weighting onto 2ℤᴺ
    laplace,              // fn(dim, h) -> Result<CrystalOperator<T>> - central-difference Laplacian
    linear_interpolation, // fn(dim) -> Result<CrystalOperator<T>> - adjoint of full weighting
};
