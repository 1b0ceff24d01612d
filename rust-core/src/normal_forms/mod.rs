// Exact integer normal forms
pub mod hermite;
pub mod integer_matrix;
pub mod lll;
pub mod quotient;
pub mod smith;

// Re-export the main entry points
pub use hermite::{hermite_normal_form, HermiteForm};
pub use integer_matrix::{
    common_denominator, from_position, integer_determinant, integer_identity, integer_matrix,
    is_unimodular, scale_to_integer, to_position, to_rational, unimodular_inverse, IntegerMatrix,
};
pub use lll::{lll_reduce, LllReduction};
pub use quotient::{CosetRepresentatives, IntegerSublattice};
pub use smith::{smith_normal_form_with_transform, SmithForm};

// Test modules
mod _tests_hermite;
mod _tests_smith;
