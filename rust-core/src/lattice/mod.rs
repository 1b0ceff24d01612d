// Lattice module: lattice bases and the algorithms that relate lattices to each other
// (common sublattices, quotient spaces, canonical cells)

// ======================== MODULE DECLARATIONS ========================
pub mod base_matrix;
pub mod lattice_algorithms;


// ======================== LATTICE ========================
pub use base_matrix::Lattice; // struct - square nonsingular basis, generic over the scalar type
// Lattice impl methods:
//   new(basis: DMatrix<T>) -> Result<Self>            - validates the basis (SingularBasis otherwise)
//   identity(dim) / uniform(dim, factor)              - ℤᴺ and factor·ℤᴺ
//   dim, basis, inverse, dual, determinant, volume     - derived read-only properties
//   frac_to_cart / cart_to_frac                        - coordinate conversions
//   integer_transformation_to(&other) -> Result<..>    - T with other = self·T
//   is_sublattice_of / same_points                     - point-set relations
//   reduced / hermite_basis                            - same lattice, canonicalised basis

// ======================== LATTICE ALGORITHMS ========================
pub use lattice_algorithms::{
    check_if_normal,            // fn(points, lattice) -> bool - points in [0,1)ᴺ and sorted
    elements_in_quotient_space, // fn(fine, coarse) -> Result<QuotientSpace<T>> - one point per coset
    hermite_form,               // fn(&DMatrix<T>) -> Result<HermiteForm> - HNF of integer-valued data
    lattice_reduce,             // fn(&DMatrix<T>) -> Result<LatticeReduction<T>> - LLL of a rational basis
    lcm_of_lattices,            // fn(&[Lattice<T>]) -> Result<Lattice<T>> - finest common sublattice
    quotient_sublattice,        // fn(fine, coarse) -> Result<IntegerSublattice> - coarse in fine coordinates
    shift_into_standard_cell,   // fn(points, lattice) -> Result<StandardCellShift<T>> - canonical cell reps
    smith_form,                 // fn(&DMatrix<T>) -> Result<SmithForm> - SNF of integer-valued data
    LatticeReduction,           // struct - reduced basis plus unimodular transform
    QuotientSpace,              // struct - coset representatives with coordinates
    StandardCellShift,          // struct - shifted points, integer shifts, sorting permutation
};
