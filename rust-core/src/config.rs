// Constants

// Tolerances
pub const BASE_VECTOR_TOLERANCE: f64 = 1e-10; // For the nonsingularity check of lattice bases
pub const LATTICE_TOLERANCE: f64 = 1e-10; // For snapping float coordinates onto integers
pub const RATIONALIZE_TOLERANCE: f64 = 1e-12; // Relative error allowed when turning floats into rationals

// Exact arithmetic
pub const MAX_RATIONAL_DENOMINATOR: i64 = 100_000; // Larger denominators are treated as incommensurable
pub const LLL_DELTA: (i64, i64) = (3, 4); // Lovász constant as numerator / denominator

// Eigen-analysis
pub const SCHUR_EPSILON: f64 = 1e-14;
pub const SCHUR_MAX_ITERATIONS: usize = 10_000;
pub const EIGENVECTOR_RESIDUAL: f64 = 1e-6; // Relative smallest singular value above which an eigenvector is suspect
pub const EIGENVALUE_CLUSTER_TOLERANCE: f64 = 1e-8; // Relative distance below which eigenvalues count as repeated

// Spectrum sampling
pub const DEFAULT_SAMPLE_COUNT: usize = 20; // Frequencies per dimension
pub const DEFAULT_DIGITS: u32 = 5; // Rounding used when deduplicating sampled eigenvalues
