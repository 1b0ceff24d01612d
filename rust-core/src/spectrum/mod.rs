// Spectrum module: Fourier symbols, their eigen-analysis and sampling over the dual cell

// ======================== MODULE DECLARATIONS ========================
pub mod eigen;
pub mod sampling;
pub mod symbol;

mod _tests_sampling;
mod _tests_symbol;

// ======================== SYMBOLS ========================
pub use symbol::Symbol; // trait - dimension(), shape(), symbol(k) for operators and compositions

// ======================== EIGEN-ANALYSIS ========================
pub use eigen::{
    eigen,              // fn(&S, k, &SortKey) -> Result<EigenDecomposition> - sorted eigenpairs of the symbol
    eigvals,            // fn(&S, k, &SortKey) -> Result<Vec<Complex64>> - sorted eigenvalues of the symbol
    matrix_eigenvalues, // fn(&DMatrix<Complex64>) -> Result<Vec<Complex64>> - Schur-based eigenvalues
    EigenDecomposition, // struct - eigenvalues and unit eigenvectors (columns)
};

// ======================== SPECTRUM SAMPLING ========================
pub use sampling::{
    compute_spectrum,    // fn(&S, &SpectrumOptions) -> Result<Spectrum> - eigenvalues on a frequency grid
    frequency_grid,      // fn(dim, samples) -> Vec<Vec<f64>> - equispaced grid over one period
    sampled_eigenvalues, // fn(&S, &SpectrumOptions) -> Result<Vec<Complex64>> - flattened, optionally unique
    Spectrum,            // struct - all samples of one operator
    SpectrumOptions,     // struct - builder for samples, sort key, uniqueness, digits
    SpectrumSample,      // struct - one frequency and its eigenvalues
};
