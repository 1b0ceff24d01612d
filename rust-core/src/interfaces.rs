// Definitions that are used throughout all modules

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Integer offset of a multiplier, in fractional coordinates of the operator's lattice.
pub type Position = Vec<i64>;

// How push resolves a collision with an existing multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergePolicy {
    #[default]
    Replace,
    Add,
}

/// Key used to order eigenvalues (ascending).
#[derive(Debug, Clone, Copy, Default)]
pub enum SortKey {
    /// |λ|
    #[default]
    Modulus,
    RealPart,
    ImaginaryPart,
    Custom(fn(&Complex64) -> f64),
}

impl SortKey {
    pub fn key(&self, value: &Complex64) -> f64 {
        match self {
            SortKey::Modulus => value.norm(),
            SortKey::RealPart => value.re,
            SortKey::ImaginaryPart => value.im,
            SortKey::Custom(f) => f(value),
        }
    }
}
