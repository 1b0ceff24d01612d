use log::debug;
use num_complex::Complex64;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::eigen::eigvals;
use super::symbol::Symbol;
use crate::config::{DEFAULT_DIGITS, DEFAULT_SAMPLE_COUNT};
use crate::error::{CrystalError, Result};
use crate::interfaces::SortKey;

/// Settings for [`compute_spectrum`] and [`sampled_eigenvalues`].
#[derive(Debug, Clone)]
pub struct SpectrumOptions {
    samples: usize,
    sort_key: SortKey,
    unique: bool,
    digits: u32,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumOptions {
    pub fn new() -> Self {
        SpectrumOptions {
            samples: DEFAULT_SAMPLE_COUNT,
            sort_key: SortKey::default(),
            unique: false,
            digits: DEFAULT_DIGITS,
        }
    }

    /// Frequencies per dimension.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Deduplicate eigenvalues in [`sampled_eigenvalues`].
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Decimal digits kept before deduplicating.
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn sort_key(&self) -> &SortKey {
        &self.sort_key
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }
}

/// Eigenvalues of the symbol at one frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSample {
    pub frequency: Vec<f64>,
    pub eigenvalues: Vec<Complex64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub samples: Vec<SpectrumSample>,
}

fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    // Avoid -0.0 surviving as a distinct value
    (value * scale).round() / scale + 0.0
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Flat table of `(frequency, eigenvalue)` pairs.
    pub fn rows(&self) -> Vec<(Vec<f64>, Complex64)> {
        self.samples
            .iter()
            .flat_map(|s| s.eigenvalues.iter().map(move |&l| (s.frequency.clone(), l)))
            .collect()
    }

    /// All sampled eigenvalues; with `unique`, rounded to `digits` decimals, sorted
    /// by real then imaginary part and deduplicated.
    pub fn eigenvalues(&self, unique: bool, digits: u32) -> Vec<Complex64> {
        let all = self.samples.iter().flat_map(|s| s.eigenvalues.iter().copied());
        if !unique {
            return all.collect();
        }
        let mut rounded: Vec<Complex64> = all
            .map(|z| Complex64::new(round_to(z.re, digits), round_to(z.im, digits)))
            .collect();
        rounded.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        rounded.dedup();
        rounded
    }

    /// Largest eigenvalue modulus over all samples.
    pub fn spectral_radius(&self) -> f64 {
        self.samples
            .iter()
            .flat_map(|s| s.eigenvalues.iter())
            .map(|z| z.norm())
            .fold(0.0, f64::max)
    }
}

/// `samples`ᴺ frequencies `k_j = i_j / samples`, first coordinate varying slowest.
pub fn frequency_grid(dim: usize, samples: usize) -> Vec<Vec<f64>> {
    let total = samples.pow(dim as u32);
    (0..total)
        .map(|n| {
            (0..dim)
                .map(|j| {
                    let stride = samples.pow((dim - 1 - j) as u32);
                    ((n / stride) % samples) as f64 / samples as f64
                })
                .collect()
        })
        .collect()
}

fn sample<S: Symbol + ?Sized>(operator: &S, frequency: Vec<f64>, sort_key: &SortKey) -> Result<SpectrumSample> {
    let eigenvalues = eigvals(operator, &frequency, sort_key)?;
    Ok(SpectrumSample {
        frequency,
        eigenvalues,
    })
}

/// Eigenvalues of the symbol on an equispaced grid covering one period of the dual cell.
pub fn compute_spectrum<S: Symbol + Sync + ?Sized>(
    operator: &S,
    options: &SpectrumOptions,
) -> Result<Spectrum> {
    if options.samples == 0 {
        return Err(CrystalError::InvalidArgument(
            "at least one sample per dimension is required".into(),
        ));
    }
    let (rows, cols) = operator.shape();
    if rows != cols {
        return Err(CrystalError::NotSquare { rows, cols });
    }

    let grid = frequency_grid(operator.dimension(), options.samples);
    debug!(
        "sampling {} frequencies of a {}x{} symbol",
        grid.len(),
        rows,
        cols
    );

    #[cfg(feature = "parallel")]
    let samples = grid
        .into_par_iter()
        .map(|k| sample(operator, k, &options.sort_key))
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let samples = grid
        .into_iter()
        .map(|k| sample(operator, k, &options.sort_key))
        .collect::<Result<Vec<_>>>()?;

    Ok(Spectrum { samples })
}

/// All eigenvalues over the sampling grid, deduplicated if the options ask for it.
pub fn sampled_eigenvalues<S: Symbol + Sync + ?Sized>(
    operator: &S,
    options: &SpectrumOptions,
) -> Result<Vec<Complex64>> {
    Ok(compute_spectrum(operator, options)?.eigenvalues(options.unique, options.digits))
}
