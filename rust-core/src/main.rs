use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crystal_lfa::crystal::{fw_restriction, laplace, linear_interpolation};
use crystal_lfa::spectrum::sampled_eigenvalues;
use crystal_lfa::{
    compute_spectrum, eigvals, Crystal, CrystalOperator, OperatorComposition, OperatorExpr,
    SortKey, SpectrumOptions, Symbol,
};
use env_logger::Env;
use log::{info, warn};

#[derive(Parser)]
#[command(name = "crystal-lfa")]
#[command(about = "Local Fourier analysis of translation-invariant operators")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Number of threads to use (default: all available cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Shift subtracted from the Laplacian's diagonal, making it invertible at k = 0
    #[arg(short, long, global = true, default_value = "0.0")]
    mass: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Operator {
    /// Central-difference Laplacian
    Laplace,
    /// Galerkin coarse operator R·A·P
    Galerkin,
    /// Coarse-grid correction I - P(RAP)⁻¹RA
    CoarseGridCorrection,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the eigenvalues of an operator's symbol over one period
    Spectrum {
        #[arg(value_enum, default_value = "laplace")]
        operator: Operator,

        /// Spatial dimension
        #[arg(short, long, default_value = "1")]
        dim: usize,

        /// Frequencies per dimension
        #[arg(short, long, default_value = "20")]
        samples: usize,

        /// Print each distinct eigenvalue once
        #[arg(short, long)]
        unique: bool,
    },
    /// Print the symbol and its eigenvalues at one frequency
    Symbol {
        #[arg(value_enum, default_value = "laplace")]
        operator: Operator,

        /// Frequency, one coordinate per dimension
        #[arg(short, long, num_args = 1.., required = true, allow_negative_numbers = true)]
        frequency: Vec<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("failed to set thread pool size")?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!("Thread count {threads} specified but parallel feature not enabled. Ignoring.");
        }
    }

    info!("Starting crystal-lfa v{}", crystal_lfa::VERSION);

    match cli.command {
        Commands::Spectrum {
            operator,
            dim,
            samples,
            unique,
        } => {
            let composition = build(operator, dim, cli.mass)?;
            print_spectrum(&composition, samples, unique)
                .context("sampling failed (singular coarse symbols need a nonzero --mass)")
        }
        Commands::Symbol {
            operator,
            frequency,
        } => {
            let composition = build(operator, frequency.len(), cli.mass)?;
            print_symbol(&composition, &frequency)
        }
    }
}

fn build(operator: Operator, dim: usize, mass: f64) -> Result<OperatorComposition<f64>> {
    if dim == 0 {
        bail!("dimension must be positive");
    }
    let mut a = laplace(dim, 1.0)?;
    if mass != 0.0 {
        a = a.sub(&CrystalOperator::identity(Crystal::identity(dim), mass))?;
    }
    let expression = match operator {
        Operator::Laplace => OperatorExpr::leaf(a),
        Operator::Galerkin => {
            OperatorExpr::leaf(fw_restriction(dim)?)
                * OperatorExpr::leaf(a)
                * OperatorExpr::leaf(linear_interpolation(dim)?)
        }
        Operator::CoarseGridCorrection => {
            let r = OperatorExpr::leaf(fw_restriction(dim)?);
            let p = OperatorExpr::leaf(linear_interpolation(dim)?);
            let a = OperatorExpr::leaf(a);
            let coarse = r.clone() * a.clone() * p.clone();
            let identity = OperatorExpr::leaf(CrystalOperator::identity(Crystal::identity(dim), 1.0));
            identity - p * OperatorExpr::inverse(coarse) * r * a
        }
    };
    Ok(OperatorComposition::new(expression)?)
}

fn print_spectrum(composition: &OperatorComposition<f64>, samples: usize, unique: bool) -> Result<()> {
    let options = SpectrumOptions::new()
        .with_samples(samples)
        .with_sort_key(SortKey::RealPart)
        .with_unique(unique);

    if unique {
        for value in sampled_eigenvalues(composition, &options)? {
            println!("{:.6} {:+.6}i", value.re, value.im);
        }
        return Ok(());
    }

    let spectrum = compute_spectrum(composition, &options)?;
    info!(
        "{} frequencies, spectral radius {:.6}",
        spectrum.len(),
        spectrum.spectral_radius()
    );
    for (frequency, value) in spectrum.rows() {
        let k: Vec<String> = frequency.iter().map(|x| format!("{x:.4}")).collect();
        println!("{} {:.6} {:+.6}i", k.join(" "), value.re, value.im);
    }
    Ok(())
}

fn print_symbol(composition: &OperatorComposition<f64>, k: &[f64]) -> Result<()> {
    let symbol = composition.symbol(k)?;
    println!("symbol at {k:?}:");
    for row in symbol.row_iter() {
        let entries: Vec<String> = row
            .iter()
            .map(|z| format!("{:.6}{:+.6}i", z.re, z.im))
            .collect();
        println!("  [{}]", entries.join(", "));
    }
    let (rows, cols) = composition.shape();
    if rows == cols {
        let values = eigvals(composition, k, &SortKey::Modulus)?;
        println!("eigenvalues:");
        for value in values {
            println!("  {:.6} {:+.6}i", value.re, value.im);
        }
    }
    Ok(())
}
