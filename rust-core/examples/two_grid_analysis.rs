/// Local Fourier analysis of a two-grid method for the 2D Laplacian
///
/// Builds damped Jacobi smoothing, full-weighting restriction, linear interpolation and
/// the Galerkin coarse operator, then samples the spectrum of the error propagator
/// `S · (I - P (RAP)⁻¹ R A) · S`.
use crystal_lfa::crystal::{fw_restriction, laplace, linear_interpolation};
use crystal_lfa::{
    compute_spectrum, Crystal, CrystalOperator, OperatorComposition, OperatorExpr, SpectrumOptions,
    Symbol,
};

const DIM: usize = 2;
const OMEGA: f64 = 0.8;
// Keeps the coarse symbol invertible at k = 0
const SHIFT: f64 = 1e-3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Two-grid analysis of the {DIM}D Laplacian ===\n");

    let identity = CrystalOperator::identity(Crystal::identity(DIM), 1.0);
    let a = laplace(DIM, 1.0)?.sub(&identity.scale(SHIFT))?;
    let r = fw_restriction(DIM)?;
    let p = linear_interpolation(DIM)?;

    // 1. The Galerkin coarse operator collapses into a single stencil
    let galerkin = OperatorComposition::new(
        OperatorExpr::leaf(r.clone()) * OperatorExpr::leaf(a.clone()) * OperatorExpr::leaf(p.clone()),
    )?
    .to_operator()?;
    println!("1. Galerkin coarse operator R·A·P ({} multipliers):", galerkin.len());
    for (pos, mat) in galerkin.iter() {
        println!("   {:?}: {:.4}", pos, mat[(0, 0)]);
    }

    // 2. Damped Jacobi: S = I - ω D⁻¹ A with D = -2N (1 + shift) on the diagonal
    let diagonal = -(2.0 * DIM as f64) - SHIFT;
    let smoother = identity.sub(&a.scale(OMEGA / diagonal))?;

    let (i, s, r, a, p) = (
        OperatorExpr::leaf(identity),
        OperatorExpr::leaf(smoother),
        OperatorExpr::leaf(r),
        OperatorExpr::leaf(a),
        OperatorExpr::leaf(p),
    );
    let coarse = r.clone() * a.clone() * p.clone();
    let correction = i - p * OperatorExpr::inverse(coarse) * r * a;
    let two_grid = OperatorComposition::new(s.clone() * correction * s.clone())?;
    let smoothing = OperatorComposition::new(s)?;
    println!(
        "\n2. Error propagator: symbol {}x{} on a lattice of volume {:.1}",
        two_grid.shape().0,
        two_grid.shape().1,
        two_grid.lattice().volume()
    );

    // 3. Spectra
    let options = SpectrumOptions::new().with_samples(16);
    let smoothing_spectrum = compute_spectrum(&smoothing, &options)?;
    let two_grid_spectrum = compute_spectrum(&two_grid, &options)?;
    println!("\n3. Spectral radii over {} frequencies:", two_grid_spectrum.len());
    println!("   smoother alone:  {:.4}", smoothing_spectrum.spectral_radius());
    println!("   two-grid method: {:.4}", two_grid_spectrum.spectral_radius());

    Ok(())
}
