#[cfg(test)]
mod _tests_sampling {
    use super::super::sampling::*;
    use crate::crystal::{fw_restriction, laplace};
    use crate::error::CrystalError;
    use crate::interfaces::SortKey;
    use crate::lattice::Lattice;
    use num_complex::Complex64;

    const TOL: f64 = 1e-10;

    fn reals(values: &[Complex64]) -> Vec<f64> {
        values.iter().map(|z| z.re).collect()
    }

    #[test]
    fn test_frequency_grid() {
        assert_eq!(frequency_grid(1, 4), vec![vec![0.0], vec![0.25], vec![0.5], vec![0.75]]);

        let grid = frequency_grid(2, 3);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[0], vec![0.0, 0.0]);
        assert_eq!(grid[1], vec![0.0, 1.0 / 3.0]);
        assert_eq!(grid[3], vec![1.0 / 3.0, 0.0]);
    }

    #[test]
    fn test_options_builder() {
        let options = SpectrumOptions::default();
        assert_eq!(options.samples(), crate::config::DEFAULT_SAMPLE_COUNT);
        assert!(!options.unique());

        let options = SpectrumOptions::new()
            .with_samples(7)
            .with_unique(true)
            .with_digits(3)
            .with_sort_key(SortKey::RealPart);
        assert_eq!(options.samples(), 7);
        assert!(options.unique());
        assert_eq!(options.digits(), 3);
        assert!(matches!(options.sort_key(), SortKey::RealPart));
    }

    #[test]
    fn test_laplace_spectrum() {
        let a = laplace(1, 1.0).unwrap();
        let spectrum = compute_spectrum(&a, &SpectrumOptions::new().with_samples(4)).unwrap();
        assert_eq!(spectrum.len(), 4);
        assert_eq!(spectrum.rows().len(), 4);

        let expected = [0.0, -2.0, -4.0, -2.0];
        for (sample, value) in spectrum.samples.iter().zip(expected) {
            assert!((sample.eigenvalues[0] - Complex64::new(value, 0.0)).norm() < TOL);
        }
        assert!((spectrum.spectral_radius() - 4.0).abs() < TOL);
        assert_eq!(reals(&spectrum.eigenvalues(true, 5)), vec![-4.0, -2.0, 0.0]);
    }

    #[test]
    fn test_unique_eigenvalues_survive_aliasing() {
        let options = SpectrumOptions::new().with_unique(true);
        let fine = laplace(1, 1.0).unwrap();
        let coarse = fine.wrt_lattice(&Lattice::uniform(1, 2.0).unwrap()).unwrap();

        let fine_values = sampled_eigenvalues(&fine, &options.clone().with_samples(4)).unwrap();
        let coarse_values = sampled_eigenvalues(&coarse, &options.with_samples(2)).unwrap();
        assert_eq!(fine_values, coarse_values);
        assert_eq!(reals(&coarse_values), vec![-4.0, -2.0, 0.0]);
    }

    #[test]
    fn test_spectrum_errors() {
        let a = laplace(1, 1.0).unwrap();
        assert!(matches!(
            compute_spectrum(&a, &SpectrumOptions::new().with_samples(0)),
            Err(CrystalError::InvalidArgument(_))
        ));

        let r = fw_restriction::<f64>(1).unwrap();
        assert!(matches!(
            compute_spectrum(&r, &SpectrumOptions::new()),
            Err(CrystalError::NotSquare { .. })
        ));
    }
}
