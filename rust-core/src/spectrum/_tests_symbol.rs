#[cfg(test)]
mod _tests_symbol {
    use super::super::symbol::*;
    use crate::crystal::{laplace, Crystal, CrystalOperator};
    use crate::error::CrystalError;
    use crate::lattice::Lattice;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_identity_symbol() {
        let identity = CrystalOperator::identity(Crystal::<f64>::identity(2), 1.0);
        assert_eq!(identity.dimension(), 2);
        for k in [[0.0, 0.0], [0.3, 0.7], [0.5, 0.25]] {
            let symbol = identity.symbol(&k).unwrap();
            assert_eq!(symbol.shape(), (1, 1));
            assert!((symbol[(0, 0)] - Complex64::new(1.0, 0.0)).norm() < TOL);
        }
    }

    #[test]
    fn test_laplace_symbol() {
        let a = laplace(1, 1.0).unwrap();
        for k in [0.0, 0.1, 0.25, 0.5, 0.8] {
            let expected = -4.0 * (PI * k).sin().powi(2);
            let got = a.symbol(&[k]).unwrap()[(0, 0)];
            assert!((got - Complex64::new(expected, 0.0)).norm() < TOL, "k = {k}");
        }
        assert!((a.symbol(&[0.5]).unwrap()[(0, 0)].re + 4.0).abs() < TOL);
    }

    #[test]
    fn test_scaled_laplace_symbol() {
        let a = laplace(2, 1.0).unwrap().scale(3.0);
        let symbol = a.symbol(&[0.5, 0.5]).unwrap();
        assert!((symbol[(0, 0)] - Complex64::new(-24.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_block_symbol_is_hermitian() {
        let a = laplace(1, 1.0).unwrap();
        let coarse = a.wrt_lattice(&Lattice::uniform(1, 2.0).unwrap()).unwrap();
        assert_eq!(Symbol::shape(&coarse), (2, 2));
        let symbol = coarse.symbol(&[0.3]).unwrap();
        assert!((symbol[(0, 1)] - symbol[(1, 0)].conj()).norm() < TOL);
        assert!((symbol[(0, 0)] + 2.0).norm() < TOL);
    }

    #[test]
    fn test_frequency_dimension_checked() {
        let a = laplace(2, 1.0).unwrap();
        assert!(matches!(
            a.symbol(&[0.1]),
            Err(CrystalError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }
}
