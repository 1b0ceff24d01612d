#[cfg(test)]
mod _tests_structure {
    use super::super::structure::*;
    use crate::error::CrystalError;
    use crate::lattice::Lattice;
    use nalgebra::{DMatrix, DVector};

    const TOL: f64 = 1e-12;

    fn v(values: &[f64]) -> DVector<f64> {
        DVector::from_vec(values.to_vec())
    }

    #[test]
    fn test_codomain_defaults_to_domain() {
        let crystal = Crystal::new(Lattice::identity(1), vec![v(&[0.0]), v(&[0.5])], None).unwrap();
        assert_eq!(crystal.domain_size(), 2);
        assert_eq!(crystal.codomain(), crystal.domain());
    }

    #[test]
    fn test_identity_crystal() {
        let crystal = Crystal::<f64>::identity(3);
        assert_eq!(crystal.dim(), 3);
        assert_eq!(crystal.domain(), &[DVector::zeros(3)]);
        assert!(crystal.is_normal());
    }

    #[test]
    fn test_invalid_structure_elements() {
        assert!(matches!(
            Crystal::new(Lattice::<f64>::identity(2), vec![], None),
            Err(CrystalError::InvalidArgument(_))
        ));
        assert!(matches!(
            Crystal::new(Lattice::identity(2), vec![v(&[0.0])], None),
            Err(CrystalError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_normalize_moves_elements_into_cell() {
        let crystal = Crystal::new(Lattice::identity(1), vec![v(&[-0.5])], Some(vec![v(&[1.5])])).unwrap();
        assert!(!crystal.is_normal());
        let normal = crystal.normalize().unwrap();
        assert!((normal.domain()[0][0] - 0.5).abs() < TOL);
        assert!((normal.codomain()[0][0] - 0.5).abs() < TOL);
        assert!(normal.is_normal());
    }

    #[test]
    fn test_normalize_sorts_elements() {
        let lattice = Lattice::uniform(1, 2.0).unwrap();
        let crystal = Crystal::new(lattice, vec![v(&[3.0]), v(&[-2.0])], None).unwrap();
        let normal = crystal.normalize().unwrap();
        assert!(normal.domain()[0][0].abs() < TOL);
        assert!((normal.domain()[1][0] - 1.0).abs() < TOL);
    }

    #[test]
    fn test_wrt_lattice_replicates_elements() {
        let crystal = Crystal::<f64>::identity(1);
        let coarse = Lattice::uniform(1, 2.0).unwrap();
        let rewritten = crystal.wrt_lattice(&coarse).unwrap();
        assert_eq!(rewritten.domain_size(), 2);
        assert!((rewritten.domain()[1][0] - 1.0).abs() < TOL);
        assert!(rewritten.is_normal());

        // Quotient element major: q·|S| + s
        let two = Crystal::new(Lattice::identity(1), vec![v(&[0.0]), v(&[0.5])], None).unwrap();
        let rewritten = two.wrt_lattice(&coarse).unwrap();
        let positions: Vec<f64> = rewritten.domain().iter().map(|e| e[0]).collect();
        assert_eq!(positions.len(), 4);
        for (got, expected) in positions.iter().zip([0.0, 0.5, 1.0, 1.5]) {
            assert!((got - expected).abs() < TOL);
        }
    }

    #[test]
    fn test_wrt_checkerboard_lattice() {
        let crystal = Crystal::<f64>::identity(2);
        let coarse = Lattice::new(DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -1.0, 1.0])).unwrap();
        let rewritten = crystal.wrt_lattice(&coarse).unwrap();
        assert_eq!(rewritten.domain_size(), 2);
        assert!((&rewritten.domain()[1] - v(&[1.0, 0.0])).norm() < TOL);
    }

    #[test]
    fn test_wrt_doubled_lattice_orders_last_coordinate_slowest() {
        let crystal = Crystal::<f64>::identity(2);
        let coarse = Lattice::uniform(2, 2.0).unwrap();
        let rewritten = crystal.wrt_lattice(&coarse).unwrap();
        let expected = [v(&[0.0, 0.0]), v(&[1.0, 0.0]), v(&[0.0, 1.0]), v(&[1.0, 1.0])];
        assert_eq!(rewritten.domain_size(), expected.len());
        for (got, want) in rewritten.domain().iter().zip(expected.iter()) {
            assert!((got - want).norm() < TOL);
        }
        assert!(rewritten.is_normal());
    }

    #[test]
    fn test_swapped_and_structure_comparison() {
        let crystal = Crystal::new(Lattice::identity(1), vec![v(&[0.0]), v(&[0.5])], Some(vec![v(&[0.0])])).unwrap();
        let swapped = crystal.swapped();
        assert_eq!(swapped.domain_size(), 1);
        assert_eq!(swapped.codomain_size(), 2);
        assert!(!swapped.same_structure(&crystal));
        assert!(swapped.swapped().same_structure(&crystal));
    }
}
