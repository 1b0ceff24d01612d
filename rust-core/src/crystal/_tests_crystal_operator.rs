#[cfg(test)]
mod _tests_crystal_operator {
    use super::super::crystal_operator::*;
    use super::super::gallery::laplace;
    use super::super::multiplier::Multiplier;
    use super::super::structure::Crystal;
    use crate::error::CrystalError;
    use crate::interfaces::MergePolicy;
    use crate::lattice::Lattice;
    use nalgebra::{DMatrix, DVector};
    use num_rational::BigRational;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    fn block(rows: usize, cols: usize, entries: &[i64]) -> DMatrix<BigRational> {
        DMatrix::from_row_iterator(rows, cols, entries.iter().map(|&x| q(x, 1)))
    }

    fn scalar_operator(entries: &[(i64, f64)]) -> CrystalOperator<f64> {
        let multipliers = entries
            .iter()
            .map(|&(p, value)| Multiplier::scalar(vec![p], value))
            .collect();
        CrystalOperator::new(Crystal::identity(1), multipliers).unwrap()
    }

    #[test]
    fn test_push_replace_and_add() {
        let mut op = scalar_operator(&[(0, 1.0)]);
        op.push(Multiplier::scalar(vec![0], 2.0), MergePolicy::Add).unwrap();
        assert_eq!(op.find_multiplier(&[0]).unwrap()[(0, 0)], 3.0);

        op.push(Multiplier::scalar(vec![0], 5.0), MergePolicy::Replace).unwrap();
        assert_eq!(op.find_multiplier(&[0]).unwrap()[(0, 0)], 5.0);

        op.push(Multiplier::scalar(vec![-1], 7.0), MergePolicy::Add).unwrap();
        assert_eq!(op.len(), 2);
        let positions: Vec<&Vec<i64>> = op.iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![&vec![-1], &vec![0]]);
    }

    #[test]
    fn test_duplicate_positions_in_constructor_keep_last() {
        let op = scalar_operator(&[(1, 1.0), (1, 4.0)]);
        assert_eq!(op.len(), 1);
        assert_eq!(op.find_multiplier(&[1]).unwrap()[(0, 0)], 4.0);
    }

    #[test]
    fn test_push_rejects_wrong_shapes() {
        let mut op = scalar_operator(&[]);
        assert!(matches!(
            op.push(Multiplier::new(vec![0], DMatrix::zeros(2, 1)), MergePolicy::Add),
            Err(CrystalError::ShapeMismatch(_))
        ));
        assert!(matches!(
            op.push(Multiplier::scalar(vec![0, 0], 1.0), MergePolicy::Add),
            Err(CrystalError::DimensionMismatch { .. })
        ));
        assert!(op.is_empty());
    }

    #[test]
    fn test_clean_up_removes_exact_zeros_only() {
        let mut op = scalar_operator(&[(-1, 0.0), (0, 1e-300), (1, 2.0), (2, 0.0)]);
        op.clean_up();
        assert_eq!(op.len(), 2);
        assert!(op.find_multiplier(&[0]).is_some());
        assert!(op.find_multiplier(&[1]).is_some());
        assert!(op.find_multiplier(&[-1]).is_none());
    }

    #[test]
    fn test_identity_operator() {
        let crystal = Crystal::new(
            Lattice::identity(2),
            vec![DVector::from_vec(vec![0.0, 0.0]), DVector::from_vec(vec![0.5, 0.5])],
            None,
        )
        .unwrap();
        let op = CrystalOperator::identity(crystal, 3.0);
        assert_eq!(op.len(), 1);
        assert_eq!(op.find_multiplier(&[0, 0]).unwrap(), &(DMatrix::<f64>::identity(2, 2) * 3.0));
    }

    #[test]
    fn test_normalize_shifts_multiplier_positions() {
        let crystal = Crystal::new(
            Lattice::identity(1),
            vec![DVector::from_vec(vec![q(-1, 2)])],
            Some(vec![DVector::from_vec(vec![q(3, 2)])]),
        )
        .unwrap();
        let op = CrystalOperator::new(crystal, vec![Multiplier::scalar(vec![0], q(-2, 1))]).unwrap();
        let normal = op.normalize().unwrap();

        assert_eq!(normal.crystal().domain()[0][0], q(1, 2));
        assert_eq!(normal.crystal().codomain()[0][0], q(1, 2));
        assert_eq!(normal.len(), 1);
        assert_eq!(normal.find_multiplier(&[-2]).unwrap()[(0, 0)], q(-2, 1));
        assert!(normal.is_normal());
    }

    #[test]
    fn test_normalize_permutes_blocks_and_is_idempotent() {
        let crystal = Crystal::new(
            Lattice::identity(1),
            vec![DVector::from_vec(vec![q(3, 4)]), DVector::from_vec(vec![q(5, 4)])],
            Some(vec![DVector::from_vec(vec![q(-1, 2)])]),
        )
        .unwrap();
        let op = CrystalOperator::new(
            crystal,
            vec![
                Multiplier::new(vec![0], block(1, 2, &[1, 2])),
                Multiplier::new(vec![1], block(1, 2, &[3, 4])),
            ],
        )
        .unwrap();
        let normal = op.normalize().unwrap();

        // Domain becomes [1/4, 3/4] with 5/4 = 1/4 + 1 first; codomain 1/2 = -1/2 + 1
        assert_eq!(normal.crystal().domain()[0][0], q(1, 4));
        assert_eq!(normal.crystal().domain()[1][0], q(3, 4));
        assert_eq!(normal.crystal().codomain()[0][0], q(1, 2));
        // pos + domain shift - codomain shift
        assert_eq!(normal.len(), 3);
        assert_eq!(normal.find_multiplier(&[1]).unwrap(), &block(1, 2, &[0, 1]));
        assert_eq!(normal.find_multiplier(&[2]).unwrap(), &block(1, 2, &[2, 3]));
        assert_eq!(normal.find_multiplier(&[3]).unwrap(), &block(1, 2, &[4, 0]));

        assert_eq!(normal.normalize().unwrap(), normal);
    }

    #[test]
    fn test_wrt_lattice_of_laplace() {
        let op = laplace(1, q(1, 1)).unwrap();
        let coarse = Lattice::uniform(1, q(2, 1)).unwrap();
        let rewritten = op.wrt_lattice(&coarse).unwrap();

        assert_eq!(rewritten.crystal().domain_size(), 2);
        assert_eq!(rewritten.crystal().domain()[1][0], q(1, 1));
        assert_eq!(rewritten.len(), 3);
        assert_eq!(rewritten.find_multiplier(&[-1]).unwrap(), &block(2, 2, &[0, 1, 0, 0]));
        assert_eq!(rewritten.find_multiplier(&[0]).unwrap(), &block(2, 2, &[-2, 1, 1, -2]));
        assert_eq!(rewritten.find_multiplier(&[1]).unwrap(), &block(2, 2, &[0, 0, 1, 0]));
    }

    #[test]
    fn test_wrt_same_lattice_is_identity() {
        let op = laplace(2, 1.0).unwrap();
        let rewritten = op.wrt_lattice(op.lattice()).unwrap();
        assert!(rewritten.approx_eq(&op));
    }

    #[test]
    fn test_wrt_lattice_requires_sublattice() {
        let op = laplace(1, 2.0).unwrap();
        let finer = Lattice::uniform(1, 1.0).unwrap();
        assert!(matches!(
            op.wrt_lattice(&finer),
            Err(CrystalError::IncommensurableLattice(_))
        ));
        let other = Lattice::uniform(1, 3.0).unwrap();
        assert!(op.wrt_lattice(&other).is_err());
    }

    #[test]
    fn test_check_wrt_lattice_matches_full_rewrite() {
        let op = laplace(2, 1.0).unwrap();
        let coarse = Lattice::new(DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -1.0, 1.0])).unwrap();
        let crystal = op.check_wrt_lattice(&coarse).unwrap();
        let full = op.wrt_lattice(&coarse).unwrap().normalize().unwrap();
        assert!(crystal.same_structure(full.crystal()));
    }

    #[test]
    fn test_transpose() {
        let crystal = Crystal::new(
            Lattice::uniform(1, q(2, 1)).unwrap(),
            vec![DVector::from_vec(vec![q(0, 1)]), DVector::from_vec(vec![q(1, 1)])],
            Some(vec![DVector::from_vec(vec![q(0, 1)])]),
        )
        .unwrap();
        let op = CrystalOperator::new(
            crystal,
            vec![
                Multiplier::new(vec![-1], block(1, 2, &[0, 1])),
                Multiplier::new(vec![0], block(1, 2, &[2, 1])),
            ],
        )
        .unwrap();
        let transposed = op.transpose().unwrap();
        assert_eq!(transposed.shape(), (2, 1));
        assert_eq!(transposed.find_multiplier(&[1]).unwrap(), &block(2, 1, &[0, 1]));
        assert_eq!(transposed.find_multiplier(&[0]).unwrap(), &block(2, 1, &[2, 1]));
        assert_eq!(transposed.transpose().unwrap(), op);
    }

    #[test]
    fn test_serde_round_trip() {
        let op = laplace(2, 0.5).unwrap();
        let json = serde_json::to_string(&op).unwrap();
        let restored: CrystalOperator<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, op);

        let crystal = Crystal::new(
            Lattice::uniform(1, q(2, 1)).unwrap(),
            vec![DVector::from_vec(vec![q(0, 1)]), DVector::from_vec(vec![q(1, 2)])],
            None,
        )
        .unwrap();
        let exact = CrystalOperator::identity(crystal, q(1, 3));
        let json = serde_json::to_string(&exact).unwrap();
        let restored: CrystalOperator<BigRational> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, exact);
        assert_eq!(restored.find_multiplier(&[0]).unwrap()[(1, 1)], q(1, 3));
    }
}
