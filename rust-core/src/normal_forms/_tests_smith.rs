#[cfg(test)]
mod _tests_smith {
    use super::super::integer_matrix::*;
    use super::super::smith::*;
    use num_bigint::BigInt;
    use num_integer::Integer;
    use num_traits::Zero;

    fn assert_smith(m: &IntegerMatrix, form: &SmithForm) {
        assert!(is_unimodular(&form.u));
        assert!(is_unimodular(&form.v));
        assert_eq!(&form.u * m * &form.v, form.s);
        for i in 0..form.s.nrows() {
            for j in 0..form.s.ncols() {
                if i != j {
                    assert!(form.s[(i, j)].is_zero());
                }
            }
        }
        let diagonal = form.diagonal();
        for pair in diagonal.windows(2) {
            assert!(pair[0] >= BigInt::zero());
            if !pair[0].is_zero() {
                assert!(pair[1].is_multiple_of(&pair[0]));
            }
        }
    }

    #[test]
    fn test_smith_classic_example() {
        let m = integer_matrix(3, 3, &[2, 4, 4, -6, 6, 12, 10, -4, -16]);
        let form = smith_normal_form_with_transform(&m);
        assert_smith(&m, &form);
        assert_eq!(
            form.diagonal(),
            vec![BigInt::from(2), BigInt::from(6), BigInt::from(12)]
        );
    }

    #[test]
    fn test_smith_coprime_diagonal() {
        let m = integer_matrix(2, 2, &[2, 0, 0, 3]);
        let form = smith_normal_form_with_transform(&m);
        assert_smith(&m, &form);
        assert_eq!(form.diagonal(), vec![BigInt::from(1), BigInt::from(6)]);
    }

    #[test]
    fn test_smith_of_sublattice_basis() {
        // Coarsening by [1 1; -1 1] has index 2
        let m = integer_matrix(2, 2, &[1, 1, -1, 1]);
        let form = smith_normal_form_with_transform(&m);
        assert_smith(&m, &form);
        assert_eq!(form.diagonal(), vec![BigInt::from(1), BigInt::from(2)]);
    }

    #[test]
    fn test_smith_singular_input() {
        let m = integer_matrix(2, 2, &[2, 4, 1, 2]);
        let form = smith_normal_form_with_transform(&m);
        assert_smith(&m, &form);
        assert_eq!(form.diagonal(), vec![BigInt::from(1), BigInt::zero()]);
    }
}
