#[cfg(test)]
mod _tests_hermite {
    use super::super::hermite::*;
    use super::super::integer_matrix::*;
    use num_bigint::BigInt;
    use num_traits::{Signed, Zero};

    fn assert_hermite_shape(form: &HermiteForm) {
        let h = &form.h;
        for j in 0..form.rank {
            // Find the pivot row of column j: first nonzero entry
            let pivot_row = (0..h.nrows()).find(|&i| !h[(i, j)].is_zero()).unwrap();
            let pivot = &h[(pivot_row, j)];
            assert!(pivot.is_positive(), "pivot of column {} must be positive", j);
            for left in 0..j {
                let entry = &h[(pivot_row, left)];
                assert!(!entry.is_negative() && entry < pivot);
            }
            for right in j + 1..h.ncols() {
                assert!(h[(pivot_row, right)].is_zero());
            }
        }
        for j in form.rank..h.ncols() {
            assert!(h.column(j).iter().all(|x| x.is_zero()));
        }
    }

    #[test]
    fn test_hermite_of_permutation_is_identity() {
        let m = integer_matrix(2, 2, &[0, 1, 1, 0]);
        let form = hermite_normal_form(&m);
        assert_eq!(form.h, integer_identity(2));
        assert_eq!(form.rank, 2);
        assert_eq!(integer_determinant(&form.u), BigInt::from(-1));
    }

    #[test]
    fn test_hermite_diagonal_is_fixed_point() {
        let m = integer_matrix(2, 2, &[2, 0, 0, 3]);
        let form = hermite_normal_form(&m);
        assert_eq!(form.h, m);
        assert_eq!(form.u, integer_identity(2));
    }

    #[test]
    fn test_hermite_properties_on_dense_matrix() {
        let m = integer_matrix(3, 3, &[4, -2, 7, 3, 5, -1, -6, 1, 2]);
        let form = hermite_normal_form(&m);

        assert_eq!(form.rank, 3);
        assert!(is_unimodular(&form.u));
        assert_eq!(&m * &form.u, form.h);
        assert_hermite_shape(&form);

        // Lower triangular
        for i in 0..3 {
            for j in i + 1..3 {
                assert!(form.h[(i, j)].is_zero());
            }
        }
        assert_eq!(
            integer_determinant(&form.h).abs(),
            integer_determinant(&m).abs()
        );
    }

    #[test]
    fn test_hermite_rank_deficient() {
        let m = integer_matrix(2, 2, &[1, 2, 2, 4]);
        let form = hermite_normal_form(&m);
        assert_eq!(form.rank, 1);
        assert_eq!(&m * &form.u, form.h);
        assert_hermite_shape(&form);
    }

    #[test]
    fn test_hermite_wide_matrix() {
        // Generators of 2ℤ² ∪ (1,1): the stacked lattice spanned by three columns
        let m = integer_matrix(2, 3, &[2, 0, 1, 0, 2, 1]);
        let form = hermite_normal_form(&m);
        assert_eq!(form.rank, 2);
        assert!(is_unimodular(&form.u));
        assert_eq!(&m * &form.u, form.h);
        assert_hermite_shape(&form);
        assert_eq!(form.h[(0, 0)], BigInt::from(1));
        assert_eq!(form.h[(1, 1)], BigInt::from(2));
    }
}
