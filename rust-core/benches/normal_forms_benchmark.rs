use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use nalgebra::DMatrix;
use num_rational::BigRational;
use crystal_lfa::lattice::{elements_in_quotient_space, lcm_of_lattices, Lattice};
use crystal_lfa::normal_forms::{
    hermite_normal_form, integer_matrix, lll_reduce, smith_normal_form_with_transform,
};

fn rational_lattice(rows: usize, entries: &[i64]) -> Lattice<BigRational> {
    let basis = DMatrix::from_row_iterator(
        rows,
        rows,
        entries.iter().map(|&x| BigRational::from_integer(x.into())),
    );
    Lattice::new(basis).expect("nonsingular benchmark basis")
}

/// Integer normal forms on small, badly conditioned bases.
fn bench_integer_normal_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_normal_forms");

    let skewed = integer_matrix(3, 3, &[2, 3, 5, 7, 11, 13, 17, 19, 23]);
    let long_vectors = integer_matrix(3, 3, &[1, 0, 0, 4, 1, 0, 97, 31, 1]);

    group.bench_function("hermite_3d", |b| {
        b.iter(|| hermite_normal_form(black_box(&skewed)))
    });

    group.bench_function("smith_3d", |b| {
        b.iter(|| smith_normal_form_with_transform(black_box(&skewed)))
    });

    group.bench_function("lll_3d", |b| {
        b.iter(|| lll_reduce(black_box(&long_vectors)))
    });

    group.finish();
}

/// Lattice-level algorithms built on the normal forms.
fn bench_lattice_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_algorithms");

    let rotated = rational_lattice(2, &[1, 1, -1, 1]);
    let stretched = rational_lattice(2, &[1, 2, 2, 1]);
    let coarse = rational_lattice(3, &[2, 0, 0, 0, 2, 0, 0, 0, 2]);
    let fine = Lattice::<BigRational>::identity(3);

    group.bench_function("lcm_2d", |b| {
        b.iter(|| lcm_of_lattices(black_box(&[rotated.clone(), stretched.clone()])))
    });

    group.bench_function("lcm_float_2d", |b| {
        let lattices = [
            Lattice::uniform(2, 2.0).expect("nonsingular"),
            Lattice::uniform(2, 3.0).expect("nonsingular"),
        ];
        b.iter(|| lcm_of_lattices(black_box(&lattices)))
    });

    group.bench_function("quotient_3d", |b| {
        b.iter(|| elements_in_quotient_space(black_box(&fine), black_box(&coarse)))
    });

    group.finish();
}

criterion_group!(benches, bench_integer_normal_forms, bench_lattice_algorithms);
criterion_main!(benches);
