use approx::assert_relative_eq;
use mx_matrix::{
    multiply, AnyMatrix, Element, ElementKind, Matrix, MatrixError, Multiplier, ParallelBackend,
    ParallelConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn reference<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Vec<T> {
    let (n, m) = a.shape();
    let l = b.cols();
    let mut out = vec![T::zero(); n * l];
    for i in 0..n {
        for j in 0..l {
            let mut acc = T::zero();
            for k in 0..m {
                acc = T::mul_acc(acc, a[(i, k)], b[(k, j)]);
            }
            out[i * l + j] = acc;
        }
    }
    out
}

fn pinned(workers: usize) -> Multiplier {
    let backend =
        ParallelBackend::with_config(ParallelConfig::default().with_workers(workers)).unwrap();
    Multiplier::new(Arc::new(backend))
}

fn random_i32(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix<i32> {
    let data = (0..rows * cols).map(|_| rng.gen_range(-1000..1000)).collect();
    Matrix::new(rows, cols, data).unwrap()
}

fn random_f32(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix<f32> {
    let data = (0..rows * cols).map(|_| rng.gen::<f32>() * 100.0).collect();
    Matrix::new(rows, cols, data).unwrap()
}

fn random_f64(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix<f64> {
    let data = (0..rows * cols).map(|_| rng.gen::<f64>() * 100.0).collect();
    Matrix::new(rows, cols, data).unwrap()
}

#[test]
fn small_int_product() {
    let a = Matrix::from_rows(&[vec![2, 3, 4], vec![1, 2, 3]]).unwrap();
    let b = Matrix::from_rows(&[vec![1, 4], vec![2, 5], vec![3, 6]]).unwrap();
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c.shape(), (2, 2));
    assert_eq!(c.as_slice(), &[20, 47, 14, 32]);
    assert_eq!(c.as_slice(), reference(&a, &b).as_slice());
}

#[test]
fn identity_leaves_matrix_unchanged() {
    let m = Matrix::from_rows(&[vec![5, 6, 7], vec![8, 9, 10], vec![11, 12, 13]]).unwrap();
    let i = Matrix::identity(3).unwrap();
    assert_eq!(multiply(&i, &m).unwrap(), m);
    assert_eq!(multiply(&m, &i).unwrap(), m);

    let mut rng = StdRng::seed_from_u64(7);
    let f = random_f64(&mut rng, 4, 4);
    assert_eq!(multiply(&f, &Matrix::identity(4).unwrap()).unwrap(), f);
    let g = random_f32(&mut rng, 5, 5);
    assert_eq!(multiply(&Matrix::identity(5).unwrap(), &g).unwrap(), g);
}

#[test]
fn zero_matrix_yields_zero() {
    let a = Matrix::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let z = Matrix::zeros(3, 2).unwrap();
    let c = multiply(&a, &z).unwrap();
    assert_eq!(c.as_slice(), &[0; 4]);

    let af = Matrix::new(1, 2, vec![1.5f32, -2.5]).unwrap();
    let zf = Matrix::<f32>::zeros(2, 3).unwrap();
    assert!(multiply(&af, &zf)
        .unwrap()
        .as_slice()
        .iter()
        .all(|&v| v == 0.0));
}

#[test]
fn row_times_column() {
    let a = Matrix::new(1, 3, vec![2, 3, 4]).unwrap();
    let b = Matrix::new(3, 1, vec![5, 6, 7]).unwrap();
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c.shape(), (1, 1));
    assert_eq!(c.as_slice(), &[56]);
}

#[test]
fn single_element() {
    let a = Matrix::new(1, 1, vec![5]).unwrap();
    let b = Matrix::new(1, 1, vec![3]).unwrap();
    assert_eq!(multiply(&a, &b).unwrap().get(0, 0).unwrap(), 15);
}

#[test]
fn dimension_mismatch() {
    let a = Matrix::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let b = Matrix::new(2, 2, vec![1, 2, 3, 4]).unwrap();
    match multiply(&a, &b) {
        Err(MatrixError::DimensionMismatch {
            a_rows,
            a_cols,
            b_rows,
            b_cols,
        }) => assert_eq!((a_rows, a_cols, b_rows, b_cols), (2, 3, 2, 2)),
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn small_float_and_double() {
    let a = Matrix::new(2, 2, vec![1.5f32, 2.5, 3.5, 4.5]).unwrap();
    let b = Matrix::new(2, 2, vec![0.5f32, 1.0, 1.5, 2.0]).unwrap();
    let c = multiply(&a, &b).unwrap();
    for (x, y) in c.as_slice().iter().zip(&[4.5f32, 6.5, 8.5, 12.5]) {
        assert_relative_eq!(*x, *y, max_relative = 1e-3);
    }

    let a = Matrix::new(2, 2, vec![1.5, 2.5, 3.5, 4.5]).unwrap();
    let b = Matrix::new(2, 2, vec![0.5, 1.0, 1.5, 2.0]).unwrap();
    let c = multiply(&a, &b).unwrap();
    for (x, y) in c.as_slice().iter().zip(&[4.5f64, 6.5, 8.5, 12.5]) {
        assert_relative_eq!(*x, *y, max_relative = 1e-9);
    }
}

#[test]
fn large_int_matches_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random_i32(&mut rng, 100, 150);
    let b = random_i32(&mut rng, 150, 200);
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c.shape(), (100, 200));
    assert_eq!(c.as_slice(), reference(&a, &b).as_slice());
}

#[test]
fn large_float_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(43);
    let a = random_f32(&mut rng, 100, 150);
    let b = random_f32(&mut rng, 150, 200);
    let c = multiply(&a, &b).unwrap();
    let expected = Matrix::new(100, 200, reference(&a, &b)).unwrap();
    assert!(c.approx_eq(&expected, 1e-3));

    let a = random_f64(&mut rng, 100, 150);
    let b = random_f64(&mut rng, 150, 200);
    let c = multiply(&a, &b).unwrap();
    let expected = Matrix::new(100, 200, reference(&a, &b)).unwrap();
    assert!(c.approx_eq(&expected, 1e-9));
}

#[test]
fn worker_count_does_not_change_bits() {
    let mut rng = StdRng::seed_from_u64(44);
    let a = random_f32(&mut rng, 37, 53);
    let b = random_f32(&mut rng, 53, 29);
    let one = pinned(1).multiply(&a, &b).unwrap();
    for workers in [2, 3, 8, 64] {
        let many = pinned(workers).multiply(&a, &b).unwrap();
        let same = one
            .as_slice()
            .iter()
            .zip(many.as_slice())
            .all(|(x, y)| x.to_bits() == y.to_bits());
        assert!(same, "result differs with {workers} workers");
    }

    let a = random_f64(&mut rng, 19, 11);
    let b = random_f64(&mut rng, 11, 23);
    let one = pinned(1).multiply(&a, &b).unwrap();
    let many = pinned(7).multiply(&a, &b).unwrap();
    assert!(one
        .as_slice()
        .iter()
        .zip(many.as_slice())
        .all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn integer_overflow_wraps_deterministically() {
    let a = Matrix::new(2, 2, vec![i32::MAX, i32::MAX, i32::MIN, 1]).unwrap();
    let b = Matrix::new(2, 2, vec![3, -1, 3, 7]).unwrap();
    let one = pinned(1).multiply(&a, &b).unwrap();
    let many = pinned(4).multiply(&a, &b).unwrap();
    assert_eq!(one, many);
    assert_eq!(one.as_slice(), reference(&a, &b).as_slice());
}

#[test]
fn dynamic_dispatch_by_kind() {
    let m = Multiplier::fallback();
    let a: AnyMatrix = Matrix::new(1, 2, vec![1.0f32, 2.0]).unwrap().into();
    let b: AnyMatrix = Matrix::new(2, 1, vec![3.0f32, 4.0]).unwrap().into();
    let c = m.multiply_any(&a, &b).unwrap();
    assert_eq!(c.kind(), ElementKind::F32);
    assert_eq!(c.downcast::<f32>().unwrap().as_slice(), &[11.0]);

    let d: AnyMatrix = Matrix::new(2, 1, vec![3.0f64, 4.0]).unwrap().into();
    assert!(matches!(
        m.multiply_any(&a, &d),
        Err(MatrixError::ElementKindMismatch { .. })
    ));
}
