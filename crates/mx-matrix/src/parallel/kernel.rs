// Scalar building blocks of the fallback engine.

use crate::element::Element;

/// Transposes a row-major `[rows, cols]` buffer into a row-major `[cols, rows]` one.
pub(crate) fn transpose<T: Copy>(src: &[T], rows: usize, cols: usize) -> Vec<T> {
    debug_assert_eq!(src.len(), rows * cols);
    let mut dst = Vec::with_capacity(src.len());
    for c in 0..cols {
        for r in 0..rows {
            dst.push(src[r * cols + c]);
        }
    }
    dst
}

/// Fills `out` with result rows `first_row..first_row + out.len() / cols_b`.
///
/// `bt` is the transposed right operand, so each output cell is a stride-1
/// dot product of a row of `a` with a row of `bt`. The sum starts from zero
/// and accumulates in increasing `k`, so a cell's value never depends on how
/// rows were split across workers.
pub(crate) fn row_chunk<T: Element>(
    a: &[T],
    bt: &[T],
    cols_a: usize,
    cols_b: usize,
    first_row: usize,
    out: &mut [T],
) {
    for (local, out_row) in out.chunks_exact_mut(cols_b).enumerate() {
        let i = first_row + local;
        let a_row = &a[i * cols_a..(i + 1) * cols_a];
        for (j, cell) in out_row.iter_mut().enumerate() {
            let bt_row = &bt[j * cols_a..(j + 1) * cols_a];
            *cell = a_row
                .iter()
                .zip(bt_row)
                .fold(T::zero(), |acc, (&x, &y)| T::mul_acc(acc, x, y));
        }
    }
}
