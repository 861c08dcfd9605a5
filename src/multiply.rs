//! Local row-block multiplication
//!
//! Computes `C[:, j] = Σ_k B[k, j] · A_local[:, k]` for every column `j` of B,
//! so the work is proportional to the number of (B entry, A column entry)
//! pairs rather than to the dense problem size.

use log::debug;

use crate::accumulator::DenseAccumulator;
use crate::matrix::SparseMatrix;
use crate::partition::LocalData;

/// Multiplies two CCS matrices column by column with a dense accumulator
///
/// Entries with `|value| <= tol` are dropped; each result column lists its
/// rows in increasing order.
pub fn spgemm_ccs(a: &SparseMatrix<f64>, b: &SparseMatrix<f64>, tol: f64) -> SparseMatrix<f64> {
    assert_eq!(
        a.cols, b.rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    let mut acc = DenseAccumulator::new(a.rows);
    let mut col_pointers = Vec::with_capacity(b.cols + 1);
    let mut row_indices = Vec::new();
    let mut values = Vec::new();
    col_pointers.push(0);

    for j in 0..b.cols {
        for (k, &b_val) in b.col_iter(j) {
            for (row, &a_val) in a.col_iter(k) {
                acc.accumulate(row, a_val * b_val);
            }
        }
        acc.drain_into(tol, &mut row_indices, &mut values);
        col_pointers.push(row_indices.len());
    }

    SparseMatrix {
        rows: a.rows,
        cols: b.cols,
        col_pointers,
        row_indices,
        values,
    }
}

/// This rank's block of rows of `C = A × B`, in local row numbering
pub fn multiply_local(local: &LocalData, tol: f64) -> SparseMatrix<f64> {
    let c_local = spgemm_ccs(&local.a_local, &local.b_local, tol);
    debug!(
        "rows {}..{}: local product has {} entries",
        local.block.start,
        local.block.end(),
        c_local.nnz()
    );
    c_local
}
