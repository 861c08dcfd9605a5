//! Basic tests for the CCS matrix type and its partitioning

use ccs_spgemm::partition::{partition_rows, row_block, slice_rows, RowBlock};
use ccs_spgemm::{RemainderPolicy, SparseMatrix};

/// 3x3 matrix
///    [1 2 0]
///    [0 3 0]
///    [4 0 5]
fn sample() -> SparseMatrix<f64> {
    SparseMatrix::new(
        3,
        3,
        vec![0, 2, 4, 5],
        vec![0, 2, 0, 1, 2],
        vec![1.0, 4.0, 2.0, 3.0, 5.0],
    )
}

#[test]
fn test_matrix_creation() {
    let matrix = sample();

    assert_eq!(matrix.rows, 3);
    assert_eq!(matrix.cols, 3);
    assert_eq!(matrix.nnz(), 5);

    // Check first column
    let first_col: Vec<_> = matrix.col_iter(0).collect();
    assert_eq!(first_col.len(), 2);
    assert_eq!(first_col[0].0, 0);
    assert_eq!(*first_col[0].1, 1.0);
    assert_eq!(first_col[1].0, 2);
    assert_eq!(*first_col[1].1, 4.0);

    // Check third column
    let third_col: Vec<_> = matrix.col_iter(2).collect();
    assert_eq!(third_col, vec![(2, &5.0)]);
}

#[test]
fn test_column_extraction() {
    let matrix = sample();

    assert_eq!(matrix.column(0), vec![1.0, 0.0, 4.0]);
    assert_eq!(matrix.column(1), vec![2.0, 3.0, 0.0]);
}

#[test]
fn test_try_new_reports_bad_rows() {
    let result = SparseMatrix::try_new(2, 1, vec![0, 1], vec![2], vec![1.0]);
    assert!(result.is_err());

    let ok = SparseMatrix::try_new(2, 1, vec![0, 1], vec![1], vec![1.0]);
    assert_eq!(ok.unwrap().nnz(), 1);
}

#[test]
fn test_unsorted_column_is_accepted() {
    let matrix = SparseMatrix::new(3, 1, vec![0, 2], vec![2, 0], vec![1.0, 2.0]);

    assert_eq!(matrix.column(0), vec![2.0, 0.0, 1.0]);
}

#[test]
fn test_blocks_reassemble_matrix() {
    let matrix = sample();
    let dense = matrix.to_dense();

    for rank in 0..3 {
        let block = row_block(3, 3, rank, RemainderPolicy::Truncate);
        assert_eq!(block, RowBlock { start: rank, len: 1 });

        let slice = slice_rows(&matrix, block);
        let slice_dense = slice.to_dense();
        assert_eq!(slice_dense.row(0), dense.row(rank));
    }
}

#[test]
fn test_partition_drops_trailing_rows_when_truncating() {
    let matrix = sample();
    let b = SparseMatrix::<f64>::identity(3);

    let owned: usize = (0..2)
        .map(|rank| partition_rows(&matrix, &b, rank, 2, RemainderPolicy::Truncate).a_local.nnz())
        .sum();

    // Row 2 holds two entries and belongs to neither block
    assert_eq!(owned, matrix.nnz() - 2);
}
