//! Sequential reference implementation of SpGEMM
//!
//! Materializes the columns of A densely and forms every entry of C as a
//! plain dot product. It is slow by construction and exists to check the
//! distributed kernel, not to compete with it.

use ndarray::Array1;
use rayon::prelude::*;

use crate::error::ValidationError;
use crate::matrix::aggregate::{SpgemmInput, SpgemmOutput};
use crate::matrix::config::SpgemmConfig;
use crate::matrix::SparseMatrix;
use crate::validate::validate;

/// Computes `C = A × B` through dense column materialization
///
/// Entries with `|value| <= tol` are dropped. Rows within each column are
/// listed in increasing order. Output columns are independent and are
/// computed in parallel.
pub fn reference_spgemm(a: &SparseMatrix<f64>, b: &SparseMatrix<f64>, tol: f64) -> SparseMatrix<f64> {
    assert_eq!(
        a.cols, b.rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    let a_dense = a.to_dense();

    let columns: Vec<(Vec<usize>, Vec<f64>)> = (0..b.cols)
        .into_par_iter()
        .map(|j| {
            let b_col = Array1::from(b.column(j));
            let mut rows = Vec::new();
            let mut vals = Vec::new();

            for (i, a_row) in a_dense.outer_iter().enumerate() {
                let mut sum = 0.0;
                for (a_ik, b_kj) in a_row.iter().zip(b_col.iter()) {
                    sum += a_ik * b_kj;
                }
                if sum.abs() > tol {
                    rows.push(i);
                    vals.push(sum);
                }
            }

            (rows, vals)
        })
        .collect();

    let mut col_pointers = Vec::with_capacity(b.cols + 1);
    col_pointers.push(0);
    let mut row_indices = Vec::new();
    let mut values = Vec::new();

    for (rows, vals) in columns {
        row_indices.extend(rows);
        values.extend(vals);
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

/// Validates `input` as a single-process problem and multiplies it
///
/// Applies the same structural checks as the distributed kernel; there is
/// no partition to check.
pub fn reference_multiply(input: &SpgemmInput, tol: f64) -> Result<SpgemmOutput, ValidationError> {
    validate(input, 1, &SpgemmConfig::default())?;
    let (a, b) = input.to_matrices()?;
    Ok(reference_spgemm(&a, &b, tol).into())
}
