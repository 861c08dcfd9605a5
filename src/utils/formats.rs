//! Conversions between our CCS matrix and `sprs`

use num_traits::Num;
use sprs::CsMat;

use crate::matrix::SparseMatrix;

/// Converts a CCS matrix to a sprs CsMat in CSC storage
///
/// sprs requires strictly increasing row indices within a column, so each
/// column is sorted on the way out.
///
/// # Panics
///
/// Panics if a column holds the same row twice.
pub fn to_sprs_csc<T>(matrix: &SparseMatrix<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    let mut row_indices = Vec::with_capacity(matrix.nnz());
    let mut values = Vec::with_capacity(matrix.nnz());

    for j in 0..matrix.cols {
        let mut entries: Vec<(usize, T)> = matrix.col_iter(j).map(|(row, &val)| (row, val)).collect();
        entries.sort_by_key(|&(row, _)| row);

        for (row, val) in entries {
            row_indices.push(row);
            values.push(val);
        }
    }

    CsMat::new_csc(
        (matrix.rows, matrix.cols),
        matrix.col_pointers.clone(),
        row_indices,
        values,
    )
}

/// Converts a sprs CsMat (either storage) into a CCS matrix
pub fn from_sprs_csc<T>(matrix: CsMat<T>) -> SparseMatrix<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csc() {
        matrix
    } else {
        matrix.to_csc()
    };

    let (rows, cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrix::new(rows, cols, indptr, indices, data)
}
