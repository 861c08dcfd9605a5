//! Compressed Column Storage (CCS) matrix format implementation

use ndarray::Array2;
use num_traits::Num;
use std::fmt;

use crate::error::ValidationError;
use crate::validate::check_ccs_structure;

/// A sparse matrix in Compressed Column Storage (CCS) format
///
/// The CCS format stores a sparse matrix using three arrays:
/// - col_pointers: Array of size cols + 1 containing offsets into row_indices and values
/// - row_indices: Array of size nnz containing the row of each non-zero
/// - values: Array of size nnz containing the non-zero values
///
/// Entries are grouped by column; their order within a column is arbitrary.
#[derive(Clone, PartialEq)]
pub struct SparseMatrix<T> {
    /// Number of rows in the matrix
    pub rows: usize,

    /// Number of columns in the matrix
    pub cols: usize,

    /// Column pointers (size: cols + 1)
    /// col_pointers[j] is the index in row_indices and values where column j starts
    /// col_pointers[cols] is equal to nnz
    pub col_pointers: Vec<usize>,

    /// Row indices (size: nnz)
    pub row_indices: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrix<T>
where
    T: Copy + Num,
{
    /// Creates a new CCS matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - col_pointers.len() must be cols + 1
    /// - row_indices.len() must equal values.len()
    /// - col_pointers[cols] must equal nnz
    /// - every row index must be below rows
    pub fn new(
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(col_pointers.len(), cols + 1, "col_pointers.len() must be cols + 1");
        assert_eq!(
            row_indices.len(),
            values.len(),
            "row_indices.len() must equal values.len()"
        );
        assert_eq!(
            col_pointers[cols],
            row_indices.len(),
            "col_pointers[cols] must equal row_indices.len()"
        );

        for &row in &row_indices {
            assert!(row < rows, "Row index {} out of bounds (rows = {})", row, rows);
        }

        Self {
            rows,
            cols,
            col_pointers,
            row_indices,
            values,
        }
    }

    /// Fallible counterpart of [`SparseMatrix::new`]
    pub fn try_new(
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, ValidationError> {
        check_ccs_structure("matrix", rows, cols, &col_pointers, &row_indices, values.len())?;

        Ok(Self {
            rows,
            cols,
            col_pointers,
            row_indices,
            values,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of stored entries in column j
    pub fn col_nnz(&self, j: usize) -> usize {
        self.col_pointers[j + 1] - self.col_pointers[j]
    }

    /// Returns an iterator over the non-zero elements in column j
    ///
    /// Each item is a tuple (row, value) in storage order
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(j < self.cols, "Column index out of bounds");

        let start = self.col_pointers[j];
        let end = self.col_pointers[j + 1];

        self.row_indices[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&row, val)| (row, val))
    }

    /// Materializes column j as a dense vector of length `rows`
    pub fn column(&self, j: usize) -> Vec<T> {
        let mut col = vec![T::zero(); self.rows];
        for (row, &val) in self.col_iter(j) {
            col[row] = val;
        }
        col
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            col_pointers: vec![0; cols + 1],
            row_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            col_pointers: (0..=n).collect(),
            row_indices: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Dense copy of the matrix; duplicate entries in a column are summed
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for j in 0..self.cols {
            for (row, &val) in self.col_iter(j) {
                dense[[row, j]] = dense[[row, j]] + val;
            }
        }
        dense
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows, self.cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_cols_to_print = 5.min(self.cols);

        if max_cols_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for j in 0..max_cols_to_print {
                write!(f, "    col {}: ", j)?;
                let start = self.col_pointers[j];
                let end = self.col_pointers[j + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                    continue;
                }

                let shown = 5.min(end - start);
                for i in start..(start + shown) {
                    write!(f, "({}, {:?}) ", self.row_indices[i], self.values[i])?;
                }
                if end - start > shown {
                    write!(f, "... ({} more)", end - start - shown)?;
                }
                writeln!(f)?;
            }

            if self.cols > max_cols_to_print {
                writeln!(f, "    ... ({} more columns)", self.cols - max_cols_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix<i32> {
        //    [1 2 0]
        //    [0 3 0]
        //    [4 0 5]
        SparseMatrix::new(3, 3, vec![0, 2, 4, 5], vec![0, 2, 0, 1, 2], vec![1, 4, 2, 3, 5])
    }

    #[test]
    fn test_new_matrix() {
        let matrix = sample();

        assert_eq!(matrix.rows, 3);
        assert_eq!(matrix.cols, 3);
        assert_eq!(matrix.nnz(), 5);
        assert_eq!(matrix.col_nnz(1), 2);
    }

    #[test]
    fn test_col_iter() {
        let matrix = sample();

        let col0: Vec<_> = matrix.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col2: Vec<_> = matrix.col_iter(2).collect();
        assert_eq!(col2, vec![(2, &5)]);
    }

    #[test]
    fn test_column_extraction() {
        let matrix = sample();

        assert_eq!(matrix.column(0), vec![1, 0, 4]);
        assert_eq!(matrix.column(1), vec![2, 3, 0]);
        assert_eq!(matrix.column(2), vec![0, 0, 5]);
    }

    #[test]
    fn test_identity_and_dense() {
        let identity = SparseMatrix::<f64>::identity(3);

        assert_eq!(identity.col_pointers, vec![0, 1, 2, 3]);
        assert_eq!(identity.row_indices, vec![0, 1, 2]);
        assert_eq!(identity.to_dense(), Array2::eye(3));
    }

    #[test]
    fn test_try_new_rejects_bad_pointers() {
        let result = SparseMatrix::try_new(3, 2, vec![0, 2, 1], vec![0], vec![1.0]);
        assert!(matches!(
            result,
            Err(ValidationError::MalformedColPointers { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "col_pointers.len() must be cols + 1")]
    fn test_invalid_col_pointers() {
        SparseMatrix::new(3, 3, vec![0, 2, 4], vec![0, 2, 0, 1, 2], vec![1, 4, 2, 3, 5]);
    }

    #[test]
    #[should_panic(expected = "row_indices.len() must equal values.len()")]
    fn test_inconsistent_lengths() {
        SparseMatrix::new(3, 3, vec![0, 2, 4, 5], vec![0, 2, 0, 1, 2], vec![1, 4, 2, 3]);
    }
}
