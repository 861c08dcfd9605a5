//! Input and output aggregates of the distributed kernel

use crate::error::ValidationError;
use crate::matrix::SparseMatrix;

/// Both operands of `C = A × B` as raw CCS arrays plus global dimensions
///
/// Every process must hold an identical copy before calling the kernel.
/// Dimensions are signed so that non-positive values can be reported rather
/// than being unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct SpgemmInput {
    pub a_values: Vec<f64>,
    pub a_row_indices: Vec<usize>,
    pub a_col_pointers: Vec<usize>,
    pub b_values: Vec<f64>,
    pub b_row_indices: Vec<usize>,
    pub b_col_pointers: Vec<usize>,
    /// Rows of A
    pub rows_a: i64,
    /// Columns of A, equal to the rows of B
    pub cols_a: i64,
    /// Columns of B
    pub cols_b: i64,
}

impl SpgemmInput {
    /// Build the aggregate from two matrices
    ///
    /// The row count of `b` is not stored; it is implied by `a.cols`.
    pub fn from_matrices(a: &SparseMatrix<f64>, b: &SparseMatrix<f64>) -> Self {
        Self {
            a_values: a.values.clone(),
            a_row_indices: a.row_indices.clone(),
            a_col_pointers: a.col_pointers.clone(),
            b_values: b.values.clone(),
            b_row_indices: b.row_indices.clone(),
            b_col_pointers: b.col_pointers.clone(),
            rows_a: a.rows as i64,
            cols_a: a.cols as i64,
            cols_b: b.cols as i64,
        }
    }

    /// Dimensions as `(rows_a, cols_a, cols_b)`, rejecting non-positive values
    pub fn dims(&self) -> Result<(usize, usize, usize), ValidationError> {
        Ok((
            positive("rows_a", self.rows_a)?,
            positive("cols_a", self.cols_a)?,
            positive("cols_b", self.cols_b)?,
        ))
    }

    /// Global A and B as matrix values
    ///
    /// Only the dimensions are checked here; structural checks belong to the
    /// validator.
    pub fn to_matrices(&self) -> Result<(SparseMatrix<f64>, SparseMatrix<f64>), ValidationError> {
        let (rows_a, cols_a, cols_b) = self.dims()?;

        let a = SparseMatrix {
            rows: rows_a,
            cols: cols_a,
            col_pointers: self.a_col_pointers.clone(),
            row_indices: self.a_row_indices.clone(),
            values: self.a_values.clone(),
        };
        let b = SparseMatrix {
            rows: cols_a,
            cols: cols_b,
            col_pointers: self.b_col_pointers.clone(),
            row_indices: self.b_row_indices.clone(),
            values: self.b_values.clone(),
        };

        Ok((a, b))
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveDimension { name, value });
    }
    usize::try_from(value).map_err(|_| ValidationError::NonPositiveDimension { name, value })
}

/// The product `C` as raw CCS arrays, identical on every process
#[derive(Debug, Clone, PartialEq)]
pub struct SpgemmOutput {
    pub values: Vec<f64>,
    pub row_indices: Vec<usize>,
    pub col_pointers: Vec<usize>,
    /// Row count of the assembled result
    pub rows: usize,
    /// Column count of the assembled result
    pub cols: usize,
}

impl SpgemmOutput {
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert into a matrix value
    pub fn into_matrix(self) -> SparseMatrix<f64> {
        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            col_pointers: self.col_pointers,
            row_indices: self.row_indices,
            values: self.values,
        }
    }
}

impl From<SparseMatrix<f64>> for SpgemmOutput {
    fn from(m: SparseMatrix<f64>) -> Self {
        Self {
            values: m.values,
            row_indices: m.row_indices,
            col_pointers: m.col_pointers,
            rows: m.rows,
            cols: m.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_reject_non_positive() {
        let a = SparseMatrix::<f64>::identity(2);
        let mut input = SpgemmInput::from_matrices(&a, &a);
        assert_eq!(input.dims(), Ok((2, 2, 2)));

        input.cols_b = 0;
        assert_eq!(
            input.dims(),
            Err(ValidationError::NonPositiveDimension {
                name: "cols_b",
                value: 0
            })
        );
    }

    #[test]
    fn test_b_rows_follow_a_cols() {
        let a = SparseMatrix::<f64>::zeros(4, 3);
        let b = SparseMatrix::<f64>::zeros(3, 5);
        let (a2, b2) = SpgemmInput::from_matrices(&a, &b).to_matrices().unwrap();

        assert_eq!((a2.rows, a2.cols), (4, 3));
        assert_eq!((b2.rows, b2.cols), (3, 5));
    }
}
