//! Input validation
//!
//! Every process runs these checks on its own replicated copy of the input,
//! without communicating, so all ranks reach the same verdict before the
//! first collective call.

use log::debug;

use crate::error::ValidationError;
use crate::matrix::aggregate::SpgemmInput;
use crate::matrix::config::{RemainderPolicy, SpgemmConfig};

/// Checks one CCS triple against every structural invariant
///
/// Order matters: pointer length and array lengths are checked before the
/// pointers are dereferenced.
pub(crate) fn check_ccs_structure(
    matrix: &'static str,
    rows: usize,
    cols: usize,
    col_pointers: &[usize],
    row_indices: &[usize],
    n_values: usize,
) -> Result<(), ValidationError> {
    check_lengths(matrix, cols, col_pointers, row_indices, n_values)?;

    if col_pointers[0] != 0 {
        return Err(ValidationError::MalformedColPointers { matrix, col: 0 });
    }
    if let Some(col) = col_pointers.windows(2).position(|w| w[0] > w[1]) {
        return Err(ValidationError::MalformedColPointers { matrix, col: col + 1 });
    }
    if col_pointers[cols] != n_values {
        return Err(ValidationError::MalformedColPointers { matrix, col: cols });
    }

    if let Some(&row) = row_indices.iter().find(|&&row| row >= rows) {
        return Err(ValidationError::RowIndexOutOfBounds { matrix, row, rows });
    }

    Ok(())
}

fn check_lengths(
    matrix: &'static str,
    cols: usize,
    col_pointers: &[usize],
    row_indices: &[usize],
    n_values: usize,
) -> Result<(), ValidationError> {
    if n_values != row_indices.len() {
        return Err(ValidationError::LengthMismatch {
            matrix,
            values: n_values,
            row_indices: row_indices.len(),
        });
    }
    if col_pointers.len() != cols + 1 {
        return Err(ValidationError::ColPointerLength {
            matrix,
            expected: cols + 1,
            got: col_pointers.len(),
        });
    }
    Ok(())
}

/// Rejects a column that lists one row twice
///
/// Assumes [`check_ccs_structure`] already passed.
fn check_distinct_rows(
    matrix: &'static str,
    rows: usize,
    col_pointers: &[usize],
    row_indices: &[usize],
) -> Result<(), ValidationError> {
    // last_seen[row] = 1 + column that most recently listed `row`
    let mut last_seen = vec![0usize; rows];
    for (col, range) in col_pointers.windows(2).enumerate() {
        for &row in &row_indices[range[0]..range[1]] {
            if last_seen[row] == col + 1 {
                return Err(ValidationError::DuplicateRowIndex { matrix, col, row });
            }
            last_seen[row] = col + 1;
        }
    }
    Ok(())
}

/// Validates the kernel input for a group of `world_size` processes
///
/// Always applied: positive dimensions, every CCS invariant of A and B
/// (lengths, pointer start, monotone pointers, final pointer equal to nnz,
/// row bounds with B's rows bounded by A's columns), and partition
/// feasibility. With `config.strict_structure` each column must also list
/// distinct rows; otherwise repeated rows are summed by the kernel.
pub fn validate(
    input: &SpgemmInput,
    world_size: usize,
    config: &SpgemmConfig,
) -> Result<(), ValidationError> {
    let (rows_a, cols_a, cols_b) = input.dims()?;

    check_ccs_structure(
        "A",
        rows_a,
        cols_a,
        &input.a_col_pointers,
        &input.a_row_indices,
        input.a_values.len(),
    )?;
    check_ccs_structure(
        "B",
        cols_a,
        cols_b,
        &input.b_col_pointers,
        &input.b_row_indices,
        input.b_values.len(),
    )?;

    if config.strict_structure {
        check_distinct_rows("A", rows_a, &input.a_col_pointers, &input.a_row_indices)?;
        check_distinct_rows("B", cols_a, &input.b_col_pointers, &input.b_row_indices)?;
    }

    check_partition(rows_a, world_size, config.remainder)?;

    debug!(
        "validated {}x{} * {}x{} for {} processes",
        rows_a, cols_a, cols_a, cols_b, world_size
    );
    Ok(())
}

/// Feasibility of splitting `rows` into `world_size` contiguous blocks
pub fn check_partition(
    rows: usize,
    world_size: usize,
    policy: RemainderPolicy,
) -> Result<(), ValidationError> {
    if world_size == 0 {
        return Err(ValidationError::InfeasiblePartition { rows, world_size });
    }
    let uneven = rows % world_size != 0;

    if uneven && world_size > rows {
        return Err(ValidationError::InfeasiblePartition { rows, world_size });
    }
    if uneven && policy == RemainderPolicy::Reject {
        return Err(ValidationError::UnevenPartition { rows, world_size });
    }
    Ok(())
}

/// Boolean form of [`validate`]
pub fn is_valid(input: &SpgemmInput, world_size: usize, config: &SpgemmConfig) -> bool {
    validate(input, world_size, config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrix;

    fn square_input(n: usize) -> SpgemmInput {
        let a = SparseMatrix::<f64>::identity(n);
        SpgemmInput::from_matrices(&a, &a)
    }

    #[test]
    fn test_accepts_well_formed_input() {
        let config = SpgemmConfig::default();
        assert!(is_valid(&square_input(4), 1, &config));
        assert!(is_valid(&square_input(4), 2, &config));
        assert!(is_valid(&square_input(4), 4, &config));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = SpgemmConfig::default();
        for field in 0..3 {
            let mut input = square_input(3);
            match field {
                0 => input.rows_a = 0,
                1 => input.cols_a = -1,
                _ => input.cols_b = 0,
            }
            assert!(!is_valid(&input, 1, &config));
        }
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let config = SpgemmConfig::default().with_strict_structure(false);

        let mut input = square_input(3);
        input.a_values.push(1.0);
        assert!(matches!(
            validate(&input, 1, &config),
            Err(ValidationError::LengthMismatch { matrix: "A", .. })
        ));

        let mut input = square_input(3);
        input.b_col_pointers.pop();
        assert!(matches!(
            validate(&input, 1, &config),
            Err(ValidationError::ColPointerLength { matrix: "B", .. })
        ));
    }

    #[test]
    fn test_bounds_checked_without_strict_structure() {
        let mut input = square_input(3);
        input.b_row_indices[2] = 3;

        for strict in [true, false] {
            let config = SpgemmConfig::default().with_strict_structure(strict);
            assert_eq!(
                validate(&input, 1, &config),
                Err(ValidationError::RowIndexOutOfBounds {
                    matrix: "B",
                    row: 3,
                    rows: 3
                })
            );
        }
    }

    #[test]
    fn test_pointers_checked_without_strict_structure() {
        let mut input = square_input(3);
        input.a_col_pointers = vec![0, 1, 2, 5];

        assert_eq!(
            validate(&input, 1, &SpgemmConfig::default().with_strict_structure(false)),
            Err(ValidationError::MalformedColPointers { matrix: "A", col: 3 })
        );
    }

    #[test]
    fn test_strict_structure_rejects_repeated_rows() {
        //    column 1 of A lists row 0 twice
        let mut input = square_input(3);
        input.a_col_pointers = vec![0, 1, 3, 4];
        input.a_row_indices = vec![0, 0, 0, 2];
        input.a_values = vec![1.0, 2.0, 3.0, 1.0];

        assert_eq!(
            validate(&input, 1, &SpgemmConfig::default()),
            Err(ValidationError::DuplicateRowIndex {
                matrix: "A",
                col: 1,
                row: 0
            })
        );
        assert!(is_valid(
            &input,
            1,
            &SpgemmConfig::default().with_strict_structure(false)
        ));
    }

    #[test]
    fn test_strict_structure_checks_pointers() {
        let mut input = square_input(3);
        input.a_col_pointers = vec![0, 2, 1, 3];

        assert_eq!(
            validate(&input, 1, &SpgemmConfig::default()),
            Err(ValidationError::MalformedColPointers { matrix: "A", col: 2 })
        );
    }

    #[test]
    fn test_partition_feasibility() {
        let policy = RemainderPolicy::Truncate;

        assert!(check_partition(6, 3, policy).is_ok());
        // Uneven but with at least one row per process
        assert!(check_partition(7, 3, policy).is_ok());
        assert_eq!(
            check_partition(2, 3, policy),
            Err(ValidationError::InfeasiblePartition {
                rows: 2,
                world_size: 3
            })
        );
        assert!(check_partition(7, 3, RemainderPolicy::Reject).is_err());
        assert!(check_partition(6, 3, RemainderPolicy::Reject).is_ok());
        assert!(check_partition(7, 3, RemainderPolicy::AbsorbIntoLast).is_ok());
    }
}
