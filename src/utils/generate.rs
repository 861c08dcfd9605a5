//! Seeded random CCS matrices for tests and benchmarks

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::matrix::aggregate::SpgemmInput;
use crate::matrix::SparseMatrix;

/// Appends a `rows × cols` matrix drawn from `rng`
///
/// Each position is non-zero with probability `density`; values are uniform
/// in `[0, 10)`. Row indices within a column are increasing.
fn sample_ccs(rng: &mut ChaCha8Rng, rows: usize, cols: usize, density: f64) -> SparseMatrix<f64> {
    let mut col_pointers = Vec::with_capacity(cols + 1);
    let mut row_indices = Vec::new();
    let mut values = Vec::new();
    col_pointers.push(0);

    for _ in 0..cols {
        for row in 0..rows {
            if rng.gen_bool(density) {
                row_indices.push(row);
                values.push(rng.gen_range(0.0..10.0));
            }
        }
        col_pointers.push(row_indices.len());
    }

    SparseMatrix {
        rows,
        cols,
        col_pointers,
        row_indices,
        values,
    }
}

/// A random sparse matrix, reproducible from `seed`
///
/// # Panics
///
/// Panics if `density` is outside `[0, 1]`.
pub fn random_ccs(rows: usize, cols: usize, density: f64, seed: u64) -> SparseMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    sample_ccs(&mut rng, rows, cols, density)
}

/// A random `rows × inner` by `inner × cols` problem drawn from one seeded stream
pub fn random_input(rows: usize, inner: usize, cols: usize, density: f64, seed: u64) -> SpgemmInput {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let a = sample_ccs(&mut rng, rows, inner, density);
    let b = sample_ccs(&mut rng, inner, cols, density);
    SpgemmInput::from_matrices(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_matrix() {
        assert_eq!(random_ccs(20, 15, 0.1, 7), random_ccs(20, 15, 0.1, 7));
    }

    #[test]
    fn test_density_extremes() {
        assert_eq!(random_ccs(4, 5, 0.0, 1).nnz(), 0);

        let full = random_ccs(4, 5, 1.0, 1);
        assert_eq!(full.nnz(), 20);
        assert!(full.values.iter().all(|&v| (0.0..10.0).contains(&v)));
    }

    #[test]
    fn test_random_input_dimensions() {
        let input = random_input(6, 4, 3, 0.5, 3);

        assert_eq!((input.rows_a, input.cols_a, input.cols_b), (6, 4, 3));
        assert_eq!(input.a_col_pointers.len(), 5);
        assert_eq!(input.b_col_pointers.len(), 4);
    }
}
