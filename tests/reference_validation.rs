//! Validate the reference and distributed products against sprs

use ccs_spgemm::utils::{from_sprs_csc, random_ccs, to_sprs_csc};
use ccs_spgemm::{distributed_spgemm, reference_spgemm, run_local, SparseMatrix};
use ccs_spgemm::{SpgemmConfig, SpgemmInput};

/// Create a simple test matrix
fn create_test_matrix() -> SparseMatrix<f64> {
    // Create a 4x4 matrix:
    // [1 2 0 0]
    // [0 3 4 0]
    // [0 0 5 6]
    // [7 0 0 8]
    let col_pointers = vec![0, 2, 4, 6, 8];
    let row_indices = vec![0, 3, 0, 1, 1, 2, 2, 3];
    let values = vec![1.0, 7.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0];

    SparseMatrix::new(4, 4, col_pointers, row_indices, values)
}

fn sprs_product(a: &SparseMatrix<f64>, b: &SparseMatrix<f64>) -> SparseMatrix<f64> {
    let product = &to_sprs_csc(a) * &to_sprs_csc(b);
    from_sprs_csc(product)
}

fn assert_same_product(ours: &SparseMatrix<f64>, theirs: &SparseMatrix<f64>) {
    assert_eq!(ours.rows, theirs.rows);
    assert_eq!(ours.cols, theirs.cols);
    assert_eq!(ours.col_pointers, theirs.col_pointers, "col_pointers mismatch");
    assert_eq!(ours.row_indices, theirs.row_indices, "row_indices mismatch");

    for (ours_val, sprs_val) in ours.values.iter().zip(theirs.values.iter()) {
        assert!(
            (ours_val - sprs_val).abs() < 1e-10,
            "Value mismatch: {} vs {}",
            ours_val,
            sprs_val
        );
    }
}

#[test]
fn test_reference_vs_sprs() {
    let a = create_test_matrix();
    let b = create_test_matrix();

    let result_ref = reference_spgemm(&a, &b, 1e-10);
    let result_sprs = sprs_product(&a, &b);

    assert_same_product(&result_ref, &result_sprs);
}

#[test]
fn test_distributed_vs_sprs() {
    // Positive values, so no entry of the product cancels to zero
    let a = random_ccs(40, 30, 0.1, 17);
    let b = random_ccs(30, 25, 0.1, 18);
    let input = SpgemmInput::from_matrices(&a, &b);
    let expected = sprs_product(&a, &b);

    for world_size in [1, 2, 4, 5] {
        let outputs = run_local(world_size, |comm| {
            distributed_spgemm(&input, comm, &SpgemmConfig::default())
        });

        for output in outputs {
            let c = output.expect("distributed_spgemm failed").into_matrix();
            assert_same_product(&c, &expected);
        }
    }
}
