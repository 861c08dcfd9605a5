//! Property tests for the distributed kernel

use ccs_spgemm::utils::random_input;
use ccs_spgemm::{distributed_spgemm, reference_multiply, run_local, SpgemmConfig};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn result_is_well_formed(
        rows_per_proc in 1usize..5,
        world_size in 1usize..5,
        inner in 1usize..8,
        cols in 1usize..8,
        density in 0.0f64..0.8,
        seed in any::<u64>(),
    ) {
        let rows = rows_per_proc * world_size;
        let input = random_input(rows, inner, cols, density, seed);

        let outputs = run_local(world_size, |comm| {
            distributed_spgemm(&input, comm, &SpgemmConfig::default())
        });

        let first = outputs[0].clone().unwrap();
        for output in &outputs {
            prop_assert_eq!(output.as_ref().unwrap(), &first);
        }

        prop_assert_eq!(first.col_pointers.len(), cols + 1);
        prop_assert_eq!(first.col_pointers[0], 0);
        prop_assert!(first.col_pointers.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(first.col_pointers[cols], first.values.len());
        prop_assert!(first.row_indices.iter().all(|&r| r < rows_per_proc * world_size));
        prop_assert!(first.values.iter().all(|v| v.abs() > 1e-10));
    }

    #[test]
    fn matches_reference_when_rows_divide(
        rows_per_proc in 1usize..4,
        world_size in 1usize..4,
        inner in 1usize..6,
        cols in 1usize..6,
        seed in any::<u64>(),
    ) {
        let input = random_input(rows_per_proc * world_size, inner, cols, 0.4, seed);
        let expected = reference_multiply(&input, 1e-10).unwrap();

        let outputs = run_local(world_size, |comm| {
            distributed_spgemm(&input, comm, &SpgemmConfig::default())
        });

        for output in outputs {
            prop_assert_eq!(output.unwrap(), expected.clone());
        }
    }

    #[test]
    fn uneven_split_keeps_only_owned_rows(
        world_size in 2usize..5,
        extra in 1usize..4,
        seed in any::<u64>(),
    ) {
        let extra = extra.min(world_size - 1);
        let rows = world_size * 2 + extra;
        let input = random_input(rows, 4, 3, 0.5, seed);

        let outputs = run_local(world_size, |comm| {
            distributed_spgemm(&input, comm, &SpgemmConfig::default())
        });

        for output in outputs {
            let c = output.unwrap();
            prop_assert_eq!(c.rows, world_size * 2);
            prop_assert!(c.row_indices.iter().all(|&r| r < world_size * 2));
        }
    }
}
