//! The distributed SpGEMM entry point
//!
//! Every rank runs the same sequence: validate, partition, multiply locally,
//! gather and broadcast. Validation uses only the rank's own copy of the
//! input, so either all ranks return the validation error before the first
//! collective or none does.

use log::debug;

use crate::comm::{Communicator, ExecutionContext};
use crate::error::Result;
use crate::gather::gather_result;
use crate::matrix::aggregate::{SpgemmInput, SpgemmOutput};
use crate::matrix::config::SpgemmConfig;
use crate::multiply::multiply_local;
use crate::partition::partition_rows;
use crate::validate::validate;

/// Computes `C = A × B` across the communicator's group
///
/// `input` must be identical on every rank. On success every rank returns
/// the same [`SpgemmOutput`].
///
/// # Examples
///
/// ```
/// use ccs_spgemm::{distributed_spgemm, run_local, SparseMatrix, SpgemmConfig, SpgemmInput};
///
/// let a = SparseMatrix::<f64>::identity(4);
/// let b = SparseMatrix::new(4, 4, vec![0, 1, 2, 2, 3], vec![3, 0, 1], vec![2.0, 5.0, 7.0]);
/// let input = SpgemmInput::from_matrices(&a, &b);
///
/// let outputs = run_local(2, |comm| {
///     distributed_spgemm(&input, comm, &SpgemmConfig::default()).unwrap()
/// });
///
/// assert_eq!(outputs[0], outputs[1]);
/// assert_eq!(outputs[0].col_pointers, b.col_pointers);
/// ```
pub fn distributed_spgemm<C: Communicator>(
    input: &SpgemmInput,
    comm: &C,
    config: &SpgemmConfig,
) -> Result<SpgemmOutput> {
    validate(input, comm.size(), config)?;
    let ctx = ExecutionContext::new(comm, config.root)?;
    let (a, b) = input.to_matrices()?;

    let local = partition_rows(&a, &b, ctx.rank, ctx.world_size, config.remainder);
    let c_local = multiply_local(&local, config.drop_tolerance);
    let c = gather_result(&ctx, &local, &c_local)?;

    debug!(
        "rank {}: product {}x{} with {} entries",
        ctx.rank,
        c.rows,
        c.cols,
        c.nnz()
    );
    Ok(c.into())
}
