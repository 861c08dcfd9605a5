//! # Distributed SpGEMM over compressed column storage
//!
//! Multiplies two sparse matrices stored in compressed column storage (CCS)
//! across a fixed group of cooperating processes and leaves an identical
//! copy of the product on every process.
//!
//! ## Overview
//!
//! Every process runs the same program (SPMD) on an identical copy of both
//! operands:
//!
//! 1. **Validation**: dimension, length and partition checks, computed
//!    locally so that all processes agree without communicating.
//!
//! 2. **Row partitioning**: each rank keeps a contiguous block of A's rows,
//!    rebased to local numbering. B is replicated, not partitioned.
//!
//! 3. **Local multiplication**: `C[:, j] = Σ_k B[k, j] · A_local[:, k]` with a
//!    dense accumulator; entries with `|value| <= 1e-10` are dropped.
//!
//! 4. **Gather and broadcast**: per output column, root gathers the entry
//!    counts, values and globally rebased rows of every rank, then
//!    broadcasts the assembled product.
//!
//! Collectives go through the [`Communicator`] trait. [`run_local`] runs a
//! group of ranks as threads in one process; the `mpi` feature adds an MPI
//! backend.
//!
//! ## Usage
//!
//! ```
//! use ccs_spgemm::{distributed_spgemm, reference_multiply, run_local};
//! use ccs_spgemm::{SpgemmConfig, utils::random_input};
//!
//! let input = random_input(12, 10, 8, 0.2, 42);
//! let expected = reference_multiply(&input, 1e-10).unwrap();
//!
//! let outputs = run_local(3, |comm| {
//!     distributed_spgemm(&input, comm, &SpgemmConfig::default()).unwrap()
//! });
//!
//! for output in &outputs {
//!     assert_eq!(output.col_pointers.len(), 9);
//!     assert_eq!(output.nnz(), expected.nnz());
//! }
//! ```

pub mod accumulator;
pub mod comm;
pub mod error;
pub mod gather;
pub mod kernel;
pub mod matrix;
pub mod multiply;
pub mod partition;
pub mod utils;
pub mod validate;

// Re-export primary components
pub use comm::{run_local, Communicator, ExecutionContext, LocalComm, LocalGroup};
#[cfg(feature = "mpi")]
pub use comm::MpiComm;
pub use error::{CommError, Result, SpgemmError, ValidationError};
pub use kernel::distributed_spgemm;
pub use matrix::{reference_multiply, reference_spgemm};
pub use matrix::{RemainderPolicy, SparseMatrix, SpgemmConfig, SpgemmInput, SpgemmOutput};
pub use matrix::DEFAULT_DROP_TOLERANCE;
pub use validate::{is_valid, validate};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
