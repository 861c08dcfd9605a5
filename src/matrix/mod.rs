// Matrix data structures, configuration and the reference product

pub mod aggregate;
pub mod ccs;
pub mod config;
pub mod reference;

pub use aggregate::{SpgemmInput, SpgemmOutput};
pub use ccs::SparseMatrix;
pub use config::{RemainderPolicy, SpgemmConfig, DEFAULT_DROP_TOLERANCE};
pub use reference::{reference_multiply, reference_spgemm};
