//! Error types for the distributed SpGEMM kernel

use thiserror::Error;

/// Result type alias using the crate's top-level error
pub type Result<T> = std::result::Result<T, SpgemmError>;

/// Reasons an input is rejected before any collective call is issued
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A dimension is zero or negative
    #[error("dimension '{name}' must be positive, got {value}")]
    NonPositiveDimension {
        /// Which dimension
        name: &'static str,
        /// The rejected value
        value: i64,
    },

    /// Values and row indices of one matrix differ in length
    #[error("matrix {matrix}: {values} values but {row_indices} row indices")]
    LengthMismatch {
        /// Matrix label ("A" or "B")
        matrix: &'static str,
        /// Number of values
        values: usize,
        /// Number of row indices
        row_indices: usize,
    },

    /// Column pointer array does not have `cols + 1` entries
    #[error("matrix {matrix}: expected {expected} column pointers, got {got}")]
    ColPointerLength {
        /// Matrix label
        matrix: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Column pointers do not start at 0, decrease, or do not end at nnz
    #[error("matrix {matrix}: malformed column pointers at column {col}")]
    MalformedColPointers {
        /// Matrix label
        matrix: &'static str,
        /// First offending column
        col: usize,
    },

    /// A row index lies outside `[0, rows)`
    #[error("matrix {matrix}: row index {row} out of bounds (rows = {rows})")]
    RowIndexOutOfBounds {
        /// Matrix label
        matrix: &'static str,
        /// Offending row index
        row: usize,
        /// Row count of the matrix
        rows: usize,
    },

    /// A column lists the same row more than once
    #[error("matrix {matrix}: row {row} repeated in column {col}")]
    DuplicateRowIndex {
        /// Matrix label
        matrix: &'static str,
        /// Offending column
        col: usize,
        /// Repeated row index
        row: usize,
    },

        /// More processes than rows with an uneven split
    #[error("cannot split {rows} rows across {world_size} processes")]
    InfeasiblePartition {
        /// Row count of A
        rows: usize,
        /// Number of processes
        world_size: usize,
    },

    /// The configured remainder policy refuses an uneven split
    #[error("{rows} rows do not divide evenly across {world_size} processes")]
    UnevenPartition {
        /// Row count of A
        rows: usize,
        /// Number of processes
        world_size: usize,
    },
}

/// Failures of the communication layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    /// Ranks issued different collectives at the same step
    #[error("rank {rank}: expected {expected} but peer contributed {got}")]
    Protocol {
        /// Rank that detected the mismatch
        rank: usize,
        /// Collective this rank issued
        expected: &'static str,
        /// Collective observed from a peer
        got: &'static str,
    },

    /// Root rank is not a member of the group
    #[error("root {root} is outside a group of {size}")]
    InvalidRoot {
        /// Requested root
        root: usize,
        /// Group size
        size: usize,
    },

    /// Receive buffer cannot hold what the counts and displacements describe
    #[error("receive buffer of {len} elements cannot hold {needed}")]
    BufferTooSmall {
        /// Buffer length
        len: usize,
        /// Required length
        needed: usize,
    },

    /// A broadcast delivered a different length than the receiver expected
    #[error("broadcast length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Length prepared by the receiver
        expected: usize,
        /// Length sent by root
        got: usize,
    },

    /// A peer thread panicked while holding shared group state
    #[error("communication group state poisoned")]
    Poisoned,

    /// A peer failed or left the group while this rank still expected it
    #[error("communication group aborted by a failed or departed peer")]
    Aborted,

    /// Failure reported by an external transport
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Top-level error of the distributed kernel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpgemmError {
    /// Input rejected by the validator
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Communication layer failure
    #[error("communication failure: {0}")]
    Comm(#[from] CommError),
}
