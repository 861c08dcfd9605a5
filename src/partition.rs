//! Row-block partitioning of A
//!
//! Each rank keeps a contiguous block of A's rows, rebased so the block
//! starts at local row 0. B is replicated unchanged.

use log::{debug, warn};

use crate::matrix::config::RemainderPolicy;
use crate::matrix::SparseMatrix;
use crate::utils::exclusive_scan;

/// The contiguous range of global rows owned by one rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    /// First global row of the block
    pub start: usize,
    /// Number of rows in the block
    pub len: usize,
}

impl RowBlock {
    /// One past the last global row
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether a global row falls inside the block
    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end()
    }
}

/// Row block of `rank` when `rows` are split across `world_size` ranks
///
/// Blocks are `rows / world_size` long and start at `rank * (rows / world_size)`.
/// Under [`RemainderPolicy::AbsorbIntoLast`] the last block also takes the
/// trailing `rows % world_size` rows; otherwise those rows belong to no block.
pub fn row_block(rows: usize, world_size: usize, rank: usize, policy: RemainderPolicy) -> RowBlock {
    let rows_per_proc = rows / world_size;
    let start = rank * rows_per_proc;
    let mut len = rows_per_proc;

    if policy == RemainderPolicy::AbsorbIntoLast && rank + 1 == world_size {
        len += rows % world_size;
    }

    RowBlock { start, len }
}

/// Row count of the assembled product
pub fn result_rows(rows: usize, world_size: usize, policy: RemainderPolicy) -> usize {
    match policy {
        RemainderPolicy::AbsorbIntoLast => rows,
        RemainderPolicy::Truncate | RemainderPolicy::Reject => (rows / world_size) * world_size,
    }
}

/// One rank's share of the operands
#[derive(Debug, Clone)]
pub struct LocalData {
    /// Rows of A owned by this rank, rebased to `[0, block.len)`
    pub a_local: SparseMatrix<f64>,
    /// Full copy of B
    pub b_local: SparseMatrix<f64>,
    /// Global rows covered by `a_local`
    pub block: RowBlock,
    /// Rows of global A
    pub global_rows: usize,
    /// Columns of A, rows of B
    pub global_inner_dim: usize,
    /// Columns of B
    pub global_cols: usize,
    /// Rows of the assembled product
    pub result_rows: usize,
}

/// Extracts the rows of `a` inside `block`, rebasing them to start at 0
///
/// Column pointers of the slice are an exclusive scan of per-column counts.
pub fn slice_rows(a: &SparseMatrix<f64>, block: RowBlock) -> SparseMatrix<f64> {
    let counts: Vec<usize> = (0..a.cols)
        .map(|j| a.col_iter(j).filter(|&(row, _)| block.contains(row)).count())
        .collect();
    let col_pointers = exclusive_scan(&counts);

    let nnz = col_pointers[a.cols];
    let mut row_indices = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);

    for j in 0..a.cols {
        for (row, &val) in a.col_iter(j) {
            if block.contains(row) {
                row_indices.push(row - block.start);
                values.push(val);
            }
        }
    }

    SparseMatrix {
        rows: block.len,
        cols: a.cols,
        col_pointers,
        row_indices,
        values,
    }
}

/// Builds this rank's [`LocalData`] from the replicated global operands
///
/// No communication takes place; every rank filters its own copy.
pub fn partition_rows(
    a: &SparseMatrix<f64>,
    b: &SparseMatrix<f64>,
    rank: usize,
    world_size: usize,
    policy: RemainderPolicy,
) -> LocalData {
    let block = row_block(a.rows, world_size, rank, policy);
    let result_rows = result_rows(a.rows, world_size, policy);

    if rank == 0 && result_rows < a.rows {
        warn!(
            "rows {}..{} of A are not assigned to any process and will be missing from the result",
            result_rows, a.rows
        );
    }

    let a_local = slice_rows(a, block);
    debug!(
        "rank {}: rows {}..{}, local nnz {}",
        rank,
        block.start,
        block.end(),
        a_local.nnz()
    );

    LocalData {
        a_local,
        b_local: b.clone(),
        block,
        global_rows: a.rows,
        global_inner_dim: a.cols,
        global_cols: b.cols,
        result_rows,
    }
}
