//! Assembly of the global product from per-rank row blocks
//!
//! For every output column, in order, each rank issues:
//! 1. `gather_count` of its entry count for the column,
//! 2. `gather_values` of the column's values,
//! 3. `gather_indices` of the column's rows, rebased to global numbering.
//!
//! Root lays each column out after the previous ones, so its column pointers
//! are the running totals. Three broadcasts then replicate pointers, values
//! and rows. The call sequence does not depend on any rank's data: ranks with
//! an empty column still contribute an empty slice.

use log::{debug, trace};

use crate::comm::{Communicator, ExecutionContext, GatherTarget};
use crate::error::CommError;
use crate::matrix::SparseMatrix;
use crate::partition::LocalData;

/// Placement of one column's contributions in root's assembly buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Entries contributed by each rank
    pub counts: Vec<usize>,
    /// Offset of each rank's contribution in the global arrays
    pub displs: Vec<usize>,
    /// Offset one past the column's last entry
    pub end: usize,
}

/// Lays out a column starting at `base` from the per-rank counts
pub fn column_layout(base: usize, counts: Vec<usize>) -> ColumnLayout {
    let mut displs = Vec::with_capacity(counts.len());
    let mut offset = base;
    for &count in &counts {
        displs.push(offset);
        offset += count;
    }

    ColumnLayout {
        counts,
        displs,
        end: offset,
    }
}

/// Collects every rank's `c_local` at root and replicates the product to all ranks
///
/// `c_local` must be this rank's output of
/// [`multiply_local`](crate::multiply::multiply_local) for `local`.
pub fn gather_result<C: Communicator>(
    ctx: &ExecutionContext<'_, C>,
    local: &LocalData,
    c_local: &SparseMatrix<f64>,
) -> Result<SparseMatrix<f64>, CommError> {
    let cols = local.global_cols;
    let root = ctx.root;

    let mut col_pointers = Vec::with_capacity(cols + 1);
    let mut values: Vec<f64> = Vec::new();
    let mut row_indices: Vec<usize> = Vec::new();
    col_pointers.push(0);

    for j in 0..cols {
        let start = c_local.col_pointers[j];
        let end = c_local.col_pointers[j + 1];

        let layout = ctx
            .comm
            .gather_count(root, end - start)?
            .map(|counts| column_layout(col_pointers[j], counts));

        if let Some(layout) = &layout {
            values.resize(layout.end, 0.0);
            row_indices.resize(layout.end, 0);
            col_pointers.push(layout.end);
            trace!("column {}: counts {:?}", j, layout.counts);
        }

        let target = match &layout {
            Some(l) => Some(GatherTarget {
                buf: &mut values[..],
                counts: &l.counts,
                displs: &l.displs,
            }),
            None => None,
        };
        ctx.comm
            .gather_values(root, &c_local.values[start..end], target)?;

        let global_rows: Vec<usize> = c_local.row_indices[start..end]
            .iter()
            .map(|&row| row + local.block.start)
            .collect();
        let target = match &layout {
            Some(l) => Some(GatherTarget {
                buf: &mut row_indices[..],
                counts: &l.counts,
                displs: &l.displs,
            }),
            None => None,
        };
        ctx.comm.gather_indices(root, &global_rows, target)?;
    }

    if !ctx.is_root() {
        col_pointers = vec![0; cols + 1];
    }
    ctx.comm.broadcast_indices(root, &mut col_pointers)?;

    let nnz = col_pointers[cols];
    if !ctx.is_root() {
        values = vec![0.0; nnz];
        row_indices = vec![0; nnz];
    }
    ctx.comm.broadcast_values(root, &mut values)?;
    ctx.comm.broadcast_indices(root, &mut row_indices)?;

    debug!("rank {}: assembled product with {} entries", ctx.rank, nnz);

    Ok(SparseMatrix {
        rows: local.result_rows,
        cols,
        col_pointers,
        row_indices,
        values,
    })
}
