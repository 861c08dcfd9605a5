//! Communication layer for the SPMD kernel
//!
//! A [`Communicator`] exposes exactly the blocking collectives the gather
//! protocol needs. Every member of the group must issue the same sequence of
//! calls; a member that skips or reorders a call stalls an MPI group and
//! aborts an in-process one.

pub mod local;
#[cfg(feature = "mpi")]
pub mod mpi_comm;

pub use local::{run_local, LocalComm, LocalGroup};
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

use crate::error::CommError;

/// Receive side of a variable-count gather, only meaningful on root
///
/// Rank `r`'s contribution lands at `buf[displs[r]..displs[r] + counts[r]]`.
pub struct GatherTarget<'a, T> {
    pub buf: &'a mut [T],
    pub counts: &'a [usize],
    pub displs: &'a [usize],
}

impl<T> GatherTarget<'_, T> {
    /// Highest index any contribution writes to, plus one
    pub fn required_len(&self) -> usize {
        self.counts
            .iter()
            .zip(self.displs)
            .map(|(&c, &d)| c + d)
            .max()
            .unwrap_or(0)
    }
}

/// Blocking collective operations over a fixed group of processes
pub trait Communicator {
    /// This process's identifier in `[0, size)`
    fn rank(&self) -> usize;

    /// Number of processes in the group
    fn size(&self) -> usize;

    /// Collects one count from every rank at `root`
    ///
    /// Root receives the counts in rank order; other ranks receive `None`.
    fn gather_count(&self, root: usize, count: usize) -> Result<Option<Vec<usize>>, CommError>;

    /// Variable-count gather of values at `root`
    ///
    /// Root must pass `Some(target)`; other ranks pass `None`. Ranks with
    /// nothing to contribute still call this with an empty slice.
    fn gather_values(
        &self,
        root: usize,
        send: &[f64],
        target: Option<GatherTarget<'_, f64>>,
    ) -> Result<(), CommError>;

    /// Variable-count gather of indices at `root`
    fn gather_indices(
        &self,
        root: usize,
        send: &[usize],
        target: Option<GatherTarget<'_, usize>>,
    ) -> Result<(), CommError>;

    /// Replicates root's values; every rank's buffer must already have root's length
    fn broadcast_values(&self, root: usize, buf: &mut [f64]) -> Result<(), CommError>;

    /// Replicates root's indices; every rank's buffer must already have root's length
    fn broadcast_indices(&self, root: usize, buf: &mut [usize]) -> Result<(), CommError>;
}

/// Explicit distributed-execution context threaded through every phase
pub struct ExecutionContext<'a, C: Communicator> {
    /// This process's rank
    pub rank: usize,
    /// Number of processes
    pub world_size: usize,
    /// Coordinating rank for gather and broadcast
    pub root: usize,
    /// Communication handle
    pub comm: &'a C,
}

impl<'a, C: Communicator> ExecutionContext<'a, C> {
    /// Captures rank and size once from the communicator
    pub fn new(comm: &'a C, root: usize) -> Result<Self, CommError> {
        let world_size = comm.size();
        if root >= world_size {
            return Err(CommError::InvalidRoot {
                root,
                size: world_size,
            });
        }

        Ok(Self {
            rank: comm.rank(),
            world_size,
            root,
            comm,
        })
    }

    /// Whether this process is the coordinating rank
    pub fn is_root(&self) -> bool {
        self.rank == self.root
    }
}
