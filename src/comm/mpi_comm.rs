//! MPI-backed communicator (feature `mpi`)
//!
//! Transport faults are not recovered from: the MPI library's default error
//! handler aborts the job, which is the intended behaviour for this kernel.

use mpi::datatype::PartitionMut;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use mpi::Count;

use crate::comm::{Communicator, GatherTarget};
use crate::error::CommError;

/// A [`Communicator`] over an MPI communicator such as `MPI_COMM_WORLD`
pub struct MpiComm {
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
}

impl MpiComm {
    /// Wraps an existing communicator
    pub fn new(world: SimpleCommunicator) -> Self {
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Self { world, rank, size }
    }

    fn check_root(&self, root: usize) -> Result<(), CommError> {
        if root >= self.size {
            return Err(CommError::InvalidRoot {
                root,
                size: self.size,
            });
        }
        Ok(())
    }
}

/// Root's receive side, or `None` on every other rank
///
/// Root without a target would issue the non-root half of the gather, so it
/// is reported before any MPI call is made.
fn root_target<'a, T>(
    rank: usize,
    root: usize,
    target: Option<GatherTarget<'a, T>>,
) -> Result<Option<GatherTarget<'a, T>>, CommError> {
    if rank != root {
        return Ok(None);
    }
    let target = target.ok_or(CommError::Protocol {
        rank,
        expected: "gather target on root",
        got: "none",
    })?;

    let needed = target.required_len();
    if target.buf.len() < needed {
        return Err(CommError::BufferTooSmall {
            len: target.buf.len(),
            needed,
        });
    }
    Ok(Some(target))
}

fn to_counts(values: &[usize]) -> Result<Vec<Count>, CommError> {
    values
        .iter()
        .map(|&v| {
            Count::try_from(v)
                .map_err(|_| CommError::Transport(format!("count {v} exceeds MPI range")))
        })
        .collect()
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn gather_count(&self, root: usize, count: usize) -> Result<Option<Vec<usize>>, CommError> {
        self.check_root(root)?;
        let process = self.world.process_at_rank(root as Count);
        let send = count as u64;

        if self.rank == root {
            let mut counts = vec![0u64; self.size];
            process.gather_into_root(&send, &mut counts[..]);
            Ok(Some(counts.into_iter().map(|c| c as usize).collect()))
        } else {
            process.gather_into(&send);
            Ok(None)
        }
    }

    fn gather_values(
        &self,
        root: usize,
        send: &[f64],
        target: Option<GatherTarget<'_, f64>>,
    ) -> Result<(), CommError> {
        self.check_root(root)?;
        let process = self.world.process_at_rank(root as Count);

        match root_target(self.rank, root, target)? {
            Some(target) => {
                let counts = to_counts(target.counts)?;
                let displs = to_counts(target.displs)?;
                let mut partition = PartitionMut::new(&mut target.buf[..], counts, displs);
                process.gather_varcount_into_root(send, &mut partition);
            }
            None => process.gather_varcount_into(send),
        }
        Ok(())
    }

    fn gather_indices(
        &self,
        root: usize,
        send: &[usize],
        target: Option<GatherTarget<'_, usize>>,
    ) -> Result<(), CommError> {
        self.check_root(root)?;
        let process = self.world.process_at_rank(root as Count);
        let send: Vec<u64> = send.iter().map(|&i| i as u64).collect();

        match root_target(self.rank, root, target)? {
            Some(target) => {
                let counts = to_counts(target.counts)?;
                let displs = to_counts(target.displs)?;
                let mut wide = vec![0u64; target.buf.len()];
                {
                    let mut partition = PartitionMut::new(&mut wide[..], counts, displs);
                    process.gather_varcount_into_root(&send[..], &mut partition);
                }
                for (&c, &d) in target.counts.iter().zip(target.displs) {
                    for i in d..d + c {
                        target.buf[i] = wide[i] as usize;
                    }
                }
            }
            None => process.gather_varcount_into(&send[..]),
        }
        Ok(())
    }

    fn broadcast_values(&self, root: usize, buf: &mut [f64]) -> Result<(), CommError> {
        self.check_root(root)?;
        self.world.process_at_rank(root as Count).broadcast_into(buf);
        Ok(())
    }

    fn broadcast_indices(&self, root: usize, buf: &mut [usize]) -> Result<(), CommError> {
        self.check_root(root)?;
        let process = self.world.process_at_rank(root as Count);
        let mut wide: Vec<u64> = buf.iter().map(|&i| i as u64).collect();
        process.broadcast_into(&mut wide[..]);
        for (dst, src) in buf.iter_mut().zip(wide) {
            *dst = src as usize;
        }
        Ok(())
    }
}
