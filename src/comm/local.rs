//! In-process communication group
//!
//! Runs an SPMD computation with one OS thread per rank. Collectives are
//! built from a shared barrier and one mailbox slot per rank: each call is a
//! deposit phase, a barrier, a read phase, and a closing barrier so that no
//! rank can overwrite a slot before the reader is done with it.
//!
//! A rank that fails inside a collective, panics, or drops its
//! [`LocalComm`] aborts the group. Peers blocked in a barrier, or arriving at
//! one later, get [`CommError::Aborted`] instead of waiting forever.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use log::trace;

use crate::comm::{Communicator, GatherTarget};
use crate::error::CommError;

/// A contribution deposited by one rank for the current collective
#[derive(Debug, Clone)]
enum Message {
    Count(usize),
    Values(Vec<f64>),
    Indices(Vec<usize>),
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Message::Count(_) => "count",
            Message::Values(_) => "values",
            Message::Indices(_) => "indices",
        }
    }
}

/// Element types that travel through the mailboxes
trait Payload: Copy {
    const KIND: &'static str;

    fn wrap(data: Vec<Self>) -> Message;

    fn unwrap(msg: &Message) -> Option<&[Self]>;
}

impl Payload for f64 {
    const KIND: &'static str = "values";

    fn wrap(data: Vec<Self>) -> Message {
        Message::Values(data)
    }

    fn unwrap(msg: &Message) -> Option<&[Self]> {
        match msg {
            Message::Values(v) => Some(v),
            _ => None,
        }
    }
}

impl Payload for usize {
    const KIND: &'static str = "indices";

    fn wrap(data: Vec<Self>) -> Message {
        Message::Indices(data)
    }

    fn unwrap(msg: &Message) -> Option<&[Self]> {
        match msg {
            Message::Indices(v) => Some(v),
            _ => None,
        }
    }
}

struct GroupState {
    slots: Vec<Option<Message>>,
    arrived: usize,
    generation: u64,
    aborted: bool,
}

struct Shared {
    state: Mutex<GroupState>,
    wake: Condvar,
}

/// A fixed-size group of in-process ranks
pub struct LocalGroup {
    size: usize,
    shared: Arc<Shared>,
}

impl LocalGroup {
    /// Creates a group of `size` ranks
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "a communication group needs at least one rank");

        Self {
            size,
            shared: Arc::new(Shared {
                state: Mutex::new(GroupState {
                    slots: vec![None; size],
                    arrived: 0,
                    generation: 0,
                    aborted: false,
                }),
                wake: Condvar::new(),
            }),
        }
    }

    /// Creates a group with one rank per available CPU
    pub fn with_available_parallelism() -> Self {
        Self::new(num_cpus::get().max(1))
    }

    /// Number of ranks
    pub fn size(&self) -> usize {
        self.size
    }

    /// One communicator per rank, in rank order
    ///
    /// The group is single-use: once any handle is dropped, further
    /// collectives on the others fail with [`CommError::Aborted`].
    pub fn communicators(&self) -> Vec<LocalComm> {
        (0..self.size)
            .map(|rank| LocalComm {
                rank,
                size: self.size,
                shared: Arc::clone(&self.shared),
            })
            .collect()
    }
}

/// Runs `f` once per rank on its own thread and returns the results in rank order
///
/// A panic in any rank aborts the group, so peers return
/// [`CommError::Aborted`] from their pending collective, and the panic is
/// then propagated to the caller.
pub fn run_local<R, F>(world_size: usize, f: F) -> Vec<R>
where
    F: Fn(&LocalComm) -> R + Sync,
    R: Send,
{
    let group = LocalGroup::new(world_size);
    let f = &f;

    thread::scope(|scope| {
        let handles: Vec<_> = group
            .communicators()
            .into_iter()
            .map(|comm| scope.spawn(move || f(&comm)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

/// One rank's handle on a [`LocalGroup`]
///
/// Dropping the handle, including during a panic, aborts any collective the
/// other ranks have yet to complete.
pub struct LocalComm {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl LocalComm {
    fn state(&self) -> Result<MutexGuard<'_, GroupState>, CommError> {
        self.shared.state.lock().map_err(|_| CommError::Poisoned)
    }

    /// Marks the group failed and wakes every rank blocked in a barrier
    fn abort(&self) {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.aborted = true;
        self.shared.wake.notify_all();
    }

    /// Blocks until every rank arrives or the group is aborted
    ///
    /// A completed generation wins over a later abort, so a rank that leaves
    /// right after the last barrier cannot fail peers still waking from it.
    fn wait(&self) -> Result<(), CommError> {
        let mut state = self.state()?;
        if state.aborted {
            return Err(CommError::Aborted);
        }

        let generation = state.generation;
        state.arrived += 1;
        if state.arrived == self.size {
            state.arrived = 0;
            state.generation = generation.wrapping_add(1);
            self.shared.wake.notify_all();
            return Ok(());
        }

        while state.generation == generation && !state.aborted {
            state = self
                .shared
                .wake
                .wait(state)
                .map_err(|_| CommError::Poisoned)?;
        }
        if state.generation == generation {
            return Err(CommError::Aborted);
        }
        Ok(())
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

    fn deposit(&self, msg: Message) -> Result<(), CommError> {
        self.state()?.slots[self.rank] = Some(msg);
        Ok(())
    }

    /// Deposit, synchronize, let `read` run, synchronize again
    ///
    /// Any failure aborts the group: the caller is about to leave the
    /// collective sequence, and peers must not wait for it.
    fn exchange<R>(
        &self,
        msg: Message,
        read: impl FnOnce(&mut [Option<Message>]) -> Result<R, CommError>,
    ) -> Result<R, CommError> {
        let result = self.deposit(msg).and_then(|_| {
            self.wait()?;
            let value = {
                let mut state = self.state()?;
                read(&mut state.slots[..])?
            };
            self.wait()?;
            Ok(value)
        });

        if let Err(e) = &result {
            trace!("rank {}: {}, aborting group", self.rank, e);
            self.abort();
        }
        result
    }

    fn gather_slices<T: Payload>(
        &self,
        root: usize,
        send: &[T],
        target: Option<GatherTarget<'_, T>>,
    ) -> Result<(), CommError> {
        self.check_root(root)?;
        let rank = self.rank;
        let size = self.size;

        self.exchange(T::wrap(send.to_vec()), move |slots| {
            if rank != root {
                return Ok(());
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

            for (peer, slot) in slots.iter_mut().enumerate().take(size) {
                let msg = slot.take().ok_or(CommError::Protocol {
                    rank,
                    expected: T::KIND,
                    got: "nothing",
                })?;
                let data = T::unwrap(&msg).ok_or(CommError::Protocol {
                    rank,
                    expected: T::KIND,
                    got: msg.kind(),
                })?;
                if data.len() != target.counts[peer] {
                    return Err(CommError::LengthMismatch {
                        expected: target.counts[peer],
                        got: data.len(),
                    });
                }
                let start = target.displs[peer];
                target.buf[start..start + data.len()].copy_from_slice(data);
            }

            trace!("rank {} gathered {} {} entries", rank, needed, T::KIND);
            Ok(())
        })
    }

    fn broadcast_slice<T: Payload>(&self, root: usize, buf: &mut [T]) -> Result<(), CommError> {
        self.check_root(root)?;
        let rank = self.rank;
        let msg = if rank == root {
            T::wrap(buf.to_vec())
        } else {
            // Placeholder so every rank deposits; only root's slot is read.
            T::wrap(Vec::new())
        };

        self.exchange(msg, |slots| {
            if rank == root {
                return Ok(());
            }
            let msg = slots[root].as_ref().ok_or(CommError::Protocol {
                rank,
                expected: T::KIND,
                got: "nothing",
            })?;
            let data = T::unwrap(msg).ok_or(CommError::Protocol {
                rank,
                expected: T::KIND,
                got: msg.kind(),
            })?;
            if data.len() != buf.len() {
                return Err(CommError::LengthMismatch {
                    expected: buf.len(),
                    got: data.len(),
                });
            }
            buf.copy_from_slice(data);
            Ok(())
        })
    }
}

impl Drop for LocalComm {
    fn drop(&mut self) {
        if thread::panicking() {
            trace!("rank {} panicked, aborting group", self.rank);
        }
        self.abort();
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn gather_count(&self, root: usize, count: usize) -> Result<Option<Vec<usize>>, CommError> {
        self.check_root(root)?;
        let rank = self.rank;

        self.exchange(Message::Count(count), |slots| {
            if rank != root {
                return Ok(None);
            }
            slots
                .iter_mut()
                .map(|slot| match slot.take() {
                    Some(Message::Count(c)) => Ok(c),
                    other => Err(CommError::Protocol {
                        rank,
                        expected: "count",
                        got: other.as_ref().map_or("nothing", Message::kind),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        })
    }

    fn gather_values(
        &self,
        root: usize,
        send: &[f64],
        target: Option<GatherTarget<'_, f64>>,
    ) -> Result<(), CommError> {
        self.gather_slices(root, send, target)
    }

    fn gather_indices(
        &self,
        root: usize,
        send: &[usize],
        target: Option<GatherTarget<'_, usize>>,
    ) -> Result<(), CommError> {
        self.gather_slices(root, send, target)
    }

    fn broadcast_values(&self, root: usize, buf: &mut [f64]) -> Result<(), CommError> {
        self.broadcast_slice(root, buf)
    }

    fn broadcast_indices(&self, root: usize, buf: &mut [usize]) -> Result<(), CommError> {
        self.broadcast_slice(root, buf)
    }
}
