//! The `Transport` trait: the Rust rendering of "an MPI-style API" (§5,
//! §6). Two implementations ship from this crate: [`LoopbackTransport`]
//! (used by every test and by single-process callers) and, behind the
//! `mpi` feature, a thin wrapper over the real `mpi` crate.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tn_core::Rank;

use crate::error::{Error, Result};

/// Message tag. The algorithm only ever uses two: a rank exchanges at
/// most one query and one reply with each peer, in that order (§5
/// "Ordering guarantees").
pub type Tag = u8;
pub const TAG_QUERY: Tag = 1;
pub const TAG_REPLY: Tag = 2;
pub const TAG_BCAST: Tag = 3;

/// Handle to a posted non-blocking operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RequestId(pub usize);

/// The outcome of a completed request.
#[derive(Clone, Debug)]
pub enum Completion {
    Send,
    Recv(Vec<i64>),
}

/// An MPI-style transport: per-process rank and size, blocking
/// collectives, and non-blocking point-to-point primitives (§5).
pub trait Transport {
    fn rank(&self) -> Rank;
    fn size(&self) -> i32;

    /// Blocking collective: every rank contributes `local`; all ranks
    /// receive the vector of contributions in rank order (§4.3 step 3).
    fn allgather(&mut self, local: i64) -> Result<Vec<i64>>;

    /// Blocking broadcast of a single value from `root` to all ranks
    /// (§5, used by the auxiliary error-propagation chain of §7).
    fn bcast(&mut self, local: i64, root: Rank) -> Result<i64>;

    /// Post a non-blocking send of `payload` to `dest` tagged `tag`.
    fn isend(&mut self, dest: Rank, tag: Tag, payload: Vec<i64>) -> Result<RequestId>;

    /// Post a non-blocking receive of exactly `count` items from `source`
    /// tagged `tag`.
    fn irecv(&mut self, source: Rank, tag: Tag, count: usize) -> Result<RequestId>;

    /// Check whether any of `requests` has completed. Real MPI's
    /// `Waitsome` blocks until at least one completes; callers here must
    /// treat an empty result as "retry" rather than assume blocking
    /// semantics, since [`LoopbackTransport`] never blocks the calling
    /// thread (see its docs).
    fn waitsome(&mut self, requests: &[RequestId]) -> Result<Vec<(RequestId, Completion)>>;
}

/// Chained min-status broadcast of §7: every rank observes the same
/// pass/fail decision for a fallible local step, via one allgather of the
/// local outcome encoded as 0 (ok) / 1 (failed).
pub fn broadcast_worst_status<T: Transport + ?Sized>(
    transport: &mut T,
    local_ok: bool,
) -> Result<bool> {
    let votes = transport.allgather(if local_ok { 0 } else { 1 })?;
    Ok(votes.iter().all(|&v| v == 0))
}

enum PendingOp {
    Send,
    Recv { source: Rank, tag: Tag, count: usize },
}

type Inbox = HashMap<(i32, Tag), VecDeque<Vec<i64>>>;

struct NetworkState {
    size: i32,
    inboxes: Vec<Inbox>,
    last_broadcast: Option<i64>,
}

/// Shared backing store for every [`LoopbackTransport`] in one simulated
/// run. Construct one, then one `LoopbackTransport` per simulated rank.
///
/// Backed by `Arc<Mutex<..>>` rather than `Rc<RefCell<..>>` so a test
/// harness can drive several simulated ranks from real OS threads — this
/// exchange engine's `Waitsome` loop blocks on its own transport until a
/// peer rank actually posts the message it is waiting on, so multi-rank
/// scenarios need genuine concurrency, not single-threaded round-robin.
pub struct LoopbackNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl LoopbackNetwork {
    pub fn new(size: i32) -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState {
                size,
                inboxes: (0..size).map(|_| HashMap::new()).collect(),
                last_broadcast: None,
            })),
        }
    }

    pub fn transport(&self, rank: Rank, owned_counts: Vec<i64>) -> LoopbackTransport {
        LoopbackTransport {
            network: self.state.clone(),
            rank,
            owned_counts,
            next_id: 0,
            pending: HashMap::new(),
        }
    }
}

/// An in-process, multi-rank loopback transport. Messages are delivered
/// synchronously into the destination's inbox as soon as `isend` is
/// called, so `waitsome` never needs to block on its own account — it
/// simply drains whatever has already been delivered and returns
/// immediately, possibly with an empty result. This engine's `Waitsome`
/// loop spins on exactly that emptiness until the peer rank's own call
/// posts the message being waited on, so a multi-rank test harness must
/// run each simulated rank's call on its own OS thread (one
/// `LoopbackTransport` per thread, sharing one [`LoopbackNetwork`]).
///
/// `allgather` is answered from `owned_counts`, which the constructing
/// test/harness must supply already computed for every rank — a
/// simulation always has this in hand (it can run every rank's local
/// traversal before ever touching the network), unlike a real
/// distributed run.
pub struct LoopbackTransport {
    network: Arc<Mutex<NetworkState>>,
    rank: Rank,
    owned_counts: Vec<i64>,
    next_id: usize,
    pending: HashMap<usize, PendingOp>,
}

impl LoopbackTransport {
    fn alloc_id(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        RequestId(id)
    }
}

impl Transport for LoopbackTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> i32 {
        self.network.lock().unwrap().size
    }

    fn allgather(&mut self, local: i64) -> Result<Vec<i64>> {
        if self.owned_counts.get(self.rank.0 as usize) != Some(&local) {
            return Err(Error::Transport(format!(
                "allgather: local value {local} does not match the harness-provided owned count for rank {}",
                self.rank
            )));
        }
        Ok(self.owned_counts.clone())
    }

    fn bcast(&mut self, local: i64, root: Rank) -> Result<i64> {
        let mut state = self.network.lock().unwrap();
        if self.rank == root {
            state.last_broadcast = Some(local);
        }
        state
            .last_broadcast
            .ok_or_else(|| Error::Transport("bcast: root has not broadcast yet".into()))
    }

    fn isend(&mut self, dest: Rank, tag: Tag, payload: Vec<i64>) -> Result<RequestId> {
        if payload.len() > i32::MAX as usize {
            return Err(Error::Overflow);
        }
        {
            let mut state = self.network.lock().unwrap();
            state.inboxes[dest.0 as usize]
                .entry((self.rank.0, tag))
                .or_default()
                .push_back(payload);
        }
        let id = self.alloc_id();
        self.pending.insert(id.0, PendingOp::Send);
        log::debug!("rank {} isend -> {} tag {}", self.rank, dest, tag);
        Ok(id)
    }

    fn irecv(&mut self, source: Rank, tag: Tag, count: usize) -> Result<RequestId> {
        let id = self.alloc_id();
        self.pending.insert(id.0, PendingOp::Recv { source, tag, count });
        Ok(id)
    }

    fn waitsome(&mut self, requests: &[RequestId]) -> Result<Vec<(RequestId, Completion)>> {
        let mut state = self.network.lock().unwrap();
        let mut completed = Vec::new();
        for &rid in requests {
            let Some(op) = self.pending.get(&rid.0) else {
                continue;
            };
            match op {
                PendingOp::Send => completed.push((rid, Completion::Send)),
                PendingOp::Recv { source, tag, count } => {
                    if let Some(queue) = state.inboxes[self.rank.0 as usize].get_mut(&(source.0, *tag)) {
                        if let Some(msg) = queue.pop_front() {
                            if msg.len() != *count {
                                return Err(Error::CountMismatch {
                                    expected: *count,
                                    actual: msg.len(),
                                });
                            }
                            completed.push((rid, Completion::Recv(msg)));
                        }
                    }
                }
            }
        }
        for (rid, _) in &completed {
            self.pending.remove(&rid.0);
        }
        Ok(completed)
    }
}
