//! The ghost-layer contract (§6 "Ghost layer contract"). The ghost-layer
//! data structure itself is out of scope (§1); this trait only exposes
//! what the core needs from it.

use tn_core::{ElementIndex, Rank};

/// Resolves a ghost index to its owning rank and remote local element
/// index, and exposes the per-rank ghost-count prefix sum.
pub trait GhostLayer {
    /// Prefix sum over ranks of ghost counts; length `mpisize + 1`.
    fn proc_offsets(&self) -> &[i64];

    /// `(owning rank, remote local element index)` for a ghost index.
    fn owner_of(&self, ghost_index: i64) -> (Rank, ElementIndex);
}

/// A simple owned `GhostLayer` built from an explicit ghost-to-owner
/// table, useful for tests and for callers who already materialize the
/// full ghost layer in memory.
#[derive(Clone, Debug, Default)]
pub struct VecGhostLayer {
    proc_offsets: Vec<i64>,
    owners: Vec<(Rank, ElementIndex)>,
}

impl VecGhostLayer {
    pub fn new(proc_offsets: Vec<i64>, owners: Vec<(Rank, ElementIndex)>) -> Self {
        debug_assert_eq!(
            *proc_offsets.last().unwrap_or(&0) as usize,
            owners.len(),
            "proc_offsets must end at the total ghost count"
        );
        Self { proc_offsets, owners }
    }
}

impl GhostLayer for VecGhostLayer {
    fn proc_offsets(&self) -> &[i64] {
        &self.proc_offsets
    }

    fn owner_of(&self, ghost_index: i64) -> (Rank, ElementIndex) {
        self.owners[ghost_index as usize]
    }
}
