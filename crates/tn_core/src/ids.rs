//! Newtypes for the identifier spaces described in §3 "Node identifier
//! spaces": ranks, element indices, element-local slots, local node
//! indices, and global node identifiers.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An MPI-style process rank.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rank(pub i32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local element index, meaning either a local element or a ghost index
/// depending on context; which it is is determined by the caller (the
/// traversal adapter resolves ghosts to `(Rank, ElementIndex)` pairs before
/// they ever reach the node table).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementIndex(pub i64);

/// One of the (up to) 25 element-local node slots described in §3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slot(pub u8);

/// A local node index in `[0, num_local)`: owned nodes sorted first, then
/// remote-owned shared nodes in peer-rank-then-peer-local-index order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalNodeIndex(pub i64);

/// `rank_owner_offset + owner_local_index`, globally unique across the
/// whole forest.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalNodeId(pub i64);

/// `(rank, element, slot)`, the lexicographic tie-break key for owner
/// election (§3 "Node under construction").
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ContributorKey {
    pub rank: Rank,
    pub element: ElementIndex,
    pub slot: Slot,
}

impl ContributorKey {
    pub fn new(rank: Rank, element: ElementIndex, slot: Slot) -> Self {
        Self { rank, element, slot }
    }

    /// Lexicographic `(element, slot)` ordering used to pick the minimal
    /// reference within one rank (§4.2 step 3).
    pub fn element_slot(&self) -> (ElementIndex, Slot) {
        (self.element, self.slot)
    }
}
