//! Sharer lists (§3 "Sharer list", §4.5).

use crate::ids::{LocalNodeIndex, Rank};

/// An ordered list of local node indices shared with one partner rank
/// (including self), split into three contiguous regions: indices owned
/// by the local rank and shared with this partner, indices owned by this
/// partner and shared with the local rank, and (self-sharer only) the
/// `owned_count` spanning the whole owned block.
#[derive(Clone, Debug)]
pub struct Sharer {
    pub rank: Rank,
    pub is_self: bool,
    /// Strictly increasing local node indices shared with this partner.
    pub shared_nodes: Vec<LocalNodeIndex>,
    /// Cumulative count of shared-not-owned nodes from partners with
    /// smaller rank (0 for higher-rank partners); 0 on the self-sharer.
    pub owned_offset: i64,
    /// `bufcount` for lower-rank partners, 0 for higher-rank partners; on
    /// the self-sharer, `num_owned`.
    pub owned_count: i64,
    /// Self-sharer only: number of owned nodes that had >= 2 contributors.
    pub shared_mine_count: i64,
}

impl Sharer {
    pub fn new(rank: Rank, is_self: bool) -> Self {
        Self {
            rank,
            is_self,
            shared_nodes: Vec::new(),
            owned_offset: 0,
            owned_count: 0,
            shared_mine_count: 0,
        }
    }

    pub fn push(&mut self, idx: LocalNodeIndex) {
        self.shared_nodes.push(idx);
    }

    /// §8 invariant: for every sharer, `shared_nodes` is strictly
    /// increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.shared_nodes.windows(2).all(|w| w[0].0 < w[1].0)
    }
}
