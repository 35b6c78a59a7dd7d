//! Sharer-list assembly (§4.5). The parts that don't need exchange
//! results — rank ordering, the self-sharer, and the owned-shared
//! entries — live here; appending remote-owned entries once their final
//! ids are known happens in `tn_pipeline` after the exchange completes.

use std::collections::BTreeMap;

use tn_core::{CNode, LocalNodeIndex, Rank, Sharer};

use crate::peer::PeerRegistry;

/// Sharers in the order §4.5 requires: ranks below self, the self-sharer,
/// ranks above self.
pub struct SharerTable {
    self_rank: Rank,
    sharers: Vec<Sharer>,
    index_of_rank: BTreeMap<Rank, usize>,
}

impl SharerTable {
    /// Builds the ordered skeleton from every peer rank plus self. Safe to
    /// call even with zero peers (single-rank run, §8 "Single-rank run").
    pub fn build_skeleton(self_rank: Rank, peer_ranks: impl IntoIterator<Item = Rank>) -> Self {
        let mut ranks: Vec<Rank> = peer_ranks.into_iter().collect();
        ranks.sort_unstable();
        ranks.dedup();

        let mut sharers = Vec::with_capacity(ranks.len() + 1);
        let mut index_of_rank = BTreeMap::new();
        let mut placed_self = false;

        for rank in ranks {
            if !placed_self && rank > self_rank {
                index_of_rank.insert(self_rank, sharers.len());
                sharers.push(Sharer::new(self_rank, true));
                placed_self = true;
            }
            index_of_rank.insert(rank, sharers.len());
            sharers.push(Sharer::new(rank, false));
        }
        if !placed_self {
            index_of_rank.insert(self_rank, sharers.len());
            sharers.push(Sharer::new(self_rank, true));
        }

        Self { self_rank, sharers, index_of_rank }
    }

    pub fn sharers(&self) -> &[Sharer] {
        &self.sharers
    }

    pub fn sharers_mut(&mut self) -> &mut [Sharer] {
        &mut self.sharers
    }

    pub fn index_of(&self, rank: Rank) -> usize {
        self.index_of_rank[&rank]
    }

    pub fn self_index(&self) -> usize {
        self.index_of_rank[&self.self_rank]
    }

    /// §4.5: "each owned-shared cnode appends its local index to every
    /// one of its contributors' sharer lists"; also fills the self-sharer's
    /// `owned_offset`/`owned_count`/`shared_mine_count`.
    pub fn append_owned_shared(&mut self, cnodes: &[CNode], owned: &[usize]) {
        let mut shared_mine_count = 0i64;
        for &idx in owned {
            let cnode = &cnodes[idx];
            if cnode.num_contributors() >= 2 {
                shared_mine_count += 1;
            }
            let local_id = LocalNodeIndex(cnode.runid);
            for contributor in cnode.contributors() {
                let sharer_idx = self.index_of(contributor.key.rank);
                self.sharers[sharer_idx].push(local_id);
            }
        }

        let self_idx = self.self_index();
        self.sharers[self_idx].owned_offset = 0;
        self.sharers[self_idx].owned_count = owned.len() as i64;
        self.sharers[self_idx].shared_mine_count = shared_mine_count;
    }

    /// §4.5 second paragraph: every non-self sharer's `owned_offset` and
    /// `owned_count` derive from the matching peer record's `shacumul`
    /// (lower-rank partners only) and `bufcount`.
    pub fn apply_peer_offsets(&mut self, peers: &PeerRegistry) {
        for peer in peers.iter() {
            let idx = self.index_of(peer.rank);
            if peer.rank < self.self_rank {
                self.sharers[idx].owned_offset = peer.shacumul;
                self.sharers[idx].owned_count = peer.bufcount;
            } else {
                self.sharers[idx].owned_offset = 0;
                self.sharers[idx].owned_count = 0;
            }
        }
    }
}
