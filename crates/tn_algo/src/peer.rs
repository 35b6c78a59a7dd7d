//! Peer registry construction (§4.4, first paragraph). Building the
//! registry from the partitioned cnode set is pure bookkeeping over
//! `tn_core` types; driving the actual `Waitsome` exchange needs a
//! `tn_io::Transport` and lives in `tn_pipeline::exchange`.

use std::collections::BTreeMap;

use tn_core::{CNode, LocalNodeIndex, PeerRecord, Rank};

/// Every remote rank this rank shares at least one node with, keyed and
/// iterated in ascending rank order — which is exactly the order §4.5
/// needs for sharer assembly ("partners with rank < self first...").
pub struct PeerRegistry {
    peers: BTreeMap<Rank, PeerRecord>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self { peers: BTreeMap::new() }
    }

    fn get_or_insert(&mut self, rank: Rank) -> &mut PeerRecord {
        self.peers.entry(rank).or_insert_with(|| PeerRecord::new(rank, 0))
    }

    pub fn get(&self, rank: Rank) -> Option<&PeerRecord> {
        self.peers.get(&rank)
    }

    pub fn get_mut(&mut self, rank: Rank) -> Option<&mut PeerRecord> {
        self.peers.get_mut(&rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.peers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PeerRecord> {
        self.peers.values_mut()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// §4.4: for every remote contributor of an owned cnode, queue a
    /// reply; for every remote-owned shared cnode, queue a query toward
    /// its owner and mark every other contributing rank as passive.
    pub fn build(
        cnodes: &[CNode],
        owned: &[usize],
        remote_shared: &[usize],
        self_rank: Rank,
        vnodes: usize,
    ) -> Self {
        let mut registry = Self::new();

        for &idx in owned {
            for contributor in cnodes[idx].contributors() {
                if contributor.key.rank != self_rank {
                    registry.get_or_insert(contributor.key.rank).count_reply();
                }
            }
        }

        for &idx in remote_shared {
            let cnode = &cnodes[idx];
            let owner = cnode
                .owner_key()
                .expect("remote_shared cnode must have an owner");
            for contributor in cnode.contributors() {
                if contributor.key.rank == owner.rank {
                    continue;
                }
                if contributor.key.rank == self_rank {
                    let payload = owner.element.0 * vnodes as i64 + owner.slot.0 as i64;
                    registry
                        .get_or_insert(owner.rank)
                        .push_query(payload, LocalNodeIndex(idx as i64));
                } else {
                    registry.get_or_insert(contributor.key.rank).passive += 1;
                }
            }
        }

        log::debug!("materialized {} peer(s) for rank {}", registry.len(), self_rank);
        registry
    }

    /// §4.5: cumulative count of shared-not-owned nodes contributed by
    /// partners with smaller rank, stored on each such peer's
    /// `shacumul` for the sharer-offset computation.
    pub fn assign_shacumul(&mut self, self_rank: Rank) {
        let mut cumulative = 0i64;
        for (&rank, peer) in self.peers.iter_mut() {
            if rank < self_rank {
                peer.shacumul = cumulative;
                cumulative += peer.bufcount;
            }
        }
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
