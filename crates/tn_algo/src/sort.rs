//! Local sort and partition (§4.3, steps 1-2). The all-gather of owned
//! counts and the prefix-sum into per-rank global offsets (§4.3 step 3)
//! need a [`tn_io::transport::Transport`], so they live in `tn_pipeline`;
//! this module only needs `tn_core`.

use tn_core::{CNode, Rank};

/// The two partitions §4.3 step 1 produces, as indices into the cnode
/// arena. `owned` is already sorted by `(owner.element, owner.slot)` and
/// each cnode's `runid` has been rewritten to its position in that order
/// — the local-owned index described in §3.
pub struct SortOutcome {
    pub owned: Vec<usize>,
    /// Remote-owned cnodes with at least one local contributor: the ones
    /// that still matter to this rank after dropping pure-ghost noise.
    pub remote_shared: Vec<usize>,
}

impl SortOutcome {
    pub fn num_owned(&self) -> i64 {
        self.owned.len() as i64
    }
}

/// Partitions `cnodes` into owned / remote-shared / dropped, sorts the
/// owned partition, and stamps `runid` on every owned cnode to its sort
/// position. Remote cnodes with no local contributor are dropped (§4.3
/// step 1: "remote cnodes that never had a local contributor are
/// dropped... they existed only because a corner callback visited
/// ghosts").
pub fn partition_and_sort(cnodes: &mut [CNode], self_rank: Rank) -> SortOutcome {
    let mut owned = Vec::new();
    let mut remote_shared = Vec::new();

    for (idx, cnode) in cnodes.iter().enumerate() {
        match cnode.owner_key() {
            Some(owner) if owner.rank == self_rank => owned.push(idx),
            Some(_owner) => {
                let has_local_contributor = cnode
                    .contributors()
                    .iter()
                    .any(|c| c.key.rank == self_rank);
                if has_local_contributor {
                    remote_shared.push(idx);
                }
            }
            None => {}
        }
    }

    owned.sort_by_key(|&idx| cnodes[idx].owner_key().unwrap().element_slot());
    for (position, &idx) in owned.iter().enumerate() {
        cnodes[idx].runid = position as i64;
    }

    log::debug!(
        "partitioned {} owned, {} remote-shared cnodes for rank {}",
        owned.len(),
        remote_shared.len(),
        self_rank
    );
    SortOutcome { owned, remote_shared }
}
