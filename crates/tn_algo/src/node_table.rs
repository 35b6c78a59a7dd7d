//! The node-construct table and `node_register` (§4.2).
//!
//! One [`NodeTable`] per process holds every cnode under construction plus
//! the per-local-element slot vectors the traversal adapter writes into.
//! Two entry points cover the two call sites of §4.1/§4.2:
//! [`NodeTable::register_local`] for a slot on one of this rank's own
//! elements, and [`NodeTable::register_remote`] for a contributor resolved
//! from a ghost (what the spec calls `node_gregister`) — the ghost
//! resolution itself (ghost index -> owning rank + remote element index)
//! is a `tn_io::GhostLayer` concern and happens one layer up, in
//! `tn_pipeline`, before either entry point is called.

use tn_core::{slots, Bcon, CNode, ContributorKey, CoreError, CoreResult, ElementIndex, Rank, Slot};

/// Sentinel written into an element's slot vector before that slot has
/// been registered (§3 "Ownership lifecycle").
pub const UNSET: i64 = -1;

pub struct NodeTable {
    self_rank: Rank,
    vnodes: usize,
    cnodes: Vec<CNode>,
    /// One entry per local element, each `vnodes` long, holding either
    /// `UNSET` or the raw index into `cnodes` registered for that slot.
    element_slots: Vec<Vec<i64>>,
}

impl NodeTable {
    pub fn new(self_rank: Rank, vnodes: usize) -> Self {
        Self {
            self_rank,
            vnodes,
            cnodes: Vec::new(),
            element_slots: Vec::new(),
        }
    }

    /// Registers a fresh local element with all slots unset; returns its
    /// index for use by the traversal adapter.
    pub fn add_local_element(&mut self) -> ElementIndex {
        let idx = self.element_slots.len() as i64;
        self.element_slots.push(vec![UNSET; self.vnodes]);
        ElementIndex(idx)
    }

    pub fn num_local_elements(&self) -> usize {
        self.element_slots.len()
    }

    pub fn element_slot_vector(&self, element: ElementIndex) -> &[i64] {
        &self.element_slots[element.0 as usize]
    }

    pub fn cnodes(&self) -> &[CNode] {
        &self.cnodes
    }

    pub fn cnodes_mut(&mut self) -> &mut [CNode] {
        &mut self.cnodes
    }

    pub fn cnode(&self, lni: usize) -> &CNode {
        &self.cnodes[lni]
    }

    fn alloc_if_unset(&mut self, lni: &mut Option<usize>, bcon: Bcon) -> usize {
        if let Some(idx) = *lni {
            return idx;
        }
        let idx = self.cnodes.len();
        self.cnodes.push(CNode::new(bcon));
        *lni = Some(idx);
        idx
    }

    /// §4.2 `node_register`, local-element case: steps 1, 2, 3/4 in order.
    /// `bcon_for_new` only takes effect if this call allocates the cnode;
    /// an existing cnode's `bcon` is left untouched here (promotion is a
    /// separate, explicit step — see [`CNode`]'s `bcon` field and §9
    /// "Configuration promotion").
    pub fn register_local(
        &mut self,
        lni: &mut Option<usize>,
        element: ElementIndex,
        slot: Slot,
        bcon_for_new: Bcon,
    ) -> CoreResult<usize> {
        let idx = self.alloc_if_unset(lni, bcon_for_new);

        let cell = &mut self.element_slots[element.0 as usize][slot.0 as usize];
        if *cell != UNSET {
            return Err(CoreError::ContractViolation(
                "local slot already registered by a prior call",
            ));
        }
        *cell = idx as i64;

        self.cnodes[idx].add_contributor(ContributorKey::new(self.self_rank, element, slot))?;
        Ok(idx)
    }

    /// §4.2 `node_register`, ghost-resolved case (`node_gregister`): the
    /// caller has already turned a ghost index into `(rank, element)` via
    /// the ghost layer. Always-owned slots (§9) can never be registered
    /// from a ghost — that is a contract violation the caller must not
    /// trigger.
    pub fn register_remote(
        &mut self,
        lni: &mut Option<usize>,
        rank: Rank,
        element: ElementIndex,
        slot: Slot,
        bcon_for_new: Bcon,
    ) -> CoreResult<usize> {
        if slots::is_always_owned(slot.0) {
            return Err(CoreError::AlwaysOwnedViolation { slot: slot.0 });
        }
        let idx = self.alloc_if_unset(lni, bcon_for_new);
        self.cnodes[idx].add_contributor(ContributorKey::new(rank, element, slot))?;
        Ok(idx)
    }
}
