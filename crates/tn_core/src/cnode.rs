//! A node under construction (§3 "Node under construction (cnode)").
//!
//! Contributors are stored in a small inline vector and the owner is
//! tracked by *index* into that vector, never by raw pointer — per the
//! Design Notes, this is the single most consequential invariant of the
//! data structure: the owner reference must survive reallocation of the
//! contributors storage, and a `Vec` index (unlike a raw pointer) already
//! does that.

use crate::error::{CoreError, CoreResult};
use crate::ids::ContributorKey;
use crate::slots::Bcon;

/// A single contributor process to a node under construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Contributor {
    pub key: ContributorKey,
}

/// A node under construction, per-process local view.
#[derive(Clone, Debug)]
pub struct CNode {
    /// Running sequence number during construction; later overwritten
    /// first with the sort position, then with the final local node id.
    pub runid: i64,
    pub bcon: Bcon,
    contributors: Vec<Contributor>,
    owner_idx: Option<usize>,
}

impl CNode {
    pub fn new(bcon: Bcon) -> Self {
        Self {
            runid: -1,
            bcon,
            contributors: Vec::new(),
            owner_idx: None,
        }
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    pub fn owner(&self) -> Option<&Contributor> {
        self.owner_idx.map(|i| &self.contributors[i])
    }

    pub fn owner_key(&self) -> Option<ContributorKey> {
        self.owner().map(|c| c.key)
    }

    pub fn num_contributors(&self) -> usize {
        self.contributors.len()
    }

    /// §4.2 step 3: if `key.rank` already has a contributor, reduce its
    /// recorded `(element, slot)` lexicographically with `key` (keep the
    /// smaller) and return `false` (no owner change: owner is selected by
    /// rank first, and the rank of an existing contributor never changes).
    ///
    /// §4.2 step 4: otherwise append a new contributor. If it is now the
    /// smallest-rank contributor, make it owner and return `true`.
    pub fn add_contributor(&mut self, key: ContributorKey) -> CoreResult<bool> {
        if let Some(pos) = self.contributors.iter().position(|c| c.key.rank == key.rank) {
            if key.element_slot() < self.contributors[pos].key.element_slot() {
                self.contributors[pos].key = key;
            }
            return Ok(false);
        }

        self.contributors.push(Contributor { key });
        let new_idx = self.contributors.len() - 1;

        let became_owner = match self.owner_idx {
            None => {
                self.owner_idx = Some(new_idx);
                true
            }
            Some(idx) => {
                if key.rank < self.contributors[idx].key.rank {
                    self.owner_idx = Some(new_idx);
                    true
                } else {
                    false
                }
            }
        };
        self.assert_owner_invariant()?;
        Ok(became_owner)
    }

    /// Re-select the owner by full scan (smallest rank, ties broken by
    /// lexicographic `(element, slot)`). Never required when contributors
    /// are stored by index rather than raw pointer (a `Vec` index survives
    /// reallocation), but kept as the explicit, auditable equivalent of
    /// the original's "rescan after reallocation" step so the invariant
    /// is checkable rather than just assumed.
    pub fn rescan_owner(&mut self) {
        self.owner_idx = self
            .contributors
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| (c.key.rank, c.key.element_slot()))
            .map(|(i, _)| i);
    }

    fn assert_owner_invariant(&self) -> CoreResult<()> {
        let Some(owner) = self.owner() else {
            return Ok(());
        };
        for c in &self.contributors {
            if c.key.rank < owner.key.rank {
                log::error!(
                    "owner desync: owner rank {:?} but contributor rank {:?} is smaller",
                    owner.key.rank,
                    c.key.rank
                );
                return Err(CoreError::ContractViolation(
                    "owner->rank must be <= every contributor's rank",
                ));
            }
        }
        Ok(())
    }
}
