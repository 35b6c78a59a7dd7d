//! Owner election as a pure function (§3 "Node under construction"),
//! independent of [`crate::node_table`]'s incremental insertion order.
//! Used to cross-check [`tn_core::CNode::add_contributor`]'s incremental
//! result against a from-scratch computation over the full contributor
//! set (§5 "Ordering guarantees": owner election is order-independent).

use tn_core::ContributorKey;

/// The minimum-rank contributor, ties broken by lexicographic
/// `(element, slot)`.
pub fn elect_owner(contributors: &[ContributorKey]) -> Option<ContributorKey> {
    contributors
        .iter()
        .copied()
        .min_by_key(|k| (k.rank, k.element_slot()))
}
