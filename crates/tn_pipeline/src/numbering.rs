//! The single entry point wiring every stage of §2's data-flow table
//! together: traversal -> sort & allgather -> peer registry -> exchange ->
//! sharer assembly -> per-element finalization.

use tn_algo::{PeerRegistry, SharerTable};
use tn_core::{ElementIndex, NumberingConfig, Sharer};
use tn_io::GhostLayer;
use tn_io::transport::Transport;

use crate::error::Result;
use crate::exchange::drive_exchange;
use crate::traversal::TraversalAdapter;

/// One element's finalized output record (§6 "Output structure").
#[derive(Clone, Debug)]
pub struct ElementRecord {
    /// Dense local node ids, one per element-local slot (`-1` = unused).
    pub nodes: Vec<i64>,
    pub config_byte: u8,
    pub face_code: u8,
}

/// Everything `number_forest` produces for this rank (§2, §6).
#[derive(Clone, Debug)]
pub struct NumberingResult {
    pub elements: Vec<ElementRecord>,
    pub num_owned: i64,
    pub global_offset: i64,
    pub global_owned_counts: Vec<i64>,
    /// Global node ids for remote-owned shared nodes, ordered by
    /// `shacumul + position` (§3 "non-local table").
    pub nonlocal_nodes: Vec<i64>,
    pub sharers: Vec<Sharer>,
}

/// Runs one rank's pass of the numbering algorithm.
///
/// `run_traversal` is handed a fresh [`TraversalAdapter`] to drive with the
/// forest's own iteration (out of scope here, per §1); everything after
/// that point — sort, allgather, peer materialization, exchange, sharer
/// assembly, finalization — is this function's responsibility.
pub fn number_forest<T, G>(
    transport: &mut T,
    ghosts: &G,
    config: NumberingConfig,
    run_traversal: impl FnOnce(&mut TraversalAdapter<'_>),
) -> Result<NumberingResult>
where
    T: Transport + ?Sized,
    G: GhostLayer,
{
    let self_rank = transport.rank();
    let vnodes = config.vnodes();

    let mut adapter = TraversalAdapter::new(self_rank, config, ghosts);
    run_traversal(&mut adapter);
    let (mut table, element_bits, element_faces, traversal_error) = adapter.finish();
    if let Some(err) = traversal_error {
        return Err(err.into());
    }

    let outcome = tn_algo::partition_and_sort(table.cnodes_mut(), self_rank);
    log::debug!("rank {self_rank}: traversal done, {} owned nodes", outcome.num_owned());

    let counts = transport.allgather(outcome.num_owned())?;
    let mut offsets = vec![0i64; counts.len() + 1];
    for (i, &c) in counts.iter().enumerate() {
        offsets[i + 1] = offsets[i] + c;
    }
    let global_offset = offsets[self_rank.0 as usize];

    let mut registry = PeerRegistry::build(table.cnodes(), &outcome.owned, &outcome.remote_shared, self_rank, vnodes);
    registry.assign_shacumul(self_rank);
    log::debug!("rank {self_rank}: materialized {} peer(s)", registry.len());

    let nonlocal_nodes = drive_exchange(transport, &mut registry, &mut table, self_rank, vnodes, outcome.num_owned(), &offsets)?;
    log::debug!("rank {self_rank}: exchange complete, {} nonlocal node(s)", nonlocal_nodes.len());

    let mut sharer_table = SharerTable::build_skeleton(self_rank, registry.iter().map(|p| p.rank));
    sharer_table.append_owned_shared(table.cnodes(), &outcome.owned);
    sharer_table.apply_peer_offsets(&registry);
    append_remote_owned_shared(&mut sharer_table, table.cnodes(), &outcome.remote_shared);

    let mut elements = Vec::with_capacity(table.num_local_elements());
    for local in 0..table.num_local_elements() {
        let element = ElementIndex(local as i64);
        let config_byte = tn_algo::resolve_config_byte(element_bits[local]);
        let nodes = tn_algo::finalize_element_nodes(table.element_slot_vector(element), table.cnodes(), config_byte, config.with_faces)?;
        elements.push(ElementRecord { nodes, config_byte, face_code: element_faces[local].raw() });
    }

    Ok(NumberingResult {
        elements,
        num_owned: outcome.num_owned(),
        global_offset,
        global_owned_counts: counts,
        nonlocal_nodes,
        sharers: sharer_table.sharers().to_vec(),
    })
}

/// §4.5 final step: every remote-owned shared cnode appends its now-final
/// local id to every one of its contributors' sharer lists. Sorting by
/// `runid` puts them in peer-then-peer-local-sort order for free, since
/// `runid = num_owned + shacumul + position` and `shacumul` only ever
/// increases with peer rank.
fn append_remote_owned_shared(sharer_table: &mut SharerTable, cnodes: &[tn_core::CNode], remote_shared: &[usize]) {
    let mut ordered: Vec<usize> = remote_shared.to_vec();
    ordered.sort_by_key(|&idx| cnodes[idx].runid);
    for idx in ordered {
        let cnode = &cnodes[idx];
        let local_id = tn_core::LocalNodeIndex(cnode.runid);
        for contributor in cnode.contributors() {
            let sharer_idx = sharer_table.index_of(contributor.key.rank);
            sharer_table.sharers_mut()[sharer_idx].push(local_id);
        }
    }
}
