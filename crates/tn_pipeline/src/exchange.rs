//! The non-blocking exchange engine (§4.4): drives the four-state
//! `Waitsome` loop described there over a [`Transport`] and a
//! [`tn_algo::PeerRegistry`].

use tn_algo::{NodeTable, PeerRegistry};
use tn_core::peer::PeerState;
use tn_core::{ElementIndex, Rank};
use tn_io::transport::{Completion, RequestId, Transport, TAG_QUERY, TAG_REPLY};

use crate::error::Result;

struct PeerExchange {
    rank: Rank,
    state: PeerState,
    request: Option<RequestId>,
}

/// Drives every peer's state machine to completion and returns the
/// nonlocal-node global-id table, indexed by `shacumul + position` exactly
/// as §3's "non-local table" describes.
pub fn drive_exchange<T: Transport + ?Sized>(
    transport: &mut T,
    registry: &mut PeerRegistry,
    table: &mut NodeTable,
    self_rank: Rank,
    vnodes: usize,
    num_owned: i64,
    global_offsets: &[i64],
) -> Result<Vec<i64>> {
    let nonlocal_total: i64 = registry.iter().filter(|p| p.rank < self_rank).map(|p| p.bufcount).sum();
    let mut nonlocal_nodes = vec![-1i64; nonlocal_total as usize];

    let mut peers = Vec::new();
    for peer in registry.iter() {
        if peer.is_empty_peer() {
            continue;
        }
        if peer.rank > self_rank {
            let req = transport.irecv(peer.rank, TAG_QUERY, peer.bufcount as usize)?;
            peers.push(PeerExchange { rank: peer.rank, state: PeerState::QueryRecvPending, request: Some(req) });
        } else {
            let req = transport.isend(peer.rank, TAG_QUERY, peer.querypos.clone())?;
            peers.push(PeerExchange { rank: peer.rank, state: PeerState::QuerySendPending, request: Some(req) });
        }
    }
    for p in &peers {
        registry.get_mut(p.rank).unwrap().state = p.state;
    }

    while peers.iter().any(|p| p.state != PeerState::Done) {
        let pending: Vec<RequestId> = peers.iter().filter_map(|p| p.request).collect();
        if pending.is_empty() {
            break;
        }
        let completed = transport.waitsome(&pending)?;
        for (rid, completion) in completed {
            let pos = peers.iter().position(|p| p.request == Some(rid));
            let Some(pos) = pos else { continue };
            let rank = peers[pos].rank;

            match peers[pos].state {
                PeerState::QueryRecvPending => {
                    let Completion::Recv(payload) = completion else { continue };
                    let reply = reply_payload(table, vnodes, &payload);
                    let req = transport.isend(rank, TAG_REPLY, reply)?;
                    peers[pos].request = Some(req);
                    peers[pos].state = PeerState::ReplySendPending;
                }
                PeerState::ReplySendPending => {
                    peers[pos].request = None;
                    peers[pos].state = PeerState::Done;
                }
                PeerState::QuerySendPending => {
                    let bufcount = registry.get(rank).unwrap().bufcount as usize;
                    let req = transport.irecv(rank, TAG_REPLY, bufcount)?;
                    peers[pos].request = Some(req);
                    peers[pos].state = PeerState::ReplyRecvPending;
                }
                PeerState::ReplyRecvPending => {
                    let Completion::Recv(payload) = completion else { continue };
                    apply_reply(table, registry, rank, self_rank, num_owned, global_offsets, payload, &mut nonlocal_nodes);
                    peers[pos].request = None;
                    peers[pos].state = PeerState::Done;
                }
                PeerState::Done => {}
            }
            registry.get_mut(rank).unwrap().state = peers[pos].state;
        }
    }

    Ok(nonlocal_nodes)
}

/// §4.4 state 1: translate each `element*vnodes+slot` query entry to this
/// rank's own sorted owned index.
fn reply_payload(table: &NodeTable, vnodes: usize, payload: &[i64]) -> Vec<i64> {
    payload
        .iter()
        .map(|&entry| {
            let element = ElementIndex(entry / vnodes as i64);
            let slot = (entry % vnodes as i64) as usize;
            let cnode_idx = table.element_slot_vector(element)[slot];
            table.cnode(cnode_idx as usize).runid
        })
        .collect()
}

/// §4.4 state 4: sort this peer's queried cnodes by the owner's reported
/// sort position, stamp final local ids, and fill the nonlocal-node table.
fn apply_reply(
    table: &mut NodeTable,
    registry: &PeerRegistry,
    rank: Rank,
    _self_rank: Rank,
    num_owned: i64,
    global_offsets: &[i64],
    payload: Vec<i64>,
    nonlocal_nodes: &mut [i64],
) {
    let peer = registry.get(rank).unwrap();
    let mut pairs: Vec<(i64, usize)> = payload
        .into_iter()
        .zip(peer.sharedno.iter().map(|s| s.0 as usize))
        .collect();
    pairs.sort_by_key(|&(owner_local, _)| owner_local);

    let base = num_owned + peer.shacumul;
    for (position, (owner_local, cnode_raw)) in pairs.into_iter().enumerate() {
        let final_id = base + position as i64;
        table.cnodes_mut()[cnode_raw].runid = final_id;
        let global_id = global_offsets[rank.0 as usize] + owner_local;
        nonlocal_nodes[(peer.shacumul + position as i64) as usize] = global_id;
    }
}
