//! Peer records (§3 "Peer record", §4.4).

use crate::ids::{LocalNodeIndex, Rank};

/// The four-state exchange machine of §4.4, numbered to match the spec
/// table; `Done` is the spec's state 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PeerState {
    /// State 0: this peer requires no further action.
    Done,
    /// State 1: an `Irecv` for a query from a higher-rank peer is posted.
    QueryRecvPending,
    /// State 2: the reply `Isend` to a higher-rank peer is posted.
    ReplySendPending,
    /// State 3: the query `Isend` to a lower-rank peer is posted.
    QuerySendPending,
    /// State 4: an `Irecv` for the reply from a lower-rank peer is posted.
    ReplyRecvPending,
}

impl PeerState {
    /// Matches the spec's numeric state codes for logging/debugging.
    pub fn code(self) -> u8 {
        match self {
            PeerState::Done => 0,
            PeerState::QueryRecvPending => 1,
            PeerState::ReplySendPending => 2,
            PeerState::QuerySendPending => 3,
            PeerState::ReplyRecvPending => 4,
        }
    }
}

/// A record of a remote rank with which any node is shared (§3).
///
/// A peer plays exactly one of two roles, decided once by rank comparison
/// and never mixed: peers with `rank < self` are *queried* (this rank
/// sends `querypos`/`sharedno` payloads and awaits a reply); peers with
/// `rank > self` are *repliers* (this rank only counts how many replies
/// it owes in `bufcount`, since the reply payload is derived from this
/// rank's own sorted owned nodes and needs no stored request payload).
#[derive(Clone, Debug)]
pub struct PeerRecord {
    pub rank: Rank,
    pub state: PeerState,
    /// Assigned slot in the sharer-list array.
    pub sharer_index: usize,
    /// Count of queries in buffer: for a queried (lower-rank) peer this is
    /// `querypos.len()`; for a replied-to (higher-rank) peer it is a pure
    /// counter incremented once per shared-owned cnode with that peer.
    pub bufcount: i64,
    /// Count of passively shared nodes: nodes this rank sees but neither
    /// owns nor queries, because some other rank owns them.
    pub passive: u32,
    /// Cumulative count of shared-not-owned nodes placed before this peer
    /// (used to compute offsets into the non-local table).
    pub shacumul: i64,
    /// `element * vnodes + slot` identifying the owner's slot, one entry
    /// per query. Populated only when `rank < self`.
    pub querypos: Vec<i64>,
    /// The local cnode index that asked for each entry of `querypos`,
    /// parallel to it.
    pub sharedno: Vec<LocalNodeIndex>,
}

impl PeerRecord {
    pub fn new(rank: Rank, sharer_index: usize) -> Self {
        Self {
            rank,
            state: PeerState::Done,
            sharer_index,
            bufcount: 0,
            passive: 0,
            shacumul: 0,
            querypos: Vec::new(),
            sharedno: Vec::new(),
        }
    }

    /// Queue an outgoing query toward a peer with `rank < self`.
    pub fn push_query(&mut self, querypos: i64, sharedno: LocalNodeIndex) {
        self.querypos.push(querypos);
        self.sharedno.push(sharedno);
        self.bufcount = self.querypos.len() as i64;
    }

    /// Count one more reply this rank owes a peer with `rank > self`.
    pub fn count_reply(&mut self) {
        self.bufcount += 1;
    }

    pub fn is_empty_peer(&self) -> bool {
        self.bufcount == 0 && self.passive == 0
    }
}
