//! tn_core — core types for the tnodes parallel node-numbering algorithm.
//!
//! This crate is I/O-free and transport-free: it defines the slot layout,
//! the node-under-construction (`cnode`) data structure with its owner
//! election invariant, the peer/sharer record shapes, and the 18-row
//! triangulation configuration tables that the rest of the workspace
//! builds on.

pub mod cnode;
pub mod error;
pub mod ids;
pub mod peer;
pub mod sharer;
pub mod slots;
pub mod tables;

pub use cnode::{CNode, Contributor};
pub use error::{CoreError, CoreResult};
pub use ids::{ContributorKey, ElementIndex, GlobalNodeId, LocalNodeIndex, Rank, Slot};
pub use peer::PeerRecord;
pub use sharer::Sharer;
pub use slots::{Bcon, ConfigBits};

/// Numbering configuration threaded through the pipeline instead of
/// globals (`full_style`, `with_faces` from §4.1/§4.6).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NumberingConfig {
    /// Every element uses full subdivision regardless of child id.
    pub full_style: bool,
    /// Whether the 16 optional face slots participate at all.
    pub with_faces: bool,
}

impl NumberingConfig {
    pub fn new(full_style: bool, with_faces: bool) -> Self {
        Self { full_style, with_faces }
    }

    pub fn vnodes(&self) -> usize {
        slots::vnodes(self.with_faces)
    }
}
