//! tn_algo — the pure numbering algorithm: owner election, local sort and
//! offset computation, peer-registry construction, sharer-list assembly,
//! and per-element configuration/face-code finalization.
//!
//! Depends only on `tn_core`. Nothing here knows about a transport or a
//! forest; those live in `tn_pipeline`, which drives this crate's types
//! from `tn_io`'s callback and transport contracts.

pub mod config;
pub mod node_table;
pub mod owner;
pub mod peer;
pub mod sharer;
pub mod sort;

pub use config::{finalize_element_nodes, resolve_config_byte, FaceCode, DIM};
pub use node_table::NodeTable;
pub use owner::elect_owner;
pub use peer::PeerRegistry;
pub use sharer::SharerTable;
pub use sort::{partition_and_sort, SortOutcome};
