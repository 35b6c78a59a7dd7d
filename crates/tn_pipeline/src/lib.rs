//! tn_pipeline — orchestration of the tnodes engine.
//!
//! Glues `tn_algo`'s pure algorithm to `tn_io`'s traversal and transport
//! contracts: the [`traversal::TraversalAdapter`] that drives node
//! registration from forest callbacks, the [`exchange`] engine that runs
//! the non-blocking `Waitsome` loop, and the single entry point
//! [`numbering::number_forest`] that wires every stage together (§2).

pub mod error;
pub mod exchange;
pub mod numbering;
pub mod traversal;

pub use error::{Error, Result};
pub use numbering::{number_forest, ElementRecord, NumberingResult};
pub use traversal::TraversalAdapter;
