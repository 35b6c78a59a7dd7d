//! tn_io — external interfaces for the tnodes engine (§6).
//!
//! This crate owns the contracts between the core numbering algorithm and
//! the outside world: the forest/ghost traversal callbacks it expects to be
//! driven by, the MPI-style [`transport::Transport`] abstraction (with a
//! deterministic single-process [`transport::LoopbackTransport`] for tests
//! and an optional real-MPI backend behind the `mpi` feature), and the two
//! auxiliary binary readers named informatively in the interface section.

pub mod error;
pub mod forest;
pub mod ghost;
pub mod gshhg_io;
pub mod sphere_io;
pub mod transport;

#[cfg(feature = "mpi")]
pub mod mpi_transport;

pub use error::{Error, Result};
pub use forest::{CornerInfo, CornerSide, FaceInfo, FaceSide, FaceSides, ForestVisitor, Quadrant, VolumeInfo};
pub use ghost::{GhostLayer, VecGhostLayer};
pub use gshhg_io::{read_gshhg_polygons, wrap_longitude_deg, GshhgPolygon};
pub use sphere_io::{read_sphere_segments, SphereSegment, SEGMENT_RECORD_BYTES};
pub use transport::{broadcast_worst_status, Completion, LoopbackNetwork, LoopbackTransport, RequestId, Tag, Transport};

#[cfg(feature = "mpi")]
pub use mpi_transport::MpiTransport;
