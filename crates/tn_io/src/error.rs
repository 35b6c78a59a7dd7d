use thiserror::Error;

/// Error taxonomy for the core's external collaborators (§7).
#[derive(Debug, Error)]
pub enum Error {
    /// Any non-success status from a collective or point-to-point
    /// transport primitive.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The number of bytes/items actually delivered differs from what was
    /// requested.
    #[error("count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// The total bytes to read in one call would exceed the transport's
    /// `int`-sized count.
    #[error("read size overflows the transport's int-sized count")]
    Overflow,

    /// A required input (e.g. a filename) was null/empty.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// A core-domain contract violation surfaced through I/O glue.
    #[error(transparent)]
    Core(#[from] tn_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
