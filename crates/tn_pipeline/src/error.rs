use thiserror::Error;

/// Unified pipeline error: every stage's failure funnels through here so
/// `number_forest` has one `Result` type (§7).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tn_core::CoreError),

    #[error(transparent)]
    Io(#[from] tn_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
