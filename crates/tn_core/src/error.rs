use thiserror::Error;

/// Contract violations and domain errors raised by the core data model.
///
/// These are never transport-related (see `tn_io::Error` for that); they
/// signal either a caller mistake (registering an always-owned slot from a
/// ghost) or an out-of-range configuration index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A ghost-side registration targeted a slot that must only ever be
    /// produced by a single process (§4.2, §9 "always owned" slot set).
    #[error("slot {slot} is always-owned and cannot be registered from a ghost")]
    AlwaysOwnedViolation { slot: u8 },

    /// A configuration byte did not resolve to one of the 18 table rows.
    #[error("configuration byte {0} does not map to a known triangulation row")]
    UnknownConfiguration(u8),

    /// An internal invariant was violated (owner pointer desync, duplicate
    /// rank contributor, etc.) — always a bug, never a transport fault.
    #[error("contract violation: {0}")]
    ContractViolation(&'static str),
}

pub type CoreResult<T> = Result<T, CoreError>;
