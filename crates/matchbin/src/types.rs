use selector::Uid;
use thiserror::Error;

/// Errors produced by the bin.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BinError {
    /// The uid does not name a live entry.
    #[error("unknown {0}")]
    UnknownUid(Uid),
}
