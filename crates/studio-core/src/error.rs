//! Error types for contract graph construction

use bitcoin::{OutPoint, Txid};
use thiserror::Error;

/// Result type alias for contract graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a contract graph
///
/// Every variant is fatal to the build that raised it: no partially
/// constructed graph or partially populated index escapes. Lookups never
/// produce these errors; absence is reported as `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed program: {0}")]
    MalformedProgram(String),

    #[error("Duplicate identity: {id} already maps to another transaction")]
    DuplicateIdentity { id: Txid },

    #[error("Invalid spend link: {spender} does not spend {outpoint}")]
    InvalidSpendLink { outpoint: OutPoint, spender: Txid },
}

impl Error {
    /// Malformed program error tagged with the offending program position
    pub fn malformed_at(position: usize, reason: impl std::fmt::Display) -> Self {
        Error::MalformedProgram(format!("transaction #{}: {}", position, reason))
    }
}
