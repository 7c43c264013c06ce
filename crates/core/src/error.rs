//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// All four kinds are terminal from the ledger's perspective: no retries,
/// no internal recovery. Failures happen before any field is written, so a
/// failed operation leaves no partial mutation behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or incomplete input (caller bug).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unique-key collision, or a terminal-state rejection (e.g. transferring
    /// a retired credit). The caller must pick a new identifier or re-check
    /// the record's state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not the recorded owner of the credit.
    #[error("unauthorized")]
    Unauthorized,
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
