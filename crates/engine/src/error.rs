//! The module contains the errors the ledger can throw.
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
