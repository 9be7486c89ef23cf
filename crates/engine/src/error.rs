//! The module contains the errors the ledger engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when a transaction input (or a tag parsed from
//!   user input) is malformed. Nothing is stored.
//! - [`Persistence`] returned when the storage port fails to write. The
//!   in-memory ledger keeps the change.
//! - [`AdvisoryUnavailable`] returned for every failure of the advisory
//!   service, whatever the cause.
//! - [`NotSignedIn`] returned when a session is opened (or used) without an
//!   identity.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Persistence`]: EngineError::Persistence
//!  [`AdvisoryUnavailable`]: EngineError::AdvisoryUnavailable
//!  [`NotSignedIn`]: EngineError::NotSignedIn
use thiserror::Error;

use crate::storage::StorageError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Persistence(String),
    #[error("Advisory unavailable: {0}")]
    AdvisoryUnavailable(String),
    #[error("No signed in identity")]
    NotSignedIn,
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a == b,
            (Self::AdvisoryUnavailable(a), Self::AdvisoryUnavailable(b)) => a == b,
            (Self::NotSignedIn, Self::NotSignedIn) => true,
            (Self::Config(a), Self::Config(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
