//! Ledger error types.
//!
//! Input problems (negative or malformed values) are not errors here; they
//! are dropped at the entry and never surface. What remains are failures of
//! the remote store and of export, plus whole-list saves whose ids clash,
//! each scoped to the operation that triggered it.

use thiserror::Error;
use haulbook_shared::AppError;
use haulbook_shared::types::{CustomerId, LedgerEntryId};

use super::export::ExportError;
use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The customer does not exist in the store.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The entry is not part of the customer's ledger.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    /// The store rejected a save. Local edits are kept.
    #[error("Failed to save ledger: {0}")]
    PersistenceFailure(String),

    /// The store could not be read.
    #[error("Failed to load ledger: {0}")]
    LoadFailure(String),

    /// A replacement list used the same entry id twice.
    #[error("Duplicate ledger entry id: {0}")]
    DuplicateEntryId(LedgerEntryId),

    /// The statement could not be exported.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Maps a store failure during a read.
    #[must_use]
    pub fn from_load(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::CustomerNotFound(id),
            StoreError::Backend(msg) => Self::LoadFailure(msg),
        }
    }

    /// Maps a store failure during a write.
    #[must_use]
    pub fn from_save(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::CustomerNotFound(id),
            StoreError::Backend(msg) => Self::PersistenceFailure(msg),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            Self::LoadFailure(_) => "LOAD_FAILURE",
            Self::DuplicateEntryId(_) => "DUPLICATE_ENTRY_ID",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateEntryId(_) => 400,
            Self::CustomerNotFound(_) | Self::EntryNotFound(_) => 404,
            Self::PersistenceFailure(_) | Self::LoadFailure(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns true if triggering the same operation again may succeed.
    ///
    /// Nothing is retried automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_) | Self::LoadFailure(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CustomerNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::PersistenceFailure(_) | LedgerError::LoadFailure(_) => {
                Self::ExternalService(err.to_string())
            }
            LedgerError::DuplicateEntryId(_) => Self::Validation(err.to_string()),
            LedgerError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<ExportError> for LedgerError {
    fn from(err: ExportError) -> Self {
        Self::Internal(format!("export failed: {err}"))
    }
}
