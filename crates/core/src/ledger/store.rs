//! The document store seam.
//!
//! The ledger core never talks to a database directly. Whatever owns a
//! [`LedgerSession`](super::session::LedgerSession) injects a store, which
//! keeps tests deterministic and lets the backend be swapped.

use async_trait::async_trait;
use thiserror::Error;
use haulbook_shared::types::CustomerId;

use super::customer::Customer;

/// Failures reported by a ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No customer with this id.
    #[error("customer {0} does not exist")]
    NotFound(CustomerId),

    /// The backend failed (network, server, serialization).
    #[error("{0}")]
    Backend(String),
}

/// Loads and replaces whole customer ledgers.
///
/// There is no per-entry update and no concurrency token: a replace
/// overwrites whatever was stored, so the last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns the customer with their ordered entry list.
    async fn fetch_customer_ledger(&self, id: CustomerId) -> Result<Customer, StoreError>;

    /// Replaces the stored entry list and `updated_at` with those of `customer`.
    async fn replace_customer_ledger(&self, customer: &Customer) -> Result<(), StoreError>;

    /// Checks that the backend answers. Stores with nothing to reach succeed.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
