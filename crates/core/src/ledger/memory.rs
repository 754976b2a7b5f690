//! In-process ledger store.

use async_trait::async_trait;
use dashmap::DashMap;
use haulbook_shared::types::CustomerId;

use super::customer::Customer;
use super::store::{LedgerStore, StoreError};

/// A [`LedgerStore`] backed by a concurrent map.
///
/// Used for local development and by tests that need a real store rather
/// than a mock. Same semantics as the database store: whole-list replace,
/// last write wins.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    customers: DashMap<CustomerId, Customer>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites a customer record.
    pub fn insert(&self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    /// Returns a copy of the stored record.
    #[must_use]
    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(&id).map(|c| c.value().clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn fetch_customer_ledger(&self, id: CustomerId) -> Result<Customer, StoreError> {
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    async fn replace_customer_ledger(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut stored = self
            .customers
            .get_mut(&customer.id)
            .ok_or(StoreError::NotFound(customer.id))?;
        stored.entries.clone_from(&customer.entries);
        stored.updated_at = customer.updated_at;
        Ok(())
    }
}
