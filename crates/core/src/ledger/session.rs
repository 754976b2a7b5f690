//! Reconciliation between in-memory edits and the ledger store.
//!
//! A session owns one customer's ledger. Field edits only touch memory;
//! the whole list is written back when a field is committed, when the user
//! asks for a sync, and shortly after an entry is removed. Saves are not
//! serialised against each other and a failed save is never rolled back:
//! the next successful save carries every edit made so far.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use haulbook_shared::types::{CustomerId, LedgerEntryId};

use super::customer::Customer;
use super::entry::{EntryEdit, EntryField, LedgerEntry};
use super::error::LedgerError;
use super::statement::LedgerStatement;
use super::store::LedgerStore;
use super::summary::{LedgerSummary, summarize};

/// Default pause between removing an entry and saving the remaining list.
pub const DEFAULT_DELETE_SAVE_DELAY: Duration = Duration::from_millis(1000);

/// An open customer ledger.
pub struct LedgerSession<S: LedgerStore + ?Sized> {
    store: Arc<S>,
    customer: Customer,
    delete_save_delay: Duration,
    last_updated: Arc<watch::Sender<Option<DateTime<Utc>>>>,
}

impl<S: LedgerStore + ?Sized + 'static> LedgerSession<S> {
    /// Loads a customer's ledger from `store`.
    ///
    /// # Errors
    ///
    /// `CustomerNotFound` if the store has no such customer, `LoadFailure`
    /// if the read itself failed.
    pub async fn open(store: Arc<S>, customer_id: CustomerId) -> Result<Self, LedgerError> {
        let mut customer = store
            .fetch_customer_ledger(customer_id)
            .await
            .map_err(|err| {
                warn!(customer_id = %customer_id, error = %err, "Failed to load customer ledger");
                LedgerError::from_load(err)
            })?;

        info!(
            customer_id = %customer_id,
            entries = customer.entries.len(),
            "Opened customer ledger"
        );

        let assigned = customer.assign_missing_ids();
        if assigned > 0 {
            debug!(customer_id = %customer_id, assigned, "Assigned ids to stored ledger entries");
        }

        let (last_updated, _) = watch::channel(customer.updated_at);
        Ok(Self {
            store,
            customer,
            delete_save_delay: DEFAULT_DELETE_SAVE_DELAY,
            last_updated: Arc::new(last_updated),
        })
    }

    /// Sets the pause used before saving after a removal.
    #[must_use]
    pub fn with_delete_save_delay(mut self, delay: Duration) -> Self {
        self.delete_save_delay = delay;
        self
    }

    /// The customer as currently edited.
    #[must_use]
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Entries in display order, blank drafts included.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.customer.entries
    }

    /// Rows with running balances, totals line, and summary.
    #[must_use]
    pub fn statement(&self) -> LedgerStatement<'_> {
        LedgerStatement::build(&self.customer)
    }

    /// Summary of the current list.
    #[must_use]
    pub fn summary(&self) -> LedgerSummary {
        summarize(&self.customer.entries)
    }

    /// Time of the most recent successful save, including delayed ones.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self.last_updated.borrow()
    }

    /// Notifies on every successful save.
    #[must_use]
    pub fn subscribe_last_updated(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_updated.subscribe()
    }

    /// Appends a blank entry. Nothing is saved until it has content.
    pub fn add_entry(&mut self) -> LedgerEntryId {
        self.customer.push_blank_entry(Utc::now())
    }

    /// Applies a typed edit to the entry at `index` in memory.
    pub fn edit(&mut self, index: usize, edit: EntryEdit) -> bool {
        self.customer.edit_entry(index, edit)
    }

    /// Applies raw form input to the entry at `index` in memory.
    pub fn edit_raw(&mut self, index: usize, field: EntryField, raw: &str) -> bool {
        self.customer.edit_entry_raw(index, field, raw)
    }

    /// Replaces the in-memory list wholesale, keeping the given order.
    ///
    /// Entries without an id get one. The list is left as it was if two
    /// entries share an id.
    ///
    /// # Errors
    ///
    /// `DuplicateEntryId` if an id appears more than once.
    pub fn replace_entries(&mut self, entries: Vec<LedgerEntry>) -> Result<(), LedgerError> {
        let previous = std::mem::replace(&mut self.customer.entries, entries);
        if let Some(id) = self.customer.duplicate_entry_id() {
            self.customer.entries = previous;
            return Err(LedgerError::DuplicateEntryId(id));
        }
        self.customer.assign_missing_ids();
        Ok(())
    }

    /// Saves after an edited field loses focus.
    ///
    /// # Errors
    ///
    /// See [`Self::save`].
    pub async fn commit_field(&mut self) -> Result<(), LedgerError> {
        self.save().await
    }

    /// Saves on explicit user request.
    ///
    /// # Errors
    ///
    /// See [`Self::save`].
    pub async fn sync(&mut self) -> Result<(), LedgerError> {
        self.save().await
    }

    /// Removes an entry and schedules a save of what remains.
    ///
    /// The save runs on a spawned task after the configured delay. Dropping
    /// the returned handle detaches the task; it is never cancelled. Must be
    /// called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` if no entry has `id`; nothing is scheduled then.
    pub fn remove_entry(
        &mut self,
        id: LedgerEntryId,
    ) -> Result<JoinHandle<Result<(), LedgerError>>, LedgerError> {
        if !self.customer.remove_entry(id) {
            return Err(LedgerError::EntryNotFound(id));
        }
        debug!(customer_id = %self.customer.id, entry_id = %id, "Removed ledger entry");

        let store = Arc::clone(&self.store);
        let last_updated = Arc::clone(&self.last_updated);
        let snapshot = self.customer.clone();
        let delay = self.delete_save_delay;

        Ok(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            persist(store.as_ref(), &snapshot, &last_updated)
                .await
                .map(|_| ())
        }))
    }

    /// Writes the current list to the store.
    ///
    /// Blank entries are dropped and the
    /// customer's `updated_at` is stamped. On failure local state is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the store rejected the write.
    pub async fn save(&mut self) -> Result<(), LedgerError> {
        let stamped = persist(self.store.as_ref(), &self.customer, &self.last_updated).await?;
        self.customer.updated_at = Some(stamped);
        Ok(())
    }
}

async fn persist<S: LedgerStore + ?Sized>(
    store: &S,
    customer: &Customer,
    last_updated: &watch::Sender<Option<DateTime<Utc>>>,
) -> Result<DateTime<Utc>, LedgerError> {
    let now = Utc::now();
    let outgoing = customer.persistable(now);

    match store.replace_customer_ledger(&outgoing).await {
        Ok(()) => {
            last_updated.send_replace(Some(now));
            info!(
                customer_id = %customer.id,
                entries = outgoing.entries.len(),
                "Saved customer ledger"
            );
            Ok(now)
        }
        Err(err) => {
            error!(customer_id = %customer.id, error = %err, "Failed to save customer ledger");
            Err(LedgerError::from_save(err))
        }
    }
}
