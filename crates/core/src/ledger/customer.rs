//! Customer aggregate owning an ordered ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use haulbook_shared::types::{CustomerId, LedgerEntryId};

use std::collections::HashSet;

use super::entry::{EntryEdit, EntryField, LedgerEntry};

/// A customer and their running account.
///
/// `entries` is kept in display order, which is the only order that
/// running balances are defined over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,
    /// Customer number shown to staff.
    #[serde(default)]
    pub code: String,
    /// Display name.
    pub name: String,
    /// Contact numbers.
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Ledger lines in canonical order.
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    /// Time of the last successful ledger save.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Creates a customer with an empty ledger.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CustomerId::new(),
            code: String::new(),
            name: name.into(),
            phone_numbers: Vec::new(),
            address: String::new(),
            entries: Vec::new(),
            updated_at: None,
        }
    }

    /// Appends a blank line after the last real entry and returns its id.
    pub fn push_blank_entry(&mut self, now: DateTime<Utc>) -> LedgerEntryId {
        let id = LedgerEntryId::new();
        self.entries.push(LedgerEntry {
            id: Some(id),
            ..LedgerEntry::blank(now)
        });
        id
    }

    /// Applies an edit to the entry at `index`.
    ///
    /// Returns false if there is no such entry or the edit was rejected.
    pub fn edit_entry(&mut self, index: usize, edit: EntryEdit) -> bool {
        self.entries
            .get_mut(index)
            .is_some_and(|entry| entry.apply(edit))
    }

    /// Applies raw form input for `field` to the entry at `index`.
    ///
    /// Returns false if there is no such entry or the input was ignored.
    pub fn edit_entry_raw(&mut self, index: usize, field: EntryField, raw: &str) -> bool {
        self.entries
            .get_mut(index)
            .is_some_and(|entry| entry.apply_raw(field, raw))
    }

    /// Gives every entry without an id a fresh one, in place.
    ///
    /// Returns how many ids were assigned. Once assigned an id is kept for
    /// the life of the entry.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for entry in self.entries.iter_mut().filter(|e| e.id.is_none()) {
            entry.id = Some(LedgerEntryId::new());
            assigned += 1;
        }
        assigned
    }

    /// Returns the first id carried by more than one entry.
    #[must_use]
    pub fn duplicate_entry_id(&self) -> Option<LedgerEntryId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .filter_map(|entry| entry.id)
            .find(|id| !seen.insert(*id))
    }

    /// Removes the entry with `id`, keeping the order of the rest.
    ///
    /// Returns false if no entry had that id.
    pub fn remove_entry(&mut self, id: LedgerEntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != Some(id));
        self.entries.len() != before
    }

    /// The list as it should be written to the store, blank lines dropped.
    ///
    /// Ids are copied as they are; call [`Self::assign_missing_ids`] first.
    #[must_use]
    pub fn persistable_entries(&self) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_significant())
            .cloned()
            .collect()
    }

    /// A copy of this customer ready for a whole-list replace.
    #[must_use]
    pub fn persistable(&self, updated_at: DateTime<Utc>) -> Self {
        Self {
            entries: self.persistable_entries(),
            updated_at: Some(updated_at),
            ..self.clone()
        }
    }
}
