//! Ledger entry domain types and field-level normalisation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use haulbook_shared::types::LedgerEntryId;

/// Date format accepted for raw date input.
const RAW_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single line of a customer's running account.
///
/// Entries carry no balance of their own; balances are always derived from
/// the position of the entry in its customer's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Stable identifier. Entries imported without one get an id on save.
    #[serde(default)]
    pub id: Option<LedgerEntryId>,
    /// Transaction date, blank while the line is being drafted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Free-text label.
    #[serde(default)]
    pub description: String,
    /// Truck or vehicle number.
    #[serde(default)]
    pub vehicle_reference: String,
    /// Carried weight.
    #[serde(default)]
    pub weight: Decimal,
    /// Rate applied to the load.
    #[serde(default)]
    pub rate: Decimal,
    /// Freight charge.
    #[serde(default)]
    pub freight: Decimal,
    /// Amount charged to the customer.
    #[serde(default)]
    pub debit: Decimal,
    /// Amount received from the customer.
    #[serde(default)]
    pub credit: Decimal,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a blank entry with a fresh id.
    #[must_use]
    pub fn blank(created_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(LedgerEntryId::new()),
            date: None,
            description: String::new(),
            vehicle_reference: String::new(),
            weight: Decimal::ZERO,
            rate: Decimal::ZERO,
            freight: Decimal::ZERO,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            created_at,
        }
    }

    /// Returns true if at least one field differs from its blank default.
    ///
    /// Blank lines may live in an editable list but are never persisted,
    /// summarised, or exported.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.date.is_some()
            || !self.description.is_empty()
            || !self.vehicle_reference.is_empty()
            || !self.weight.is_zero()
            || !self.rate.is_zero()
            || !self.freight.is_zero()
            || !self.debit.is_zero()
            || !self.credit.is_zero()
    }

    /// Net effect of this line on the running balance (credit minus debit).
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.credit - self.debit
    }

    /// Applies a single field edit.
    ///
    /// Returns false when the edit is rejected; a rejected edit leaves the
    /// entry untouched. Negative measures and amounts are always rejected.
    pub fn apply(&mut self, edit: EntryEdit) -> bool {
        match edit {
            EntryEdit::Date(date) => self.date = date,
            EntryEdit::Description(text) => self.description = text,
            EntryEdit::VehicleReference(text) => self.vehicle_reference = text,
            EntryEdit::Weight(value) => return set_non_negative(&mut self.weight, value),
            EntryEdit::Rate(value) => return set_non_negative(&mut self.rate, value),
            EntryEdit::Freight(value) => return set_non_negative(&mut self.freight, value),
            EntryEdit::Debit(value) => return set_non_negative(&mut self.debit, value),
            EntryEdit::Credit(value) => return set_non_negative(&mut self.credit, value),
        }
        true
    }

    /// Parses raw form input for `field` and applies it.
    ///
    /// Malformed input is ignored the same way a negative number is.
    pub fn apply_raw(&mut self, field: EntryField, raw: &str) -> bool {
        match EntryEdit::parse(field, raw) {
            Some(edit) => self.apply(edit),
            None => {
                tracing::debug!(?field, raw, "Ignoring malformed ledger input");
                false
            }
        }
    }
}

fn set_non_negative(slot: &mut Decimal, value: Decimal) -> bool {
    if value.is_sign_negative() && !value.is_zero() {
        tracing::debug!(%value, "Ignoring negative ledger amount");
        return false;
    }
    *slot = value;
    true
}

/// Editable fields of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    /// Transaction date.
    Date,
    /// Free-text label.
    Description,
    /// Vehicle number.
    VehicleReference,
    /// Carried weight.
    Weight,
    /// Rate.
    Rate,
    /// Freight charge.
    Freight,
    /// Debit amount.
    Debit,
    /// Credit amount.
    Credit,
}

/// A typed write to one field of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEdit {
    /// Set or clear the date.
    Date(Option<NaiveDate>),
    /// Replace the description.
    Description(String),
    /// Replace the vehicle number.
    VehicleReference(String),
    /// Set the weight.
    Weight(Decimal),
    /// Set the rate.
    Rate(Decimal),
    /// Set the freight.
    Freight(Decimal),
    /// Set the debit amount.
    Debit(Decimal),
    /// Set the credit amount.
    Credit(Decimal),
}

impl EntryEdit {
    /// Coerces raw text into an edit for `field`.
    ///
    /// An empty numeric input means zero and an empty date means blank.
    /// Returns `None` when the text cannot be read as the field's type.
    #[must_use]
    pub fn parse(field: EntryField, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match field {
            EntryField::Description => Some(Self::Description(raw.to_string())),
            EntryField::VehicleReference => Some(Self::VehicleReference(raw.to_string())),
            EntryField::Date if trimmed.is_empty() => Some(Self::Date(None)),
            EntryField::Date => NaiveDate::parse_from_str(trimmed, RAW_DATE_FORMAT)
                .ok()
                .map(|date| Self::Date(Some(date))),
            numeric => {
                let value = if trimmed.is_empty() {
                    Decimal::ZERO
                } else {
                    Decimal::from_str(trimmed).ok()?
                };
                Some(match numeric {
                    EntryField::Weight => Self::Weight(value),
                    EntryField::Rate => Self::Rate(value),
                    EntryField::Freight => Self::Freight(value),
                    EntryField::Debit => Self::Debit(value),
                    _ => Self::Credit(value),
                })
            }
        }
    }
}
