//! Top-line ledger figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::Balance;
use super::entry::LedgerEntry;

/// Totals derived from a customer's entry list. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Number of significant entries.
    pub total_entries: usize,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// `total_credit - total_debit`.
    pub net_balance: Balance,
    /// `total_debit + total_credit`.
    pub total_amount: Decimal,
    /// Sum of carried weight.
    pub total_weight: Decimal,
}

/// Folds the significant entries of `entries` into a summary.
///
/// Always recomputed from the full list so the figures cannot drift from
/// the lines they describe.
#[must_use]
pub fn summarize(entries: &[LedgerEntry]) -> LedgerSummary {
    let mut summary = entries
        .iter()
        .filter(|entry| entry.is_significant())
        .fold(LedgerSummary::default(), |mut acc, entry| {
            acc.total_entries += 1;
            acc.total_debit += entry.debit;
            acc.total_credit += entry.credit;
            acc.total_weight += entry.weight;
            acc
        });

    summary.net_balance = Balance::from_totals(summary.total_credit, summary.total_debit);
    summary.total_amount = summary.total_debit + summary.total_credit;
    summary
}
