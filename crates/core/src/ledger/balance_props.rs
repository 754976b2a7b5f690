//! Property-based tests for running balances and ledger summaries.
//!
//! - Running balance equals a fresh re-sum at every row
//! - Grand total equals the last running balance
//! - Negative amounts never reach an entry
//! - Summary is independent of order and of non-monetary fields

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{Balance, compute_running_balance, grand_total};
use super::entry::{EntryEdit, LedgerEntry};
use super::summary::summarize;

/// Strategy to generate non-negative amounts (0.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate negative amounts (-100,000.00 to -0.01).
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn created_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Strategy to generate an entry with arbitrary amounts.
fn entry_strategy() -> impl Strategy<Value = LedgerEntry> {
    (amount(), amount(), amount(), "[a-z ]{0,12}").prop_map(|(debit, credit, weight, text)| {
        let mut entry = LedgerEntry::blank(created_at());
        entry.debit = debit;
        entry.credit = credit;
        entry.weight = weight;
        entry.description = text;
        entry
    })
}

fn entries_strategy() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec(entry_strategy(), 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_running_balance_matches_resum(entries in entries_strategy()) {
        let rows = compute_running_balance(&entries);
        prop_assert_eq!(rows.len(), entries.len());

        for (i, row) in rows.iter().enumerate() {
            let credit: Decimal = entries[..=i].iter().map(|e| e.credit).sum();
            let debit: Decimal = entries[..=i].iter().map(|e| e.debit).sum();
            prop_assert_eq!(row.credit_to_date, credit);
            prop_assert_eq!(row.debit_to_date, debit);
            prop_assert_eq!(row.balance, Balance(credit - debit));
        }
    }

    #[test]
    fn prop_grand_total_is_last_row(entries in entries_strategy()) {
        let rows = compute_running_balance(&entries);
        let expected = rows.last().map_or(Balance::ZERO, |row| row.balance);
        prop_assert_eq!(grand_total(&entries), expected);
    }

    #[test]
    fn prop_negative_amount_is_rejected(
        mut entry in entry_strategy(),
        value in negative_amount(),
        field in 0usize..5,
    ) {
        let before = entry.clone();
        let edit = match field {
            0 => EntryEdit::Weight(value),
            1 => EntryEdit::Rate(value),
            2 => EntryEdit::Freight(value),
            3 => EntryEdit::Debit(value),
            _ => EntryEdit::Credit(value),
        };

        prop_assert!(!entry.apply(edit.clone()));
        prop_assert!(!entry.apply(edit));
        prop_assert_eq!(entry, before);
    }

    #[test]
    fn prop_blank_entry_is_not_significant(value in amount()) {
        let mut entry = LedgerEntry::blank(created_at());
        prop_assert!(!entry.is_significant());

        entry.rate = value;
        prop_assert_eq!(entry.is_significant(), !value.is_zero());
    }

    #[test]
    fn prop_summary_ignores_order_and_text(entries in entries_strategy()) {
        let summary = summarize(&entries);
        prop_assert_eq!(summarize(&entries), summary);

        let mut reversed = entries.clone();
        reversed.reverse();
        let reversed_summary = summarize(&reversed);
        prop_assert_eq!(reversed_summary.total_debit, summary.total_debit);
        prop_assert_eq!(reversed_summary.total_credit, summary.total_credit);
        prop_assert_eq!(reversed_summary.total_weight, summary.total_weight);
        prop_assert_eq!(reversed_summary.net_balance, summary.net_balance);

        let mut relabelled = entries;
        for entry in &mut relabelled {
            entry.vehicle_reference = "LHR-1".to_string();
        }
        let relabelled_summary = summarize(&relabelled);
        prop_assert_eq!(relabelled_summary.total_amount, summary.total_amount);
        prop_assert_eq!(relabelled_summary.net_balance, summary.net_balance);
    }
}
