//! Core business logic for Haulbook.
//!
//! This crate contains the ledger rules with no web or database dependencies.
//! Entries, balances, summaries, export, and the edit session live here;
//! storage is reached only through the [`ledger::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `ledger` - Customer running accounts
//! - `format` - Display formatting for dates and amounts

pub mod format;
pub mod ledger;
