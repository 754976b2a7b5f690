//! Customer running accounts.
//!
//! This module implements the ledger side of the application:
//! - Ledger entries and field-level edits
//! - Running balance and summary calculations
//! - Statements and CSV export
//! - The store seam and an in-memory store
//! - The edit session that saves changes

pub mod balance;
pub mod customer;
pub mod entry;
pub mod error;
pub mod export;
pub mod memory;
pub mod session;
pub mod statement;
pub mod store;
pub mod summary;

#[cfg(test)]
mod balance_props;

pub use balance::{Balance, BalanceSide, RunningBalanceRow, compute_running_balance, grand_total};
pub use customer::Customer;
pub use entry::{EntryEdit, EntryField, LedgerEntry};
pub use error::LedgerError;
pub use export::{EXPORT_HEADERS, ExportError, ExportRow, export_file_name, export_rows, write_csv};
pub use memory::InMemoryLedgerStore;
pub use session::{DEFAULT_DELETE_SAVE_DELAY, LedgerSession};
pub use statement::LedgerStatement;
pub use store::{LedgerStore, StoreError};
pub use summary::{LedgerSummary, summarize};
