//! Customer statement: the rows, totals line, and summary shown together.

use super::balance::{Balance, RunningBalanceRow, compute_running_balance, grand_total};
use super::customer::Customer;
use super::summary::{LedgerSummary, summarize};

/// Everything needed to render or export a customer's ledger.
///
/// Built from significant entries only. The grand total is computed
/// alongside the rows instead of living in the list as a fake entry.
#[derive(Debug, Clone)]
pub struct LedgerStatement<'a> {
    /// The customer the statement belongs to.
    pub customer: &'a Customer,
    /// Significant entries with their running balance.
    pub rows: Vec<RunningBalanceRow<'a>>,
    /// Balance over all rows.
    pub grand_total: Balance,
    /// Top-line figures.
    pub summary: LedgerSummary,
}

impl<'a> LedgerStatement<'a> {
    /// Builds the statement for `customer`.
    #[must_use]
    pub fn build(customer: &'a Customer) -> Self {
        let significant = || customer.entries.iter().filter(|e| e.is_significant());

        Self {
            customer,
            rows: compute_running_balance(significant()),
            grand_total: grand_total(significant()),
            summary: summarize(&customer.entries),
        }
    }
}
