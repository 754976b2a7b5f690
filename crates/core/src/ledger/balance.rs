//! Running balance calculations.
//!
//! A customer's balance at any line is the sum of credits minus the sum of
//! debits over that line and every line before it. Positive balances are
//! owed to the customer ("Cr."), negative ones are owed by the customer
//! ("Dr."), and zero is "NIL".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;

/// Which side of the account a balance sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    /// Credit balance (positive).
    Credit,
    /// Debit balance (negative).
    Debit,
    /// Settled account.
    Nil,
}

impl BalanceSide {
    /// Short label shown next to a balance.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Cr.",
            Self::Debit => "Dr.",
            Self::Nil => "NIL",
        }
    }
}

impl std::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A signed balance (credit minus debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    /// Zero balance.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Balance from credit and debit totals.
    #[must_use]
    pub fn from_totals(credit: Decimal, debit: Decimal) -> Self {
        Self(credit - debit)
    }

    /// The signed amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// The side the balance sits on.
    #[must_use]
    pub fn side(self) -> BalanceSide {
        if self.0.is_zero() {
            BalanceSide::Nil
        } else if self.0.is_sign_positive() {
            BalanceSide::Credit
        } else {
            BalanceSide::Debit
        }
    }

    /// Displayed magnitude; the sign is carried by [`Self::side`].
    #[must_use]
    pub fn magnitude(self) -> Decimal {
        self.0.abs()
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude().normalize(), self.side())
    }
}

/// A ledger line paired with the account position after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningBalanceRow<'a> {
    /// The ledger line.
    pub entry: &'a LedgerEntry,
    /// Sum of debits up to and including this line.
    pub debit_to_date: Decimal,
    /// Sum of credits up to and including this line.
    pub credit_to_date: Decimal,
    /// `credit_to_date - debit_to_date`.
    pub balance: Balance,
}

/// Computes the balance after every entry, in list order.
///
/// Single forward pass; row `i` equals the re-sum over `entries[..=i]`.
#[must_use]
pub fn compute_running_balance<'a, I>(entries: I) -> Vec<RunningBalanceRow<'a>>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut debit_to_date = Decimal::ZERO;
    let mut credit_to_date = Decimal::ZERO;

    entries
        .into_iter()
        .map(|entry| {
            debit_to_date += entry.debit;
            credit_to_date += entry.credit;
            RunningBalanceRow {
                entry,
                debit_to_date,
                credit_to_date,
                balance: Balance::from_totals(credit_to_date, debit_to_date),
            }
        })
        .collect()
}

/// Balance over the whole list; the figure shown on the totals line.
#[must_use]
pub fn grand_total<'a, I>(entries: I) -> Balance
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    entries
        .into_iter()
        .fold(Balance::ZERO, |acc, entry| Balance(acc.0 + entry.net_amount()))
}
