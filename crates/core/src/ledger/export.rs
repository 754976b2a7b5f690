//! Flat statement rows for spreadsheet export.
//!
//! Export only reshapes statement rows. Balances come from the running
//! balance calculator; nothing here adds anything up.

use std::io::Write;

use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::statement::LedgerStatement;
use crate::format::{DateFormat, format_date};

/// Column headers, in order.
pub const EXPORT_HEADERS: [&str; 11] = [
    "Date",
    "Customer Name",
    "Phone No",
    "Description",
    "Vehicle",
    "Weight",
    "Rate",
    "Freight",
    "Debit",
    "Credit",
    "Balance",
];

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The destination could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One ledger line as a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// ISO date, empty if blank.
    pub date: String,
    /// Customer display name.
    pub customer_name: String,
    /// Phone numbers joined with ", ".
    pub phone_numbers: String,
    /// Line description.
    pub description: String,
    /// Vehicle number.
    pub vehicle: String,
    /// Weight.
    pub weight: Decimal,
    /// Rate.
    pub rate: Decimal,
    /// Freight.
    pub freight: Decimal,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Signed running balance and its side, e.g. `-50 - Dr.`.
    pub balance: String,
}

/// Flattens a statement into export rows.
#[must_use]
pub fn export_rows(statement: &LedgerStatement<'_>) -> Vec<ExportRow> {
    let customer = statement.customer;
    let phone_numbers = customer.phone_numbers.join(", ");

    statement
        .rows
        .iter()
        .map(|row| {
            let entry = row.entry;
            ExportRow {
                date: entry.date.map(|d| d.to_string()).unwrap_or_default(),
                customer_name: customer.name.clone(),
                phone_numbers: phone_numbers.clone(),
                description: entry.description.clone(),
                vehicle: entry.vehicle_reference.clone(),
                weight: entry.weight.normalize(),
                rate: entry.rate.normalize(),
                freight: entry.freight.normalize(),
                debit: entry.debit.normalize(),
                credit: entry.credit.normalize(),
                balance: format!(
                    "{} - {}",
                    row.balance.amount().normalize(),
                    row.balance.side()
                ),
            }
        })
        .collect()
}

/// Writes rows as CSV, headers first even when there are no rows.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Download name for a customer's export, e.g. `Customer-Ali-Orders-5-3-2024.csv`.
#[must_use]
pub fn export_file_name(customer_name: &str, today: NaiveDate) -> String {
    format!(
        "Customer-{customer_name}-Orders-{}.csv",
        format_date(today, DateFormat::Dashed)
    )
}
