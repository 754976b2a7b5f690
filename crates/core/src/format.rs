//! Display formatting for dates, amounts, and save times.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Calendar date layouts used on screen and in file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `D-M-YYYY`
    #[default]
    Dashed,
    /// `D/M/YYYY`
    Slashed,
    /// `D MMM YYYY`
    Spelled,
}

/// Formats a date without zero padding, e.g. `5-3-2024`.
#[must_use]
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    let (day, month, year) = (date.day(), date.month(), date.year());
    match format {
        DateFormat::Dashed => format!("{day}-{month}-{year}"),
        DateFormat::Slashed => format!("{day}/{month}/{year}"),
        DateFormat::Spelled => format!("{day} {} {year}", date.format("%b")),
    }
}

/// Formats an amount with thousands separators and at most two decimals.
///
/// `1234567.456` becomes `1,234,567.46`; `1500.10` becomes `1,500.1`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Describes how long ago a ledger was last saved.
#[must_use]
pub fn relative_time(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(then) = then else {
        return "A while ago".to_string();
    };

    let secs = (now - then).num_seconds();
    if secs < SECS_PER_MINUTE {
        "Just now".to_string()
    } else if secs < SECS_PER_HOUR {
        plural(secs / SECS_PER_MINUTE, "minute")
    } else if secs < SECS_PER_DAY {
        plural(secs / SECS_PER_HOUR, "hour")
    } else if secs < 2 * SECS_PER_DAY {
        "Yesterday".to_string()
    } else if secs < 7 * SECS_PER_DAY {
        plural(secs / SECS_PER_DAY, "day")
    } else {
        format_date(then.date_naive(), DateFormat::Spelled)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
