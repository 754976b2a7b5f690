//! Customer ledger routes.
//!
//! Every request opens a fresh session against the shared store, so the
//! HTTP layer holds no ledger state between calls.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::{DateTime, NaiveDate, Utc};
use haulbook_core::format::{format_amount, relative_time};
use haulbook_core::ledger::{
    Balance, BalanceSide, EntryEdit, LedgerEntry, LedgerError, LedgerSession, LedgerStatement,
    LedgerStore, LedgerSummary, export_file_name, export_rows, write_csv,
};
use haulbook_shared::types::{CustomerId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

type Session = LedgerSession<dyn LedgerStore>;

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers/{customer_id}/ledger",
            get(get_ledger).put(save_ledger),
        )
        .route(
            "/customers/{customer_id}/ledger/entries/{entry_id}",
            delete(delete_entry),
        )
        .route(
            "/customers/{customer_id}/ledger/export.csv",
            get(export_ledger),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a whole-list save.
#[derive(Debug, Deserialize)]
pub struct SaveLedgerRequest {
    /// The full list in display order.
    pub entries: Vec<EntryInput>,
}

/// One ledger line as sent by a client.
///
/// Lines are matched to stored ones by `id`. A negative number is ignored
/// and the stored value (or zero for a new line) is kept. An id may appear
/// only once per request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryInput {
    /// Existing entry id; new lines may leave it out.
    pub id: Option<Uuid>,
    /// Transaction date.
    pub date: Option<NaiveDate>,
    /// Free-text label.
    pub description: String,
    /// Vehicle number.
    pub vehicle_reference: String,
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
}

impl EntryInput {
    /// Builds the entry to store, starting from the stored line with the same id.
    fn into_entry(self, prior: Option<&LedgerEntry>, now: DateTime<Utc>) -> LedgerEntry {
        let mut entry = prior.cloned().unwrap_or_else(|| LedgerEntry::blank(now));
        if let Some(id) = self.id {
            entry.id = Some(LedgerEntryId::from_uuid(id));
        }

        let edits = [
            EntryEdit::Date(self.date),
            EntryEdit::Description(self.description),
            EntryEdit::VehicleReference(self.vehicle_reference),
            EntryEdit::Weight(self.weight),
            EntryEdit::Rate(self.rate),
            EntryEdit::Freight(self.freight),
            EntryEdit::Debit(self.debit),
            EntryEdit::Credit(self.credit),
        ];
        for edit in edits {
            entry.apply(edit);
        }
        entry
    }
}

/// A balance with its side and display text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    /// Signed amount (credit minus debit).
    pub amount: Decimal,
    /// Which side the balance sits on.
    pub side: BalanceSide,
    /// Magnitude and label, e.g. `1,200.5 Dr.`.
    pub display: String,
}

impl From<Balance> for BalanceView {
    fn from(balance: Balance) -> Self {
        Self {
            amount: balance.amount(),
            side: balance.side(),
            display: format!("{} {}", format_amount(balance.magnitude()), balance.side()),
        }
    }
}

/// A statement row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRowResponse {
    /// The stored line.
    #[serde(flatten)]
    pub entry: LedgerEntry,
    /// Sum of debits so far.
    pub debit_to_date: Decimal,
    /// Sum of credits so far.
    pub credit_to_date: Decimal,
    /// Balance after this line.
    pub balance: BalanceView,
}

/// Response for a customer's ledger.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    /// Customer ID.
    pub customer_id: CustomerId,
    /// Customer name.
    pub customer_name: String,
    /// Contact numbers.
    pub phone_numbers: Vec<String>,
    /// Significant entries with running balances.
    pub rows: Vec<LedgerRowResponse>,
    /// Totals line.
    pub grand_total: BalanceView,
    /// Top-line figures.
    pub summary: LedgerSummary,
    /// Currency label for amounts.
    pub currency: String,
    /// Most recent successful save.
    pub last_updated: Option<DateTime<Utc>>,
    /// `last_updated` as relative text.
    pub last_updated_text: String,
}

impl LedgerResponse {
    fn from_statement(
        statement: &LedgerStatement<'_>,
        last_updated: Option<DateTime<Utc>>,
        currency: &str,
    ) -> Self {
        let customer = statement.customer;
        Self {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            phone_numbers: customer.phone_numbers.clone(),
            rows: statement
                .rows
                .iter()
                .map(|row| LedgerRowResponse {
                    entry: row.entry.clone(),
                    debit_to_date: row.debit_to_date,
                    credit_to_date: row.credit_to_date,
                    balance: row.balance.into(),
                })
                .collect(),
            grand_total: statement.grand_total.into(),
            summary: statement.summary,
            currency: currency.to_string(),
            last_updated,
            last_updated_text: relative_time(last_updated, Utc::now()),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn open_session(state: &AppState, customer_id: Uuid) -> Result<Session, Response> {
    LedgerSession::open(state.store.clone(), CustomerId::from_uuid(customer_id))
        .await
        .map(|session| {
            session.with_delete_save_delay(Duration::from_millis(state.ledger.delete_save_delay_ms))
        })
        .map_err(|e| ledger_error_response(&e))
}

fn ledger_response(state: &AppState, session: &Session) -> Response {
    let response = LedgerResponse::from_statement(
        &session.statement(),
        session.last_updated(),
        &state.ledger.currency_label,
    );
    (StatusCode::OK, Json(response)).into_response()
}

/// GET `/customers/{customer_id}/ledger` - Statement with running balances.
async fn get_ledger(State(state): State<AppState>, Path(customer_id): Path<Uuid>) -> Response {
    match open_session(&state, customer_id).await {
        Ok(session) => ledger_response(&state, &session),
        Err(response) => response,
    }
}

/// PUT `/customers/{customer_id}/ledger` - Replace the whole list and save.
async fn save_ledger(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<SaveLedgerRequest>,
) -> Response {
    let mut session = match open_session(&state, customer_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let now = Utc::now();
    let entries: Vec<LedgerEntry> = request
        .entries
        .into_iter()
        .map(|input| {
            let prior = input.id.and_then(|id| {
                let id = LedgerEntryId::from_uuid(id);
                session.entries().iter().find(|e| e.id == Some(id))
            });
            input.into_entry(prior, now)
        })
        .collect();

    if let Err(e) = session.replace_entries(entries) {
        return ledger_error_response(&e);
    }
    if let Err(e) = session.sync().await {
        return ledger_error_response(&e);
    }

    ledger_response(&state, &session)
}

/// DELETE `/customers/{customer_id}/ledger/entries/{entry_id}` - Remove a line.
///
/// Returns as soon as the line is removed; the save follows after the
/// configured delay.
async fn delete_entry(
    State(state): State<AppState>,
    Path((customer_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let mut session = match open_session(&state, customer_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let entry_id = LedgerEntryId::from_uuid(entry_id);
    match session.remove_entry(entry_id) {
        Ok(_detached) => {
            info!(%customer_id, %entry_id, "Ledger entry removal accepted");
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "status": "accepted",
                    "entryId": entry_id,
                    "saveDelayMs": state.ledger.delete_save_delay_ms
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/customers/{customer_id}/ledger/export.csv` - Statement as CSV.
async fn export_ledger(State(state): State<AppState>, Path(customer_id): Path<Uuid>) -> Response {
    let session = match open_session(&state, customer_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let statement = session.statement();
    let rows = export_rows(&statement);
    let mut body = Vec::new();
    if let Err(e) = write_csv(&rows, &mut body) {
        return ledger_error_response(&LedgerError::from(e));
    }

    let file_name = export_file_name(&session.customer().name, Utc::now().date_naive());
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps ledger errors to HTTP responses.
fn ledger_error_response(e: &LedgerError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %e, retryable = e.is_retryable(), "Ledger request failed");
    } else {
        warn!(error = %e, "Ledger request rejected");
    }

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}
