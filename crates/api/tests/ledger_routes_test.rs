//! Route tests for the customer ledger API against an in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use haulbook_api::{AppState, create_router};
use haulbook_core::ledger::{Customer, EntryEdit, InMemoryLedgerStore, LedgerStore, StoreError};
use haulbook_shared::config::LedgerConfig;
use haulbook_shared::types::CustomerId;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

fn ledger_config() -> LedgerConfig {
    LedgerConfig {
        delete_save_delay_ms: 10,
        currency_label: "PKR".to_string(),
    }
}

/// Credit 500, debit 200, then a blank draft line.
fn seeded_customer() -> Customer {
    let mut customer = Customer::new("Karachi Goods");
    customer.phone_numbers = vec!["0300-1234567".into()];
    let now = Utc::now();
    for _ in 0..3 {
        customer.push_blank_entry(now);
    }
    customer.edit_entry(0, EntryEdit::Credit(dec!(500)));
    customer.edit_entry(1, EntryEdit::Debit(dec!(200)));
    customer
}

fn app_with(customer: &Customer) -> (Router, Arc<InMemoryLedgerStore>) {
    let store = Arc::new(InMemoryLedgerStore::new());
    store.insert(customer.clone());
    let state = AppState::new(store.clone(), ledger_config());
    (create_router(state), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with(&seeded_customer());
    let (status, body) = send_json(&app, get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "reachable");
}

#[tokio::test]
async fn test_get_ledger_statement() {
    let customer = seeded_customer();
    let (app, _) = app_with(&customer);

    let (status, body) =
        send_json(&app, get(&format!("/api/v1/customers/{}/ledger", customer.id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerName"], "Karachi Goods");
    assert_eq!(body["currency"], "PKR");
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["rows"][0]["balance"]["amount"], "500");
    assert_eq!(body["rows"][1]["balance"]["amount"], "300");
    assert_eq!(body["rows"][1]["balance"]["display"], "300 Cr.");
    assert_eq!(body["grandTotal"]["side"], "credit");
    assert_eq!(body["summary"]["totalEntries"], 2);
    assert_eq!(body["summary"]["totalDebit"], "200");
    assert_eq!(body["summary"]["totalCredit"], "500");
    assert_eq!(body["lastUpdatedText"], "A while ago");
}

#[tokio::test]
async fn test_get_unknown_customer() {
    let (app, _) = app_with(&seeded_customer());
    let (status, body) = send_json(
        &app,
        get(&format!("/api/v1/customers/{}/ledger", CustomerId::new())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "CUSTOMER_NOT_FOUND");
}

#[tokio::test]
async fn test_put_drops_negative_numbers_and_blank_lines() {
    let customer = seeded_customer();
    let (app, store) = app_with(&customer);
    let first_id = customer.entries[0].id.unwrap();

    let request = json!({
        "entries": [
            { "id": first_id, "credit": "-25", "description": "Advance" },
            { "debit": "150", "vehicleReference": "LHR-77", "date": "2024-03-01" },
            {}
        ]
    });
    let (status, body) = send_json(
        &app,
        put_json(&format!("/api/v1/customers/{}/ledger", customer.id), &request),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["grandTotal"]["amount"], "350");
    assert!(body["lastUpdated"].is_string());
    assert_eq!(body["lastUpdatedText"], "Just now");

    let stored = store.get(customer.id).unwrap();
    assert_eq!(stored.entries.len(), 2);
    assert_eq!(stored.entries[0].id, Some(first_id));
    assert_eq!(stored.entries[0].credit, dec!(500));
    assert_eq!(stored.entries[0].description, "Advance");
    assert_eq!(stored.entries[1].debit, dec!(150));
    assert!(stored.entries.iter().all(|e| e.id.is_some()));
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn test_put_rejects_repeated_entry_id() {
    let customer = seeded_customer();
    let (app, store) = app_with(&customer);
    let first_id = customer.entries[0].id.unwrap();

    let request = json!({
        "entries": [
            { "id": first_id, "credit": "100" },
            { "id": first_id, "debit": "40" }
        ]
    });
    let (status, body) = send_json(
        &app,
        put_json(&format!("/api/v1/customers/{}/ledger", customer.id), &request),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DUPLICATE_ENTRY_ID");
    assert!(body["message"].as_str().unwrap().contains(&first_id.to_string()));
    assert_eq!(store.get(customer.id).unwrap(), customer);
}

#[tokio::test]
async fn test_delete_saves_after_delay() {
    let customer = seeded_customer();
    let (app, store) = app_with(&customer);
    let removed = customer.entries[1].id.unwrap();

    let (status, body) = send_json(
        &app,
        delete(&format!(
            "/api/v1/customers/{}/ledger/entries/{removed}",
            customer.id
        )),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "accepted");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let stored = store.get(customer.id).unwrap();
    assert_eq!(stored.entries.len(), 1);
    assert!(stored.entries.iter().all(|e| e.id != Some(removed)));
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn test_delete_unknown_entry() {
    let customer = seeded_customer();
    let (app, store) = app_with(&customer);

    let (status, body) = send_json(
        &app,
        delete(&format!(
            "/api/v1/customers/{}/ledger/entries/{}",
            customer.id,
            CustomerId::new()
        )),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ENTRY_NOT_FOUND");
    assert_eq!(store.get(customer.id).unwrap(), customer);
}

#[tokio::test]
async fn test_export_csv() {
    let customer = seeded_customer();
    let (app, _) = app_with(&customer);

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/v1/customers/{}/ledger/export.csv",
            customer.id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Customer-Karachi Goods-Orders-"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Date,Customer Name,Phone No"));
    assert!(lines[1].ends_with("500 - Cr."));
    assert!(lines[2].ends_with("300 - Cr."));
}

/// A store that reads fine but rejects every write.
struct ReadOnlyStore {
    customer: Customer,
}

#[async_trait]
impl LedgerStore for ReadOnlyStore {
    async fn fetch_customer_ledger(&self, id: CustomerId) -> Result<Customer, StoreError> {
        if id == self.customer.id {
            Ok(self.customer.clone())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn replace_customer_ledger(&self, _customer: &Customer) -> Result<(), StoreError> {
        Err(StoreError::Backend("store is read-only".into()))
    }
}

#[tokio::test]
async fn test_put_against_failing_store() {
    let customer = seeded_customer();
    let store = Arc::new(ReadOnlyStore {
        customer: customer.clone(),
    });
    let app = create_router(AppState::new(store, ledger_config()));

    let (status, body) = send_json(
        &app,
        put_json(
            &format!("/api/v1/customers/{}/ledger", customer.id),
            &json!({ "entries": [{ "credit": "10" }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "PERSISTENCE_FAILURE");
}

/// A store whose backend never answers.
struct UnreachableStore;

#[async_trait]
impl LedgerStore for UnreachableStore {
    async fn fetch_customer_ledger(&self, _id: CustomerId) -> Result<Customer, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn replace_customer_ledger(&self, _customer: &Customer) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let app = create_router(AppState::new(Arc::new(UnreachableStore), ledger_config()));
    let (status, body) = send_json(&app, get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "unreachable");
}
