//! Customer repository and the database-backed ledger store.

use async_trait::async_trait;
use chrono::Utc;
use haulbook_core::ledger::{Customer, LedgerEntry, LedgerStore, StoreError};
use haulbook_shared::types::CustomerId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, warn};

use crate::entities::customers;

/// Customer repository for ledger reads and whole-list writes.
#[derive(Debug)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a customer row by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Inserts a new customer with their current entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be encoded or the insert fails.
    pub async fn create(&self, customer: &Customer) -> Result<customers::Model, DbErr> {
        let model = customers::ActiveModel {
            id: Set(customer.id.into_inner()),
            code: Set(customer.code.clone()),
            name: Set(customer.name.clone()),
            phone_numbers: Set(to_json(&customer.phone_numbers)?),
            address: Set(customer.address.clone()),
            entries: Set(to_json(&customer.entries)?),
            created_at: Set(Utc::now().into()),
            updated_at: Set(customer.updated_at.map(Into::into)),
        };

        model.insert(&self.db).await
    }

    /// Overwrites the stored entries and `updated_at`.
    ///
    /// Returns the number of rows touched; zero means no such customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be encoded or the update fails.
    pub async fn replace_entries(&self, customer: &Customer) -> Result<u64, DbErr> {
        let changes = customers::ActiveModel {
            entries: Set(to_json(&customer.entries)?),
            updated_at: Set(customer.updated_at.map(Into::into)),
            ..Default::default()
        };

        let result = customers::Entity::update_many()
            .set(changes)
            .filter(customers::Column::Id.eq(customer.id.into_inner()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<sea_orm::JsonValue, DbErr> {
    serde_json::to_value(value).map_err(|e| DbErr::Json(e.to_string()))
}

/// Decodes a customer row into the domain type.
///
/// # Errors
///
/// Returns [`StoreError::Backend`] if the stored JSON is not a valid ledger.
pub fn customer_from_model(model: customers::Model) -> Result<Customer, StoreError> {
    let id = CustomerId::from_uuid(model.id);
    let corrupt = |field: &str, err: serde_json::Error| {
        warn!(customer_id = %id, field, error = %err, "Stored customer row is corrupt");
        StoreError::Backend(format!("corrupt {field} for customer {id}: {err}"))
    };

    let entries: Vec<LedgerEntry> =
        serde_json::from_value(model.entries).map_err(|e| corrupt("entries", e))?;
    let phone_numbers: Vec<String> =
        serde_json::from_value(model.phone_numbers).map_err(|e| corrupt("phone_numbers", e))?;

    Ok(Customer {
        id,
        code: model.code,
        name: model.name,
        phone_numbers,
        address: model.address,
        entries,
        updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
    })
}

fn backend(err: &DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl LedgerStore for CustomerRepository {
    async fn fetch_customer_ledger(&self, id: CustomerId) -> Result<Customer, StoreError> {
        let model = self
            .find_by_id(id)
            .await
            .map_err(|e| backend(&e))?
            .ok_or(StoreError::NotFound(id))?;

        customer_from_model(model)
    }

    async fn replace_customer_ledger(&self, customer: &Customer) -> Result<(), StoreError> {
        let rows = self
            .replace_entries(customer)
            .await
            .map_err(|e| backend(&e))?;

        if rows == 0 {
            return Err(StoreError::NotFound(customer.id));
        }

        debug!(
            customer_id = %customer.id,
            entries = customer.entries.len(),
            "Customer ledger replaced"
        );
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(|e| backend(&e))
    }
}
