//! Customers migration.
//!
//! Creates the customers table. Ledger entries are stored as one JSONB
//! array per customer and always replaced whole.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS customers CASCADE;")
            .await?;
        Ok(())
    }
}

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(32) NOT NULL DEFAULT '',
    name VARCHAR(255) NOT NULL,
    phone_numbers JSONB NOT NULL DEFAULT '[]'::jsonb,
    address TEXT NOT NULL DEFAULT '',
    entries JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ,
    CONSTRAINT chk_entries_array CHECK (jsonb_typeof(entries) = 'array'),
    CONSTRAINT chk_phone_numbers_array CHECK (jsonb_typeof(phone_numbers) = 'array')
);

CREATE INDEX idx_customers_name ON customers (name);
";
