//! `SeaORM` entity definitions.

pub mod customers;
