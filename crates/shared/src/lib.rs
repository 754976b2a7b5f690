//! Shared ids, errors, and configuration for Haulbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for customers and ledger entries
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
