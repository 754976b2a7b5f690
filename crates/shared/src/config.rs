//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Delay between removing an entry and persisting the remaining list.
    #[serde(default = "default_delete_save_delay_ms")]
    pub delete_save_delay_ms: u64,
    /// Currency label printed next to summary amounts.
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            delete_save_delay_ms: default_delete_save_delay_ms(),
            currency_label: default_currency_label(),
        }
    }
}

fn default_delete_save_delay_ms() -> u64 {
    1000
}

fn default_currency_label() -> String {
    "PKR".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("HAULBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> Result<AppConfig, config::ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/haulbook_test"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://localhost/haulbook_test");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ledger.delete_save_delay_ms, 1000);
        assert_eq!(config.ledger.currency_label, "PKR");
    }

    #[test]
    fn test_ledger_overrides() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/haulbook_test"

            [ledger]
            delete_save_delay_ms = 250
            currency_label = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.delete_save_delay_ms, 250);
        assert_eq!(config.ledger.currency_label, "USD");
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(from_toml("[server]\nport = 9090\n").is_err());
    }
}
