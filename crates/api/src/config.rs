//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `CATALOG_URL` — product-read service (default: `http://localhost:3002`)
/// - `INVENTORY_URL` — inventory-read service (default: `http://localhost:3003`)
/// - `DISCOUNT_ENGINE_URL` — discount engine (default: `http://localhost:3004`)
/// - `TAX_CALCULATION_URL` — tax service (default: `http://localhost:3005`)
/// - `COLLABORATOR_TIMEOUT_MS` — per-request timeout (default: `5000`)
/// - `DATABASE_URL` — when set, carts persist in PostgreSQL
/// - `KAFKA_BROKERS` — when set (and the `kafka` feature is on),
///   checkout events go to the broker
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub catalog_url: String,
    pub inventory_url: String,
    pub discount_url: String,
    pub tax_url: String,
    pub collaborator_timeout: Duration,
    pub database_url: Option<String>,
    pub kafka_brokers: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            catalog_url: std::env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:3002".to_string()),
            inventory_url: std::env::var("INVENTORY_URL")
                .unwrap_or_else(|_| "http://localhost:3003".to_string()),
            discount_url: std::env::var("DISCOUNT_ENGINE_URL")
                .unwrap_or_else(|_| "http://localhost:3004".to_string()),
            tax_url: std::env::var("TAX_CALCULATION_URL")
                .unwrap_or_else(|_| "http://localhost:3005".to_string()),
            collaborator_timeout: std::env::var("COLLABORATOR_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(5000)),
            database_url: std::env::var("DATABASE_URL").ok(),
            kafka_brokers: std::env::var("KAFKA_BROKERS").ok(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            catalog_url: "http://localhost:3002".to_string(),
            inventory_url: "http://localhost:3003".to_string(),
            discount_url: "http://localhost:3004".to_string(),
            tax_url: "http://localhost:3005".to_string(),
            collaborator_timeout: Duration::from_millis(5000),
            database_url: None,
            kafka_brokers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.collaborator_timeout, Duration::from_millis(5000));
        assert!(config.database_url.is_none());
        assert!(config.kafka_brokers.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_addr_default() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }
}
