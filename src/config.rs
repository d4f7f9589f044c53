//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Loaded once at startup and passed by reference;
//! there is no ambient/global lookup.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Run mode (e.g. "development", "production")
    pub mode: String,
    /// Host address to bind to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Prefix used in startup log lines
    pub log_prefix: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL consumed by the sqlx driver
    pub url: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                mode: env::var("APP_MODE").unwrap_or_else(|_| "development".to_string()),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                log_prefix: env::var("LOG_PREFIX").unwrap_or_else(|_| "app".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/listings.db".to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Default log filter for the configured run mode
    pub fn default_log_filter(&self) -> &'static str {
        if self.server.mode == "production" {
            "info"
        } else {
            "debug"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["APP_MODE", "HOST", "PORT", "LOG_PREFIX", "DATABASE_URL"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server.mode, "development");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_prefix, "app");
        assert_eq!(config.database.url, "sqlite:data/listings.db");
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.default_log_filter(), "debug");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        std::env::set_var("APP_MODE", "production");
        std::env::set_var("PORT", "8081");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");
        let config = Config::from_env();
        assert_eq!(config.server.mode, "production");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.default_log_filter(), "info");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_port_falls_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        let config = Config::from_env();
        assert_eq!(config.server.port, 3000);
        clear_env();
    }
}
