//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Payment gateway configuration
///
/// Credentials are validated once at startup per provider instead of being
/// checked ad hoc at each call site. Only the fields the selected provider
/// needs have to be present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// One of "cashfree", "razorpay", "manual"
    pub provider: String,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub app_id: Option<String>,
    pub secret_key: Option<String>,
    pub timeout_seconds: u64,
    pub currency: String,
    /// Collection VPA for the manual UPI path
    pub upi_id: Option<String>,
    /// Payee name rendered inside the UPI deep link
    pub payee_name: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("FESTREG").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::FestregError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/festreg".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            gateway: GatewayConfig {
                provider: "manual".to_string(),
                base_url: None,
                api_version: None,
                app_id: None,
                secret_key: None,
                timeout_seconds: 10,
                currency: "INR".to_string(),
                upi_id: Some("festreg@upi".to_string()),
                payee_name: Some("Festival Desk".to_string()),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/festreg".to_string(),
            },
        }
    }
}
