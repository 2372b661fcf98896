//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured. Validation runs
//! once at startup so a misconfigured gateway fails fast instead of at the
//! first payment.

use super::Settings;
use crate::utils::errors::{FestregError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_gateway_config(&settings.gateway)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(FestregError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(FestregError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(FestregError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate gateway configuration for the selected provider
fn validate_gateway_config(config: &super::GatewayConfig) -> Result<()> {
    if config.timeout_seconds == 0 {
        return Err(FestregError::Config(
            "Gateway timeout must be greater than 0".to_string(),
        ));
    }

    if config.currency.is_empty() {
        return Err(FestregError::Config(
            "Gateway currency is required".to_string(),
        ));
    }

    match config.provider.as_str() {
        "cashfree" => {
            require(&config.base_url, "gateway.base_url")?;
            require(&config.api_version, "gateway.api_version")?;
            require(&config.app_id, "gateway.app_id")?;
            require(&config.secret_key, "gateway.secret_key")?;
        }
        "razorpay" => {
            require(&config.base_url, "gateway.base_url")?;
            require(&config.app_id, "gateway.app_id")?;
            require(&config.secret_key, "gateway.secret_key")?;
        }
        "manual" => {
            require(&config.upi_id, "gateway.upi_id")?;
            require(&config.payee_name, "gateway.payee_name")?;
        }
        other => {
            return Err(FestregError::Config(format!(
                "Unknown gateway provider: {}. Valid providers: cashfree, razorpay, manual",
                other
            )));
        }
    }

    Ok(())
}

fn require(value: &Option<String>, key: &str) -> Result<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(FestregError::Config(format!("{} is required", key))),
    }
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(FestregError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(FestregError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_cashfree_requires_credentials() {
        let mut settings = Settings::default();
        settings.gateway.provider = "cashfree".to_string();
        settings.gateway.base_url = Some("https://sandbox.cashfree.com/pg".to_string());
        settings.gateway.api_version = Some("2023-08-01".to_string());
        settings.gateway.app_id = Some("app".to_string());
        // secret_key missing
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("gateway.secret_key"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut settings = Settings::default();
        settings.gateway.provider = "paypal".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("Unknown gateway provider"));
    }

    #[test]
    fn test_manual_requires_upi_id() {
        let mut settings = Settings::default();
        settings.gateway.upi_id = None;
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("gateway.upi_id"));
    }

    #[test]
    fn test_connection_bounds_are_checked() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }
}
