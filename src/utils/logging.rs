//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the festreg application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "festreg.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log a registration attempt outcome with structured data
pub fn log_registration(event_id: i64, email: &str, accepted: bool, detail: Option<&str>) {
    if accepted {
        info!(
            event_id = event_id,
            email = email,
            detail = detail,
            "Registration accepted"
        );
    } else {
        info!(
            event_id = event_id,
            email = email,
            detail = detail,
            "Registration rejected"
        );
    }
}

/// Log gateway interactions
pub fn log_gateway_call(provider: &str, operation: &str, order_id: &str, success: bool) {
    if success {
        info!(
            provider = provider,
            operation = operation,
            order_id = order_id,
            "Gateway call completed"
        );
    } else {
        warn!(
            provider = provider,
            operation = operation,
            order_id = order_id,
            "Gateway call failed"
        );
    }
}

/// Log administrator actions
pub fn log_admin_action(admin_email: &str, action: &str, target: Option<&str>) {
    warn!(
        admin_email = admin_email,
        action = action,
        target = target,
        "Admin action performed"
    );
}
