//! festreg
//!
//! Registration and payment reconciliation platform for a multi-week college
//! cultural and sports festival. This library provides modular components for
//! the event catalog, individual and team registration, availability
//! evaluation, and payment reconciliation against interchangeable payment
//! gateways.

pub mod config;
pub mod database;
pub mod gateway;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{FestregError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use gateway::{build_gateway, PaymentGateway};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
