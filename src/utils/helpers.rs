//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Gateway receipt identifiers are capped at 40 characters by the strictest
/// observed provider.
pub const MAX_RECEIPT_ID_LENGTH: usize = 40;

/// Generate a gateway-compliant order/receipt identifier.
///
/// "rcpt_" plus a 32-character hex UUID stays within the 40-character cap.
pub fn generate_receipt_id() -> String {
    format!("rcpt_{}", Uuid::new_v4().simple())
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a rupee amount for display
pub fn format_amount(amount: i64) -> String {
    format!("₹{}", amount)
}
