//! Error handling for festreg
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Registration and payment
//! rejections carry their user-facing message in the `Display` implementation;
//! callers surface the string verbatim.

use thiserror::Error;

/// Main error type for the festreg application
#[derive(Error, Debug)]
pub enum FestregError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Profile not found: {email}")]
    ProfileNotFound { email: String },

    #[error("Payment not found: {payment_id}")]
    PaymentNotFound { payment_id: i64 },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Registration rejections, surfaced verbatim to the registering user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Event not found")]
    EventNotFound,

    #[error("Registration has not opened yet for this event")]
    RegistrationNotOpen,

    #[error("Registration is closed for this event")]
    RegistrationClosed,

    #[error("This is not an individual event")]
    NotAnIndividualEvent,

    #[error("This is not a team event")]
    NotATeamEvent,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Team must have at least {min} participants")]
    TeamTooSmall { min: i32 },

    #[error("Team cannot have more than {max} participants")]
    TeamTooLarge { max: i32 },

    #[error("Maximum number of teams reached for this event")]
    EventFull,

    #[error("Team name already exists for this event")]
    TeamNameTaken,

    #[error("The following participants are already registered: {}", emails.join(", "))]
    ParticipantsAlreadyRegistered { emails: Vec<String> },

    #[error("Team leader must be included in the participants list")]
    LeaderNotInRoster,
}

/// Payment reconciliation failures
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Event or participant not found")]
    NotFound,

    #[error("Payment amount mismatch: expected {expected}, gateway reports {actual}")]
    AmountMismatch { expected: i64, actual: i64 },

    #[error("Payment declined by gateway: {0}")]
    GatewayDeclined(String),

    #[error("Payment verification was inconclusive, retry later")]
    VerificationInconclusive,

    #[error("Only the team leader can make the payment for a team event")]
    NotTeamLeader,

    #[error("Registration fee has already been paid")]
    AlreadyPaid,

    #[error("Payment confirmed by the gateway but could not be recorded: {0}")]
    Persistence(String),
}

/// Gateway adapter failures
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing gateway configuration: {0}")]
    MissingConfiguration(String),

    #[error("Payment gateway is unavailable")]
    Unavailable,

    #[error("Payment gateway request timed out")]
    Timeout,

    #[error("Payment gateway rejected the order: {0}")]
    RejectedOrder(String),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Operation not supported by the {0} gateway")]
    Unsupported(&'static str),
}

/// Result type alias for festreg operations
pub type Result<T> = std::result::Result<T, FestregError>;

/// Result type alias for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl FestregError {
    /// Check if the error is recoverable by retrying the same request
    pub fn is_recoverable(&self) -> bool {
        match self {
            FestregError::Database(_) => false,
            FestregError::Migration(_) => false,
            FestregError::Config(_) => false,
            FestregError::Registration(_) => false,
            FestregError::Payment(e) => e.is_recoverable(),
            FestregError::Gateway(e) => e.is_recoverable(),
            FestregError::Serialization(_) => false,
            FestregError::Io(_) => true,
            FestregError::EventNotFound { .. } => false,
            FestregError::ProfileNotFound { .. } => false,
            FestregError::PaymentNotFound { .. } => false,
            FestregError::PermissionDenied(_) => false,
            FestregError::InvalidInput(_) => false,
        }
    }
}

impl PaymentError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PaymentError::VerificationInconclusive | PaymentError::Persistence(_)
        )
    }
}

impl GatewayError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GatewayError::Unavailable | GatewayError::Timeout)
    }
}
