//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod participant;
pub mod payment;
pub mod profile;
pub mod team;

// Re-export repositories
pub use event::EventRepository;
pub use participant::ParticipantRepository;
pub use payment::PaymentRepository;
pub use profile::ProfileRepository;
pub use team::TeamRepository;

/// Return the violated unique constraint's name, when the error is one.
///
/// The unique constraints on (email, event_id) and (name, event_id) are the
/// authoritative cross-request guards; services translate violations back
/// into the matching business-rule rejection.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            db_err.constraint().map(|c| c.to_string())
        }
        _ => None,
    }
}
