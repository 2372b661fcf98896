//! Payment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Payment lifecycle.
///
/// Gateway-verified payments are created directly as `Completed`.
/// Manually-submitted proofs start as `Unverified` and stay there until an
/// administrator settles them. Administrators may move a payment between any
/// two states; no transition touches the payer's paid flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Unverified,
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unverified => write!(f, "UNVERIFIED"),
            PaymentStatus::Completed => write!(f, "COMPLETED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    /// Whole INR rupees
    pub amount: i64,
    pub status: PaymentStatus,
    /// Transaction reference assigned by the gateway
    pub provider_payment_id: Option<String>,
    pub payment_method: Option<String>,
    /// Free-text reference submitted on the manual path
    pub transaction_id: Option<String>,
    pub proof_image_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub participant_id: Option<i64>,
    pub team_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The entity a payment settles: an individual participant or a whole team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payer {
    Participant(i64),
    Team(i64),
}

impl Payer {
    pub fn participant_id(&self) -> Option<i64> {
        match self {
            Payer::Participant(id) => Some(*id),
            Payer::Team(_) => None,
        }
    }

    pub fn team_id(&self) -> Option<i64> {
        match self {
            Payer::Participant(_) => None,
            Payer::Team(id) => Some(*id),
        }
    }
}

/// Payment row to be inserted
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: i64,
    pub status: PaymentStatus,
    pub provider_payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub proof_image_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payer: Payer,
}

/// Payment joined with payer and event context for the admin listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentWithContext {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub payer_name: String,
    pub event_name: String,
}
