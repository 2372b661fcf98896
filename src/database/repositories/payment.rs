//! Payment repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::payment::{NewPayment, Payer, Payment, PaymentStatus, PaymentWithContext};
use crate::utils::errors::FestregError;

const PAYMENT_COLUMNS: &str = "id, amount, status, provider_payment_id, payment_method, transaction_id, proof_image_url, paid_at, participant_id, team_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a payment row and flip the payer's paid flag in one transaction.
    ///
    /// Either both writes land or neither does. A concurrent reader never sees
    /// a recorded payment with an unpaid payer, or the reverse.
    pub async fn record_and_mark_paid(
        &self,
        payment: NewPayment,
    ) -> Result<Payment, FestregError> {
        let mut tx = self.pool.begin().await?;

        let recorded = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (amount, status, provider_payment_id, payment_method, transaction_id, proof_image_url, paid_at, participant_id, team_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.amount)
        .bind(payment.status)
        .bind(&payment.provider_payment_id)
        .bind(&payment.payment_method)
        .bind(&payment.transaction_id)
        .bind(&payment.proof_image_url)
        .bind(payment.paid_at)
        .bind(payment.payer.participant_id())
        .bind(payment.payer.team_id())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        match payment.payer {
            Payer::Team(team_id) => {
                sqlx::query("UPDATE teams SET is_paid = TRUE, updated_at = $2 WHERE id = $1")
                    .bind(team_id)
                    .bind(Utc::now())
                    .execute(&mut *tx)
                    .await?;
            }
            Payer::Participant(participant_id) => {
                sqlx::query("UPDATE participants SET is_paid = TRUE, updated_at = $2 WHERE id = $1")
                    .bind(participant_id)
                    .bind(Utc::now())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(recorded)
    }

    /// Insert a payment row without touching any paid flag.
    /// Used for manually-submitted proofs awaiting administrator review.
    pub async fn insert(&self, payment: NewPayment) -> Result<Payment, FestregError> {
        let recorded = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (amount, status, provider_payment_id, payment_method, transaction_id, proof_image_url, paid_at, participant_id, team_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.amount)
        .bind(payment.status)
        .bind(&payment.provider_payment_id)
        .bind(&payment.payment_method)
        .bind(&payment.transaction_id)
        .bind(&payment.proof_image_url)
        .bind(payment.paid_at)
        .bind(payment.payer.participant_id())
        .bind(payment.payer.team_id())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(recorded)
    }

    /// Find payment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, FestregError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Find the payment carrying a gateway transaction reference, if recorded
    pub async fn find_by_provider_payment_id(
        &self,
        provider_payment_id: &str,
    ) -> Result<Option<Payment>, FestregError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE provider_payment_id = $1"
        ))
        .bind(provider_payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Unconditional status overwrite. Does not touch the payer's paid flag.
    pub async fn set_status(
        &self,
        id: i64,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, FestregError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// List payments with payer and event context, newest first
    pub async fn list_with_context(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentWithContext>, FestregError> {
        let payments = sqlx::query_as::<_, PaymentWithContext>(
            r#"
            SELECT pay.*,
                   COALESCE(t.name, p.name) AS payer_name,
                   e.name AS event_name
            FROM payments pay
            LEFT JOIN teams t ON pay.team_id = t.id
            LEFT JOIN participants p ON pay.participant_id = p.id
            JOIN events e ON e.id = COALESCE(t.event_id, p.event_id)
            ORDER BY pay.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Count total payments
    pub async fn count(&self) -> Result<i64, FestregError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
