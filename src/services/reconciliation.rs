//! Payment reconciliation engine
//!
//! Receives claims that a payment succeeded, validates them against the
//! amount owed and the gateway's authoritative records, and durably records
//! the payment while flipping the payer's paid flag. The payment row and the
//! flag update are committed in one transaction; a recorded payment with an
//! unpaid payer is never observable.
//!
//! Three claim shapes arrive here:
//! - an order id to verify against the gateway's payment records
//! - a provider payment reference reported by a hosted-checkout handler
//! - a manually-submitted transaction id with a proof image, which enters as
//!   UNVERIFIED and waits for administrator review

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::database::repositories::{
    unique_violation, EventRepository, ParticipantRepository, PaymentRepository,
};
use crate::gateway::{
    CreateOrderRequest, CustomerDetails, GatewayOrder, GatewayPaymentState, PaymentGateway,
};
use crate::models::event::Event;
use crate::models::participant::ParticipantWithTeam;
use crate::models::payment::{NewPayment, Payer, Payment, PaymentStatus};
use crate::utils::errors::{FestregError, GatewayError, PaymentError, Result};
use crate::utils::helpers::generate_receipt_id;

const PROVIDER_PAYMENT_KEY: &str = "payments_provider_payment_id_key";

/// Payment service wiring the configured gateway to the payment store
#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    events: EventRepository,
    participants: ParticipantRepository,
    payments: PaymentRepository,
    currency: String,
}

impl PaymentService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        events: EventRepository,
        participants: ParticipantRepository,
        payments: PaymentRepository,
        currency: String,
    ) -> Self {
        Self {
            gateway,
            events,
            participants,
            payments,
            currency,
        }
    }

    /// Create a gateway order for the amount the payer owes.
    ///
    /// For team events only the leader may initiate payment. Order creation
    /// failure is reported to the caller and never retried here; the
    /// registration itself is unaffected either way.
    pub async fn create_payment_order(
        &self,
        event: &Event,
        payer: &ParticipantWithTeam,
    ) -> Result<GatewayOrder> {
        if payer.participant.event_id != event.id {
            return Err(PaymentError::NotFound.into());
        }

        if payer.is_paid() {
            return Err(PaymentError::AlreadyPaid.into());
        }

        if payer.team.is_some() && !payer.participant.is_leader {
            return Err(PaymentError::NotTeamLeader.into());
        }

        let amount = payer.amount_owed();
        let order_id = generate_receipt_id();

        debug!(
            event_id = event.id,
            participant_id = payer.participant.id,
            order_id = %order_id,
            amount = amount,
            provider = self.gateway.provider(),
            "Creating payment order"
        );

        let request = CreateOrderRequest {
            order_id,
            amount,
            currency: self.currency.clone(),
            customer: CustomerDetails {
                id: payer.participant.id.to_string(),
                name: payer.participant.name.clone(),
                email: payer.participant.email.clone(),
                phone: payer.participant.phone.clone(),
            },
        };

        let order = self.gateway.create_order(&request).await?;

        info!(
            event_id = event.id,
            participant_id = payer.participant.id,
            order_id = %order.order_id,
            amount = amount,
            "Payment order created"
        );

        Ok(order)
    }

    /// Verify an order against the gateway and record the payment.
    ///
    /// Accepts only a gateway-reported success whose amount exactly matches
    /// the amount owed; the client never supplies the amount. Gateway
    /// callbacks and polling are at-least-once, so a claim that was already
    /// recorded is answered with the existing payment and the paid flag
    /// stays set.
    pub async fn verify_and_log_payment(
        &self,
        order_id: &str,
        event_id: i64,
        participant_id: i64,
    ) -> Result<Payment> {
        let (event, payer) = self.load_payer(event_id, participant_id).await?;

        let records = match self.gateway.order_payments(order_id).await {
            Ok(records) => records,
            Err(GatewayError::Timeout) | Err(GatewayError::Unavailable) => {
                // the gateway may have the payment; do not fail it, retry later
                warn!(order_id = %order_id, "Gateway unreachable during verification");
                return Err(PaymentError::VerificationInconclusive.into());
            }
            Err(err) => return Err(err.into()),
        };

        let Some(record) = records.first() else {
            return Err(
                PaymentError::GatewayDeclined("No payment found for this order".to_string()).into(),
            );
        };

        let expected = payer.amount_owed();
        if record.amount != expected {
            warn!(
                order_id = %order_id,
                expected = expected,
                actual = record.amount,
                "Payment amount mismatch"
            );
            return Err(PaymentError::AmountMismatch {
                expected,
                actual: record.amount,
            }
            .into());
        }

        if record.state != GatewayPaymentState::Success {
            let message = record
                .message
                .clone()
                .unwrap_or_else(|| "Payment was not successful".to_string());
            return Err(PaymentError::GatewayDeclined(message).into());
        }

        if let Some(existing) = self
            .payments
            .find_by_provider_payment_id(&record.provider_payment_id)
            .await?
        {
            debug!(
                order_id = %order_id,
                payment_id = existing.id,
                "Payment already recorded, treating claim as replay"
            );
            return Ok(existing);
        }

        let method = record
            .method
            .clone()
            .or_else(|| Some(self.gateway.provider().to_uppercase()));

        self.record_completed(
            &event,
            &payer,
            NewPayment {
                amount: expected,
                status: PaymentStatus::Completed,
                provider_payment_id: Some(record.provider_payment_id.clone()),
                payment_method: method,
                transaction_id: None,
                proof_image_url: None,
                paid_at: Some(record.paid_at.unwrap_or_else(Utc::now)),
                payer: payer_of(&payer),
            },
        )
        .await
    }

    /// Record a payment reported by a hosted-checkout completion handler.
    ///
    /// The handler supplies only the provider payment reference; no amount
    /// cross-check against the gateway is possible on this path.
    pub async fn record_handler_payment(
        &self,
        event_id: i64,
        participant_id: i64,
        provider_payment_id: &str,
        payment_method: Option<String>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Payment> {
        let (event, payer) = self.load_payer(event_id, participant_id).await?;

        if let Some(existing) = self
            .payments
            .find_by_provider_payment_id(provider_payment_id)
            .await?
        {
            debug!(
                provider_payment_id = %provider_payment_id,
                payment_id = existing.id,
                "Handler payment already recorded"
            );
            return Ok(existing);
        }

        self.record_completed(
            &event,
            &payer,
            NewPayment {
                amount: payer.amount_owed(),
                status: PaymentStatus::Completed,
                provider_payment_id: Some(provider_payment_id.to_string()),
                payment_method: payment_method
                    .or_else(|| Some(self.gateway.provider().to_uppercase())),
                transaction_id: None,
                proof_image_url: None,
                paid_at: Some(paid_at.unwrap_or_else(Utc::now)),
                payer: payer_of(&payer),
            },
        )
        .await
    }

    /// Accept a manually-submitted payment proof.
    ///
    /// The transaction id and proof reference are stored as-is and the
    /// payment waits in UNVERIFIED for administrator review. No paid flag is
    /// touched here; this is the lower-trust path.
    pub async fn submit_manual_payment(
        &self,
        event_id: i64,
        participant_id: i64,
        transaction_id: String,
        proof_image_url: Option<String>,
    ) -> Result<Payment> {
        let (_event, payer) = self.load_payer(event_id, participant_id).await?;

        if payer.is_paid() {
            return Err(PaymentError::AlreadyPaid.into());
        }

        if payer.team.is_some() && !payer.participant.is_leader {
            return Err(PaymentError::NotTeamLeader.into());
        }

        let payment = self
            .payments
            .insert(NewPayment {
                amount: payer.amount_owed(),
                status: PaymentStatus::Unverified,
                provider_payment_id: None,
                payment_method: Some("UPI".to_string()),
                transaction_id: Some(transaction_id),
                proof_image_url,
                paid_at: None,
                payer: payer_of(&payer),
            })
            .await?;

        info!(
            event_id = event_id,
            participant_id = participant_id,
            payment_id = payment.id,
            "Manual payment proof submitted, awaiting review"
        );

        Ok(payment)
    }

    /// Administrator-only status overwrite for manual reconciliation.
    ///
    /// A status label, not a trust re-derivation: the payer's paid flag is
    /// left untouched, including when a COMPLETED payment is later marked
    /// FAILED.
    pub async fn set_payment_status(
        &self,
        payment_id: i64,
        status: PaymentStatus,
    ) -> Result<Payment> {
        let payment = self
            .payments
            .set_status(payment_id, status)
            .await?
            .ok_or(FestregError::PaymentNotFound { payment_id })?;

        warn!(
            payment_id = payment_id,
            status = %status,
            "Payment status overwritten by administrator"
        );

        Ok(payment)
    }

    async fn load_payer(
        &self,
        event_id: i64,
        participant_id: i64,
    ) -> Result<(Event, ParticipantWithTeam)> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(PaymentError::NotFound)?;

        let payer = self
            .participants
            .find_with_team(participant_id)
            .await?
            .filter(|p| p.participant.event_id == event_id)
            .ok_or(PaymentError::NotFound)?;

        Ok((event, payer))
    }

    /// Commit the payment row and the paid flag in one transaction.
    ///
    /// A failure here is the worst failure mode: the gateway has confirmed
    /// money changed hands but no durable record was kept. It is logged and
    /// surfaced as its own error class, never swallowed.
    async fn record_completed(
        &self,
        event: &Event,
        payer: &ParticipantWithTeam,
        payment: NewPayment,
    ) -> Result<Payment> {
        let provider_payment_id = payment.provider_payment_id.clone();

        match self.payments.record_and_mark_paid(payment).await {
            Ok(recorded) => {
                info!(
                    event_id = event.id,
                    participant_id = payer.participant.id,
                    payment_id = recorded.id,
                    amount = recorded.amount,
                    "Payment recorded and payer marked paid"
                );
                Ok(recorded)
            }
            Err(FestregError::Database(err))
                if unique_violation(&err).as_deref() == Some(PROVIDER_PAYMENT_KEY) =>
            {
                // a concurrent delivery of the same callback won the insert
                let reference = provider_payment_id.unwrap_or_default();
                match self.payments.find_by_provider_payment_id(&reference).await? {
                    Some(existing) => Ok(existing),
                    None => Err(PaymentError::Persistence(err.to_string()).into()),
                }
            }
            Err(FestregError::Database(err)) => {
                error!(
                    event_id = event.id,
                    participant_id = payer.participant.id,
                    error = %err,
                    "Gateway confirmed the payment but recording it failed"
                );
                Err(PaymentError::Persistence(err.to_string()).into())
            }
            Err(err) => Err(err),
        }
    }
}

fn payer_of(payer: &ParticipantWithTeam) -> Payer {
    match &payer.team {
        Some(team) => Payer::Team(team.id),
        None => Payer::Participant(payer.participant.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participant::Participant;
    use crate::models::team::Team;
    use chrono::Utc;

    fn participant(team_id: Option<i64>, is_leader: bool) -> Participant {
        Participant {
            id: 10,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+911234567890".to_string(),
            year: None,
            course: None,
            event_id: 2,
            team_id,
            is_leader,
            is_paid: false,
            registration_fee: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team() -> Team {
        Team {
            id: 4,
            name: "Night Owls".to_string(),
            description: None,
            event_id: 2,
            leader_email: "lead@example.com".to_string(),
            registration_fee: 300,
            is_paid: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payer_of_prefers_team() {
        let member = ParticipantWithTeam {
            participant: participant(Some(4), false),
            team: Some(team()),
        };
        assert_eq!(payer_of(&member), Payer::Team(4));

        let solo = ParticipantWithTeam {
            participant: participant(None, true),
            team: None,
        };
        assert_eq!(payer_of(&solo), Payer::Participant(10));
    }
}
