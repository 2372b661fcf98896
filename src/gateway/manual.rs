//! Manual UPI gateway adapter
//!
//! Degenerate adapter for offline collection: "order creation" produces a
//! UPI deep link the participant pays through their own app, and there is no
//! API to verify against. Verification is administrator-driven; submitted
//! proofs enter the system as UNVERIFIED payments.

use async_trait::async_trait;

use crate::config::GatewayConfig;
use crate::gateway::{
    required, CreateOrderRequest, GatewayOrder, GatewayPaymentRecord, PaymentGateway,
};
use crate::utils::errors::{GatewayError, GatewayResult};

#[derive(Debug, Clone)]
pub struct ManualUpiGateway {
    upi_id: String,
    payee_name: String,
}

impl ManualUpiGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        Ok(Self {
            upi_id: required(&config.upi_id, "gateway.upi_id")?,
            payee_name: required(&config.payee_name, "gateway.payee_name")?,
        })
    }

    /// UPI deep link for the requested amount
    fn payment_url(&self, amount: i64, currency: &str) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu={}",
            self.upi_id,
            urlencoding::encode(&self.payee_name),
            amount,
            currency
        )
    }
}

#[async_trait]
impl PaymentGateway for ManualUpiGateway {
    fn provider(&self) -> &'static str {
        "manual"
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<GatewayOrder> {
        Ok(GatewayOrder {
            order_id: request.order_id.clone(),
            session_token: None,
            checkout_url: Some(self.payment_url(request.amount, &request.currency)),
        })
    }

    async fn order_payments(&self, _order_id: &str) -> GatewayResult<Vec<GatewayPaymentRecord>> {
        Err(GatewayError::Unsupported("manual"))
    }
}
