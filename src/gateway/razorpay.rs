//! Razorpay gateway adapter
//!
//! Hosted-checkout integration: an order is created server-side, the hosted
//! widget collects the payment, and the client-side completion handler
//! reports a provider payment id back to the application. Order status can
//! also be polled through `/orders/{id}/payments`.
//!
//! Razorpay amounts are in paise on the wire; conversion to whole rupees
//! happens here so the rest of the system never sees minor units. Receipts
//! are capped at 40 characters by the provider.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use async_trait::async_trait;
use chrono::DateTime;

use crate::config::GatewayConfig;
use crate::gateway::{
    map_request_error, required, CreateOrderRequest, GatewayOrder, GatewayPaymentRecord,
    GatewayPaymentState, PaymentGateway,
};
use crate::utils::errors::{GatewayError, GatewayResult};

#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Debug, Serialize)]
struct RazorpayOrderBody<'a> {
    /// Paise
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    error: Option<RazorpayErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayPaymentList {
    items: Vec<RazorpayPayment>,
}

#[derive(Debug, Deserialize)]
struct RazorpayPayment {
    id: String,
    /// Paise
    amount: i64,
    status: String,
    method: Option<String>,
    error_description: Option<String>,
    created_at: Option<i64>,
}

impl RazorpayGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            client,
            base_url: required(&config.base_url, "gateway.base_url")?,
            key_id: required(&config.app_id, "gateway.app_id")?,
            key_secret: required(&config.secret_key, "gateway.secret_key")?,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn provider(&self) -> &'static str {
        "razorpay"
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<GatewayOrder> {
        let url = format!("{}/orders", self.base_url);
        debug!(receipt = %request.order_id, amount = request.amount, "Creating Razorpay order");

        let body = RazorpayOrderBody {
            amount: request.amount * 100,
            currency: &request.currency,
            receipt: &request.order_id,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let payload: RazorpayError = response
                .json()
                .await
                .unwrap_or(RazorpayError { error: None });
            let message = payload
                .error
                .and_then(|e| e.description)
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(receipt = %request.order_id, message = %message, "Razorpay rejected order");
            return Err(GatewayError::RejectedOrder(message));
        }

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(GatewayOrder {
            order_id: order.id,
            session_token: None,
            checkout_url: None,
        })
    }

    async fn order_payments(&self, order_id: &str) -> GatewayResult<Vec<GatewayPaymentRecord>> {
        let url = format!("{}/orders/{}/payments", self.base_url, order_id);
        debug!(order_id = %order_id, "Fetching Razorpay order payments");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let list: RazorpayPaymentList = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(list.items.into_iter().map(GatewayPaymentRecord::from).collect())
    }
}

impl From<RazorpayPayment> for GatewayPaymentRecord {
    fn from(payment: RazorpayPayment) -> Self {
        let state = match payment.status.as_str() {
            "captured" => GatewayPaymentState::Success,
            "created" | "authorized" => GatewayPaymentState::Pending,
            _ => GatewayPaymentState::Failed,
        };

        GatewayPaymentRecord {
            provider_payment_id: payment.id,
            amount: payment.amount / 100,
            state,
            method: payment.method,
            message: payment.error_description,
            paid_at: payment
                .created_at
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}
