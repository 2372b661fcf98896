//! Cashfree gateway adapter
//!
//! Order-plus-explicit-verify integration: an order is created server-side,
//! the client completes checkout with the returned session id, and the
//! server then queries `/orders/{id}/payments` for the authoritative payment
//! records before accepting anything.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::GatewayConfig;
use crate::gateway::{
    map_request_error, required, CreateOrderRequest, GatewayOrder, GatewayPaymentRecord,
    GatewayPaymentState, PaymentGateway,
};
use crate::utils::errors::{GatewayError, GatewayResult};

#[derive(Debug, Clone)]
pub struct CashfreeGateway {
    client: Client,
    base_url: String,
    api_version: String,
    app_id: String,
    secret_key: String,
}

#[derive(Debug, Serialize)]
struct CashfreeOrderBody<'a> {
    order_id: &'a str,
    order_currency: &'a str,
    order_amount: i64,
    customer_details: CashfreeCustomer<'a>,
}

#[derive(Debug, Serialize)]
struct CashfreeCustomer<'a> {
    customer_id: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
}

#[derive(Debug, Deserialize)]
struct CashfreeOrderResponse {
    payment_session_id: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CashfreePayment {
    cf_payment_id: i64,
    payment_amount: f64,
    payment_status: String,
    payment_group: Option<String>,
    payment_message: Option<String>,
    payment_time: Option<DateTime<Utc>>,
}

impl CashfreeGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            client,
            base_url: required(&config.base_url, "gateway.base_url")?,
            api_version: required(&config.api_version, "gateway.api_version")?,
            app_id: required(&config.app_id, "gateway.app_id")?,
            secret_key: required(&config.secret_key, "gateway.secret_key")?,
        })
    }

    fn auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("x-api-version", &self.api_version)
            .header("x-client-id", &self.app_id)
            .header("x-client-secret", &self.secret_key)
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    fn provider(&self) -> &'static str {
        "cashfree"
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<GatewayOrder> {
        let url = format!("{}/orders", self.base_url);
        debug!(order_id = %request.order_id, amount = request.amount, "Creating Cashfree order");

        let body = CashfreeOrderBody {
            order_id: &request.order_id,
            order_currency: &request.currency,
            order_amount: request.amount,
            customer_details: CashfreeCustomer {
                customer_id: &request.customer.id,
                customer_name: &request.customer.name,
                customer_email: &request.customer.email,
                customer_phone: &request.customer.phone,
            },
        };

        let response = self
            .auth_headers(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let payload: CashfreeOrderResponse = response
                .json()
                .await
                .unwrap_or(CashfreeOrderResponse {
                    payment_session_id: None,
                    message: None,
                });
            let message = payload
                .message
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(order_id = %request.order_id, message = %message, "Cashfree rejected order");
            return Err(GatewayError::RejectedOrder(message));
        }

        let payload: CashfreeOrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(GatewayOrder {
            order_id: request.order_id.clone(),
            session_token: payload.payment_session_id,
            checkout_url: None,
        })
    }

    async fn order_payments(&self, order_id: &str) -> GatewayResult<Vec<GatewayPaymentRecord>> {
        let url = format!("{}/orders/{}/payments", self.base_url, order_id);
        debug!(order_id = %order_id, "Fetching Cashfree order payments");

        let response = self
            .auth_headers(self.client.get(&url))
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

        let payments: Vec<CashfreePayment> = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(payments.into_iter().map(GatewayPaymentRecord::from).collect())
    }
}

impl From<CashfreePayment> for GatewayPaymentRecord {
    fn from(payment: CashfreePayment) -> Self {
        let state = match payment.payment_status.as_str() {
            "SUCCESS" => GatewayPaymentState::Success,
            "PENDING" | "NOT_ATTEMPTED" | "USER_DROPPED" => GatewayPaymentState::Pending,
            _ => GatewayPaymentState::Failed,
        };

        GatewayPaymentRecord {
            provider_payment_id: payment.cf_payment_id.to_string(),
            // rupee amounts on the wire are decimals; sub-rupee tampering
            // still fails the exact-match check downstream
            amount: payment.payment_amount as i64,
            state,
            method: payment.payment_group,
            message: payment.payment_message,
            paid_at: payment.payment_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status_maps_to_success() {
        let record = GatewayPaymentRecord::from(CashfreePayment {
            cf_payment_id: 9921,
            payment_amount: 500.0,
            payment_status: "SUCCESS".to_string(),
            payment_group: Some("upi".to_string()),
            payment_message: None,
            payment_time: None,
        });

        assert_eq!(record.state, GatewayPaymentState::Success);
        assert_eq!(record.provider_payment_id, "9921");
        assert_eq!(record.amount, 500);
    }

    #[test]
    fn test_unknown_status_maps_to_failed() {
        let record = GatewayPaymentRecord::from(CashfreePayment {
            cf_payment_id: 1,
            payment_amount: 100.0,
            payment_status: "CANCELLED".to_string(),
            payment_group: None,
            payment_message: Some("cancelled by user".to_string()),
            payment_time: None,
        });

        assert_eq!(record.state, GatewayPaymentState::Failed);
        assert_eq!(record.message.as_deref(), Some("cancelled by user"));
    }

    #[test]
    fn test_fractional_amount_truncates_and_fails_exact_match() {
        let record = GatewayPaymentRecord::from(CashfreePayment {
            cf_payment_id: 2,
            payment_amount: 499.99,
            payment_status: "SUCCESS".to_string(),
            payment_group: None,
            payment_message: None,
            payment_time: None,
        });

        assert_eq!(record.amount, 499);
        assert_ne!(record.amount, 500);
    }
}
