//! Payment gateway adapters
//!
//! One adapter contract, several interchangeable third-party processors.
//! The reconciliation engine depends only on the [`PaymentGateway`] trait;
//! the concrete provider is selected by configuration at startup.
//!
//! - [`CashfreeGateway`]: order creation plus explicit verify-by-order-id
//! - [`RazorpayGateway`]: hosted checkout whose completion handler reports a
//!   provider payment reference
//! - [`ManualUpiGateway`]: offline UPI transfer with an uploaded proof,
//!   verified by an administrator instead of an API

pub mod cashfree;
pub mod manual;
pub mod razorpay;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::utils::errors::{FestregError, GatewayError, GatewayResult};

pub use cashfree::CashfreeGateway;
pub use manual::ManualUpiGateway;
pub use razorpay::RazorpayGateway;

/// Contact details forwarded to the provider with an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Order creation request, amounts in whole INR rupees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Provider-compliant receipt/order identifier, at most 40 characters
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub customer: CustomerDetails,
}

/// Handle returned by order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub order_id: String,
    /// Client session token for SDK-driven checkouts
    pub session_token: Option<String>,
    /// Direct checkout link, set by the manual UPI adapter
    pub checkout_url: Option<String>,
}

/// Provider-agnostic payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayPaymentState {
    Success,
    Pending,
    Failed,
}

/// One payment attempt as reported by the provider, amounts in whole rupees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPaymentRecord {
    pub provider_payment_id: String,
    pub amount: i64,
    pub state: GatewayPaymentState,
    pub method: Option<String>,
    pub message: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Abstract payment processor contract
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short provider name used in logs and payment records
    fn provider(&self) -> &'static str;

    /// Create an order/session with the provider.
    /// Never retried internally; a failure leaves no partial state.
    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<GatewayOrder>;

    /// Fetch the authoritative payment attempts tied to an order.
    /// Safe to call repeatedly.
    async fn order_payments(&self, order_id: &str) -> GatewayResult<Vec<GatewayPaymentRecord>>;
}

/// Build the configured gateway adapter
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<dyn PaymentGateway>, FestregError> {
    let gateway: Arc<dyn PaymentGateway> = match config.provider.as_str() {
        "cashfree" => Arc::new(CashfreeGateway::new(config)?),
        "razorpay" => Arc::new(RazorpayGateway::new(config)?),
        "manual" => Arc::new(ManualUpiGateway::new(config)?),
        other => {
            return Err(FestregError::Config(format!(
                "Unknown gateway provider: {}",
                other
            )))
        }
    };

    Ok(gateway)
}

/// Translate a reqwest failure into the adapter error taxonomy
pub(crate) fn map_request_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::Unavailable
    } else {
        GatewayError::InvalidResponse(err.to_string())
    }
}

/// Read a required credential out of the gateway configuration
pub(crate) fn required(value: &Option<String>, key: &'static str) -> GatewayResult<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| GatewayError::MissingConfiguration(key.to_string()))
}
