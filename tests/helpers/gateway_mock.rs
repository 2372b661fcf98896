//! Mock payment gateway server for testing
//!
//! Simulates the Cashfree and Razorpay HTTP APIs with wiremock so adapter
//! and reconciliation behavior can be exercised without real credentials.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use festreg::config::{GatewayConfig, Settings};

pub struct GatewayMockServer {
    pub server: MockServer,
}

impl GatewayMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Gateway configuration pointing the Cashfree adapter at this server
    pub fn cashfree_config(&self) -> GatewayConfig {
        GatewayConfig {
            provider: "cashfree".to_string(),
            base_url: Some(self.uri()),
            api_version: Some("2023-08-01".to_string()),
            app_id: Some("test-app-id".to_string()),
            secret_key: Some("test-secret".to_string()),
            timeout_seconds: 2,
            ..Settings::default().gateway
        }
    }

    /// Gateway configuration pointing the Razorpay adapter at this server
    pub fn razorpay_config(&self) -> GatewayConfig {
        GatewayConfig {
            provider: "razorpay".to_string(),
            base_url: Some(self.uri()),
            api_version: None,
            app_id: Some("rzp_test_key".to_string()),
            secret_key: Some("rzp_test_secret".to_string()),
            timeout_seconds: 2,
            ..Settings::default().gateway
        }
    }

    /// Stub Cashfree order creation
    pub async fn mock_cashfree_create_order(&self, session_id: &str) {
        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(header("x-client-id", "test-app-id"))
            .and(header("x-client-secret", "test-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_session_id": session_id,
                "order_status": "ACTIVE",
            })))
            .mount(&self.server)
            .await;
    }

    /// Stub Cashfree order creation rejection
    pub async fn mock_cashfree_order_rejected(&self, message: &str) {
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": message,
                "code": "order_invalid",
            })))
            .mount(&self.server)
            .await;
    }

    /// Stub the Cashfree payments listing for an order
    pub async fn mock_cashfree_order_payments(&self, order_id: &str, payments: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/orders/{}/payments", order_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(payments))
            .mount(&self.server)
            .await;
    }

    /// Stub a slow Cashfree payments listing to trigger client timeouts
    pub async fn mock_cashfree_order_payments_slow(&self, order_id: &str, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/orders/{}/payments", order_id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(std::time::Duration::from_millis(delay_ms)),
            )
            .mount(&self.server)
            .await;
    }

    /// Stub Razorpay order creation
    pub async fn mock_razorpay_create_order(&self, order_id: &str) {
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": order_id,
                "entity": "order",
                "status": "created",
            })))
            .mount(&self.server)
            .await;
    }

    /// Stub the Razorpay payments listing for an order
    pub async fn mock_razorpay_order_payments(&self, order_id: &str, items: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/orders/{}/payments", order_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entity": "collection",
                "count": items.as_array().map(|a| a.len()).unwrap_or(0),
                "items": items,
            })))
            .mount(&self.server)
            .await;
    }

    /// A successful Cashfree payment record for the given amount
    pub fn cashfree_success(amount: i64, cf_payment_id: i64) -> Value {
        json!([{
            "cf_payment_id": cf_payment_id,
            "payment_amount": amount,
            "payment_status": "SUCCESS",
            "payment_group": "upi",
            "payment_message": "Transaction successful",
            "payment_time": "2025-09-02T14:01:55+05:30",
        }])
    }

    /// A failed Cashfree payment record with the gateway's own message
    pub fn cashfree_failure(amount: i64, message: &str) -> Value {
        json!([{
            "cf_payment_id": 77,
            "payment_amount": amount,
            "payment_status": "FAILED",
            "payment_group": "upi",
            "payment_message": message,
            "payment_time": null,
        }])
    }
}
