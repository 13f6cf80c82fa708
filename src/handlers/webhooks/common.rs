//! Common webhook handling infrastructure for payment gateways.
//!
//! This module provides a trait-based approach to unify the LiraPay and
//! VoltPag webhook handlers: each gateway contributes credential extraction
//! and payload parsing, while the flow that authenticates, classifies, and
//! forwards lives here once.

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::alerts::{spawn_relay_alert, RelayAlert};
use crate::attribution::OrderPayload;
use crate::config::Config;
use crate::error::{AttributionError, ValidationError};
use crate::normalize;
use crate::state::AppState;

/// Result type for webhook operations.
pub type WebhookResult = (StatusCode, Json<Ack>);

/// Body of every webhook response. Gateways act on the status code alone;
/// the message is for humans reading delivery logs.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
}

fn ack(status: StatusCode, message: &'static str) -> WebhookResult {
    (status, Json(Ack { message }))
}

/// Parsed webhook event with gateway-agnostic data.
#[derive(Debug)]
pub enum GatewayEvent {
    /// Payment confirmed - forward the order to the attribution platform
    Approved(OrderPayload),
    /// Anything else: pending, refused, refunded, chargeback
    Ignored { status: String },
}

/// Trait for payment gateway webhook handling.
///
/// Implementors provide gateway-specific credential extraction and payload
/// parsing, while the common processing logic handles authentication,
/// classification, and forwarding.
pub trait WebhookGateway: Send + Sync {
    /// Gateway name for logging and alerts (e.g., "lirapay", "voltpag")
    fn gateway_name(&self) -> &'static str;

    /// The shared secret this gateway must present, if one is provisioned.
    fn expected_secret<'a>(&self, config: &'a Config) -> Option<&'a str>;

    /// Extract the credential from request headers.
    fn extract_credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str>;

    /// Parse the webhook payload into a gateway-agnostic event.
    fn parse_event(&self, body: &Bytes) -> Result<GatewayEvent, ValidationError>;
}

/// Constant-time comparison of the presented credential against the secret.
/// The length check is not constant-time, but a credential's length is not
/// the secret part of it.
fn credential_matches(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.len() != provided.len() {
        return false;
    }

    expected.ct_eq(provided).into()
}

/// Generic webhook handler that delegates to gateway-specific implementations.
///
/// Order matters here: configuration, then authentication, then parsing.
/// A caller without the right credential learns nothing about whether its
/// payload would have parsed.
pub async fn handle_webhook<G: WebhookGateway>(
    gateway: &G,
    state: &AppState,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResult {
    let name = gateway.gateway_name();

    let Some(expected) = gateway.expected_secret(&state.config) else {
        tracing::error!("{} webhook received but its secret is not configured", name);
        return ack(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Webhook secret not configured",
        );
    };

    let Some(provided) = gateway.extract_credential(&headers) else {
        tracing::warn!("{} webhook rejected: missing credential", name);
        return ack(StatusCode::UNAUTHORIZED, "Missing credential");
    };

    if !credential_matches(expected, provided) {
        tracing::warn!("{} webhook rejected: invalid credential", name);
        return ack(StatusCode::UNAUTHORIZED, "Invalid credential");
    }

    let event = match gateway.parse_event(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("{} webhook payload is unusable: {}", name, e);
            return ack(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    match event {
        GatewayEvent::Approved(mut order) => {
            order.is_test = state.config.test_mode;
            forward_order(name, state, order).await
        }
        GatewayEvent::Ignored { status } => {
            tracing::info!("{} event ignored: {}", name, status);
            ack(StatusCode::OK, "Event ignored")
        }
    }
}

/// Forward an approved order to the attribution platform.
///
/// Downstream failures still answer the gateway with 200: redelivering the
/// same webhook cannot fix the attribution platform, and a non-2xx here only
/// triggers a retry storm. The failure is logged with the full payload so
/// the order can be replayed by hand, and an alert is fired.
async fn forward_order(gateway: &'static str, state: &AppState, order: OrderPayload) -> WebhookResult {
    match state.attribution.send_order(&order).await {
        Ok(()) => ack(StatusCode::OK, "OK"),
        Err(AttributionError::MissingApiKey) => {
            tracing::error!(
                "{} order {} not forwarded: attribution API key not configured",
                gateway,
                order.order_id
            );
            ack(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Attribution platform not configured",
            )
        }
        Err(err) => {
            let payload = serde_json::to_string(&order).unwrap_or_default();
            tracing::error!(
                "Failed to forward {} order {}: {} (payload: {})",
                gateway,
                order.order_id,
                err,
                payload
            );

            spawn_relay_alert(
                state.http_client.clone(),
                state.config.alert_webhook_url.clone(),
                RelayAlert {
                    gateway: gateway.to_string(),
                    order_id: order.order_id.clone(),
                    error: err.to_string(),
                    occurred_at: normalize::format_timestamp(chrono::Utc::now()),
                },
            );

            ack(StatusCode::OK, "OK")
        }
    }
}
