//! LiraPay webhook integration.
//!
//! LiraPay wraps its transactions in an event envelope
//! (`{"event": ..., "data": {...}}`) and authenticates with the shared
//! secret in the `authorization` header, with or without a `Bearer ` prefix.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::attribution::{
    Commission, OrderCustomer, OrderPayload, OrderProduct, TrackingParameters,
    CUSTOMER_COUNTRY_BR, PAYMENT_METHOD_PIX, PLATFORM, STATUS_PAID,
};
use crate::config::Config;
use crate::error::ValidationError;
use crate::normalize::{
    generated_product_id, name_or_placeholder, normalize_document, normalize_phone,
    normalize_timestamp,
};
use crate::state::AppState;

use super::common::{handle_webhook, GatewayEvent, WebhookGateway};

/// The only event type that carries a payment confirmation.
const EVENT_TRANSACTION_PROCESSED: &str = "transaction.processed";

#[derive(Debug, Deserialize)]
pub struct LiraPayWebhook {
    pub event: String,
    pub data: LiraPayTransaction,
}

#[derive(Debug, Deserialize)]
pub struct LiraPayTransaction {
    pub id: String,
    pub status: String,
    pub buyer: Option<LiraPayBuyer>,
    #[serde(default)]
    pub items: Vec<LiraPayItem>,
    /// Integer centavos.
    pub total_amount: Option<i64>,
    pub created_at: Option<String>,
    pub paid_at: Option<String>,
    pub tracking: Option<LiraPayTracking>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LiraPayBuyer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LiraPayItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<i64>,
    /// Unit price in integer centavos.
    pub amount: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LiraPayTracking {
    pub src: Option<String>,
    pub sck: Option<String>,
    pub utm_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

fn is_approved(event: &str, status: &str) -> bool {
    event == EVENT_TRANSACTION_PROCESSED && matches!(status, "paid" | "approved")
}

/// Flatten an approved LiraPay transaction into the attribution order shape.
fn normalize_order(tx: LiraPayTransaction) -> OrderPayload {
    let buyer = tx.buyer.unwrap_or_default();
    let tracking = tx.tracking.unwrap_or_default();

    let products: Vec<OrderProduct> = tx
        .items
        .into_iter()
        .map(|item| OrderProduct {
            id: item
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generated_product_id),
            name: name_or_placeholder(item.name.as_deref()),
            plan_id: None,
            plan_name: None,
            quantity: item.quantity.unwrap_or(1),
            price_in_cents: item.amount.unwrap_or(0),
        })
        .collect();

    // Trust the gateway's total when it sends one; otherwise sum the items.
    let total_in_cents = tx
        .total_amount
        .unwrap_or_else(|| products.iter().map(|p| p.quantity * p.price_in_cents).sum());

    OrderPayload {
        order_id: tx.id,
        platform: PLATFORM.to_string(),
        payment_method: PAYMENT_METHOD_PIX.to_string(),
        status: STATUS_PAID.to_string(),
        created_at: normalize_timestamp(tx.created_at.as_deref()),
        approved_date: normalize_timestamp(tx.paid_at.as_deref()),
        refunded_at: None,
        customer: OrderCustomer {
            name: name_or_placeholder(buyer.name.as_deref()),
            email: buyer.email,
            phone: buyer.phone.as_deref().map(normalize_phone),
            document: buyer.document.as_deref().map(normalize_document),
            country: CUSTOMER_COUNTRY_BR.to_string(),
            ip: buyer.ip,
        },
        products,
        tracking_parameters: TrackingParameters {
            src: tracking.src,
            sck: tracking.sck,
            utm_source: tracking.utm_source,
            utm_campaign: tracking.utm_campaign,
            utm_medium: tracking.utm_medium,
            utm_content: tracking.utm_content,
            utm_term: tracking.utm_term,
        },
        commission: Commission::from_total(total_in_cents),
        is_test: false,
    }
}

/// LiraPay webhook gateway implementation.
pub struct LiraPayGateway;

impl WebhookGateway for LiraPayGateway {
    fn gateway_name(&self) -> &'static str {
        "lirapay"
    }

    fn expected_secret<'a>(&self, config: &'a Config) -> Option<&'a str> {
        config.lirapay_webhook_secret.as_deref()
    }

    /// LiraPay sends the raw shared token in `authorization`. Some of their
    /// delivery workers prepend `Bearer `, so the prefix is optional.
    fn extract_credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let value = headers.get("authorization")?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    fn parse_event(&self, body: &Bytes) -> Result<GatewayEvent, ValidationError> {
        let webhook: LiraPayWebhook = serde_json::from_slice(body)?;

        if !is_approved(&webhook.event, &webhook.data.status) {
            return Ok(GatewayEvent::Ignored {
                status: format!("{}/{}", webhook.event, webhook.data.status),
            });
        }

        Ok(GatewayEvent::Approved(normalize_order(webhook.data)))
    }
}

/// Axum handler for LiraPay webhooks.
pub async fn handle_lirapay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    handle_webhook(&LiraPayGateway, &state, headers, body).await
}
