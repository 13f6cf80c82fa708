//! VoltPag webhook integration.
//!
//! VoltPag posts a flat camelCase transaction with no event-type field;
//! classification is by `status` alone, which VoltPag emits in whatever
//! casing its internal pipeline last touched. The shared secret arrives in
//! the `x-voltpag-token` header.

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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltPagWebhook {
    pub transaction_id: String,
    pub status: String,
    pub customer: Option<VoltPagCustomer>,
    #[serde(default)]
    pub items: Vec<VoltPagItem>,
    pub total_in_cents: Option<i64>,
    pub created_at: Option<String>,
    pub approved_at: Option<String>,
    pub utm: Option<VoltPagUtm>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltPagCustomer {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub cpf: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltPagItem {
    pub code: Option<String>,
    pub title: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price_in_cents: Option<i64>,
}

/// `src` and `sck` are single words, so only the utm fields actually differ
/// from the snake_case shape LiraPay uses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltPagUtm {
    pub src: Option<String>,
    pub sck: Option<String>,
    pub utm_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

fn is_approved(status: &str) -> bool {
    matches!(status.to_uppercase().as_str(), "APPROVED" | "PAID")
}

/// Flatten an approved VoltPag transaction into the attribution order shape.
fn normalize_order(webhook: VoltPagWebhook) -> OrderPayload {
    let customer = webhook.customer.unwrap_or_default();
    let utm = webhook.utm.unwrap_or_default();

    let products: Vec<OrderProduct> = webhook
        .items
        .into_iter()
        .map(|item| OrderProduct {
            id: item
                .code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(generated_product_id),
            name: name_or_placeholder(item.title.as_deref()),
            plan_id: None,
            plan_name: None,
            quantity: item.quantity.unwrap_or(1),
            price_in_cents: item.unit_price_in_cents.unwrap_or(0),
        })
        .collect();

    let total_in_cents = webhook
        .total_in_cents
        .unwrap_or_else(|| products.iter().map(|p| p.quantity * p.price_in_cents).sum());

    OrderPayload {
        order_id: webhook.transaction_id,
        platform: PLATFORM.to_string(),
        payment_method: PAYMENT_METHOD_PIX.to_string(),
        status: STATUS_PAID.to_string(),
        created_at: normalize_timestamp(webhook.created_at.as_deref()),
        approved_date: normalize_timestamp(webhook.approved_at.as_deref()),
        refunded_at: None,
        customer: OrderCustomer {
            name: name_or_placeholder(customer.full_name.as_deref()),
            email: customer.email,
            phone: customer.phone_number.as_deref().map(normalize_phone),
            document: customer.cpf.as_deref().map(normalize_document),
            country: CUSTOMER_COUNTRY_BR.to_string(),
            ip: customer.ip_address,
        },
        products,
        tracking_parameters: TrackingParameters {
            src: utm.src,
            sck: utm.sck,
            utm_source: utm.utm_source,
            utm_campaign: utm.utm_campaign,
            utm_medium: utm.utm_medium,
            utm_content: utm.utm_content,
            utm_term: utm.utm_term,
        },
        commission: Commission::from_total(total_in_cents),
        is_test: false,
    }
}

/// VoltPag webhook gateway implementation.
pub struct VoltPagGateway;

impl WebhookGateway for VoltPagGateway {
    fn gateway_name(&self) -> &'static str {
        "voltpag"
    }

    fn expected_secret<'a>(&self, config: &'a Config) -> Option<&'a str> {
        config.voltpag_webhook_secret.as_deref()
    }

    fn extract_credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let token = headers.get("x-voltpag-token")?.to_str().ok()?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    fn parse_event(&self, body: &Bytes) -> Result<GatewayEvent, ValidationError> {
        let webhook: VoltPagWebhook = serde_json::from_slice(body)?;

        if !is_approved(&webhook.status) {
            return Ok(GatewayEvent::Ignored {
                status: webhook.status,
            });
        }

        Ok(GatewayEvent::Approved(normalize_order(webhook)))
    }
}

/// Axum handler for VoltPag webhooks.
pub async fn handle_voltpag_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    handle_webhook(&VoltPagGateway, &state, headers, body).await
}
