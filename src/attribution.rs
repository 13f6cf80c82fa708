//! Outbound order model and HTTP client for the Utmify attribution platform.
//!
//! Every approved PIX transaction, whichever gateway it came from, is
//! flattened into an [`OrderPayload`] and POSTed to the Utmify orders
//! endpoint with the account's API key in `x-api-token`.

use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::error::AttributionError;

/// Platform name reported with every order.
pub const PLATFORM: &str = "RecargaPlay";

/// The storefront only sells via PIX.
pub const PAYMENT_METHOD_PIX: &str = "pix";

/// Only approved transactions are relayed, so the status is always `paid`.
pub const STATUS_PAID: &str = "paid";

pub const CURRENCY_BRL: &str = "BRL";

pub const CUSTOMER_COUNTRY_BR: &str = "BR";

/// An order in the shape the attribution platform ingests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_id: String,
    pub platform: String,
    pub payment_method: String,
    pub status: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub created_at: String,
    pub approved_date: String,
    pub refunded_at: Option<String>,
    pub customer: OrderCustomer,
    pub products: Vec<OrderProduct>,
    pub tracking_parameters: TrackingParameters,
    pub commission: Commission,
    pub is_test: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub country: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub id: String,
    pub name: String,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    pub quantity: i64,
    pub price_in_cents: i64,
}

/// UTM parameters and click ids. The platform expects these keys in
/// snake_case, unlike the rest of the payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackingParameters {
    pub src: Option<String>,
    pub sck: Option<String>,
    pub utm_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub total_price_in_cents: i64,
    pub gateway_fee_in_cents: i64,
    pub user_commission_in_cents: i64,
    pub currency: String,
}

impl Commission {
    /// Commission breakdown for a relay that does not track gateway fees:
    /// the full amount is attributed to the seller.
    pub fn from_total(total_in_cents: i64) -> Self {
        Self {
            total_price_in_cents: total_in_cents,
            gateway_fee_in_cents: 0,
            user_commission_in_cents: total_in_cents,
            currency: CURRENCY_BRL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributionClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl AttributionClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.utmify_api_url.clone(),
            api_key: config.utmify_api_key.clone(),
        }
    }

    /// POST one order to the platform. The response body of a rejection is
    /// captured whole so the caller can log exactly what the platform said.
    pub async fn send_order(&self, order: &OrderPayload) -> Result<(), AttributionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AttributionError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-token", api_key)
            .json(order)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttributionError::Rejected { status, body });
        }

        tracing::info!("Order {} forwarded to attribution platform", order.order_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> OrderPayload {
        OrderPayload {
            order_id: "tx-1".to_string(),
            platform: PLATFORM.to_string(),
            payment_method: PAYMENT_METHOD_PIX.to_string(),
            status: STATUS_PAID.to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
            approved_date: "2024-01-01 00:01:00".to_string(),
            refunded_at: None,
            customer: OrderCustomer {
                name: "Ana".to_string(),
                email: Some("ana@example.com".to_string()),
                phone: Some("11999998888".to_string()),
                document: Some("12345678909".to_string()),
                country: CUSTOMER_COUNTRY_BR.to_string(),
                ip: None,
            },
            products: vec![OrderProduct {
                id: "p1".to_string(),
                name: "Recarga 1000".to_string(),
                plan_id: None,
                plan_name: None,
                quantity: 1,
                price_in_cents: 1999,
            }],
            tracking_parameters: TrackingParameters {
                utm_source: Some("facebook".to_string()),
                ..Default::default()
            },
            commission: Commission::from_total(1999),
            is_test: false,
        }
    }

    #[test]
    fn order_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample_order()).unwrap();

        assert!(value.get("orderId").is_some());
        assert!(value.get("paymentMethod").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("approvedDate").is_some());
        assert!(value.get("refundedAt").is_some());
        assert!(value.get("isTest").is_some());
        assert!(
            value.get("order_id").is_none(),
            "snake_case keys must not leak into the wire format"
        );
    }

    #[test]
    fn tracking_parameters_stay_snake_case() {
        let value = serde_json::to_value(sample_order()).unwrap();
        let tracking = value.get("trackingParameters").unwrap();

        assert_eq!(tracking["utm_source"], "facebook");
        assert!(tracking.get("utmSource").is_none());
        // Unset parameters are serialized as explicit nulls.
        assert!(tracking["utm_term"].is_null());
    }

    #[test]
    fn product_prices_use_cents_keys() {
        let value = serde_json::to_value(sample_order()).unwrap();

        assert_eq!(value["products"][0]["priceInCents"], 1999);
        assert_eq!(value["commission"]["totalPriceInCents"], 1999);
        assert_eq!(value["commission"]["gatewayFeeInCents"], 0);
        assert_eq!(value["commission"]["userCommissionInCents"], 1999);
        assert_eq!(value["commission"]["currency"], "BRL");
    }

    #[test]
    fn commission_from_total_attributes_everything_to_the_seller() {
        let commission = Commission::from_total(5000);
        assert_eq!(commission.total_price_in_cents, 5000);
        assert_eq!(commission.gateway_fee_in_cents, 0);
        assert_eq!(commission.user_commission_in_cents, 5000);
    }
}
