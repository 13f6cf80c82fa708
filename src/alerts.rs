//! Operational alerts for failed forwards.
//!
//! When configured via `ALERT_WEBHOOK_URL`, the relay emits a JSON alert
//! every time an approved order could not be delivered to the attribution
//! platform. The gateway has already been answered by then, so alerting is
//! strictly fire-and-forget.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use reqwest::Client;
use serde::Serialize;

/// Retry delays in milliseconds for alert webhooks.
/// Quick retries only; total worst case is 300ms per alert.
const ALERT_RETRY_DELAYS: &[u64] = &[100, 200];

/// Alert payload describing one failed forward.
#[derive(Debug, Clone, Serialize)]
pub struct RelayAlert {
    /// Gateway the webhook came from: "lirapay", "voltpag"
    pub gateway: String,
    /// Gateway transaction id of the order that failed to forward
    pub order_id: String,
    /// What went wrong, including any response body from the platform
    pub error: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub occurred_at: String,
}

/// Spawn a fire-and-forget alert for a failed forward.
///
/// If no alert URL is configured, this is a no-op.
/// The alert is sent in a background task and failures don't affect the caller.
/// Panics in the spawned task are logged rather than silently swallowed.
pub fn spawn_relay_alert(client: Client, alert_url: Option<String>, alert: RelayAlert) {
    if let Some(url) = alert_url {
        let order_id = alert.order_id.clone();
        tokio::spawn(
            AssertUnwindSafe(async move {
                send_alert(&client, &url, &alert).await;
            })
            .catch_unwind()
            .map(move |result| {
                if let Err(panic) = result {
                    let panic_msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(
                        "Alert task panicked for order '{}': {}",
                        order_id,
                        panic_msg
                    );
                }
            }),
        );
    }
}

/// Send one alert to the configured webhook URL.
///
/// Uses quick retries (100ms, 200ms delays). Failures are logged and
/// dropped; an alert about an alert would not go anywhere useful.
async fn send_alert(client: &Client, url: &str, alert: &RelayAlert) {
    for (attempt, delay_ms) in std::iter::once(&0u64)
        .chain(ALERT_RETRY_DELAYS.iter())
        .enumerate()
    {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
        }

        match client
            .post(url)
            .json(alert)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                if attempt > 0 {
                    tracing::debug!("Alert webhook succeeded after {} retries", attempt);
                }
                return;
            }
            Ok(resp) => {
                tracing::debug!("Alert webhook returned {}", resp.status());
            }
            Err(e) => {
                tracing::debug!("Alert webhook failed: {}", e);
            }
        }
    }

    tracing::warn!(
        "Alert webhook failed after {} attempts",
        ALERT_RETRY_DELAYS.len() + 1
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delays_are_quick() {
        let total_delay: u64 = ALERT_RETRY_DELAYS.iter().sum();
        assert!(total_delay < 500, "Retry delays should be quick");
        assert_eq!(total_delay, 300); // 100 + 200
    }

    #[test]
    fn test_alert_serialization() {
        let alert = RelayAlert {
            gateway: "lirapay".to_string(),
            order_id: "tx_123".to_string(),
            error: "attribution platform returned 503 Service Unavailable: busy".to_string(),
            occurred_at: "2024-01-01 00:00:00".to_string(),
        };

        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"gateway\":\"lirapay\""));
        assert!(json.contains("\"order_id\":\"tx_123\""));
        assert!(json.contains("\"occurred_at\":\"2024-01-01 00:00:00\""));
    }
}
