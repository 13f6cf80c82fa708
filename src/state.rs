//! Shared application state handed to every handler.

use std::sync::Arc;

use reqwest::Client;

use crate::attribution::AttributionClient;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Client for the attribution platform's orders endpoint.
    pub attribution: AttributionClient,
    /// Bare HTTP client, reused for alert webhooks.
    pub http_client: Client,
}

impl AppState {
    /// Builds the state around a single connection pool: one reqwest client
    /// shared by the attribution client and the alert sender.
    pub fn new(config: Config) -> Self {
        let http_client = Client::new();
        let attribution = AttributionClient::new(http_client.clone(), &config);

        Self {
            config: Arc::new(config),
            attribution,
            http_client,
        }
    }
}
