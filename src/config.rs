//! Runtime configuration, loaded once at startup from the environment.

use std::env;

/// Default endpoint for the Utmify orders API.
pub const DEFAULT_UTMIFY_API_URL: &str = "https://api.utmify.com.br/api-credentials/orders";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared secret expected from LiraPay in the `authorization` header.
    pub lirapay_webhook_secret: Option<String>,
    /// Shared secret expected from VoltPag in the `x-voltpag-token` header.
    pub voltpag_webhook_secret: Option<String>,
    pub utmify_api_url: String,
    pub utmify_api_key: Option<String>,
    /// Optional URL that receives a JSON alert whenever a forward fails.
    pub alert_webhook_url: Option<String>,
    /// Marks every forwarded order as a test order.
    pub test_mode: bool,
}

impl Config {
    /// Reads configuration from the environment, falling back to defaults
    /// where a variable is unset. Loads `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            lirapay_webhook_secret: non_empty_var("LIRAPAY_WEBHOOK_SECRET"),
            voltpag_webhook_secret: non_empty_var("VOLTPAG_WEBHOOK_SECRET"),
            utmify_api_url: non_empty_var("UTMIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_UTMIFY_API_URL.to_string()),
            utmify_api_key: non_empty_var("UTMIFY_API_KEY"),
            alert_webhook_url: non_empty_var("ALERT_WEBHOOK_URL"),
            test_mode: env::var("RELAY_TEST_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// An empty string in the environment counts as unset. Deploy tooling often
/// exports blank placeholders for optional variables.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
