use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixrelay::config::Config;
use pixrelay::handlers;
use pixrelay::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixrelay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Missing credentials are request-time failures, never startup crashes,
    // but flag them now so a misconfigured deploy shows up in the first
    // screen of logs rather than in a gateway's delivery dashboard.
    if config.lirapay_webhook_secret.is_none() {
        tracing::warn!("LIRAPAY_WEBHOOK_SECRET not set: LiraPay deliveries will be answered 500");
    }
    if config.voltpag_webhook_secret.is_none() {
        tracing::warn!("VOLTPAG_WEBHOOK_SECRET not set: VoltPag deliveries will be answered 500");
    }
    if config.utmify_api_key.is_none() {
        tracing::warn!("UTMIFY_API_KEY not set: approved orders cannot be forwarded");
    }
    if config.alert_webhook_url.is_none() {
        tracing::info!("ALERT_WEBHOOK_URL not set: forward-failure alerts disabled");
    }
    if config.test_mode {
        tracing::info!("Running in TEST mode: forwarded orders are marked as test orders");
    }

    let addr = config.addr();
    let state = AppState::new(config);

    // Build the application router
    let app = Router::new()
        // Webhook endpoints (per-gateway shared-secret auth)
        .merge(handlers::webhooks::router())
        // Ops endpoints (no auth)
        .merge(handlers::ops::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Pixrelay listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
