pub mod common;
pub mod lirapay;
pub mod voltpag;

pub use lirapay::handle_lirapay_webhook;
pub use voltpag::handle_voltpag_webhook;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook/lirapay", post(handle_lirapay_webhook))
        .route("/webhook/voltpag", post(handle_voltpag_webhook))
}
