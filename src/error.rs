use thiserror::Error;

/// A webhook body that could not be turned into an order. Always answered
/// with 400 so the gateway knows the payload itself is the problem.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError(err.to_string())
    }
}

/// Failure while forwarding an order to the attribution platform.
#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("attribution api key not configured")]
    MissingApiKey,

    #[error("attribution request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("attribution platform returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}
