//! Unified error handling for the client.

use thiserror::Error;

/// Errors from one remote call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("remote error {status}: {body}")]
    Remote { status: u16, body: String },

    /// The response arrived but was not the expected JSON shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Top-level client error: a failed remote call or a domain-rule violation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Engine(#[from] acres_engine::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
