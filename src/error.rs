//! Error types shared by the data-access client, the section units and the
//! navigation engine.
//!
//! Nothing here is fatal: every variant is recovered at the boundary where it
//! occurs (see `nav` for auth failures, `sections` for load/mutation failures).

use thiserror::Error;

/// Failure talking to the Distribution API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Request never produced a response (offline, DNS, timeout, CORS)
    #[error("network error: {0}")]
    Network(String),

    /// Single-entity lookup on an id the API does not know
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Session missing or expired
    #[error("not authenticated")]
    Unauthorized,

    /// Any other non-success status; `message` is the API's `error` field
    /// when it sent one
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid API url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message suitable for an inline notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server. Please try again.".to_string(),
            Self::NotFound { resource, .. } => format!("The requested {resource} no longer exists."),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { status, .. } => format!("The server rejected the request ({status})."),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::InvalidUrl(_) => "The portal is misconfigured.".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Local validation failure, raised before any write is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields(Vec<String>),

    #[error("{field} must be a number")]
    NotANumber { field: String },

    #[error("Payment must be for the full order amount. Partial payments are not allowed.")]
    PartialPayment { expected_cents: i64, given_cents: i64 },

    #[error("Order {0} is not awaiting payment")]
    UnknownOrder(String),
}
