use std::fmt;

use async_trait::async_trait;

use super::types::{AskReply, AskRequest};

/// Errors that can occur while asking the answering service.
/// Variants carry enough info for the log; the UI collapses all of them
/// to one generic message.
#[derive(Debug)]
pub enum ServiceError {
    /// Client misconfigured (bad endpoint URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service returned a non-success HTTP status.
    Api { status: u16, message: String },
    /// Failed to parse the service's response body.
    Parse(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "config error: {msg}"),
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Returns the name of the service (for logging).
    fn name(&self) -> &str;

    /// Sends one question and returns the service's reply. One call per
    /// user message; no caching, no retries.
    async fn ask(&self, request: AskRequest<'_>) -> Result<AskReply, ServiceError>;
}
