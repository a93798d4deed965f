//! HTTP implementation of [`AnswerService`] against the `/ask` endpoint.
//!
//! One POST per question, JSON in, JSON out. The client carries a request
//! timeout so a hung call can never leave the UI disabled indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::client::{AnswerService, ServiceError};
use super::types::{AskBody, AskReply, AskRequest};

/// Answering service reachable over HTTP.
pub struct HttpAnswerService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnswerService {
    /// Creates a new client for the service at `base_url` (no trailing
    /// `/ask`; that path is appended per request).
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, request: AskRequest<'_>) -> Result<AskReply, ServiceError> {
        let body = AskBody::from(request);
        info!(
            "Asking {}/ask (mode={:?}, question_len={})",
            self.base_url,
            request.mode,
            request.question.len()
        );

        let response = self
            .client
            .post(format!("{}/ask", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Service response status: {status}");

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            // Non-2xx bodies sometimes carry {"error": "..."}; pull the
            // detail out for the log when they do.
            let message = serde_json::from_str::<AskReply>(&err_body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(err_body);
            warn!("Service error: {} - {}", status.as_u16(), message);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: AskReply = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        debug!(
            "Service reply fields: answer_html={}, answer={}, error={}",
            reply.answer_html.is_some(),
            reply.answer.is_some(),
            reply.error.is_some()
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slash() {
        let svc =
            HttpAnswerService::new("http://localhost:5000/".into(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(svc.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_name() {
        let svc =
            HttpAnswerService::new("http://localhost:5000".into(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(svc.name(), "http");
    }
}
