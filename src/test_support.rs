//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::service::{AnswerService, AskReply, AskRequest, ServiceError};

/// An in-memory service that replays a scripted sequence of replies.
/// Records every question it is asked.
pub struct ScriptedService {
    replies: Mutex<Vec<Result<AskReply, ServiceError>>>,
    pub questions: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new(replies: Vec<Result<AskReply, ServiceError>>) -> Self {
        let mut replies = replies;
        replies.reverse(); // pop() from the back in script order
        Self {
            replies: Mutex::new(replies),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// A service that never gets asked anything. Suitable for reducer and
    /// component tests.
    pub fn unreachable() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl AnswerService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ask(&self, request: AskRequest<'_>) -> Result<AskReply, ServiceError> {
        self.questions
            .lock()
            .unwrap()
            .push(request.question.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ServiceError::Network("script exhausted".into())))
    }
}

/// Creates a test App backed by a service that must not be called.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(ScriptedService::unreachable()),
        "http://test.invalid".to_string(),
    )
}
