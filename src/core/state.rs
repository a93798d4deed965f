//! # Application State
//!
//! Core business state for Sage. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── service: Arc<dyn AnswerService>  // answering service client
//! ├── transcript: Transcript           // ordered message log
//! ├── status_message: String           // status bar text
//! ├── endpoint_label: String           // where questions go (display only)
//! ├── mode: AskMode                    // ask mode sent with each question
//! ├── is_loading: bool                 // single-flight guard
//! ├── pending_entry: Option<EntryId>   // handle of the loading placeholder
//! ├── error: Option<String>            // fatal error message
//! └── subjects: Vec<SubjectEntry>      // shortcut cards
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::AskMode;
use crate::core::config::{ResolvedConfig, SubjectEntry};
use crate::core::transcript::{EntryId, Transcript};
use crate::service::AnswerService;

pub struct App {
    pub service: Arc<dyn AnswerService>,
    pub transcript: Transcript,
    pub status_message: String,
    pub endpoint_label: String,
    pub mode: AskMode,
    /// True from request dispatch until resolution. While set, further
    /// submits are refused: the single-flight guard.
    pub is_loading: bool,
    /// Handle of the transient loading placeholder. Some exactly while
    /// `is_loading` is true.
    pub pending_entry: Option<EntryId>,
    pub error: Option<String>,
    pub subjects: Vec<SubjectEntry>,
}

impl App {
    pub fn new(service: Arc<dyn AnswerService>, endpoint_label: String) -> Self {
        Self {
            service,
            transcript: Transcript::new(),
            status_message: String::from("Ask me anything!"),
            endpoint_label,
            mode: AskMode::default(),
            is_loading: false,
            pending_entry: None,
            error: None,
            subjects: crate::core::config::default_subjects(),
        }
    }

    pub fn from_config(service: Arc<dyn AnswerService>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(service, config.base_url.clone());
        app.mode = config.mode;
        app.subjects = config.subjects.clone();
        app
    }
}
