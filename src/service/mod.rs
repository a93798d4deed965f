//! # Answering Service
//!
//! Everything that talks to (or stands in for) the remote answering
//! service. The rest of the crate sees one seam: the [`AnswerService`]
//! trait, returning a normalized [`Outcome`]-producing reply.

pub mod client;
pub mod http;
pub mod types;

pub use client::{AnswerService, ServiceError};
pub use http::HttpAnswerService;
pub use types::{AskBody, AskReply, AskRequest, Outcome};
