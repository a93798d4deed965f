//! Wire types for the `/ask` protocol, plus the one normalization step
//! that collapses the service's historical response shapes into a tagged
//! [`Outcome`] consumed uniformly by the rest of the app.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::AskMode;
use crate::core::transcript::Body;

/// Generic user-visible failure text. The detailed cause goes to the log.
pub const GENERIC_ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Fallback shown when a success reply carries no recognizable answer field.
pub const NO_RESPONSE_TEXT: &str = "No response.";

/// What a caller wants asked. Borrowed: the question lives in the reducer's
/// submit path and is only serialized here.
#[derive(Debug, Clone, Copy)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub mode: AskMode,
}

/// JSON body POSTed to `/ask`. `mode` is omitted when `Auto`; the service
/// treats a missing mode as auto, and older deployments reject unknown
/// fields poorly.
#[derive(Serialize, Debug)]
pub struct AskBody<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AskMode>,
}

impl<'a> From<AskRequest<'a>> for AskBody<'a> {
    fn from(req: AskRequest<'a>) -> Self {
        AskBody {
            question: req.question,
            mode: match req.mode {
                AskMode::Auto => None,
                other => Some(other),
            },
        }
    }
}

/// Raw success-status response body. The service has answered with one of
/// three shapes over its lifetime; all fields are optional and resolved by
/// [`AskReply::into_outcome`].
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct AskReply {
    /// Server-sanitized HTML (current contract).
    pub answer_html: Option<String>,
    /// Markdown or plain text (legacy contract).
    pub answer: Option<String>,
    /// Service-reported failure, sometimes present even on 200s.
    pub error: Option<String>,
}

/// Normalized result of one ask round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Answered { body: Body },
    Failed { message: String },
}

impl Outcome {
    /// The failure outcome every transport/API/parse error collapses to.
    pub fn generic_failure() -> Self {
        Outcome::Failed {
            message: GENERIC_ERROR_TEXT.to_string(),
        }
    }
}

impl AskReply {
    /// Collapses the reply's shape into a tagged outcome. Precedence:
    /// an explicit `error` wins, then `answer_html`, then legacy `answer`,
    /// then the "No response." fallback.
    pub fn into_outcome(self) -> Outcome {
        if let Some(detail) = self.error {
            warn!("Service reported an error in its reply body: {detail}");
            return Outcome::generic_failure();
        }
        if let Some(html) = self.answer_html {
            return Outcome::Answered {
                body: Body::Html(html),
            };
        }
        if let Some(text) = self.answer {
            return Outcome::Answered {
                body: Body::Markdown(text),
            };
        }
        warn!("Service reply carried no answer field, substituting fallback text");
        Outcome::Answered {
            body: Body::Plain(NO_RESPONSE_TEXT.to_string()),
        }
    }
}
