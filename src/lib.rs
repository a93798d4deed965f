//! Sage library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod service;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How the answering service should treat a question.
///
/// Sent as the `mode` field of the ask request; `Auto` lets the service
/// decide (and is omitted from the wire body).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    #[default]
    Auto,
    Math,
    Summary,
}

impl AskMode {
    /// Cycles to the next mode (wraps around).
    pub fn next(self) -> AskMode {
        match self {
            AskMode::Auto => AskMode::Math,
            AskMode::Math => AskMode::Summary,
            AskMode::Summary => AskMode::Auto,
        }
    }

    /// Returns a human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            AskMode::Auto => "Auto",
            AskMode::Math => "Math",
            AskMode::Summary => "Summary",
        }
    }
}
