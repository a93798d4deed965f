//! # Core Application Logic
//!
//! This module contains Sage's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Transcript (log)     │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Service   │      │  Another   │
//!     │  Adapter   │      │  (reqwest) │      │  surface   │
//!     │ (ratatui)  │      │            │      │  (future)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct: all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer: the message
//!   lifecycle (submit → loading → resolved/error) lives here
//! - [`transcript`]: The append-only message log
//! - [`responder`]: Local date/time answers, no network
//! - [`config`]: TOML config with defaults → file → env → CLI resolution

pub mod action;
pub mod config;
pub mod responder;
pub mod state;
pub mod transcript;
