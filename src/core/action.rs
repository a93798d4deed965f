//! # Actions
//!
//! Everything that can happen in Sage becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The service replies? That's `Action::Resolved(outcome)`.
//!
//! The `update()` function takes the current state and an action,
//! then returns an `Effect` describing the I/O the caller must perform.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on the transcript.
//! The submit → loading → resolved/error lifecycle lives entirely in this
//! file.

use log::{debug, info, warn};

use crate::core::responder;
use crate::core::state::App;
use crate::core::transcript::{Author, Body};
use crate::service::Outcome;

#[derive(Debug, PartialEq)]
pub enum Action {
    /// The input controller accepted a submission (text not yet trimmed).
    Submit(String),
    /// The ask round-trip finished, successfully or not.
    Resolved(Outcome),
    /// The user cancelled the in-flight request (Escape while loading).
    CancelAsk,
    /// Cycle the ask mode (Ctrl+R).
    CycleMode,
    Quit,
}

/// What the caller must do after an update. The reducer itself performs
/// no I/O.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Dispatch the question to the answering service on a background task.
    SpawnAsk(String),
    /// Abort the in-flight request task.
    AbortAsk,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),
        Action::Resolved(outcome) => resolved(app, outcome),
        Action::CancelAsk => cancel(app),
        Action::CycleMode => {
            app.mode = app.mode.next();
            app.status_message = format!("Mode: {}", app.mode.label());
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    let question = text.trim();

    // Empty input: no-op, no state change
    if question.is_empty() {
        return Effect::None;
    }

    // Single-flight guard: one outstanding request at a time
    if app.is_loading {
        debug!("Submit refused while a request is pending");
        return Effect::None;
    }

    let question = question.to_string();
    app.transcript
        .append(Author::Student, Body::Plain(question.clone()));

    // Date/time questions are answered locally, in this same call:
    // no request, no pending entry.
    if let Some(answer) = responder::local_answer(&question) {
        info!("Question answered by the local responder");
        app.transcript.append(Author::Helper, Body::Plain(answer));
        app.status_message = String::new();
        return Effect::None;
    }

    app.pending_entry = Some(
        app.transcript
            .append(Author::Pending, Body::Plain(String::new())),
    );
    app.is_loading = true;
    app.status_message = String::from("Thinking...");
    Effect::SpawnAsk(question)
}

fn resolved(app: &mut App, outcome: Outcome) -> Effect {
    // A resolution may arrive after the user already cancelled; the
    // transcript must not gain a stray answer for a withdrawn question.
    if !app.is_loading {
        debug!("Dropping resolution for a cancelled request");
        return Effect::None;
    }

    // The pending placeholder always goes away before the resolution
    // entry is appended.
    clear_pending(app);

    match outcome {
        Outcome::Answered { body } => {
            app.transcript.append(Author::Helper, body);
            app.status_message = String::new();
        }
        Outcome::Failed { message } => {
            app.transcript.append(Author::Helper, Body::Plain(message));
            app.status_message = String::from("Request failed");
        }
    }
    Effect::None
}

fn cancel(app: &mut App) -> Effect {
    if !app.is_loading {
        return Effect::None;
    }
    clear_pending(app);
    app.status_message = String::from("Cancelled");
    info!("In-flight request cancelled");
    Effect::AbortAsk
}

fn clear_pending(app: &mut App) {
    if let Some(id) = app.pending_entry.take() {
        if !app.transcript.remove(id) {
            warn!("Pending entry {id:?} was already gone");
        }
    }
    app.is_loading = false;
}
