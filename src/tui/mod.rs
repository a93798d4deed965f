//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The core neither spawns tasks nor draws; it hands back `Effect` values
//! and this loop performs them.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (welcome screen, pending request): draws every ~80ms
//!   for a smooth pulse/spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on
//! every `draw()` call, making blinking cursors appear erratic during
//! continuous redraws.

mod component;
mod components;
mod event;
pub mod markup;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::service::types::Outcome;
use crate::service::{AnswerService, AskRequest, HttpAnswerService};
use crate::tui::component::EventHandler as _;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Animation state
    pub pulse_value: f32,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            pulse_value: 0.0,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Build the answering-service client from a resolved config.
pub fn build_service(config: &ResolvedConfig) -> Arc<dyn AnswerService> {
    let service = HttpAnswerService::new(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .expect("failed to construct the HTTP client for the answering service");
    Arc::new(service)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service = build_service(&config);
    let mut app = App::from_config(service, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from the background ask task
    let (tx, rx) = mpsc::channel();

    // Abort handle for the in-flight request (used by Escape-to-cancel)
    let mut active_abort: Option<tokio::task::AbortHandle> = None;

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    while !should_quit {
        // Welcome screen and pending spinner both animate
        let animating = app.is_loading || !app.transcript.has_conversation();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs the redraw already flagged above
                TuiEvent::Resize => {}

                TuiEvent::ForceQuit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        should_quit = true;
                    }
                }

                TuiEvent::CycleMode => {
                    update(&mut app, Action::CycleMode);
                }

                // Escape cancels the in-flight request, otherwise clears input
                TuiEvent::Escape => {
                    if app.is_loading {
                        if update(&mut app, Action::CancelAsk) == Effect::AbortAsk
                            && let Some(handle) = active_abort.take()
                        {
                            handle.abort();
                        }
                    } else {
                        tui.input_box.clear();
                    }
                }

                // Subject shortcut: prefill the input
                TuiEvent::Subject(i) => {
                    if !app.is_loading
                        && let Some(subject) = app.subjects.get(i)
                    {
                        tui.input_box.set_text(subject.prompt_text());
                    }
                }

                // Scrolling always reaches the message list
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                }

                // Everything else is input editing; refused while a request
                // is pending (the single-flight guard's UI half)
                other => {
                    if app.is_loading {
                        continue;
                    }
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&other)
                        && let Effect::SpawnAsk(question) = update(&mut app, Action::Submit(text))
                    {
                        active_abort = Some(spawn_ask(&app, tx.clone(), question));
                    }
                }
            }
        }

        // Handle the background task's resolution
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            log::debug!("Event loop received: {:?}", action);
            if update(&mut app, action) == Effect::Quit {
                should_quit = true;
            }
            if !app.is_loading {
                active_abort = None;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Spawns the one ask round-trip onto the runtime. Every failure collapses
/// to the generic outcome here; the detailed cause only reaches the log.
fn spawn_ask(app: &App, tx: mpsc::Sender<Action>, question: String) -> tokio::task::AbortHandle {
    info!("Spawning ask request (question_len={})", question.len());

    let service = app.service.clone();
    let mode = app.mode;

    let handle = tokio::spawn(async move {
        let outcome = match service.ask(AskRequest {
            question: &question,
            mode,
        })
        .await
        {
            Ok(reply) => reply.into_outcome(),
            Err(e) => {
                log::error!("Ask failed: {e}");
                Outcome::generic_failure()
            }
        };
        if tx.send(Action::Resolved(outcome)).is_err() {
            warn!("Failed to deliver resolution: receiver dropped");
        }
    });
    handle.abort_handle()
}
