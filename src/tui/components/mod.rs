//! # TUI Components
//!
//! Components follow two patterns:
//!
//! - **Stateless (props-based)**: receive all data as struct fields, render
//!   it, hold nothing between frames: `TitleBar`, `Message`, `Welcome`.
//! - **Stateful (event-driven)**: manage local state and emit high-level
//!   events: `InputBox`, `MessageListState`.
//!
//! Each component file contains its state types, event types, rendering
//! logic, and tests, so one file tells the whole story.

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod welcome;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
pub use welcome::Welcome;
