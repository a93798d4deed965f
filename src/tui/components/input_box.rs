//! # InputBox Component
//!
//! The question input field.
//!
//! ## Responsibilities
//!
//! - Capture text input and basic editing (backspace, delete, cursor
//!   movement, paste, Ctrl+J newline)
//! - Handle submission (Enter); whitespace-only submits are refused here,
//!   before they ever become an action
//! - Clear on Escape (the event loop calls [`InputBox::clear`])
//!
//! The buffer and cursor are internal state; `dimmed` is a prop set by the
//! event loop while a request is in flight.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines the box will grow to
const MAX_VISIBLE_LINES: u16 = 5;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text content changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// Render dimmed while a request is pending (prop)
    pub dimmed: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            dimmed: false,
        }
    }

    /// Clears the buffer without submitting (Escape).
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Replaces the buffer (subject shortcuts) and puts the cursor at the end.
    pub fn set_text(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }

    /// Required height for the current buffer, clamped to the viewport limit.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        wrap_line_count(&self.buffer, width).min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Screen position of the cursor inside `area`, derived by wrapping the
    /// buffer the same way the render path does.
    fn cursor_screen_pos(&self, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        let (line_idx, column_width) = cursor_line_and_column(&self.buffer, self.cursor, width);
        let x = area.x + 2 + (column_width as u16).min(width.saturating_sub(1));
        let y = area.y + 1 + (line_idx as u16).min(MAX_VISIBLE_LINES.saturating_sub(1));
        (x, y)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, style) = if self.dimmed {
            (
                "Input (waiting for answer, Esc cancels)",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            )
        } else {
            ("Input", Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style)
            .title(title);

        let input = Paragraph::new(wrapped_text(&self.buffer, inner_width(area.width)))
            .block(block)
            .style(style);

        frame.render_widget(input, area);

        if !self.dimmed {
            let (cursor_x, cursor_y) = self.cursor_screen_pos(area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor = 0;
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

// ── Wrapping helpers ────────────────────────────────────────────────────────

/// Inner content width after subtracting border/padding overhead.
fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Build textwrap options configured for the input box inner width.
fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// The buffer, wrapped exactly as the height/cursor math assumes.
fn wrapped_text(buffer: &str, width: u16) -> String {
    if width == 0 {
        return buffer.to_string();
    }
    textwrap::wrap(buffer, wrap_options(width)).join("\n")
}

/// Count wrapped lines for the given text, accounting for trailing newlines
/// that textwrap may not represent as empty lines.
fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

/// Which wrapped line the cursor is on and its display-column width.
fn cursor_line_and_column(buffer: &str, cursor: usize, width: u16) -> (usize, usize) {
    if width == 0 || buffer.is_empty() || cursor == 0 {
        return (0, 0);
    }

    let lines = textwrap::wrap(buffer, wrap_options(width));

    // Byte span of a wrapped line including a trailing newline it absorbed
    let line_byte_span = |line: &str, offset: usize| -> usize {
        let has_newline =
            offset + line.len() < buffer.len() && buffer.as_bytes()[offset + line.len()] == b'\n';
        line.len() + usize::from(has_newline)
    };

    let mut byte_offset = 0;
    for (idx, line) in lines.iter().enumerate() {
        if byte_offset + line.len() >= cursor {
            let column = cursor.saturating_sub(byte_offset).min(line.len());
            return (idx, line[..column].width());
        }
        byte_offset += line_byte_span(line, byte_offset);
    }

    // Cursor past the last wrapped line (trailing newline)
    (lines.len(), 0)
}

/// Find the byte offset of the previous character boundary before `pos`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new();
        assert!(input.buffer.is_empty());
        assert!(!input.dimmed);
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");

        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        input.set_text("hello".to_string());

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_whitespace_only_submit_refused() {
        let mut input = InputBox::new();
        input.set_text("   \n ".to_string());

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        // Buffer untouched: no state change on refused submit
        assert_eq!(input.buffer, "   \n ");
    }

    #[test]
    fn test_escape_clear() {
        let mut input = InputBox::new();
        input.set_text("half-typed question".to_string());
        input.clear();
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::InputChar('é'));
        input.handle_event(&TuiEvent::InputChar('x'));
        input.handle_event(&TuiEvent::Backspace);
        input.handle_event(&TuiEvent::Backspace);
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_paste_moves_cursor_to_end_of_paste() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("pasted text".to_string()));
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "pasted text!");
    }

    #[test]
    fn test_calculate_height_grows_and_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);

        input.set_text("a\nb\nc".to_string());
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);

        input.set_text("a\nb\nc\nd\ne\nf\ng\nh".to_string());
        assert_eq!(
            input.calculate_height(40),
            MAX_VISIBLE_LINES + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn test_wrap_line_count_basics() {
        assert_eq!(wrap_line_count("", 80), 1);
        assert_eq!(wrap_line_count("hello", 0), 1);
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
        assert_eq!(wrap_line_count("a\nb\nc", 80), 3);
        assert_eq!(wrap_line_count("hello\n", 80), 2);
    }

    #[test]
    fn test_cursor_line_and_column() {
        // Cursor at end of "ab" on an 80-wide box: line 0, column 2
        assert_eq!(cursor_line_and_column("ab", 2, 80), (0, 2));
        // After an explicit newline: line 1, column 1
        assert_eq!(cursor_line_and_column("ab\ncd", 4, 80), (1, 1));
        // Wide char counts double
        assert_eq!(cursor_line_and_column("日x", 3, 80), (0, 2));
    }

    #[test]
    fn test_render_dimmed_while_loading() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = InputBox::new();
        input.dimmed = true;

        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("waiting for answer"));
    }
}
