//! # TitleBar Component
//!
//! Top status bar showing where questions go, the current ask mode, and
//! transient status text. Purely presentational: all three props come from
//! elsewhere (endpoint and mode from core App state, unseen-content flag
//! from TUI scroll state) and the bar just renders what it's given.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

/// Top status bar component.
pub struct TitleBar {
    /// Where questions are sent (base URL, display only)
    pub endpoint: String,
    /// Current ask mode label ("Auto", "Math", "Summary")
    pub mode_label: &'static str,
    /// Transient status (e.g. "Thinking...", "Cancelled")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        endpoint: String,
        mode_label: &'static str,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            endpoint,
            mode_label,
            status_message,
            has_unseen_content,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let base = format!("Sage ({}) [{}]", self.endpoint, self.mode_label);
        let title_text = if self.has_unseen_content && !self.status_message.is_empty() {
            format!("{} | {} | ↓ New", base, self.status_message)
        } else if self.has_unseen_content {
            format!("{} | ↓ New", base)
        } else if self.status_message.is_empty() {
            base
        } else {
            format!("{} | {}", base, self.status_message)
        };

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_shows_endpoint_and_mode() {
        let mut bar = TitleBar::new("http://localhost:5000".into(), "Auto", String::new(), false);
        let text = render_to_string(&mut bar);
        assert!(text.contains("Sage (http://localhost:5000) [Auto]"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_title_bar_with_status() {
        let mut bar = TitleBar::new(
            "http://localhost:5000".into(),
            "Math",
            "Thinking...".into(),
            false,
        );
        let text = render_to_string(&mut bar);
        assert!(text.contains("[Math]"));
        assert!(text.contains("Thinking..."));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut bar = TitleBar::new("http://localhost:5000".into(), "Auto", String::new(), true);
        let text = render_to_string(&mut bar);
        assert!(text.contains("↓ New"));
    }
}
