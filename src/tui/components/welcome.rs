//! # Welcome Component
//!
//! Shown while the transcript has no conversation yet. Mirrors the web
//! widget's welcome card: a greeting plus subject shortcuts, which prefill
//! the input when their function key is pressed. Disappears after the
//! first submit.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::config::SubjectEntry;
use crate::tui::component::Component;

pub struct Welcome<'a> {
    pub subjects: &'a [SubjectEntry],
    /// 0.0..1.0 breathing value for the greeting
    pub pulse_value: f32,
}

impl<'a> Welcome<'a> {
    pub fn new(subjects: &'a [SubjectEntry], pulse_value: f32) -> Self {
        Self {
            subjects,
            pulse_value,
        }
    }

    fn subject_line(&self) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, subject) in self.subjects.iter().take(9).enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(
                format!("F{}", i + 1),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                subject.label.clone(),
                Style::default().fg(Color::Gray),
            ));
        }
        Line::from(spans)
    }
}

impl<'a> Component for Welcome<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let greeting_style = if self.pulse_value > 0.5 {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let lines = vec![
            Line::from(Span::styled("Welcome to Sage", greeting_style)),
            Line::from(Span::styled(
                "Ask a homework question, or pick a subject:",
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
            self.subject_line(),
            Line::default(),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let text_height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(text_height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_subjects;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_welcome_lists_subjects_with_keys() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let subjects = default_subjects();

        terminal
            .draw(|f| {
                let mut welcome = Welcome::new(&subjects, 0.0);
                welcome.render(f, f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Welcome to Sage"));
        assert!(text.contains("F1"));
        assert!(text.contains("Math"));
        assert!(text.contains("F4"));
        assert!(text.contains("Literature"));
    }
}
