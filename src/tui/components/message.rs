//! Renders a single transcript entry with author-based styling.
//!
//! `Message` is a transient component: created fresh each frame with the
//! data it needs. Height prediction must agree with what `Paragraph`
//! actually renders: plain text goes through `textwrap` with options that
//! match ratatui's wrapping, rich bodies use `Paragraph::line_count` on the
//! already-built `Text`.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Author, Body, Entry};
use crate::tui::markup;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Animation frames for the pending placeholder.
const PENDING_FRAMES: [&str; 4] = ["·    ", "· ·  ", "· · ·", "     "];

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

#[derive(Clone)]
pub struct Message<'a> {
    /// The entry to render
    pub entry: &'a Entry,
    /// Current pulse intensity (0.0 to 1.0) for the pending animation
    pub pulse_intensity: f32,
    /// Frame counter for the pending dots
    pub spinner_frame: usize,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a Entry, pulse_intensity: f32, spinner_frame: usize) -> Self {
        Self {
            entry,
            pulse_intensity,
            spinner_frame,
        }
    }

    /// Calculate the height required for this entry at the given width,
    /// without rendering it. The parent `MessageList` uses this to lay out
    /// the scroll view.
    pub fn calculate_height(entry: &Entry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        match &entry.body {
            _ if entry.author == Author::Pending => 1 + VERTICAL_OVERHEAD,
            Body::Plain(content) => {
                let content = content.trim();
                if content.is_empty() {
                    return VERTICAL_OVERHEAD;
                }
                let options = textwrap::Options::new(content_width as usize)
                    .break_words(true)
                    .word_separator(textwrap::WordSeparator::AsciiSpace);
                let lines = textwrap::wrap(content, options);
                (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
            }
            body => {
                let text = rich_text(body, author_style(entry.author).fg.unwrap_or(Color::Reset));
                let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
                (paragraph.line_count(content_width) as u16).max(1) + VERTICAL_OVERHEAD
            }
        }
    }
}

/// Builds the styled text for a rich (non-plain) body.
fn rich_text(body: &Body, base_fg: Color) -> Text<'static> {
    match body {
        Body::Plain(s) => Text::raw(s.trim().to_string()),
        Body::Markdown(s) => markup::render_markdown(s, base_fg),
        Body::Html(s) => markup::render_html(s, base_fg),
    }
}

fn author_role(author: Author) -> &'static str {
    match author {
        Author::Student => "you",
        Author::Helper | Author::Pending => "sage",
    }
}

fn author_style(author: Author) -> Style {
    match author {
        Author::Student => Style::default().fg(Color::Green),
        Author::Helper => Style::default().fg(Color::Blue),
        Author::Pending => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = author_style(self.entry.author);

        let mut border_style = style.add_modifier(Modifier::DIM);
        // Pending pulse: DIM → normal → BOLD breathing on the border
        if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = border_style
                .remove_modifier(Modifier::DIM)
                .add_modifier(Modifier::BOLD);
        } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let block = Block::bordered()
            .title(author_role(self.entry.author))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = if self.entry.author == Author::Pending {
            let dots = PENDING_FRAMES[(self.spinner_frame / 2) % PENDING_FRAMES.len()];
            Paragraph::new(dots).style(style)
        } else {
            match &self.entry.body {
                Body::Plain(content) => Paragraph::new(content.trim())
                    .style(style)
                    .wrap(Wrap { trim: true }),
                body => {
                    let text = rich_text(body, style.fg.unwrap_or(Color::Reset));
                    Paragraph::new(text).wrap(Wrap { trim: false })
                }
            }
        };

        paragraph.render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{Author, Body, Transcript};

    fn make_entry(author: Author, body: Body) -> Entry {
        let mut log = Transcript::new();
        let id = log.append(author, body);
        log.entries()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .unwrap()
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let entry = make_entry(Author::Student, Body::Plain("".into()));
        assert_eq!(Message::calculate_height(&entry, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let entry = make_entry(Author::Student, Body::Plain("Hello world".into()));
        assert_eq!(Message::calculate_height(&entry, 0), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let entry = make_entry(Author::Student, Body::Plain("Hello".into()));
        assert_eq!(
            Message::calculate_height(&entry, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // "Hello world" = 11 chars, width 9 → content_width = 5
        // Wraps to: "Hello" | "world" = 2 lines
        let entry = make_entry(Author::Student, Body::Plain("Hello world".into()));
        assert_eq!(Message::calculate_height(&entry, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_pending_is_one_line() {
        let entry = make_entry(Author::Pending, Body::Plain(String::new()));
        assert_eq!(
            Message::calculate_height(&entry, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_html_counts_rendered_lines() {
        // Two paragraphs render as 3 lines (blank line between)
        let entry = make_entry(Author::Helper, Body::Html("<p>one</p><p>two</p>".into()));
        assert_eq!(
            Message::calculate_height(&entry, 80),
            3 + VERTICAL_OVERHEAD
        );
    }

    // ==========================================================================
    // Style tests
    // ==========================================================================

    #[test]
    fn style_student_is_green() {
        assert_eq!(author_style(Author::Student).fg, Some(Color::Green));
    }

    #[test]
    fn style_helper_is_blue() {
        assert_eq!(author_style(Author::Helper).fg, Some(Color::Blue));
    }

    #[test]
    fn style_pending_is_dark_gray_italic() {
        let style = author_style(Author::Pending);
        assert_eq!(style.fg, Some(Color::DarkGray));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn role_labels() {
        assert_eq!(author_role(Author::Student), "you");
        assert_eq!(author_role(Author::Helper), "sage");
        assert_eq!(author_role(Author::Pending), "sage");
    }

    // ==========================================================================
    // Render tests
    // ==========================================================================

    #[test]
    fn render_html_body_shows_content_not_tags() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let entry = make_entry(Author::Helper, Body::Html("<p>42</p>".into()));
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let widget = Message::new(&entry, 0.0, 0);
                f.render_widget(widget, f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("42"));
        assert!(!text.contains("<p>"), "tags must not be shown literally");
    }
}
