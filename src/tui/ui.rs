//! Frame composition: title bar, main area (welcome / transcript / error),
//! input box.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::widgets::{Block, Paragraph};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar, Welcome};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    // Main area - error, welcome, or transcript
    if let Some(error_msg) = &app.error {
        draw_error_view(frame, main_area, error_msg);
    } else if !app.transcript.has_conversation() {
        let mut welcome = Welcome::new(&app.subjects, tui.pulse_value);
        welcome.render(frame, main_area);
    } else {
        let mut list = MessageList::new(
            &mut tui.message_list,
            app.transcript.entries(),
            app.is_loading,
            tui.pulse_value,
            spinner_frame,
        );
        list.render(frame, main_area);
    }

    // Title bar
    let mut title_bar = TitleBar::new(
        app.endpoint_label.clone(),
        app.mode.label(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    );
    title_bar.render(frame, title_area);

    // Input area
    tui.input_box.dimmed = app.is_loading;
    tui.input_box.render(frame, input_area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .block(Block::bordered().title("ERROR"))
        .alignment(Alignment::Center);

    frame.render_widget(error_paragraph, area);
}
