//! Top-level rendering logic.
//!
//! Splits the terminal into panels and delegates to the widget modules.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::{TuiApp, HELP_TEXT};
use crate::widgets::{command_input, signal_list, status_bar, waveform};

/// Renders the complete TUI layout into the given frame.
///
/// ```text
/// ┌──────────────┬──────────────────────┐
/// │ Signal List  │    Waveform          │
/// │ (30%)        │    (70%)             │
/// ├──────────────┴──────────────────────┤
/// │ Status Bar                          │
/// ├─────────────────────────────────────┤
/// │ Command Input                       │
/// └─────────────────────────────────────┘
/// ```
pub fn render(app: &mut TuiApp, frame: &mut Frame) {
    let size = frame.size();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[0]);

    signal_list::render_signal_list(app, horizontal[0], frame.buffer_mut());
    waveform::render_waveform(app, horizontal[1], frame.buffer_mut());
    status_bar::render_status_bar(app, vertical[1], frame.buffer_mut());
    command_input::render_command_input(app, vertical[2], frame.buffer_mut());

    if app.state.show_help {
        render_help_popup(frame);
    }
}

/// Renders a centered help popup.
fn render_help_popup(frame: &mut Frame) {
    use ratatui::style::{Color, Style};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let area = frame.size();
    let popup_width = 64u16.min(area.width.saturating_sub(4));
    let popup_height = 22u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = ratatui::layout::Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, test_app};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &mut TuiApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn render_full_layout() {
        let mut app = test_app();
        let text = draw(&mut app, 100, 24);
        assert!(text.contains("Signals"));
        assert!(text.contains("Waveform"));
        assert!(text.contains("NORMAL"));
        assert!(app.wave_area.is_some());
    }

    #[test]
    fn render_with_help_popup() {
        let mut app = test_app();
        app.state.show_help = true;
        let text = draw(&mut app, 100, 30);
        assert!(text.contains("Help"));
        assert!(text.contains("Step cursor"));
    }

    #[test]
    fn render_small_terminal() {
        let mut app = test_app();
        draw(&mut app, 20, 5);
    }

    #[test]
    fn redraw_skips_clean_frames() {
        let mut app = test_app();
        draw(&mut app, 80, 24);
        assert!(!app.engine.is_dirty());
        draw(&mut app, 80, 24);
        assert!(!app.engine.is_dirty());
        draw(&mut app, 90, 24);
        assert_eq!(app.engine.size().0, f64::from(app.wave_area.unwrap().width) * 8.0);
    }
}
