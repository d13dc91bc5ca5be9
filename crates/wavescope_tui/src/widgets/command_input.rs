//! Command bar: key hints in normal mode, the `:` prompt in command mode.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::TuiApp;
use crate::state::InputMode;

const HINTS: [(&str, &str); 7] = [
    ("q", "quit"),
    ("j/k", "nav"),
    ("h/l", "pan"),
    ("+/-", "zoom"),
    ("[/]", "cursor"),
    (":", "cmd"),
    ("?", "help"),
];

/// Renders the command input bar.
pub fn render_command_input(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let key_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::DarkGray);

    let line = match app.state.mode {
        InputMode::Normal => Line::from(
            HINTS
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(format!(" {key}"), key_style),
                        Span::styled(format!(":{label}"), label_style),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        InputMode::Command => Line::from(vec![
            Span::styled(
                ":",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&app.state.command_buffer, Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
    };

    Widget::render(line, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, test_app};

    #[test]
    fn normal_mode_shows_hints() {
        let app = test_app();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        render_command_input(&app, area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("q:quit"), "{text}");
        assert!(text.contains("[/]:cursor"), "{text}");
    }

    #[test]
    fn command_mode_shows_buffer() {
        let mut app = test_app();
        app.state.mode = InputMode::Command;
        app.state.command_buffer = "goto 15ns".to_string();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        render_command_input(&app, area, &mut buf);
        assert!(buffer_text(&buf).contains(":goto 15ns"));
    }
}
