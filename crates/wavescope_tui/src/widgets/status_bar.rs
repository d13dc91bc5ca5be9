//! Status bar: input mode, cursor time, cursor delta, zoom and selection,
//! followed by the latest status message.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use wavescope_viewport::format_time;

use crate::app::TuiApp;
use crate::state::InputMode;

/// Renders the status bar into the given area.
pub fn render_status_bar(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let (mode_str, mode_style) = match app.state.mode {
        InputMode::Normal => (
            "NORMAL",
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        InputMode::Command => (
            "COMMAND",
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let timescale = app.engine.store().timescale();
    let mut spans = vec![
        Span::styled(format!(" {mode_str} "), mode_style),
        Span::styled(
            format!(" T={}", app.cursor_str()),
            Style::default().fg(Color::White),
        ),
    ];
    if let Some(delta) = app.delta_str() {
        spans.push(Span::styled(
            format!(" Δt={delta}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        format!(" | zoom {:.2}x", app.engine.view_state().zoom),
        Style::default().fg(Color::Gray),
    ));
    if let Some(sel) = app.engine.selection() {
        spans.push(Span::styled(
            format!(
                " | sel {}..{}",
                format_time(sel.start, timescale),
                format_time(sel.end, timescale)
            ),
            Style::default().fg(Color::Gray),
        ));
    }
    if !app.state.status_message.is_empty() {
        spans.push(Span::styled(
            format!(" | {}", app.state.status_message),
            Style::default().fg(Color::Cyan),
        ));
    }

    let bg_style = Style::default().bg(Color::DarkGray);
    for x in area.x..area.x + area.width {
        if x < buf.area().right() {
            buf.get_mut(x, area.y).set_style(bg_style);
        }
    }

    Widget::render(Line::from(spans), area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, test_app};

    fn rendered(app: &TuiApp) -> String {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        render_status_bar(app, area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn normal_mode_shows_cursor_and_zoom() {
        let mut app = test_app();
        app.engine.set_cursor(Some(5.0));
        let text = rendered(&app);
        assert!(text.contains("NORMAL"));
        assert!(text.contains("T=5ns"), "{text}");
        assert!(text.contains("zoom 1.00x"), "{text}");
        assert!(!text.contains("Δt"));
    }

    #[test]
    fn delta_selection_and_message() {
        let mut app = test_app();
        app.engine.set_cursor(Some(5.0));
        app.engine.set_secondary_cursor(Some(15.0));
        app.engine.set_selection(Some((10.0, 20.0)));
        app.state.status_message = "hello".into();
        app.state.mode = InputMode::Command;
        let text = rendered(&app);
        assert!(text.contains("COMMAND"));
        assert!(text.contains("Δt=10ns"), "{text}");
        assert!(text.contains("sel 10ns..20ns"), "{text}");
        assert!(text.contains("hello"));
    }

    #[test]
    fn zero_height_is_noop() {
        let app = test_app();
        let area = Rect::new(0, 0, 40, 0);
        let mut buf = Buffer::empty(area);
        render_status_bar(&app, area, &mut buf);
    }
}
