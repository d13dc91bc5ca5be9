//! Signal list panel.
//!
//! One line per signal: an expansion marker for buses, the name, the width
//! and the value at the primary cursor. With the options panel open each
//! line also shows the signal's format badge.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget};

use crate::app::TuiApp;
use crate::state::FocusedPanel;

/// Renders the signal list panel into the given buffer area.
pub fn render_signal_list(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    let is_focused = app.state.focused == FocusedPanel::SignalList;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Signals ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let engine = &app.engine;
    let items: Vec<ListItem> = engine
        .store()
        .signals()
        .iter()
        .enumerate()
        .map(|(i, signal)| {
            let marker = match (signal.is_bus, engine.is_expanded(signal.id)) {
                (false, _) => " ",
                (true, false) => "+",
                (true, true) => "-",
            };
            let mut spans = vec![
                Span::styled(format!("{marker} "), Style::default().fg(Color::DarkGray)),
                Span::styled(signal.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" [{}]", signal.width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!(" = {}", app.signal_value_str(i)),
                    Style::default().fg(Color::Yellow),
                ),
            ];
            if engine.options_open() {
                let fmt = engine.format_of(signal.id);
                let badge = if fmt.signed {
                    format!(" S{}", fmt.base.badge())
                } else {
                    format!(" {}", fmt.base.badge())
                };
                spans.push(Span::styled(badge, Style::default().fg(Color::Magenta)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let highlight_style = Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut list_state = ListState::default();
    if !engine.store().is_empty() {
        list_state.select(Some(app.state.selected_signal));
    }

    StatefulWidget::render(list, area, buf, &mut list_state);
}
