//! Waveform panel.
//!
//! Replays the engine's frame onto a braille [`Canvas`]. The engine draws in
//! pixels of [`CELL_WIDTH_PX`] by [`CELL_HEIGHT_PX`] per terminal cell; the
//! painter flips the y axis and keeps only what a character grid can show:
//! strokes, polygon outlines, thin rectangles and text. Area fills are left
//! to the panel background.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color as TermColor, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Widget};
use wavescope_common::Color;
use wavescope_render::{Fill, Point, Rect as PxRect, Stroke, Surface, TextAnchor, TextStyle};

use super::term_color;
use crate::app::{TuiApp, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::state::FocusedPanel;

/// Renders the waveform panel.
pub fn render_waveform(app: &mut TuiApp, area: Rect, buf: &mut Buffer) {
    let is_focused = app.state.focused == FocusedPanel::Waveform;
    let border_style = if is_focused {
        Style::default().fg(TermColor::Cyan)
    } else {
        Style::default().fg(TermColor::DarkGray)
    };
    let block = Block::default()
        .title(" Waveform ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    Widget::render(block, area, buf);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let background = term_color(app.engine.config().colors.background);
    let frame = app.prepare_frame(inner);
    let width = f64::from(inner.width) * CELL_WIDTH_PX;
    let height = f64::from(inner.height) * CELL_HEIGHT_PX;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(background)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let mut painter = CanvasPainter { ctx, height };
            frame.replay(&mut painter);
        });
    Widget::render(canvas, inner, buf);
}

/// A [`Surface`] over a canvas paint context.
struct CanvasPainter<'c, 'a> {
    ctx: &'c mut Context<'a>,
    height: f64,
}

impl CanvasPainter<'_, '_> {
    fn segment(&mut self, from: Point, to: Point, color: Color) {
        if color.a == 0 {
            return;
        }
        self.ctx.draw(&CanvasLine {
            x1: from.x,
            y1: self.height - from.y,
            x2: to.x,
            y2: self.height - to.y,
            color: term_color(color),
        });
    }
}

impl Surface for CanvasPainter<'_, '_> {
    fn rect(&mut self, rect: PxRect, fill: Color) {
        if rect.w <= CELL_WIDTH_PX / 2.0 {
            let x = rect.x + rect.w / 2.0;
            self.segment(Point::new(x, rect.y), Point::new(x, rect.bottom()), fill);
        } else if rect.h <= CELL_HEIGHT_PX / 8.0 {
            let y = rect.y + rect.h / 2.0;
            self.segment(Point::new(rect.x, y), Point::new(rect.right(), y), fill);
        }
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.segment(from, to, stroke.color);
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], stroke.color);
        }
    }

    fn polygon(&mut self, points: &[Point], fill: &Fill, stroke: Option<&Stroke>) {
        let color = match (stroke, fill) {
            (Some(s), _) => s.color,
            (None, Fill::Solid(c)) => *c,
            (None, Fill::Hatch { color, .. }) => *color,
        };
        for (i, &p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            self.segment(p, next, color);
        }
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let width = text.chars().count() as f64 * CELL_WIDTH_PX;
        let x = match style.anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Middle => at.x - width / 2.0,
            TextAnchor::End => at.x - width,
        };
        // Glyphs sit above the baseline; aim for the middle of the cap height.
        let y = self.height - (at.y - style.size * 0.35);
        let mut span_style = Style::default().fg(term_color(style.color));
        if style.bold {
            span_style = span_style.add_modifier(Modifier::BOLD);
        }
        self.ctx
            .print(x.max(0.0), y, Span::styled(text.to_string(), span_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, test_app};

    fn is_braille(symbol: &str) -> bool {
        symbol
            .chars()
            .next()
            .is_some_and(|c| ('\u{2801}'..='\u{28FF}').contains(&c))
    }

    #[test]
    fn traces_are_drawn() {
        let mut app = test_app();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        render_waveform(&mut app, area, &mut buf);
        assert!(buf.content().iter().any(|c| is_braille(c.symbol())));
        assert!(buffer_text(&buf).contains("Waveform"));
        assert_eq!(app.wave_area, Some(Rect::new(1, 1, 58, 10)));
    }

    #[test]
    fn bus_values_are_printed() {
        let mut app = test_app();
        app.engine.run_command("zoom 10 20").unwrap();
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        render_waveform(&mut app, area, &mut buf);
        assert!(buffer_text(&buf).contains('A'));
    }

    #[test]
    fn tiny_area_is_skipped() {
        let mut app = test_app();
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        render_waveform(&mut app, area, &mut buf);
        assert_eq!(app.wave_area, None);
    }
}
