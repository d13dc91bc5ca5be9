//! SVG document surface.

use std::fmt::Write as _;

use wavescope_common::Color;
use wavescope_render::{Fill, Point, Rect, Stroke, Surface, TextAnchor, TextStyle};

/// A [`Surface`] that writes SVG elements.
///
/// Drawing happens in logical units; [`SvgSurface::finish`] wraps the
/// elements in a single `<svg>` root whose `viewBox` is the logical size and
/// whose `width`/`height` attributes are multiplied by the scale.
#[derive(Debug)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    scale: f64,
    font_family: String,
    body: String,
    patterns: Vec<(Color, f64)>,
}

impl SvgSurface {
    /// Creates an empty document.
    pub fn new(width: u32, height: u32, scale: f64, font_family: &str) -> Self {
        Self {
            width,
            height,
            scale,
            font_family: font_family.to_string(),
            body: String::new(),
            patterns: Vec::new(),
        }
    }

    /// Returns the complete document.
    pub fn finish(self) -> String {
        let mut doc = String::with_capacity(self.body.len() + 512);
        doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            doc,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"{}\">",
            num(self.width as f64 * self.scale),
            num(self.height as f64 * self.scale),
            self.width,
            self.height,
            escape(&self.font_family),
        );
        if !self.patterns.is_empty() {
            doc.push_str("<defs>\n");
            for (i, (color, spacing)) in self.patterns.iter().enumerate() {
                let s = num(*spacing);
                let _ = writeln!(
                    doc,
                    "<pattern id=\"hatch{i}\" patternUnits=\"userSpaceOnUse\" width=\"{s}\" height=\"{s}\" patternTransform=\"rotate(45)\">\
<rect width=\"{s}\" height=\"{s}\"{}/>\
<line x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{s}\"{}/></pattern>",
                    paint("fill", color.with_alpha(0x26)),
                    stroke_attrs(&Stroke::solid(*color, 1.5)),
                );
            }
            doc.push_str("</defs>\n");
        }
        doc.push_str(&self.body);
        doc.push_str("</svg>\n");
        doc
    }

    fn pattern_id(&mut self, color: Color, spacing: f64) -> usize {
        if let Some(i) = self
            .patterns
            .iter()
            .position(|(c, s)| *c == color && *s == spacing)
        {
            return i;
        }
        self.patterns.push((color, spacing));
        self.patterns.len() - 1
    }
}

impl Surface for SvgSurface {
    fn rect(&mut self, rect: Rect, fill: Color) {
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>",
            num(rect.x),
            num(rect.y),
            num(rect.w.max(0.0)),
            num(rect.h.max(0.0)),
            paint("fill", fill),
        );
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>",
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(stroke),
        );
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            "<polyline points=\"{}\" fill=\"none\"{}/>",
            point_list(points),
            stroke_attrs(stroke),
        );
    }

    fn polygon(&mut self, points: &[Point], fill: &Fill, stroke: Option<&Stroke>) {
        let fill_attr = match *fill {
            Fill::Solid(color) => paint("fill", color),
            Fill::Hatch { color, spacing } => {
                format!(" fill=\"url(#hatch{})\"", self.pattern_id(color, spacing))
            }
        };
        let stroke_attr = stroke.map(stroke_attrs).unwrap_or_default();
        let _ = writeln!(
            self.body,
            "<polygon points=\"{}\"{fill_attr}{stroke_attr}/>",
            point_list(points),
        );
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let anchor = match style.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let weight = if style.bold { " font-weight=\"bold\"" } else { "" };
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\"{weight}{}>{}</text>",
            num(at.x),
            num(at.y),
            num(style.size),
            paint("fill", style.color),
            escape(text),
        );
    }
}

/// Formats a coordinate with at most two decimals.
pub(crate) fn num(v: f64) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let mut s = format!("{v:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn paint(attr: &str, color: Color) -> String {
    if color.a == 255 {
        format!(" {attr}=\"{}\"", color.hex_rgb())
    } else {
        format!(
            " {attr}=\"{}\" {attr}-opacity=\"{}\"",
            color.hex_rgb(),
            num(color.opacity() as f64)
        )
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = paint("stroke", stroke.color);
    let _ = write!(attrs, " stroke-width=\"{}\"", num(stroke.width));
    if let Some([on, off]) = stroke.style.dash_array() {
        let _ = write!(attrs, " stroke-dasharray=\"{} {}\"", num(on), num(off));
    }
    attrs
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescope_render::LineStyle;

    #[test]
    fn single_root_with_scaled_size() {
        let mut svg = SvgSurface::new(800, 200, 2.0, "monospace");
        svg.rect(Rect::new(0.0, 0.0, 800.0, 200.0), Color::BLACK);
        let doc = svg.finish();
        assert_eq!(doc.matches("<svg").count(), 1);
        assert!(doc.contains("viewBox=\"0 0 800 200\""));
        assert!(doc.contains("width=\"1600\" height=\"400\""));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn hatch_patterns_are_shared() {
        let mut svg = SvgSurface::new(10, 10, 1.0, "monospace");
        let tri = [Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(0.0, 5.0)];
        let fill = Fill::Hatch {
            color: Color::WHITE,
            spacing: 6.0,
        };
        svg.polygon(&tri, &fill, None);
        svg.polygon(&tri, &fill, None);
        let doc = svg.finish();
        assert_eq!(doc.matches("<pattern").count(), 1);
        assert_eq!(doc.matches("url(#hatch0)").count(), 2);
    }

    #[test]
    fn text_is_escaped_and_dashes_emitted() {
        let mut svg = SvgSurface::new(10, 10, 1.0, "monospace");
        svg.text(
            Point::new(1.0, 2.0),
            "a<b & c",
            &TextStyle::new(Color::WHITE, 12.0, TextAnchor::Middle),
        );
        svg.line(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            &Stroke::solid(Color::rgba(1, 2, 3, 128), 1.0).with_style(LineStyle::Dashed),
        );
        let doc = svg.finish();
        assert!(doc.contains("a&lt;b &amp; c"));
        assert!(doc.contains("text-anchor=\"middle\""));
        assert!(doc.contains("stroke-dasharray=\"6 4\""));
        assert!(doc.contains("stroke-opacity=\"0.5\""));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(800.0), "800");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.005_1), "1.01");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f64::NAN), "0");
    }
}
