//! Single-page PDF 1.4 surface.
//!
//! Vector primitives go into one Flate-compressed content stream. Text uses
//! the standard Helvetica fonts, so no font data is embedded; characters
//! outside ASCII are transliterated.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write as _;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use wavescope_common::Color;
use wavescope_render::{text_width, Fill, Point, Rect, Stroke, Surface, TextAnchor, TextStyle};

use crate::error::ExportError;
use crate::svg::num;

/// A [`Surface`] that writes PDF content-stream operators.
///
/// Input coordinates have a top-left origin; the surface flips them into
/// PDF's bottom-left page space.
#[derive(Debug)]
pub struct PdfSurface {
    width: f64,
    height: f64,
    ops: String,
    alphas: BTreeSet<u8>,
}

impl PdfSurface {
    /// Creates an empty page of the given logical size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            ops: String::new(),
            alphas: BTreeSet::new(),
        }
    }

    /// Assembles the document with the page scaled by `scale`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Encode`] if the content stream cannot be
    /// compressed.
    pub fn finish(self, scale: f64) -> Result<Vec<u8>, ExportError> {
        let mut content = format!("{} 0 0 {} 0 0 cm\n", num(scale), num(scale));
        content.push_str(&self.ops);
        let compressed = deflate(content.as_bytes())?;

        let mut ext_gstate = String::new();
        for a in &self.alphas {
            let opacity = num(*a as f64 / 255.0);
            let _ = write!(ext_gstate, " /GA{a} << /ca {opacity} /CA {opacity} >>");
        }

        let mut doc = PdfWriter::default();
        doc.raw(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        doc.object("<< /Type /Catalog /Pages 2 0 R >>");
        doc.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
        doc.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
/Resources << /Font << /F1 5 0 R /F2 6 0 R >> /ExtGState <<{ext_gstate} >> >> /Contents 4 0 R >>",
            num(self.width * scale),
            num(self.height * scale),
        ));
        doc.stream(
            &format!("<< /Length {} /Filter /FlateDecode >>", compressed.len()),
            &compressed,
        );
        doc.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
        doc.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>");
        Ok(doc.finish())
    }

    fn y(&self, y: f64) -> f64 {
        self.height - y
    }

    /// Opens a graphics state, selecting an alpha state when `color` is
    /// translucent.
    fn begin(&mut self, color: Color) {
        self.ops.push_str("q\n");
        if color.a < 255 {
            self.alphas.insert(color.a);
            let _ = writeln!(self.ops, "/GA{} gs", color.a);
        }
    }

    fn set_fill(&mut self, color: Color) {
        let (r, g, b) = color.unit_rgb();
        let _ = writeln!(self.ops, "{} {} {} rg", num(r as f64), num(g as f64), num(b as f64));
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        let (r, g, b) = stroke.color.unit_rgb();
        let _ = writeln!(
            self.ops,
            "{} {} {} RG {} w",
            num(r as f64),
            num(g as f64),
            num(b as f64),
            num(stroke.width)
        );
        if let Some([on, off]) = stroke.style.dash_array() {
            let _ = writeln!(self.ops, "[{} {}] 0 d", num(on), num(off));
        }
    }

    fn path(&mut self, points: &[Point], close: bool) {
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let _ = writeln!(self.ops, "{} {} {op}", num(p.x), num(self.y(p.y)));
        }
        if close {
            self.ops.push_str("h\n");
        }
    }

    fn hatch(&mut self, points: &[Point], color: Color, spacing: f64) {
        self.begin(color.with_alpha(0x26));
        self.set_fill(color);
        self.path(points, true);
        self.ops.push_str("f\nQ\n");

        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), p| (a.min(p.x), b.max(p.x), c.min(p.y), d.max(p.y)),
        );
        if !(min_x.is_finite() && spacing > 0.0) {
            return;
        }
        self.begin(color);
        self.path(points, true);
        self.ops.push_str("W n\n");
        self.set_stroke(&Stroke::solid(color, 1.0));
        let span = max_y - min_y;
        let mut x = min_x - span;
        while x <= max_x {
            self.path(&[Point::new(x, max_y), Point::new(x + span, min_y)], false);
            self.ops.push_str("S\n");
            x += spacing;
        }
        self.ops.push_str("Q\n");
    }
}

impl Surface for PdfSurface {
    fn rect(&mut self, rect: Rect, fill: Color) {
        self.begin(fill);
        self.set_fill(fill);
        let _ = writeln!(
            self.ops,
            "{} {} {} {} re f\nQ",
            num(rect.x),
            num(self.y(rect.bottom())),
            num(rect.w.max(0.0)),
            num(rect.h.max(0.0))
        );
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.polyline(&[from, to], stroke);
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.begin(stroke.color);
        self.set_stroke(stroke);
        self.path(points, false);
        self.ops.push_str("S\nQ\n");
    }

    fn polygon(&mut self, points: &[Point], fill: &Fill, stroke: Option<&Stroke>) {
        if points.len() < 3 {
            return;
        }
        match *fill {
            Fill::Solid(color) => {
                self.begin(color);
                self.set_fill(color);
                self.path(points, true);
                self.ops.push_str("f\nQ\n");
            }
            Fill::Hatch { color, spacing } => self.hatch(points, color, spacing),
        }
        if let Some(stroke) = stroke {
            self.begin(stroke.color);
            self.set_stroke(stroke);
            self.path(points, true);
            self.ops.push_str("S\nQ\n");
        }
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let text = transliterate(text);
        let width = text_width(&text, style.size);
        let x = match style.anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Middle => at.x - width / 2.0,
            TextAnchor::End => at.x - width,
        };
        let font = if style.bold { "F2" } else { "F1" };
        self.begin(style.color);
        self.set_fill(style.color);
        let _ = writeln!(
            self.ops,
            "BT /{font} {} Tf {} {} Td ({}) Tj ET\nQ",
            num(style.size),
            num(x),
            num(self.y(at.y)),
            escape(&text)
        );
    }
}

/// Byte-offset tracking object writer.
#[derive(Default)]
struct PdfWriter {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn raw(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    fn begin_object(&mut self) {
        self.offsets.push(self.out.len());
        let header = format!("{} 0 obj\n", self.offsets.len());
        self.raw(header.as_bytes());
    }

    fn object(&mut self, body: &str) {
        self.begin_object();
        self.raw(body.as_bytes());
        self.raw(b"\nendobj\n");
    }

    fn stream(&mut self, dict: &str, data: &[u8]) {
        self.begin_object();
        self.raw(dict.as_bytes());
        self.raw(b"\nstream\n");
        self.raw(data);
        self.raw(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.out.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = write!(table, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            table,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.raw(table.as_bytes());
        self.out
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let encode_err = |e: std::io::Error| ExportError::Encode {
        format: "pdf",
        message: e.to_string(),
    };
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(encode_err)?;
    encoder.finish().map_err(encode_err)
}

/// Maps text onto the ASCII subset every standard font covers.
fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'Δ' => out.push('d'),
            '…' => out.push_str("..."),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;
    use wavescope_render::LineStyle;

    fn content_stream(pdf: &[u8]) -> String {
        let start = pdf
            .windows(7)
            .position(|w| w == b"stream\n")
            .expect("stream start")
            + 7;
        let end = pdf
            .windows(10)
            .position(|w| w == b"\nendstream")
            .expect("stream end");
        let mut text = String::new();
        ZlibDecoder::new(&pdf[start..end])
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn document_structure() {
        let mut pdf = PdfSurface::new(800, 200);
        pdf.rect(Rect::new(0.0, 0.0, 800.0, 200.0), Color::BLACK);
        let bytes = pdf.finish(1.0).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox [0 0 800 200]"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(text.contains("xref\n0 7\n"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = PdfSurface::new(10, 10).finish(1.0).unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref_at = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_at..]
            .lines()
            .skip(3)
            .take(6)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            assert!(bytes[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn y_axis_is_flipped_and_text_escaped() {
        let mut pdf = PdfSurface::new(100, 50);
        pdf.rect(Rect::new(10.0, 5.0, 20.0, 10.0), Color::WHITE);
        pdf.text(
            Point::new(0.0, 40.0),
            "Δt (1ns)",
            &TextStyle::new(Color::WHITE, 10.0, TextAnchor::Start),
        );
        let stream = content_stream(&pdf.finish(1.0).unwrap());
        assert!(stream.contains("10 35 20 10 re f"), "{stream}");
        assert!(stream.contains("0 10 Td (dt \\(1ns\\)) Tj"), "{stream}");
    }

    #[test]
    fn translucent_paint_uses_graphics_state() {
        let mut pdf = PdfSurface::new(10, 10);
        pdf.line(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            &Stroke::solid(Color::rgba(255, 0, 0, 0x80), 1.0).with_style(LineStyle::Dotted),
        );
        let bytes = pdf.finish(2.0).unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        assert!(text.contains("/GA128 << /ca 0.5 /CA 0.5 >>"));
        assert!(text.contains("/MediaBox [0 0 20 20]"));
        let stream = content_stream(&bytes);
        assert!(stream.starts_with("2 0 0 2 0 0 cm"));
        assert!(stream.contains("/GA128 gs"));
        assert!(stream.contains("[1.5 3] 0 d"));
    }

    #[test]
    fn hatch_fill_clips_to_polygon() {
        let mut pdf = PdfSurface::new(100, 100);
        let square = [
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ];
        pdf.polygon(
            &square,
            &Fill::Hatch {
                color: Color::WHITE,
                spacing: 5.0,
            },
            None,
        );
        let stream = content_stream(&pdf.finish(1.0).unwrap());
        assert!(stream.contains("W n"));
        assert!(stream.matches("\nS\n").count() >= 4);
    }
}
