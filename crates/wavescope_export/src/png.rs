//! PNG rasterization of SVG documents.

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::ExportError;

fn encode_err(message: impl ToString) -> ExportError {
    ExportError::Encode {
        format: "png",
        message: message.to_string(),
    }
}

/// Rasterizes an SVG document of logical size `width`×`height` at `scale`
/// and encodes it as PNG.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the document does not parse, the
/// pixmap cannot be allocated, or encoding fails.
pub fn rasterize(svg: &str, width: u32, height: u32, scale: f64) -> Result<Vec<u8>, ExportError> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = Tree::from_str(svg, &options).map_err(encode_err)?;

    let px_w = (width as f64 * scale).round().max(1.0) as u32;
    let px_h = (height as f64 * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(px_w, px_h)
        .ok_or_else(|| encode_err(format!("cannot allocate {px_w}x{px_h} pixmap")))?;

    // The tree's size is the scaled width/height attributes; map the logical
    // viewBox onto the pixmap.
    let tree_size = tree.size();
    let sx = px_w as f32 / tree_size.width();
    let sy = px_h as f32 / tree_size.height();
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    log::debug!("rasterized {}x{} pixmap", px_w, px_h);
    pixmap.encode_png().map_err(encode_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn doc(w: u32, h: u32, scale: f64) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {w} {h}\">\
<rect width=\"{w}\" height=\"{h}\" fill=\"#ff0000\"/></svg>",
            w as f64 * scale,
            h as f64 * scale
        )
    }

    fn ihdr_size(png: &[u8]) -> (u32, u32) {
        let w = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let h = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (w, h)
    }

    #[test]
    fn png_has_scaled_dimensions() {
        let png = rasterize(&doc(40, 20, 2.0), 40, 20, 2.0).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        assert_eq!(ihdr_size(&png), (80, 40));
    }

    #[test]
    fn invalid_svg_is_an_encode_error() {
        let err = rasterize("not svg", 10, 10, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::Encode { format: "png", .. }));
    }
}
