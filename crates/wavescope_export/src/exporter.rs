//! Layout and encoding of a static export.

use std::collections::HashSet;

use wavescope_config::{Palette, Style};
use wavescope_render::{render, FormatTable, Scene, Surface};
use wavescope_store::{SignalId, SignalStore};
use wavescope_viewport::Viewport;

use crate::error::ExportError;
use crate::options::{ExportFormat, ExportOptions, ExportPayload};
use crate::pdf::PdfSurface;
use crate::png::rasterize;
use crate::svg::SvgSurface;

/// Display state the export shares with the interactive view.
#[derive(Clone, Copy, Debug)]
pub struct DisplaySettings<'a> {
    /// Layout metrics.
    pub style: &'a Style,
    /// Colours.
    pub palette: &'a Palette,
    /// Resolved display format per signal.
    pub formats: &'a FormatTable,
    /// Buses whose bits are exported.
    pub expanded: &'a HashSet<SignalId>,
}

/// Renders `store` into a static image.
///
/// The image has its own layout: a name column of `style.name_column_width`
/// on the left, the time axis in the header and the traces to the right.
/// The time window is `options.time_range`, or the window visible in `view`
/// when unset. Interactive overlays are never drawn.
///
/// # Errors
///
/// Returns [`ExportError::InvalidSize`] for a zero size or a non-positive
/// scale, and [`ExportError::Encode`] if PNG or PDF encoding fails.
pub fn export(
    store: &SignalStore,
    view: &Viewport,
    display: &DisplaySettings<'_>,
    options: &ExportOptions,
) -> Result<ExportPayload, ExportError> {
    options.validate()?;
    let style = display.style;

    let width = options.width;
    let name_column = style.name_column_width.min(width as f64 / 2.0).floor();
    let wave_width = (width as f64 - name_column).max(1.0);
    let (start, end) = time_window(store, view, options.time_range);
    let mut viewport = Viewport::new(wave_width, end - start);
    viewport.zoom_to_range(start as f64, end as f64);

    let mut scene = Scene::new(
        store,
        &viewport,
        style,
        display.palette,
        display.formats,
        display.expanded,
    );
    scene.width = width as f64;
    scene.wave_left = name_column;
    scene.show_names = true;
    scene.show_grid = options.show_grid;
    scene.show_values = options.show_values;
    if let Some(bg) = options.background_color {
        scene.background = bg;
    }
    let height = options
        .height
        .unwrap_or_else(|| scene.fitted_height().ceil().max(1.0) as u32);
    scene.height = height as f64;

    let bytes = match options.format {
        ExportFormat::Svg => draw_svg(&scene, width, height, options.scale, style).into_bytes(),
        ExportFormat::Png => {
            let svg = draw_svg(&scene, width, height, 1.0, style);
            rasterize(&svg, width, height, options.scale)?
        }
        ExportFormat::Pdf => {
            let mut pdf = PdfSurface::new(width, height);
            draw(&scene, &mut pdf);
            pdf.finish(options.scale)?
        }
    };

    log::info!(
        "exported {} {}x{} at scale {} (ticks {}..{}): {} bytes",
        options.format,
        width,
        height,
        options.scale,
        start,
        end,
        bytes.len()
    );
    Ok(ExportPayload {
        format: options.format,
        width,
        height,
        bytes,
    })
}

fn draw(scene: &Scene<'_>, surface: &mut dyn Surface) {
    render(scene, surface);
}

fn draw_svg(scene: &Scene<'_>, width: u32, height: u32, scale: f64, style: &Style) -> String {
    let mut svg = SvgSurface::new(width, height, scale, &style.font_family);
    draw(scene, &mut svg);
    svg.finish()
}

/// Resolves the exported tick window, at least one tick long.
fn time_window(store: &SignalStore, view: &Viewport, range: Option<(u64, u64)>) -> (u64, u64) {
    let (start, end) = match range {
        Some((a, b)) => (a.min(b), a.max(b)),
        None => {
            let (a, b) = view.visible_ticks();
            (a, b.min(store.max_time().max(a.saturating_add(1))))
        }
    };
    (start, end.max(start.saturating_add(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescope_common::{Color, Timescale};
    use wavescope_format::{Base, DisplayFormat};
    use wavescope_store::Signal;

    struct Fixture {
        store: SignalStore,
        style: Style,
        palette: Palette,
        formats: FormatTable,
        expanded: HashSet<SignalId>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut clk = Signal::new(SignalId::from_raw(0), "!", "clk", 1);
            for t in 0..20u64 {
                clk.record(t * 5, if t % 2 == 0 { "0" } else { "1" }.to_string());
            }
            let mut data = Signal::new(SignalId::from_raw(1), "\"", "data", 8);
            data.record(0, "00000000".to_string());
            data.record(30, "00001111".to_string());
            data.record(60, "xxxxxxxx".to_string());
            Self {
                store: SignalStore::new(vec![clk, data], 100, Timescale::default()),
                style: Style::default(),
                palette: Palette::default(),
                formats: FormatTable::new(),
                expanded: HashSet::new(),
            }
        }

        fn export(&self, options: &ExportOptions) -> Result<ExportPayload, ExportError> {
            let view = Viewport::new(800.0, self.store.max_time());
            let display = DisplaySettings {
                style: &self.style,
                palette: &self.palette,
                formats: &self.formats,
                expanded: &self.expanded,
            };
            export(&self.store, &view, &display, options)
        }
    }

    #[test]
    fn svg_export_has_single_root_and_view_box() {
        let fx = Fixture::new();
        let opts = ExportOptions {
            width: 800,
            height: Some(200),
            ..ExportOptions::default()
        };
        let payload = fx.export(&opts).unwrap();
        let text = payload.as_text().unwrap();
        assert_eq!(text.matches("<svg").count(), 1);
        assert!(text.contains("viewBox=\"0 0 800 200\""));
        assert!(text.contains(">clk</text>"));
        assert!(text.contains(">F</text>"));
    }

    #[test]
    fn height_fits_rows_when_unset() {
        let fx = Fixture::new();
        let payload = fx.export(&ExportOptions::default()).unwrap();
        let expected = fx.style.header_height + fx.style.row_height + fx.style.bus_row_height;
        assert_eq!(payload.height, expected.ceil() as u32);
    }

    #[test]
    fn options_change_output() {
        let mut fx = Fixture::new();
        fx.formats
            .insert(SignalId::from_raw(1), DisplayFormat::new(Base::Decimal, false));
        let opts = ExportOptions {
            background_color: Some(Color::rgb(1, 2, 3)),
            time_range: Some((30, 60)),
            ..ExportOptions::default()
        };
        let text = String::from_utf8(fx.export(&opts).unwrap().bytes).unwrap();
        assert!(text.contains("fill=\"#010203\""));
        assert!(text.contains(">15</text>"));

        let hidden = ExportOptions {
            show_values: false,
            ..opts
        };
        let text = String::from_utf8(fx.export(&hidden).unwrap().bytes).unwrap();
        assert!(!text.contains(">15</text>"));
    }

    #[test]
    fn png_and_pdf_exports() {
        let fx = Fixture::new();
        let png = fx
            .export(&ExportOptions {
                format: ExportFormat::Png,
                width: 300,
                height: Some(100),
                scale: 2.0,
                ..ExportOptions::default()
            })
            .unwrap();
        assert!(png.bytes.starts_with(b"\x89PNG"));
        let pdf = fx
            .export(&ExportOptions {
                format: ExportFormat::Pdf,
                ..ExportOptions::default()
            })
            .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
        assert!(pdf.as_text().is_none());
    }

    #[test]
    fn invalid_size_rejected() {
        let fx = Fixture::new();
        let err = fx
            .export(&ExportOptions {
                width: 0,
                ..ExportOptions::default()
            })
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidSize { .. }));
    }

    #[test]
    fn empty_store_exports() {
        let mut fx = Fixture::new();
        fx.store = SignalStore::empty();
        let payload = fx.export(&ExportOptions::default()).unwrap();
        assert_eq!(payload.height, fx.style.header_height.ceil() as u32);
    }

    #[test]
    fn window_defaults_to_visible_range() {
        let store = Fixture::new().store;
        let mut view = Viewport::new(100.0, 100);
        view.zoom_to_range(20.0, 40.0);
        assert_eq!(time_window(&store, &view, None), (20, 40));
        assert_eq!(time_window(&store, &view, Some((50, 10))), (10, 50));
        assert_eq!(time_window(&store, &view, Some((7, 7))), (7, 8));
    }

    #[test]
    fn window_at_end_of_time_does_not_overflow() {
        let store = Fixture::new().store;
        let view = Viewport::new(100.0, 100);
        assert_eq!(
            time_window(&store, &view, Some((u64::MAX, u64::MAX))),
            (u64::MAX, u64::MAX)
        );
        assert_eq!(
            time_window(&store, &view, Some((u64::MAX, 5))),
            (5, u64::MAX)
        );
    }
}
