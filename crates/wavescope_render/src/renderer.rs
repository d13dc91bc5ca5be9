//! Frame rendering.

use wavescope_common::{Color, ValueKind};
use wavescope_format::format;
use wavescope_store::Signal;
use wavescope_viewport::format_time;

use crate::geometry::{capsule_points, fit_text, lod_runs, text_width, visible_segments, Run, Segment};
use crate::layout::{Layout, Row, RowKind};
use crate::scene::Scene;
use crate::surface::{Fill, LineStyle, Point, Rect, Stroke, Surface, TextAnchor, TextStyle};

/// Fraction of a row's height kept clear above and below a trace.
const ROW_PADDING: f64 = 0.2;
const HATCH_SPACING: f64 = 6.0;
const TRACE_WIDTH: f64 = 1.5;
const CURSOR_WIDTH: f64 = 1.5;
const NAME_INDENT: f64 = 6.0;
const BIT_NAME_INDENT: f64 = 18.0;

/// Draws one frame of `scene` onto `surface`.
///
/// Draw order: background and row shading, grid and axis, traces, names,
/// then overlays (selection, cursors, tooltip, format badges).
pub fn render(scene: &Scene<'_>, surface: &mut dyn Surface) {
    let layout = scene.layout();
    log::trace!(
        "render {}x{} px, {} rows",
        scene.width,
        scene.height,
        layout.rows.len()
    );
    draw_background(scene, &layout, surface);
    draw_grid_and_axis(scene, surface);
    for row in &layout.rows {
        draw_row(scene, row, surface);
    }
    if scene.show_names {
        draw_names(scene, &layout, surface);
    }
    draw_overlays(scene, &layout, surface);
}

fn draw_background(scene: &Scene<'_>, layout: &Layout, surface: &mut dyn Surface) {
    surface.rect(Rect::new(0.0, 0.0, scene.width, scene.height), scene.background);
    for (i, row) in layout.rows.iter().enumerate() {
        if i % 2 == 1 {
            surface.rect(Rect::new(0.0, row.y, scene.width, row.height), scene.palette.row_alt);
        }
    }
    if let Some(row) = scene.overlays.highlighted_row.and_then(|i| layout.rows.get(i)) {
        surface.rect(
            Rect::new(0.0, row.y, scene.width, row.height),
            scene.palette.row_highlight,
        );
    }
}

fn draw_grid_and_axis(scene: &Scene<'_>, surface: &mut dyn Surface) {
    let palette = scene.palette;
    let header = scene.style.header_height;
    let ticks = scene.viewport.ticks_with_spacing(scene.style.minor_tick_px);
    let timescale = scene.store.timescale();

    if scene.show_grid {
        for tick in &ticks {
            let x = scene.wave_left + tick.x;
            let color = if tick.major {
                palette.grid_major
            } else {
                palette.grid_minor
            };
            surface.line(
                Point::new(x, header),
                Point::new(x, scene.height),
                &Stroke::solid(color, 1.0),
            );
        }
    }

    surface.line(
        Point::new(scene.wave_left, header),
        Point::new(scene.width, header),
        &Stroke::solid(palette.grid_major, 1.0),
    );

    // Label minor ticks too when no major tick is in view.
    let label_all = !ticks.iter().any(|t| t.major);
    let label_style = TextStyle::new(palette.axis_text, scene.style.font_size * 0.9, TextAnchor::Start);
    for tick in ticks.iter().filter(|t| t.major || label_all) {
        let x = scene.wave_left + tick.x;
        surface.line(
            Point::new(x, header - 6.0),
            Point::new(x, header),
            &Stroke::solid(palette.axis_text, 1.0),
        );
        surface.text(
            Point::new(x + 3.0, header - 9.0),
            &format_time(tick.time, timescale),
            &label_style,
        );
    }
}

fn draw_row(scene: &Scene<'_>, row: &Row, surface: &mut dyn Surface) {
    match row.kind {
        RowKind::Signal { id } => {
            let Some(signal) = scene.store.signal(id) else {
                return;
            };
            if signal.is_bus {
                draw_bus(scene, signal, row, surface);
            } else {
                draw_scalar(scene, signal, signal.color, row, surface);
            }
        }
        RowKind::Bit { parent, index, .. } => {
            let Some(bits) = scene.store.bit_decompose(parent) else {
                return;
            };
            if let Some(bit) = bits.get(index) {
                draw_scalar(scene, &bit.signal, scene.palette.scalar_trace, row, surface);
            }
        }
    }
}

/// Vertical extent of a trace inside its row.
struct Band {
    top: f64,
    mid: f64,
    bottom: f64,
}

impl Band {
    fn of(row: &Row) -> Self {
        let pad = row.height * ROW_PADDING;
        Self {
            top: row.y + pad,
            mid: row.mid_y(),
            bottom: row.y + row.height - pad,
        }
    }
}

fn draw_scalar(scene: &Scene<'_>, signal: &Signal, color: Color, row: &Row, surface: &mut dyn Surface) {
    let band = Band::of(row);
    let palette = scene.palette;
    let segments = visible_segments(signal, scene.viewport, scene.store.max_time());
    let mut prev_level: Option<f64> = None;

    for run in lod_runs(&segments, scene.style.lod_floor_px) {
        let seg = match run {
            Run::Dense { x0, x1, last } => {
                draw_dense(scene, x0, x1, &band, color, surface);
                prev_level = level_y(last, &band);
                continue;
            }
            Run::Wide(seg) => seg,
        };
        let x0 = scene.wave_left + seg.x0;
        let x1 = scene.wave_left + seg.x1;
        let (y, stroke, level) = match ValueKind::classify(seg.value) {
            ValueKind::Bits if seg.value == "1" => (band.top, Stroke::solid(color, TRACE_WIDTH), true),
            ValueKind::Bits if seg.value == "0" => (band.bottom, Stroke::solid(color, TRACE_WIDTH), true),
            ValueKind::HighZ => (
                band.mid,
                Stroke::solid(palette.high_z, TRACE_WIDTH).with_style(LineStyle::Dotted),
                false,
            ),
            ValueKind::Unknown | ValueKind::Mixed => (
                band.mid,
                Stroke::solid(palette.unknown, TRACE_WIDTH).with_style(LineStyle::Dashed),
                false,
            ),
            _ => (band.mid, Stroke::solid(color, TRACE_WIDTH), false),
        };
        if let Some(prev) = prev_level.filter(|&p| level && p != y) {
            surface.line(Point::new(x0, prev), Point::new(x0, y), &Stroke::solid(color, TRACE_WIDTH));
        }
        surface.line(Point::new(x0, y), Point::new(x1, y), &stroke);
        prev_level = level.then_some(y);
    }
}

/// Y of a concrete scalar level, `None` for x, z and literals.
fn level_y(value: &str, band: &Band) -> Option<f64> {
    match value {
        "1" => Some(band.top),
        "0" => Some(band.bottom),
        _ => None,
    }
}

fn draw_bus(scene: &Scene<'_>, signal: &Signal, row: &Row, surface: &mut dyn Surface) {
    let band = Band::of(row);
    let segments = visible_segments(signal, scene.viewport, scene.store.max_time());
    for run in lod_runs(&segments, scene.style.lod_floor_px) {
        match run {
            Run::Dense { x0, x1, .. } => draw_dense(scene, x0, x1, &band, signal.color, surface),
            Run::Wide(seg) if seg.width() < scene.style.capsule_min_px => {
                let x = scene.wave_left + seg.x0;
                surface.line(
                    Point::new(x, band.top),
                    Point::new(x, band.bottom),
                    &Stroke::solid(signal.color, 1.0),
                );
            }
            Run::Wide(seg) => draw_capsule(scene, signal, &seg, &band, surface),
        }
    }
}

fn draw_capsule(scene: &Scene<'_>, signal: &Signal, seg: &Segment<'_>, band: &Band, surface: &mut dyn Surface) {
    let style = scene.style;
    let palette = scene.palette;
    let x0 = scene.wave_left + seg.x0;
    let x1 = scene.wave_left + seg.x1;
    let points = capsule_points(
        x0,
        x1,
        band.mid,
        band.mid - band.top,
        style.capsule_slant_px,
        seg.open_start,
        seg.open_end,
    );
    let kind = ValueKind::classify(seg.value);
    let (fill, outline) = match kind {
        ValueKind::HighZ => (
            Fill::Hatch {
                color: palette.high_z,
                spacing: HATCH_SPACING,
            },
            palette.high_z,
        ),
        ValueKind::Unknown | ValueKind::Mixed => (
            Fill::Hatch {
                color: palette.unknown,
                spacing: HATCH_SPACING,
            },
            palette.unknown,
        ),
        _ => (Fill::Solid(signal.color.with_alpha(0x33)), signal.color),
    };
    surface.polygon(&points, &fill, Some(&Stroke::solid(outline, 1.0)));

    if !scene.show_values {
        return;
    }
    let fmt = scene.format_of(signal.id);
    let text = format(seg.value, signal.width, fmt.signed, fmt.base);
    let avail = (x1 - x0) - 2.0 * style.capsule_slant_px - 4.0;
    if let Some((text, size)) = fit_text(&text, avail, style.font_size) {
        surface.text(
            Point::new((x0 + x1) / 2.0, band.mid + size * 0.35),
            &text,
            &TextStyle::new(palette.axis_text, size, TextAnchor::Middle),
        );
    }
}

/// Collapsed transitions: one solid mark spanning the dense run.
fn draw_dense(scene: &Scene<'_>, x0: f64, x1: f64, band: &Band, color: Color, surface: &mut dyn Surface) {
    surface.rect(
        Rect::new(
            scene.wave_left + x0,
            band.top,
            (x1 - x0).max(1.0),
            band.bottom - band.top,
        ),
        color,
    );
}

fn draw_names(scene: &Scene<'_>, layout: &Layout, surface: &mut dyn Surface) {
    let style = scene.style;
    let palette = scene.palette;
    surface.rect(
        Rect::new(0.0, style.header_height, scene.wave_left, scene.height - style.header_height),
        scene.background,
    );
    surface.line(
        Point::new(scene.wave_left, 0.0),
        Point::new(scene.wave_left, scene.height),
        &Stroke::solid(palette.grid_major, 1.0),
    );
    for row in &layout.rows {
        let (name, indent) = match row.kind {
            RowKind::Signal { id } => match scene.store.signal(id) {
                Some(s) => (s.name.clone(), NAME_INDENT),
                None => continue,
            },
            RowKind::Bit { parent, bit, .. } => match scene.store.signal(parent) {
                Some(s) => (format!("{}[{}]", s.name, bit), BIT_NAME_INDENT),
                None => continue,
            },
        };
        let avail = scene.wave_left - indent - NAME_INDENT;
        if let Some((text, size)) = fit_text(&name, avail, style.font_size) {
            surface.text(
                Point::new(indent, row.mid_y() + size * 0.35),
                &text,
                &TextStyle::new(palette.axis_text, size, TextAnchor::Start),
            );
        }
    }
}

fn draw_overlays(scene: &Scene<'_>, layout: &Layout, surface: &mut dyn Surface) {
    let overlays = &scene.overlays;
    let palette = scene.palette;
    let top = scene.style.header_height;
    let timescale = scene.store.timescale();

    if let Some(sel) = overlays.selection.filter(|s| !s.is_empty()) {
        let x0 = scene.time_to_x(sel.start).max(scene.wave_left);
        let x1 = scene.time_to_x(sel.end).min(scene.width);
        if x1 > x0 {
            surface.rect(Rect::new(x0, top, x1 - x0, scene.height - top), palette.selection);
        }
    }

    let cursors = [
        (overlays.cursors.primary, palette.cursor_primary),
        (overlays.cursors.secondary, palette.cursor_secondary),
    ];
    for (time, color) in cursors {
        let Some(time) = time else { continue };
        let x = scene.time_to_x(time);
        if x < scene.wave_left || x > scene.width {
            continue;
        }
        surface.line(
            Point::new(x, top),
            Point::new(x, scene.height),
            &Stroke::solid(color, CURSOR_WIDTH),
        );
    }

    if let (Some(delta), Some(a), Some(b)) = (
        overlays.cursors.delta(),
        overlays.cursors.primary,
        overlays.cursors.secondary,
    ) {
        let label = format!("Δt {}", format_time(delta, timescale));
        let size = scene.style.font_size;
        let w = text_width(&label, size) + 8.0;
        let mid = scene
            .time_to_x((a + b) / 2.0)
            .clamp(scene.wave_left + w / 2.0, (scene.width - w / 2.0).max(scene.wave_left + w / 2.0));
        let y = top + 2.0;
        surface.rect(Rect::new(mid - w / 2.0, y, w, size + 6.0), palette.tooltip_background);
        surface.text(
            Point::new(mid, y + size + 1.0),
            &label,
            &TextStyle::new(palette.tooltip_text, size, TextAnchor::Middle),
        );
    }

    if let Some(tooltip) = &overlays.tooltip {
        let size = scene.style.font_size;
        let lines = [
            format_time(tooltip.time, timescale),
            tooltip.name.clone(),
            tooltip.value.clone(),
        ];
        let w = lines.iter().map(|l| text_width(l, size)).fold(0.0, f64::max) + 10.0;
        let h = lines.len() as f64 * (size + 3.0) + 6.0;
        let anchor = scene.time_to_x(tooltip.time);
        let x = if anchor + 8.0 + w <= scene.width {
            anchor + 8.0
        } else {
            (anchor - 8.0 - w).max(0.0)
        };
        let y = tooltip.row_y.min(scene.height - h).max(top);
        surface.rect(Rect::new(x, y, w, h), palette.tooltip_background);
        let style = TextStyle::new(palette.tooltip_text, size, TextAnchor::Start);
        for (i, line) in lines.iter().enumerate() {
            surface.text(Point::new(x + 5.0, y + 3.0 + (i + 1) as f64 * (size + 3.0) - 3.0), line, &style);
        }
    }

    if overlays.format_badges {
        let size = scene.style.font_size * 0.8;
        let style = TextStyle {
            bold: true,
            ..TextStyle::new(palette.axis_text, size, TextAnchor::End)
        };
        for row in &layout.rows {
            let RowKind::Signal { id } = row.kind else {
                continue;
            };
            let fmt = scene.format_of(id);
            let badge = if fmt.signed {
                format!("S{}", fmt.base.badge())
            } else {
                fmt.base.badge().to_string()
            };
            surface.text(Point::new(scene.width - 4.0, row.y + size + 2.0), &badge, &style);
        }
    }
}
