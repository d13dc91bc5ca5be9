//! Segment extraction, level-of-detail grouping and shape helpers.

use wavescope_store::Signal;
use wavescope_viewport::Viewport;

use crate::surface::Point;

/// Average glyph advance as a fraction of the font size (monospace).
const GLYPH_ADVANCE: f64 = 0.6;
/// Smallest font size, as a fraction of the requested size, that text may
/// shrink to before it is truncated.
const MIN_TEXT_SHRINK: f64 = 0.7;

/// A constant-value stretch of a signal, in waveform-area pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<'a> {
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// The raw value held over the segment.
    pub value: &'a str,
    /// The value was already held before the visible window.
    pub open_start: bool,
    /// The value is still held after the visible window or trace end.
    pub open_end: bool,
}

impl Segment<'_> {
    /// Returns the on-screen width.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Drawing unit produced by [`lod_runs`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Run<'a> {
    /// A segment wide enough to draw in full.
    Wide(Segment<'a>),
    /// One or more adjacent segments too narrow to draw individually.
    Dense {
        /// Left edge of the first collapsed segment.
        x0: f64,
        /// Right edge of the last collapsed segment.
        x1: f64,
        /// Value of the last collapsed segment.
        last: &'a str,
    },
}

/// Returns the segments of `signal` inside the viewport, up to `end_time`.
///
/// Uses binary search for the first visible change, so cost depends on the
/// number of visible changes only.
pub fn visible_segments<'a>(signal: &'a Signal, viewport: &Viewport, end_time: u64) -> Vec<Segment<'a>> {
    let (t0, t1) = viewport.visible_range();
    let t_end = t1.min(end_time.max(1) as f64);
    if t_end <= t0 || signal.values.is_empty() {
        return Vec::new();
    }

    let first = signal.change_index_at(t0.floor() as u64).unwrap_or(0);
    let mut segments = Vec::new();
    for (i, change) in signal.values.iter().enumerate().skip(first) {
        let start = change.time as f64;
        if start >= t_end {
            break;
        }
        let next = signal.values.get(i + 1).map(|c| c.time as f64);
        let end = next.map_or(t_end, |n| n.min(t_end));
        let seg_start = start.max(t0);
        if end <= seg_start {
            continue;
        }
        segments.push(Segment {
            x0: viewport.time_to_x(seg_start),
            x1: viewport.time_to_x(end),
            value: &change.value,
            open_start: start < t0,
            open_end: next.map_or(true, |n| n > t_end),
        });
    }
    segments
}

/// Groups segments for drawing.
///
/// Consecutive complete segments narrower than `floor_px` merge into one
/// [`Run::Dense`]. Segments cut by the window edge are never collapsed.
pub fn lod_runs<'a>(segments: &[Segment<'a>], floor_px: f64) -> Vec<Run<'a>> {
    let mut runs: Vec<Run<'a>> = Vec::with_capacity(segments.len());
    for seg in segments {
        let narrow = seg.width() < floor_px && !seg.open_start && !seg.open_end;
        match (narrow, runs.last_mut()) {
            (true, Some(Run::Dense { x1, last, .. })) => {
                *x1 = seg.x1;
                *last = seg.value;
            }
            (true, _) => runs.push(Run::Dense {
                x0: seg.x0,
                x1: seg.x1,
                last: seg.value,
            }),
            (false, _) => runs.push(Run::Wide(*seg)),
        }
    }
    runs
}

/// Returns the outline of a bus capsule between `x0` and `x1`.
///
/// Closed ends are pointed (a hexagon when both are closed); an open end is
/// drawn flat because the value continues past it.
pub fn capsule_points(
    x0: f64,
    x1: f64,
    mid_y: f64,
    half_height: f64,
    slant: f64,
    open_start: bool,
    open_end: bool,
) -> Vec<Point> {
    let slant = slant.min((x1 - x0) / 2.0).max(0.0);
    let top = mid_y - half_height;
    let bottom = mid_y + half_height;
    let mut pts = Vec::with_capacity(6);
    if open_start {
        pts.push(Point::new(x0, bottom));
        pts.push(Point::new(x0, top));
    } else {
        pts.push(Point::new(x0, mid_y));
        pts.push(Point::new(x0 + slant, top));
    }
    if open_end {
        pts.push(Point::new(x1, top));
        pts.push(Point::new(x1, bottom));
    } else {
        pts.push(Point::new(x1 - slant, top));
        pts.push(Point::new(x1, mid_y));
        pts.push(Point::new(x1 - slant, bottom));
    }
    if !open_start {
        pts.push(Point::new(x0 + slant, bottom));
    }
    pts
}

/// Estimated width of `text` at `size` pixels.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * GLYPH_ADVANCE
}

/// Fits `text` into `max_width` pixels.
///
/// Text first shrinks down to 70% of `size`; if it still does not fit it is
/// truncated with an ellipsis at that size. Returns `None` when not even
/// one character and the ellipsis fit.
pub fn fit_text(text: &str, max_width: f64, size: f64) -> Option<(String, f64)> {
    if text.is_empty() || max_width <= 0.0 || size <= 0.0 {
        return None;
    }
    if text_width(text, size) <= max_width {
        return Some((text.to_string(), size));
    }
    let chars = text.chars().count() as f64;
    let shrunk = max_width / (chars * GLYPH_ADVANCE);
    let min_size = size * MIN_TEXT_SHRINK;
    if shrunk >= min_size {
        return Some((text.to_string(), shrunk));
    }
    let fit = (max_width / (min_size * GLYPH_ADVANCE)).floor() as usize;
    if fit < 2 {
        return None;
    }
    let mut truncated: String = text.chars().take(fit - 1).collect();
    truncated.push('…');
    Some((truncated, min_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescope_store::SignalId;

    fn signal(changes: &[(u64, &str)]) -> Signal {
        let mut s = Signal::new(SignalId::from_raw(0), "!", "s", 1);
        for (t, v) in changes {
            s.record(*t, v.to_string());
        }
        s
    }

    #[test]
    fn segments_cover_window_until_trace_end() {
        let sig = signal(&[(0, "0"), (10, "1"), (20, "0")]);
        let vp = Viewport::new(100.0, 25);
        let segs = visible_segments(&sig, &vp, 25);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].x0, 0.0);
        assert_eq!(segs[1].x0, 40.0);
        assert_eq!(segs[2].x1, 100.0);
        assert!(!segs[0].open_start);
        assert!(segs[2].open_end);
        assert!(!segs[1].open_end);
    }

    #[test]
    fn segments_start_with_value_in_effect() {
        let sig = signal(&[(0, "0"), (10, "1"), (20, "0")]);
        let mut vp = Viewport::new(100.0, 100);
        vp.zoom_to_range(15.0, 25.0);
        let segs = visible_segments(&sig, &vp, 100);
        assert_eq!(segs[0].value, "1");
        assert!(segs[0].open_start);
        assert_eq!(segs[0].x0, 0.0);
    }

    #[test]
    fn no_segments_past_trace_end() {
        let sig = signal(&[(0, "0")]);
        let mut vp = Viewport::new(100.0, 10);
        vp.zoom_to_range(50.0, 60.0);
        assert!(visible_segments(&sig, &vp, 10).is_empty());
    }

    #[test]
    fn narrow_segments_collapse_into_one_run() {
        let seg = |x0: f64, x1: f64, value: &'static str| Segment {
            x0,
            x1,
            value,
            open_start: false,
            open_end: false,
        };
        let segs = [
            seg(0.0, 50.0, "1"),
            seg(50.0, 50.5, "0"),
            seg(50.5, 51.0, "1"),
            seg(51.0, 51.2, "0"),
            seg(51.2, 90.0, "1"),
        ];
        let runs = lod_runs(&segs, 2.0);
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs[1],
            Run::Dense {
                x0: 50.0,
                x1: 51.2,
                last: "0"
            }
        );
    }

    #[test]
    fn edge_segments_never_collapse() {
        let segs = [Segment {
            x0: 99.5,
            x1: 100.0,
            value: "1",
            open_start: false,
            open_end: true,
        }];
        assert!(matches!(lod_runs(&segs, 2.0)[0], Run::Wide(_)));
    }

    #[test]
    fn capsule_is_hexagon_when_closed() {
        let pts = capsule_points(0.0, 100.0, 10.0, 5.0, 4.0, false, false);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(0.0, 10.0));
        assert_eq!(pts[3], Point::new(100.0, 10.0));
        let open = capsule_points(0.0, 100.0, 10.0, 5.0, 4.0, true, true);
        assert_eq!(open.len(), 4);
    }

    #[test]
    fn capsule_slant_limited_by_width() {
        let pts = capsule_points(0.0, 4.0, 10.0, 5.0, 10.0, false, false);
        assert_eq!(pts[1].x, 2.0);
    }

    #[test]
    fn fit_text_full_shrunk_truncated() {
        assert_eq!(fit_text("AB", 100.0, 10.0), Some(("AB".to_string(), 10.0)));
        let (text, size) = fit_text("ABCDEFGHIJ", 54.0, 10.0).unwrap();
        assert_eq!(text, "ABCDEFGHIJ");
        assert!((size - 9.0).abs() < 1e-9);
        let (text, size) = fit_text("ABCDEFGHIJ", 23.0, 10.0).unwrap();
        assert_eq!(text, "ABCD…");
        assert!((size - 7.0).abs() < 1e-9);
        assert_eq!(fit_text("ABCDEFGHIJ", 5.0, 10.0), None);
    }

    proptest::proptest! {
        #[test]
        fn runs_cover_segments(widths in proptest::collection::vec(0.01f64..20.0, 1..200)) {
            let mut x = 0.0;
            let segs: Vec<Segment<'_>> = widths
                .iter()
                .map(|w| {
                    let seg = Segment { x0: x, x1: x + w, value: "1", open_start: false, open_end: false };
                    x += w;
                    seg
                })
                .collect();
            let runs = lod_runs(&segs, 2.0);
            let edges = |r: &Run<'_>| match r {
                Run::Wide(s) => (s.x0, s.x1),
                Run::Dense { x0, x1, .. } => (*x0, *x1),
            };
            proptest::prop_assert_eq!(edges(&runs[0]).0, 0.0);
            proptest::prop_assert_eq!(edges(&runs[runs.len() - 1]).1, x);
            for pair in runs.windows(2) {
                proptest::prop_assert_eq!(edges(&pair[0]).1, edges(&pair[1]).0);
            }
        }
    }
}
