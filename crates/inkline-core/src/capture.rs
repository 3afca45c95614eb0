//! Stroke capture: pointer samples to buffered, smoothed vector paths.

use std::time::Duration;

use kurbo::{Point, Size};

use crate::config::EngineConfig;
use crate::path::{self, DrawingPath, Rgba};
use crate::surface::DrawSurface;

/// Owned buffer for the stroke currently being captured.
///
/// Constructed on `start` and consumed on `finish`/`cancel`; nothing aliases
/// it across calls.
#[derive(Debug, Clone)]
struct StrokeBuffer {
    /// Normalized sample points, temporal order. Holds exactly one point
    /// right after `start`.
    points: Vec<Point>,
    /// Style cached at stroke start, so mid-stroke config changes do not
    /// bleed into the stroke being drawn.
    color: Rgba,
    width: f64,
}

/// Stroke capture state machine.
///
/// `Idle -> Capturing -> Idle`; both `finish` and `cancel` return to idle.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    buffer: Option<StrokeBuffer>,
    /// Time of the last successful finalize, for duplicate suppression.
    last_finish: Option<Duration>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.buffer.is_some()
    }

    /// Begin a stroke at `raw` (surface pixels).
    ///
    /// No-op without a usable surface. A stroke already in progress is
    /// replaced.
    pub fn start(
        &mut self,
        raw: Point,
        surface: Option<&mut dyn DrawSurface>,
        color: Rgba,
        width: f64,
    ) {
        let Some(surface) = surface else { return };
        let Some(size) = usable_size(surface) else {
            return;
        };

        let p = path::normalize_point(raw, size);
        self.buffer = Some(StrokeBuffer {
            points: vec![p],
            color,
            width,
        });
        log::trace!("stroke started at ({:.3}, {:.3})", p.x, p.y);
    }

    /// Append a single sample (mouse-rate input), bridging visible gaps with
    /// linearly interpolated synthetic points.
    pub fn append(
        &mut self,
        raw: Point,
        surface: Option<&mut dyn DrawSurface>,
        config: &EngineConfig,
    ) {
        let Some(surface) = surface else { return };
        let Some(size) = usable_size(surface) else {
            return;
        };
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };
        let Some(&last) = buffer.points.last() else {
            return;
        };

        let p = path::normalize_point(raw, size);
        let gap = pixel_distance(last, p, size);
        if gap > config.interpolation_gap {
            let synthetic =
                ((gap / config.interpolation_gap) as usize).min(config.max_interpolated);
            for k in 1..=synthetic {
                let t = k as f64 / (synthetic + 1) as f64;
                buffer.points.push(last.lerp(p, t));
                draw_newest(buffer, surface, size);
            }
        }

        buffer.points.push(p);
        draw_newest(buffer, surface, size);
    }

    /// Append a batch of coalesced samples (stylus-rate input).
    ///
    /// Input density is already sufficient, so no interpolation; instead,
    /// samples closer than the de-dup threshold to the last buffered point
    /// are dropped to suppress jitter. Samples are processed in their
    /// original temporal order.
    pub fn append_batch(
        &mut self,
        raws: &[Point],
        surface: Option<&mut dyn DrawSurface>,
        config: &EngineConfig,
    ) {
        let Some(surface) = surface else { return };
        let Some(size) = usable_size(surface) else {
            return;
        };
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };

        for &raw in raws {
            let Some(&last) = buffer.points.last() else {
                break;
            };
            let p = path::normalize_point(raw, size);
            if pixel_distance(last, p, size) < config.batch_min_distance {
                continue;
            }
            buffer.points.push(p);
            draw_newest(buffer, surface, size);
        }
    }

    /// Finalize the stroke and return the finished path.
    ///
    /// Duplicate finalize signals inside the refractory window are swallowed,
    /// so overlapping input backends cannot emit two paths for one stroke.
    /// Single-point buffers (a tap that never moved) are dropped.
    pub fn finish(&mut self, now: Duration, config: &EngineConfig) -> Option<DrawingPath> {
        let buffer = self.buffer.take()?;

        if let Some(last) = self.last_finish {
            if now.saturating_sub(last) < config.finish_debounce {
                log::trace!("duplicate finalize within refractory window, swallowed");
                return None;
            }
        }

        if buffer.points.len() < 2 {
            log::trace!("discarding degenerate {}-point stroke", buffer.points.len());
            return None;
        }

        self.last_finish = Some(now);
        log::debug!("stroke finalized with {} points", buffer.points.len());
        Some(DrawingPath::from_points(
            buffer.points,
            buffer.color,
            buffer.width,
        ))
    }

    /// Discard the in-progress stroke without emitting it.
    ///
    /// Returns whether a stroke was actually discarded; the caller clears the
    /// partial on-surface rendering.
    pub fn cancel(&mut self) -> bool {
        self.buffer.take().is_some()
    }
}

/// Incrementally draw only the newest segment of the buffer.
///
/// Two buffered points draw a straight segment. With three or more, the
/// newest segment runs from the midpoint of the previous pair to the midpoint
/// of the last pair, with the middle point as quadratic control, so
/// consecutive segments share exact endpoint coordinates and no seams or
/// double-strokes appear.
fn draw_newest(buffer: &StrokeBuffer, surface: &mut dyn DrawSurface, size: Size) {
    let n = buffer.points.len();
    if n < 2 {
        return;
    }

    surface.begin_path();
    if n == 2 {
        surface.move_to(path::denormalize_point(buffer.points[0], size));
        surface.line_to(path::denormalize_point(buffer.points[1], size));
    } else {
        let a = buffer.points[n - 3];
        let b = buffer.points[n - 2];
        let c = buffer.points[n - 1];
        surface.move_to(path::denormalize_point(a.midpoint(b), size));
        surface.quad_to(
            path::denormalize_point(b, size),
            path::denormalize_point(b.midpoint(c), size),
        );
    }
    surface.stroke(buffer.color, buffer.width);
}

/// Draw a finalized path onto the surface.
///
/// Unlike the live smoothing, this must pass exactly through every captured
/// point, so consecutive point quadruples are connected with
/// Catmull-Rom-derived cubics (tangent 1/6 of the neighbor chord, endpoints
/// repeated at the path ends). The visual result matches the live rendering
/// closely enough that re-rendering after capture causes no visible jump.
pub fn render_path(path: &DrawingPath, surface: &mut dyn DrawSurface) {
    let Some(size) = usable_size(surface) else {
        return;
    };
    let pts = &path.points;
    if pts.len() < 2 {
        return;
    }

    surface.begin_path();
    surface.move_to(path::denormalize_point(pts[0], size));

    if pts.len() == 2 {
        surface.line_to(path::denormalize_point(pts[1], size));
    } else {
        let n = pts.len();
        for i in 0..n - 1 {
            let p0 = if i == 0 { pts[0] } else { pts[i - 1] };
            let p1 = pts[i];
            let p2 = pts[i + 1];
            let p3 = if i + 2 < n { pts[i + 2] } else { pts[n - 1] };

            let c1 = Point::new(
                p1.x + (p2.x - p0.x) / 6.0,
                p1.y + (p2.y - p0.y) / 6.0,
            );
            let c2 = Point::new(
                p2.x - (p3.x - p1.x) / 6.0,
                p2.y - (p3.y - p1.y) / 6.0,
            );
            surface.curve_to(
                path::denormalize_point(c1, size),
                path::denormalize_point(c2, size),
                path::denormalize_point(p2, size),
            );
        }
    }

    surface.stroke(path.color, path.width);
}

/// Clear the surface and re-render the full path list.
pub fn render_all(paths: &[DrawingPath], surface: &mut dyn DrawSurface) {
    surface.clear();
    for path in paths {
        render_path(path, surface);
    }
}

/// Surface size, or `None` when the surface reports unusable dimensions.
fn usable_size(surface: &dyn DrawSurface) -> Option<Size> {
    let size = surface.size();
    (size.width > 0.0 && size.height > 0.0).then_some(size)
}

/// Distance between two normalized points, measured in surface pixels.
fn pixel_distance(a: Point, b: Point, size: Size) -> f64 {
    let dx = (a.x - b.x) * size.width;
    let dy = (a.y - b.y) * size.height;
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Rgba;
    use approx::assert_abs_diff_eq;
    use kurbo::Size;

    /// Records draw calls for assertions.
    #[derive(Debug)]
    struct RecordingSurface {
        size: Size,
        calls: Vec<Call>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin,
        MoveTo(Point),
        LineTo(Point),
        QuadTo(Point, Point),
        CurveTo(Point, Point, Point),
        Stroke,
        Clear,
    }

    impl RecordingSurface {
        fn new(width: f64, height: f64) -> Self {
            Self {
                size: Size::new(width, height),
                calls: Vec::new(),
            }
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn size(&self) -> Size {
            self.size
        }
        fn begin_path(&mut self) {
            self.calls.push(Call::Begin);
        }
        fn move_to(&mut self, p: Point) {
            self.calls.push(Call::MoveTo(p));
        }
        fn line_to(&mut self, p: Point) {
            self.calls.push(Call::LineTo(p));
        }
        fn quad_to(&mut self, ctrl: Point, p: Point) {
            self.calls.push(Call::QuadTo(ctrl, p));
        }
        fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
            self.calls.push(Call::CurveTo(c1, c2, p));
        }
        fn stroke(&mut self, _color: Rgba, _width: f64) {
            self.calls.push(Call::Stroke);
        }
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_batch_capture_normalizes_points() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(
            &[Point::new(50.0, 50.0), Point::new(100.0, 100.0)],
            Some(&mut surface),
            &config,
        );

        let path = capture.finish(Duration::from_millis(100), &config).unwrap();
        assert_eq!(path.points.len(), 3);
        assert_abs_diff_eq!(path.points[0].x, 0.0);
        assert_abs_diff_eq!(path.points[1].x, 0.5);
        assert_abs_diff_eq!(path.points[1].y, 0.5);
        assert_abs_diff_eq!(path.points[2].x, 1.0);
        assert_abs_diff_eq!(path.points[2].y, 1.0);
    }

    #[test]
    fn test_no_surface_is_noop() {
        let mut capture = StrokeCapture::new();
        capture.start(Point::new(10.0, 10.0), None, Rgba::black(), 2.0);
        assert!(!capture.is_capturing());
    }

    #[test]
    fn test_single_sample_interpolates_gaps() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        // 20 px gap with a 5 px threshold: 4 synthetic points, 5 total appends.
        capture.append(Point::new(20.0, 0.0), Some(&mut surface), &config);

        let path = capture.finish(Duration::from_millis(100), &config).unwrap();
        assert_eq!(path.points.len(), 6);
        // Synthetic points are evenly spaced along the gap.
        assert_abs_diff_eq!(path.points[1].x, 0.04, epsilon = 1e-9);
        assert_abs_diff_eq!(path.points[2].x, 0.08, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolation_is_capped() {
        let mut surface = RecordingSurface::new(1000.0, 1000.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        // A 900 px jump would want 180 synthetic points; the cap bounds it.
        capture.append(Point::new(900.0, 0.0), Some(&mut surface), &config);

        let path = capture.finish(Duration::from_millis(100), &config).unwrap();
        assert_eq!(path.points.len(), 2 + config.max_interpolated);
    }

    #[test]
    fn test_batch_drops_jitter() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(50.0, 50.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(
            &[
                Point::new(50.3, 50.0), // below the 1 px de-dup threshold
                Point::new(55.0, 50.0),
                Point::new(55.2, 50.1), // below threshold again
                Point::new(60.0, 50.0),
            ],
            Some(&mut surface),
            &config,
        );

        let path = capture.finish(Duration::from_millis(100), &config).unwrap();
        assert_eq!(path.points.len(), 3);
    }

    #[test]
    fn test_incremental_rendering_segments() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(&[Point::new(4.0, 0.0)], Some(&mut surface), &config);
        // First segment is a straight line.
        assert_eq!(surface.count(|c| matches!(c, Call::LineTo(_))), 1);

        capture.append_batch(&[Point::new(8.0, 4.0)], Some(&mut surface), &config);
        // Third point switches to quadratic smoothing.
        assert_eq!(surface.count(|c| matches!(c, Call::QuadTo(..))), 1);
        assert_eq!(surface.count(|c| matches!(c, Call::Stroke)), 2);
    }

    #[test]
    fn test_smoothed_segments_share_endpoints() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        for p in [
            Point::new(4.0, 0.0),
            Point::new(8.0, 4.0),
            Point::new(12.0, 0.0),
        ] {
            capture.append_batch(&[p], Some(&mut surface), &config);
        }

        // Each quad segment must start where the previous one ended.
        let mut quad_ends = Vec::new();
        let mut quad_starts = Vec::new();
        for window in surface.calls.windows(2) {
            if let [Call::MoveTo(start), Call::QuadTo(_, end)] = window {
                quad_starts.push(*start);
                quad_ends.push(*end);
            }
        }
        assert_eq!(quad_starts.len(), 2);
        assert_abs_diff_eq!(quad_starts[1].x, quad_ends[0].x, epsilon = 1e-9);
        assert_abs_diff_eq!(quad_starts[1].y, quad_ends[0].y, epsilon = 1e-9);
    }

    #[test]
    fn test_finish_debounce_swallows_duplicate() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(&[Point::new(50.0, 50.0)], Some(&mut surface), &config);
        assert!(capture.finish(Duration::from_millis(100), &config).is_some());

        // A second stroke started and stopped within the refractory window
        // (overlapping backend delivering the same gesture twice).
        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(&[Point::new(50.0, 50.0)], Some(&mut surface), &config);
        assert!(capture.finish(Duration::from_millis(120), &config).is_none());

        // Past the window, finalize works again.
        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(&[Point::new(50.0, 50.0)], Some(&mut surface), &config);
        assert!(capture.finish(Duration::from_millis(200), &config).is_some());
    }

    #[test]
    fn test_tap_is_dropped() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(10.0, 10.0), Some(&mut surface), Rgba::black(), 2.0);
        assert!(capture.finish(Duration::from_millis(100), &config).is_none());
        assert!(!capture.is_capturing());
    }

    #[test]
    fn test_cancel_discards_without_emitting() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut capture = StrokeCapture::new();
        let config = config();

        capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
        capture.append_batch(&[Point::new(50.0, 50.0)], Some(&mut surface), &config);

        assert!(capture.cancel());
        assert!(!capture.is_capturing());
        assert!(capture.finish(Duration::from_millis(100), &config).is_none());
    }

    #[test]
    fn test_finalized_paths_never_degenerate() {
        // Any capture fed at least two distinct raw samples finalizes with
        // at least two points.
        let config = config();
        for sample_count in 2..8 {
            let mut surface = RecordingSurface::new(100.0, 100.0);
            let mut capture = StrokeCapture::new();
            capture.start(Point::new(0.0, 0.0), Some(&mut surface), Rgba::black(), 2.0);
            for i in 1..sample_count {
                capture.append_batch(
                    &[Point::new(i as f64 * 10.0, 0.0)],
                    Some(&mut surface),
                    &config,
                );
            }
            let path = capture.finish(Duration::from_secs(1), &config).unwrap();
            assert!(path.points.len() >= 2);
        }
    }

    #[test]
    fn test_static_render_passes_through_points() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let path = DrawingPath::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.3, 0.4),
                Point::new(0.6, 0.2),
                Point::new(0.9, 0.5),
            ],
            Rgba::black(),
            2.0,
        );

        render_path(&path, &mut surface);

        // Every cubic segment lands exactly on a captured point.
        let ends: Vec<Point> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::CurveTo(_, _, p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(ends.len(), 3);
        assert_abs_diff_eq!(ends[0].x, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[0].y, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[2].x, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[2].y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_render_all_clears_first() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let paths = vec![DrawingPath::from_points(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            Rgba::black(),
            2.0,
        )];

        render_all(&paths, &mut surface);

        assert_eq!(surface.calls[0], Call::Clear);
        assert_eq!(surface.count(|c| matches!(c, Call::Stroke)), 1);
    }

    #[test]
    fn test_two_point_path_renders_as_line() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let path = DrawingPath::from_points(
            vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)],
            Rgba::black(),
            2.0,
        );

        render_path(&path, &mut surface);

        assert_eq!(surface.count(|c| matches!(c, Call::LineTo(_))), 1);
        assert_eq!(surface.count(|c| matches!(c, Call::CurveTo(..))), 0);
    }
}
