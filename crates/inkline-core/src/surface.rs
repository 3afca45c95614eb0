//! Abstract immediate-mode drawing target.

use kurbo::{Point, Size};

use crate::path::Rgba;

/// Immediate-mode 2D target the engine renders strokes into.
///
/// The host owns the surface lifecycle; the engine only issues calls against
/// it while processing an event. All coordinates passed to the drawing
/// methods are in surface-pixel space. Engine entry points take the surface
/// as an `Option`, and treat `None` as "surface unavailable": the operation
/// becomes a silent no-op.
pub trait DrawSurface {
    /// Current surface dimensions in device pixels.
    ///
    /// Used for coordinate normalization at the moment of each conversion; a
    /// surface reporting a non-positive dimension is treated as unavailable.
    fn size(&self) -> Size;

    /// Start a new subpath, discarding any unstroked one.
    fn begin_path(&mut self);

    fn move_to(&mut self, p: Point);

    fn line_to(&mut self, p: Point);

    /// Quadratic curve to `p` with control point `ctrl`.
    fn quad_to(&mut self, ctrl: Point, p: Point);

    /// Cubic curve to `p` with control points `c1` and `c2`.
    fn curve_to(&mut self, c1: Point, c2: Point, p: Point);

    /// Stroke the current subpath.
    fn stroke(&mut self, color: Rgba, width: f64);

    /// Clear the whole surface.
    fn clear(&mut self);
}
