//! Path model: captured strokes stored in normalized coordinates.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a finalized path.
pub type PathId = Uuid;

/// RGBA8 stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<peniko::Color> for Rgba {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for peniko::Color {
    fn from(color: Rgba) -> Self {
        peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Tool a path was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
}

/// A captured stroke.
///
/// Points are stored in temporal capture order, in normalized coordinates:
/// both components are fractions of the surface width/height at capture time,
/// so stored geometry is independent of display resolution and zoom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingPath {
    pub id: PathId,
    /// Sample points in capture order, components in `[0, 1]`.
    pub points: Vec<Point>,
    pub color: Rgba,
    /// Stroke width in display pixels.
    pub width: f64,
    pub tool: ToolKind,
}

impl DrawingPath {
    /// Create an empty path with the given style.
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            color,
            width,
            tool: ToolKind::Pen,
        }
    }

    /// Create from existing normalized points.
    pub fn from_points(points: Vec<Point>, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
            tool: ToolKind::Pen,
        }
    }

    /// A new path carrying this path's style and tool, with a fresh id.
    ///
    /// Used by the eraser when a split produces surviving sub-paths.
    pub fn with_points(&self, points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color: self.color,
            width: self.width,
            tool: self.tool,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box of the sample points, normalized.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Check whether a surface-pixel point falls within `radius` pixels of
    /// any sample point.
    pub fn hit_test(&self, point: Point, radius: f64, size: Size) -> bool {
        self.points
            .iter()
            .any(|&p| denormalize_point(p, size).distance(point) <= radius)
    }

    /// Move every sample point by `delta` (normalized units).
    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}

/// Convert a surface-pixel point to normalized `[0, 1]` coordinates.
pub fn normalize_point(p: Point, size: Size) -> Point {
    Point::new(p.x / size.width, p.y / size.height)
}

/// Convert a normalized point back to surface-pixel coordinates.
pub fn denormalize_point(p: Point, size: Size) -> Point {
    Point::new(p.x * size.width, p.y * size.height)
}

/// Serialize a path list to JSON.
pub fn paths_to_json(paths: &[DrawingPath]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(paths)
}

/// Deserialize a path list from JSON.
pub fn paths_from_json(json: &str) -> Result<Vec<DrawingPath>, serde_json::Error> {
    serde_json::from_str(json)
}
