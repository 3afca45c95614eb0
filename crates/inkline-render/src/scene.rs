//! Retained scene built from the engine's immediate-mode draw calls.

use inkline_core::path::Rgba;
use inkline_core::surface::DrawSurface;
use kurbo::{BezPath, Point, Size};

/// One stroked subpath recorded from the engine.
#[derive(Debug, Clone)]
pub struct ScenePath {
    pub path: BezPath,
    pub color: Rgba,
    /// Stroke width in display pixels.
    pub width: f64,
}

/// A [`DrawSurface`] that records stroke calls into retained `BezPath`s.
///
/// Hosts drain the recorded paths into whatever vector backend they use;
/// tests use it to observe exactly what the engine drew.
#[derive(Debug, Clone, Default)]
pub struct SceneSurface {
    size: Size,
    paths: Vec<ScenePath>,
    current: BezPath,
}

impl SceneSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            paths: Vec::new(),
            current: BezPath::new(),
        }
    }

    /// Update the surface dimensions (viewport resize).
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Recorded paths, oldest first.
    pub fn paths(&self) -> &[ScenePath] {
        &self.paths
    }

    /// Drain the recorded paths, leaving the scene empty.
    pub fn take_paths(&mut self) -> Vec<ScenePath> {
        std::mem::take(&mut self.paths)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl DrawSurface for SceneSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn begin_path(&mut self) {
        self.current = BezPath::new();
    }

    fn move_to(&mut self, p: Point) {
        self.current.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.current.line_to(p);
    }

    fn quad_to(&mut self, ctrl: Point, p: Point) {
        self.current.quad_to(ctrl, p);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.current.curve_to(c1, c2, p);
    }

    fn stroke(&mut self, color: Rgba, width: f64) {
        if self.current.elements().is_empty() {
            return;
        }
        self.paths.push(ScenePath {
            path: std::mem::take(&mut self.current),
            color,
            width,
        });
    }

    fn clear(&mut self) {
        self.paths.clear();
        self.current = BezPath::new();
    }
}
