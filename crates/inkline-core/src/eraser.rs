//! Eraser segmentation: splitting paths around erased sample ranges.

use kurbo::{Point, Size};

use crate::path::{self, DrawingPath};

/// Repeat hits travelling less than this (pixels) since the previous hit are
/// skipped. Pure optimization; no correctness effect.
const MIN_HIT_TRAVEL: f64 = 1.0;

/// Splits paths at point ranges within an eraser hit radius.
#[derive(Debug, Default)]
pub struct Eraser {
    last_hit: Option<Point>,
}

impl Eraser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an eraser hit at `hit` (surface pixels).
    ///
    /// Every path is tested point-by-point against the radius; contiguous
    /// erased ranges are cut out and each surviving remnant of at least two
    /// points replaces the original in place, preserving the relative order
    /// of all other paths. Returns the replacement list, or `None` when
    /// nothing was within reach.
    pub fn erase(
        &mut self,
        hit: Point,
        radius: f64,
        paths: &[DrawingPath],
        size: Size,
    ) -> Option<Vec<DrawingPath>> {
        if let Some(last) = self.last_hit {
            if last.distance(hit) < MIN_HIT_TRAVEL {
                return None;
            }
        }
        self.last_hit = Some(hit);

        let mut changed = false;
        let mut result = Vec::with_capacity(paths.len());
        for path in paths {
            let erased = erased_indices(path, hit, radius, size);
            if erased.is_empty() {
                result.push(path.clone());
                continue;
            }
            changed = true;
            result.extend(split_path(path, &erased));
        }

        if !changed {
            return None;
        }
        result.retain(|p| p.points.len() >= 2);
        log::debug!("erase at ({:.1}, {:.1}): {} paths remain", hit.x, hit.y, result.len());
        Some(result)
    }

    /// Forget the previous hit position (pointer lifted).
    pub fn reset(&mut self) {
        self.last_hit = None;
    }
}

/// Indices of the sample points within `radius` pixels of the hit.
fn erased_indices(path: &DrawingPath, hit: Point, radius: f64, size: Size) -> Vec<usize> {
    path.points
        .iter()
        .enumerate()
        .filter(|&(_, &p)| path::denormalize_point(p, size).distance(hit) < radius)
        .map(|(i, _)| i)
        .collect()
}

/// Split a path into the sub-ranges that survive erasure.
///
/// `erased` must be sorted ascending. Remnants shorter than two points are
/// discarded rather than kept as degenerate single-point paths.
fn split_path(path: &DrawingPath, erased: &[usize]) -> Vec<DrawingPath> {
    let mut pieces = Vec::new();
    // Emits the half-open surviving range [from, to).
    let mut emit = |from: usize, to: usize| {
        if to.saturating_sub(from) >= 2 {
            pieces.push(path.with_points(path.points[from..to].to_vec()));
        }
    };

    let mut cursor = 0usize;
    let mut i = 0usize;
    while i < erased.len() {
        let range_start = erased[i];
        let mut range_end = erased[i];
        while i + 1 < erased.len() && erased[i + 1] == range_end + 1 {
            i += 1;
            range_end = erased[i];
        }
        emit(cursor, range_start);
        cursor = range_end + 1;
        i += 1;
    }
    emit(cursor, path.points.len());

    pieces
}
