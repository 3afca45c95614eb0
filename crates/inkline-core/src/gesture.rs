//! Gesture classification: scratch patterns and path intersection.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::Point;

use crate::geometry;
use crate::path::DrawingPath;

/// Minimum number of samples before a stroke can classify as a scratch.
const MIN_SCRATCH_POINTS: usize = 15;
/// Direction reversals required; four reversals is roughly two full
/// back-and-forth cycles.
const MIN_REVERSALS: usize = 4;

/// Whether a finished stroke looks like a back-and-forth scratch.
///
/// Directions are sampled between points two indices apart, skipping pairs
/// shorter than `noise_floor`. A reversal is a turn of more than a quarter
/// circle between consecutive sampled directions. Pure classification: what
/// happens to a scratch is host policy.
pub fn is_scratch_pattern(points: &[Point], noise_floor: f64) -> bool {
    if points.len() < MIN_SCRATCH_POINTS {
        return false;
    }

    let mut reversals = 0usize;
    let mut prev_angle: Option<f64> = None;

    for i in 2..points.len() {
        let dx = points[i].x - points[i - 2].x;
        let dy = points[i].y - points[i - 2].y;
        if (dx * dx + dy * dy).sqrt() < noise_floor {
            continue;
        }

        let angle = dy.atan2(dx);
        if let Some(prev) = prev_angle {
            // Signed angular delta, normalized to (-pi, pi].
            let mut delta = angle - prev;
            while delta <= -PI {
                delta += TAU;
            }
            while delta > PI {
                delta -= TAU;
            }
            if delta.abs() > FRAC_PI_2 {
                reversals += 1;
            }
        }
        prev_angle = Some(angle);
    }

    reversals >= MIN_REVERSALS
}

/// Whether any segment of `a` crosses any segment of `b`.
///
/// O(n * m) in segment counts; strokes are short-lived and bounded, so the
/// quadratic walk stays cheap.
pub fn paths_intersect(a: &DrawingPath, b: &DrawingPath) -> bool {
    for sa in a.points.windows(2) {
        for sb in b.points.windows(2) {
            if geometry::segments_intersect(sa[0], sa[1], sb[0], sb[1]) {
                return true;
            }
        }
    }
    false
}
