//! Geometry helpers shared by the gesture classifier and lasso selector.

use kurbo::Point;

/// Squared distance between two points.
pub fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Counter-clockwise orientation test for the ordered triple (a, b, c).
fn ccw(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Whether segments (a1, a2) and (b1, b2) properly cross.
///
/// Collinear overlap and exact endpoint touching are not reported; for
/// freehand stroke samples those configurations are measure-zero and the
/// scratch-delete use case does not depend on them.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    ccw(a1, b1, b2) != ccw(a2, b1, b2) && ccw(a1, a2, b1) != ccw(a1, a2, b2)
}

/// Ray-casting point-in-polygon test (even-odd rule).
///
/// The polygon is treated as closed between its last and first vertex.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
