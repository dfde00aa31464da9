//! Line/segment intersection and perpendicular bisectors.

use nalgebra::Vector2;

use super::types::{GeomCfg, Line};
use super::util::cross;

/// Intersection point of `l1` and `l2` with exact parallel detection.
///
/// Shorthand for `intersect_eps(l1, l2, GeomCfg::default())`.
#[inline]
pub fn intersect(l1: &Line, l2: &Line) -> Option<Vector2<f64>> {
    intersect_eps(l1, l2, GeomCfg::default())
}

/// Intersection point of `l1` and `l2` (Cramer's rule on the cross determinant).
///
/// - `|cross(d1, d2)| <= cfg.eps_det` (parallel or collinear) → `None`.
/// - Each segment operand must see its own parameter in `[0, 1]`; full lines
///   accept any parameter, so a mixed pair only checks the segment side.
pub fn intersect_eps(l1: &Line, l2: &Line, cfg: GeomCfg) -> Option<Vector2<f64>> {
    let det = cross(l1.dir, l2.dir);
    if det.abs() <= cfg.eps_det || !det.is_finite() {
        return None;
    }
    let a = l2.origin - l1.origin;
    let t1 = cross(a, l2.dir) / det;
    let t2 = cross(a, l1.dir) / det;
    if !(l1.admits(t1) && l2.admits(t2)) {
        return None;
    }
    Some(l1.point_at(t1))
}

/// Perpendicular bisector of `a–b`: full line through the midpoint with
/// direction `(b − a)` rotated by +90°.
pub fn bisector(a: Vector2<f64>, b: Vector2<f64>) -> Line {
    let mid = (a + b) * 0.5;
    let d = b - a;
    Line::full(mid, Vector2::new(-d.y, d.x))
}
