use nalgebra::Vector2;

#[inline]
pub fn magnitude(a: Vector2<f64>) -> f64 {
    a.norm()
}

#[inline]
pub fn dot(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.dot(&b)
}

/// z-component of the 3D cross product (signed parallelogram area).
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Half-plane side of `b` relative to `a`: `+1` for non-negative cross, else `-1`.
#[inline]
pub fn side(a: Vector2<f64>, b: Vector2<f64>) -> i8 {
    if cross(a, b) >= 0.0 {
        1
    } else {
        -1
    }
}

/// Shoelace area; positive for counterclockwise vertex order.
pub fn polygon_signed_area(pts: &[Vector2<f64>]) -> f64 {
    if pts.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for k in 0..pts.len() {
        let p = pts[k];
        let q = pts[(k + 1) % pts.len()];
        acc += cross(p, q);
    }
    0.5 * acc
}

/// Winding number of the closed polygon `pts` around `p` (crossing rule).
///
/// Points exactly on an upward/downward edge follow the half-open convention
/// (`y0 <= p.y < y1`), so a point is never counted twice at a shared vertex.
pub fn winding_number(pts: &[Vector2<f64>], p: Vector2<f64>) -> i32 {
    let mut wn = 0;
    for k in 0..pts.len() {
        let a = pts[k];
        let b = pts[(k + 1) % pts.len()];
        let is_left = cross(b - a, p - a);
        if a.y <= p.y {
            if b.y > p.y && is_left > 0.0 {
                wn += 1;
            }
        } else if b.y <= p.y && is_left < 0.0 {
            wn -= 1;
        }
    }
    wn
}
