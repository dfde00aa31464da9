//! Basic 2D types and tolerances.
//!
//! - `GeomCfg`: centralizes epsilons for determinants, endpoint snapping,
//!   boundary slack in point tests, and how far a split point may stray from
//!   its edge.
//! - `Line`: origin plus direction, either an unbounded line or a segment over
//!   the parameter range `t ∈ [0, 1]`.

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Determinants with `|det| <= eps_det` count as parallel.
    pub eps_det: f64,
    /// Split points closer than this to an edge endpoint reuse the endpoint.
    pub eps_snap: f64,
    /// Slack for the half-plane test in `inside_convex` (positive is permissive).
    pub eps_inside: f64,
    /// Split points may sit this far off their edge, relative to its length
    /// (edges shorter than 1 use an absolute distance).
    pub eps_on_edge: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 0.0,
            eps_snap: 1e-12,
            eps_inside: 0.0,
            eps_on_edge: 1e-9,
        }
    }
}

/// Whether a `Line` is unbounded or restricted to `t ∈ [0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Full,
    Segment,
}

/// Parametric line `origin + t·dir`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub origin: Vector2<f64>,
    pub dir: Vector2<f64>,
    pub kind: LineKind,
}

impl Line {
    #[inline]
    pub fn new(origin: Vector2<f64>, dir: Vector2<f64>, kind: LineKind) -> Self {
        Self { origin, dir, kind }
    }

    /// Unbounded line through `origin` with direction `dir`.
    #[inline]
    pub fn full(origin: Vector2<f64>, dir: Vector2<f64>) -> Self {
        Self::new(origin, dir, LineKind::Full)
    }

    /// Segment from `a` to `b`.
    #[inline]
    pub fn segment(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self::new(a, b - a, LineKind::Segment)
    }

    /// First defining point (`t = 0`).
    #[inline]
    pub fn p1(&self) -> Vector2<f64> {
        self.origin
    }

    /// Second defining point (`t = 1`).
    #[inline]
    pub fn p2(&self) -> Vector2<f64> {
        self.origin + self.dir
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        self.origin + self.dir * t
    }

    /// Whether parameter `t` lies on this line (always true for full lines).
    #[inline]
    pub fn admits(&self, t: f64) -> bool {
        match self.kind {
            LineKind::Full => true,
            LineKind::Segment => (0.0..=1.0).contains(&t),
        }
    }

    /// Move the start point, keeping the end point fixed.
    pub fn set_p1(&mut self, p: Vector2<f64>) {
        let end = self.p2();
        self.origin = p;
        self.dir = end - p;
    }

    /// Move the end point, keeping the start point fixed.
    pub fn set_p2(&mut self, p: Vector2<f64>) {
        self.dir = p - self.origin;
    }

    /// Flat `[ox, oy, dx, dy]` layout used by plotting front-ends.
    #[inline]
    pub fn drawable(&self) -> [f64; 4] {
        [self.origin.x, self.origin.y, self.dir.x, self.dir.y]
    }
}
