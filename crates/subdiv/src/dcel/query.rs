//! Read-only topology queries: boundaries, point tests, winding, location.

use nalgebra::Vector2;

use super::types::{EdgeId, FaceId, HalfEdgeId, PreconditionError, VertexId, Winding};
use super::{Dcel, FaceCycle};
use crate::geom2::{cross, polygon_signed_area, winding_number, Line};

/// Snapshot of the graph for rendering: vertex positions and one directed
/// segment per half-edge.
#[derive(Clone, Debug, Default)]
pub struct GraphView {
    pub vertices: Vec<Vector2<f64>>,
    pub edges: Vec<Line>,
}

impl Dcel {
    /// Boundary half-edges of `face`, starting at its leader.
    pub fn boundary(&self, face: FaceId) -> Result<FaceCycle<'_>, PreconditionError> {
        let leader = self.face(face)?.leader;
        Ok(self.face_cycle(leader))
    }

    /// Number of half-edges on the boundary of `face`.
    pub fn degree(&self, face: FaceId) -> Result<usize, PreconditionError> {
        Ok(self.boundary(face)?.count())
    }

    /// Origin positions along the boundary of `face`.
    pub fn boundary_vertices(&self, face: FaceId) -> Result<Vec<Vector2<f64>>, PreconditionError> {
        Ok(self
            .boundary(face)?
            .map(|h| self.pos(self.he(h).origin))
            .collect())
    }

    /// Boundary of `face` as drawable segments in walk order.
    pub fn boundary_segments(&self, face: FaceId) -> Result<Vec<Line>, PreconditionError> {
        Ok(self.boundary(face)?.map(|h| self.segment_unchecked(h)).collect())
    }

    /// Segment `origin(h) → dest(h)`.
    pub fn segment(&self, h: HalfEdgeId) -> Result<Line, PreconditionError> {
        self.half_edge(h)?;
        Ok(self.segment_unchecked(h))
    }

    pub(crate) fn segment_unchecked(&self, h: HalfEdgeId) -> Line {
        Line::segment(self.pos(self.he(h).origin), self.pos(self.head(h)))
    }

    /// Outgoing half-edges of `v` in counterclockwise order (`twin(prev(h))` steps).
    pub fn vertex_star(&self, v: VertexId) -> Result<Vec<HalfEdgeId>, PreconditionError> {
        let vertex = self.vertex(v)?;
        let Some(&first) = vertex.outgoing.first() else {
            return Ok(Vec::new());
        };
        let mut star = Vec::with_capacity(vertex.outgoing.len());
        let mut cur = first;
        loop {
            star.push(cur);
            cur = self.he(self.he(cur).prev).twin;
            if cur == first || star.len() > vertex.outgoing.len() {
                break;
            }
        }
        Ok(star)
    }

    /// Shoelace area of the boundary of `face`; negative for the unbounded face.
    pub fn signed_area(&self, face: FaceId) -> Result<f64, PreconditionError> {
        Ok(polygon_signed_area(&self.boundary_vertices(face)?))
    }

    /// Orientation of the boundary of `face`.
    pub fn winding(&self, face: FaceId) -> Result<Winding, PreconditionError> {
        self.face(face)?;
        Ok(self.winding_unchecked(face))
    }

    pub(crate) fn winding_unchecked(&self, face: FaceId) -> Winding {
        let pts: Vec<Vector2<f64>> = self
            .face_cycle(self.faces[face].leader)
            .map(|h| self.pos(self.he(h).origin))
            .collect();
        if polygon_signed_area(&pts) < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// The clockwise face, if any faces exist.
    pub fn unbounded_face(&self) -> Option<FaceId> {
        self.faces
            .keys()
            .find(|&f| self.winding_unchecked(f) == Winding::Clockwise)
    }

    /// Half-plane test: `p` is left of (or on) every boundary edge of `face`.
    ///
    /// Exact for convex faces only; a reflex corner makes it reject points that
    /// are inside. `cfg.eps_inside > 0` admits points slightly outside.
    pub fn inside_convex(&self, p: Vector2<f64>, face: FaceId) -> Result<bool, PreconditionError> {
        check_finite(p)?;
        let eps = self.cfg.eps_inside;
        for h in self.boundary(face)? {
            let o = self.pos(self.he(h).origin);
            let a = self.pos(self.head(h));
            if cross(a - o, p - o) < -eps {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// General point-in-face test by winding number.
    ///
    /// Bounded faces contain `p` when their boundary winds around it; the
    /// unbounded face contains `p` when its boundary does not.
    pub fn inside(&self, p: Vector2<f64>, face: FaceId) -> Result<bool, PreconditionError> {
        check_finite(p)?;
        let pts = self.boundary_vertices(face)?;
        let wn = winding_number(&pts, p);
        Ok(if polygon_signed_area(&pts) < 0.0 {
            wn == 0
        } else {
            wn != 0
        })
    }

    /// Face containing `p`: the first face whose `inside` test accepts it,
    /// else the last clockwise face seen. `None` only for an empty structure.
    pub fn locate(&self, p: Vector2<f64>) -> Result<Option<FaceId>, PreconditionError> {
        check_finite(p)?;
        let mut unbounded = None;
        for f in self.faces.keys() {
            if self.inside(p, f)? {
                return Ok(Some(f));
            }
            if self.winding_unchecked(f) == Winding::Clockwise {
                unbounded = Some(f);
            }
        }
        Ok(unbounded)
    }

    /// Face on the other side of `edge`, seen from `face`.
    pub fn step_over_edge(
        &self,
        face: FaceId,
        edge: HalfEdgeId,
    ) -> Result<FaceId, PreconditionError> {
        self.face(face)?;
        let he = self.half_edge(edge)?;
        let across = self.he(he.twin).face;
        if he.face == face {
            Ok(across)
        } else if across == face {
            Ok(he.face)
        } else {
            Err(PreconditionError::EdgeNotOnFace { edge, face })
        }
    }

    /// Faces on the two sides of `edge` (canonical half-edge side first).
    pub fn faces_of_edge(&self, edge: EdgeId) -> Result<(FaceId, FaceId), PreconditionError> {
        let he = self.half_edge(edge.half_edge())?;
        Ok((he.face, self.he(he.twin).face))
    }

    /// Vertex positions and directed half-edge segments.
    pub fn graph(&self) -> GraphView {
        GraphView {
            vertices: self.vertices.values().map(|v| v.pos).collect(),
            edges: self
                .half_edges
                .keys()
                .map(|h| self.segment_unchecked(h))
                .collect(),
        }
    }
}

pub(crate) fn check_finite(p: Vector2<f64>) -> Result<(), PreconditionError> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(PreconditionError::NonFinitePoint)
    }
}
