//! Half-edge (DCEL) planar subdivision with incremental edits.
//!
//! Purpose
//! - Build a connected planar straight-line graph from vertices and undirected
//!   edges, derive its faces, and refine it locally: split an edge, split a
//!   face with a chord, merge faces across an edge, absorb a region into one
//!   face, and locate the face containing a point.
//!
//! Structure
//! - Every undirected edge is a twin pair of half-edges. A half-edge runs from
//!   its `origin` to the origin of its `twin`; `next`/`prev` walk the boundary
//!   of `face`, which lies to the left.
//! - Bounded faces are counterclockwise; the single unbounded face is the one
//!   clockwise cycle. No face record is special-cased.
//! - Vertices, half-edges, and faces live in `slotmap` arenas. Handles carry a
//!   generation, so handles to destroyed entities are reported as stale.
//!
//! Module map
//! - `build`: construction from an edge list (angular linking, face discovery).
//! - `query`: boundary walks, point tests, winding, point location.
//! - `ops`: split edge, split face, merge faces, delete interior.
//! - `validate`: full invariant check used by tests and the CLI.

mod build;
mod ops;
mod query;
mod types;
mod validate;

use nalgebra::Vector2;
use slotmap::SlotMap;

use crate::geom2::GeomCfg;

pub use query::GraphView;
pub use types::{
    ConstructionError, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, InvariantError,
    PreconditionError, Vertex, VertexId, Winding,
};

/// Planar subdivision over `f64` points.
#[derive(Clone, Debug)]
pub struct Dcel {
    pub(crate) vertices: SlotMap<VertexId, Vertex>,
    pub(crate) half_edges: SlotMap<HalfEdgeId, HalfEdge>,
    pub(crate) faces: SlotMap<FaceId, Face>,
    pub(crate) cfg: GeomCfg,
}

impl Dcel {
    pub(crate) fn with_cfg(cfg: GeomCfg) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            cfg,
        }
    }

    #[inline]
    pub fn cfg(&self) -> GeomCfg {
        self.cfg
    }

    // -----------------------------------------------------------------------
    // Counts
    // -----------------------------------------------------------------------

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    pub fn num_half_edges(&self) -> usize {
        self.half_edges.len()
    }
    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.half_edges.len() / 2
    }
    /// Number of faces including the unbounded face.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
    /// `(vertices, half-edges, faces)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.num_vertices(), self.num_half_edges(), self.num_faces())
    }

    /// `V - E + F`; equals 2 for every connected subdivision.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    // -----------------------------------------------------------------------
    // Checked accessors
    // -----------------------------------------------------------------------

    pub fn vertex(&self, v: VertexId) -> Result<&Vertex, PreconditionError> {
        self.vertices.get(v).ok_or(PreconditionError::StaleVertex(v))
    }

    pub fn half_edge(&self, h: HalfEdgeId) -> Result<&HalfEdge, PreconditionError> {
        self.half_edges
            .get(h)
            .ok_or(PreconditionError::StaleHalfEdge(h))
    }

    pub fn face(&self, f: FaceId) -> Result<&Face, PreconditionError> {
        self.faces.get(f).ok_or(PreconditionError::StaleFace(f))
    }

    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains_key(v)
    }
    pub fn has_half_edge(&self, h: HalfEdgeId) -> bool {
        self.half_edges.contains_key(h)
    }
    pub fn has_face(&self, f: FaceId) -> bool {
        self.faces.contains_key(f)
    }

    pub fn position(&self, v: VertexId) -> Result<Vector2<f64>, PreconditionError> {
        Ok(self.vertex(v)?.pos)
    }

    pub fn origin(&self, h: HalfEdgeId) -> Result<VertexId, PreconditionError> {
        Ok(self.half_edge(h)?.origin)
    }

    /// Vertex at the head of `h`.
    pub fn dest(&self, h: HalfEdgeId) -> Result<VertexId, PreconditionError> {
        let twin = self.half_edge(h)?.twin;
        self.origin(twin)
    }

    pub fn twin(&self, h: HalfEdgeId) -> Result<HalfEdgeId, PreconditionError> {
        Ok(self.half_edge(h)?.twin)
    }

    pub fn next(&self, h: HalfEdgeId) -> Result<HalfEdgeId, PreconditionError> {
        Ok(self.half_edge(h)?.next)
    }

    pub fn prev(&self, h: HalfEdgeId) -> Result<HalfEdgeId, PreconditionError> {
        Ok(self.half_edge(h)?.prev)
    }

    /// Face bounded by `h` (to its left).
    pub fn bounding(&self, h: HalfEdgeId) -> Result<FaceId, PreconditionError> {
        Ok(self.half_edge(h)?.face)
    }

    /// Undirected edge containing `h`.
    pub fn edge(&self, h: HalfEdgeId) -> Result<EdgeId, PreconditionError> {
        let twin = self.half_edge(h)?.twin;
        Ok(EdgeId(h.min(twin)))
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }
    pub fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges.keys()
    }
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys()
    }

    /// Every undirected edge once.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.half_edges
            .iter()
            .filter(|(h, he)| *h < he.twin)
            .map(|(h, _)| EdgeId(h))
    }

    /// Face lookup by position in arena order.
    pub fn nth_face(&self, index: usize) -> Result<FaceId, PreconditionError> {
        self.faces
            .keys()
            .nth(index)
            .ok_or(PreconditionError::FaceIndexOutOfRange {
                index,
                faces: self.faces.len(),
            })
    }

    pub fn payload(&self, f: FaceId) -> Result<Option<Vector2<f64>>, PreconditionError> {
        Ok(self.face(f)?.payload)
    }

    pub fn set_payload(
        &mut self,
        f: FaceId,
        payload: Option<Vector2<f64>>,
    ) -> Result<(), PreconditionError> {
        let face = self
            .faces
            .get_mut(f)
            .ok_or(PreconditionError::StaleFace(f))?;
        face.payload = payload;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Unchecked internals (callers validated the handles)
    // -----------------------------------------------------------------------

    #[inline]
    pub(crate) fn he(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h]
    }

    #[inline]
    pub(crate) fn pos(&self, v: VertexId) -> Vector2<f64> {
        self.vertices[v].pos
    }

    #[inline]
    pub(crate) fn head(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[h].twin].origin
    }

    /// Set `next(h) = n` and `prev(n) = h`.
    #[inline]
    pub(crate) fn link(&mut self, h: HalfEdgeId, n: HalfEdgeId) {
        self.half_edges[h].next = n;
        self.half_edges[n].prev = h;
    }

    /// Iterate the boundary cycle that contains `start`, beginning at `start`.
    pub fn face_cycle(&self, start: HalfEdgeId) -> FaceCycle<'_> {
        FaceCycle {
            dcel: self,
            start,
            current: start,
            done: !self.half_edges.contains_key(start),
        }
    }
}

/// Iterator over the half-edges of one boundary cycle (`next` order).
pub struct FaceCycle<'a> {
    dcel: &'a Dcel,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> Iterator for FaceCycle<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        if self.done {
            return None;
        }
        let he = self.current;
        self.current = self.dcel.half_edges[he].next;
        if self.current == self.start {
            self.done = true;
        }
        Some(he)
    }
}

#[cfg(test)]
mod tests;
