//! Records, handles, and error types for the half-edge engine.
//!
//! Handles are `slotmap` keys: an index plus a generation. Destroying an entity
//! bumps the generation of its slot, so a handle kept across the mutation that
//! destroyed its target is rejected instead of silently aliasing a reused slot.

use std::fmt;

use nalgebra::Vector2;

slotmap::new_key_type! {
    /// Handle to a vertex.
    pub struct VertexId;
    /// Handle to one directed half of an edge.
    pub struct HalfEdgeId;
    /// Handle to a face (bounded or unbounded).
    pub struct FaceId;
}

/// Undirected edge handle: the smaller of the two half-edge keys.
///
/// Two `EdgeId`s compare equal iff they name the same twin pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) HalfEdgeId);

impl EdgeId {
    /// Canonical half-edge of the pair.
    #[inline]
    pub fn half_edge(self) -> HalfEdgeId {
        self.0
    }
}

/// A vertex: position plus every half-edge leaving it.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Vector2<f64>,
    /// Half-edges whose origin is this vertex (unordered).
    pub outgoing: Vec<HalfEdgeId>,
}

/// A directed half-edge `origin → dest(twin)`; its face lies to the left.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub twin: HalfEdgeId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    pub face: FaceId,
}

/// A face: one boundary half-edge and an optional caller payload.
#[derive(Clone, Debug)]
pub struct Face {
    pub leader: HalfEdgeId,
    pub payload: Option<Vector2<f64>>,
}

/// Orientation of a face boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    /// Positive area: a bounded face.
    CounterClockwise,
    /// Negative area: the unbounded face.
    Clockwise,
}

/// Errors raised while building a subdivision from a vertex/edge list.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionError {
    /// An edge references a vertex index that does not exist.
    IndexOutOfRange { edge: usize, index: usize, vertices: usize },
    /// A vertex position is NaN or infinite.
    NonFinite { vertex: usize },
    /// An edge joins a vertex to itself.
    SelfLoop { edge: usize },
    /// An edge joins two vertices at the same position.
    ZeroLength { edge: usize },
    /// The same undirected edge is listed twice.
    DuplicateEdge { edge: usize },
    /// A vertex has fewer than two incident edges.
    DanglingVertex { vertex: usize, degree: usize },
    /// The angular walk found no admissible successor at a vertex.
    Unlinkable { vertex: usize },
    /// Some half-edges were not reached from the first face (disconnected input).
    Disconnected { unreached: usize },
    /// `F = 2 - V + E` does not hold.
    EulerMismatch { vertices: usize, edges: usize, faces: usize },
    /// Not exactly one clockwise face (self-intersecting or nested input).
    UnboundedFaceCount { count: usize },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange {
                edge,
                index,
                vertices,
            } => write!(
                f,
                "edge {edge} references vertex {index}, but only {vertices} vertices exist"
            ),
            Self::NonFinite { vertex } => write!(f, "vertex {vertex} has a non-finite position"),
            Self::SelfLoop { edge } => write!(f, "edge {edge} is a self-loop"),
            Self::ZeroLength { edge } => write!(f, "edge {edge} has coincident endpoints"),
            Self::DuplicateEdge { edge } => write!(f, "edge {edge} duplicates an earlier edge"),
            Self::DanglingVertex { vertex, degree } => write!(
                f,
                "vertex {vertex} has degree {degree} (every vertex needs at least 2 edges)"
            ),
            Self::Unlinkable { vertex } => {
                write!(f, "no admissible successor half-edge around vertex {vertex}")
            }
            Self::Disconnected { unreached } => write!(
                f,
                "graph is disconnected ({unreached} half-edges unreachable from the first face)"
            ),
            Self::EulerMismatch {
                vertices,
                edges,
                faces,
            } => write!(
                f,
                "couldn't identify faces: V={vertices}, E={edges}, F={faces} violates F = 2 - V + E"
            ),
            Self::UnboundedFaceCount { count } => write!(
                f,
                "expected exactly one clockwise (unbounded) face, found {count}"
            ),
        }
    }
}

impl std::error::Error for ConstructionError {}

/// A structural precondition of a query or edit does not hold.
///
/// Edits check every precondition before rewiring anything, so the structure
/// is unchanged when one of these is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum PreconditionError {
    StaleVertex(VertexId),
    StaleHalfEdge(HalfEdgeId),
    StaleFace(FaceId),
    /// No boundary half-edge of `face` starts at `vertex`.
    VertexNotOnFace { vertex: VertexId, face: FaceId },
    /// `link` does not separate `f1` from `f2`.
    FacesNotAdjacent {
        f1: FaceId,
        f2: FaceId,
        link: HalfEdgeId,
    },
    /// Neither side of `edge` bounds `face`.
    EdgeNotOnFace { edge: HalfEdgeId, face: FaceId },
    /// A chord needs two distinct endpoints.
    SameVertex(VertexId),
    /// `u` and `v` are already consecutive on the boundary of `face`.
    AlreadyJoined {
        u: VertexId,
        v: VertexId,
        face: FaceId,
    },
    /// Removing `link` would split the graph into two components.
    WouldDisconnect { link: HalfEdgeId },
    /// The region hint of `delete_interior` is the unbounded face.
    UnboundedHint(FaceId),
    /// A query or split point is NaN or infinite.
    NonFinitePoint,
    /// The split point does not lie on the edge it should split.
    PointOffEdge { edge: HalfEdgeId },
    /// Face lookup by index past the end.
    FaceIndexOutOfRange { index: usize, faces: usize },
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleVertex(v) => write!(f, "vertex handle {v:?} is stale"),
            Self::StaleHalfEdge(h) => write!(f, "half-edge handle {h:?} is stale"),
            Self::StaleFace(fc) => write!(f, "face handle {fc:?} is stale"),
            Self::VertexNotOnFace { vertex, face } => {
                write!(f, "vertex {vertex:?} is not on the boundary of face {face:?}")
            }
            Self::FacesNotAdjacent { f1, f2, link } => write!(
                f,
                "faces {f1:?} and {f2:?} aren't touching across half-edge {link:?}"
            ),
            Self::EdgeNotOnFace { edge, face } => {
                write!(f, "edge {edge:?} does not bound face {face:?}")
            }
            Self::SameVertex(v) => write!(f, "cannot join vertex {v:?} to itself"),
            Self::AlreadyJoined { u, v, face } => write!(
                f,
                "vertices {u:?} and {v:?} are already joined along face {face:?}"
            ),
            Self::WouldDisconnect { link } => {
                write!(f, "removing edge {link:?} would disconnect the graph")
            }
            Self::UnboundedHint(fc) => {
                write!(f, "face {fc:?} is unbounded and cannot seed an interior merge")
            }
            Self::NonFinitePoint => write!(f, "point has a non-finite coordinate"),
            Self::PointOffEdge { edge } => {
                write!(f, "split point does not lie on edge {edge:?}")
            }
            Self::FaceIndexOutOfRange { index, faces } => {
                write!(f, "face index {index} out of range ({faces} faces)")
            }
        }
    }
}

impl std::error::Error for PreconditionError {}

/// A violated structural invariant, reported by `Dcel::validate`.
#[derive(Clone, Debug, PartialEq)]
pub enum InvariantError {
    /// A reference field points at a destroyed entity.
    Dangling { half_edge: HalfEdgeId, field: &'static str },
    /// `twin(twin(h)) != h`, or `h` is its own twin.
    TwinMismatch(HalfEdgeId),
    /// `h` and its twin leave the same vertex.
    DegenerateEdge(HalfEdgeId),
    /// `prev(next(h)) != h` or `next(prev(h)) != h`.
    LinkMismatch(HalfEdgeId),
    /// `h` and `next(h)` are assigned to different faces.
    FaceMismatch(HalfEdgeId),
    /// `next(h)` does not start where `h` ends.
    Discontinuous(HalfEdgeId),
    /// The leader of a face belongs to another face.
    LeaderMismatch(FaceId),
    /// The `next`-walk from a face leader does not close.
    OpenBoundary(FaceId),
    /// A half-edge lies on no face cycle.
    Unreached(HalfEdgeId),
    /// A vertex's outgoing set disagrees with the half-edge origins.
    OutgoingMismatch(VertexId),
    /// A vertex has no incident edges.
    IsolatedVertex(VertexId),
    /// Not exactly one clockwise face.
    UnboundedFaceCount { count: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dangling { half_edge, field } => {
                write!(f, "half-edge {half_edge:?} has a dangling `{field}` reference")
            }
            Self::TwinMismatch(h) => write!(f, "half-edge {h:?} has an asymmetric twin"),
            Self::DegenerateEdge(h) => {
                write!(f, "half-edge {h:?} and its twin share an origin")
            }
            Self::LinkMismatch(h) => write!(f, "next/prev links around {h:?} disagree"),
            Self::FaceMismatch(h) => {
                write!(f, "half-edge {h:?} and its successor bound different faces")
            }
            Self::Discontinuous(h) => {
                write!(f, "successor of {h:?} does not start at its destination")
            }
            Self::LeaderMismatch(fc) => write!(f, "leader of face {fc:?} bounds another face"),
            Self::OpenBoundary(fc) => write!(f, "boundary of face {fc:?} does not close"),
            Self::Unreached(h) => write!(f, "half-edge {h:?} lies on no face boundary"),
            Self::OutgoingMismatch(v) => {
                write!(f, "outgoing set of vertex {v:?} disagrees with half-edge origins")
            }
            Self::IsolatedVertex(v) => write!(f, "vertex {v:?} has no incident edges"),
            Self::UnboundedFaceCount { count } => write!(
                f,
                "expected exactly one clockwise (unbounded) face, found {count}"
            ),
        }
    }
}

impl std::error::Error for InvariantError {}
