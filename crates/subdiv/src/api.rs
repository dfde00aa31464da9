//! Curated re-export surface.
//!
//! Callers outside this crate (the CLI, benches, integration tests) import from
//! here so that internal module moves do not ripple out.

// Primitives
pub use crate::geom2::{
    bisector, cross, dot, intersect, intersect_eps, magnitude, polygon_signed_area, side,
    winding_number, GeomCfg, Line, LineKind,
};
// Seeded site generation
pub use crate::geom2::rand::{draw_sites, ReplayToken as SiteReplay, SiteCfg};
// Subdivision
pub use crate::dcel::{
    ConstructionError, Dcel, EdgeId, Face, FaceCycle, FaceId, GraphView, HalfEdge, HalfEdgeId,
    InvariantError, PreconditionError, Vertex, VertexId, Winding,
};
// Voronoi
pub use crate::voronoi::{sites_from_normalized, Cell, VoronoiDiagram, VoronoiError};
