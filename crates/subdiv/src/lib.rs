//! Planar subdivisions with incremental edits.
//!
//! Overview
//! - `geom2`: points, lines and segments, intersection, bisectors, polygon
//!   area and winding numbers.
//! - `dcel`: half-edge subdivision built from a vertex/edge list; split edges
//!   and faces, merge faces, absorb regions, locate points.
//! - `voronoi`: incremental Voronoi diagram inside a rectangular frame,
//!   built on the edit operators.
//!
//! Numeric model
//! - `f64` throughout, no exact predicates. Tolerances live in `GeomCfg`.
//! - The library does not log; the `cli` crate does.

pub mod api;
pub mod dcel;
pub mod geom2;
pub mod voronoi;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use dcel::Dcel;
pub use geom2::{GeomCfg, Line, LineKind};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::dcel::{
        ConstructionError, Dcel, EdgeId, FaceId, HalfEdgeId, PreconditionError, VertexId, Winding,
    };
    pub use crate::geom2::{bisector, intersect, GeomCfg, Line, LineKind};
    pub use crate::voronoi::{VoronoiDiagram, VoronoiError};
    pub use nalgebra::Vector2 as Vec2;
}
