//! 2D geometric primitives for the half-edge engine.
//!
//! Purpose
//! - Small, stateless vector helpers (`magnitude`, `dot`, `cross`, `side`) and
//!   the line utilities callers use to drive the subdivision (`bisector`,
//!   `intersect`).
//! - Keep every orientation decision on a single predicate (`side`) so the
//!   construction and the point tests cannot disagree on a boundary case.
//!
//! Conventions
//! - Points and vectors are `nalgebra::Vector2<f64>`.
//! - `side(a, b) = +1` when `cross(a, b) >= 0` (b is counterclockwise of a or
//!   collinear), `-1` otherwise.
//! - Tolerances live in `GeomCfg`; defaults are exact except for the
//!   split-edge snap distance.

pub mod rand;
mod intersect;
mod types;
mod util;

pub use intersect::{bisector, intersect, intersect_eps};
pub use types::{GeomCfg, Line, LineKind};
pub use util::{cross, dot, magnitude, polygon_signed_area, side, winding_number};
