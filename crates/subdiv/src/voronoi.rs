//! Incremental Voronoi diagram on top of the subdivision engine.
//!
//! The diagram lives inside a rectangular frame. Each bounded face carries its
//! site as payload. Inserting a site walks the cells crossed by the bisector
//! between the new site and their owners, cuts each of them along that
//! bisector, and then absorbs everything on the new site's side of the cuts
//! into one face.
//!
//! Insertion runs on a copy of the structure and commits only on success, so
//! a failed insertion leaves the diagram as it was.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use nalgebra::Vector2;

use crate::dcel::{
    ConstructionError, Dcel, EdgeId, FaceId, HalfEdgeId, PreconditionError, VertexId, Winding,
};
use crate::geom2::{bisector, intersect};

/// Crossings closer than this are the same point (a bisector through a vertex
/// meets both incident edges).
const HIT_TOL: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub enum VoronoiError {
    /// The site does not lie strictly inside the frame.
    SiteOutsideFrame(Vector2<f64>),
    /// The site coincides with the owner of the cell it lands in.
    DuplicateSite(Vector2<f64>),
    /// The bisector walk produced no usable cut (collinear or coincident data).
    Degenerate(&'static str),
    /// The frame corners are not finite or do not span a rectangle.
    InvalidFrame,
    Construction(ConstructionError),
    Precondition(PreconditionError),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SiteOutsideFrame(p) => {
                write!(f, "site ({}, {}) lies outside the frame", p.x, p.y)
            }
            Self::DuplicateSite(p) => write!(f, "site ({}, {}) is already present", p.x, p.y),
            Self::Degenerate(why) => write!(f, "degenerate insertion: {why}"),
            Self::InvalidFrame => write!(f, "frame corners must be finite with min < max"),
            Self::Construction(e) => write!(f, "frame construction failed: {e}"),
            Self::Precondition(e) => write!(f, "subdivision edit failed: {e}"),
        }
    }
}

impl std::error::Error for VoronoiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Construction(e) => Some(e),
            Self::Precondition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConstructionError> for VoronoiError {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl From<PreconditionError> for VoronoiError {
    fn from(e: PreconditionError) -> Self {
        Self::Precondition(e)
    }
}

/// One Voronoi cell: its site and its boundary polygon (counterclockwise).
#[derive(Clone, Debug)]
pub struct Cell {
    pub face: FaceId,
    pub site: Vector2<f64>,
    pub polygon: Vec<Vector2<f64>>,
}

/// A cell crossed by the bisector: the two crossed edges and crossing points.
struct Cut {
    face: FaceId,
    hits: [(EdgeId, Vector2<f64>); 2],
}

#[derive(Clone, Debug)]
pub struct VoronoiDiagram {
    dcel: Dcel,
    sites: Vec<Vector2<f64>>,
    frame: (Vector2<f64>, Vector2<f64>),
}

impl VoronoiDiagram {
    /// Empty diagram over the axis-aligned rectangle `[min, max]`.
    pub fn new(min: Vector2<f64>, max: Vector2<f64>) -> Result<Self, VoronoiError> {
        let finite = min.iter().chain(max.iter()).all(|c| c.is_finite());
        if !finite || min.x >= max.x || min.y >= max.y {
            return Err(VoronoiError::InvalidFrame);
        }
        let corners = [
            min,
            Vector2::new(max.x, min.y),
            max,
            Vector2::new(min.x, max.y),
        ];
        let dcel = Dcel::from_graph(&corners, &[(0, 1), (1, 2), (2, 3), (3, 0)])?;
        Ok(Self {
            dcel,
            sites: Vec::new(),
            frame: (min, max),
        })
    }

    /// Build a diagram by inserting `sites` in order.
    pub fn from_sites(
        min: Vector2<f64>,
        max: Vector2<f64>,
        sites: &[Vector2<f64>],
    ) -> Result<Self, VoronoiError> {
        let mut diagram = Self::new(min, max)?;
        for &s in sites {
            diagram.insert_site(s)?;
        }
        Ok(diagram)
    }

    pub fn dcel(&self) -> &Dcel {
        &self.dcel
    }

    pub fn sites(&self) -> &[Vector2<f64>] {
        &self.sites
    }

    pub fn frame(&self) -> (Vector2<f64>, Vector2<f64>) {
        self.frame
    }

    /// Add `site` and return the face of its cell.
    pub fn insert_site(&mut self, site: Vector2<f64>) -> Result<FaceId, VoronoiError> {
        let mut work = self.dcel.clone();
        let landing = work
            .locate(site)?
            .ok_or(VoronoiError::Degenerate("empty subdivision"))?;
        if work.winding(landing)? == Winding::Clockwise {
            return Err(VoronoiError::SiteOutsideFrame(site));
        }
        let face = match work.payload(landing)? {
            None => {
                work.set_payload(landing, Some(site))?;
                landing
            }
            Some(owner) if (owner - site).norm() < HIT_TOL => {
                return Err(VoronoiError::DuplicateSite(site));
            }
            Some(_) => {
                let cuts = collect_cuts(&work, site, landing)?;
                carve(&mut work, site, &cuts)?
            }
        };
        self.dcel = work;
        self.sites.push(site);
        Ok(face)
    }

    /// Every cell with its site, in arena order.
    pub fn cells(&self) -> Vec<Cell> {
        self.dcel
            .face_ids()
            .filter_map(|face| {
                let site = self.dcel.payload(face).ok()??;
                let polygon = self.dcel.boundary_vertices(face).ok()?;
                Some(Cell { face, site, polygon })
            })
            .collect()
    }

    /// Cell containing `p`, if it lies inside the frame.
    pub fn cell_of(&self, p: Vector2<f64>) -> Result<Option<FaceId>, VoronoiError> {
        let Some(face) = self.dcel.locate(p)? else {
            return Ok(None);
        };
        Ok(self.dcel.payload(face)?.map(|_| face))
    }
}

/// Breadth-first walk from the landing cell over cells cut by the bisector.
///
/// From a cut cell the walk steps across every edge that the bisector crosses
/// or that has an endpoint strictly on the new site's side. The new cell can
/// run along the frame between two cuts, so crossed edges alone do not reach
/// every cell it overlaps.
///
/// Edge keys are recorded before any edit, so no handle goes stale while the
/// cuts are applied.
fn collect_cuts(
    dcel: &Dcel,
    site: Vector2<f64>,
    landing: FaceId,
) -> Result<Vec<Cut>, VoronoiError> {
    let outer = dcel.unbounded_face();
    let mut cuts = Vec::new();
    let mut visited: HashSet<FaceId> = HashSet::from([landing]);
    let mut queue: VecDeque<FaceId> = VecDeque::from([landing]);

    while let Some(face) = queue.pop_front() {
        let Some(owner) = dcel.payload(face)? else {
            continue;
        };
        let line = bisector(site, owner);
        let mut hits: Vec<(HalfEdgeId, Vector2<f64>)> = Vec::with_capacity(2);
        for h in dcel.boundary(face)? {
            let Some(p) = intersect(&dcel.segment(h)?, &line) else {
                continue;
            };
            if hits.iter().all(|&(_, q)| (q - p).norm() > HIT_TOL) {
                hits.push((h, p));
            }
        }
        let &[(h0, p0), (h1, p1)] = hits.as_slice() else {
            continue;
        };

        let closer_to_site = |p: Vector2<f64>| (p - site).norm() < (p - owner).norm();
        for h in dcel.boundary(face)? {
            let seg = dcel.segment(h)?;
            let crossed = h == h0 || h == h1;
            if !crossed && !closer_to_site(seg.p1()) && !closer_to_site(seg.p2()) {
                continue;
            }
            let next = dcel.step_over_edge(face, h)?;
            if Some(next) != outer && visited.insert(next) {
                queue.push_back(next);
            }
        }
        cuts.push(Cut {
            face,
            hits: [(dcel.edge(h0)?, p0), (dcel.edge(h1)?, p1)],
        });
    }

    if cuts.iter().all(|c| c.face != landing) {
        return Err(VoronoiError::Degenerate("bisector misses the landing cell"));
    }
    Ok(cuts)
}

/// Apply the cuts and merge the new site's side into one face.
fn carve(dcel: &mut Dcel, site: Vector2<f64>, cuts: &[Cut]) -> Result<FaceId, VoronoiError> {
    // An edge shared by two cut cells is split once.
    let mut split_at: HashMap<EdgeId, VertexId> = HashMap::new();
    for cut in cuts {
        for &(edge, p) in &cut.hits {
            if !split_at.contains_key(&edge) {
                let v = dcel.split_edge(p, edge.half_edge())?;
                split_at.insert(edge, v);
            }
        }
    }

    let mut outline: Vec<HalfEdgeId> = Vec::with_capacity(cuts.len());
    for cut in cuts {
        let u = split_at[&cut.hits[0].0];
        let v = split_at[&cut.hits[1].0];
        if u == v {
            continue;
        }
        match dcel.split_face(cut.face, u, v) {
            Ok(e) => outline.push(e),
            // The bisector runs along an existing edge of the cell.
            Err(PreconditionError::AlreadyJoined { .. }) => {
                let along = dcel
                    .vertex(u)?
                    .outgoing
                    .iter()
                    .copied()
                    .find(|&h| dcel.dest(h) == Ok(v));
                outline.extend(along);
            }
            Err(e) => return Err(e.into()),
        }
    }
    if outline.is_empty() {
        return Err(VoronoiError::Degenerate("no cut edges"));
    }

    let hint = dcel
        .locate(site)?
        .filter(|&f| dcel.winding(f) == Ok(Winding::CounterClockwise))
        .ok_or(VoronoiError::Degenerate("site left the frame"))?;
    let merged = dcel.delete_interior(&outline, hint)?;
    dcel.set_payload(merged, Some(site))?;
    Ok(merged)
}

/// Scale each axis by its largest absolute value, mapping the points into
/// `[-1, 1]²`. Axes that are identically zero are left alone.
pub fn sites_from_normalized(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let max_abs = |axis: usize| {
        points
            .iter()
            .map(|p| p[axis].abs())
            .fold(0.0_f64, f64::max)
    };
    let scale = Vector2::new(max_abs(0), max_abs(1)).map(|m| if m > 0.0 { m } else { 1.0 });
    points.iter().map(|p| p.component_div(&scale)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn unit_frame() -> VoronoiDiagram {
        VoronoiDiagram::new(vector![-1.0, -1.0], vector![1.0, 1.0]).unwrap()
    }

    #[test]
    fn first_site_claims_the_frame() {
        let mut vd = unit_frame();
        let f = vd.insert_site(vector![0.2, 0.1]).unwrap();
        assert_eq!(vd.dcel().payload(f).unwrap(), Some(vector![0.2, 0.1]));
        assert_eq!(vd.cells().len(), 1);
    }

    #[test]
    fn two_sites_split_along_the_bisector() {
        let mut vd = unit_frame();
        vd.insert_site(vector![-0.5, 0.0]).unwrap();
        let right = vd.insert_site(vector![0.5, 0.0]).unwrap();
        let d = vd.dcel();
        d.validate().unwrap();
        assert_eq!(d.num_faces(), 3);
        assert!((d.signed_area(right).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(vd.cell_of(vector![0.9, 0.9]).unwrap(), Some(right));
        let left = vd.cell_of(vector![-0.9, 0.9]).unwrap().unwrap();
        assert_eq!(d.payload(left).unwrap(), Some(vector![-0.5, 0.0]));
    }

    #[test]
    fn rejected_sites_leave_the_diagram_unchanged() {
        let mut vd = unit_frame();
        vd.insert_site(vector![0.0, 0.0]).unwrap();
        assert_eq!(
            vd.insert_site(vector![3.0, 0.0]),
            Err(VoronoiError::SiteOutsideFrame(vector![3.0, 0.0]))
        );
        assert_eq!(
            vd.insert_site(vector![0.0, 0.0]),
            Err(VoronoiError::DuplicateSite(vector![0.0, 0.0]))
        );
        assert_eq!(vd.sites().len(), 1);
        assert_eq!(vd.dcel().num_faces(), 2);
    }

    #[test]
    fn invalid_frames() {
        assert_eq!(
            VoronoiDiagram::new(vector![1.0, 0.0], vector![0.0, 1.0]).err(),
            Some(VoronoiError::InvalidFrame)
        );
        assert_eq!(
            VoronoiDiagram::new(vector![0.0, 0.0], vector![f64::NAN, 1.0]).err(),
            Some(VoronoiError::InvalidFrame)
        );
    }

    #[test]
    fn normalization_scales_per_axis() {
        let pts = [vector![2.0, -10.0], vector![-4.0, 5.0], vector![1.0, 0.0]];
        let out = sites_from_normalized(&pts);
        assert_eq!(out[0], vector![0.5, -1.0]);
        assert_eq!(out[1], vector![-1.0, 0.5]);
        assert_eq!(out[2], vector![0.25, 0.0]);
        let flat = sites_from_normalized(&[vector![0.0, 3.0]]);
        assert_eq!(flat[0], vector![0.0, 1.0]);
    }
}
