//! Construction from a vertex array and an undirected edge list.
//!
//! Steps
//! 1. One vertex per input position.
//! 2. One twin pair per edge, registered in both endpoints' outgoing sets.
//! 3. Angular linking: every half-edge with no successor starts a walk that
//!    picks, at each head vertex, the outgoing half-edge with the sharpest turn
//!    that keeps the face on the left, until the walk closes.
//! 4. Face discovery by stack traversal over twins.
//! 5. Euler and orientation checks.

use std::collections::HashSet;

use nalgebra::Vector2;
use slotmap::Key;

use super::types::{
    ConstructionError, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId, Winding,
};
use super::Dcel;
use crate::geom2::{dot, side, GeomCfg};

impl Dcel {
    /// Build a subdivision with default tolerances.
    pub fn from_graph(
        vertices: &[Vector2<f64>],
        edges: &[(usize, usize)],
    ) -> Result<Self, ConstructionError> {
        Self::from_graph_with_cfg(vertices, edges, GeomCfg::default())
    }

    /// Build a subdivision from positions and undirected index pairs.
    ///
    /// The input must be a connected planar straight-line graph in which every
    /// vertex has degree at least 2. Anything else is rejected; no partial
    /// structure is returned.
    pub fn from_graph_with_cfg(
        vertices: &[Vector2<f64>],
        edges: &[(usize, usize)],
        cfg: GeomCfg,
    ) -> Result<Self, ConstructionError> {
        check_input(vertices, edges)?;

        let mut dcel = Dcel::with_cfg(cfg);
        let vids: Vec<VertexId> = vertices
            .iter()
            .map(|&pos| {
                dcel.vertices.insert(Vertex {
                    pos,
                    outgoing: Vec::new(),
                })
            })
            .collect();

        let mut order: Vec<HalfEdgeId> = Vec::with_capacity(2 * edges.len());
        for &(a, b) in edges {
            let (ab, ba) = dcel.insert_unlinked_pair(vids[a], vids[b]);
            order.push(ab);
            order.push(ba);
        }

        for &start in &order {
            if !dcel.half_edges[start].next.is_null() {
                continue;
            }
            let mut cur = start;
            loop {
                let Some(succ) = dcel.pick_successor(cur) else {
                    let head = dcel.head(cur);
                    let vertex = vids.iter().position(|&v| v == head).unwrap_or(0);
                    return Err(ConstructionError::Unlinkable { vertex });
                };
                dcel.link(cur, succ);
                if succ == start {
                    break;
                }
                cur = succ;
            }
        }

        dcel.discover_faces(order.first().copied());

        let unreached = dcel
            .half_edges
            .values()
            .filter(|he| he.face.is_null())
            .count();
        if unreached > 0 {
            return Err(ConstructionError::Disconnected { unreached });
        }

        let (v, e, f) = (dcel.num_vertices(), dcel.num_edges(), dcel.num_faces());
        if v + f != e + 2 {
            return Err(ConstructionError::EulerMismatch {
                vertices: v,
                edges: e,
                faces: f,
            });
        }

        let clockwise = dcel
            .faces
            .keys()
            .filter(|&fc| dcel.winding_unchecked(fc) == Winding::Clockwise)
            .count();
        if clockwise != 1 {
            return Err(ConstructionError::UnboundedFaceCount { count: clockwise });
        }
        Ok(dcel)
    }

    /// Insert a twin pair `u → v`, `v → u` with unresolved links and faces.
    pub(crate) fn insert_unlinked_pair(
        &mut self,
        u: VertexId,
        v: VertexId,
    ) -> (HalfEdgeId, HalfEdgeId) {
        let blank = |origin| HalfEdge {
            origin,
            twin: HalfEdgeId::null(),
            next: HalfEdgeId::null(),
            prev: HalfEdgeId::null(),
            face: FaceId::null(),
        };
        let uv = self.half_edges.insert(blank(u));
        let vu = self.half_edges.insert(blank(v));
        self.half_edges[uv].twin = vu;
        self.half_edges[vu].twin = uv;
        self.vertices[u].outgoing.push(uv);
        self.vertices[v].outgoing.push(vu);
        (uv, vu)
    }

    /// Successor of `cur` around its face: the outgoing half-edge at the head
    /// of `cur` reached first when sweeping clockwise from the reverse of `cur`.
    ///
    /// Candidates clockwise of the reverse direction (`side == -1`) beat all
    /// others; inside a bucket the score `side · dot` ranks them (lower wins).
    /// The first eligible candidate seeds the running best and ties keep it,
    /// so enumeration order never decides between equal turns.
    fn pick_successor(&self, cur: HalfEdgeId) -> Option<HalfEdgeId> {
        let he = &self.half_edges[cur];
        let head = self.head(cur);
        let hub = self.pos(head);
        let back = (self.pos(he.origin) - hub).normalize();

        let mut best: Option<(HalfEdgeId, i8, f64)> = None;
        for &cand in &self.vertices[head].outgoing {
            if cand == he.twin || !self.half_edges[cand].prev.is_null() {
                continue;
            }
            let dir = (self.pos(self.head(cand)) - hub).normalize();
            let s = side(back, dir);
            let score = f64::from(s) * dot(back, dir);
            match best {
                None => best = Some((cand, s, score)),
                Some((_, bs, bscore)) => {
                    if s < bs || (s == bs && score < bscore) {
                        best = Some((cand, s, score));
                    }
                }
            }
        }
        best.map(|(h, _, _)| h)
    }

    /// Assign a fresh face to every `next`-cycle reachable from `seed` via twins.
    fn discover_faces(&mut self, seed: Option<HalfEdgeId>) {
        let mut stack: Vec<HalfEdgeId> = seed.into_iter().collect();
        while let Some(now) = stack.pop() {
            if !self.half_edges[now].face.is_null() {
                continue;
            }
            let face = self.faces.insert(Face {
                leader: now,
                payload: None,
            });
            let cycle: Vec<HalfEdgeId> = self.face_cycle(now).collect();
            for h in cycle {
                self.half_edges[h].face = face;
                stack.push(self.half_edges[h].twin);
            }
        }
    }
}

fn check_input(
    vertices: &[Vector2<f64>],
    edges: &[(usize, usize)],
) -> Result<(), ConstructionError> {
    if let Some(vertex) = vertices
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(ConstructionError::NonFinite { vertex });
    }
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
    let mut degree = vec![0usize; vertices.len()];
    for (edge, &(a, b)) in edges.iter().enumerate() {
        for index in [a, b] {
            if index >= vertices.len() {
                return Err(ConstructionError::IndexOutOfRange {
                    edge,
                    index,
                    vertices: vertices.len(),
                });
            }
        }
        if a == b {
            return Err(ConstructionError::SelfLoop { edge });
        }
        if vertices[a] == vertices[b] {
            return Err(ConstructionError::ZeroLength { edge });
        }
        if !seen.insert((a.min(b), a.max(b))) {
            return Err(ConstructionError::DuplicateEdge { edge });
        }
        degree[a] += 1;
        degree[b] += 1;
    }
    if let Some((vertex, &d)) = degree.iter().enumerate().find(|&(_, &d)| d < 2) {
        return Err(ConstructionError::DanglingVertex { vertex, degree: d });
    }
    Ok(())
}
