//! Mutation operators.
//!
//! Every operator validates its handles and structural preconditions first and
//! only then rewires, so a returned error leaves the structure untouched.
//! Entities are unlinked from their neighbours in the same step that removes
//! them from the arenas.

use std::collections::HashSet;

use nalgebra::Vector2;

use super::query::check_finite;
use super::types::{Face, FaceId, HalfEdgeId, PreconditionError, Vertex, VertexId};
use super::Dcel;
use crate::geom2::cross;

impl Dcel {
    /// Insert a vertex at `point` on the edge of `edge`.
    ///
    /// A point within `cfg.eps_snap` of an endpoint returns that endpoint and
    /// leaves the structure unchanged. Otherwise the twin pair is replaced by
    /// two pairs meeting at a new vertex (handles to the old pair go stale).
    /// A point farther than `cfg.eps_on_edge` from the segment (scaled by its
    /// length) is rejected with `PointOffEdge`.
    pub fn split_edge(
        &mut self,
        point: Vector2<f64>,
        edge: HalfEdgeId,
    ) -> Result<VertexId, PreconditionError> {
        check_finite(point)?;
        let h = edge;
        let t = self.half_edge(h)?.twin;
        let (u, w) = (self.he(h).origin, self.he(t).origin);
        if (self.pos(u) - point).norm() < self.cfg.eps_snap {
            return Ok(u);
        }
        if (self.pos(w) - point).norm() < self.cfg.eps_snap {
            return Ok(w);
        }
        if !self.on_segment(point, u, w) {
            return Err(PreconditionError::PointOffEdge { edge: h });
        }

        let (a, b) = (self.he(h).prev, self.he(h).next);
        let (c, d) = (self.he(t).prev, self.he(t).next);
        let (fh, ft) = (self.he(h).face, self.he(t).face);

        let m = self.vertices.insert(Vertex {
            pos: point,
            outgoing: Vec::new(),
        });
        // h1: u→m, t2: m→u   and   h2: m→w, t1: w→m
        let (h1, t2) = self.insert_unlinked_pair(u, m);
        let (h2, t1) = self.insert_unlinked_pair(m, w);
        for x in [h1, h2] {
            self.half_edges[x].face = fh;
        }
        for x in [t1, t2] {
            self.half_edges[x].face = ft;
        }

        // Neighbours that were the old pair itself (a tip at u or w) map onto
        // the replacement on the same side.
        let a = if a == t { t2 } else { a };
        let b = if b == t { t1 } else { b };
        let c = if c == h { h2 } else { c };
        let d = if d == h { h1 } else { d };
        self.link(a, h1);
        self.link(h1, h2);
        self.link(h2, b);
        self.link(c, t1);
        self.link(t1, t2);
        self.link(t2, d);

        if self.faces[fh].leader == h {
            self.faces[fh].leader = h1;
        }
        if self.faces[ft].leader == t {
            self.faces[ft].leader = t1;
        }
        self.remove_pair(h);
        Ok(m)
    }

    /// Join `u` and `v` across `face` with a new edge.
    ///
    /// Both vertices must start a boundary half-edge of `face` and must not be
    /// consecutive on it. The face is replaced by two new faces, each carrying
    /// the old payload. Returns the new half-edge `u → v`.
    pub fn split_face(
        &mut self,
        face: FaceId,
        u: VertexId,
        v: VertexId,
    ) -> Result<HalfEdgeId, PreconditionError> {
        let payload = self.face(face)?.payload;
        self.vertex(u)?;
        self.vertex(v)?;
        if u == v {
            return Err(PreconditionError::SameVertex(u));
        }
        let h_u = self.outgoing_on_face(u, face)?;
        let h_v = self.outgoing_on_face(v, face)?;
        if self.head(h_u) == v || self.head(h_v) == u {
            return Err(PreconditionError::AlreadyJoined { u, v, face });
        }

        let prev_u = self.he(h_u).prev;
        let prev_v = self.he(h_v).prev;
        let (e1, e2) = self.insert_unlinked_pair(u, v);
        self.link(prev_u, e1);
        self.link(e1, h_v);
        self.link(prev_v, e2);
        self.link(e2, h_u);

        for leader in [e1, e2] {
            let f = self.faces.insert(Face { leader, payload });
            self.relabel_cycle(leader, f);
        }
        self.faces.remove(face);
        Ok(e1)
    }

    /// Remove `link` and fuse the faces on its two sides.
    ///
    /// `link` must separate `f1` from `f2` (in either orientation). For
    /// `f1 != f2` the record of `f1` survives, keeping its payload or taking
    /// `f2`'s when it had none; `f2` is destroyed. For `f1 == f2` the edge must
    /// dangle into the face (one endpoint of degree 1); the tip vertex is
    /// removed with it. Returns the surviving face.
    pub fn merge_faces(
        &mut self,
        f1: FaceId,
        f2: FaceId,
        link: HalfEdgeId,
    ) -> Result<FaceId, PreconditionError> {
        self.face(f1)?;
        self.face(f2)?;
        let twin = self.half_edge(link)?.twin;
        let (side_a, side_b) = (self.he(link).face, self.he(twin).face);
        let touching = (side_a == f1 && side_b == f2) || (side_a == f2 && side_b == f1);
        if !touching {
            return Err(PreconditionError::FacesNotAdjacent { f1, f2, link });
        }
        if f1 == f2 && !self.is_dangling(link) {
            return Err(PreconditionError::WouldDisconnect { link });
        }

        let survivor = self.splice_out(link);
        if f1 != f2 {
            let absorbed = self.faces.remove(f2);
            if let Some(absorbed) = absorbed {
                let keep = &mut self.faces[f1];
                keep.payload = keep.payload.or(absorbed.payload);
            }
            self.relabel_cycle(survivor, f1);
        }
        self.faces[f1].leader = survivor;
        Ok(f1)
    }

    /// Absorb everything inside `new_boundary` into the face containing `hint`.
    ///
    /// `new_boundary` lists half-edges (either side counts) of the target
    /// outline. The region grows from `hint` by merging across every boundary
    /// edge that is neither on the outline nor adjacent to the unbounded face.
    /// Edges left dangling inside the region are then removed, and finally
    /// every vertex without incident edges. Returns the merged face.
    pub fn delete_interior(
        &mut self,
        new_boundary: &[HalfEdgeId],
        hint: FaceId,
    ) -> Result<FaceId, PreconditionError> {
        self.face(hint)?;
        let mut keep: HashSet<HalfEdgeId> = HashSet::with_capacity(2 * new_boundary.len());
        for &h in new_boundary {
            keep.insert(h);
            keep.insert(self.half_edge(h)?.twin);
        }
        let outer = self.unbounded_face();
        if outer == Some(hint) {
            return Err(PreconditionError::UnboundedHint(hint));
        }

        let region = hint;
        loop {
            let across: Vec<HalfEdgeId> = self
                .face_cycle(self.faces[region].leader)
                .filter(|&h| {
                    let other = self.he(self.he(h).twin).face;
                    !keep.contains(&h) && Some(other) != outer && other != region
                })
                .collect();
            if across.is_empty() {
                break;
            }
            for h in across {
                // An earlier merge in this pass may already have absorbed the
                // neighbour, leaving `h` with the region on both sides.
                let other = self.he(self.he(h).twin).face;
                if other == region {
                    continue;
                }
                self.merge_faces(region, other, h)?;
            }
        }

        loop {
            let tip = self.face_cycle(self.faces[region].leader).find(|&h| {
                !keep.contains(&h)
                    && self.he(self.he(h).twin).face == region
                    && self.is_dangling(h)
            });
            match tip {
                Some(tip) => self.merge_faces(region, region, tip)?,
                None => break,
            };
        }

        self.purge_isolated_vertices();
        Ok(region)
    }

    /// Remove every vertex with no incident half-edges; returns how many.
    pub fn purge_isolated_vertices(&mut self) -> usize {
        let before = self.vertices.len();
        self.vertices.retain(|_, v| !v.outgoing.is_empty());
        before - self.vertices.len()
    }

    /// Whether `p` lies on the segment `u–w` within `cfg.eps_on_edge`.
    fn on_segment(&self, p: Vector2<f64>, u: VertexId, w: VertexId) -> bool {
        let (a, b) = (self.pos(u), self.pos(w));
        let d = b - a;
        let len = d.norm();
        let tol = self.cfg.eps_on_edge * len.max(1.0);
        let off = cross(d, p - a).abs() / len;
        let along = d.dot(&(p - a)) / len;
        off <= tol && along >= -tol && along <= len + tol
    }

    /// First boundary half-edge of `face` leaving `v`.
    fn outgoing_on_face(&self, v: VertexId, face: FaceId) -> Result<HalfEdgeId, PreconditionError> {
        self.vertices[v]
            .outgoing
            .iter()
            .copied()
            .find(|&h| self.he(h).face == face)
            .ok_or(PreconditionError::VertexNotOnFace { vertex: v, face })
    }

    /// Whether one endpoint of the edge of `h` has no other edge.
    fn is_dangling(&self, h: HalfEdgeId) -> bool {
        let t = self.he(h).twin;
        let tip_at_head = self.he(h).next == t;
        let tip_at_origin = self.he(t).next == h;
        tip_at_head != tip_at_origin
    }

    /// Point every half-edge on the cycle of `start` at `face`.
    fn relabel_cycle(&mut self, start: HalfEdgeId, face: FaceId) {
        let cycle: Vec<HalfEdgeId> = self.face_cycle(start).collect();
        for h in cycle {
            self.half_edges[h].face = face;
        }
    }

    /// Unlink the edge of `h` from both cycles, delete it, drop endpoints left
    /// without edges, and return a half-edge on the joined cycle.
    ///
    /// The edge must not be isolated (both endpoints of degree 1).
    fn splice_out(&mut self, h: HalfEdgeId) -> HalfEdgeId {
        let t = self.he(h).twin;
        let (a, b) = (self.he(h).prev, self.he(h).next);
        let (c, d) = (self.he(t).prev, self.he(t).next);
        let survivor = if b == t {
            // Head of h is a tip: a → h → t → d.
            self.link(a, d);
            a
        } else if d == h {
            // Origin of h is a tip: c → t → h → b.
            self.link(c, b);
            c
        } else {
            self.link(a, d);
            self.link(c, b);
            a
        };
        let (u, w) = (self.he(h).origin, self.he(t).origin);
        self.remove_pair(h);
        for v in [u, w] {
            if self.vertices[v].outgoing.is_empty() {
                self.vertices.remove(v);
            }
        }
        survivor
    }

    /// Drop the twin pair of `h` from the arena and from both outgoing sets.
    /// Links into the pair must already be rewired.
    fn remove_pair(&mut self, h: HalfEdgeId) {
        let t = self.he(h).twin;
        for x in [h, t] {
            let origin = self.he(x).origin;
            self.vertices[origin].outgoing.retain(|&o| o != x);
            self.half_edges.remove(x);
        }
    }
}
