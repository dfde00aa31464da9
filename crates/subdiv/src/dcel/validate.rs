//! Full structural check.
//!
//! Walks are bounded by the half-edge count, so a corrupted `next` chain is
//! reported as an open boundary instead of looping.

use std::collections::HashSet;

use super::types::{HalfEdgeId, InvariantError, Winding};
use super::Dcel;

impl Dcel {
    /// Check every structural invariant; returns the first violation found.
    ///
    /// Linear in the size of the structure. Intended for tests, debugging,
    /// and after-the-fact verification of a mutation sequence.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.validate_references()?;
        self.validate_links()?;
        self.validate_cycles()?;
        self.validate_vertices()?;

        let count = self
            .faces
            .keys()
            .filter(|&f| self.winding_unchecked(f) == Winding::Clockwise)
            .count();
        if count != 1 {
            return Err(InvariantError::UnboundedFaceCount { count });
        }
        Ok(())
    }

    fn validate_references(&self) -> Result<(), InvariantError> {
        for (h, he) in &self.half_edges {
            let dangling = |field| InvariantError::Dangling { half_edge: h, field };
            if !self.vertices.contains_key(he.origin) {
                return Err(dangling("origin"));
            }
            for (field, target) in [("twin", he.twin), ("next", he.next), ("prev", he.prev)] {
                if !self.half_edges.contains_key(target) {
                    return Err(dangling(field));
                }
            }
            if !self.faces.contains_key(he.face) {
                return Err(dangling("face"));
            }
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<(), InvariantError> {
        for (h, he) in &self.half_edges {
            if he.twin == h || self.he(he.twin).twin != h {
                return Err(InvariantError::TwinMismatch(h));
            }
            if self.he(he.twin).origin == he.origin {
                return Err(InvariantError::DegenerateEdge(h));
            }
            if self.he(he.next).prev != h || self.he(he.prev).next != h {
                return Err(InvariantError::LinkMismatch(h));
            }
            if self.he(he.next).face != he.face {
                return Err(InvariantError::FaceMismatch(h));
            }
            if self.he(he.next).origin != self.head(h) {
                return Err(InvariantError::Discontinuous(h));
            }
        }
        Ok(())
    }

    fn validate_cycles(&self) -> Result<(), InvariantError> {
        let limit = self.half_edges.len();
        let mut seen: HashSet<HalfEdgeId> = HashSet::with_capacity(limit);
        for (f, face) in &self.faces {
            if !self.half_edges.contains_key(face.leader) || self.he(face.leader).face != f {
                return Err(InvariantError::LeaderMismatch(f));
            }
            let mut h = face.leader;
            let mut steps = 0;
            loop {
                seen.insert(h);
                h = self.he(h).next;
                steps += 1;
                if h == face.leader {
                    break;
                }
                if steps > limit {
                    return Err(InvariantError::OpenBoundary(f));
                }
            }
        }
        // Every half-edge must sit on the cycle of its face's leader.
        match self.half_edges.keys().find(|h| !seen.contains(h)) {
            Some(h) => Err(InvariantError::Unreached(h)),
            None => Ok(()),
        }
    }

    fn validate_vertices(&self) -> Result<(), InvariantError> {
        let mut listed = 0;
        for (v, vertex) in &self.vertices {
            if vertex.outgoing.is_empty() {
                return Err(InvariantError::IsolatedVertex(v));
            }
            let distinct: HashSet<HalfEdgeId> = vertex.outgoing.iter().copied().collect();
            let consistent = distinct.len() == vertex.outgoing.len()
                && vertex
                    .outgoing
                    .iter()
                    .all(|&h| self.half_edges.get(h).is_some_and(|he| he.origin == v));
            if !consistent {
                return Err(InvariantError::OutgoingMismatch(v));
            }
            listed += vertex.outgoing.len();
        }
        // Each half-edge appears in exactly one set iff the totals agree,
        // given the per-vertex origin check above.
        if listed != self.half_edges.len() {
            let missing = self
                .half_edges
                .iter()
                .find(|(h, he)| !self.vertices[he.origin].outgoing.contains(h))
                .map(|(_, he)| he.origin);
            if let Some(v) = missing {
                return Err(InvariantError::OutgoingMismatch(v));
            }
        }
        Ok(())
    }
}
